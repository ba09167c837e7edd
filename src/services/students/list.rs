use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StudentService;
use crate::models::{
    ApiResponse, ErrorCode, PaginationInfo,
    students::{
        requests::{StudentListQuery, StudentQueryParams},
        responses::StudentListResponse,
    },
};

pub async fn list_students(
    service: &StudentService,
    request: &HttpRequest,
    query: StudentQueryParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let page = query.pagination.page.max(1);
    let size = query.pagination.size;

    let list_query = StudentListQuery {
        page: Some(page),
        size: Some(size),
        search: query.search,
    };

    match storage.list_students_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Student list retrieved successfully",
        ))),
        Err(e) => {
            tracing::error!("Failed to list students: {}", e);
            Ok(HttpResponse::Ok().json(ApiResponse::error(
                ErrorCode::InternalServerError,
                StudentListResponse {
                    pagination: PaginationInfo::empty(page, size),
                    items: Vec::new(),
                },
                "Failed to retrieve student list",
            )))
        }
    }
}
