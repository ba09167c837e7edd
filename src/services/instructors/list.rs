use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::InstructorService;
use crate::models::{
    ApiResponse, ErrorCode, PaginationInfo,
    instructors::{
        requests::{InstructorListQuery, InstructorQueryParams},
        responses::InstructorListResponse,
    },
};

pub async fn list_instructors(
    service: &InstructorService,
    request: &HttpRequest,
    query: InstructorQueryParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let page = query.pagination.page.max(1);
    let size = query.pagination.size;

    let list_query = InstructorListQuery {
        page: Some(page),
        size: Some(size),
        search: query.search,
    };

    match storage.list_instructors_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Instructor list retrieved successfully",
        ))),
        Err(e) => {
            tracing::error!("Failed to list instructors: {}", e);
            Ok(HttpResponse::Ok().json(ApiResponse::error(
                ErrorCode::InternalServerError,
                InstructorListResponse {
                    pagination: PaginationInfo::empty(page, size),
                    items: Vec::new(),
                },
                "Failed to retrieve instructor list",
            )))
        }
    }
}
