use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ClassService;
use crate::models::{
    ApiResponse, ErrorCode, PaginationInfo,
    classes::{requests::ClassQueryParams, responses::ClassListResponse},
};

pub async fn list_classes(
    service: &ClassService,
    request: &HttpRequest,
    query: ClassQueryParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let list_query = query.into_list_query();
    let (page, size) = (
        list_query.page.unwrap_or(1).max(1),
        list_query.size.unwrap_or(10),
    );

    match storage.list_classes_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Class list retrieved successfully",
        ))),
        Err(e) => {
            // 查询失败时返回空列表
            tracing::error!("Failed to list classes: {}", e);
            Ok(HttpResponse::Ok().json(ApiResponse::error(
                ErrorCode::InternalServerError,
                ClassListResponse {
                    pagination: PaginationInfo::empty(page, size),
                    items: Vec::new(),
                },
                "Failed to retrieve class list",
            )))
        }
    }
}
