use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{CLASSES_PATH, ClassService};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::redirect_response;

pub async fn get_class(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_class_detail(class_id).await {
        Ok(Some(class)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            class,
            "Class information retrieved successfully",
        ))),
        Ok(None) => Ok(redirect_response(
            CLASSES_PATH,
            ErrorCode::ClassNotFound,
            "Class not found",
        )),
        Err(e) => {
            tracing::error!("Failed to load class {}: {}", class_id, e);
            Ok(redirect_response(
                CLASSES_PATH,
                ErrorCode::ClassNotFound,
                "Failed to get class information",
            ))
        }
    }
}
