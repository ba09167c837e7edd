use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{INSTRUCTORS_PATH, InstructorService};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::redirect_response;

pub async fn get_instructor(
    service: &InstructorService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    match service.get_storage(request).get_instructor_by_id(id).await {
        Ok(Some(instructor)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            instructor,
            "Instructor retrieved successfully",
        ))),
        Ok(None) => Ok(redirect_response(
            INSTRUCTORS_PATH,
            ErrorCode::InstructorNotFound,
            "Instructor not found",
        )),
        Err(e) => {
            tracing::error!("Failed to load instructor {}: {}", id, e);
            Ok(redirect_response(
                INSTRUCTORS_PATH,
                ErrorCode::InstructorNotFound,
                "Failed to get instructor",
            ))
        }
    }
}
