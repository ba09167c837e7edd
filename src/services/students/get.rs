use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{STUDENTS_PATH, StudentService};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::redirect_response;

pub async fn get_student(
    service: &StudentService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    match service.get_storage(request).get_student_by_id(id).await {
        Ok(Some(student)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            student,
            "Student retrieved successfully",
        ))),
        Ok(None) => Ok(redirect_response(
            STUDENTS_PATH,
            ErrorCode::StudentNotFound,
            "Student not found",
        )),
        Err(e) => {
            tracing::error!("Failed to load student {}: {}", id, e);
            Ok(redirect_response(
                STUDENTS_PATH,
                ErrorCode::StudentNotFound,
                "Failed to get student",
            ))
        }
    }
}
