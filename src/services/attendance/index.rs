use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::AttendanceService;
use super::access::can_manage;
use crate::middlewares::RequireJWT;
use crate::models::attendance::responses::{AttendanceIndexItem, AttendanceIndexResponse};
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};

pub async fn attendance_index(
    service: &AttendanceService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(principal) = RequireJWT::extract_principal(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized: missing principal",
        )));
    };
    let storage = service.get_storage(request);

    let linked = if principal.role == UserRole::Instructor {
        storage
            .get_instructor_by_user_id(principal.id)
            .await
            .unwrap_or_else(|e| {
                error!("Failed to resolve instructor for user {}: {}", principal.id, e);
                None
            })
    } else {
        None
    };

    let classes = storage.list_class_details().await.unwrap_or_else(|e| {
        error!("Failed to list classes for attendance index: {}", e);
        Vec::new()
    });

    let items = classes
        .into_iter()
        .map(|detail| AttendanceIndexItem {
            can_manage: can_manage(&principal, &detail.class, linked.as_ref()),
            student_count: detail.students.len() as i64,
            instructor: detail.instructor,
            class: detail.class,
        })
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        AttendanceIndexResponse { classes: items },
        "Attendance classes retrieved successfully",
    )))
}
