pub mod attendance;
pub mod auth;
pub mod classes;
pub mod instructors;
pub mod students;

pub use attendance::AttendanceService;
pub use auth::AuthService;
pub use classes::ClassService;
pub use instructors::InstructorService;
pub use students::StudentService;

use actix_web::HttpResponse;
use actix_web::http::header::LOCATION;

use crate::models::{ApiResponse, ErrorCode};

/// 303 重定向，响应体仍为统一的 JSON 格式
pub fn redirect_response(location: &str, code: ErrorCode, message: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((LOCATION, location))
        .json(ApiResponse::error_empty(code, message))
}
