pub mod attendance;
pub mod auth;
pub mod classes;
pub mod instructors;
pub mod students;

pub use attendance::configure_attendance_routes;
pub use auth::configure_auth_routes;
pub use classes::configure_classes_routes;
pub use instructors::configure_instructors_routes;
pub use students::configure_students_routes;

use actix_web::web;

/// 注册全部 `/api/v1` 路由
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.configure(configure_auth_routes)
        .configure(configure_classes_routes)
        .configure(configure_students_routes)
        .configure(configure_instructors_routes)
        .configure(configure_attendance_routes);
}
