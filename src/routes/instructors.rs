use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::instructors::requests::InstructorQueryParams;
use crate::services::InstructorService;
use crate::utils::SafeIDI64;

static INSTRUCTOR_SERVICE: Lazy<InstructorService> = Lazy::new(InstructorService::new_lazy);

pub async fn list_instructors(
    req: HttpRequest,
    query: web::Query<InstructorQueryParams>,
) -> ActixResult<HttpResponse> {
    INSTRUCTOR_SERVICE
        .list_instructors(&req, query.into_inner())
        .await
}

pub async fn get_instructor(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    INSTRUCTOR_SERVICE.get_instructor(&req, id.0).await
}

pub fn configure_instructors_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/instructors")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_instructors))
            .route("/{id}", web::get().to(get_instructor)),
    );
}
