use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequireAttendanceAccess};
use crate::models::attendance::requests::{
    HistoryQuery, SaveAttendanceRequest, TakeAttendanceQuery,
};
use crate::services::AttendanceService;

// 懒加载的全局 ATTENDANCE_SERVICE 实例
static ATTENDANCE_SERVICE: Lazy<AttendanceService> = Lazy::new(AttendanceService::new_lazy);

pub async fn index(req: HttpRequest) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.index(&req).await
}

pub async fn take_attendance(
    req: HttpRequest,
    query: web::Query<TakeAttendanceQuery>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.take(&req, query.into_inner()).await
}

pub async fn save_attendance(
    req: HttpRequest,
    body: web::Json<SaveAttendanceRequest>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.save(&req, body.into_inner()).await
}

pub async fn attendance_history(
    req: HttpRequest,
    query: web::Query<HistoryQuery>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.history(&req, query.into_inner()).await
}

pub async fn attendance_stats(req: HttpRequest) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.stats(&req).await
}

// 配置路由
//
// scope 上的 RequireJWT 先于各资源上的访问控制执行
pub fn configure_attendance_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/attendance")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(index))
            .service(
                web::resource("/classes/{class_id}/take")
                    .wrap(RequireAttendanceAccess::modify())
                    .route(web::get().to(take_attendance))
                    .route(web::post().to(save_attendance)),
            )
            .service(
                web::resource("/classes/{class_id}/history")
                    .wrap(RequireAttendanceAccess::view())
                    .route(web::get().to(attendance_history)),
            )
            .service(
                web::resource("/classes/{class_id}/stats")
                    .wrap(RequireAttendanceAccess::view())
                    .route(web::get().to(attendance_stats)),
            ),
    );
}
