/*!
 * 考勤访问控制中间件
 *
 * 必须在 RequireJWT 之后使用，路径中需要 `{class_id}`。
 *
 * ```rust,ignore
 * web::resource("/classes/{class_id}/take")
 *     .wrap(RequireAttendanceAccess::modify())
 *     .route(web::get().to(take_attendance))
 * ```
 *
 * 中间件加载班级详情（以及教师账号关联的教师档案），交给
 * [`decide`] 判定后：
 * - 放行：把 [`ClassDetail`] 放入请求扩展
 * - 拒绝：403 并附带原因
 * - 班级不存在或查询失败：303 重定向到考勤首页
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, error, info};

use crate::errors::Result;
use crate::models::{
    ErrorCode,
    classes::entities::ClassDetail,
    instructors::entities::Instructor,
    users::entities::{Principal, UserRole},
};
use crate::services::attendance::access::{AccessDecision, AttendanceAction, decide};
use crate::services::attendance::{ATTENDANCE_INDEX_PATH, redirect_response};
use crate::storage::Storage;

use super::create_error_response;

#[derive(Clone)]
pub struct RequireAttendanceAccess {
    action: AttendanceAction,
}

impl RequireAttendanceAccess {
    pub fn new(action: AttendanceAction) -> Self {
        Self { action }
    }

    pub fn view() -> Self {
        Self::new(AttendanceAction::View)
    }

    pub fn modify() -> Self {
        Self::new(AttendanceAction::Modify)
    }

    /// 取出中间件解析好的班级
    pub fn extract_class(req: &actix_web::HttpRequest) -> Option<ClassDetail> {
        req.extensions().get::<ClassDetail>().cloned()
    }
}

// 加载判定所需的数据：班级详情与（教师账号的）教师档案
async fn load_context(
    storage: &Arc<dyn Storage>,
    principal: Option<&Principal>,
    class_id: Option<i64>,
) -> Result<(Option<ClassDetail>, Option<Instructor>)> {
    let class = match class_id {
        Some(id) => storage.get_class_detail(id).await?,
        None => None,
    };

    let linked = match principal {
        Some(p) if p.role == UserRole::Instructor => storage.get_instructor_by_user_id(p.id).await?,
        _ => None,
    };

    Ok((class, linked))
}

impl<S, B> Transform<S, ServiceRequest> for RequireAttendanceAccess
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireAttendanceAccessMiddleware<S>;
    type Future = Ready<std::result::Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireAttendanceAccessMiddleware {
            service: Rc::new(service),
            action: self.action,
        }))
    }
}

pub struct RequireAttendanceAccessMiddleware<S> {
    service: Rc<S>,
    action: AttendanceAction,
}

impl<S, B> Service<ServiceRequest> for RequireAttendanceAccessMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, std::result::Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<std::result::Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let action = self.action;

        Box::pin(async move {
            let principal = req.extensions().get::<Principal>().cloned();
            let class_id = req
                .match_info()
                .get("class_id")
                .and_then(|s| s.parse::<i64>().ok());

            let Some(storage) = req
                .app_data::<web::Data<Arc<dyn Storage>>>()
                .map(|data| data.get_ref().clone())
            else {
                error!("Storage not found in app data");
                return Ok(req.into_response(
                    create_error_response(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ErrorCode::InternalServerError,
                        "Storage unavailable",
                    )
                    .map_into_right_body(),
                ));
            };

            let (class, linked) =
                match load_context(&storage, principal.as_ref(), class_id).await {
                    Ok(ctx) => ctx,
                    Err(e) => {
                        error!("Attendance access lookup failed for {}: {}", req.path(), e);
                        return Ok(req.into_response(
                            redirect_response(
                                ATTENDANCE_INDEX_PATH,
                                ErrorCode::InternalServerError,
                                "Failed to load class",
                            )
                            .map_into_right_body(),
                        ));
                    }
                };

            match decide(
                principal.as_ref(),
                action,
                class.as_ref().map(|c| &c.class),
                linked.as_ref(),
            ) {
                AccessDecision::Allow => {
                    if let Some(class) = class {
                        debug!("Attendance {:?} allowed for class {}", action, class.id());
                        req.extensions_mut().insert(class);
                    }
                    Ok(srv.call(req).await?.map_into_left_body())
                }
                AccessDecision::Deny(reason) => {
                    info!(
                        "Attendance {:?} denied for user {:?} on {}: {}",
                        action,
                        principal.as_ref().map(|p| p.id),
                        req.path(),
                        reason.message()
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::FORBIDDEN,
                            ErrorCode::AttendancePermissionDenied,
                            &format!("Access denied: {}", reason.message()),
                        )
                        .map_into_right_body(),
                    ))
                }
                AccessDecision::NotFound => Ok(req.into_response(
                    redirect_response(
                        ATTENDANCE_INDEX_PATH,
                        ErrorCode::ClassNotFound,
                        "Class not found",
                    )
                    .map_into_right_body(),
                )),
            }
        })
    }
}
