/*!
 * JWT 认证中间件
 *
 * 校验 `Authorization: Bearer <token>`，并把当前身份 [`Principal`] 放入请求扩展。
 *
 * ```rust,ignore
 * web::scope("/api/v1/attendance")
 *     .wrap(RequireJWT)
 *     .route("", web::get().to(index));
 *
 * async fn index(req: HttpRequest) -> HttpResponse {
 *     let principal = RequireJWT::extract_principal(&req);
 *     // ...
 * }
 * ```
 *
 * 已解析的身份按 token 缓存在 moka 中，TTL 为 `cache.default_ttl`。
 */

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::models::ErrorCode;
use crate::models::users::entities::Principal;
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{fmt, rc::Rc, sync::Arc};
use tracing::{debug, error, info};

use super::create_error_response;

#[derive(Clone)]
pub struct RequireJWT;

/// 认证失败原因，统一返回 401
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuthFailure {
    MissingToken,
    InvalidToken,
    UnknownUser,
    BackendUnavailable,
}

impl fmt::Display for AuthFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AuthFailure::MissingToken => "Missing or invalid Authorization header",
            AuthFailure::InvalidToken => "Invalid JWT token",
            AuthFailure::UnknownUser => "User not found",
            AuthFailure::BackendUnavailable => "Authentication backend unavailable",
        })
    }
}

fn principal_cache_key(token: &str) -> String {
    format!("principal:{token}")
}

// 身份先查缓存，未命中再按 token 中的用户 ID 读库
async fn authenticate(req: &ServiceRequest) -> Result<Principal, AuthFailure> {
    let token =
        JwtUtils::extract_bearer_token(req.request()).ok_or(AuthFailure::MissingToken)?;

    let claims = JwtUtils::verify_access_token(&token).map_err(|err| {
        info!("JWT token validation failed: {}", err);
        AuthFailure::InvalidToken
    })?;

    let cache = req
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .map(|data| data.get_ref().clone());

    let key = principal_cache_key(&token);
    if let Some(cache) = &cache
        && let CacheResult::Found(json) = cache.get_raw(&key).await
    {
        match serde_json::from_str::<Principal>(&json) {
            Ok(principal) => return Ok(principal),
            Err(_) => cache.remove(&key).await,
        }
    }

    let storage = req
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| {
            error!("Storage not found in app data");
            AuthFailure::BackendUnavailable
        })?;

    let user_id = claims.user_id().ok_or(AuthFailure::InvalidToken)?;

    let user = storage
        .get_user_by_id(user_id)
        .await
        .map_err(|e| {
            error!("Failed to load user {}: {}", user_id, e);
            AuthFailure::BackendUnavailable
        })?
        .ok_or(AuthFailure::UnknownUser)?;

    let principal = Principal::from(&user);

    if let Some(cache) = &cache
        && let Ok(json) = serde_json::to_string(&principal)
    {
        cache
            .insert_raw(key, json, AppConfig::get().cache.default_ttl)
            .await;
    }

    Ok(principal)
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            // 预检请求直接返回
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(
                    req.into_response(HttpResponse::NoContent().finish().map_into_right_body())
                );
            }

            match authenticate(&req).await {
                Ok(principal) => {
                    debug!("Authenticated {} ({})", principal.username, principal.role);
                    req.extensions_mut().insert(principal);
                    Ok(srv.call(req).await?.map_into_left_body())
                }
                Err(err) => {
                    info!("Rejected request to {}: {}", req.path(), err);
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            &format!("Unauthorized: {err}"),
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

impl RequireJWT {
    /// 从请求扩展中取出当前身份
    pub fn extract_principal(req: &actix_web::HttpRequest) -> Option<Principal> {
        req.extensions().get::<Principal>().cloned()
    }

    pub fn extract_user_id(req: &actix_web::HttpRequest) -> Option<i64> {
        req.extensions().get::<Principal>().map(|p| p.id)
    }

    /// 注销时清除缓存中的身份
    pub async fn forget_token(cache: &Arc<dyn ObjectCache>, token: &str) {
        cache.remove(&principal_cache_key(token)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_messages() {
        assert_eq!(
            AuthFailure::MissingToken.to_string(),
            "Missing or invalid Authorization header"
        );
        assert_eq!(AuthFailure::UnknownUser.to_string(), "User not found");
    }

    #[test]
    fn test_principal_cache_key_is_per_token() {
        assert_ne!(principal_cache_key("a"), principal_cache_key("b"));
        assert!(principal_cache_key("abc").ends_with("abc"));
    }
}
