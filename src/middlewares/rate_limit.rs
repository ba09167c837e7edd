//! 固定窗口速率限制
//!
//! 计数保存在进程内的 moka 缓存中。已认证请求按用户计数，匿名请求按客户端 IP 计数；
//! 不同端点通过前缀隔离。超过限制时返回 429 与 `Retry-After`。

use std::fmt;
use std::net::IpAddr;
use std::rc::Rc;
use std::time::{Duration, Instant};

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::header::{HeaderName, HeaderValue, RETRY_AFTER},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use moka::future::Cache;
use once_cell::sync::Lazy;
use tracing::warn;

use crate::models::users::entities::Principal;
use crate::models::{ApiResponse, ErrorCode};

// 最长窗口之后条目自然过期
static WINDOWS: Lazy<Cache<String, Window>> = Lazy::new(|| {
    Cache::builder()
        .time_to_idle(Duration::from_secs(300))
        .max_capacity(100_000)
        .build()
});

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

impl Window {
    fn fresh(now: Instant) -> Self {
        Self {
            started: now,
            count: 0,
        }
    }

    // 窗口已过期则从零开始
    fn advance(self, now: Instant, window: Duration) -> Self {
        if now.duration_since(self.started) >= window {
            Self::fresh(now)
        } else {
            self
        }
    }

    fn retry_after(&self, now: Instant, window: Duration) -> u64 {
        window
            .saturating_sub(now.duration_since(self.started))
            .as_secs()
            .max(1)
    }
}

/// 计数主体
#[derive(Debug, Clone, PartialEq, Eq)]
enum Subject {
    User(i64),
    Ip(String),
}

impl Subject {
    fn of(req: &ServiceRequest) -> Self {
        if let Some(id) = req.extensions().get::<Principal>().map(|p| p.id) {
            return Subject::User(id);
        }
        Subject::Ip(client_ip(req))
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::User(id) => write!(f, "user:{id}"),
            Subject::Ip(ip) => write!(f, "ip:{ip}"),
        }
    }
}

// 依次尝试 Forwarded/X-Forwarded-For 解析结果与 X-Real-IP，只接受合法 IP
fn client_ip(req: &ServiceRequest) -> String {
    let info = req.connection_info();
    let candidates = [
        info.realip_remote_addr().map(str::to_string),
        req.headers()
            .get("X-Real-IP")
            .and_then(|v| v.to_str().ok())
            .map(|v| v.trim().to_string()),
    ];

    candidates
        .into_iter()
        .flatten()
        .find(|ip| ip.parse::<IpAddr>().is_ok())
        .unwrap_or_else(|| "unknown".to_string())
}

/// 速率限制配置
#[derive(Clone)]
pub struct RateLimit {
    max_requests: u32,
    window: Duration,
    scope: &'static str,
}

impl RateLimit {
    pub fn new(scope: &'static str, max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window: Duration::from_secs(window_secs),
            scope,
        }
    }

    /// 登录：5次/分钟
    pub fn login() -> Self {
        Self::new("login", 5, 60)
    }

    /// 注册：3次/分钟
    pub fn register() -> Self {
        Self::new("register", 3, 60)
    }

    pub fn refresh_token() -> Self {
        Self::new("refresh", 10, 60)
    }

    fn key(&self, subject: &Subject) -> String {
        format!("{}:{}", self.scope, subject)
    }
}

fn too_many_requests(retry_after: u64) -> HttpResponse {
    HttpResponse::TooManyRequests()
        .insert_header((RETRY_AFTER, retry_after.to_string()))
        .insert_header(("X-RateLimit-Remaining", "0"))
        .json(ApiResponse::<()>::error_empty(
            ErrorCode::RateLimitExceeded,
            "Too many requests. Please try again later.",
        ))
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            limit: Rc::new(self.clone()),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    limit: Rc<RateLimit>,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
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
        let limit = self.limit.clone();

        Box::pin(async move {
            let key = limit.key(&Subject::of(&req));
            let now = Instant::now();

            let window = WINDOWS
                .get(&key)
                .await
                .unwrap_or_else(|| Window::fresh(now))
                .advance(now, limit.window);

            if window.count >= limit.max_requests {
                warn!(
                    "Rate limit exceeded for {} ({}/{})",
                    key, window.count, limit.max_requests
                );
                let retry_after = window.retry_after(now, limit.window);
                return Ok(req.into_response(too_many_requests(retry_after).map_into_right_body()));
            }

            let window = Window {
                count: window.count + 1,
                ..window
            };
            WINDOWS.insert(key, window).await;
            let remaining = limit.max_requests.saturating_sub(window.count);

            let mut res = srv.call(req).await?.map_into_left_body();
            let headers = res.headers_mut();
            headers.insert(
                HeaderName::from_static("x-ratelimit-limit"),
                HeaderValue::from(limit.max_requests),
            );
            headers.insert(
                HeaderName::from_static("x-ratelimit-remaining"),
                HeaderValue::from(remaining),
            );
            Ok(res)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_scoped() {
        let login = RateLimit::login();
        assert_eq!(
            login.key(&Subject::Ip("10.0.0.1".into())),
            "login:ip:10.0.0.1"
        );
        assert_eq!(
            RateLimit::refresh_token().key(&Subject::User(5)),
            "refresh:user:5"
        );
    }

    #[test]
    fn test_presets() {
        let login = RateLimit::login();
        assert_eq!(login.max_requests, 5);
        assert_eq!(login.window, Duration::from_secs(60));

        assert_eq!(RateLimit::register().max_requests, 3);
        assert_eq!(RateLimit::refresh_token().max_requests, 10);
    }

    #[test]
    fn test_window_resets_after_expiry() {
        let start = Instant::now();
        let window = Window { started: start, count: 4 };
        let minute = Duration::from_secs(60);

        assert_eq!(window.advance(start + Duration::from_secs(10), minute).count, 4);
        assert_eq!(window.advance(start + minute, minute).count, 0);
        assert_eq!(window.retry_after(start + Duration::from_secs(45), minute), 15);
        assert_eq!(window.retry_after(start + minute, minute), 1);
    }
}
