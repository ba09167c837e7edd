//! 路径参数安全提取器
//!
//! 将路径中的 ID 解析为正整数，非法时直接返回统一格式的 400 响应。

use actix_web::dev::Payload;
use actix_web::error::InternalError;
use actix_web::{FromRequest, HttpRequest, HttpResponse};
use futures_util::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

fn parse_path_id(req: &HttpRequest, param: &str) -> Result<i64, actix_web::Error> {
    req.match_info()
        .get(param)
        .and_then(|v| v.parse::<i64>().ok())
        .filter(|id| *id > 0)
        .ok_or_else(|| {
            let message = format!("Invalid path parameter: {param}");
            InternalError::from_response(
                message.clone(),
                HttpResponse::BadRequest()
                    .json(ApiResponse::error_empty(ErrorCode::BadRequest, message)),
            )
            .into()
        })
}

macro_rules! define_safe_id {
    ($name:ident, $param:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name(pub i64);

        impl FromRequest for $name {
            type Error = actix_web::Error;
            type Future = Ready<Result<Self, Self::Error>>;

            fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                ready(parse_path_id(req, $param).map($name))
            }
        }
    };
}

// `/{id}`
define_safe_id!(SafeIDI64, "id");
// `/classes/{class_id}`
define_safe_id!(SafeClassIdI64, "class_id");

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn test_extracts_positive_id() {
        let (req, mut payload) = TestRequest::default()
            .param("class_id", "12")
            .to_http_parts();
        let id = SafeClassIdI64::from_request(&req, &mut payload)
            .await
            .unwrap();
        assert_eq!(id.0, 12);
    }

    #[actix_web::test]
    async fn test_rejects_invalid_id() {
        for raw in ["abc", "0", "-3"] {
            let (req, mut payload) = TestRequest::default().param("id", raw).to_http_parts();
            assert!(SafeIDI64::from_request(&req, &mut payload).await.is_err());
        }
    }
}
