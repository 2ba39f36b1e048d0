//! 路径参数提取器
//!
//! 非法参数直接返回统一格式的 400 响应，不进入业务处理。

use actix_web::{
    FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError,
};
use futures_util::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

fn bad_path(message: String) -> actix_web::Error {
    let response = HttpResponse::BadRequest().json(ApiResponse::error_empty(
        ErrorCode::BadRequest,
        message.clone(),
    ));
    InternalError::from_response(message, response).into()
}

/// 路径中的正整数 `{id}`
#[derive(Debug, Clone, Copy)]
pub struct SafeIDI64(pub i64);

impl FromRequest for SafeIDI64 {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let raw = req.match_info().get("id").unwrap_or_default();
        ready(match raw.parse::<i64>() {
            Ok(id) if id > 0 => Ok(SafeIDI64(id)),
            _ => Err(bad_path(format!("Invalid id: {raw}"))),
        })
    }
}

/// 路径中的文件 `{token}`，必须是 UUID
#[derive(Debug, Clone)]
pub struct SafeFileToken(pub String);

impl FromRequest for SafeFileToken {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let raw = req.match_info().get("token").unwrap_or_default();
        ready(match uuid::Uuid::parse_str(raw) {
            Ok(token) => Ok(SafeFileToken(token.to_string())),
            Err(_) => Err(bad_path(format!("Invalid file token: {raw}"))),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn test_safe_id_accepts_positive() {
        let req = TestRequest::default().param("id", "42").to_http_request();
        let id = SafeIDI64::extract(&req).await.unwrap();
        assert_eq!(id.0, 42);
    }

    #[actix_web::test]
    async fn test_safe_id_rejects_invalid() {
        for raw in ["0", "-3", "abc", "1; DROP TABLE"] {
            let req = TestRequest::default().param("id", raw).to_http_request();
            assert!(SafeIDI64::extract(&req).await.is_err());
        }
    }

    #[actix_web::test]
    async fn test_file_token_must_be_uuid() {
        let token = uuid::Uuid::new_v4().to_string();
        let req = TestRequest::default()
            .param("token", token.clone())
            .to_http_request();
        assert_eq!(SafeFileToken::extract(&req).await.unwrap().0, token);

        let req = TestRequest::default()
            .param("token", "../../etc/passwd")
            .to_http_request();
        assert!(SafeFileToken::extract(&req).await.is_err());
    }
}
