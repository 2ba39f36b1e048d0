/*!
 * JWT 认证中间件
 *
 * 校验 `Authorization: Bearer <token>`，解析出的用户写入请求扩展。
 * 处理程序通过 [`RequireJWT::extract_actor`] 取得本次请求的 [`Actor`]。
 *
 * ```rust,ignore
 * web::scope("/api/v1/submissions")
 *     .wrap(RequireJWT)
 *     .route("/my", web::get().to(list_my_submissions))
 * ```
 *
 * 用户信息按 token 缓存在 `ObjectCache` 中，键为 `user:{token}`；
 * 个人资料更新后会删除该键。
 */

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::errors::{PortalError, Result};
use crate::models::ErrorCode;
use crate::models::auth::Actor;
use crate::models::users::entities::User;
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpRequest,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    http::header::AUTHORIZATION,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, info};

use super::create_error_response;

const BEARER_PREFIX: &str = "Bearer ";

#[derive(Clone)]
pub struct RequireJWT;

/// 用户缓存键
pub fn user_cache_key(token: &str) -> String {
    format!("user:{token}")
}

fn bearer_token(headers: &actix_web::http::header::HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

// 校验 access token 并解析用户，优先读缓存
async fn authenticate(req: &ServiceRequest) -> Result<User> {
    let token = bearer_token(req.headers())
        .ok_or_else(|| PortalError::authentication("Missing or invalid Authorization header"))?;

    let claims = JwtUtils::verify_access_token(token).map_err(|err| {
        info!("JWT token validation failed: {}", err);
        PortalError::authentication("Invalid JWT token")
    })?;

    let cache = req
        .app_data::<actix_web::web::Data<Arc<dyn ObjectCache>>>()
        .map(|c| c.get_ref().clone());
    let key = user_cache_key(token);

    if let Some(ref cache) = cache {
        match cache.get::<User>(&key).await {
            CacheResult::Found(user) => return Ok(user),
            _ => debug!("User cache miss for token"),
        }
    }

    let storage = req
        .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
        .ok_or_else(|| PortalError::database_config("Storage not found in app data"))?
        .get_ref()
        .clone();

    let user_id = claims
        .user_id()
        .map_err(|_| PortalError::authentication("Invalid user ID in JWT"))?;

    let user = storage
        .get_user_by_id(user_id)
        .await?
        .ok_or_else(|| PortalError::authentication("User not found"))?;

    if let Some(cache) = cache {
        cache
            .insert(key, &user, AppConfig::get().cache.default_ttl)
            .await;
    }

    Ok(user)
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
    type Future = Ready<std::result::Result<Self::Transform, Self::InitError>>;

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
    type Future = LocalBoxFuture<'static, std::result::Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<std::result::Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            // 预检请求直接放行
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(
                    create_error_response(StatusCode::NO_CONTENT, ErrorCode::Success, "")
                        .map_into_right_body(),
                ));
            }

            match authenticate(&req).await {
                Ok(user) => {
                    debug!("JWT authentication successful for ID: {}", user.id);
                    req.extensions_mut().insert(user);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(err) => {
                    info!(
                        "JWT authentication failed for request to {}: {}",
                        req.path(),
                        err.message()
                    );
                    let status = match err {
                        PortalError::Authentication(_) => StatusCode::UNAUTHORIZED,
                        _ => StatusCode::INTERNAL_SERVER_ERROR,
                    };
                    Ok(req.into_response(
                        create_error_response(
                            status,
                            ErrorCode::Unauthorized,
                            &format!("Unauthorized: {}", err.message()),
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

impl RequireJWT {
    /// 从请求扩展中提取已认证的用户
    pub fn extract_user(req: &HttpRequest) -> Option<User> {
        req.extensions().get::<User>().cloned()
    }

    pub fn extract_user_id(req: &HttpRequest) -> Option<i64> {
        req.extensions().get::<User>().map(|user| user.id)
    }

    /// 构造本次请求的操作者
    pub fn extract_actor(req: &HttpRequest) -> Option<Actor> {
        Self::extract_user(req).map(Actor::from_user)
    }

    /// 当前请求携带的 access token
    pub fn extract_token(req: &HttpRequest) -> Option<String> {
        bearer_token(req.headers()).map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_bearer_token_parsing() {
        let req = TestRequest::default()
            .insert_header((AUTHORIZATION, "Bearer abc.def.ghi"))
            .to_http_request();
        assert_eq!(RequireJWT::extract_token(&req).as_deref(), Some("abc.def.ghi"));

        let req = TestRequest::default()
            .insert_header((AUTHORIZATION, "Basic dXNlcjpwYXNz"))
            .to_http_request();
        assert!(RequireJWT::extract_token(&req).is_none());

        let req = TestRequest::default()
            .insert_header((AUTHORIZATION, "Bearer   "))
            .to_http_request();
        assert!(RequireJWT::extract_token(&req).is_none());
    }

    #[test]
    fn test_cache_key() {
        assert_eq!(user_cache_key("t0k"), "user:t0k");
    }
}
