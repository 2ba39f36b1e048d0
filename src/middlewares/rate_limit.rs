//! 固定窗口限流
//!
//! 已登录的请求按用户计数，匿名请求按客户端 IP 计数。每个限流器有自己的
//! 前缀，登录与上传互不影响。超过限制时返回 429，并在 `Retry-After`
//! 中给出距离窗口结束的秒数。
//!
//! ```rust,ignore
//! web::resource("/login")
//!     .wrap(RateLimit::login())
//!     .route(web::post().to(login))
//! ```

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    http::header::{HeaderName, HeaderValue, RETRY_AFTER},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use moka::future::Cache;
use once_cell::sync::Lazy;
use std::net::IpAddr;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::warn;

use super::create_error_response;
use crate::models::ErrorCode;
use crate::models::users::entities::User;

/// 条目最长存活时间，需不小于任何限流器的窗口
const MAX_WINDOW: Duration = Duration::from_secs(3600);

/// 窗口计数：窗口开始时间与已处理请求数
#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    hits: u32,
}

static WINDOWS: Lazy<Cache<String, Window>> = Lazy::new(|| {
    Cache::builder()
        .time_to_live(MAX_WINDOW)
        .max_capacity(100_000)
        .build()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Allowed { remaining: u32 },
    Limited { retry_after: u64 },
}

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
            window: Duration::from_secs(window_secs).min(MAX_WINDOW),
            scope,
        }
    }

    /// 登录：每分钟 5 次
    pub fn login() -> Self {
        Self::new("login", 5, 60)
    }

    /// 注册：每分钟 3 次
    pub fn register() -> Self {
        Self::new("register", 3, 60)
    }

    /// 刷新令牌：每分钟 10 次
    pub fn refresh_token() -> Self {
        Self::new("refresh", 10, 60)
    }

    /// 文档上传：每分钟 10 次
    pub fn file_upload() -> Self {
        Self::new("upload", 10, 60)
    }

    /// 根据已有窗口计算本次请求的结果和新的窗口
    fn judge(&self, current: Option<Window>, now: Instant) -> (Verdict, Window) {
        let window = match current {
            Some(w) if now.duration_since(w.started) < self.window => w,
            _ => Window {
                started: now,
                hits: 0,
            },
        };

        if window.hits >= self.max_requests {
            let elapsed = now.duration_since(window.started);
            let retry_after = self.window.saturating_sub(elapsed).as_secs().max(1);
            return (Verdict::Limited { retry_after }, window);
        }

        let next = Window {
            hits: window.hits + 1,
            ..window
        };
        (
            Verdict::Allowed {
                remaining: self.max_requests - next.hits,
            },
            next,
        )
    }
}

/// 客户端 IP，优先使用连接信息解析出的地址（已考虑 Forwarded / X-Forwarded-For）
fn client_ip(req: &ServiceRequest) -> String {
    req.connection_info()
        .realip_remote_addr()
        .and_then(parse_ip)
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// 解析 IP，容忍 `ip:port` 与 `[v6]:port` 形式
fn parse_ip(raw: &str) -> Option<IpAddr> {
    let raw = raw.trim();
    if let Ok(ip) = raw.parse::<IpAddr>() {
        return Some(ip);
    }
    raw.parse::<std::net::SocketAddr>().ok().map(|addr| addr.ip())
}

fn limit_key(scope: &str, req: &ServiceRequest) -> String {
    match req.extensions().get::<User>() {
        Some(user) => format!("{scope}:user:{}", user.id),
        None => format!("{scope}:ip:{}", client_ip(req)),
    }
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
            limit: self.clone(),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    limit: RateLimit,
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
            let key = limit_key(limit.scope, &req);
            let (verdict, window) = limit.judge(WINDOWS.get(&key).await, Instant::now());
            WINDOWS.insert(key.clone(), window).await;

            match verdict {
                Verdict::Limited { retry_after } => {
                    warn!("Rate limit exceeded for {} ({} requests)", key, window.hits);
                    let mut resp = create_error_response(
                        StatusCode::TOO_MANY_REQUESTS,
                        ErrorCode::RateLimitExceeded,
                        "请求过于频繁，请稍后再试",
                    );
                    resp.headers_mut()
                        .insert(RETRY_AFTER, HeaderValue::from(retry_after));
                    Ok(req.into_response(resp.map_into_right_body()))
                }
                Verdict::Allowed { remaining } => {
                    let mut res = srv.call(req).await?;
                    res.headers_mut().insert(
                        HeaderName::from_static("x-ratelimit-remaining"),
                        HeaderValue::from(remaining),
                    );
                    Ok(res.map_into_left_body())
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_counts_down_then_limits() {
        let limit = RateLimit::new("test", 2, 60);
        let now = Instant::now();

        let (v1, w1) = limit.judge(None, now);
        assert_eq!(v1, Verdict::Allowed { remaining: 1 });
        let (v2, w2) = limit.judge(Some(w1), now + Duration::from_secs(1));
        assert_eq!(v2, Verdict::Allowed { remaining: 0 });
        let (v3, _) = limit.judge(Some(w2), now + Duration::from_secs(20));
        assert_eq!(v3, Verdict::Limited { retry_after: 40 });
    }

    #[test]
    fn test_window_resets_after_expiry() {
        let limit = RateLimit::login();
        let now = Instant::now();
        let full = Window {
            started: now,
            hits: 5,
        };
        let (verdict, window) = limit.judge(Some(full), now + Duration::from_secs(61));
        assert_eq!(verdict, Verdict::Allowed { remaining: 4 });
        assert_eq!(window.hits, 1);
    }

    #[test]
    fn test_parse_ip_forms() {
        assert_eq!(parse_ip("10.0.0.1"), "10.0.0.1".parse().ok());
        assert_eq!(parse_ip("10.0.0.1:8080"), "10.0.0.1".parse().ok());
        assert_eq!(parse_ip("[::1]:443"), "::1".parse().ok());
        assert_eq!(parse_ip("unknown"), None);
    }
}
