pub mod auth;
pub mod files;
pub mod projects;
pub mod review;
pub mod submissions;
pub mod users;

pub use auth::AuthService;
pub use files::FileService;
pub use projects::ProjectService;
pub use review::ReviewService;
pub use submissions::SubmissionService;
pub use users::UserService;

use actix_web::{HttpRequest, HttpResponse, http::StatusCode, web};
use std::sync::Arc;

use crate::errors::PortalError;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

/// 取出 main 中注册的存储实例
pub(crate) fn app_storage(request: &HttpRequest) -> Arc<dyn Storage> {
    request
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .expect("Storage not found in app data")
        .get_ref()
        .clone()
}

/// 把业务错误转换为统一响应
///
/// 校验失败 400，未认证 401，无权限 403，不存在 404，状态冲突 409，
/// 其余按 500 处理并使用 `failed` 作为错误码。
pub(crate) fn error_response(err: PortalError, failed: ErrorCode) -> HttpResponse {
    let (status, code) = match &err {
        PortalError::Validation(_) => (StatusCode::BAD_REQUEST, ErrorCode::BadRequest),
        PortalError::Authentication(_) => (StatusCode::UNAUTHORIZED, ErrorCode::Unauthorized),
        PortalError::Authorization(_) => (StatusCode::FORBIDDEN, ErrorCode::Forbidden),
        PortalError::NotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NotFound),
        PortalError::Workflow(_) => (StatusCode::CONFLICT, ErrorCode::SubmissionNotEditable),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, failed),
    };

    if status.is_server_error() {
        tracing::error!("{}", err.format_simple());
    } else {
        tracing::info!("{}", err.format_simple());
    }

    HttpResponse::build(status).json(ApiResponse::error_empty(code, err.message()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        let cases = [
            (PortalError::validation("x"), StatusCode::BAD_REQUEST),
            (PortalError::authentication("x"), StatusCode::UNAUTHORIZED),
            (PortalError::authorization("x"), StatusCode::FORBIDDEN),
            (PortalError::not_found("x"), StatusCode::NOT_FOUND),
            (PortalError::workflow("x"), StatusCode::CONFLICT),
            (
                PortalError::database_operation("x"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(
                error_response(err, ErrorCode::InternalServerError).status(),
                status
            );
        }
    }
}
