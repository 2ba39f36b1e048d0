use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::models::{ApiResponse, ErrorCode, users::requests::UserListParams};
use crate::services::error_response;

/// 空白关键字等同于不搜索
fn normalize_params(mut params: UserListParams) -> UserListParams {
    params.search = params
        .search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    params
}

pub async fn list_users(
    service: &UserService,
    query: UserListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_users(normalize_params(query)).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response, "获取成功"))),
        Err(e) => Ok(error_response(e, ErrorCode::InternalServerError)),
    }
}
