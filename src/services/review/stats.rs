use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ReviewService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;

pub async fn get_stats(service: &ReviewService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.submission_stats().await {
        Ok(stats) => Ok(HttpResponse::Ok().json(ApiResponse::success(stats, "获取成功"))),
        Err(e) => Ok(error_response(e, ErrorCode::InternalServerError)),
    }
}
