use actix_web::{HttpResponse, Result as ActixResult};

use super::ProjectService;
use crate::models::ApiResponse;

pub async fn list_programs(service: &ProjectService) -> ActixResult<HttpResponse> {
    let programs = service.get_config().portal.study_programs.clone();
    Ok(HttpResponse::Ok().json(ApiResponse::success(programs, "获取成功")))
}
