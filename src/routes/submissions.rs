use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::listing::ListingParams;
use crate::middlewares::{self, RequireJWT};
use crate::models::auth::Actor;
use crate::models::submissions::requests::{CreateSubmissionRequest, UpdateSubmissionRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::SubmissionService;
use crate::utils::SafeIDI64;

// 懒加载的全局 SubmissionService 实例
static SUBMISSION_SERVICE: Lazy<SubmissionService> = Lazy::new(SubmissionService::new_lazy);

/// 取出当前操作者，中间件未注入用户时返回 401 响应
pub(crate) fn current_actor(req: &HttpRequest) -> Result<Actor, HttpResponse> {
    RequireJWT::extract_actor(req).ok_or_else(|| {
        HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "无法获取用户信息",
        ))
    })
}

// 我的提交
pub async fn list_my_submissions(
    req: HttpRequest,
    query: web::Query<ListingParams>,
) -> ActixResult<HttpResponse> {
    let actor = match current_actor(&req) {
        Ok(actor) => actor,
        Err(resp) => return Ok(resp),
    };
    SUBMISSION_SERVICE
        .list_my_submissions(&req, actor, query.into_inner())
        .await
}

// 创建提交
pub async fn create_submission(
    req: HttpRequest,
    body: web::Json<CreateSubmissionRequest>,
) -> ActixResult<HttpResponse> {
    let actor = match current_actor(&req) {
        Ok(actor) => actor,
        Err(resp) => return Ok(resp),
    };
    SUBMISSION_SERVICE
        .create_submission(&req, actor, body.into_inner())
        .await
}

// 获取提交详情
pub async fn get_submission(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    let actor = match current_actor(&req) {
        Ok(actor) => actor,
        Err(resp) => return Ok(resp),
    };
    SUBMISSION_SERVICE.get_submission(&req, actor, id.0).await
}

// 修改提交
pub async fn update_submission(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateSubmissionRequest>,
) -> ActixResult<HttpResponse> {
    let actor = match current_actor(&req) {
        Ok(actor) => actor,
        Err(resp) => return Ok(resp),
    };
    SUBMISSION_SERVICE
        .update_submission(&req, actor, id.0, body.into_inner())
        .await
}

// 删除提交
pub async fn delete_submission(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    let actor = match current_actor(&req) {
        Ok(actor) => actor,
        Err(resp) => return Ok(resp),
    };
    SUBMISSION_SERVICE.delete_submission(&req, actor, id.0).await
}

// 配置路由
pub fn configure_submissions_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/submissions")
            .wrap(middlewares::RequireJWT)
            .route("/my", web::get().to(list_my_submissions))
            .route("", web::post().to(create_submission))
            .route("/{id}", web::get().to(get_submission))
            .route("/{id}", web::put().to(update_submission))
            .route("/{id}", web::delete().to(delete_submission)),
    );
}
