use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use super::submissions::current_actor;
use crate::listing::ListingParams;
use crate::middlewares;
use crate::models::submissions::requests::{ReviewRequest, UpdateNotesRequest};
use crate::models::users::entities::UserRole;
use crate::services::ReviewService;
use crate::utils::SafeIDI64;

// 懒加载的全局 ReviewService 实例
static REVIEW_SERVICE: Lazy<ReviewService> = Lazy::new(ReviewService::new_lazy);

pub async fn list_submissions(
    req: HttpRequest,
    query: web::Query<ListingParams>,
) -> ActixResult<HttpResponse> {
    REVIEW_SERVICE
        .list_submissions(&req, query.into_inner())
        .await
}

pub async fn get_stats(req: HttpRequest) -> ActixResult<HttpResponse> {
    REVIEW_SERVICE.get_stats(&req).await
}

pub async fn review_submission(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<ReviewRequest>,
) -> ActixResult<HttpResponse> {
    let actor = match current_actor(&req) {
        Ok(actor) => actor,
        Err(resp) => return Ok(resp),
    };
    REVIEW_SERVICE
        .review_submission(&req, actor, id.0, body.into_inner())
        .await
}

pub async fn update_notes(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateNotesRequest>,
) -> ActixResult<HttpResponse> {
    let actor = match current_actor(&req) {
        Ok(actor) => actor,
        Err(resp) => return Ok(resp),
    };
    REVIEW_SERVICE
        .update_notes(&req, actor, id.0, body.into_inner())
        .await
}

// 配置路由
pub fn configure_admin_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/admin/submissions")
            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_submissions))
            .route("/stats", web::get().to(get_stats))
            .route("/{id}/review", web::post().to(review_submission))
            .route("/{id}/notes", web::put().to(update_notes)),
    );
}
