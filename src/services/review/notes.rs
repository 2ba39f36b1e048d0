use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ReviewService;
use crate::models::auth::Actor;
use crate::models::submissions::entities::normalize_notes;
use crate::models::submissions::requests::UpdateNotesRequest;
use crate::models::submissions::responses::SubmissionResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;
use crate::services::submissions::policy;

/// 备注在任何状态下都可以修改，不改变审核状态
pub async fn update_notes(
    service: &ReviewService,
    request: &HttpRequest,
    actor: Actor,
    submission_id: i64,
    req: UpdateNotesRequest,
) -> ActixResult<HttpResponse> {
    if let Err(e) = policy::ensure_can_review(&actor) {
        return Ok(error_response(e, ErrorCode::SubmissionUpdateFailed));
    }

    let storage = service.get_storage(request);

    match storage
        .update_submission_notes(submission_id, normalize_notes(req.notes))
        .await
    {
        Ok(Some(submission)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            SubmissionResponse { submission },
            "备注已更新",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::SubmissionNotFound,
            "提交不存在",
        ))),
        Err(e) => Ok(error_response(e, ErrorCode::SubmissionUpdateFailed)),
    }
}
