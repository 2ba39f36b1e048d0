use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{SubmissionService, policy};
use crate::models::auth::Actor;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;

pub async fn delete_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    actor: Actor,
    submission_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_submission_by_id(submission_id).await {
        Ok(Some(current)) => {
            if let Err(e) = policy::ensure_can_delete(&actor, &current) {
                return Ok(error_response(e, ErrorCode::SubmissionUpdateFailed));
            }
        }
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::SubmissionNotFound,
                "提交不存在",
            )));
        }
        Err(e) => return Ok(error_response(e, ErrorCode::SubmissionUpdateFailed)),
    }

    match storage
        .delete_pending_submission(submission_id, actor.id())
        .await
    {
        Ok(()) => {
            info!("Submission {} deleted by user {}", submission_id, actor.id());
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("提交已删除")))
        }
        Err(e) => Ok(error_response(e, ErrorCode::SubmissionUpdateFailed)),
    }
}
