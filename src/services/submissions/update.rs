use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{SubmissionService, policy};
use crate::errors::Result;
use crate::models::auth::Actor;
use crate::models::submissions::requests::UpdateSubmissionRequest;
use crate::models::submissions::responses::SubmissionResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;
use crate::utils::validate::validate_study_program;

fn prepare_update(
    service: &SubmissionService,
    update: UpdateSubmissionRequest,
) -> Result<UpdateSubmissionRequest> {
    let mut update = update.normalized()?;
    if let Some(ref program) = update.program_study {
        validate_study_program(program)?;
    }
    update.document_url = update
        .document_token
        .as_deref()
        .map(|token| service.get_config().document_url(token));
    Ok(update)
}

pub async fn update_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    actor: Actor,
    submission_id: i64,
    update: UpdateSubmissionRequest,
) -> ActixResult<HttpResponse> {
    let update = match prepare_update(service, update) {
        Ok(update) if !update.is_empty() => update,
        Ok(_) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::SubmissionInvalid,
                "没有需要更新的字段",
            )));
        }
        Err(e) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::SubmissionInvalid,
                e.message(),
            )));
        }
    };

    let storage = service.get_storage(request);

    // 先按当前记录给出明确的拒绝原因，存储层的条件更新兜住并发
    match storage.get_submission_by_id(submission_id).await {
        Ok(Some(current)) => {
            if let Err(e) = policy::ensure_can_edit(&actor, &current) {
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
        .update_pending_submission(submission_id, actor.id(), update)
        .await
    {
        Ok(submission) => {
            info!("Submission {} updated by user {}", submission_id, actor.id());
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                SubmissionResponse { submission },
                "提交已更新",
            )))
        }
        Err(e) => Ok(error_response(e, ErrorCode::SubmissionUpdateFailed)),
    }
}
