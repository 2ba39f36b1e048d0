use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{SubmissionService, policy};
use crate::errors::Result;
use crate::models::auth::Actor;
use crate::models::submissions::requests::CreateSubmissionRequest;
use crate::models::submissions::responses::SubmissionResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;
use crate::utils::validate::validate_study_program;

/// 校验提交内容并补全文档地址
pub(crate) fn prepare_submission(
    service: &SubmissionService,
    req: CreateSubmissionRequest,
) -> Result<CreateSubmissionRequest> {
    let mut req = req.normalized()?;
    validate_study_program(&req.program_study)?;
    req.document_url = req
        .document_token
        .as_deref()
        .map(|token| service.get_config().document_url(token));
    Ok(req)
}

pub async fn create_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    actor: Actor,
    req: CreateSubmissionRequest,
) -> ActixResult<HttpResponse> {
    if let Err(e) = policy::ensure_can_create(&actor) {
        return Ok(error_response(e, ErrorCode::SubmissionCreationFailed));
    }

    let req = match prepare_submission(service, req) {
        Ok(req) => req,
        Err(e) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::SubmissionInvalid,
                e.message(),
            )));
        }
    };

    let storage = service.get_storage(request);
    match storage.create_submission(actor.id(), req).await {
        Ok(submission) => {
            info!(
                "Submission {} created by user {}",
                submission.id,
                actor.id()
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                SubmissionResponse { submission },
                "项目提交成功",
            )))
        }
        Err(e) => Ok(error_response(e, ErrorCode::SubmissionCreationFailed)),
    }
}
