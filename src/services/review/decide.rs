use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ReviewService;
use crate::errors::PortalError;
use crate::models::auth::Actor;
use crate::models::submissions::requests::ReviewRequest;
use crate::models::submissions::responses::SubmissionResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;
use crate::services::submissions::policy;

pub async fn review_submission(
    service: &ReviewService,
    request: &HttpRequest,
    actor: Actor,
    submission_id: i64,
    req: ReviewRequest,
) -> ActixResult<HttpResponse> {
    if let Err(e) = policy::ensure_can_review(&actor) {
        return Ok(error_response(e, ErrorCode::SubmissionUpdateFailed));
    }

    let storage = service.get_storage(request);
    let notes = req.notes();

    match storage
        .review_submission(submission_id, actor.id(), req.decision, notes)
        .await
    {
        Ok(submission) => {
            info!(
                "Submission {} reviewed by admin {}: {}",
                submission_id,
                actor.id(),
                submission.status
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                SubmissionResponse { submission },
                "审核完成",
            )))
        }
        Err(PortalError::Workflow(msg)) => Ok(HttpResponse::Conflict().json(
            ApiResponse::error_empty(ErrorCode::SubmissionAlreadyReviewed, msg),
        )),
        Err(PortalError::NotFound(msg)) => Ok(HttpResponse::NotFound()
            .json(ApiResponse::error_empty(ErrorCode::SubmissionNotFound, msg))),
        Err(e) => Ok(error_response(e, ErrorCode::SubmissionUpdateFailed)),
    }
}
