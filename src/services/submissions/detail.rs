use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{SubmissionService, policy};
use crate::models::auth::Actor;
use crate::models::submissions::responses::SubmissionResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;

pub async fn get_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    actor: Actor,
    submission_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let submission = match storage.get_submission_by_id(submission_id).await {
        Ok(Some(submission)) => submission,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::SubmissionNotFound,
                "提交不存在",
            )));
        }
        Err(e) => return Ok(error_response(e, ErrorCode::InternalServerError)),
    };

    if let Err(e) = policy::ensure_can_view(&actor, &submission) {
        return Ok(error_response(e, ErrorCode::InternalServerError));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        SubmissionResponse { submission },
        "获取成功",
    )))
}
