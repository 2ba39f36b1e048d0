use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::listing::{ListingParams, SortState, apply_owned};
use crate::models::auth::Actor;
use crate::models::submissions::listing::SubmissionSortField;
use crate::models::submissions::responses::ListingResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;

pub async fn list_my_submissions(
    service: &SubmissionService,
    request: &HttpRequest,
    actor: Actor,
    params: ListingParams,
) -> ActixResult<HttpResponse> {
    let criteria = match params.into_criteria(SortState::descending(SubmissionSortField::CreatedAt)) {
        Ok(criteria) => criteria,
        Err(e) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::ListingQueryInvalid,
                e.message(),
            )));
        }
    };

    let storage = service.get_storage(request);
    match storage.list_submissions_by_owner(actor.id()).await {
        Ok(records) => {
            let items = apply_owned(records, &criteria);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                ListingResponse::new(items, criteria.sort),
                "获取成功",
            )))
        }
        Err(e) => Ok(error_response(e, ErrorCode::InternalServerError)),
    }
}
