use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::warn;

use super::ProjectService;
use crate::listing::{ListingParams, SortState, apply_owned};
use crate::models::submissions::entities::SubmissionStatus;
use crate::models::submissions::listing::ShowcaseSortField;
use crate::models::submissions::responses::ListingResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;

/// 解析配置中的公开状态，无法识别的值被忽略
pub(crate) fn public_statuses(configured: &[String]) -> Vec<SubmissionStatus> {
    let mut statuses = Vec::with_capacity(configured.len());
    for raw in configured {
        match raw.trim().parse::<SubmissionStatus>() {
            Ok(status) if !statuses.contains(&status) => statuses.push(status),
            Ok(_) => {}
            Err(e) => warn!("Ignoring public status {:?}: {}", raw, e),
        }
    }
    statuses
}

pub async fn list_projects(
    service: &ProjectService,
    request: &HttpRequest,
    params: ListingParams,
) -> ActixResult<HttpResponse> {
    let criteria = match params.into_criteria(SortState::ascending(ShowcaseSortField::ProjectName))
    {
        Ok(criteria) => criteria,
        Err(e) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::ListingQueryInvalid,
                e.message(),
            )));
        }
    };

    let statuses = public_statuses(&service.get_config().portal.public_statuses);
    let storage = service.get_storage(request);

    // 状态筛选只在公开集合内生效，集合外的状态自然得到空列表
    match storage.list_public_projects(&statuses).await {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_statuses_skip_unknown_and_duplicates() {
        let configured = vec![
            "approved".to_string(),
            " pending ".to_string(),
            "archived".to_string(),
            "approved".to_string(),
        ];
        assert_eq!(
            public_statuses(&configured),
            vec![SubmissionStatus::Approved, SubmissionStatus::Pending]
        );
    }
}
