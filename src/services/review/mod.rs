//! 管理员审核服务
//!
//! 路由层已经通过 RequireRole 限制为管理员，这里仍然对每个写操作调用
//! `policy::ensure_can_review`，避免服务被其他入口复用时越权。

pub mod decide;
pub mod list;
pub mod notes;
pub mod stats;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::listing::ListingParams;
use crate::models::auth::Actor;
use crate::models::submissions::requests::{ReviewRequest, UpdateNotesRequest};
use crate::storage::Storage;

pub struct ReviewService {
    storage: Option<Arc<dyn Storage>>,
}

impl ReviewService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        self.storage
            .clone()
            .unwrap_or_else(|| super::app_storage(request))
    }

    /// 全部提交（含提交者资料）
    pub async fn list_submissions(
        &self,
        request: &HttpRequest,
        params: ListingParams,
    ) -> ActixResult<HttpResponse> {
        list::list_submissions(self, request, params).await
    }

    /// 各状态数量
    pub async fn get_stats(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        stats::get_stats(self, request).await
    }

    /// 通过或驳回
    pub async fn review_submission(
        &self,
        request: &HttpRequest,
        actor: Actor,
        submission_id: i64,
        req: ReviewRequest,
    ) -> ActixResult<HttpResponse> {
        decide::review_submission(self, request, actor, submission_id, req).await
    }

    /// 修改审核备注
    pub async fn update_notes(
        &self,
        request: &HttpRequest,
        actor: Actor,
        submission_id: i64,
        req: UpdateNotesRequest,
    ) -> ActixResult<HttpResponse> {
        notes::update_notes(self, request, actor, submission_id, req).await
    }
}
