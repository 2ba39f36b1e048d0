pub mod create;
pub mod delete;
pub mod detail;
pub mod list;
pub mod policy;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::listing::ListingParams;
use crate::models::auth::Actor;
use crate::models::submissions::requests::{CreateSubmissionRequest, UpdateSubmissionRequest};
use crate::storage::Storage;

pub struct SubmissionService {
    storage: Option<Arc<dyn Storage>>,
}

impl SubmissionService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        self.storage
            .clone()
            .unwrap_or_else(|| super::app_storage(request))
    }

    pub(crate) fn get_config(&self) -> &AppConfig {
        AppConfig::get()
    }

    /// 学生提交新项目
    pub async fn create_submission(
        &self,
        request: &HttpRequest,
        actor: Actor,
        req: CreateSubmissionRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_submission(self, request, actor, req).await
    }

    /// 当前用户自己的提交列表
    pub async fn list_my_submissions(
        &self,
        request: &HttpRequest,
        actor: Actor,
        params: ListingParams,
    ) -> ActixResult<HttpResponse> {
        list::list_my_submissions(self, request, actor, params).await
    }

    /// 获取提交详情
    pub async fn get_submission(
        &self,
        request: &HttpRequest,
        actor: Actor,
        submission_id: i64,
    ) -> ActixResult<HttpResponse> {
        detail::get_submission(self, request, actor, submission_id).await
    }

    /// 修改待审核的提交
    pub async fn update_submission(
        &self,
        request: &HttpRequest,
        actor: Actor,
        submission_id: i64,
        update: UpdateSubmissionRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_submission(self, request, actor, submission_id, update).await
    }

    /// 删除待审核的提交
    pub async fn delete_submission(
        &self,
        request: &HttpRequest,
        actor: Actor,
        submission_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_submission(self, request, actor, submission_id).await
    }
}
