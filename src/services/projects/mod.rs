//! 公开展示服务，无需登录

pub mod list;
pub mod programs;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::listing::ListingParams;
use crate::storage::Storage;

pub struct ProjectService {
    storage: Option<Arc<dyn Storage>>,
}

impl ProjectService {
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

    /// 展示页项目列表
    pub async fn list_projects(
        &self,
        request: &HttpRequest,
        params: ListingParams,
    ) -> ActixResult<HttpResponse> {
        list::list_projects(self, request, params).await
    }

    /// 可选专业列表
    pub async fn list_programs(&self) -> ActixResult<HttpResponse> {
        programs::list_programs(self).await
    }
}
