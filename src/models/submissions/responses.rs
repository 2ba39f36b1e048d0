use serde::Serialize;
use ts_rs::TS;

use super::entities::{Submission, SubmissionStatus};
use crate::listing::{SortDirection, SortField, SortState};

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmissionResponse {
    pub submission: Submission,
}

/// 公开展示页上的项目，不含审核备注
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct ShowcaseProject {
    pub id: i64,
    pub project_name: String,
    pub group_class: String,
    pub members: Vec<String>,
    pub course: String,
    pub lecturer: String,
    pub class_name: String,
    pub program_study: String,
    /// 提交者的入学年份
    pub batch_year: Option<String>,
    pub status: SubmissionStatus,
    pub document_url: Option<String>,
}

/// 管理员审核列表项（附带提交者资料）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct AdminSubmissionItem {
    #[serde(flatten)]
    #[ts(flatten)]
    pub submission: Submission,
    pub owner_name: String,
    pub owner_username: String,
}

/// 审核统计
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmissionStats {
    pub total: i64,
    pub pending: i64,
    pub approved: i64,
    pub rejected: i64,
}

impl SubmissionStats {
    pub fn record(&mut self, status: SubmissionStatus, count: i64) {
        self.total += count;
        match status {
            SubmissionStatus::Pending => self.pending += count,
            SubmissionStatus::Approved => self.approved += count,
            SubmissionStatus::Rejected => self.rejected += count,
        }
    }
}

/// 列表响应，回传生效的排序状态供客户端下次切换
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/listing.ts")]
pub struct ListingResponse<T: TS> {
    pub items: Vec<T>,
    pub total: i64,
    pub sort: String,
    pub direction: SortDirection,
}

impl<T: TS> ListingResponse<T> {
    pub fn new<F: SortField>(items: Vec<T>, sort: SortState<F>) -> Self {
        Self {
            total: items.len() as i64,
            items,
            sort: sort.field.as_str().to_string(),
            direction: sort.direction,
        }
    }
}
