use serde::{Deserialize, Serialize};
use tracing::warn;
use ts_rs::TS;

use crate::errors::{PortalError, Result};

/// 提交审核状态
///
/// 只允许 `pending → approved` 与 `pending → rejected` 两种流转，
/// `approved` 与 `rejected` 为终态。
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub enum SubmissionStatus {
    Pending,  // 待审核
    Approved, // 已通过
    Rejected, // 已驳回
}

impl SubmissionStatus {
    pub const PENDING: &'static str = "pending";
    pub const APPROVED: &'static str = "approved";
    pub const REJECTED: &'static str = "rejected";

    pub fn all() -> &'static [SubmissionStatus] {
        &[
            SubmissionStatus::Pending,
            SubmissionStatus::Approved,
            SubmissionStatus::Rejected,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Pending => Self::PENDING,
            SubmissionStatus::Approved => Self::APPROVED,
            SubmissionStatus::Rejected => Self::REJECTED,
        }
    }

    /// 解析库中保存的状态，无法识别时记录告警并按终态处理，避免继续被修改
    pub fn from_stored(raw: &str) -> SubmissionStatus {
        raw.parse().unwrap_or_else(|_| {
            warn!("Unknown submission status in storage: {raw:?}, treated as rejected");
            SubmissionStatus::Rejected
        })
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, SubmissionStatus::Pending)
    }

    /// 所有者是否还能修改或删除
    pub fn is_editable(&self) -> bool {
        matches!(self, SubmissionStatus::Pending)
    }

    pub fn can_transition_to(&self, next: SubmissionStatus) -> bool {
        matches!(
            (self, next),
            (SubmissionStatus::Pending, SubmissionStatus::Approved)
                | (SubmissionStatus::Pending, SubmissionStatus::Rejected)
        )
    }

    /// 应用审核决定，返回新状态
    pub fn transition(&self, decision: ReviewDecision) -> Result<SubmissionStatus> {
        let next = decision.target_status();
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(PortalError::workflow(format!(
                "提交已处于 {self} 状态，无法变更为 {next}"
            )))
        }
    }
}

impl<'de> Deserialize<'de> for SubmissionStatus {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<SubmissionStatus>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的提交状态: '{s}'. 支持的状态: pending, approved, rejected"
            ))
        })
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SubmissionStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            Self::PENDING => Ok(SubmissionStatus::Pending),
            Self::APPROVED => Ok(SubmissionStatus::Approved),
            Self::REJECTED => Ok(SubmissionStatus::Rejected),
            _ => Err(format!("Invalid submission status: {s}")),
        }
    }
}

/// 管理员的审核决定
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub enum ReviewDecision {
    Approve,
    Reject,
}

impl ReviewDecision {
    pub fn target_status(&self) -> SubmissionStatus {
        match self {
            ReviewDecision::Approve => SubmissionStatus::Approved,
            ReviewDecision::Reject => SubmissionStatus::Rejected,
        }
    }
}

/// 学生的项目提交
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct Submission {
    pub id: i64,
    pub user_id: i64,
    pub project_name: String,
    pub class_name: String,
    pub group_class: String,
    pub course: String,
    pub lecturer: String,
    pub grade: Option<String>,
    pub program_study: String,
    pub members: Vec<String>,
    pub document_token: Option<String>,
    pub document_url: Option<String>,
    pub status: SubmissionStatus,
    pub admin_notes: Option<String>,
    pub reviewed_by: Option<i64>,
    pub reviewed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 审核备注：去除首尾空白，空串视为无备注
pub fn normalize_notes(notes: Option<String>) -> Option<String> {
    notes
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
}
