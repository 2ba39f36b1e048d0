use serde::Deserialize;
use ts_rs::TS;

use super::entities::{ReviewDecision, normalize_notes};
use crate::errors::{PortalError, Result};

/// 必填文本字段：去除首尾空白后不能为空
fn required(label: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(PortalError::validation(format!("{label} 不能为空")));
    }
    Ok(value.to_string())
}

/// 组员名单：去除空白项，至少保留一人
fn normalize_members(members: Vec<String>) -> Result<Vec<String>> {
    let members: Vec<String> = members
        .into_iter()
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .collect();
    if members.is_empty() {
        return Err(PortalError::validation("至少需要一名组员"));
    }
    Ok(members)
}

fn optional_text(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// 创建提交请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct CreateSubmissionRequest {
    pub project_name: String,
    pub class_name: String,
    pub group_class: String,
    pub course: String,
    pub lecturer: String,
    pub grade: Option<String>,
    pub program_study: String,
    pub members: Vec<String>,
    /// 上传接口返回的文件 token
    pub document_token: Option<String>,
    /// 由服务层根据 token 填充
    #[serde(skip)]
    #[ts(skip)]
    pub document_url: Option<String>,
}

impl CreateSubmissionRequest {
    /// 校验并规整所有字段，任何存储操作之前调用
    pub fn normalized(self) -> Result<Self> {
        Ok(Self {
            project_name: required("项目名称", &self.project_name)?,
            class_name: required("班级", &self.class_name)?,
            group_class: required("小组", &self.group_class)?,
            course: required("课程", &self.course)?,
            lecturer: required("指导教师", &self.lecturer)?,
            grade: optional_text(self.grade),
            program_study: required("专业", &self.program_study)?,
            members: normalize_members(self.members)?,
            document_token: optional_text(self.document_token),
            document_url: None,
        })
    }
}

/// 更新提交请求，缺省字段保持不变
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct UpdateSubmissionRequest {
    pub project_name: Option<String>,
    pub class_name: Option<String>,
    pub group_class: Option<String>,
    pub course: Option<String>,
    pub lecturer: Option<String>,
    pub grade: Option<String>,
    pub program_study: Option<String>,
    pub members: Option<Vec<String>>,
    /// 为空时保留原有文档
    pub document_token: Option<String>,
    #[serde(skip)]
    #[ts(skip)]
    pub document_url: Option<String>,
}

impl UpdateSubmissionRequest {
    pub fn normalized(self) -> Result<Self> {
        let text = |label: &str, v: Option<String>| -> Result<Option<String>> {
            v.map(|v| required(label, &v)).transpose()
        };
        Ok(Self {
            project_name: text("项目名称", self.project_name)?,
            class_name: text("班级", self.class_name)?,
            group_class: text("小组", self.group_class)?,
            course: text("课程", self.course)?,
            lecturer: text("指导教师", self.lecturer)?,
            grade: optional_text(self.grade),
            program_study: text("专业", self.program_study)?,
            members: self.members.map(normalize_members).transpose()?,
            document_token: optional_text(self.document_token),
            document_url: None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.project_name.is_none()
            && self.class_name.is_none()
            && self.group_class.is_none()
            && self.course.is_none()
            && self.lecturer.is_none()
            && self.grade.is_none()
            && self.program_study.is_none()
            && self.members.is_none()
            && self.document_token.is_none()
    }
}

/// 审核请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct ReviewRequest {
    pub decision: ReviewDecision,
    pub notes: Option<String>,
}

impl ReviewRequest {
    pub fn notes(&self) -> Option<String> {
        normalize_notes(self.notes.clone())
    }
}

/// 修改审核备注
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct UpdateNotesRequest {
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request() -> CreateSubmissionRequest {
        CreateSubmissionRequest {
            project_name: "  Smart Campus ".to_string(),
            class_name: "TI-3A".to_string(),
            group_class: "Kelompok 2".to_string(),
            course: "Pemrograman Web".to_string(),
            lecturer: "Dr. Sari".to_string(),
            grade: Some("  ".to_string()),
            program_study: "Teknik Informatika".to_string(),
            members: vec!["Maya Putri".to_string(), " ".to_string(), " Andi ".to_string()],
            document_token: None,
            document_url: Some("http://evil.example/doc".to_string()),
        }
    }

    #[test]
    fn test_create_request_is_trimmed() {
        let req = create_request().normalized().unwrap();
        assert_eq!(req.project_name, "Smart Campus");
        assert_eq!(req.grade, None);
        assert_eq!(req.members, vec!["Maya Putri", "Andi"]);
        assert_eq!(req.document_url, None);
    }

    #[test]
    fn test_create_request_requires_fields() {
        let mut req = create_request();
        req.lecturer = "   ".to_string();
        let err = req.normalized().unwrap_err();
        assert_eq!(err.code(), "E007");

        let mut req = create_request();
        req.members = vec![" ".to_string()];
        assert!(req.normalized().is_err());
    }

    #[test]
    fn test_update_request_keeps_missing_fields() {
        let req = UpdateSubmissionRequest {
            course: Some(" Basis Data ".to_string()),
            ..Default::default()
        }
        .normalized()
        .unwrap();
        assert_eq!(req.course.as_deref(), Some("Basis Data"));
        assert!(req.project_name.is_none());
        assert!(!req.is_empty());
        assert!(UpdateSubmissionRequest::default().is_empty());
    }

    #[test]
    fn test_update_request_rejects_blank_value() {
        let req = UpdateSubmissionRequest {
            project_name: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(req.normalized().is_err());
    }

    #[test]
    fn test_review_request_parses_decision() {
        let req: ReviewRequest =
            serde_json::from_str(r#"{"decision":"approve","notes":"  Bagus  "}"#).unwrap();
        assert_eq!(req.decision, ReviewDecision::Approve);
        assert_eq!(req.notes().as_deref(), Some("Bagus"));
        assert!(serde_json::from_str::<ReviewRequest>(r#"{"decision":"reopen"}"#).is_err());
    }
}
