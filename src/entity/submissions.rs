//! 项目提交实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "submissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub project_name: String,
    pub class_name: String,
    pub group_class: String,
    pub course: String,
    pub lecturer: String,
    pub grade: Option<String>,
    pub program_study: String,
    /// JSON 数组形式的小组成员
    #[sea_orm(column_type = "Text")]
    pub members: String,
    pub document_token: Option<String>,
    pub document_url: Option<String>,
    pub status: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub admin_notes: Option<String>,
    pub reviewed_by: Option<i64>,
    pub reviewed_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    Owner,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_submission(self) -> crate::models::submissions::entities::Submission {
        use crate::models::submissions::entities::{Submission, SubmissionStatus};

        Submission {
            id: self.id,
            user_id: self.user_id,
            project_name: self.project_name,
            class_name: self.class_name,
            group_class: self.group_class,
            course: self.course,
            lecturer: self.lecturer,
            grade: self.grade,
            program_study: self.program_study,
            members: serde_json::from_str(&self.members).unwrap_or_default(),
            document_token: self.document_token,
            document_url: self.document_url,
            status: SubmissionStatus::from_stored(&self.status),
            admin_notes: self.admin_notes,
            reviewed_by: self.reviewed_by,
            reviewed_at: self.reviewed_at.map(super::from_unix),
            created_at: super::from_unix(self.created_at),
            updated_at: super::from_unix(self.updated_at),
        }
    }
}
