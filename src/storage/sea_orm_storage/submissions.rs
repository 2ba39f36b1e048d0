//! 提交存储操作
//!
//! 所有者修改、删除以及审核都以单条带 `status = 'pending'` 条件的语句完成，
//! 影响行数为 0 时再查询一次以区分 不存在 / 无权限 / 非待审核。

use std::collections::HashMap;
use tracing::warn;

use super::SeaOrmStorage;
use crate::entity::submissions::{ActiveModel, Column, Entity as Submissions};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{PortalError, Result};
use crate::models::submissions::{
    entities::{ReviewDecision, Submission, SubmissionStatus},
    requests::{CreateSubmissionRequest, UpdateSubmissionRequest},
    responses::{AdminSubmissionItem, ShowcaseProject, SubmissionStats},
};
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set};

impl SeaOrmStorage {
    /// 创建提交
    pub async fn create_submission_impl(
        &self,
        owner_id: i64,
        req: CreateSubmissionRequest,
    ) -> Result<Submission> {
        if let Some(ref token) = req.document_token {
            self.ensure_document_owner(token, owner_id).await?;
        }

        let now = chrono::Utc::now().timestamp();
        let members = serde_json::to_string(&req.members)?;

        let model = ActiveModel {
            user_id: Set(owner_id),
            project_name: Set(req.project_name),
            class_name: Set(req.class_name),
            group_class: Set(req.group_class),
            course: Set(req.course),
            lecturer: Set(req.lecturer),
            grade: Set(req.grade),
            program_study: Set(req.program_study),
            members: Set(members),
            document_token: Set(req.document_token),
            document_url: Set(req.document_url),
            status: Set(SubmissionStatus::Pending.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("创建提交失败: {e}")))?;

        Ok(result.into_submission())
    }

    /// 通过 ID 获取提交
    pub async fn get_submission_by_id_impl(&self, id: i64) -> Result<Option<Submission>> {
        let result = Submissions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 列出用户自己的提交
    pub async fn list_submissions_by_owner_impl(&self, owner_id: i64) -> Result<Vec<Submission>> {
        let results = Submissions::find()
            .filter(Column::UserId.eq(owner_id))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询提交列表失败: {e}")))?;

        Ok(results.into_iter().map(|m| m.into_submission()).collect())
    }

    /// 列出全部提交及提交者资料
    pub async fn list_submissions_with_owner_impl(&self) -> Result<Vec<AdminSubmissionItem>> {
        let submissions = Submissions::find()
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询提交列表失败: {e}")))?;

        let owners = self
            .load_owners(submissions.iter().map(|s| s.user_id).collect())
            .await?;

        // 找不到提交者资料的记录不参与审核列表
        Ok(submissions
            .into_iter()
            .filter_map(|model| {
                let owner = owners.get(&model.user_id)?;
                Some(AdminSubmissionItem {
                    owner_name: owner.full_name.clone(),
                    owner_username: owner.username.clone(),
                    submission: model.into_submission(),
                })
            })
            .collect())
    }

    /// 列出公开展示的项目
    pub async fn list_public_projects_impl(
        &self,
        statuses: &[SubmissionStatus],
    ) -> Result<Vec<ShowcaseProject>> {
        if statuses.is_empty() {
            return Ok(Vec::new());
        }

        let submissions = Submissions::find()
            .filter(Column::Status.is_in(statuses.iter().map(|s| s.as_str())))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询展示项目失败: {e}")))?;

        let owners = self
            .load_owners(submissions.iter().map(|s| s.user_id).collect())
            .await?;

        Ok(submissions
            .into_iter()
            .map(|model| {
                let batch_year = owners
                    .get(&model.user_id)
                    .and_then(|u| u.batch_year)
                    .map(|y| y.to_string());
                let s = model.into_submission();
                ShowcaseProject {
                    id: s.id,
                    project_name: s.project_name,
                    group_class: s.group_class,
                    members: s.members,
                    course: s.course,
                    lecturer: s.lecturer,
                    class_name: s.class_name,
                    program_study: s.program_study,
                    batch_year,
                    status: s.status,
                    document_url: s.document_url,
                }
            })
            .collect())
    }

    /// 所有者修改待审核的提交
    pub async fn update_pending_submission_impl(
        &self,
        id: i64,
        owner_id: i64,
        update: UpdateSubmissionRequest,
    ) -> Result<Submission> {
        if let Some(ref token) = update.document_token {
            self.ensure_document_owner(token, owner_id).await?;
        }

        let now = chrono::Utc::now().timestamp();
        let mut query = Submissions::update_many().col_expr(Column::UpdatedAt, Expr::value(now));

        if let Some(v) = update.project_name {
            query = query.col_expr(Column::ProjectName, Expr::value(v));
        }
        if let Some(v) = update.class_name {
            query = query.col_expr(Column::ClassName, Expr::value(v));
        }
        if let Some(v) = update.group_class {
            query = query.col_expr(Column::GroupClass, Expr::value(v));
        }
        if let Some(v) = update.course {
            query = query.col_expr(Column::Course, Expr::value(v));
        }
        if let Some(v) = update.lecturer {
            query = query.col_expr(Column::Lecturer, Expr::value(v));
        }
        if let Some(v) = update.grade {
            query = query.col_expr(Column::Grade, Expr::value(v));
        }
        if let Some(v) = update.program_study {
            query = query.col_expr(Column::ProgramStudy, Expr::value(v));
        }
        if let Some(v) = update.members {
            query = query.col_expr(Column::Members, Expr::value(serde_json::to_string(&v)?));
        }
        if let Some(v) = update.document_token {
            query = query.col_expr(Column::DocumentToken, Expr::value(v));
            query = query.col_expr(Column::DocumentUrl, Expr::value(update.document_url));
        }

        let result = query
            .filter(Column::Id.eq(id))
            .filter(Column::UserId.eq(owner_id))
            .filter(Column::Status.eq(SubmissionStatus::PENDING))
            .exec(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("更新提交失败: {e}")))?;

        if result.rows_affected == 0 {
            return Err(self.explain_owner_guard(id, owner_id, "修改").await);
        }

        self.get_submission_by_id_impl(id)
            .await?
            .ok_or_else(|| PortalError::not_found("提交不存在"))
    }

    /// 所有者删除待审核的提交
    pub async fn delete_pending_submission_impl(&self, id: i64, owner_id: i64) -> Result<()> {
        let result = Submissions::delete_many()
            .filter(Column::Id.eq(id))
            .filter(Column::UserId.eq(owner_id))
            .filter(Column::Status.eq(SubmissionStatus::PENDING))
            .exec(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("删除提交失败: {e}")))?;

        if result.rows_affected == 0 {
            return Err(self.explain_owner_guard(id, owner_id, "删除").await);
        }
        Ok(())
    }

    /// 审核待审核的提交，备注与决定一并写入
    pub async fn review_submission_impl(
        &self,
        id: i64,
        reviewer_id: i64,
        decision: ReviewDecision,
        notes: Option<String>,
    ) -> Result<Submission> {
        let now = chrono::Utc::now().timestamp();
        let next = decision.target_status();

        let result = Submissions::update_many()
            .col_expr(Column::Status, Expr::value(next.to_string()))
            .col_expr(Column::AdminNotes, Expr::value(notes))
            .col_expr(Column::ReviewedBy, Expr::value(reviewer_id))
            .col_expr(Column::ReviewedAt, Expr::value(now))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(id))
            .filter(Column::Status.eq(SubmissionStatus::PENDING))
            .exec(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("审核提交失败: {e}")))?;

        if result.rows_affected == 0 {
            let current = self
                .get_submission_by_id_impl(id)
                .await?
                .ok_or_else(|| PortalError::not_found("提交不存在"))?;
            // 能走到这里说明状态已不是 pending
            return Err(current
                .status
                .transition(decision)
                .err()
                .unwrap_or_else(|| PortalError::workflow("提交已被其他请求审核")));
        }

        self.get_submission_by_id_impl(id)
            .await?
            .ok_or_else(|| PortalError::not_found("提交不存在"))
    }

    /// 修改审核备注
    pub async fn update_submission_notes_impl(
        &self,
        id: i64,
        notes: Option<String>,
    ) -> Result<Option<Submission>> {
        let now = chrono::Utc::now().timestamp();

        let result = Submissions::update_many()
            .col_expr(Column::AdminNotes, Expr::value(notes))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("更新审核备注失败: {e}")))?;

        if result.rows_affected == 0 {
            return Ok(None);
        }
        self.get_submission_by_id_impl(id).await
    }

    /// 按状态统计提交数量
    pub async fn submission_stats_impl(&self) -> Result<SubmissionStats> {
        let statuses = Submissions::find()
            .select_only()
            .column(Column::Status)
            .into_tuple::<String>()
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("统计提交失败: {e}")))?;

        let mut stats = SubmissionStats::default();
        for raw in statuses {
            match raw.parse::<SubmissionStatus>() {
                Ok(status) => stats.record(status, 1),
                Err(_) => warn!("Skipping submission with unknown status {raw:?} in stats"),
            }
        }
        Ok(stats)
    }

    /// 校验文档属于当前用户
    async fn ensure_document_owner(&self, token: &str, owner_id: i64) -> Result<()> {
        let file = self
            .get_file_by_token_impl(token)
            .await?
            .ok_or_else(|| PortalError::not_found(format!("文档不存在: {token}")))?;
        if file.user_id != owner_id {
            return Err(PortalError::authorization("不能引用他人上传的文档"));
        }
        Ok(())
    }

    /// 条件写入未命中时给出具体原因
    async fn explain_owner_guard(&self, id: i64, owner_id: i64, action: &str) -> PortalError {
        match self.get_submission_by_id_impl(id).await {
            Ok(None) => PortalError::not_found("提交不存在"),
            Ok(Some(s)) if s.user_id != owner_id => {
                PortalError::authorization(format!("无权{action}他人的提交"))
            }
            Ok(Some(s)) => PortalError::workflow(format!(
                "提交处于 {} 状态，只有待审核的提交可以{action}",
                s.status
            )),
            Err(e) => e,
        }
    }

    async fn load_owners(
        &self,
        mut ids: Vec<i64>,
    ) -> Result<HashMap<i64, crate::entity::users::Model>> {
        ids.sort_unstable();
        ids.dedup();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let users = Users::find()
            .filter(UserColumn::Id.is_in(ids))
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询提交者失败: {e}")))?;

        Ok(users.into_iter().map(|u| (u.id, u)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::{entities::UserRole, requests::CreateUserRequest};
    use crate::storage::NewFile;

    async fn storage_with_users() -> (SeaOrmStorage, i64, i64) {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let mut ids = Vec::new();
        for (username, name) in [("2201001", "Maya Putri"), ("2201002", "Andi Saputra")] {
            let user = storage
                .create_user_impl(CreateUserRequest {
                    username: username.to_string(),
                    email: format!("{username}@student.polnes.ac.id"),
                    password: "hash".to_string(),
                    role: UserRole::Student,
                    full_name: name.to_string(),
                    study_program: Some("Teknik Informatika".to_string()),
                    batch_year: Some(2022),
                    avatar_url: None,
                })
                .await
                .unwrap();
            ids.push(user.id);
        }
        (storage, ids[0], ids[1])
    }

    fn create_request(name: &str) -> CreateSubmissionRequest {
        CreateSubmissionRequest {
            project_name: name.to_string(),
            class_name: "TI-3A".to_string(),
            group_class: "Kelompok 1".to_string(),
            course: "Internet of Things".to_string(),
            lecturer: "Dr. Sari".to_string(),
            grade: None,
            program_study: "Teknik Informatika".to_string(),
            members: vec!["Maya Putri".to_string(), "Budi".to_string()],
            document_token: None,
            document_url: None,
        }
    }

    #[tokio::test]
    async fn test_owner_can_edit_and_delete_while_pending() {
        let (storage, owner, _) = storage_with_users().await;
        let created = storage
            .create_submission_impl(owner, create_request("Smart Campus"))
            .await
            .unwrap();
        assert_eq!(created.status, SubmissionStatus::Pending);
        assert_eq!(created.members, vec!["Maya Putri", "Budi"]);

        let updated = storage
            .update_pending_submission_impl(
                created.id,
                owner,
                UpdateSubmissionRequest {
                    project_name: Some("Smart Campus v2".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.project_name, "Smart Campus v2");
        assert_eq!(updated.course, "Internet of Things");
        assert_eq!(updated.user_id, owner);

        storage
            .delete_pending_submission_impl(created.id, owner)
            .await
            .unwrap();
        assert!(
            storage
                .get_submission_by_id_impl(created.id)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_approved_submission_is_locked() {
        let (storage, owner, admin) = storage_with_users().await;
        let created = storage
            .create_submission_impl(owner, create_request("Smart Campus"))
            .await
            .unwrap();

        let reviewed = storage
            .review_submission_impl(
                created.id,
                admin,
                ReviewDecision::Approve,
                Some("Bagus".to_string()),
            )
            .await
            .unwrap();
        assert_eq!(reviewed.status, SubmissionStatus::Approved);
        assert_eq!(reviewed.reviewed_by, Some(admin));
        assert_eq!(reviewed.admin_notes.as_deref(), Some("Bagus"));

        let err = storage
            .update_pending_submission_impl(
                created.id,
                owner,
                UpdateSubmissionRequest {
                    course: Some("Basis Data".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(err.is_workflow());

        let err = storage
            .delete_pending_submission_impl(created.id, owner)
            .await
            .unwrap_err();
        assert!(err.is_workflow());

        // 第二次审核不能重新打开或覆盖结果
        let err = storage
            .review_submission_impl(created.id, admin, ReviewDecision::Reject, None)
            .await
            .unwrap_err();
        assert!(err.is_workflow());
        let current = storage
            .get_submission_by_id_impl(created.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(current.status, SubmissionStatus::Approved);
        assert_eq!(current.course, "Internet of Things");
    }

    #[tokio::test]
    async fn test_guard_distinguishes_missing_and_foreign() {
        let (storage, owner, other) = storage_with_users().await;
        let created = storage
            .create_submission_impl(owner, create_request("Smart Campus"))
            .await
            .unwrap();

        let err = storage
            .delete_pending_submission_impl(created.id, other)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E012");

        let err = storage
            .delete_pending_submission_impl(created.id + 100, owner)
            .await
            .unwrap_err();
        assert!(err.is_not_found());

        let err = storage
            .review_submission_impl(created.id + 100, other, ReviewDecision::Approve, None)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_document_must_belong_to_owner() {
        let (storage, owner, other) = storage_with_users().await;
        storage
            .create_file_impl(NewFile {
                token: "tok-1",
                original_name: "laporan.pdf",
                storage_key: "1/laporan.pdf",
                file_size: 10,
                content_type: "application/pdf",
                user_id: owner,
            })
            .await
            .unwrap();

        let mut req = create_request("Smart Campus");
        req.document_token = Some("tok-1".to_string());
        let err = storage
            .create_submission_impl(other, req.clone())
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E012");

        let created = storage.create_submission_impl(owner, req).await.unwrap();
        assert_eq!(created.document_token.as_deref(), Some("tok-1"));

        let mut missing = create_request("IoT Monitor");
        missing.document_token = Some("nope".to_string());
        assert!(
            storage
                .create_submission_impl(owner, missing)
                .await
                .unwrap_err()
                .is_not_found()
        );
    }

    #[tokio::test]
    async fn test_listings_and_stats() {
        let (storage, owner, other) = storage_with_users().await;
        let a = storage
            .create_submission_impl(owner, create_request("Smart Campus"))
            .await
            .unwrap();
        let b = storage
            .create_submission_impl(other, create_request("IoT Monitor"))
            .await
            .unwrap();
        storage
            .create_submission_impl(other, create_request("Kasir Online"))
            .await
            .unwrap();
        storage
            .review_submission_impl(a.id, other, ReviewDecision::Approve, None)
            .await
            .unwrap();
        storage
            .review_submission_impl(b.id, owner, ReviewDecision::Reject, Some("Revisi".into()))
            .await
            .unwrap();

        let mine = storage.list_submissions_by_owner_impl(other).await.unwrap();
        assert_eq!(mine.len(), 2);
        assert_eq!(mine[0].project_name, "Kasir Online");

        let admin_items = storage.list_submissions_with_owner_impl().await.unwrap();
        assert_eq!(admin_items.len(), 3);
        assert!(
            admin_items
                .iter()
                .any(|i| i.owner_name == "Maya Putri" && i.submission.id == a.id)
        );

        let public = storage
            .list_public_projects_impl(&[SubmissionStatus::Approved, SubmissionStatus::Pending])
            .await
            .unwrap();
        assert_eq!(public.len(), 2);
        assert!(public.iter().all(|p| p.id != b.id));
        assert!(public.iter().all(|p| p.batch_year.as_deref() == Some("2022")));
        assert!(storage.list_public_projects_impl(&[]).await.unwrap().is_empty());

        let stats = storage.submission_stats_impl().await.unwrap();
        assert_eq!(
            stats,
            SubmissionStats {
                total: 3,
                pending: 1,
                approved: 1,
                rejected: 1,
            }
        );
    }

    #[tokio::test]
    async fn test_notes_editable_after_review() {
        let (storage, owner, admin) = storage_with_users().await;
        let created = storage
            .create_submission_impl(owner, create_request("Smart Campus"))
            .await
            .unwrap();
        storage
            .review_submission_impl(created.id, admin, ReviewDecision::Reject, None)
            .await
            .unwrap();

        let updated = storage
            .update_submission_notes_impl(created.id, Some("Lengkapi poster".to_string()))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.admin_notes.as_deref(), Some("Lengkapi poster"));
        assert_eq!(updated.status, SubmissionStatus::Rejected);

        assert!(
            storage
                .update_submission_notes_impl(created.id + 1, None)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_stats_skip_unknown_status() {
        let (storage, owner, _) = storage_with_users().await;
        let kept = storage
            .create_submission_impl(owner, create_request("Smart Campus"))
            .await
            .unwrap();
        let corrupt = storage
            .create_submission_impl(owner, create_request("IoT Monitor"))
            .await
            .unwrap();
        Submissions::update_many()
            .col_expr(Column::Status, Expr::value("graded"))
            .filter(Column::Id.eq(corrupt.id))
            .exec(&storage.db)
            .await
            .unwrap();

        let stats = storage.submission_stats_impl().await.unwrap();
        assert_eq!(stats.total, 1);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.rejected, 0);

        let loaded = storage.get_submission_by_id_impl(corrupt.id).await.unwrap().unwrap();
        assert_eq!(loaded.status, SubmissionStatus::Rejected);
        assert_ne!(kept.id, corrupt.id);
    }
}
