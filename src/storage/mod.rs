use std::sync::Arc;

use crate::models::{
    files::entities::File,
    submissions::{
        entities::{ReviewDecision, Submission, SubmissionStatus},
        requests::{CreateSubmissionRequest, UpdateSubmissionRequest},
        responses::{AdminSubmissionItem, ShowcaseProject, SubmissionStats},
    },
    users::{
        entities::User,
        requests::{CreateUserRequest, UpdateUserRequest, UserListParams},
        responses::UserListResponse,
    },
};

use crate::errors::Result;

pub mod sea_orm_storage;

/// 新文件记录
#[derive(Debug, Clone)]
pub struct NewFile<'a> {
    pub token: &'a str,
    pub original_name: &'a str,
    pub storage_key: &'a str,
    pub file_size: i64,
    pub content_type: &'a str,
    pub user_id: i64,
}

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名获取用户信息
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 通过用户名或邮箱获取用户信息
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    // 列出用户
    async fn list_users(&self, params: UserListParams) -> Result<UserListResponse>;
    // 更新用户信息（不含角色）
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 用户总数
    async fn count_users(&self) -> Result<u64>;

    /// 文件管理方法
    // 保存文件记录
    async fn create_file(&self, file: NewFile<'_>) -> Result<File>;
    // 通过唯一 token 获取文件信息
    async fn get_file_by_token(&self, token: &str) -> Result<Option<File>>;

    /// 项目提交方法
    // 创建提交（状态为 pending），引用的文档必须属于提交者
    async fn create_submission(
        &self,
        owner_id: i64,
        req: CreateSubmissionRequest,
    ) -> Result<Submission>;
    // 通过ID获取提交
    async fn get_submission_by_id(&self, id: i64) -> Result<Option<Submission>>;
    // 列出某用户的提交，最新的在前
    async fn list_submissions_by_owner(&self, owner_id: i64) -> Result<Vec<Submission>>;
    // 列出全部提交及提交者资料，缺少资料的提交被丢弃
    async fn list_submissions_with_owner(&self) -> Result<Vec<AdminSubmissionItem>>;
    // 列出公开展示的项目
    async fn list_public_projects(
        &self,
        statuses: &[SubmissionStatus],
    ) -> Result<Vec<ShowcaseProject>>;
    // 所有者修改待审核的提交
    async fn update_pending_submission(
        &self,
        id: i64,
        owner_id: i64,
        update: UpdateSubmissionRequest,
    ) -> Result<Submission>;
    // 所有者删除待审核的提交
    async fn delete_pending_submission(&self, id: i64, owner_id: i64) -> Result<()>;
    // 审核待审核的提交
    async fn review_submission(
        &self,
        id: i64,
        reviewer_id: i64,
        decision: ReviewDecision,
        notes: Option<String>,
    ) -> Result<Submission>;
    // 修改审核备注（任何状态）
    async fn update_submission_notes(
        &self,
        id: i64,
        notes: Option<String>,
    ) -> Result<Option<Submission>>;
    // 按状态统计
    async fn submission_stats(&self) -> Result<SubmissionStats>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
