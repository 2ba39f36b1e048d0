use super::entities::UserRole;
use serde::Deserialize;
use ts_rs::TS;

/// 用户列表查询参数
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UserListParams {
    pub role: Option<UserRole>,
    pub search: Option<String>,
}

/// 创建用户请求（管理员接口与存储层共用，password 在入库前替换为哈希）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
    pub full_name: String,
    pub study_program: Option<String>,
    pub batch_year: Option<i32>,
    pub avatar_url: Option<String>,
}

/// 存储层的用户更新字段，不包含角色
#[derive(Debug, Clone, Default)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub full_name: Option<String>,
    pub study_program: Option<String>,
    pub batch_year: Option<i32>,
    pub avatar_url: Option<String>,
}
