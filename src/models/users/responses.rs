use serde::Serialize;
use ts_rs::TS;

use super::entities::User;

/// 单个账号
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UserResponse {
    pub user: User,
}

/// 账号列表，`total` 为筛选后的条数
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UserListResponse {
    pub items: Vec<User>,
    pub total: i64,
}

impl From<Vec<User>> for UserListResponse {
    fn from(items: Vec<User>) -> Self {
        Self {
            total: items.len() as i64,
            items,
        }
    }
}
