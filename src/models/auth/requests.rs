use serde::Deserialize;
use ts_rs::TS;

/// 用户登录请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct LoginRequest {
    /// 邮箱或学号
    #[serde(alias = "email", alias = "username")]
    pub identifier: String,
    pub password: String,
    /// 是否记住我
    #[serde(default)]
    pub remember_me: bool,
}

/// 学生自助注册请求，角色固定为 student
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub full_name: String,
    /// 学号（NIM）
    pub username: String,
    pub study_program: String,
    pub batch_year: Option<i32>,
}

/// 个人资料更新请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct UpdateProfileRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub full_name: Option<String>,
    pub study_program: Option<String>,
    pub batch_year: Option<i32>,
    pub avatar_url: Option<String>,
}
