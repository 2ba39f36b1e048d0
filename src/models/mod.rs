//! 数据模型定义
//!
//! 按业务模块划分，每个模块包含 entities（业务实体）、requests（请求）、responses（响应）。

pub mod auth;
pub mod common;
pub mod files;
pub mod submissions;
pub mod users;

pub use common::response::ApiResponse;

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// 响应中的业务错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误 1xxx
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    InternalServerError = 1005,
    RateLimitExceeded = 1029,

    // 认证 2xxx
    AuthFailed = 2000,
    RegisterFailed = 2001,
    PasswordConfirmationMismatch = 2002,

    // 用户 3xxx
    UserNotFound = 3000,
    UserAlreadyExists = 3001,
    UserNameInvalid = 3002,
    UserEmailInvalid = 3003,
    UserPasswordInvalid = 3004,
    UserNameAlreadyExists = 3005,
    UserEmailAlreadyExists = 3006,
    UserCreationFailed = 3007,
    UserUpdateFailed = 3008,
    StudyProgramInvalid = 3009,
    BatchYearInvalid = 3010,

    // 文件 4xxx
    FileNotFound = 4000,
    FileUploadFailed = 4001,
    FileTypeNotAllowed = 4002,
    FileSizeExceeded = 4003,
    MultifileUploadNotAllowed = 4004,

    // 项目提交 5xxx
    SubmissionNotFound = 5000,
    SubmissionInvalid = 5001,
    SubmissionNotEditable = 5002,
    SubmissionAlreadyReviewed = 5003,
    SubmissionCreationFailed = 5004,
    SubmissionUpdateFailed = 5005,
    ListingQueryInvalid = 5006,
}
