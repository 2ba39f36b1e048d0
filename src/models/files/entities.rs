use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/file.ts")]
pub struct File {
    // 下载凭证
    pub token: String,
    // 原始文件名
    pub original_name: String,
    // 存储路径（相对上传目录）
    #[serde(skip_serializing)]
    #[ts(skip)]
    pub storage_key: String,
    // 文件大小（以字节为单位）
    pub file_size: i64,
    pub content_type: String,
    pub uploaded_at: chrono::DateTime<chrono::Utc>,
    // 上传者
    pub user_id: i64,
}
