//! 文件存储操作

use super::SeaOrmStorage;
use crate::entity::files::{ActiveModel, Entity as Files};
use crate::errors::{PortalError, Result};
use crate::models::files::entities::File;
use crate::storage::NewFile;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};

impl SeaOrmStorage {
    /// 保存文件记录
    pub async fn create_file_impl(&self, file: NewFile<'_>) -> Result<File> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            token: Set(file.token.to_string()),
            original_name: Set(file.original_name.to_string()),
            storage_key: Set(file.storage_key.to_string()),
            file_size: Set(file.file_size),
            content_type: Set(file.content_type.to_string()),
            uploaded_at: Set(now),
            user_id: Set(file.user_id),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("保存文件记录失败: {e}")))?;

        Ok(result.into_file())
    }

    /// 通过 token 获取文件
    pub async fn get_file_by_token_impl(&self, token: &str) -> Result<Option<File>> {
        let result = Files::find_by_id(token.to_string())
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询文件失败: {e}")))?;

        Ok(result.map(|m| m.into_file()))
    }
}
