use super::SeaOrmStorage;
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::{PortalError, Result};
use crate::models::users::{
    entities::User,
    requests::{CreateUserRequest, UpdateUserRequest, UserListParams},
    responses::UserListResponse,
};
use crate::utils::escape_like_pattern;
use sea_orm::sea_query::LikeExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

impl SeaOrmStorage {
    /// 创建用户
    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<User> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            username: Set(req.username),
            email: Set(req.email),
            password_hash: Set(req.password),
            role: Set(req.role.to_string()),
            full_name: Set(req.full_name),
            study_program: Set(req.study_program),
            batch_year: Set(req.batch_year),
            avatar_url: Set(req.avatar_url),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("创建用户失败: {e}")))?;

        Ok(result.into_user())
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过用户名获取用户
    pub async fn get_user_by_username_impl(&self, username: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过邮箱获取用户
    pub async fn get_user_by_email_impl(&self, email: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过用户名或邮箱获取用户
    pub async fn get_user_by_username_or_email_impl(
        &self,
        identifier: &str,
    ) -> Result<Option<User>> {
        let result = Users::find()
            .filter(
                Condition::any()
                    .add(Column::Username.eq(identifier))
                    .add(Column::Email.eq(identifier)),
            )
            .one(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 列出用户（按创建时间倒序）
    pub async fn list_users_impl(&self, params: UserListParams) -> Result<UserListResponse> {
        let mut select = Users::find();

        if let Some(ref search) = params.search
            && !search.trim().is_empty()
        {
            let pattern = format!("%{}%", escape_like_pattern(search.trim()));
            let like = || LikeExpr::new(pattern.clone()).escape('\\');
            select = select.filter(
                Condition::any()
                    .add(Column::Username.like(like()))
                    .add(Column::Email.like(like()))
                    .add(Column::FullName.like(like())),
            );
        }

        if let Some(ref role) = params.role {
            select = select.filter(Column::Role.eq(role.to_string()));
        }

        let users = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("查询用户列表失败: {e}")))?;

        Ok(UserListResponse::from(
            users.into_iter().map(|m| m.into_user()).collect::<Vec<_>>(),
        ))
    }

    /// 更新用户最后登录时间
    pub async fn update_last_login_impl(&self, id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Users::update_many()
            .col_expr(Column::LastLogin, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("更新最后登录时间失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 更新用户信息，角色字段不在可更新范围内
    pub async fn update_user_impl(
        &self,
        id: i64,
        update: UpdateUserRequest,
    ) -> Result<Option<User>> {
        if self.get_user_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(email) = update.email {
            model.email = Set(email);
        }

        if let Some(password) = update.password {
            model.password_hash = Set(password);
        }

        if let Some(full_name) = update.full_name {
            model.full_name = Set(full_name);
        }

        if let Some(study_program) = update.study_program {
            model.study_program = Set(Some(study_program));
        }

        if let Some(batch_year) = update.batch_year {
            model.batch_year = Set(Some(batch_year));
        }

        if let Some(avatar_url) = update.avatar_url {
            model.avatar_url = Set(Some(avatar_url));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("更新用户失败: {e}")))?;

        self.get_user_by_id_impl(id).await
    }

    /// 统计用户数量
    pub async fn count_users_impl(&self) -> Result<u64> {
        let count = Users::find()
            .count(&self.db)
            .await
            .map_err(|e| PortalError::database_operation(format!("统计用户数量失败: {e}")))?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;

    fn student(username: &str, full_name: &str) -> CreateUserRequest {
        CreateUserRequest {
            username: username.to_string(),
            email: format!("{username}@student.polnes.ac.id"),
            password: "hash".to_string(),
            role: UserRole::Student,
            full_name: full_name.to_string(),
            study_program: Some("Teknik Informatika".to_string()),
            batch_year: Some(2022),
            avatar_url: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_find_user() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let user = storage
            .create_user_impl(student("2201001", "Maya Putri"))
            .await
            .unwrap();

        assert_eq!(user.role, UserRole::Student);
        let by_email = storage
            .get_user_by_username_or_email_impl("2201001@student.polnes.ac.id")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.id, user.id);
        assert_eq!(storage.count_users_impl().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_username_fails() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        storage
            .create_user_impl(student("2201001", "Maya Putri"))
            .await
            .unwrap();
        let mut dup = student("2201001", "Other");
        dup.email = "other@student.polnes.ac.id".to_string();
        assert!(storage.create_user_impl(dup).await.is_err());
    }

    #[tokio::test]
    async fn test_list_users_with_search_and_role() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        storage
            .create_user_impl(student("2201001", "Maya Putri"))
            .await
            .unwrap();
        storage
            .create_user_impl(student("2201002", "Andi Saputra"))
            .await
            .unwrap();

        let found = storage
            .list_users_impl(UserListParams {
                role: Some(UserRole::Student),
                search: Some("maya".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(found.total, 1);
        assert_eq!(found.items[0].full_name, "Maya Putri");

        let admins = storage
            .list_users_impl(UserListParams {
                role: Some(UserRole::Admin),
                search: None,
            })
            .await
            .unwrap();
        assert_eq!(admins.total, 0);
    }

    #[tokio::test]
    async fn test_search_treats_wildcards_literally() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        storage
            .create_user_impl(student("2201001", "Maya Putri"))
            .await
            .unwrap();

        let found = storage
            .list_users_impl(UserListParams {
                role: None,
                search: Some("%".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(found.total, 0);
    }

    #[tokio::test]
    async fn test_update_user_keeps_role() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let user = storage
            .create_user_impl(student("2201001", "Maya Putri"))
            .await
            .unwrap();

        let updated = storage
            .update_user_impl(
                user.id,
                UpdateUserRequest {
                    full_name: Some("Maya P.".to_string()),
                    batch_year: Some(2023),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.full_name, "Maya P.");
        assert_eq!(updated.batch_year, Some(2023));
        assert_eq!(updated.role, UserRole::Student);

        assert!(
            storage
                .update_user_impl(999, UpdateUserRequest::default())
                .await
                .unwrap()
                .is_none()
        );
    }
}
