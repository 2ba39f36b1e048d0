//! 请求会话上下文
//!
//! JWT 中间件解析出用户后，处理程序只构造一次 [`Actor`]，
//! 再显式传入各个业务函数，按角色分派时只需匹配这一个枚举。

use crate::models::users::entities::{User, UserRole};

/// 当前请求的操作者
#[derive(Debug, Clone)]
pub enum Actor {
    Student(User),
    Admin(User),
}

impl Actor {
    pub fn from_user(user: User) -> Self {
        match user.role {
            UserRole::Admin => Actor::Admin(user),
            UserRole::Student => Actor::Student(user),
        }
    }

    pub fn user(&self) -> &User {
        match self {
            Actor::Student(user) | Actor::Admin(user) => user,
        }
    }

    pub fn id(&self) -> i64 {
        self.user().id
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Actor::Admin(_))
    }

    /// 是否为某条记录的所有者
    pub fn owns(&self, owner_id: i64) -> bool {
        self.id() == owner_id
    }
}
