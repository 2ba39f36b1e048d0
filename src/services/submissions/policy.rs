//! 提交的权限规则
//!
//! 每个函数只看操作者与记录本身，不访问存储。存储层的条件更新会再做一次相同的状态检查。

use crate::errors::{PortalError, Result};
use crate::models::auth::Actor;
use crate::models::submissions::entities::Submission;

/// 只有学生可以提交项目
pub fn ensure_can_create(actor: &Actor) -> Result<()> {
    match actor {
        Actor::Student(_) => Ok(()),
        Actor::Admin(_) => Err(PortalError::authorization("管理员不能提交项目")),
    }
}

/// 所有者或管理员可以查看
pub fn ensure_can_view(actor: &Actor, submission: &Submission) -> Result<()> {
    match actor {
        Actor::Admin(_) => Ok(()),
        Actor::Student(_) if actor.owns(submission.user_id) => Ok(()),
        Actor::Student(_) => Err(PortalError::authorization("无权查看他人的提交")),
    }
}

/// 所有者在待审核状态下可以修改内容
pub fn ensure_can_edit(actor: &Actor, submission: &Submission) -> Result<()> {
    ensure_owner_while_pending(actor, submission, "修改")
}

/// 所有者在待审核状态下可以删除
pub fn ensure_can_delete(actor: &Actor, submission: &Submission) -> Result<()> {
    ensure_owner_while_pending(actor, submission, "删除")
}

/// 审核与备注只允许管理员
pub fn ensure_can_review(actor: &Actor) -> Result<()> {
    match actor {
        Actor::Admin(_) => Ok(()),
        Actor::Student(_) => Err(PortalError::authorization("只有管理员可以审核")),
    }
}

fn ensure_owner_while_pending(actor: &Actor, submission: &Submission, action: &str) -> Result<()> {
    if !actor.owns(submission.user_id) {
        return Err(PortalError::authorization(format!("只能{action}自己的提交")));
    }
    if !submission.status.is_editable() {
        return Err(PortalError::workflow(format!(
            "提交处于 {} 状态，只有待审核的提交可以{action}",
            submission.status
        )));
    }
    Ok(())
}
