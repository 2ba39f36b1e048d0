use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::middlewares::RequireJWT;
use crate::middlewares::require_jwt::user_cache_key;
use crate::models::auth::requests::UpdateProfileRequest;
use crate::models::users::requests::UpdateUserRequest;
use crate::models::users::responses::UserResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::password::hash_password;
use crate::utils::validate::{
    validate_batch_year, validate_email, validate_password, validate_study_program,
};

use super::AuthService;

/// 校验个人资料修改，角色不在可修改范围内
fn validate_profile(update: &UpdateProfileRequest) -> Result<(), (ErrorCode, String)> {
    if let Some(ref email) = update.email {
        validate_email(email).map_err(|e| (ErrorCode::UserEmailInvalid, e.message().to_string()))?;
    }
    if let Some(ref password) = update.password {
        validate_password(password)
            .map_err(|e| (ErrorCode::UserPasswordInvalid, e.message().to_string()))?;
    }
    if let Some(ref name) = update.full_name
        && name.trim().is_empty()
    {
        return Err((ErrorCode::BadRequest, "Full name is required".to_string()));
    }
    if let Some(ref program) = update.study_program {
        validate_study_program(program)
            .map_err(|e| (ErrorCode::StudyProgramInvalid, e.message().to_string()))?;
    }
    if let Some(year) = update.batch_year {
        validate_batch_year(year)
            .map_err(|e| (ErrorCode::BatchYearInvalid, e.message().to_string()))?;
    }
    Ok(())
}

pub async fn handle_update_profile(
    service: &AuthService,
    update_data: UpdateProfileRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(current_user) = RequireJWT::extract_user(request) else {
        return Ok(HttpResponse::Unauthorized()
            .json(ApiResponse::error_empty(ErrorCode::Unauthorized, "未登录")));
    };

    if let Err((code, msg)) = validate_profile(&update_data) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(code, msg)));
    }

    let storage = service.get_storage(request);

    // 邮箱不能与其他用户重复
    if let Some(ref email) = update_data.email
        && let Ok(Some(existing_user)) = storage.get_user_by_email(email).await
        && existing_user.id != current_user.id
    {
        return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::UserEmailAlreadyExists,
            "该邮箱已被使用",
        )));
    }

    let password = match update_data.password.as_deref().map(hash_password).transpose() {
        Ok(hash) => hash,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("密码哈希失败: {e}"),
                )),
            );
        }
    };

    let storage_update = UpdateUserRequest {
        email: update_data.email,
        password,
        full_name: update_data.full_name.map(|n| n.trim().to_string()),
        study_program: update_data.study_program,
        batch_year: update_data.batch_year,
        avatar_url: update_data.avatar_url,
    };

    match storage.update_user(current_user.id, storage_update).await {
        Ok(Some(user)) => {
            // 缓存中的旧资料作废
            if let (Some(cache), Some(token)) = (
                service.get_cache(request),
                RequireJWT::extract_token(request),
            ) {
                cache.remove(&user_cache_key(&token)).await;
            }
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                UserResponse { user },
                "用户信息更新成功",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "用户不存在",
        ))),
        Err(e) => Ok(HttpResponse::InternalServerError().json(ApiResponse::error_empty(
            ErrorCode::UserUpdateFailed,
            format!("更新用户信息失败: {e}"),
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty() -> UpdateProfileRequest {
        UpdateProfileRequest {
            email: None,
            password: None,
            full_name: None,
            study_program: None,
            batch_year: None,
            avatar_url: None,
        }
    }

    #[test]
    fn test_profile_validation() {
        assert!(validate_profile(&empty()).is_ok());

        let mut req = empty();
        req.full_name = Some("   ".to_string());
        assert!(validate_profile(&req).is_err());

        let mut req = empty();
        req.study_program = Some("Sistem Informasi".to_string());
        req.password = Some("weak".to_string());
        assert_eq!(
            validate_profile(&req).unwrap_err().0,
            ErrorCode::UserPasswordInvalid
        );
    }

    #[test]
    fn test_profile_request_has_no_role() {
        // 未知字段被忽略，role 不会进入更新
        let req: UpdateProfileRequest =
            serde_json::from_str(r#"{"role":"admin","full_name":"Maya"}"#).unwrap();
        assert_eq!(req.full_name.as_deref(), Some("Maya"));
    }
}
