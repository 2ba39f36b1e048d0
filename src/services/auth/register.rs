use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::{
    ApiResponse, ErrorCode,
    auth::RegisterRequest,
    users::{entities::UserRole, requests::CreateUserRequest, responses::UserResponse},
};
use crate::storage::Storage;
use crate::utils::password::hash_password;
use crate::utils::validate::{
    validate_batch_year, validate_email, validate_password, validate_study_program,
    validate_username,
};

use super::AuthService;

/// 注册表单校验，全部在访问存储之前完成
pub(crate) fn validate_registration(req: &RegisterRequest) -> Result<(), (ErrorCode, String)> {
    if req.password != req.confirm_password {
        return Err((
            ErrorCode::PasswordConfirmationMismatch,
            "Password confirmation does not match".to_string(),
        ));
    }
    validate_password(&req.password)
        .map_err(|e| (ErrorCode::UserPasswordInvalid, e.message().to_string()))?;
    validate_email(&req.email)
        .map_err(|e| (ErrorCode::UserEmailInvalid, e.message().to_string()))?;
    validate_username(&req.username)
        .map_err(|e| (ErrorCode::UserNameInvalid, e.message().to_string()))?;
    if req.full_name.trim().is_empty() {
        return Err((ErrorCode::BadRequest, "Full name is required".to_string()));
    }
    validate_study_program(&req.study_program)
        .map_err(|e| (ErrorCode::StudyProgramInvalid, e.message().to_string()))?;
    if let Some(year) = req.batch_year {
        validate_batch_year(year)
            .map_err(|e| (ErrorCode::BatchYearInvalid, e.message().to_string()))?;
    }
    Ok(())
}

pub async fn handle_register(
    service: &AuthService,
    register_request: RegisterRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    // 1. 表单校验
    if let Err((code, msg)) = validate_registration(&register_request) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(code, msg)));
    }

    let storage = service.get_storage(request);

    // 2. 唯一性检查
    if let Err(response) = check_username_exists(&storage, &register_request.username).await {
        return Ok(response);
    }
    if let Err(response) = check_email_exists(&storage, &register_request.email).await {
        return Ok(response);
    }

    // 3. 哈希密码
    let password_hash = match hash_password(&register_request.password) {
        Ok(hash) => hash,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::RegisterFailed,
                    format!("密码哈希失败: {e}"),
                )),
            );
        }
    };

    // 4. 创建学生账号，自助注册不能指定角色
    let create_request = CreateUserRequest {
        username: register_request.username,
        email: register_request.email,
        password: password_hash,
        role: UserRole::Student,
        full_name: register_request.full_name.trim().to_string(),
        study_program: Some(register_request.study_program),
        batch_year: register_request.batch_year,
        avatar_url: None,
    };

    match storage.create_user(create_request).await {
        Ok(user) => {
            tracing::info!("Student {} registered", user.username);
            Ok(HttpResponse::Created().json(ApiResponse::success(UserResponse { user }, "注册成功")))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::RegisterFailed,
                format!("注册失败: {e}"),
            )),
        ),
    }
}

async fn check_username_exists(
    storage: &Arc<dyn Storage>,
    username: &str,
) -> Result<(), HttpResponse> {
    match storage.get_user_by_username(username).await {
        Ok(Some(_)) => Err(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::UserNameAlreadyExists,
            "Username already exists",
        ))),
        Ok(None) => Ok(()),
        Err(e) => Err(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::RegisterFailed,
                format!("Register failed: {e}"),
            )),
        ),
    }
}

async fn check_email_exists(storage: &Arc<dyn Storage>, email: &str) -> Result<(), HttpResponse> {
    match storage.get_user_by_email(email).await {
        Ok(Some(_)) => Err(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::UserEmailAlreadyExists,
            "Email already exists",
        ))),
        Ok(None) => Ok(()),
        Err(e) => Err(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::RegisterFailed,
                format!("Register failed: {e}"),
            )),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> RegisterRequest {
        RegisterRequest {
            email: "maya@student.polnes.ac.id".to_string(),
            password: "Rahasia123".to_string(),
            confirm_password: "Rahasia123".to_string(),
            full_name: "Maya Putri".to_string(),
            username: "2201001".to_string(),
            study_program: "Teknik Informatika".to_string(),
            batch_year: Some(2022),
        }
    }

    #[test]
    fn test_valid_registration() {
        assert!(validate_registration(&request()).is_ok());
    }

    #[test]
    fn test_confirmation_checked_first() {
        let mut req = request();
        req.confirm_password = "Different123".to_string();
        req.email = "broken".to_string();
        let (code, _) = validate_registration(&req).unwrap_err();
        assert_eq!(code, ErrorCode::PasswordConfirmationMismatch);
    }

    #[test]
    fn test_each_field_has_its_code() {
        let mut req = request();
        req.password = "short".to_string();
        req.confirm_password = "short".to_string();
        assert_eq!(
            validate_registration(&req).unwrap_err().0,
            ErrorCode::UserPasswordInvalid
        );

        let mut req = request();
        req.email = "maya-at-polnes".to_string();
        assert_eq!(
            validate_registration(&req).unwrap_err().0,
            ErrorCode::UserEmailInvalid
        );

        let mut req = request();
        req.username = "nim".to_string();
        assert_eq!(
            validate_registration(&req).unwrap_err().0,
            ErrorCode::UserNameInvalid
        );

        let mut req = request();
        req.study_program = "Kedokteran".to_string();
        assert_eq!(
            validate_registration(&req).unwrap_err().0,
            ErrorCode::StudyProgramInvalid
        );

        let mut req = request();
        req.batch_year = Some(1999);
        assert_eq!(
            validate_registration(&req).unwrap_err().0,
            ErrorCode::BatchYearInvalid
        );
    }
}
