//! 账号字段校验

use chrono::Datelike;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::AppConfig;
use crate::errors::{PortalError, Result};

// 学号或管理员账号：字母、数字、下划线、连字符
static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{5,16}$").expect("Invalid username regex"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("Invalid email regex")
});

const WEAK_PASSWORDS: &[&str] = &[
    "password",
    "12345678",
    "123456789",
    "qwerty123",
    "admin123",
    "password1",
    "abcd1234",
    "polnes123",
];

pub fn validate_username(username: &str) -> Result<()> {
    if !USERNAME_RE.is_match(username) {
        return Err(PortalError::validation(
            "Username must be 5-16 characters of letters, numbers, underscores or hyphens",
        ));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<()> {
    if !EMAIL_RE.is_match(email) {
        return Err(PortalError::validation("Email format is invalid"));
    }
    Ok(())
}

/// 密码策略：至少 8 位，包含大小写字母与数字，且不在弱密码表中
pub fn password_policy_errors(password: &str) -> Vec<&'static str> {
    let mut errors = Vec::new();

    if password.chars().count() < 8 {
        errors.push("Password must be at least 8 characters long");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push("Password must contain at least one uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        errors.push("Password must contain at least one lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Password must contain at least one digit");
    }
    if WEAK_PASSWORDS
        .iter()
        .any(|weak| password.eq_ignore_ascii_case(weak))
    {
        errors.push("Password is too common, please choose a stronger password");
    }

    errors
}

pub fn validate_password(password: &str) -> Result<()> {
    let errors = password_policy_errors(password);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(PortalError::validation(errors.join("; ")))
    }
}

/// 专业必须是配置中列出的值
pub fn validate_study_program(program: &str) -> Result<()> {
    if !AppConfig::get().is_known_study_program(program) {
        return Err(PortalError::validation(format!(
            "Unknown study program: {program}"
        )));
    }
    Ok(())
}

/// 入学年份：不早于配置的最小年份，不晚于今年
pub fn validate_batch_year(year: i32) -> Result<()> {
    let min = AppConfig::get().portal.min_batch_year;
    let max = chrono::Utc::now().year();
    if year < min || year > max {
        return Err(PortalError::validation(format!(
            "Batch year must be between {min} and {max}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_rules() {
        assert!(validate_username("2201001").is_ok());
        assert!(validate_username("admin_expo").is_ok());
        assert!(validate_username("abc").is_err());
        assert!(validate_username("nim 2201001").is_err());
        assert!(validate_username("a_very_long_username_here").is_err());
    }

    #[test]
    fn test_email_rules() {
        assert!(validate_email("maya@student.polnes.ac.id").is_ok());
        assert!(validate_email("maya@polnes").is_err());
        assert!(validate_email("maya|x@polnes.ac.id").is_err());
    }

    #[test]
    fn test_password_policy() {
        assert!(validate_password("SecurePass123").is_ok());
        assert!(
            password_policy_errors("Ab1").contains(&"Password must be at least 8 characters long")
        );
        assert!(
            password_policy_errors("abcd1234")
                .contains(&"Password must contain at least one uppercase letter")
        );
        assert!(
            password_policy_errors("AbcdEfgh").contains(&"Password must contain at least one digit")
        );
        assert!(
            password_policy_errors("Polnes123")
                .contains(&"Password is too common, please choose a stronger password")
        );
    }

    #[test]
    fn test_study_program_and_batch_year() {
        assert!(validate_study_program("Sistem Informasi").is_ok());
        assert!(validate_study_program("Kedokteran").is_err());

        let this_year = chrono::Utc::now().year();
        assert!(validate_batch_year(this_year).is_ok());
        assert!(validate_batch_year(this_year + 1).is_err());
        assert!(validate_batch_year(1990).is_err());
    }
}
