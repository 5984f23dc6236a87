use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::FieldErrors;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.-]+$").expect("Invalid username regex"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("Invalid email regex")
});

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9]{7,15}$").expect("Invalid phone regex"));

/// 字段级错误收集器，最终转换为 422 响应体
#[derive(Debug, Default)]
pub struct Validator {
    errors: BTreeMap<String, Vec<String>>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) -> &mut Self {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
        self
    }

    /// `ok` 为 false 时记录错误
    pub fn check(&mut self, ok: bool, field: &str, message: &str) -> &mut Self {
        if !ok {
            self.add(field, message);
        }
        self
    }

    pub fn required(&mut self, field: &str, value: &str) -> &mut Self {
        self.check(
            !value.trim().is_empty(),
            field,
            &format!("The {field} field is required"),
        )
    }

    pub fn max_len(&mut self, field: &str, value: &str, max: usize) -> &mut Self {
        self.check(
            value.chars().count() <= max,
            field,
            &format!("The {field} may not be greater than {max} characters"),
        )
    }

    pub fn username(&mut self, field: &str, value: &str) -> &mut Self {
        if let Err(msg) = validate_username(value) {
            self.add(field, msg);
        }
        self
    }

    pub fn email(&mut self, field: &str, value: &str) -> &mut Self {
        if let Err(msg) = validate_email(value) {
            self.add(field, msg);
        }
        self
    }

    pub fn password(&mut self, field: &str, value: &str) -> &mut Self {
        for msg in validate_password(value).errors {
            self.add(field, msg);
        }
        self
    }

    /// 可选手机号，`None` 或空串视为未填写
    pub fn phone(&mut self, field: &str, value: Option<&str>) -> &mut Self {
        if let Some(v) = value
            && !v.is_empty()
            && !PHONE_RE.is_match(v)
        {
            self.add(field, "The phone number format is invalid");
        }
        self
    }

    pub fn non_negative(&mut self, field: &str, value: f64) -> &mut Self {
        self.check(
            value.is_finite() && value >= 0.0,
            field,
            &format!("The {field} must be a non-negative number"),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn finish(self) -> Result<(), FieldErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(FieldErrors {
                errors: self.errors,
            })
        }
    }
}

pub fn validate_username(username: &str) -> Result<(), &'static str> {
    // 用户名长度校验：4 <= x <= 32
    if username.len() < 4 || username.len() > 32 {
        return Err("Username length must be between 4 and 32 characters");
    }
    if !USERNAME_RE.is_match(username) {
        return Err("Username must contain only letters, numbers, dots, underscores or hyphens");
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

/// 密码策略验证结果
#[derive(Debug, Clone)]
pub struct PasswordValidationResult {
    pub is_valid: bool,
    pub errors: Vec<&'static str>,
}

/// 验证密码是否符合安全策略
///
/// - 最小长度：8 字符
/// - 必须包含：大写字母 + 小写字母 + 数字
/// - 拒绝常见弱密码
pub fn validate_password(password: &str) -> PasswordValidationResult {
    let mut errors = Vec::new();

    if password.len() < 8 {
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

    let weak_passwords = [
        "password1",
        "qwerty123",
        "admin123",
        "abcd1234",
        "welcome1",
        "tutor1234",
    ];
    if weak_passwords
        .iter()
        .any(|&weak| password.eq_ignore_ascii_case(weak))
    {
        errors.push("Password is too common, please choose a stronger password");
    }

    PasswordValidationResult {
        is_valid: errors.is_empty(),
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_password() {
        assert!(validate_password("SecureP@ss1").is_valid);
        assert!(validate_password("Tuition2025").is_valid);
    }

    #[test]
    fn test_weak_passwords() {
        let result = validate_password("Ab1");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password must be at least 8 characters long")
        );

        let result = validate_password("Password1");
        assert!(
            result
                .errors
                .contains(&"Password is too common, please choose a stronger password")
        );

        assert!(!validate_password("abcdefgh1").is_valid);
    }

    #[test]
    fn test_username_and_email() {
        assert!(validate_username("rahim.k").is_ok());
        assert!(validate_username("abc").is_err());
        assert!(validate_username("bad name").is_err());
        assert!(validate_email("guardian@example.com").is_ok());
        assert!(validate_email("guardian@").is_err());
    }

    #[test]
    fn test_validator_collects_by_field() {
        let mut v = Validator::new();
        v.required("full_name", "  ")
            .phone("phone", Some("12ab"))
            .phone("guardian_phone", None)
            .non_negative("monthly_fee", -1.0);

        let errors = v.finish().unwrap_err().errors;
        assert_eq!(errors.len(), 3);
        assert!(errors.contains_key("full_name"));
        assert!(errors.contains_key("phone"));
        assert!(errors.contains_key("monthly_fee"));
        assert!(!errors.contains_key("guardian_phone"));
    }

    #[test]
    fn test_validator_passes() {
        let mut v = Validator::new();
        v.required("title", "Eid holiday").phone("phone", Some("+8801711000000"));
        assert!(v.is_empty());
        assert!(v.finish().is_ok());
    }
}
