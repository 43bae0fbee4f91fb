//! Login, captcha and current-user schemas.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Reply of `GET /login/captchaid`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptchaId {
    pub captcha_id: String,
}

/// Reply of `GET /current/user`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrentUser {
    pub user_name: String,
    pub real_name: String,
    pub role_names: Vec<String>,
}

/// Login form as typed by the user.
///
/// The password is plain text here; [`LoginForm::to_payload`] hashes it the
/// way the backend expects.
#[derive(Debug, Clone, Default, Validate)]
pub struct LoginForm {
    #[validate(length(min = 1, message = "user name is required"))]
    pub user_name: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
    pub captcha_id: String,
    pub captcha_code: String,
}

impl LoginForm {
    /// Body of `POST /login`.
    pub fn to_payload(&self) -> serde_json::Value {
        serde_json::json!({
            "user_name": self.user_name,
            "password": hash_password(&self.password),
            "captcha_id": self.captcha_id,
            "captcha_code": self.captcha_code,
        })
    }
}

/// Password change form.
#[derive(Debug, Clone, Default, Validate)]
pub struct PasswordForm {
    #[validate(length(min = 1, message = "old password is required"))]
    pub old_password: String,
    #[validate(length(min = 6, message = "new password must be at least 6 characters"))]
    pub new_password: String,
}

impl PasswordForm {
    /// Body of `PUT /current/password`.
    pub fn to_payload(&self) -> serde_json::Value {
        serde_json::json!({
            "old_password": hash_password(&self.old_password),
            "new_password": hash_password(&self.new_password),
        })
    }
}

/// Lowercase hex MD5 digest, the hashing the backend applies to passwords on the wire.
pub fn hash_password(password: &str) -> String {
    format!("{:x}", md5::compute(password.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password() {
        assert_eq!(hash_password("abc"), "900150983cd24fb0d6963f7d28e17f72");
        assert_eq!(hash_password("").len(), 32);
    }

    #[test]
    fn test_login_payload_hashes_password() {
        let form = LoginForm {
            user_name: "root".into(),
            password: "abc".into(),
            captcha_id: "cid".into(),
            captcha_code: "1234".into(),
        };
        let payload = form.to_payload();
        assert_eq!(payload["user_name"], "root");
        assert_eq!(payload["password"], "900150983cd24fb0d6963f7d28e17f72");
        assert_eq!(payload["captcha_id"], "cid");
    }

    #[test]
    fn test_login_form_validation() {
        let form = LoginForm::default();
        let errors = form.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("user_name"));
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn test_password_form_validation() {
        let form = PasswordForm {
            old_password: "old".into(),
            new_password: "123".into(),
        };
        assert!(form.validate().is_err());

        let form = PasswordForm {
            old_password: "old".into(),
            new_password: "123456".into(),
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_current_user_from_empty() {
        let u: CurrentUser = serde_json::from_str("{}").unwrap();
        assert!(u.role_names.is_empty());
    }
}
