//! Typed access to the backend resources.
//!
//! Each service wraps a shared [`crate::application::gateway::RequestGateway`] and returns
//! [`crate::domain::Outcome`] values decoded into the entity schemas.
//!
//! # Available Services
//!
//! - [`login_service::LoginService`] - Captcha, login/logout, current user
//! - [`menu_service::MenuService`] - Menu CRUD and hierarchy checks
//! - [`role_service::RoleService`] - Role CRUD
//! - [`user_service::UserService`] - User CRUD
//! - [`resource_service::ResourceService`] - API resource CRUD

use serde::Serialize;
use serde_json::Value;
use validator::{Validate, ValidationErrors};

use crate::error::ApiError;

pub mod login_service;
pub mod menu_service;
pub mod resource_service;
pub mod role_service;
pub mod user_service;

pub use login_service::LoginService;
pub use menu_service::MenuService;
pub use resource_service::ResourceService;
pub use role_service::RoleService;
pub use user_service::UserService;

/// Validates a form and renders it as a request body.
pub(crate) fn prepare<F: Validate + Serialize>(form: &F) -> Result<Value, ApiError> {
    form.validate().map_err(|e| validation_error(&e))?;
    serde_json::to_value(form).map_err(|e| ApiError::validation(e.to_string()))
}

/// First field message of a failed validation, prefixed by its field.
pub(crate) fn validation_error(errors: &ValidationErrors) -> ApiError {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    let message = fields
        .first()
        .and_then(|(field, errs)| {
            errs.first().map(|e| match &e.message {
                Some(msg) => msg.to_string(),
                None => format!("{} is invalid", field),
            })
        })
        .unwrap_or_else(|| "invalid input".to_string());

    ApiError::validation(message)
}

/// `a,b,c` form used by the batch delete endpoints.
pub(crate) fn batch(ids: &[String]) -> String {
    ids.join(",")
}
