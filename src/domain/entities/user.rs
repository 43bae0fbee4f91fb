//! User schema.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use validator::Validate;

use super::list::PageQuery;
use super::role::Role;

/// A console user.
///
/// `password` is only sent on create/update and is never returned by the
/// backend. `role_ids` is the write side of the grant; `roles` is what list
/// queries return for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct User {
    pub record_id: String,
    #[validate(length(min = 1, message = "user name is required"))]
    pub user_name: String,
    #[validate(length(min = 1, message = "real name is required"))]
    pub real_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub password: String,
    pub phone: String,
    #[validate(email(message = "email is invalid"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[validate(range(min = 1, max = 2, message = "status must be 1 or 2"))]
    pub status: i32,
    pub creator: String,
    pub created_at: Option<DateTime<Utc>>,
    pub role_ids: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<Role>,
}

impl User {
    /// Comma separated role names, for listings.
    pub fn role_names(&self) -> String {
        self.roles
            .iter()
            .map(|r| r.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Query parameters of `GET /users`.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserQuery {
    #[serde(rename = "type")]
    pub mode: Option<String>,
    pub user_name: Option<String>,
    pub real_name: Option<String>,
    pub role_ids: Option<String>,
    pub status: Option<i32>,
    #[serde(flatten)]
    pub page: PageQuery,
}

impl UserQuery {
    pub fn page(page: PageQuery) -> Self {
        Self {
            mode: Some("page".to_string()),
            page,
            ..Default::default()
        }
    }
}
