//! Role schema.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use validator::Validate;

use super::list::PageQuery;

/// A role and the menus it grants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Role {
    pub record_id: String,
    #[validate(length(min = 1, message = "role name is required"))]
    pub name: String,
    pub sequence: i32,
    pub memo: String,
    #[validate(range(min = 1, max = 2, message = "status must be 1 or 2"))]
    pub status: i32,
    pub creator: String,
    pub created_at: Option<DateTime<Utc>>,
    #[validate(length(min = 1, message = "at least one menu must be granted"))]
    pub menus: Vec<RoleMenu>,
}

/// Menu grant of a role, with the actions and resources allowed under it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleMenu {
    pub menu_id: String,
    pub actions: Vec<String>,
    pub resources: Vec<String>,
}

/// Query parameters of `GET /roles`.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RoleQuery {
    #[serde(rename = "type")]
    pub mode: Option<String>,
    pub name: Option<String>,
    pub status: Option<i32>,
    #[serde(flatten)]
    pub page: PageQuery,
}

impl RoleQuery {
    pub fn page(page: PageQuery) -> Self {
        Self {
            mode: Some("page".to_string()),
            page,
            ..Default::default()
        }
    }
}
