//! API resource schema.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use validator::Validate;

use super::list::PageQuery;

/// An API endpoint (path + method) that roles can be granted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Resource {
    pub record_id: String,
    #[validate(length(min = 1, message = "resource code is required"))]
    pub code: String,
    #[validate(length(min = 1, message = "resource name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "resource path is required"))]
    pub path: String,
    #[validate(custom(function = "validate_method"))]
    pub method: String,
    pub creator: String,
    pub created_at: Option<DateTime<Utc>>,
}

fn validate_method(method: &str) -> Result<(), validator::ValidationError> {
    match method {
        "GET" | "POST" | "PUT" | "PATCH" | "DELETE" => Ok(()),
        _ => Err(validator::ValidationError::new("method")
            .with_message("method must be one of GET, POST, PUT, PATCH, DELETE".into())),
    }
}

/// Query parameters of `GET /resources`.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResourceQuery {
    #[serde(rename = "type")]
    pub mode: Option<String>,
    pub code: Option<String>,
    pub name: Option<String>,
    pub path: Option<String>,
    #[serde(flatten)]
    pub page: PageQuery,
}

impl ResourceQuery {
    pub fn page(page: PageQuery) -> Self {
        Self {
            mode: Some("page".to_string()),
            page,
            ..Default::default()
        }
    }
}
