//! Response envelopes and paging parameters.

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

/// Status reply of update/delete/enable calls: `{"status": "OK"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusResult {
    pub status: String,
}

impl StatusResult {
    pub fn is_ok(&self) -> bool {
        self.status == "OK"
    }
}

/// Reply of create calls: `{"record_id": "..."}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordId {
    pub record_id: String,
}

impl RecordId {
    pub fn is_created(&self) -> bool {
        !self.record_id.is_empty()
    }
}

/// Paging block of list replies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pagination {
    pub total: u64,
    pub current: u32,
    #[serde(rename = "pageSize")]
    pub page_size: u32,
}

/// `{"list": [...], "pagination": {...}}`. Pagination is absent for tree and select queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListResult<T> {
    pub list: Vec<T>,
    pub pagination: Option<Pagination>,
}

impl<T> Default for ListResult<T> {
    fn default() -> Self {
        Self {
            list: Vec::new(),
            pagination: None,
        }
    }
}

/// Paging query parameters understood by every list endpoint.
///
/// Serialized as `current` / `pageSize`; unset fields are left out of the query.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageQuery {
    pub current: Option<u32>,
    #[serde(rename = "pageSize")]
    pub page_size: Option<u32>,
}

impl PageQuery {
    pub fn new(current: u32, page_size: u32) -> Self {
        Self {
            current: Some(current),
            page_size: Some(page_size),
        }
    }

    /// Checks the values before they are sent.
    ///
    /// # Validation
    ///
    /// - Page must be > 0
    /// - Page size must be between 1 and 1000
    pub fn validate(&self) -> Result<(), String> {
        if self.current == Some(0) {
            return Err("Page must be greater than 0".to_string());
        }
        if let Some(size) = self.page_size
            && !(1..=1000).contains(&size)
        {
            return Err("Page size must be between 1 and 1000".to_string());
        }
        Ok(())
    }
}
