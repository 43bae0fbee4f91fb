//! Failure taxonomy for gateway calls.
//!
//! The gateway never returns `Err` to its callers. Every non-success response
//! is classified into an [`ApiError`] and carried inside
//! [`crate::domain::Outcome::Failure`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Message used for 504 responses and transport failures.
pub const MSG_NOT_CONNECTED: &str = "not connected to server";
/// Fallback message for 4xx responses without a structured error body.
pub const MSG_REQUEST_FAILED: &str = "request failed";
/// Fallback message for any other non-2xx response without a structured error body.
pub const MSG_SERVER_ERROR: &str = "server error";

/// Classification of a failed call.
///
/// A 401 has no kind: it ends the session and resolves to an empty success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// 504, or the server could not be reached at all.
    TransportUnavailable,
    /// 400..=499 excluding 401.
    ClientError,
    /// Everything else that is not 2xx.
    ServerError,
    /// A 2xx payload did not match the expected schema.
    Decode,
    /// A form was rejected before it was sent.
    Validation,
}

impl ErrorKind {
    /// Label used for logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::TransportUnavailable => "transport_unavailable",
            ErrorKind::ClientError => "client_error",
            ErrorKind::ServerError => "server_error",
            ErrorKind::Decode => "decode_error",
            ErrorKind::Validation => "validation_error",
        }
    }
}

/// Failure payload of an outcome: `{code, message, status}` plus its class.
///
/// `status` is the HTTP status of the response, or `0` when no response was
/// received (transport failure, client-side validation).
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct ApiError {
    pub kind: ErrorKind,
    pub code: i64,
    pub message: String,
    pub status: u16,
}

impl ApiError {
    pub fn new(kind: ErrorKind, code: i64, message: impl Into<String>, status: u16) -> Self {
        Self {
            kind,
            code,
            message: message.into(),
            status,
        }
    }

    pub fn not_connected(status: u16) -> Self {
        Self::new(ErrorKind::TransportUnavailable, 0, MSG_NOT_CONNECTED, status)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, 0, message, 0)
    }

    pub fn decode(message: impl Into<String>, status: u16) -> Self {
        Self::new(ErrorKind::Decode, 0, message, status)
    }

    /// Classifies a non-2xx, non-401 response.
    ///
    /// The body is expected to look like `{"error": {"code": 7, "message": "..."}}`.
    /// Anything else falls back to the generic message for the status class.
    pub fn from_status(status: u16, body: Option<&Value>) -> Self {
        if status == 504 {
            return Self::not_connected(status);
        }

        let (kind, fallback) = if (400..500).contains(&status) {
            (ErrorKind::ClientError, MSG_REQUEST_FAILED)
        } else {
            (ErrorKind::ServerError, MSG_SERVER_ERROR)
        };

        match body.and_then(ErrorBody::extract) {
            Some(item) => Self::new(kind, item.code, item.message, status),
            None => Self::new(kind, 0, fallback, status),
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorItem,
}

#[derive(Deserialize)]
struct ErrorItem {
    #[serde(default)]
    code: i64,
    message: String,
}

impl ErrorBody {
    fn extract(body: &Value) -> Option<ErrorItem> {
        serde_json::from_value::<ErrorBody>(body.clone())
            .ok()
            .map(|b| b.error)
            .filter(|item| !item.message.is_empty())
    }
}
