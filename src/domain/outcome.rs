//! Normalized result of a gateway call.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;

/// Result of one API call as seen by callers.
///
/// A 401 response resolves to `Success` with an empty JSON object: the session
/// is torn down elsewhere and the caller has nothing to act on.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T = Value> {
    Success(T),
    Failure(ApiError),
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failure(_))
    }

    pub fn error(&self) -> Option<&ApiError> {
        match self {
            Outcome::Failure(e) => Some(e),
            Outcome::Success(_) => None,
        }
    }

    pub fn ok(self) -> Option<T> {
        match self {
            Outcome::Success(v) => Some(v),
            Outcome::Failure(_) => None,
        }
    }

    pub fn into_result(self) -> Result<T, ApiError> {
        match self {
            Outcome::Success(v) => Ok(v),
            Outcome::Failure(e) => Err(e),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U> {
        match self {
            Outcome::Success(v) => Outcome::Success(f(v)),
            Outcome::Failure(e) => Outcome::Failure(e),
        }
    }
}

impl Outcome<Value> {
    /// Converts a raw JSON payload into a typed one.
    ///
    /// A `null` payload (empty 2xx body) decodes from `{}` so that schema
    /// types with defaulted fields still produce a value. `status` is the
    /// HTTP status the payload arrived with and is kept on a decode failure.
    pub fn decode<T: DeserializeOwned>(self, status: u16) -> Outcome<T> {
        match self {
            Outcome::Success(value) => {
                let value = match value {
                    Value::Null => Value::Object(Default::default()),
                    other => other,
                };
                match serde_json::from_value(value) {
                    Ok(decoded) => Outcome::Success(decoded),
                    Err(e) => {
                        tracing::warn!(error = %e, "Response payload did not match schema");
                        Outcome::Failure(ApiError::decode(
                            format!("unexpected response: {e}"),
                            status,
                        ))
                    }
                }
            }
            Outcome::Failure(e) => Outcome::Failure(e),
        }
    }
}

impl<T> From<Result<T, ApiError>> for Outcome<T> {
    fn from(result: Result<T, ApiError>) -> Self {
        match result {
            Ok(v) => Outcome::Success(v),
            Err(e) => Outcome::Failure(e),
        }
    }
}
