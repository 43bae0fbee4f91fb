//! Auth credential held between calls.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Token type assumed when the backend omits one.
pub const DEFAULT_TOKEN_TYPE: &str = "Bearer";

/// Bearer credential as issued by the login and refresh endpoints.
///
/// Wire shape: `{"access_token": "...", "token_type": "Bearer", "expires_at": 1700000000}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    /// Expiry in seconds since the Unix epoch.
    #[serde(default)]
    pub expires_at: Option<i64>,
}

/// How close a credential is to expiring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Expired,
    NearExpiry,
    Fresh,
}

impl Credential {
    pub fn new(access_token: impl Into<String>, token_type: impl Into<String>, expires_at: Option<i64>) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: token_type.into(),
            expires_at,
        }
    }

    /// Parses a header value such as `Bearer abc123`.
    ///
    /// A value without a scheme is taken as a bare token of the default type.
    /// Returns `None` for blank input.
    pub fn from_header(value: &str, expires_at: Option<i64>) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }

        match value.split_once(' ') {
            Some((scheme, token)) if !token.trim().is_empty() => {
                Some(Self::new(token.trim(), scheme, expires_at))
            }
            _ => Some(Self::new(value, DEFAULT_TOKEN_TYPE, expires_at)),
        }
    }

    /// Value sent in the auth header.
    pub fn header_value(&self) -> String {
        let token_type = if self.token_type.is_empty() {
            DEFAULT_TOKEN_TYPE
        } else {
            &self.token_type
        };
        format!("{} {}", token_type, self.access_token)
    }

    /// Classifies the credential against `now` (epoch seconds).
    ///
    /// `window` is how many seconds before expiry a refresh becomes due.
    /// A credential without expiry is always fresh.
    pub fn freshness_at(&self, now: i64, window: i64) -> Freshness {
        match self.expires_at {
            None => Freshness::Fresh,
            Some(expires_at) => {
                let left = expires_at - now;
                if left <= 0 {
                    Freshness::Expired
                } else if left <= window {
                    Freshness::NearExpiry
                } else {
                    Freshness::Fresh
                }
            }
        }
    }

    pub fn freshness(&self, window: i64) -> Freshness {
        self.freshness_at(Utc::now().timestamp(), window)
    }
}
