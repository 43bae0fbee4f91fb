//! Credential store trait and error types.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::Credential;

/// Errors that can occur while reading or writing the credential slot.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store connection error: {0}")]
    ConnectionError(String),
    #[error("Store operation error: {0}")]
    OperationError(String),
    #[error("Stored credential is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Single-slot key-value store holding the current credential.
///
/// The slot has last-write-wins semantics: `load` returns whatever the most
/// recent `save` wrote, or `None` after `clear` or before any write.
/// Implementations do not coordinate concurrent writers.
///
/// # Implementations
///
/// - [`crate::infrastructure::store::MemoryStore`] - Process-lifetime slot
/// - [`crate::infrastructure::store::FileStore`] - JSON file, survives restarts
/// - [`crate::infrastructure::store::RedisStore`] - Shared Redis key
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Reads the slot.
    async fn load(&self) -> StoreResult<Option<Credential>>;

    /// Overwrites the slot.
    async fn save(&self, credential: &Credential) -> StoreResult<()>;

    /// Empties the slot. Clearing an empty slot is not an error.
    async fn clear(&self) -> StoreResult<()>;

    /// Checks that the backing medium is reachable.
    async fn health_check(&self) -> bool;
}
