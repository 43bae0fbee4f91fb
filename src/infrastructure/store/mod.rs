//! Credential persistence.
//!
//! Provides a [`CredentialStore`] trait with three implementations:
//! - [`FileStore`] - JSON file, the CLI default
//! - [`MemoryStore`] - Process-lifetime slot
//! - [`RedisStore`] - Shared Redis key

mod file_store;
mod memory_store;
mod redis_store;
mod service;

pub use file_store::FileStore;
pub use memory_store::MemoryStore;
pub use redis_store::RedisStore;
pub use service::{CredentialStore, StoreError, StoreResult};

#[cfg(test)]
pub use service::MockCredentialStore;
