//! In-process credential slot.

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::service::{CredentialStore, StoreResult};
use crate::domain::Credential;

/// Session-scoped store: the credential lives as long as the process.
///
/// # Use Cases
///
/// - Long-running hosts that log in once at startup
/// - Tests that need an isolated slot per gateway
#[derive(Default)]
pub struct MemoryStore {
    slot: RwLock<Option<Credential>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        debug!("Using MemoryStore (session-scoped credential)");
        Self::default()
    }

    /// Creates a store that already holds `credential`.
    pub fn with_credential(credential: Credential) -> Self {
        Self {
            slot: RwLock::new(Some(credential)),
        }
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn load(&self) -> StoreResult<Option<Credential>> {
        Ok(self.slot.read().await.clone())
    }

    async fn save(&self, credential: &Credential) -> StoreResult<()> {
        *self.slot.write().await = Some(credential.clone());
        Ok(())
    }

    async fn clear(&self) -> StoreResult<()> {
        *self.slot.write().await = None;
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
