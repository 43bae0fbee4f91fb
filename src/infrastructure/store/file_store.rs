//! JSON-file credential slot.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, warn};

use super::service::{CredentialStore, StoreError, StoreResult};
use crate::domain::Credential;

/// Persistent store: the credential is written to a JSON file so that a
/// login survives between CLI invocations.
///
/// A missing file reads as an empty slot.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        debug!("Using FileStore at {}", path.display());
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CredentialStore for FileStore {
    async fn load(&self) -> StoreResult<Option<Credential>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StoreError::OperationError(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        if raw.trim().is_empty() {
            return Ok(None);
        }

        Ok(Some(serde_json::from_str(&raw)?))
    }

    async fn save(&self, credential: &Credential) -> StoreResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StoreError::OperationError(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        let raw = serde_json::to_string_pretty(credential)?;
        tokio::fs::write(&self.path, raw).await.map_err(|e| {
            StoreError::OperationError(format!("Failed to write {}: {}", self.path.display(), e))
        })?;

        debug!("Credential saved to {}", self.path.display());
        Ok(())
    }

    async fn clear(&self) -> StoreResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!("Credential file {} removed", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => {
                warn!("Failed to remove {}: {}", self.path.display(), e);
                Err(StoreError::OperationError(e.to_string()))
            }
        }
    }

    async fn health_check(&self) -> bool {
        match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => tokio::fs::metadata(parent).await.is_ok(),
            None => true,
        }
    }
}
