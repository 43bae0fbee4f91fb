//! Redis-backed credential slot.

use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{debug, info, warn};

use super::service::{CredentialStore, StoreError, StoreResult};
use crate::domain::Credential;

/// Shares one credential between several console processes through a
/// single Redis key.
///
/// The key gets a TTL derived from the credential expiry when one is known.
pub struct RedisStore {
    client: ConnectionManager,
    key: String,
}

impl RedisStore {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ConnectionError`] if the URL is invalid, the
    /// connection cannot be established, or the PING fails.
    pub async fn connect(redis_url: &str, key: impl Into<String>) -> StoreResult<Self> {
        info!("Connecting credential store to Redis");

        let client = Client::open(redis_url).map_err(|e| {
            StoreError::ConnectionError(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            StoreError::ConnectionError(format!("Failed to connect to Redis: {}", e))
        })?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| StoreError::ConnectionError(format!("Redis PING failed: {}", e)))?;

        info!("✓ Connected to Redis");

        Ok(Self {
            client: manager,
            key: format!("console:{}", key.into()),
        })
    }
}

/// Seconds until `expires_at`, or `None` when the key should not expire.
fn ttl_for(credential: &Credential, now: i64) -> Option<u64> {
    credential
        .expires_at
        .map(|at| at - now)
        .filter(|left| *left > 0)
        .map(|left| left as u64)
}

#[async_trait]
impl CredentialStore for RedisStore {
    async fn load(&self) -> StoreResult<Option<Credential>> {
        let mut conn = self.client.clone();

        let raw = conn
            .get::<_, Option<String>>(&self.key)
            .await
            .map_err(|e| StoreError::OperationError(format!("Redis GET error: {}", e)))?;

        match raw {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => {
                debug!("No credential under {}", self.key);
                Ok(None)
            }
        }
    }

    async fn save(&self, credential: &Credential) -> StoreResult<()> {
        let mut conn = self.client.clone();
        let raw = serde_json::to_string(credential)?;

        let result = match ttl_for(credential, chrono::Utc::now().timestamp()) {
            Some(ttl) => conn.set_ex::<_, _, ()>(&self.key, raw, ttl).await,
            None => conn.set::<_, _, ()>(&self.key, raw).await,
        };

        result.map_err(|e| {
            warn!("Redis SET error for {}: {}", self.key, e);
            StoreError::OperationError(e.to_string())
        })
    }

    async fn clear(&self) -> StoreResult<()> {
        let mut conn = self.client.clone();

        match conn.del::<_, i32>(&self.key).await {
            Ok(deleted) => {
                if deleted > 0 {
                    debug!("Credential key {} removed", self.key);
                }
                Ok(())
            }
            Err(e) => {
                warn!("Redis DEL error for {}: {}", self.key, e);
                Err(StoreError::OperationError(e.to_string()))
            }
        }
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }
}
