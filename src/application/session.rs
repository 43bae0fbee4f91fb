//! Session expiry handling.
//!
//! The gateway reports a 401 through [`SessionListener`]. The usual listener
//! is the sending half of an mpsc channel; the receiving half is drained by
//! [`run_session_worker`] (long-running hosts) or by the CLI after each
//! command. Either way [`SessionTeardown`] does the actual logout.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::gateway::RequestGateway;
use crate::domain::{RequestDescriptor, SessionEvent};

/// Told when the backend rejects the credential.
#[cfg_attr(test, mockall::automock)]
pub trait SessionListener: Send + Sync {
    fn session_expired(&self, event: SessionEvent);
}

impl SessionListener for mpsc::Sender<SessionEvent> {
    fn session_expired(&self, event: SessionEvent) {
        if let Err(e) = self.try_send(event) {
            warn!("Session event dropped: {}", e);
        }
    }
}

/// Ends the session after an expiry event.
pub struct SessionTeardown {
    gateway: Arc<RequestGateway>,
}

impl SessionTeardown {
    pub fn new(gateway: Arc<RequestGateway>) -> Self {
        Self { gateway }
    }

    /// Logs out and clears the stored credential.
    ///
    /// Returns `false` when there was nothing to tear down. A burst of 401s
    /// therefore produces a single logout.
    pub async fn handle(&self, event: SessionEvent) -> bool {
        let SessionEvent::Expired { path } = event;

        if self.gateway.current_credential().await.is_none() {
            debug!("Session already ended, ignoring expiry from {}", path);
            return false;
        }

        let _ = self
            .gateway
            .send(
                RequestDescriptor::post("/login/exit", serde_json::json!({}))
                    .not_notify()
                    .skip_refresh(),
            )
            .await;
        self.gateway.clear_credential().await;

        info!("Session expired ({}), login required", path);
        true
    }
}

/// Consumes session events until every sender is dropped.
pub async fn run_session_worker(mut rx: mpsc::Receiver<SessionEvent>, teardown: SessionTeardown) {
    while let Some(ev) = rx.recv().await {
        teardown.handle(ev).await;
    }
    debug!("Session worker stopped");
}
