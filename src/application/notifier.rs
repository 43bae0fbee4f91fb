//! User-visible error notifications.

use crate::error::ApiError;

/// Receives one call per failed, notifiable gateway call.
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    fn notify(&self, error: &ApiError);
}

/// Logs failures at `error` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, error: &ApiError) {
        tracing::error!(
            kind = error.kind.as_str(),
            code = error.code,
            status = error.status,
            "{}",
            error.message
        );
    }
}
