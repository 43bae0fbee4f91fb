/// Session lifecycle events emitted by the gateway.
///
/// Sent through a bounded channel to the session worker, which performs the
/// teardown (see [`crate::application::session::SessionTeardown`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The backend rejected the credential (401) on a call to `path`.
    Expired { path: String },
}
