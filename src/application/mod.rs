//! Application layer: the request gateway and everything built on it.
//!
//! # Modules
//!
//! - [`gateway`] - [`gateway::RequestGateway`], the single path for API calls
//! - [`notifier`] - Where user-visible failures go
//! - [`session`] - 401 handling and session teardown
//! - [`services`] - Typed services per backend resource

pub mod gateway;
pub mod notifier;
pub mod services;
pub mod session;

pub use gateway::{Exchange, GatewayConfig, RequestGateway};
pub use notifier::{Notifier, TracingNotifier};
pub use session::{SessionListener, SessionTeardown, run_session_worker};
