//! # Admin Console
//!
//! Typed client and CLI for an RBAC administration REST backend: menus,
//! roles, users, API resources and the login session.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - Credentials, call descriptors, outcomes and schemas
//! - **Application Layer** ([`application`]) - The request gateway, session teardown and
//!   typed services
//! - **Infrastructure Layer** ([`infrastructure`]) - HTTP transport and credential stores
//!
//! Every API call goes through [`application::RequestGateway`]. It attaches
//! the stored credential, refreshes it shortly before expiry, and turns every
//! response into a [`domain::Outcome`]. A 401 ends the session through an
//! injected [`application::SessionListener`] instead of failing the call.
//!
//! ## Quick Start
//!
//! ```bash
//! export CONSOLE_BASE_URL="http://127.0.0.1:10088"
//!
//! cargo run --bin admin -- login
//! cargo run --bin admin -- menu tree
//! ```
//!
//! ## Configuration
//!
//! Loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod telemetry;

pub use error::ApiError;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{
        LoginService, MenuService, ResourceService, RoleService, UserService,
    };
    pub use crate::application::{
        GatewayConfig, Notifier, RequestGateway, SessionListener, SessionTeardown,
        TracingNotifier, run_session_worker,
    };
    pub use crate::domain::{Credential, HttpMethod, Outcome, RequestDescriptor, SessionEvent};
    pub use crate::error::{ApiError, ErrorKind};
    pub use crate::infrastructure::store::{CredentialStore, FileStore, MemoryStore, RedisStore};
    pub use crate::infrastructure::transport::{ReqwestTransport, Transport};
}
