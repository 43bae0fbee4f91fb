//! Domain layer: credentials, call descriptors, outcomes and wire schemas.
//!
//! Nothing in here performs I/O. The gateway in
//! [`crate::application::gateway`] combines these types with the
//! infrastructure traits to execute calls.
//!
//! # Architecture
//!
//! - [`credential`] - Bearer credential and its expiry classification
//! - [`descriptor`] - Description of one outgoing call
//! - [`outcome`] - Normalized success/failure result
//! - [`session_event`] - Events sent to the session worker
//! - [`entities`] - Backend schemas (menus, roles, users, resources, login)
//! - [`menu_nav`] - Route to menu lookups over a menu tree

pub mod credential;
pub mod descriptor;
pub mod entities;
pub mod menu_nav;
pub mod outcome;
pub mod session_event;

pub use credential::{Credential, Freshness};
pub use descriptor::{HttpMethod, RequestDescriptor};
pub use outcome::Outcome;
pub use session_event::SessionEvent;
