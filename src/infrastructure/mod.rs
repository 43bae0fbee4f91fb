//! Infrastructure layer for external integrations.
//!
//! Concrete implementations of the seams the gateway depends on.
//!
//! # Modules
//!
//! - [`store`] - Credential persistence (file, memory and Redis)
//! - [`transport`] - HTTP transport (reqwest)

pub mod store;
pub mod transport;
