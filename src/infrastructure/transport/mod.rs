//! HTTP transport seam.
//!
//! The gateway only talks to the [`Transport`] trait; [`ReqwestTransport`]
//! is the production implementation.

mod reqwest_transport;
mod service;

pub use reqwest_transport::ReqwestTransport;
pub use service::{Transport, TransportError, TransportRequest, TransportResponse};

#[cfg(test)]
pub use service::MockTransport;
