//! Upstream subsystem.
//!
//! # Data Flow
//! ```text
//! http::handler (url + optional API key)
//!     → OutboundRequest
//!     → client.rs (GET, Accept: application/json, X-Auth-Token)
//!     → Result<Bytes, UpstreamError>
//! ```

pub mod client;

pub use client::{OutboundRequest, UpstreamClient, UpstreamError, X_AUTH_TOKEN};
