//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection (listener owned by main)
//!     → server.rs (axum setup, request ID, trace layer)
//!     → handler.rs (method dispatch)
//!         OPTIONS → cors.rs (preflight headers)
//!         GET     → request.rs (url param, API key)
//!                 → upstream::UpstreamClient
//!                 → body + CORS headers, or error.rs (400/500)
//!     → Send to client
//! ```

pub mod cors;
pub mod error;
pub mod handler;
pub mod request;
pub mod server;

pub use error::RelayError;
pub use server::{AppState, RelayServer, ServerError};
