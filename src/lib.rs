//! CORS relay library.
//!
//! A single-endpoint HTTP relay: GET requests are forwarded to the URL in
//! their `url` query parameter, the client's `X-Football-API-Key` becomes the
//! upstream `X-Auth-Token`, and the upstream body comes back with CORS
//! headers so browser code can read it.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod upstream;

pub use config::schema::RelayConfig;
pub use http::RelayServer;
pub use lifecycle::Shutdown;
