//! Configuration subsystem.
//!
//! # Data Flow
//! ```text
//! command-line flags (main.rs, clap)
//!     → schema.rs (RelayConfig with defaults)
//!     → validation.rs (semantic checks)
//!     → RelayConfig (validated, immutable)
//!     → handed to RelayServer and logging setup
//! ```
//!
//! # Design Decisions
//! - No config file and no environment-driven config
//! - Defaults reproduce the fixed loopback:8888 contract

pub mod schema;
pub mod validation;

pub use schema::{ListenerConfig, ObservabilityConfig, RelayConfig, TimeoutConfig, DEFAULT_BIND_ADDRESS};
pub use validation::{validate_config, ConfigError, ValidationError};
