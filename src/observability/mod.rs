//! Observability subsystem.
//!
//! Only process-level logging exists: startup and shutdown events at info,
//! per-request detail at debug. There is no metrics or access-log surface.

pub mod logging;

pub use logging::init_logging;
