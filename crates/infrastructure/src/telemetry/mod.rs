//! Logging infrastructure
//!
//! Initialises the global `tracing` subscriber for FaultLine processes.

mod logging;

pub use logging::{LogFormat, LoggingConfig, TelemetryError, init_logging};
