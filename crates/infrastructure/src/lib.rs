//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer.
//! Contains configuration loading, logging, `rand` and `http` adapters, and
//! the fault injector that applies decisions to async operations.

pub mod chaos;
pub mod config;
pub mod headers;
pub mod random;
pub mod telemetry;

pub use chaos::{
    FaultInjector, FaultInjectorConfig, FaultStats, FaultStatsSnapshot, InjectedAbort, enforce,
};
pub use config::{ConfigLoadError, FaultLineConfig, HeaderOverrideMode, RouteConfig};
pub use headers::HttpHeaders;
pub use random::RngSource;
pub use telemetry::{LogFormat, LoggingConfig, TelemetryError, init_logging};
