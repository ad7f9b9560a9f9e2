//! Application layer - Fault decision use cases
//!
//! Contains the fault decision engine, the per-route policy table and the
//! port definitions they depend on. Adapters for randomness and request
//! headers live in the infrastructure layer.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
