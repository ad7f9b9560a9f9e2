//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod header_override;
mod random_source;
mod request_headers;

pub use header_override::{HeaderOverride, IgnoreOverride, OpaqueOverride};
#[cfg(test)]
pub use random_source::MockRandomSource;
pub use random_source::{FixedSequence, RandomSource};
pub use request_headers::{NoHeaders, RequestHeaders};
