//! Domain layer for FaultLine
//!
//! Contains the validated HTTP fault injection model: percentages, durations,
//! delay and abort specifications, fault policies and decision outcomes.
//! This layer has no I/O and defines the ubiquitous language.

pub mod entities;
pub mod errors;
pub mod schema;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use schema::{AbortConfig, DelayConfig, HttpFaultInjectionConfig};
pub use value_objects::*;
