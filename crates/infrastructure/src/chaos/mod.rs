//! Fault injection around request handling.
//!
//! # Overview
//!
//! - `FaultInjector`: Gates one route's policy and applies its decisions
//! - `FaultStats`: Counts calls, delays and aborts
//! - `enforce`: Applies a single decision to an async operation
//!
//! # Example
//!
//! ```ignore
//! use application::{FaultDecisionEngine, NoHeaders};
//! use domain::{AbortSpec, FaultPolicy};
//! use infrastructure::{RngSource, chaos::{FaultInjector, InjectedAbort}};
//!
//! let injector = FaultInjector::new(
//!     FaultDecisionEngine::new(),
//!     FaultPolicy::abort(AbortSpec::http_status(503)),
//! );
//! let mut rng = RngSource::thread();
//!
//! let result: Result<u32, InjectedAbort> = injector
//!     .wrap(&NoHeaders, &mut rng, async { Ok(42) })
//!     .await;
//! ```

mod fault_injector;
mod fault_stats;

pub use fault_injector::{FaultInjector, FaultInjectorConfig, InjectedAbort, enforce};
pub use fault_stats::{FaultStats, FaultStatsSnapshot};
