//! Domain entities for HTTP fault injection

mod abort_spec;
mod delay_spec;
mod fault_outcome;
mod fault_policy;

pub use abort_spec::{AbortCode, AbortSpec};
pub use delay_spec::{DelayKind, DelaySpec};
pub use fault_outcome::FaultOutcome;
pub use fault_policy::FaultPolicy;
