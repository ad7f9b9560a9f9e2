//! Value Objects - Immutable, identity-less domain primitives

mod percent;
mod proto_duration;

pub use percent::{InvalidPercent, Percent};
pub use proto_duration::ProtoDuration;
