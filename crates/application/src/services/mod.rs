//! Application services - Use case implementations

mod fault_engine;
mod route_table;

pub use fault_engine::FaultDecisionEngine;
pub use route_table::RouteFaultTable;
