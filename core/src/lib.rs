//! Event-location reconciliation core for the Rust seismic analysis
//! workstation.
//!
//! The modules mirror the legacy analyst-workstation location pipeline while
//! providing safe abstractions: domain records for detections and location
//! solutions, the defining-state reconciliation stages, and telemetry.

pub mod domain;
pub mod math;
pub mod prelude;
pub mod reconciliation;
pub mod telemetry;

pub use prelude::{DefiningChange, DefiningType, EngineError, EngineResult};
