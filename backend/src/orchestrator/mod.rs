//! Orchestrator - event loop and end-of-run reporting
//!
//! See `engine.rs` for the handler state machine.

pub mod engine;
pub mod report;

// Re-export main types for convenience
pub use engine::{Engine, SimulationConfig, SimulationError};
pub use report::{RunReport, RunSummary};
