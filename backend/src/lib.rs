//! Hospital DES Core - Rust Engine
//!
//! Discrete-event simulation of patients flowing through triage and then a
//! doctor examination, with finite resources, urgency tiers and patience
//! timeouts.
//!
//! # Architecture
//!
//! - **core**: Logical time
//! - **models**: Domain types (Event, queues, completion stack, patients, state)
//! - **events**: Pending-event schedule
//! - **orchestrator**: Main simulation loop and reporting
//!
//! # Critical Invariants
//!
//! 1. Events are processed in a strict total order over
//!    (time, patient, kind, resource), so runs are reproducible
//! 2. A patient is in at most one queue or unit at any instant
//! 3. Scheduled events are never cancelled; stale ones are no-ops

// Module declarations
pub mod core;
pub mod events;
pub mod models;
pub mod orchestrator;

// Re-exports for convenience
pub use crate::core::time::{SimClock, SimTime};
pub use events::EventSchedule;
pub use models::{
    completion_stack::{CompletionStack, StackError},
    event::{Event, EventKind, EventLog, UnitId},
    patient::{Departure, Patient, PatientId, PatientLocation, Stage, UrgencyLevel},
    queue::{FcfsQueue, QueueError},
    state::HospitalState,
    tiered_queue::TieredQueue,
};
pub use orchestrator::{Engine, RunReport, RunSummary, SimulationConfig, SimulationError};
