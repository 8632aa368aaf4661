//! Domain models for the hospital simulation

pub mod completion_stack;
pub mod event;
pub mod patient;
pub mod queue;
pub mod state;
pub mod tiered_queue;

// Re-exports
pub use completion_stack::{CompletionStack, StackError};
pub use event::{Event, EventKind, EventLog, UnitId};
pub use patient::{Departure, Patient, PatientId, PatientLocation, Stage, UrgencyLevel};
pub use queue::{FcfsQueue, QueueError};
pub use state::HospitalState;
pub use tiered_queue::TieredQueue;
