//! End-of-run reporting
//!
//! A [`RunReport`] renders as the run transcript:
//!
//! ```text
//! [TIME 2] Event Type: 0, Patient Id: 0, Resource Id: -1
//! ...
//! Simulation finished.
//! Monotonic Stack of Doctor 0 is {4, 2, 0}
//! ```
//!
//! It also serializes to JSON for machine consumers.

use crate::core::time::SimTime;
use crate::models::completion_stack::CompletionStack;
use crate::models::event::EventLog;
use crate::models::patient::{Departure, PatientLocation, Stage};
use crate::models::state::HospitalState;
use serde::Serialize;
use std::fmt;

/// Outcome counts for a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Number of events handled
    pub events_processed: usize,

    /// Timestamp of the last handled event (0 if none)
    pub final_time: SimTime,

    /// Number of patients configured
    pub patients: usize,

    /// Patients who completed a doctor visit
    pub treated: usize,

    /// Patients who gave up waiting for triage
    pub reneged_in_triage: usize,

    /// Patients who gave up waiting for a doctor
    pub reneged_in_doctor_queue: usize,

    /// Patients whose urgency tier was out of range
    pub dropped: usize,

    /// Patients that have not left (still queued, in service, or not yet arrived)
    pub unresolved: usize,
}

impl RunSummary {
    fn tally(events: &EventLog, state: &HospitalState) -> Self {
        let mut summary = RunSummary {
            events_processed: events.len(),
            final_time: events.last_time().unwrap_or(0),
            patients: state.num_patients(),
            ..Default::default()
        };

        for location in state.locations() {
            if !location.is_terminal() {
                summary.unresolved += 1;
                continue;
            }
            match location {
                PatientLocation::Departed {
                    departure: Departure::Treated { .. },
                } => summary.treated += 1,
                PatientLocation::Departed {
                    departure: Departure::Reneged { stage: Stage::Triage },
                } => summary.reneged_in_triage += 1,
                PatientLocation::Departed {
                    departure: Departure::Reneged { stage: Stage::Doctor },
                } => summary.reneged_in_doctor_queue += 1,
                PatientLocation::Dropped { .. } => summary.dropped += 1,
                _ => {}
            }
        }

        summary
    }
}

/// Everything a finished (or partial) run produced
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Handled events, in processing order
    pub events: EventLog,

    /// Completion stack of each doctor, indexed by doctor id
    pub doctor_stacks: Vec<CompletionStack>,

    /// Where every patient ended up
    pub final_locations: Vec<PatientLocation>,

    pub summary: RunSummary,
}

impl RunReport {
    pub fn new(events: &EventLog, state: &HospitalState) -> Self {
        Self {
            events: events.clone(),
            doctor_stacks: state.doctor_stacks().to_vec(),
            final_locations: state.locations().to_vec(),
            summary: RunSummary::tally(events, state),
        }
    }

    /// Transcript lines, one per handled event
    pub fn event_lines(&self) -> Vec<String> {
        self.events
            .events()
            .iter()
            .map(|event| event.transcript_line())
            .collect()
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for event in self.events.events() {
            writeln!(f, "{}", event.transcript_line())?;
        }
        writeln!(f, "Simulation finished.")?;
        for (doctor, stack) in self.doctor_stacks.iter().enumerate() {
            writeln!(f, "Monotonic Stack of Doctor {} is {}", doctor, stack)?;
        }
        Ok(())
    }
}
