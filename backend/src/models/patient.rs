//! Patient model
//!
//! A patient is just an id plus the two externally supplied attributes
//! the engine needs: urgency tier and arrival time. Where a patient *is*
//! at any moment is tracked separately as a [`PatientLocation`].

use crate::core::time::SimTime;
use crate::models::event::UnitId;
use serde::{Deserialize, Serialize};

/// Patient identifier, `0..num_patients`. Never reused.
pub type PatientId = usize;

/// Externally supplied urgency. Values outside `0..num_tiers`, negatives
/// included, are accepted and leave the patient out of the doctor queue.
pub type UrgencyLevel = i64;

/// Static attributes of one patient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub id: PatientId,
    /// Doctor-queue tier (0 = most urgent)
    pub urgency_level: UrgencyLevel,
    pub arrival_time: SimTime,
}

/// Which of the two serial stages a patient was in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    Triage,
    Doctor,
}

/// How a patient left the hospital
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Departure {
    /// Examined by this doctor
    Treated { doctor: UnitId },
    /// Lost patience while queued for this stage
    Reneged { stage: Stage },
}

/// Where a patient is right now
///
/// Exactly one location at any instant. The in-between states (`Arriving`,
/// `InTransit`, `Leaving`) cover the zero-duration gaps between an event
/// that releases the patient and the same-time event that places them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PatientLocation {
    /// Arrival event not processed yet
    #[default]
    Arriving,
    /// Waiting in the triage queue
    TriageQueue,
    /// Holding a triage station
    Triage { unit: UnitId },
    /// Left triage, doctor-queue entrance pending
    InTransit,
    /// Waiting in the doctor queue at this tier
    DoctorQueue { tier: usize },
    /// Holding a doctor
    Doctor { unit: UnitId },
    /// Out of every queue and unit, departure event pending
    Leaving { departure: Departure },
    /// Gone; no further effect on the run
    Departed { departure: Departure },
    /// Urgency tier was out of range, so the doctor queue ignored them
    Dropped { tier: UrgencyLevel },
}

impl PatientLocation {
    /// Whether the patient has finished with the hospital for good
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PatientLocation::Departed { .. } | PatientLocation::Dropped { .. }
        )
    }
}
