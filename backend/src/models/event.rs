//! Simulation events and their total order.
//!
//! An [`Event`] is a state change scheduled at a logical instant. The
//! schedule processes events in the order defined here, which is a full
//! tie-break over `(time, patient, kind, resource)`: two events compare
//! equal only when every field matches. That makes equal-time processing
//! reproducible run to run.
//!
//! "Not applicable" patient or resource ids are `None`. `None` sorts
//! before every `Some`, and renders as `-1` in transcripts.
//!
//! # Example
//!
//! ```rust
//! use hospital_des_core::models::event::{Event, EventKind};
//!
//! let visit = Event::new(10, EventKind::DoctorEntrance, Some(5), Some(1));
//! assert_eq!(
//!     visit.to_string(),
//!     "[TIME 10] Event Type: 4, Patient Id: 5, Resource Id: 1"
//! );
//!
//! let later = Event::new(11, EventKind::TriageQueueEntrance, Some(0), None);
//! assert!(visit < later);
//! ```

use crate::core::time::SimTime;
use crate::models::patient::PatientId;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Index of a triage station or doctor within its resource class.
pub type UnitId = usize;

/// The eight kinds of state change, in ordinal order.
///
/// The declaration order is the tie-break order used by [`Event`]'s `Ord`
/// and the number printed in transcripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// Patient joins the triage queue
    TriageQueueEntrance,
    /// Patient is taken into a triage station
    TriageEntrance,
    /// Patient finishes triage and frees the station
    TriageLeave,
    /// Patient joins the doctor queue at their urgency tier
    DoctorQueueEntrance,
    /// Patient is taken into a doctor's examination
    DoctorEntrance,
    /// Patient leaves the hospital (treated, or unserved when no resource)
    PatientLeaveHospital,
    /// Patience runs out while waiting for triage
    TriageQueueBoringStart,
    /// Patience runs out while waiting for a doctor
    DoctorQueueBoringStart,
}

impl EventKind {
    /// All kinds, in ordinal order
    pub const ALL: [EventKind; 8] = [
        EventKind::TriageQueueEntrance,
        EventKind::TriageEntrance,
        EventKind::TriageLeave,
        EventKind::DoctorQueueEntrance,
        EventKind::DoctorEntrance,
        EventKind::PatientLeaveHospital,
        EventKind::TriageQueueBoringStart,
        EventKind::DoctorQueueBoringStart,
    ];

    /// Numeric code printed in transcripts (0..=7)
    pub fn ordinal(self) -> u8 {
        self as u8
    }

    /// Short name of the kind
    pub fn name(self) -> &'static str {
        match self {
            EventKind::TriageQueueEntrance => "TriageQueueEntrance",
            EventKind::TriageEntrance => "TriageEntrance",
            EventKind::TriageLeave => "TriageLeave",
            EventKind::DoctorQueueEntrance => "DoctorQueueEntrance",
            EventKind::DoctorEntrance => "DoctorEntrance",
            EventKind::PatientLeaveHospital => "PatientLeaveHospital",
            EventKind::TriageQueueBoringStart => "TriageQueueBoringStart",
            EventKind::DoctorQueueBoringStart => "DoctorQueueBoringStart",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A state change at a logical instant.
///
/// Fields are private: an event never changes once it has been built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Event {
    time: SimTime,
    kind: EventKind,
    patient: Option<PatientId>,
    resource: Option<UnitId>,
}

impl Event {
    /// Build an event
    pub fn new(
        time: SimTime,
        kind: EventKind,
        patient: Option<PatientId>,
        resource: Option<UnitId>,
    ) -> Self {
        Self {
            time,
            kind,
            patient,
            resource,
        }
    }

    /// Logical instant the event fires at
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// What kind of state change this is
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// Patient the event concerns, if any
    pub fn patient(&self) -> Option<PatientId> {
        self.patient
    }

    /// Triage station or doctor the event concerns, if any
    pub fn resource(&self) -> Option<UnitId> {
        self.resource
    }

    /// Ordering key: time, then patient, then kind, then resource
    fn sort_key(&self) -> (SimTime, Option<PatientId>, EventKind, Option<UnitId>) {
        (self.time, self.patient, self.kind, self.resource)
    }

    /// Line written to the run transcript for this event
    ///
    /// Departures always print resource `-1`, whichever doctor (if any)
    /// served the patient.
    ///
    /// ```rust
    /// use hospital_des_core::models::event::{Event, EventKind};
    ///
    /// let leave = Event::new(12, EventKind::PatientLeaveHospital, Some(3), Some(1));
    /// assert_eq!(
    ///     leave.transcript_line(),
    ///     "[TIME 12] Event Type: 5, Patient Id: 3, Resource Id: -1"
    /// );
    /// ```
    pub fn transcript_line(&self) -> String {
        let resource = match self.kind {
            EventKind::PatientLeaveHospital => None,
            _ => self.resource,
        };
        render_line(self.time, self.kind, self.patient, resource)
    }
}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_line(
            self.time,
            self.kind,
            self.patient,
            self.resource,
        ))
    }
}

fn render_line(
    time: SimTime,
    kind: EventKind,
    patient: Option<PatientId>,
    resource: Option<UnitId>,
) -> String {
    format!(
        "[TIME {}] Event Type: {}, Patient Id: {}, Resource Id: {}",
        time,
        kind.ordinal(),
        signed_id(patient),
        signed_id(resource)
    )
}

fn signed_id(id: Option<usize>) -> i64 {
    id.map_or(-1, |id| id as i64)
}

/// Record of processed events, in processing order.
///
/// A thin wrapper around `Vec<Event>` with query helpers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Append a processed event
    pub fn log(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Number of events logged
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if the log is empty
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// All events, in processing order
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Events processed at a given instant
    pub fn events_at(&self, time: SimTime) -> Vec<&Event> {
        self.events.iter().filter(|e| e.time() == time).collect()
    }

    /// Events of one kind
    pub fn events_of_kind(&self, kind: EventKind) -> Vec<&Event> {
        self.events.iter().filter(|e| e.kind() == kind).collect()
    }

    /// Events concerning one patient
    pub fn events_for_patient(&self, patient: PatientId) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.patient() == Some(patient))
            .collect()
    }

    /// Timestamp of the last logged event
    pub fn last_time(&self) -> Option<SimTime> {
        self.events.last().map(Event::time)
    }
}
