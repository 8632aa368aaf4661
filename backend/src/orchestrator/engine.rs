//! Simulation Engine
//!
//! Drives patients through two serial resource stages, triage and doctor
//! examination, on a single logical timeline.
//!
//! # Architecture
//!
//! ```text
//! new():   seed one TriageQueueEntrance per patient at its arrival time
//! run():   while the schedule is non-empty:
//!            1. pop the earliest event (total order: time, patient, kind, resource)
//!            2. advance the clock, log the event
//!            3. apply its handler (mutate units/queues, schedule follow-ups)
//!          then summarise each doctor's completion stack
//! ```
//!
//! Handlers never cancel scheduled events. A patience timeout fires for
//! every queued patient and only takes effect if that patient is still the
//! tail of the queue they joined.
//!
//! Both stages assign the lowest-index free unit. The doctor queue always
//! serves the lowest tier with a waiting patient.
//!
//! # Example
//!
//! ```rust
//! use hospital_des_core::{Engine, SimulationConfig};
//!
//! let config = SimulationConfig {
//!     num_triage_units: 2,
//!     num_doctor_units: 2,
//!     num_tiers: 3,
//!     triage_duration: 4,
//!     doctor_visit_duration: 5,
//!     boring_duration: 6,
//!     urgency_levels: vec![2, 1],
//!     arrival_times: vec![2, 2],
//! };
//!
//! let mut engine = Engine::new(config).unwrap();
//! let report = engine.run().unwrap();
//!
//! assert_eq!(report.summary.treated, 2);
//! println!("{}", report);
//! ```

use crate::core::time::{SimClock, SimTime};
use crate::events::schedule::EventSchedule;
use crate::models::event::{Event, EventKind, EventLog, UnitId};
use crate::models::patient::{Departure, Patient, PatientId, PatientLocation, Stage, UrgencyLevel};
use crate::models::queue::QueueError;
use crate::models::state::HospitalState;
use crate::orchestrator::report::RunReport;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, trace, warn};

// ============================================================================
// Configuration Types
// ============================================================================

/// Complete simulation configuration
///
/// Patient attributes are two parallel arrays indexed by patient id; their
/// common length is the patient count.
///
/// Loadable from a JSON scenario document:
///
/// ```rust
/// use hospital_des_core::SimulationConfig;
///
/// let config = SimulationConfig::from_json_str(r#"{
///     "num_triage_units": 0,
///     "num_doctor_units": 1,
///     "num_tiers": 3,
///     "triage_duration": 0,
///     "doctor_visit_duration": 10,
///     "boring_duration": 4,
///     "urgency_levels": [1, 2],
///     "arrival_times": [1, 2]
/// }"#).unwrap();
///
/// assert_eq!(config.num_patients(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationConfig {
    /// Number of triage stations
    pub num_triage_units: usize,

    /// Number of doctors
    pub num_doctor_units: usize,

    /// Number of doctor-queue priority tiers (must be > 0)
    pub num_tiers: usize,

    /// Time a patient spends in triage
    pub triage_duration: SimTime,

    /// Time a patient spends with a doctor
    pub doctor_visit_duration: SimTime,

    /// Wait after joining a queue before the patience check fires
    pub boring_duration: SimTime,

    /// Doctor-queue tier of each patient (0 = most urgent)
    pub urgency_levels: Vec<UrgencyLevel>,

    /// Arrival time of each patient
    pub arrival_times: Vec<SimTime>,
}

impl SimulationConfig {
    /// Build a configuration from the positional parameter list
    ///
    /// `num_patients` must match both array lengths.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        num_triage_units: usize,
        num_doctor_units: usize,
        num_tiers: usize,
        triage_duration: SimTime,
        doctor_visit_duration: SimTime,
        boring_duration: SimTime,
        num_patients: usize,
        urgency_levels: &[UrgencyLevel],
        arrival_times: &[SimTime],
    ) -> Result<Self, SimulationError> {
        if urgency_levels.len() != num_patients {
            return Err(SimulationError::InvalidConfig(format!(
                "expected {} urgency levels, got {}",
                num_patients,
                urgency_levels.len()
            )));
        }
        if arrival_times.len() != num_patients {
            return Err(SimulationError::InvalidConfig(format!(
                "expected {} arrival times, got {}",
                num_patients,
                arrival_times.len()
            )));
        }

        let config = Self {
            num_triage_units,
            num_doctor_units,
            num_tiers,
            triage_duration,
            doctor_visit_duration,
            boring_duration,
            urgency_levels: urgency_levels.to_vec(),
            arrival_times: arrival_times.to_vec(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON scenario document
    pub fn from_json_str(json: &str) -> Result<Self, SimulationError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| SimulationError::InvalidConfig(format!("Scenario parse failed: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON scenario file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SimulationError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            SimulationError::InvalidConfig(format!("Cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&json)
    }

    /// Number of patients
    pub fn num_patients(&self) -> usize {
        self.arrival_times.len()
    }

    /// Check construction-time contracts
    ///
    /// Urgency levels outside `0..num_tiers`, negative ones included, are
    /// *not* rejected: those patients are dropped when they reach the
    /// doctor queue.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.num_tiers == 0 {
            return Err(SimulationError::InvalidConfig(
                "num_tiers must be > 0".to_string(),
            ));
        }

        if self.urgency_levels.len() != self.arrival_times.len() {
            return Err(SimulationError::InvalidConfig(format!(
                "urgency_levels has {} entries but arrival_times has {}",
                self.urgency_levels.len(),
                self.arrival_times.len()
            )));
        }

        Ok(())
    }

    /// Patients described by this configuration, indexed by id
    pub fn patients(&self) -> Vec<Patient> {
        self.urgency_levels
            .iter()
            .zip(&self.arrival_times)
            .enumerate()
            .map(|(id, (&urgency_level, &arrival_time))| Patient {
                id,
                urgency_level,
                arrival_time,
            })
            .collect()
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Simulation errors
///
/// The engine is deterministic, so every error is a contract violation by
/// the caller or a bug; none is worth retrying.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Configuration validation error
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Pop or peek on an empty queue
    #[error(transparent)]
    Queue(#[from] QueueError),

    /// Patient id outside `0..num_patients`
    #[error("Patient not found: {0}")]
    UnknownPatient(PatientId),

    /// Resource unit id out of range
    #[error("Unknown {kind} {unit}")]
    UnknownUnit { kind: &'static str, unit: UnitId },

    /// Tried to assign a patient to a unit that is already serving
    #[error("{kind} {unit} is already serving patient {holder}")]
    UnitBusy {
        kind: &'static str,
        unit: UnitId,
        holder: PatientId,
    },

    /// An event lacks the patient or resource its handler needs
    #[error("Malformed event {event}: {reason}")]
    MalformedEvent { event: Event, reason: &'static str },

    /// A follow-up event would land past the end of logical time
    #[error("Logical time overflow: {time} + {delay}")]
    TimeOverflow { time: SimTime, delay: SimTime },

    /// A patient is in more than one place, or not where it is recorded
    #[error("Conservation violated for patient {patient}: {detail}")]
    ConservationViolated { patient: PatientId, detail: String },
}

// ============================================================================
// Engine
// ============================================================================

/// Discrete-event simulation of the hospital
///
/// The engine owns every piece of simulation state. One event is handled
/// to completion before the next one is popped.
#[derive(Debug, Clone)]
pub struct Engine {
    /// Configuration the run was built from
    config: SimulationConfig,

    /// Units, queues, stacks, patient locations
    state: HospitalState,

    /// Pending events
    schedule: EventSchedule,

    /// Logical time of the last processed event
    clock: SimClock,

    /// Every processed event, in order
    event_log: EventLog,
}

impl Engine {
    /// Validate the configuration and seed one arrival per patient
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        config.validate()?;

        let state = HospitalState::new(
            config.patients(),
            config.num_triage_units,
            config.num_doctor_units,
            config.num_tiers,
        );

        let mut schedule = EventSchedule::new();
        for patient in state.patients() {
            schedule.enqueue(Event::new(
                patient.arrival_time,
                EventKind::TriageQueueEntrance,
                Some(patient.id),
                None,
            ));
        }

        Ok(Self {
            config,
            state,
            schedule,
            clock: SimClock::new(),
            event_log: EventLog::new(),
        })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn state(&self) -> &HospitalState {
        &self.state
    }

    pub fn schedule(&self) -> &EventSchedule {
        &self.schedule
    }

    /// Logical time of the last processed event
    pub fn now(&self) -> SimTime {
        self.clock.now()
    }

    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    /// Whether the schedule has drained
    pub fn is_finished(&self) -> bool {
        self.schedule.is_empty()
    }

    // ========================================================================
    // Main loop
    // ========================================================================

    /// Process the earliest pending event
    ///
    /// Returns the event handled, or `None` once the schedule is empty.
    pub fn step(&mut self) -> Result<Option<Event>, SimulationError> {
        if self.schedule.is_empty() {
            return Ok(None);
        }
        let event = self.schedule.dequeue()?;

        self.clock.advance_to(event.time());
        debug!(
            time = event.time(),
            kind = %event.kind(),
            patient = ?event.patient(),
            resource = ?event.resource(),
            "Processing event"
        );
        self.event_log.log(event);

        self.process_event(&event)?;
        Ok(Some(event))
    }

    /// Run until the schedule is empty
    pub fn run(&mut self) -> Result<RunReport, SimulationError> {
        self.run_with(|_, _| Ok(()))
    }

    /// Run until the schedule is empty, calling `observer` after each handler
    ///
    /// An observer error stops the run and is returned as-is.
    pub fn run_with<F>(&mut self, mut observer: F) -> Result<RunReport, SimulationError>
    where
        F: FnMut(&Event, &HospitalState) -> Result<(), SimulationError>,
    {
        info!(
            patients = self.state.num_patients(),
            triage_units = self.state.num_triage_units(),
            doctor_units = self.state.num_doctor_units(),
            tiers = self.config.num_tiers,
            "Starting simulation"
        );

        while let Some(event) = self.step()? {
            observer(&event, &self.state)?;
        }

        let report = self.report();
        info!(
            events = report.summary.events_processed,
            final_time = report.summary.final_time,
            treated = report.summary.treated,
            reneged = report.summary.reneged_in_triage + report.summary.reneged_in_doctor_queue,
            "Simulation finished"
        );
        Ok(report)
    }

    /// Snapshot of the run so far
    pub fn report(&self) -> RunReport {
        RunReport::new(&self.event_log, &self.state)
    }

    // ========================================================================
    // Event handlers
    // ========================================================================

    fn process_event(&mut self, event: &Event) -> Result<(), SimulationError> {
        match event.kind() {
            EventKind::TriageQueueEntrance => self.on_triage_queue_entrance(event),
            EventKind::TriageEntrance => self.on_triage_entrance(event),
            EventKind::TriageLeave => self.on_triage_leave(event),
            EventKind::DoctorQueueEntrance => self.on_doctor_queue_entrance(event),
            EventKind::DoctorEntrance => self.on_doctor_entrance(event),
            EventKind::PatientLeaveHospital => self.on_patient_leave(event),
            EventKind::TriageQueueBoringStart => self.on_triage_queue_boring(event),
            EventKind::DoctorQueueBoringStart => self.on_doctor_queue_boring(event),
        }
    }

    fn on_triage_queue_entrance(&mut self, event: &Event) -> Result<(), SimulationError> {
        let patient = required_patient(event)?;
        let now = event.time();

        self.state.triage_queue_mut().enqueue(patient);
        self.state.set_location(patient, PatientLocation::TriageQueue)?;

        let bored_at = later(now, self.config.boring_duration)?;
        self.schedule_event(Event::new(
            bored_at,
            EventKind::TriageQueueBoringStart,
            Some(patient),
            None,
        ));

        self.admit_to_triage(now)
    }

    fn on_triage_entrance(&mut self, event: &Event) -> Result<(), SimulationError> {
        let patient = required_patient(event)?;
        let unit = required_resource(event)?;

        let done_at = later(event.time(), self.config.triage_duration)?;
        self.schedule_event(Event::new(
            done_at,
            EventKind::TriageLeave,
            Some(patient),
            Some(unit),
        ));
        Ok(())
    }

    fn on_triage_leave(&mut self, event: &Event) -> Result<(), SimulationError> {
        let patient = required_patient(event)?;
        let unit = required_resource(event)?;
        let now = event.time();

        let holder = self.state.release_triage(unit)?;
        check_holder(event, holder, patient)?;
        self.state.set_location(patient, PatientLocation::InTransit)?;
        self.schedule_event(Event::new(
            now,
            EventKind::DoctorQueueEntrance,
            Some(patient),
            None,
        ));

        self.admit_to_triage(now)
    }

    fn on_doctor_queue_entrance(&mut self, event: &Event) -> Result<(), SimulationError> {
        let patient = required_patient(event)?;
        let now = event.time();
        let urgency = self.state.patient(patient)?.urgency_level;

        let admitted = match usize::try_from(urgency) {
            Ok(tier) if self.state.doctor_queue_mut().enqueue(patient, tier) => Some(tier),
            _ => None,
        };
        match admitted {
            Some(tier) => self
                .state
                .set_location(patient, PatientLocation::DoctorQueue { tier })?,
            None => {
                warn!(
                    patient,
                    urgency,
                    num_tiers = self.config.num_tiers,
                    "Urgency tier out of range, patient dropped from doctor queue"
                );
                self.state
                    .set_location(patient, PatientLocation::Dropped { tier: urgency })?;
            }
        }

        let bored_at = later(now, self.config.boring_duration)?;
        self.schedule_event(Event::new(
            bored_at,
            EventKind::DoctorQueueBoringStart,
            Some(patient),
            None,
        ));

        self.admit_to_doctor(now)
    }

    fn on_doctor_entrance(&mut self, event: &Event) -> Result<(), SimulationError> {
        let patient = required_patient(event)?;
        let unit = required_resource(event)?;

        let done_at = later(event.time(), self.config.doctor_visit_duration)?;
        self.schedule_event(Event::new(
            done_at,
            EventKind::PatientLeaveHospital,
            Some(patient),
            Some(unit),
        ));
        Ok(())
    }

    fn on_patient_leave(&mut self, event: &Event) -> Result<(), SimulationError> {
        let patient = required_patient(event)?;

        match event.resource() {
            Some(doctor) => {
                let holder = self.state.release_doctor(doctor)?;
                check_holder(event, holder, patient)?;
                self.state.record_completion(doctor, patient)?;
                self.state.set_location(
                    patient,
                    PatientLocation::Departed {
                        departure: Departure::Treated { doctor },
                    },
                )?;
                self.admit_to_doctor(event.time())
            }
            None => match self.state.location(patient)? {
                PatientLocation::Leaving { departure } => self
                    .state
                    .set_location(patient, PatientLocation::Departed { departure }),
                _ => Err(SimulationError::MalformedEvent {
                    event: *event,
                    reason: "unserved departure for a patient who is not leaving",
                }),
            },
        }
    }

    fn on_triage_queue_boring(&mut self, event: &Event) -> Result<(), SimulationError> {
        let patient = required_patient(event)?;

        if self.state.triage_queue().peek_back() != Ok(patient) {
            return Ok(());
        }
        self.state.triage_queue_mut().remove_back()?;
        self.renege(event.time(), patient, Stage::Triage)
    }

    fn on_doctor_queue_boring(&mut self, event: &Event) -> Result<(), SimulationError> {
        let patient = required_patient(event)?;

        let Some(tier) = self.state.doctor_queue().tail_tier_of(patient) else {
            return Ok(());
        };
        self.state.doctor_queue_mut().remove_tier_back(tier)?;
        self.renege(event.time(), patient, Stage::Doctor)
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    /// Move the triage-queue head into the first free station, if both exist
    fn admit_to_triage(&mut self, now: SimTime) -> Result<(), SimulationError> {
        let Some(unit) = self.state.first_free_triage() else {
            return Ok(());
        };
        if self.state.triage_queue().is_empty() {
            return Ok(());
        }

        let patient = self.state.triage_queue_mut().dequeue()?;
        self.state.occupy_triage(unit, patient)?;
        self.state
            .set_location(patient, PatientLocation::Triage { unit })?;
        self.schedule_event(Event::new(
            now,
            EventKind::TriageEntrance,
            Some(patient),
            Some(unit),
        ));
        Ok(())
    }

    /// Move the doctor-queue head into the first free doctor, if both exist
    fn admit_to_doctor(&mut self, now: SimTime) -> Result<(), SimulationError> {
        let Some(unit) = self.state.first_free_doctor() else {
            return Ok(());
        };
        if self.state.doctor_queue().is_empty() {
            return Ok(());
        }

        let patient = self.state.doctor_queue_mut().dequeue()?;
        self.state.occupy_doctor(unit, patient)?;
        self.state
            .set_location(patient, PatientLocation::Doctor { unit })?;
        self.schedule_event(Event::new(
            now,
            EventKind::DoctorEntrance,
            Some(patient),
            Some(unit),
        ));
        Ok(())
    }

    /// Patient already removed from `stage`'s queue walks out unserved
    fn renege(&mut self, now: SimTime, patient: PatientId, stage: Stage) -> Result<(), SimulationError> {
        debug!(time = now, patient, ?stage, "Patient lost patience");
        self.state.set_location(
            patient,
            PatientLocation::Leaving {
                departure: Departure::Reneged { stage },
            },
        )?;
        self.schedule_event(Event::new(
            now,
            EventKind::PatientLeaveHospital,
            Some(patient),
            None,
        ));
        Ok(())
    }

    fn schedule_event(&mut self, event: Event) {
        trace!(
            time = event.time(),
            kind = %event.kind(),
            patient = ?event.patient(),
            resource = ?event.resource(),
            "Scheduling event"
        );
        self.schedule.enqueue(event);
    }
}

fn required_patient(event: &Event) -> Result<PatientId, SimulationError> {
    event.patient().ok_or(SimulationError::MalformedEvent {
        event: *event,
        reason: "missing patient id",
    })
}

fn required_resource(event: &Event) -> Result<UnitId, SimulationError> {
    event.resource().ok_or(SimulationError::MalformedEvent {
        event: *event,
        reason: "missing resource id",
    })
}

/// The unit just released must have been serving the event's patient
fn check_holder(
    event: &Event,
    holder: Option<PatientId>,
    patient: PatientId,
) -> Result<(), SimulationError> {
    match holder {
        Some(held) if held == patient => Ok(()),
        Some(_) => Err(SimulationError::MalformedEvent {
            event: *event,
            reason: "unit was serving a different patient",
        }),
        None => Err(SimulationError::MalformedEvent {
            event: *event,
            reason: "unit was already free",
        }),
    }
}

fn later(now: SimTime, delay: SimTime) -> Result<SimTime, SimulationError> {
    now.checked_add(delay)
        .ok_or(SimulationError::TimeOverflow { time: now, delay })
}
