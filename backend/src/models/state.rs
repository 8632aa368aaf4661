//! Hospital State
//!
//! Everything the event handlers read and mutate: the two resource classes,
//! the triage queue, the tiered doctor queue, each doctor's completion
//! stack, and where every patient currently is.
//!
//! # Critical Invariants
//!
//! 1. **Exclusive units**: a triage station or doctor holds at most one
//!    patient; it is available exactly when it holds none.
//! 2. **Conservation**: a patient id is in at most one of: the triage
//!    queue, one doctor tier, a held triage station, a held doctor, or
//!    departed. Checked by [`HospitalState::check_conservation`].
//! 3. **Work conservation**: a unit is never left idle while its queue has
//!    a patient waiting, so a free unit implies an empty queue.

use crate::models::completion_stack::CompletionStack;
use crate::models::event::UnitId;
use crate::models::patient::{Patient, PatientId, PatientLocation};
use crate::models::queue::FcfsQueue;
use crate::models::tiered_queue::TieredQueue;
use crate::orchestrator::SimulationError;
use serde::Serialize;

/// Complete mutable state of one hospital run
///
/// # Example
///
/// ```rust
/// use hospital_des_core::{HospitalState, Patient};
///
/// let patients = vec![Patient { id: 0, urgency_level: 1, arrival_time: 2 }];
/// let state = HospitalState::new(patients, 2, 1, 3);
///
/// assert_eq!(state.num_triage_units(), 2);
/// assert_eq!(state.first_free_doctor(), Some(0));
/// assert!(state.check_conservation().is_ok());
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct HospitalState {
    /// Static patient attributes, indexed by id
    patients: Vec<Patient>,

    /// Current location of each patient, indexed by id
    locations: Vec<PatientLocation>,

    /// Patients waiting for a triage station
    triage_queue: FcfsQueue,

    /// Patients waiting for a doctor, by urgency tier
    doctor_queue: TieredQueue,

    /// Patient held by each triage station (`None` = available)
    triage_units: Vec<Option<PatientId>>,

    /// Patient held by each doctor (`None` = available)
    doctor_units: Vec<Option<PatientId>>,

    /// Completion history of each doctor
    doctor_stacks: Vec<CompletionStack>,
}

impl HospitalState {
    /// Create an empty hospital with every unit available
    ///
    /// # Panics
    /// If `num_tiers` is zero.
    pub fn new(
        patients: Vec<Patient>,
        num_triage_units: usize,
        num_doctor_units: usize,
        num_tiers: usize,
    ) -> Self {
        let locations = vec![PatientLocation::default(); patients.len()];
        Self {
            patients,
            locations,
            triage_queue: FcfsQueue::new(),
            doctor_queue: TieredQueue::new(num_tiers),
            triage_units: vec![None; num_triage_units],
            doctor_units: vec![None; num_doctor_units],
            doctor_stacks: vec![CompletionStack::new(); num_doctor_units],
        }
    }

    // ========================================================================
    // Patients
    // ========================================================================

    pub fn num_patients(&self) -> usize {
        self.patients.len()
    }

    pub fn patients(&self) -> &[Patient] {
        &self.patients
    }

    /// Static attributes of a patient
    pub fn patient(&self, id: PatientId) -> Result<&Patient, SimulationError> {
        self.patients
            .get(id)
            .ok_or(SimulationError::UnknownPatient(id))
    }

    /// Where a patient is right now
    pub fn location(&self, id: PatientId) -> Result<PatientLocation, SimulationError> {
        self.locations
            .get(id)
            .copied()
            .ok_or(SimulationError::UnknownPatient(id))
    }

    pub fn locations(&self) -> &[PatientLocation] {
        &self.locations
    }

    pub(crate) fn set_location(
        &mut self,
        id: PatientId,
        location: PatientLocation,
    ) -> Result<(), SimulationError> {
        let slot = self
            .locations
            .get_mut(id)
            .ok_or(SimulationError::UnknownPatient(id))?;
        *slot = location;
        Ok(())
    }

    // ========================================================================
    // Queues
    // ========================================================================

    pub fn triage_queue(&self) -> &FcfsQueue {
        &self.triage_queue
    }

    pub fn doctor_queue(&self) -> &TieredQueue {
        &self.doctor_queue
    }

    pub(crate) fn triage_queue_mut(&mut self) -> &mut FcfsQueue {
        &mut self.triage_queue
    }

    pub(crate) fn doctor_queue_mut(&mut self) -> &mut TieredQueue {
        &mut self.doctor_queue
    }

    // ========================================================================
    // Resource units
    // ========================================================================

    pub fn num_triage_units(&self) -> usize {
        self.triage_units.len()
    }

    pub fn num_doctor_units(&self) -> usize {
        self.doctor_units.len()
    }

    /// Lowest-index free triage station
    pub fn first_free_triage(&self) -> Option<UnitId> {
        self.triage_units.iter().position(Option::is_none)
    }

    /// Lowest-index free doctor
    pub fn first_free_doctor(&self) -> Option<UnitId> {
        self.doctor_units.iter().position(Option::is_none)
    }

    pub(crate) fn occupy_triage(
        &mut self,
        unit: UnitId,
        patient: PatientId,
    ) -> Result<(), SimulationError> {
        occupy(&mut self.triage_units, "triage station", unit, patient)
    }

    pub(crate) fn occupy_doctor(
        &mut self,
        unit: UnitId,
        patient: PatientId,
    ) -> Result<(), SimulationError> {
        occupy(&mut self.doctor_units, "doctor", unit, patient)
    }

    /// Free a triage station, returning who held it
    pub(crate) fn release_triage(&mut self, unit: UnitId) -> Result<Option<PatientId>, SimulationError> {
        release(&mut self.triage_units, "triage station", unit)
    }

    /// Free a doctor, returning who held it
    pub(crate) fn release_doctor(&mut self, unit: UnitId) -> Result<Option<PatientId>, SimulationError> {
        release(&mut self.doctor_units, "doctor", unit)
    }

    // ========================================================================
    // Completion stacks
    // ========================================================================

    pub fn doctor_stacks(&self) -> &[CompletionStack] {
        &self.doctor_stacks
    }

    pub(crate) fn record_completion(
        &mut self,
        doctor: UnitId,
        patient: PatientId,
    ) -> Result<(), SimulationError> {
        self.doctor_stacks
            .get_mut(doctor)
            .ok_or_else(|| SimulationError::UnknownUnit {
                kind: "doctor",
                unit: doctor,
            })?
            .push(patient);
        Ok(())
    }

    // ========================================================================
    // Invariants
    // ========================================================================

    /// Verify every patient is held by at most one queue or unit, and that
    /// the structures agree with the recorded location.
    pub fn check_conservation(&self) -> Result<(), SimulationError> {
        let mut found: Vec<Vec<PatientLocation>> = vec![Vec::new(); self.patients.len()];

        let mut place = |patient: PatientId, location: PatientLocation| {
            found
                .get_mut(patient)
                .map(|places| places.push(location))
                .ok_or(SimulationError::UnknownPatient(patient))
        };

        for patient in self.triage_queue.iter() {
            place(patient, PatientLocation::TriageQueue)?;
        }
        for tier in 0..self.doctor_queue.num_tiers() {
            if let Some(queue) = self.doctor_queue.tier(tier) {
                for patient in queue.iter() {
                    place(patient, PatientLocation::DoctorQueue { tier })?;
                }
            }
        }
        for (unit, holder) in self.triage_units.iter().enumerate() {
            if let Some(patient) = *holder {
                place(patient, PatientLocation::Triage { unit })?;
            }
        }
        for (unit, holder) in self.doctor_units.iter().enumerate() {
            if let Some(patient) = *holder {
                place(patient, PatientLocation::Doctor { unit })?;
            }
        }

        for (patient, places) in found.into_iter().enumerate() {
            let location = self.locations[patient];
            if places.len() > 1 {
                return Err(SimulationError::ConservationViolated {
                    patient,
                    detail: format!("held in {} places: {:?}", places.len(), places),
                });
            }

            let consistent = match location {
                PatientLocation::TriageQueue
                | PatientLocation::Triage { .. }
                | PatientLocation::DoctorQueue { .. }
                | PatientLocation::Doctor { .. } => places == [location],
                _ => places.is_empty(),
            };
            if !consistent {
                return Err(SimulationError::ConservationViolated {
                    patient,
                    detail: format!("recorded at {:?} but found in {:?}", location, places),
                });
            }
        }

        Ok(())
    }
}

fn occupy(
    units: &mut [Option<PatientId>],
    kind: &'static str,
    unit: UnitId,
    patient: PatientId,
) -> Result<(), SimulationError> {
    let slot = units
        .get_mut(unit)
        .ok_or(SimulationError::UnknownUnit { kind, unit })?;
    if let Some(holder) = *slot {
        return Err(SimulationError::UnitBusy { kind, unit, holder });
    }
    *slot = Some(patient);
    Ok(())
}

fn release(
    units: &mut [Option<PatientId>],
    kind: &'static str,
    unit: UnitId,
) -> Result<Option<PatientId>, SimulationError> {
    units
        .get_mut(unit)
        .map(Option::take)
        .ok_or(SimulationError::UnknownUnit { kind, unit })
}
