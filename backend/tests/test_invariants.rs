//! Invariant checks over whole runs
//!
//! Runs random (but finite, non-negative) configurations and checks after
//! every handled event that:
//! - each patient is in at most one queue or unit
//! - no unit idles while its queue has someone waiting
//! - logical time never goes backwards
//!
//! and that every run terminates.

use hospital_des_core::{
    Engine, EventKind, HospitalState, PatientLocation, SimulationConfig, SimulationError,
};
use proptest::prelude::*;

fn check_work_conserving(state: &HospitalState) -> Result<(), SimulationError> {
    if state.first_free_triage().is_some() && !state.triage_queue().is_empty() {
        return Err(SimulationError::InvalidConfig(
            "free triage station with patients waiting".to_string(),
        ));
    }
    if state.first_free_doctor().is_some() && !state.doctor_queue().is_empty() {
        return Err(SimulationError::InvalidConfig(
            "free doctor with patients waiting".to_string(),
        ));
    }
    Ok(())
}

fn arb_config() -> impl Strategy<Value = SimulationConfig> {
    (
        0usize..4,
        0usize..4,
        1usize..4,
        0u64..5,
        0u64..8,
        0u64..6,
        proptest::collection::vec((-1i64..5, 0u64..15), 0..12),
    )
        .prop_map(
            |(triage, doctors, tiers, t_dur, d_dur, b_dur, patients)| SimulationConfig {
                num_triage_units: triage,
                num_doctor_units: doctors,
                num_tiers: tiers,
                triage_duration: t_dur,
                doctor_visit_duration: d_dur,
                boring_duration: b_dur,
                // Urgency may be negative or exceed the tier count on purpose
                urgency_levels: patients.iter().map(|&(u, _)| u).collect(),
                arrival_times: patients.iter().map(|&(_, a)| a).collect(),
            },
        )
}

#[test]
fn test_conservation_holds_through_contended_run() {
    let config = SimulationConfig::from_parts(
        1,
        1,
        3,
        3,
        4,
        2,
        6,
        &[2, 1, 0, 2, 1, 0],
        &[0, 0, 1, 1, 2, 2],
    )
    .unwrap();
    let mut engine = Engine::new(config).unwrap();

    let mut checks = 0;
    let report = engine
        .run_with(|_, state| {
            checks += 1;
            state.check_conservation()?;
            check_work_conserving(state)
        })
        .unwrap();

    assert_eq!(checks, report.summary.events_processed);
    assert_eq!(
        report.summary.treated
            + report.summary.reneged_in_triage
            + report.summary.reneged_in_doctor_queue
            + report.summary.dropped
            + report.summary.unresolved,
        6
    );
}

#[test]
fn test_observer_error_stops_the_run() {
    let config = SimulationConfig::from_parts(1, 1, 1, 1, 1, 1, 2, &[0, 0], &[0, 0]).unwrap();
    let mut engine = Engine::new(config).unwrap();

    let err = engine
        .run_with(|event, _| {
            if event.kind() == EventKind::TriageLeave {
                Err(SimulationError::InvalidConfig("stop".to_string()))
            } else {
                Ok(())
            }
        })
        .unwrap_err();
    assert!(err.to_string().contains("stop"));
    assert!(!engine.is_finished());
}

#[test]
fn test_step_by_step_matches_run() {
    let config = SimulationConfig::from_parts(1, 1, 2, 2, 2, 3, 3, &[1, 0, 1], &[0, 1, 1]).unwrap();

    let mut stepped = Engine::new(config.clone()).unwrap();
    let mut events = Vec::new();
    while let Some(event) = stepped.step().unwrap() {
        events.push(event);
    }

    let mut batch = Engine::new(config).unwrap();
    let report = batch.run().unwrap();
    assert_eq!(events.as_slice(), report.events.events());
    assert_eq!(stepped.report().to_string(), report.to_string());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_runs_terminate_and_conserve_patients(config in arb_config()) {
        let num_patients = config.num_patients();
        let num_tiers = config.num_tiers;
        let urgency = config.urgency_levels.clone();
        let mut engine = Engine::new(config).unwrap();

        let mut last_time = 0;
        let report = engine
            .run_with(|event, state| {
                if event.time() < last_time {
                    return Err(SimulationError::InvalidConfig("time went backwards".to_string()));
                }
                last_time = event.time();
                state.check_conservation()?;
                check_work_conserving(state)
            })
            .unwrap();

        prop_assert!(engine.is_finished());
        // Each patient produces a bounded number of events
        prop_assert!(report.summary.events_processed <= num_patients * 8);

        for (id, location) in report.final_locations.iter().enumerate() {
            match location {
                PatientLocation::Dropped { tier } => {
                    prop_assert_eq!(*tier, urgency[id]);
                    prop_assert!(*tier < 0 || *tier >= num_tiers as i64);
                }
                PatientLocation::Departed { .. }
                | PatientLocation::TriageQueue
                | PatientLocation::DoctorQueue { .. } => {}
                other => prop_assert!(false, "patient {} ended at {:?}", id, other),
            }
        }

        // Every served patient appears in a departure carrying its doctor
        let served = engine
            .event_log()
            .events_of_kind(EventKind::PatientLeaveHospital)
            .iter()
            .filter(|e| e.resource().is_some())
            .count();
        prop_assert_eq!(served, report.summary.treated);
    }

    #[test]
    fn prop_completion_stacks_are_monotonic(config in arb_config()) {
        let mut engine = Engine::new(config).unwrap();
        let report = engine.run().unwrap();
        for stack in &report.doctor_stacks {
            let contents: Vec<usize> = stack.iter().collect();
            prop_assert!(contents.windows(2).all(|w| w[0] <= w[1]));
        }
    }
}
