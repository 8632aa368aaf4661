//! Tests for the event total order and the event schedule
//!
//! The schedule's dequeue order must be a strict weak ordering over
//! (time, patient, kind, resource); otherwise equal-time processing would
//! not be reproducible.

use hospital_des_core::{Event, EventKind, EventSchedule};
use proptest::prelude::*;
use std::cmp::Ordering;

fn arb_event() -> impl Strategy<Value = Event> {
    (
        0u64..6,
        proptest::option::of(0usize..4),
        0usize..8,
        proptest::option::of(0usize..3),
    )
        .prop_map(|(time, patient, kind, resource)| {
            Event::new(time, EventKind::ALL[kind], patient, resource)
        })
}

#[test]
fn test_comparison_examples() {
    let event4 = Event::new(15, EventKind::PatientLeaveHospital, Some(3), Some(2));
    let event5 = Event::new(16, EventKind::PatientLeaveHospital, Some(3), Some(2));
    let event6 = Event::new(15, EventKind::PatientLeaveHospital, Some(4), Some(2));
    let event7 = Event::new(15, EventKind::PatientLeaveHospital, Some(3), Some(3));
    let event8 = Event::new(15, EventKind::DoctorQueueEntrance, Some(3), Some(2));

    assert!(event4 < event5);
    assert!(!(event5 < event4));
    assert!(event4 < event6);
    assert!(!(event6 < event4));
    assert!(event4 < event7);
    assert!(!(event7 < event4));
    assert!(!(event4 < event8));
    assert!(event8 < event4);
}

#[test]
fn test_event_is_copied_not_shared() {
    let event1 = Event::new(10, EventKind::DoctorEntrance, Some(5), Some(1));
    let event2 = event1;
    assert_eq!(event2.to_string(), "[TIME 10] Event Type: 4, Patient Id: 5, Resource Id: 1");
    assert_eq!(event1, event2);

    let event12 = Event::new(100, event1.kind(), event1.patient(), event1.resource());
    assert_eq!(event12.to_string(), "[TIME 100] Event Type: 4, Patient Id: 5, Resource Id: 1");
    assert_eq!(event1.time(), 10);
}

#[test]
fn test_schedule_orders_priority_queue_example() {
    let mut schedule = EventSchedule::new();
    schedule.enqueue(Event::new(20, EventKind::TriageQueueEntrance, Some(10), None));
    schedule.enqueue(Event::new(10, EventKind::DoctorEntrance, Some(5), Some(1)));
    schedule.enqueue(Event::new(15, EventKind::TriageLeave, Some(12), Some(3)));
    schedule.enqueue(Event::new(5, EventKind::PatientLeaveHospital, Some(3), Some(2)));

    let lines: Vec<String> = std::iter::from_fn(|| schedule.dequeue().ok())
        .map(|e| e.to_string())
        .collect();
    assert_eq!(
        lines,
        vec![
            "[TIME 5] Event Type: 5, Patient Id: 3, Resource Id: 2",
            "[TIME 10] Event Type: 4, Patient Id: 5, Resource Id: 1",
            "[TIME 15] Event Type: 2, Patient Id: 12, Resource Id: 3",
            "[TIME 20] Event Type: 0, Patient Id: 10, Resource Id: -1",
        ]
    );
}

proptest! {
    #[test]
    fn prop_order_is_transitive(a in arb_event(), b in arb_event(), c in arb_event()) {
        if a < b && b < c {
            prop_assert!(a < c);
        }
    }

    #[test]
    fn prop_order_is_trichotomous(a in arb_event(), b in arb_event()) {
        let outcomes = [a < b, b < a, a.cmp(&b) == Ordering::Equal];
        prop_assert_eq!(outcomes.iter().filter(|&&x| x).count(), 1);
        // Equal only when every field matches
        prop_assert_eq!(a.cmp(&b) == Ordering::Equal, a == b);
    }

    #[test]
    fn prop_order_is_irreflexive(a in arb_event()) {
        prop_assert!(!(a < a));
    }

    #[test]
    fn prop_time_is_primary_key(a in arb_event(), b in arb_event()) {
        if a.time() != b.time() {
            prop_assert_eq!(a < b, a.time() < b.time());
        }
    }

    #[test]
    fn prop_schedule_dequeues_sorted(events in proptest::collection::vec(arb_event(), 0..40)) {
        let mut schedule = EventSchedule::new();
        for event in &events {
            schedule.enqueue(*event);
        }
        prop_assert_eq!(schedule.len(), events.len());
        if let Some(max) = events.iter().max() {
            prop_assert_eq!(schedule.peek_back().unwrap(), *max);
        }

        let drained: Vec<Event> = std::iter::from_fn(|| schedule.dequeue().ok()).collect();
        let mut expected = events.clone();
        expected.sort();
        prop_assert_eq!(drained, expected);
    }
}
