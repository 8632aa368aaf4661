//! Event schedule: the pending-event priority queue
//!
//! Events leave the schedule in exactly the total order of [`Event`]. The
//! backing store is a `BTreeSet` keyed by `(event, insertion_seq)`, so
//! identical events can be pending at once and both ends are reachable in
//! O(log n).
//!
//! Nothing is ever removed except from the front: a stale event (e.g. a
//! patience timeout for a patient already served) stays scheduled and is
//! made harmless by its handler.

use crate::models::event::Event;
use crate::models::queue::QueueError;
use std::collections::BTreeSet;

/// Min-priority queue of pending events
///
/// # Example
/// ```
/// use hospital_des_core::EventSchedule;
/// use hospital_des_core::models::event::{Event, EventKind};
///
/// let mut schedule = EventSchedule::new();
/// schedule.enqueue(Event::new(20, EventKind::TriageQueueEntrance, Some(10), None));
/// schedule.enqueue(Event::new(5, EventKind::PatientLeaveHospital, Some(3), Some(2)));
///
/// assert_eq!(schedule.peek_front().unwrap().time(), 5);
/// assert_eq!(schedule.peek_back().unwrap().time(), 20);
/// assert_eq!(schedule.dequeue().unwrap().time(), 5);
/// ```
#[derive(Debug, Clone, Default)]
pub struct EventSchedule {
    pending: BTreeSet<(Event, u64)>,
    next_seq: u64,
}

impl EventSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an event in its sorted position
    pub fn enqueue(&mut self, event: Event) {
        self.pending.insert((event, self.next_seq));
        self.next_seq += 1;
    }

    /// Remove and return the earliest event
    pub fn dequeue(&mut self) -> Result<Event, QueueError> {
        self.pending
            .pop_first()
            .map(|(event, _)| event)
            .ok_or(QueueError::EmptyQueue)
    }

    /// Earliest pending event
    pub fn peek_front(&self) -> Result<Event, QueueError> {
        self.pending
            .first()
            .map(|(event, _)| *event)
            .ok_or(QueueError::EmptyQueue)
    }

    /// Latest pending event
    pub fn peek_back(&self) -> Result<Event, QueueError> {
        self.pending
            .last()
            .map(|(event, _)| *event)
            .ok_or(QueueError::EmptyQueue)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Pending events, earliest first
    pub fn iter(&self) -> impl Iterator<Item = &Event> + '_ {
        self.pending.iter().map(|(event, _)| event)
    }
}
