//! Logical time for the simulation
//!
//! The simulation has no wall clock. Time is an integer instant that only
//! moves when the engine processes an event carrying a later timestamp.

use serde::{Deserialize, Serialize};

/// A logical instant on the single simulation timeline.
pub type SimTime = u64;

/// Tracks the logical time of the most recently processed event
///
/// # Example
/// ```
/// use hospital_des_core::SimClock;
///
/// let mut clock = SimClock::new();
/// assert_eq!(clock.now(), 0);
///
/// clock.advance_to(7);
/// assert_eq!(clock.now(), 7);
/// assert_eq!(clock.events_seen(), 1);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimClock {
    /// Timestamp of the last processed event
    now: SimTime,
    /// Number of events the clock has been advanced for
    events_seen: usize,
}

impl SimClock {
    /// Create a clock positioned at time 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock to the timestamp of the event about to be handled
    ///
    /// Events leave the schedule in non-decreasing time order, so the clock
    /// never moves backwards.
    ///
    /// # Example
    /// ```
    /// use hospital_des_core::SimClock;
    ///
    /// let mut clock = SimClock::new();
    /// clock.advance_to(3);
    /// clock.advance_to(3);
    /// assert_eq!(clock.now(), 3);
    /// ```
    pub fn advance_to(&mut self, time: SimTime) {
        assert!(
            time >= self.now,
            "logical time moved backwards: {} -> {}",
            self.now,
            time
        );
        self.now = time;
        self.events_seen += 1;
    }

    /// Current logical time
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// How many events have been processed on this clock
    pub fn events_seen(&self) -> usize {
        self.events_seen
    }
}
