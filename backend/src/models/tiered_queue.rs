//! Priority-tiered FCFS queue for doctor-bound patients
//!
//! `k` FCFS queues indexed `0..k`. Tier 0 is served first; within a tier,
//! patients are served in arrival order.
//!
//! # Out-of-range tiers
//!
//! `enqueue` with a tier outside `0..k` is silently ignored. Tiers come from
//! externally supplied urgency levels that the engine trusts, so an invalid
//! tier loses the patient rather than failing the run. The return value
//! tells the caller whether the patient was accepted.
//!
//! # Head vs tail asymmetry
//!
//! `peek_front`/`dequeue` scan from tier 0 upward. `peek_back` scans from
//! tier `k-1` downward and returns the tail of the *lowest-priority*
//! non-empty tier, which is not necessarily the most recent arrival.

use crate::models::patient::PatientId;
use crate::models::queue::{FcfsQueue, QueueError};
use serde::{Deserialize, Serialize};

/// Tiered FCFS queue
///
/// # Example
/// ```
/// use hospital_des_core::TieredQueue;
///
/// let mut queue = TieredQueue::new(3);
/// queue.enqueue(100, 2);
/// queue.enqueue(10, 0);
/// queue.enqueue(20, 1);
///
/// assert_eq!(queue.dequeue().unwrap(), 10);
/// assert_eq!(queue.dequeue().unwrap(), 20);
/// assert_eq!(queue.dequeue().unwrap(), 100);
/// assert!(queue.dequeue().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TieredQueue {
    tiers: Vec<FcfsQueue>,
}

impl TieredQueue {
    /// Create a queue with `num_tiers` empty tiers
    ///
    /// # Panics
    /// If `num_tiers` is zero.
    pub fn new(num_tiers: usize) -> Self {
        assert!(num_tiers > 0, "tier count must be positive");
        Self {
            tiers: vec![FcfsQueue::new(); num_tiers],
        }
    }

    /// Number of tiers
    pub fn num_tiers(&self) -> usize {
        self.tiers.len()
    }

    /// Append `patient` to the tail of `tier`
    ///
    /// Returns `false` (and does nothing) if `tier` is out of range.
    pub fn enqueue(&mut self, patient: PatientId, tier: usize) -> bool {
        match self.tiers.get_mut(tier) {
            Some(queue) => {
                queue.enqueue(patient);
                true
            }
            None => false,
        }
    }

    /// Remove and return the head of the highest-priority non-empty tier
    pub fn dequeue(&mut self) -> Result<PatientId, QueueError> {
        self.tiers
            .iter_mut()
            .find(|q| !q.is_empty())
            .ok_or(QueueError::EmptyQueue)?
            .dequeue()
    }

    /// Head of the highest-priority non-empty tier
    pub fn peek_front(&self) -> Result<PatientId, QueueError> {
        self.tiers
            .iter()
            .find(|q| !q.is_empty())
            .ok_or(QueueError::EmptyQueue)?
            .peek_front()
    }

    /// Tail of the lowest-priority non-empty tier
    pub fn peek_back(&self) -> Result<PatientId, QueueError> {
        self.tiers
            .iter()
            .rev()
            .find(|q| !q.is_empty())
            .ok_or(QueueError::EmptyQueue)?
            .peek_back()
    }

    /// True iff every tier is empty
    pub fn is_empty(&self) -> bool {
        self.tiers.iter().all(FcfsQueue::is_empty)
    }

    /// Total number of waiting patients across tiers
    pub fn len(&self) -> usize {
        self.tiers.iter().map(FcfsQueue::len).sum()
    }

    /// Read-only view of one tier
    pub fn tier(&self, tier: usize) -> Option<&FcfsQueue> {
        self.tiers.get(tier)
    }

    /// Tail of one tier, or `None` if the tier is empty or out of range
    pub fn tier_back(&self, tier: usize) -> Option<PatientId> {
        self.tiers.get(tier).and_then(|q| q.peek_back().ok())
    }

    /// Remove and return the tail of one tier
    pub fn remove_tier_back(&mut self, tier: usize) -> Result<PatientId, QueueError> {
        self.tiers
            .get_mut(tier)
            .ok_or(QueueError::EmptyQueue)?
            .remove_back()
    }

    /// Tier whose tail is `patient`, scanning from the last tier down to 0
    pub fn tail_tier_of(&self, patient: PatientId) -> Option<usize> {
        (0..self.tiers.len())
            .rev()
            .find(|&tier| self.tier_back(tier) == Some(patient))
    }
}
