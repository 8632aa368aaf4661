//! First-come-first-served patient queue
//!
//! Holds patient ids in arrival order for one resource class. Besides the
//! usual head operations it supports removing the *tail*, which is how a
//! patient who just lost patience walks out of the line.
//!
//! The queue does not check for duplicate ids; the engine guarantees each
//! patient is queued in at most one place.

use crate::models::patient::PatientId;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use thiserror::Error;

/// Errors from queue and schedule operations
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum QueueError {
    #[error("Queue is empty")]
    EmptyQueue,
}

/// FCFS queue of patient ids
///
/// # Example
/// ```
/// use hospital_des_core::FcfsQueue;
///
/// let mut queue = FcfsQueue::new();
/// queue.enqueue(101);
/// queue.enqueue(102);
/// queue.enqueue(103);
///
/// assert_eq!(queue.dequeue().unwrap(), 101);
/// assert_eq!(queue.remove_back().unwrap(), 103);
/// assert_eq!(queue.peek_front().unwrap(), 102);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FcfsQueue {
    patients: VecDeque<PatientId>,
}

impl FcfsQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a patient to the tail
    pub fn enqueue(&mut self, patient: PatientId) {
        self.patients.push_back(patient);
    }

    /// Remove and return the head
    pub fn dequeue(&mut self) -> Result<PatientId, QueueError> {
        self.patients.pop_front().ok_or(QueueError::EmptyQueue)
    }

    /// Head of the queue, without removing it
    pub fn peek_front(&self) -> Result<PatientId, QueueError> {
        self.patients.front().copied().ok_or(QueueError::EmptyQueue)
    }

    /// Tail of the queue, without removing it
    pub fn peek_back(&self) -> Result<PatientId, QueueError> {
        self.patients.back().copied().ok_or(QueueError::EmptyQueue)
    }

    /// Remove and return the tail
    ///
    /// Only used when the most recent arrival reneges.
    pub fn remove_back(&mut self) -> Result<PatientId, QueueError> {
        self.patients.pop_back().ok_or(QueueError::EmptyQueue)
    }

    /// Check if the queue holds no patients
    pub fn is_empty(&self) -> bool {
        self.patients.is_empty()
    }

    /// Number of waiting patients
    pub fn len(&self) -> usize {
        self.patients.len()
    }

    /// Waiting patients, head first
    pub fn iter(&self) -> impl Iterator<Item = PatientId> + '_ {
        self.patients.iter().copied()
    }
}
