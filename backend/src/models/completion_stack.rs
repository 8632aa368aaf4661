//! Completion-order stack
//!
//! One per doctor. Records the patients a doctor has finished with, kept
//! non-decreasing from bottom to top: pushing `v` first pops every entry
//! strictly greater than `v`. Only read when summarising a run.

use crate::models::patient::PatientId;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors from stack operations
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StackError {
    #[error("Stack is empty")]
    EmptyStack,
}

/// Monotonic (non-decreasing bottom to top) stack of patient ids
///
/// # Example
/// ```
/// use hospital_des_core::CompletionStack;
///
/// let mut stack = CompletionStack::new();
/// for id in [5, 10, 7, 15, 6] {
///     stack.push(id);
/// }
/// assert_eq!(stack.to_string(), "{6, 5}");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompletionStack {
    entries: Vec<PatientId>,
}

impl CompletionStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pop every entry above `patient`, then push it
    pub fn push(&mut self, patient: PatientId) {
        while self.entries.last().is_some_and(|&top| top > patient) {
            self.entries.pop();
        }
        self.entries.push(patient);
    }

    pub fn pop(&mut self) -> Result<PatientId, StackError> {
        self.entries.pop().ok_or(StackError::EmptyStack)
    }

    pub fn top(&self) -> Result<PatientId, StackError> {
        self.entries.last().copied().ok_or(StackError::EmptyStack)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entries from bottom to top
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = PatientId> + '_ {
        self.entries.iter().copied()
    }
}

/// Renders `{top, ..., bottom}`
impl fmt::Display for CompletionStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, patient) in self.entries.iter().rev().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", patient)?;
        }
        f.write_str("}")
    }
}
