//! Pending-event scheduling

pub mod schedule;

pub use schedule::EventSchedule;
