use crate::types::{Event, TimeOfDay};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    /// The requested slot overlaps an event that is already booked.
    /// Carries the earliest-starting overlapping event.
    Conflict { conflicting: Event },
    /// `start >= end`. Callers are expected to filter this out beforehand.
    InvalidInterval { start: TimeOfDay, end: TimeOfDay },
}

impl fmt::Display for BookingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingError::Conflict { conflicting } => write!(
                f,
                "conflict with booked event {:?} at {}",
                conflicting.title(),
                conflicting.slot()
            ),
            BookingError::InvalidInterval { start, end } => {
                write!(f, "invalid interval: start {start} is not before end {end}")
            }
        }
    }
}

impl std::error::Error for BookingError {}
