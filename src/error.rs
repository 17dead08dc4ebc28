//! Error types.

use crate::models::TimeSlotRecord;
use crate::validation::TimeSlotIssue;

/// Result alias for timetabling operations.
pub type Result<T> = std::result::Result<T, TimetableError>;

/// Errors raised by timetable generation.
///
/// Configuration and catalog errors are raised before any search work,
/// so a failed call never leaves partially scheduled sections behind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimetableError {
    /// A parameter is out of range (section capacity, population size,
    /// rates) or the slot catalog is empty.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// A catalog entry failed validation.
    #[error("invalid time slot '{slot}': {reason}")]
    InvalidTimeSlot {
        /// The offending entry as supplied.
        slot: TimeSlotRecord,
        /// Which rule it broke.
        reason: TimeSlotIssue,
    },
    /// The search produced nothing usable.
    #[error("scheduling failure: {0}")]
    SchedulingFailure(String),
}

impl TimetableError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }

    pub(crate) fn failure(message: impl Into<String>) -> Self {
        Self::SchedulingFailure(message.into())
    }
}
