//! Time-slot catalog validation.
//!
//! Checks structural integrity of each catalog entry before the search
//! starts. Rules are applied in a fixed order so the reported reason is
//! stable for a given entry:
//! 1. Day is one of `SAT SUN MON TUE WED THR FRI`
//! 2. `start_time` is `HH:MM` (00-23 : 00-59)
//! 3. `end_time` is `HH:MM`
//! 4. `start_time` strictly precedes `end_time`
//!
//! Zero-padded `HH:MM` compares lexicographically in chronological order,
//! so rule 4 needs no clock arithmetic.

use tracing::{debug, instrument};

use crate::error::{Result, TimetableError};
use crate::models::{ClockTime, Day, TimeSlot, TimeSlotRecord};

/// Why a catalog entry was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TimeSlotIssue {
    /// Day code not recognized.
    #[error("invalid day")]
    InvalidDay,
    /// Start time is not `HH:MM`.
    #[error("invalid start_time format")]
    InvalidStartTime,
    /// End time is not `HH:MM`.
    #[error("invalid end_time format")]
    InvalidEndTime,
    /// Start time is not before end time.
    #[error("start_time must precede end_time")]
    StartNotBeforeEnd,
}

/// A rejected entry found by [`audit_catalog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogIssue {
    /// Position of the entry in the catalog.
    pub position: usize,
    /// The entry as supplied.
    pub slot: TimeSlotRecord,
    /// The first rule it broke.
    pub reason: TimeSlotIssue,
}

fn check(record: &TimeSlotRecord) -> std::result::Result<TimeSlot, TimeSlotIssue> {
    let day = Day::from_code(&record.day).ok_or(TimeSlotIssue::InvalidDay)?;
    let start_time = ClockTime::parse(&record.start_time).ok_or(TimeSlotIssue::InvalidStartTime)?;
    let end_time = ClockTime::parse(&record.end_time).ok_or(TimeSlotIssue::InvalidEndTime)?;
    if start_time >= end_time {
        return Err(TimeSlotIssue::StartNotBeforeEnd);
    }
    Ok(TimeSlot {
        day,
        start_time,
        end_time,
    })
}

/// Validates one catalog entry.
///
/// # Returns
/// The typed slot, or [`TimetableError::InvalidTimeSlot`] carrying the
/// entry and the first rule it broke.
pub fn validate_time_slot(record: &TimeSlotRecord) -> Result<TimeSlot> {
    check(record).map_err(|reason| TimetableError::InvalidTimeSlot {
        slot: record.clone(),
        reason,
    })
}

/// Validates a whole catalog, stopping at the first bad entry.
///
/// An empty catalog is a configuration error: there would be nothing to
/// assign sections to.
#[instrument(level = "debug", skip(records), fields(slots = records.len()))]
pub fn validate_catalog(records: &[TimeSlotRecord]) -> Result<Vec<TimeSlot>> {
    if records.is_empty() {
        return Err(TimetableError::config("time slot catalog is empty"));
    }
    let slots = records
        .iter()
        .map(validate_time_slot)
        .collect::<Result<Vec<_>>>()?;
    debug!(slots = slots.len(), "time slot catalog validated");
    Ok(slots)
}

/// Checks every catalog entry and reports all problems at once.
///
/// Intended for catalog maintenance screens; scheduling itself uses the
/// fail-fast [`validate_catalog`].
pub fn audit_catalog(
    records: &[TimeSlotRecord],
) -> std::result::Result<Vec<TimeSlot>, Vec<CatalogIssue>> {
    let mut slots = Vec::with_capacity(records.len());
    let mut issues = Vec::new();

    for (position, record) in records.iter().enumerate() {
        match check(record) {
            Ok(slot) => slots.push(slot),
            Err(reason) => issues.push(CatalogIssue {
                position,
                slot: record.clone(),
                reason,
            }),
        }
    }

    if issues.is_empty() {
        Ok(slots)
    } else {
        Err(issues)
    }
}
