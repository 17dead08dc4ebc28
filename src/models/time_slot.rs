//! Time slot model.
//!
//! A time slot is a weekly recurring meeting period: a day code plus a
//! half-open `[start_time, end_time)` interval in zero-padded 24-hour
//! `HH:MM` notation.
//!
//! # Raw vs. validated
//! [`TimeSlotRecord`] is the shape persistence hands over (three strings).
//! [`TimeSlot`] only exists after validation, so every `TimeSlot` satisfies
//! `start_time < end_time` on a recognized day.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TimetableError;
use crate::validation::validate_time_slot;

/// Day of the week, using the catalog's three-letter codes.
///
/// Declaration order follows the academic week (Saturday first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Day {
    #[serde(rename = "SAT")]
    Sat,
    #[serde(rename = "SUN")]
    Sun,
    #[serde(rename = "MON")]
    Mon,
    #[serde(rename = "TUE")]
    Tue,
    #[serde(rename = "WED")]
    Wed,
    #[serde(rename = "THR")]
    Thr,
    #[serde(rename = "FRI")]
    Fri,
}

impl Day {
    /// All recognized days in week order.
    pub const ALL: [Day; 7] = [
        Day::Sat,
        Day::Sun,
        Day::Mon,
        Day::Tue,
        Day::Wed,
        Day::Thr,
        Day::Fri,
    ];

    /// Parses a three-letter day code. Codes are case-sensitive.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|day| day.code() == code)
    }

    /// The three-letter catalog code.
    pub fn code(self) -> &'static str {
        match self {
            Day::Sat => "SAT",
            Day::Sun => "SUN",
            Day::Mon => "MON",
            Day::Tue => "TUE",
            Day::Wed => "WED",
            Day::Thr => "THR",
            Day::Fri => "FRI",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Wall-clock time of day with minute resolution.
///
/// Ordering is chronological, which coincides with lexicographic ordering
/// of the zero-padded `HH:MM` text form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime {
    minutes: u16,
}

impl ClockTime {
    /// Parses strict `HH:MM` (hours `00`-`23`, minutes `00`-`59`).
    ///
    /// Single-digit hours, seconds, and surrounding whitespace are rejected.
    pub fn parse(text: &str) -> Option<Self> {
        let bytes = text.as_bytes();
        if bytes.len() != 5 || bytes[2] != b':' {
            return None;
        }
        let digit = |b: u8| b.is_ascii_digit().then(|| u16::from(b - b'0'));
        let hours = digit(bytes[0])? * 10 + digit(bytes[1])?;
        let minutes = digit(bytes[3])? * 10 + digit(bytes[4])?;
        Self::from_hm(hours, minutes)
    }

    /// Creates a time from hours and minutes, if in range.
    pub fn from_hm(hours: u16, minutes: u16) -> Option<Self> {
        (hours < 24 && minutes < 60).then_some(Self {
            minutes: hours * 60 + minutes,
        })
    }

    /// Minutes since midnight.
    #[inline]
    pub fn minutes_since_midnight(self) -> u16 {
        self.minutes
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.minutes / 60, self.minutes % 60)
    }
}

impl TryFrom<String> for ClockTime {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("invalid clock time '{value}'"))
    }
}

impl From<ClockTime> for String {
    fn from(time: ClockTime) -> Self {
        time.to_string()
    }
}

/// Unvalidated time slot as stored by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlotRecord {
    /// Day code, expected to be one of `SAT SUN MON TUE WED THR FRI`.
    pub day: String,
    /// Start time, expected `HH:MM`.
    pub start_time: String,
    /// End time, expected `HH:MM`.
    pub end_time: String,
}

impl TimeSlotRecord {
    /// Creates a record from its three fields.
    pub fn new(
        day: impl Into<String>,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
    ) -> Self {
        Self {
            day: day.into(),
            start_time: start_time.into(),
            end_time: end_time.into(),
        }
    }
}

impl fmt::Display for TimeSlotRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}-{}", self.day, self.start_time, self.end_time)
    }
}

/// A validated weekly time slot.
///
/// Deserializing goes through validation, so malformed catalog entries
/// are rejected with the same reasons as [`validate_time_slot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "TimeSlotRecord")]
pub struct TimeSlot {
    /// Meeting day.
    pub day: Day,
    /// Start time (inclusive).
    pub start_time: ClockTime,
    /// End time (exclusive).
    pub end_time: ClockTime,
}

impl TimeSlot {
    /// Parses and validates a slot from text fields.
    pub fn parse(day: &str, start_time: &str, end_time: &str) -> Result<Self, TimetableError> {
        validate_time_slot(&TimeSlotRecord::new(day, start_time, end_time))
    }

    /// Whether two slots collide: same day and overlapping `[start, end)`.
    ///
    /// Back-to-back slots (one ends when the other starts) do not collide.
    /// The relation is symmetric.
    #[inline]
    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.day == other.day
            && !(self.end_time <= other.start_time || self.start_time >= other.end_time)
    }

    /// Slot length in minutes.
    pub fn duration_minutes(&self) -> u16 {
        self.end_time.minutes_since_midnight() - self.start_time.minutes_since_midnight()
    }

    /// Converts back to the catalog's raw form.
    pub fn to_record(&self) -> TimeSlotRecord {
        TimeSlotRecord::new(
            self.day.code(),
            self.start_time.to_string(),
            self.end_time.to_string(),
        )
    }
}

impl TryFrom<TimeSlotRecord> for TimeSlot {
    type Error = TimetableError;

    fn try_from(record: TimeSlotRecord) -> Result<Self, Self::Error> {
        validate_time_slot(&record)
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}-{}", self.day, self.start_time, self.end_time)
    }
}
