//! Timetable generation and KPI evaluation.
//!
//! `Timetabler` runs the whole pipeline (validation, partitioning, GA
//! search) and returns a scheduled plan together with its metrics.
//!
//! # KPI
//!
//! `TimetableKpi` reports conflicts, conflicted students, slot usage and
//! section sizes for any plan.

mod kpi;
mod timetabler;

pub use kpi::TimetableKpi;
pub use timetabler::{TimetableOutcome, TimetableRequest, Timetabler};
