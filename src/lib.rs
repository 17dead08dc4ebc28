//! Course timetabling for the U-Engine ecosystem.
//!
//! Turns per-student course requests and a weekly time-slot catalog into
//! capacity-bounded class sections, each assigned a slot so that as few
//! students as possible are double-booked.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `StudentChoices`, `TimeSlot`, `Section`,
//!   `SectionKey`, `SectionPlan`, `OfferingRow`
//! - **`validation`**: Slot catalog checks (day codes, `HH:MM`, ordering)
//! - **`partition`**: Student choices → course sections
//! - **`ga`**: Conflict-count fitness and the generational GA search
//! - **`scheduler`**: End-to-end `Timetabler` and `TimetableKpi`
//!
//! # Architecture
//!
//! Persistence, authentication and transport stay with the host
//! application. This crate consumes plain choice/catalog data and returns
//! a new scheduled plan; it never mutates caller-owned sections.
//!
//! # References
//!
//! - Burke & Petrovic (2002), "Recent research directions in automated timetabling"
//! - Goldberg (1989), "Genetic Algorithms in Search, Optimization and Machine Learning"

pub mod error;
pub mod ga;
pub mod models;
pub mod partition;
pub mod scheduler;
pub mod validation;

pub use error::{Result, TimetableError};
