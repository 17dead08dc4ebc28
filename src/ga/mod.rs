//! GA-based timetable search.
//!
//! Assigns one time slot to every section so that as few students as
//! possible are double-booked.
//!
//! # Encoding
//!
//! One gene per section (courses in plan order, sections in index order);
//! each gene indexes the validated slot catalog.
//!
//! # Submodules
//!
//! - [`GaConfig`]: population, budget and operator rates
//! - [`GaRunner`]: generational loop with truncation selection
//! - [`CancellationToken`]: between-generation stop signal
//!
//! # Reference
//! Burke & Petrovic (2002), "Recent research directions in automated timetabling"

mod cancellation;
mod chromosome;
mod config;
mod problem;
mod runner;

pub use cancellation::CancellationToken;
pub use chromosome::{TimetableChromosome, reassign_mutation, uniform_crossover};
pub use config::GaConfig;
pub use problem::{TimetableProblem, conflicts_by_student, count_conflicts};
pub use runner::{GaResult, GaRunner, GenerationReport, Termination, search};
