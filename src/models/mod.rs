//! Timetabling domain models.
//!
//! Provides the data types exchanged with the registration layer
//! (student choices, time-slot catalog) and the section plan that the
//! search fills in.
//!
//! # Domain Mappings
//!
//! | u-timetable | Registration system | Persistence |
//! |-------------|---------------------|-------------|
//! | StudentChoices | Course requests | student_choices (season, year) |
//! | TimeSlot | Meeting period | time_slot |
//! | Section | Class section | section / offering |
//! | SectionPlan | Term timetable | offering rows |

mod choices;
mod section;
mod time_slot;

pub use choices::{StudentChoice, StudentChoices};
pub use section::{CourseSections, OfferingRow, Section, SectionKey, SectionPlan, Term};
pub use time_slot::{ClockTime, Day, TimeSlot, TimeSlotRecord};
