//! Timetable quality metrics (KPIs).
//!
//! Computes indicators from a scheduled section plan.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Conflicts | Fitness of the plan (see `ga::count_conflicts`) |
//! | Conflicted Students | Students contributing at least one conflict |
//! | Slot Usage | Sections placed in each slot |
//! | Avg Section Size | Mean students per section |

use std::collections::{BTreeMap, HashSet};

use crate::ga::conflicts_by_student;
use crate::models::{SectionPlan, TimeSlot};

/// Timetable performance indicators.
#[derive(Debug, Clone, PartialEq)]
pub struct TimetableKpi {
    /// Courses with at least one section.
    pub course_count: usize,
    /// Total sections.
    pub section_count: usize,
    /// Sections without a slot.
    pub unscheduled_sections: usize,
    /// Distinct enrolled students.
    pub student_count: usize,
    /// Conflict count over scheduled sections.
    pub conflicts: usize,
    /// Students double-booked at least once.
    pub conflicted_students: usize,
    /// Sections per slot.
    pub slot_usage: BTreeMap<TimeSlot, usize>,
    /// Mean students per section.
    pub avg_section_size: f64,
}

impl TimetableKpi {
    /// Computes KPIs from a plan. Unscheduled sections only count toward
    /// sizes and `unscheduled_sections`.
    pub fn calculate(plan: &SectionPlan) -> Self {
        let mut students: HashSet<&str> = HashSet::new();
        let mut slot_usage: BTreeMap<TimeSlot, usize> = BTreeMap::new();
        let mut unscheduled = 0;
        let mut enrolled = 0;

        for section in plan.sections() {
            enrolled += section.size();
            students.extend(section.students.iter().map(String::as_str));

            let Some(slot) = section.schedule else {
                unscheduled += 1;
                continue;
            };
            *slot_usage.entry(slot).or_insert(0) += 1;
        }

        let tally = conflicts_by_student(plan.sections().filter_map(|section| {
            section
                .schedule
                .as_ref()
                .map(|slot| (section.students.as_slice(), slot))
        }));

        let section_count = plan.section_count();
        let avg_section_size = if section_count == 0 {
            0.0
        } else {
            enrolled as f64 / section_count as f64
        };

        Self {
            course_count: plan.course_count(),
            section_count,
            unscheduled_sections: unscheduled,
            student_count: students.len(),
            conflicts: tally.values().sum(),
            conflicted_students: tally.len(),
            slot_usage,
            avg_section_size,
        }
    }

    /// Whether every section is scheduled without conflicts.
    pub fn is_conflict_free(&self) -> bool {
        self.conflicts == 0 && self.unscheduled_sections == 0
    }
}
