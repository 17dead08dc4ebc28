//! Section and section plan models.
//!
//! A section is a capped subgroup of a course's students and the unit that
//! receives one time slot. A [`SectionPlan`] is the ordered course → sections
//! mapping produced by partitioning and returned, with slots filled in, by
//! the search.

use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use super::{ClockTime, Day, TimeSlot};

/// Identity of a section: course plus 0-based position in the course.
///
/// Kept as a struct so course ids containing `-` never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SectionKey {
    /// Course identifier.
    pub course_id: String,
    /// Position within the course's section list.
    pub index: usize,
}

impl SectionKey {
    /// Creates a key.
    pub fn new(course_id: impl Into<String>, index: usize) -> Self {
        Self {
            course_id: course_id.into(),
            index,
        }
    }
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.course_id, self.index)
    }
}

/// A section of a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Owning course.
    pub course_id: String,
    /// Position within the course (0-based).
    pub index: usize,
    /// Enrolled students, in enrollment order.
    pub students: Vec<String>,
    /// Assigned slot. `None` until a search result is applied.
    pub schedule: Option<TimeSlot>,
}

impl Section {
    /// Creates an unscheduled section.
    pub fn new(course_id: impl Into<String>, index: usize, students: Vec<String>) -> Self {
        Self {
            course_id: course_id.into(),
            index,
            students,
            schedule: None,
        }
    }

    /// This section's identity key.
    pub fn key(&self) -> SectionKey {
        SectionKey::new(self.course_id.clone(), self.index)
    }

    /// Number of enrolled students.
    #[inline]
    pub fn size(&self) -> usize {
        self.students.len()
    }
}

/// A course and its ordered sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseSections {
    /// Course identifier.
    pub course_id: String,
    /// Sections in index order.
    pub sections: Vec<Section>,
}

/// Academic term a plan is generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Term {
    /// Season identifier from the registration layer.
    pub season_id: i64,
    /// Calendar year.
    pub year: i32,
}

impl Term {
    /// Creates a term.
    pub fn new(season_id: i64, year: i32) -> Self {
        Self { season_id, year }
    }
}

/// Flat persistence row for one scheduled section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferingRow {
    /// Term season.
    pub season_id: i64,
    /// Term year.
    pub year: i32,
    /// 1-based section number within the course.
    pub section_no: usize,
    /// Course identifier.
    pub course_id: String,
    /// Meeting day.
    pub day: Day,
    /// Start time.
    pub start_time: ClockTime,
    /// End time.
    pub end_time: ClockTime,
    /// Seats, equal to the number of enrolled students.
    pub capacity: usize,
}

/// Ordered course → sections mapping.
///
/// Courses keep the order in which they were first encountered; this order
/// drives section enumeration and fitness evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionPlan {
    courses: Vec<CourseSections>,
}

impl SectionPlan {
    /// Creates an empty plan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a course with its sections.
    ///
    /// Courses without sections are not stored.
    pub fn push_course(&mut self, course_id: impl Into<String>, sections: Vec<Section>) {
        if sections.is_empty() {
            return;
        }
        self.courses.push(CourseSections {
            course_id: course_id.into(),
            sections,
        });
    }

    /// Sections of a course, in index order.
    pub fn get(&self, course_id: &str) -> Option<&[Section]> {
        self.courses
            .iter()
            .find(|c| c.course_id == course_id)
            .map(|c| c.sections.as_slice())
    }

    /// Looks up one section by key.
    pub fn section(&self, key: &SectionKey) -> Option<&Section> {
        self.get(&key.course_id)?.get(key.index)
    }

    /// Mutable lookup by key.
    pub fn section_mut(&mut self, key: &SectionKey) -> Option<&mut Section> {
        self.courses
            .iter_mut()
            .find(|c| c.course_id == key.course_id)?
            .sections
            .get_mut(key.index)
    }

    /// Courses in plan order.
    pub fn courses(&self) -> impl Iterator<Item = &CourseSections> {
        self.courses.iter()
    }

    /// All sections, courses in plan order and sections in index order.
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.courses.iter().flat_map(|c| c.sections.iter())
    }

    /// Keys of all sections in enumeration order.
    pub fn section_keys(&self) -> Vec<SectionKey> {
        self.sections().map(Section::key).collect()
    }

    /// Number of courses with at least one section.
    pub fn course_count(&self) -> usize {
        self.courses.len()
    }

    /// Total number of sections.
    pub fn section_count(&self) -> usize {
        self.courses.iter().map(|c| c.sections.len()).sum()
    }

    /// Whether the plan holds no sections.
    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    /// Whether every section has a slot.
    pub fn is_fully_scheduled(&self) -> bool {
        self.sections().all(|s| s.schedule.is_some())
    }

    /// Flattens scheduled sections into persistence rows.
    ///
    /// Sections without a slot are skipped.
    pub fn offering_rows(&self, term: Term) -> Vec<OfferingRow> {
        self.sections()
            .filter_map(|section| {
                let slot = section.schedule?;
                Some(OfferingRow {
                    season_id: term.season_id,
                    year: term.year,
                    section_no: section.index + 1,
                    course_id: section.course_id.clone(),
                    day: slot.day,
                    start_time: slot.start_time,
                    end_time: slot.end_time,
                    capacity: section.size(),
                })
            })
            .collect()
    }
}

impl Serialize for SectionPlan {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.courses.len()))?;
        for course in &self.courses {
            map.serialize_entry(&course.course_id, &course.sections)?;
        }
        map.end()
    }
}
