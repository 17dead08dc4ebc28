//! Section partitioning.
//!
//! Inverts student → courses into course → students and splits each
//! course's students into contiguous, capacity-bounded sections.
//!
//! # Algorithm
//! 1. Walk students in choice order; append each student to every course
//!    they chose. Courses are ordered by first appearance.
//! 2. Chunk each course's student list into runs of `max_enroll`; the last
//!    run may be shorter.
//!
//! # Complexity
//! O(s * c) where s=students, c=choices per student.

use std::collections::HashMap;

use tracing::{debug, instrument};

use crate::error::{Result, TimetableError};
use crate::models::{Section, SectionPlan, StudentChoices};

/// Default section capacity used by the registration host.
pub const DEFAULT_MAX_ENROLL: usize = 30;

/// Partitions students into sections of at most `max_enroll` members.
///
/// Concatenating a course's sections in index order reproduces that
/// course's student list in choice order. Courses nobody chose do not
/// appear.
///
/// # Errors
/// [`TimetableError::InvalidConfiguration`] if `max_enroll` is zero.
///
/// # Example
/// ```
/// use u_timetable::models::StudentChoices;
/// use u_timetable::partition::partition_sections;
///
/// let choices = StudentChoices::new()
///     .with_student("1", ["Math"])
///     .with_student("2", ["Math"])
///     .with_student("3", ["Math"]);
/// let plan = partition_sections(&choices, 2).unwrap();
/// assert_eq!(plan.get("Math").unwrap().len(), 2);
/// ```
#[instrument(level = "debug", skip(choices), fields(students = choices.len()))]
pub fn partition_sections(choices: &StudentChoices, max_enroll: usize) -> Result<SectionPlan> {
    if max_enroll == 0 {
        return Err(TimetableError::config("max_enroll must be at least 1"));
    }

    let mut course_positions: HashMap<&str, usize> = HashMap::new();
    let mut rosters: Vec<(&str, Vec<String>)> = Vec::new();

    for choice in choices.iter() {
        for course in &choice.courses {
            let pos = *course_positions.entry(course.as_str()).or_insert_with(|| {
                rosters.push((course.as_str(), Vec::new()));
                rosters.len() - 1
            });
            rosters[pos].1.push(choice.student_id.clone());
        }
    }

    let mut plan = SectionPlan::new();
    for (course_id, students) in rosters {
        let sections = students
            .chunks(max_enroll)
            .enumerate()
            .map(|(index, chunk)| Section::new(course_id, index, chunk.to_vec()))
            .collect();
        plan.push_course(course_id, sections);
    }

    debug!(
        courses = plan.course_count(),
        sections = plan.section_count(),
        "students partitioned into sections"
    );
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample_choices() -> StudentChoices {
        StudentChoices::new()
            .with_student("234", ["Math", "Physics"])
            .with_student("235", ["Math", "Chemistry"])
            .with_student("236", ["Physics", "Chemistry"])
            .with_student("237", ["Math", "Chemistry"])
            .with_student("238", ["Math", "Physics"])
            .with_student("239", ["Math"])
    }

    fn roster<'a>(plan: &'a SectionPlan, course: &str) -> Vec<Vec<&'a str>> {
        plan.get(course)
            .unwrap()
            .iter()
            .map(|s| s.students.iter().map(String::as_str).collect())
            .collect()
    }

    #[test]
    fn test_sample_partition() {
        let plan = partition_sections(&sample_choices(), 2).unwrap();

        let courses: Vec<&str> = plan.courses().map(|c| c.course_id.as_str()).collect();
        assert_eq!(courses, vec!["Math", "Physics", "Chemistry"]);

        assert_eq!(
            roster(&plan, "Math"),
            vec![vec!["234", "235"], vec!["237", "238"], vec!["239"]]
        );
        assert_eq!(roster(&plan, "Physics"), vec![vec!["234", "236"], vec!["238"]]);
        assert_eq!(roster(&plan, "Chemistry"), vec![vec!["235", "236"], vec!["237"]]);
        assert_eq!(plan.section_count(), 7);
    }

    #[test]
    fn test_sections_start_unscheduled_with_indices() {
        let plan = partition_sections(&sample_choices(), 2).unwrap();
        for course in plan.courses() {
            for (i, section) in course.sections.iter().enumerate() {
                assert_eq!(section.index, i);
                assert_eq!(section.course_id, course.course_id);
                assert!(section.schedule.is_none());
            }
        }
    }

    #[test]
    fn test_large_capacity_single_section() {
        let plan = partition_sections(&sample_choices(), DEFAULT_MAX_ENROLL).unwrap();
        assert_eq!(plan.section_count(), 3);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(matches!(
            partition_sections(&sample_choices(), 0),
            Err(TimetableError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_students_without_courses() {
        let choices = StudentChoices::new().with_student("1", Vec::<String>::new());
        let plan = partition_sections(&choices, 5).unwrap();
        assert!(plan.is_empty());
    }

    fn choices_strategy() -> impl Strategy<Value = Vec<(String, Vec<String>)>> {
        prop::collection::vec(
            (
                "[a-z]{1,4}",
                prop::collection::vec(prop::sample::select(vec!["A", "B", "C", "D-1"]), 0..4),
            ),
            0..20,
        )
        .prop_map(|rows| {
            rows.into_iter()
                .map(|(s, cs)| (s, cs.into_iter().map(String::from).collect()))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_round_trip_and_capacity(rows in choices_strategy(), max_enroll in 1usize..6) {
            let choices: StudentChoices = rows.into_iter().collect();
            let plan = partition_sections(&choices, max_enroll).unwrap();

            // Expected per-course rosters, in choice order.
            let mut expected: Vec<(String, Vec<String>)> = Vec::new();
            for choice in choices.iter() {
                for course in &choice.courses {
                    match expected.iter_mut().find(|(c, _)| c == course) {
                        Some((_, students)) => students.push(choice.student_id.clone()),
                        None => expected.push((course.clone(), vec![choice.student_id.clone()])),
                    }
                }
            }

            prop_assert_eq!(plan.course_count(), expected.len());
            for (course_id, students) in &expected {
                let sections = plan.get(course_id).unwrap();
                let joined: Vec<String> =
                    sections.iter().flat_map(|s| s.students.clone()).collect();
                prop_assert_eq!(&joined, students);
                for section in sections {
                    prop_assert!(!section.students.is_empty());
                    prop_assert!(section.students.len() <= max_enroll);
                }
            }
        }
    }
}
