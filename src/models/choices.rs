//! Student course choices.
//!
//! The registration layer reports, per student, the set of courses the
//! student wants to take in a term. Order matters downstream: section
//! membership and fitness evaluation both follow first-seen order, so the
//! mapping keeps insertion order instead of hashing.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One student's requested courses, in first-seen order without duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentChoice {
    /// Student identifier.
    pub student_id: String,
    /// Requested course identifiers.
    pub courses: Vec<String>,
}

/// Ordered mapping of student → requested courses.
///
/// # Example
/// ```
/// use u_timetable::models::StudentChoices;
///
/// let choices = StudentChoices::new()
///     .with_student("234", ["Math", "Physics"])
///     .with_student("235", ["Math", "Chemistry"]);
/// assert_eq!(choices.len(), 2);
/// assert_eq!(choices.courses_of("235"), Some(&["Math".to_string(), "Chemistry".to_string()][..]));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentChoices {
    entries: Vec<StudentChoice>,
    // student id -> position in `entries`
    index: HashMap<String, usize>,
}

impl StudentChoices {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a student's courses (builder form of [`insert`](Self::insert)).
    pub fn with_student<I, C>(mut self, student_id: impl Into<String>, courses: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<String>,
    {
        self.insert(student_id, courses);
        self
    }

    /// Records courses for a student.
    ///
    /// A student already present keeps its position; new courses are
    /// appended to its set. Repeated course ids are ignored.
    pub fn insert<I, C>(&mut self, student_id: impl Into<String>, courses: I)
    where
        I: IntoIterator<Item = C>,
        C: Into<String>,
    {
        let student_id = student_id.into();
        let position = match self.index.get(&student_id) {
            Some(&pos) => pos,
            None => {
                let pos = self.entries.len();
                self.index.insert(student_id.clone(), pos);
                self.entries.push(StudentChoice {
                    student_id,
                    courses: Vec::new(),
                });
                pos
            }
        };

        let entry = &mut self.entries[position];
        let mut seen: HashSet<String> = entry.courses.iter().cloned().collect();
        for course in courses {
            let course = course.into();
            if seen.insert(course.clone()) {
                entry.courses.push(course);
            }
        }
    }

    /// Courses requested by a student.
    pub fn courses_of(&self, student_id: &str) -> Option<&[String]> {
        self.index
            .get(student_id)
            .map(|&pos| self.entries[pos].courses.as_slice())
    }

    /// Iterates students in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &StudentChoice> {
        self.entries.iter()
    }

    /// Number of students.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no student has made a choice.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S, I, C> FromIterator<(S, I)> for StudentChoices
where
    S: Into<String>,
    I: IntoIterator<Item = C>,
    C: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (S, I)>>(iter: T) -> Self {
        let mut choices = StudentChoices::new();
        for (student, courses) in iter {
            choices.insert(student, courses);
        }
        choices
    }
}

impl Serialize for StudentChoices {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.student_id, &entry.courses)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for StudentChoices {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ChoicesVisitor;

        impl<'de> Visitor<'de> for ChoicesVisitor {
            type Value = StudentChoices;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of student id to a list of course ids")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut choices = StudentChoices::new();
                while let Some((student, courses)) = access.next_entry::<String, Vec<String>>()? {
                    choices.insert(student, courses);
                }
                Ok(choices)
            }
        }

        deserializer.deserialize_map(ChoicesVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_preserved() {
        let choices = StudentChoices::new()
            .with_student("239", ["Math"])
            .with_student("234", ["Physics", "Math"]);
        let ids: Vec<&str> = choices.iter().map(|e| e.student_id.as_str()).collect();
        assert_eq!(ids, vec!["239", "234"]);
        assert_eq!(
            choices.courses_of("234").unwrap(),
            &["Physics".to_string(), "Math".to_string()]
        );
    }

    #[test]
    fn test_duplicate_courses_ignored() {
        let choices = StudentChoices::new().with_student("1", ["Math", "Math", "Art"]);
        assert_eq!(choices.courses_of("1").unwrap().len(), 2);
    }

    #[test]
    fn test_reinsert_merges() {
        let mut choices = StudentChoices::new().with_student("1", ["Math"]);
        choices.insert("2", ["Art"]);
        choices.insert("1", ["Math", "Physics"]);
        assert_eq!(choices.len(), 2);
        assert_eq!(
            choices.courses_of("1").unwrap(),
            &["Math".to_string(), "Physics".to_string()]
        );
    }

    #[test]
    fn test_deserialize_keeps_document_order() {
        let json = r#"{"b": ["X", "Y"], "a": ["Y"], "c": []}"#;
        let choices: StudentChoices = serde_json::from_str(json).unwrap();
        let ids: Vec<&str> = choices.iter().map(|e| e.student_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
        assert_eq!(choices.courses_of("c").unwrap().len(), 0);

        let back = serde_json::to_string(&choices).unwrap();
        assert_eq!(back, r#"{"b":["X","Y"],"a":["Y"],"c":[]}"#);
    }

    #[test]
    fn test_from_iterator() {
        let choices: StudentChoices = vec![("1", vec!["A"]), ("2", vec!["A", "B"])]
            .into_iter()
            .collect();
        assert_eq!(choices.len(), 2);
    }

    #[test]
    fn test_lookup_by_id_across_many_students() {
        let choices: StudentChoices = (0..1000)
            .map(|i| (format!("s{i}"), vec![format!("C{}", i % 7)]))
            .collect();
        assert_eq!(choices.len(), 1000);
        assert_eq!(choices.courses_of("s999").unwrap(), &["C5".to_string()]);
        assert_eq!(choices.courses_of("s1000"), None);

        let mut merged = choices.clone();
        merged.insert("s0", ["C6"]);
        assert_eq!(merged.len(), 1000);
        assert_eq!(merged.iter().next().unwrap().courses, vec!["C0", "C6"]);
        assert_ne!(merged, choices);
    }
}
