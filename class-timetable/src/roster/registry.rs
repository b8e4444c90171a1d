use serde::{Deserialize, Serialize};

use crate::error::{Result, TimetableError};
use crate::timetable::TeacherId;

/// A teacher on the roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub id: TeacherId,
    pub name: String,
    pub subjects: Vec<String>,
    pub is_absent: bool,
}

impl Teacher {
    /// Exact, case-sensitive subject match
    pub fn teaches(&self, subject: &str) -> bool {
        self.subjects.iter().any(|s| s == subject)
    }
}

/// Splits a comma-separated subjects field, e.g. "Math, Science".
pub fn split_subjects(input: &str) -> Vec<String> {
    normalize_subjects(input.split(','))
}

/// Trims subjects, drops blanks and keeps the first occurrence of duplicates.
fn normalize_subjects<I, S>(subjects: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut result: Vec<String> = Vec::new();
    for subject in subjects {
        let subject = subject.as_ref().trim();
        if !subject.is_empty() && !result.iter().any(|s| s == subject) {
            result.push(subject.to_string());
        }
    }
    result
}

/// The roster of teachers, kept in insertion order.
///
/// Lookup by id is a linear scan over the roster; iteration order is the
/// order teachers were added, and every listing derived from the roster
/// (substitute candidates included) keeps that order.
#[derive(Debug, Clone, Default)]
pub struct TeacherRegistry {
    teachers: Vec<Teacher>,
}

impl TeacherRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The roster a new session starts with
    pub fn sample() -> Self {
        let seed: [(&str, &[&str], bool); 5] = [
            ("Mr. John Smith", &["Math", "Science"], false),
            ("Ms. Emily White", &["English", "Lab"], false),
            ("Dr. David Green", &["Science", "Lab"], false),
            ("Mrs. Sarah Jones", &["Math", "CS"], false),
            ("Mr. Paul Brown", &["English"], true),
        ];
        let teachers = seed
            .iter()
            .zip(1u32..)
            .map(|(&(name, subjects, is_absent), id)| Teacher {
                id: TeacherId(id),
                name: name.to_string(),
                subjects: subjects.iter().map(|s| s.to_string()).collect(),
                is_absent,
            })
            .collect();
        Self { teachers }
    }

    /// Builds a roster from previously saved teachers, keeping their ids.
    pub fn from_teachers(teachers: Vec<Teacher>) -> Result<Self> {
        let mut registry = Self::new();
        for mut teacher in teachers {
            if registry.get(teacher.id).is_some() {
                return Err(TimetableError::validation(format!(
                    "duplicate teacher id {}",
                    teacher.id
                )));
            }
            teacher.name = teacher.name.trim().to_string();
            teacher.subjects = normalize_subjects(&teacher.subjects);
            if teacher.name.is_empty() || teacher.subjects.is_empty() {
                return Err(TimetableError::validation(format!(
                    "teacher {} needs a name and at least one subject",
                    teacher.id
                )));
            }
            registry.teachers.push(teacher);
        }
        Ok(registry)
    }

    /// Adds a present teacher with the next free id (one above the current
    /// maximum, 1 for an empty roster).
    pub fn add<I, S>(&mut self, name: &str, subjects: I) -> Result<&Teacher>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let name = name.trim();
        if name.is_empty() {
            return Err(TimetableError::validation("teacher name is required"));
        }
        let subjects = normalize_subjects(subjects);
        if subjects.is_empty() {
            return Err(TimetableError::validation("at least one subject is required"));
        }

        let id = self.next_id()?;
        self.teachers.push(Teacher {
            id,
            name: name.to_string(),
            subjects,
            is_absent: false,
        });
        Ok(&self.teachers[self.teachers.len() - 1])
    }

    /// Removes a teacher if present. Removing an unknown id is not an error.
    pub fn remove(&mut self, id: TeacherId) -> Option<Teacher> {
        let position = self.teachers.iter().position(|t| t.id == id)?;
        Some(self.teachers.remove(position))
    }

    /// Flips the absence flag; returns the new value.
    pub fn toggle_absence(&mut self, id: TeacherId) -> Result<bool> {
        let teacher = self
            .teachers
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(TimetableError::NotFound { id })?;
        teacher.is_absent = !teacher.is_absent;
        Ok(teacher.is_absent)
    }

    pub fn get(&self, id: TeacherId) -> Option<&Teacher> {
        self.teachers.iter().find(|t| t.id == id)
    }

    pub fn require(&self, id: TeacherId) -> Result<&Teacher> {
        self.get(id).ok_or(TimetableError::NotFound { id })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Teacher> {
        self.teachers.iter()
    }

    pub fn len(&self) -> usize {
        self.teachers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teachers.is_empty()
    }

    fn next_id(&self) -> Result<TeacherId> {
        match self.teachers.iter().map(|t| t.id.0).max() {
            None => Ok(TeacherId(1)),
            Some(max) => max
                .checked_add(1)
                .map(TeacherId)
                .ok_or_else(|| TimetableError::validation("no teacher ids left above the current maximum")),
        }
    }
}
