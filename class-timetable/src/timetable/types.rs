use serde::{Deserialize, Serialize};
use std::fmt;

/// Subject written into every cell of the lunch time slot.
pub const LUNCH_SUBJECT: &str = "Lunch";

/// Identifier of a teacher in the roster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeacherId(pub u32);

impl fmt::Display for TeacherId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Content of one (time slot, day) cell.
///
/// A cell is empty when it has no subject. The teacher is referenced by id
/// only; removing the teacher from the roster clears every cell pointing at it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    pub subject: Option<String>,
    pub teacher_id: Option<TeacherId>,
}

impl Cell {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn assigned(subject: impl Into<String>, teacher_id: TeacherId) -> Self {
        Self {
            subject: Some(subject.into()),
            teacher_id: Some(teacher_id),
        }
    }

    pub fn lunch() -> Self {
        Self {
            subject: Some(LUNCH_SUBJECT.to_string()),
            teacher_id: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.subject.is_none()
    }

    pub fn clear(&mut self) {
        self.subject = None;
        self.teacher_id = None;
    }
}

/// Read-only view of a cell together with its coordinates
#[derive(Debug, Clone, Copy)]
pub struct SlotRef<'a> {
    pub time: &'a str,
    pub day: &'a str,
    pub cell: &'a Cell,
    pub fixed: bool,
}
