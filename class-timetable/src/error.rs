use thiserror::Error;

use crate::timetable::TeacherId;

/// Errors returned by timetable and roster operations.
///
/// A failing operation never leaves the grid or the roster partially updated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimetableError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("teacher {id} not found")]
    NotFound { id: TeacherId },

    #[error("slot {time} / {day} is outside the configured grid")]
    OutOfBounds { time: String, day: String },

    #[error("slot {time} / {day} is fixed and cannot be changed")]
    FixedSlot { time: String, day: String },

    #[error("slot {time} / {day} is already occupied")]
    SlotOccupied { time: String, day: String },

    #[error("slot {time} / {day} cannot be relocated onto itself")]
    SameSlot { time: String, day: String },

    #[error("slot {time} / {day} has no subject assigned")]
    EmptySlot { time: String, day: String },
}

impl TimetableError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        TimetableError::Validation(message.into())
    }

    pub(crate) fn out_of_bounds(time: &str, day: &str) -> Self {
        TimetableError::OutOfBounds {
            time: time.to_string(),
            day: day.to_string(),
        }
    }

    pub(crate) fn fixed_slot(time: &str, day: &str) -> Self {
        TimetableError::FixedSlot {
            time: time.to_string(),
            day: day.to_string(),
        }
    }

    pub(crate) fn slot_occupied(time: &str, day: &str) -> Self {
        TimetableError::SlotOccupied {
            time: time.to_string(),
            day: day.to_string(),
        }
    }

    pub(crate) fn same_slot(time: &str, day: &str) -> Self {
        TimetableError::SameSlot {
            time: time.to_string(),
            day: day.to_string(),
        }
    }

    pub(crate) fn empty_slot(time: &str, day: &str) -> Self {
        TimetableError::EmptySlot {
            time: time.to_string(),
            day: day.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TimetableError>;
