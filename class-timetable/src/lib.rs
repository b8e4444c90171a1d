//! Weekly class timetable: a (time slot x day) grid of subject/teacher
//! assignments, a teacher roster with absence tracking, and substitute
//! discovery for absent teachers.

pub mod config;
pub mod display;
pub mod error;
pub mod form;
pub mod logging;
pub mod roster;
pub mod timetable;
pub mod web;

pub use error::{Result, TimetableError};
pub use roster::{Teacher, TeacherRegistry};
pub use timetable::{Cell, GridConfig, Relocation, TeacherId, Timetable, TimetableGrid};
