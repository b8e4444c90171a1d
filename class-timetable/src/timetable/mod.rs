pub mod types;
pub mod config;
pub mod slot_utils;
pub mod grid;
pub mod assignment;
pub mod substitution;
pub mod session;

pub use types::{Cell, SlotRef, TeacherId, LUNCH_SUBJECT};
pub use config::{GridConfig, MAX_TIME_SLOTS, SATURDAY, WEEKDAYS};
pub use grid::TimetableGrid;
pub use assignment::Relocation;
pub use substitution::SubstitutionResolver;
pub use session::Timetable;
