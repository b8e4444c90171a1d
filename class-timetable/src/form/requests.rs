use serde::Deserialize;

use crate::error::{Result, TimetableError};
use crate::roster::split_subjects;
use crate::timetable::slot_utils::complete_time_slots;
use crate::timetable::{GridConfig, TeacherId, MAX_TIME_SLOTS};

/// Value of the lunch selector meaning "no lunch slot".
pub const NO_LUNCH: &str = "none";

/// Setup form: number of periods, their labels, Saturday, lunch slot
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupRequest {
    pub num_periods: u32,
    #[serde(default)]
    pub time_slots: Vec<String>,
    #[serde(default)]
    pub include_saturday: bool,
    #[serde(default)]
    pub lunch_slot: Option<String>,
}

impl SetupRequest {
    /// Validates the form and turns it into a grid configuration.
    ///
    /// Periods without a label get the default one. A missing lunch value
    /// or "none" means no lunch slot.
    pub fn to_config(&self) -> Result<GridConfig> {
        if self.num_periods < 1 || self.num_periods as usize > MAX_TIME_SLOTS {
            return Err(TimetableError::validation(format!(
                "number of periods must be between 1 and {}",
                MAX_TIME_SLOTS
            )));
        }
        let time_slots = complete_time_slots(self.num_periods, &self.time_slots);
        let lunch = self
            .lunch_slot
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty() && *l != NO_LUNCH);

        let config = GridConfig::school_week(time_slots, self.include_saturday, lunch);
        config.validate()?;
        Ok(config)
    }
}

/// Add-teacher form; subjects are comma-separated
#[derive(Debug, Clone, Deserialize)]
pub struct AddTeacherRequest {
    pub name: String,
    pub subjects: String,
}

impl AddTeacherRequest {
    pub fn subject_list(&self) -> Vec<String> {
        split_subjects(&self.subjects)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRequest {
    pub time: String,
    pub day: String,
    pub teacher_id: TeacherId,
    pub subject: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelocateRequest {
    pub from_time: String,
    pub from_day: String,
    pub to_time: String,
    pub to_day: String,
}

/// A single (time, day) coordinate
#[derive(Debug, Clone, Deserialize)]
pub struct SlotRequest {
    pub time: String,
    pub day: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubstituteRequest {
    pub time: String,
    pub day: String,
    pub teacher_id: TeacherId,
}
