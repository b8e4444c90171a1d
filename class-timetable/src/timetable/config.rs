use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{Result, TimetableError};

/// Maximum number of time slots a grid can be configured with.
pub const MAX_TIME_SLOTS: usize = 12;

/// Monday to Friday.
pub const WEEKDAYS: [&str; 5] = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"];

/// Optional sixth day.
pub const SATURDAY: &str = "Saturday";

/// Shape of a timetable grid: its ordered time slots and days, and the
/// time slot reserved for lunch (if any).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    pub time_slots: Vec<String>,
    pub days: Vec<String>,
    pub lunch: Option<String>,
}

impl GridConfig {
    pub fn new(
        time_slots: impl IntoIterator<Item = impl Into<String>>,
        days: impl IntoIterator<Item = impl Into<String>>,
        lunch: Option<&str>,
    ) -> Self {
        Self {
            time_slots: time_slots.into_iter().map(Into::into).collect(),
            days: days.into_iter().map(Into::into).collect(),
            lunch: lunch.map(str::to_string),
        }
    }

    /// A Monday to Friday week, optionally extended with Saturday
    pub fn school_week(
        time_slots: impl IntoIterator<Item = impl Into<String>>,
        include_saturday: bool,
        lunch: Option<&str>,
    ) -> Self {
        let mut days: Vec<&str> = WEEKDAYS.to_vec();
        if include_saturday {
            days.push(SATURDAY);
        }
        Self::new(time_slots, days, lunch)
    }

    /// Checks the configuration before a grid is built from it.
    ///
    /// Requires 1 to 12 time slots, no blank or duplicate labels, at least
    /// one day with no duplicates, and a lunch slot that is one of the
    /// configured time slots.
    pub fn validate(&self) -> Result<()> {
        if self.time_slots.is_empty() || self.time_slots.len() > MAX_TIME_SLOTS {
            return Err(TimetableError::validation(format!(
                "number of time slots must be between 1 and {}, got {}",
                MAX_TIME_SLOTS,
                self.time_slots.len()
            )));
        }
        check_labels("time slot", &self.time_slots)?;

        if self.days.is_empty() {
            return Err(TimetableError::validation("at least one day is required"));
        }
        check_labels("day", &self.days)?;

        if let Some(lunch) = &self.lunch {
            if !self.time_slots.contains(lunch) {
                return Err(TimetableError::validation(format!(
                    "lunch slot {} is not one of the configured time slots",
                    lunch
                )));
            }
        }
        Ok(())
    }
}

fn check_labels(kind: &str, labels: &[String]) -> Result<()> {
    let mut seen = HashSet::new();
    for label in labels {
        if label.trim().is_empty() {
            return Err(TimetableError::validation(format!("{} label is blank", kind)));
        }
        if !seen.insert(label.as_str()) {
            return Err(TimetableError::validation(format!(
                "duplicate {} label: {}",
                kind, label
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timetable::slot_utils::default_time_slots;

    #[test]
    fn test_school_week_days() {
        let config = GridConfig::school_week(default_time_slots(2), false, None);
        assert_eq!(config.days, WEEKDAYS.to_vec());

        let config = GridConfig::school_week(default_time_slots(2), true, None);
        assert_eq!(config.days.len(), 6);
        assert_eq!(config.days.last().map(String::as_str), Some(SATURDAY));
    }

    #[test]
    fn test_validate_slot_count() {
        let none: Vec<String> = Vec::new();
        assert!(GridConfig::school_week(none, false, None).validate().is_err());
        assert!(GridConfig::school_week(default_time_slots(12), false, None)
            .validate()
            .is_ok());
        assert!(GridConfig::school_week(default_time_slots(13), false, None)
            .validate()
            .is_err());
    }

    #[test]
    fn test_validate_duplicate_label() {
        let config = GridConfig::school_week(["09:00", "09:00"], false, None);
        assert!(matches!(config.validate(), Err(TimetableError::Validation(_))));
    }

    #[test]
    fn test_validate_unknown_lunch() {
        let config = GridConfig::school_week(["09:00", "10:00"], false, Some("12:00"));
        assert!(config.validate().is_err());

        let config = GridConfig::school_week(["09:00", "10:00"], false, Some("10:00"));
        assert!(config.validate().is_ok());
    }
}
