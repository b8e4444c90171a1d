use csv::ReaderBuilder;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

use super::registry::{Teacher, TeacherRegistry};
use crate::error::TimetableError;
use crate::timetable::TeacherId;

/// Separator between subjects inside the `subjects` column.
pub const SUBJECT_SEPARATOR: char = ';';

/// One row of a roster CSV: `id,name,subjects,isAbsent`
#[derive(Debug, Deserialize)]
struct TeacherRecord {
    id: u32,
    name: String,
    subjects: String,
    #[serde(rename = "isAbsent", default)]
    is_absent: String,
}

/// Parses a boolean value from various string representations
fn parse_bool(value: &str) -> bool {
    let lower = value.trim().to_lowercase();
    lower == "yes" || lower == "true" || lower == "1"
}

/// Reads a roster from any CSV source with a header row.
pub fn read_roster<R: Read>(source: R) -> Result<TeacherRegistry, Box<dyn std::error::Error>> {
    let mut reader = ReaderBuilder::new().trim(csv::Trim::All).from_reader(source);

    let mut teachers = Vec::new();
    for (row, result) in reader.deserialize::<TeacherRecord>().enumerate() {
        let record = result?;
        let subjects: Vec<String> = record
            .subjects
            .split(SUBJECT_SEPARATOR)
            .map(|s| s.trim().to_string())
            .collect();
        if record.name.trim().is_empty() {
            // row + 2: one for the header, one for 1-based numbering
            return Err(TimetableError::validation(format!("row {}: teacher name is empty", row + 2)).into());
        }
        teachers.push(Teacher {
            id: TeacherId(record.id),
            name: record.name,
            subjects,
            is_absent: parse_bool(&record.is_absent),
        });
    }

    Ok(TeacherRegistry::from_teachers(teachers)?)
}

/// Loads a roster from a CSV file
pub fn load_roster<P: AsRef<Path>>(csv_path: P) -> Result<TeacherRegistry, Box<dyn std::error::Error>> {
    let file = std::fs::File::open(csv_path)?;
    read_roster(file)
}
