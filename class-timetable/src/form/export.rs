use csv::Writer;
use std::io::Write;
use std::path::Path;

use crate::roster::parser::SUBJECT_SEPARATOR;
use crate::roster::TeacherRegistry;
use crate::timetable::TimetableGrid;

/// Writes the roster as `id,name,subjects,isAbsent`, readable by
/// [`crate::roster::read_roster`].
pub fn write_roster_csv<W: Write>(registry: &TeacherRegistry, out: W) -> Result<(), Box<dyn std::error::Error>> {
    let mut wtr = Writer::from_writer(out);
    wtr.write_record(["id", "name", "subjects", "isAbsent"])?;

    let separator = SUBJECT_SEPARATOR.to_string();
    for teacher in registry.iter() {
        wtr.write_record([
            teacher.id.to_string(),
            teacher.name.clone(),
            teacher.subjects.join(&separator),
            teacher.is_absent.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes every cell as `time,day,subject,teacherId`, blank fields for
/// empty values.
pub fn write_grid_csv<W: Write>(grid: &TimetableGrid, out: W) -> Result<(), Box<dyn std::error::Error>> {
    let mut wtr = Writer::from_writer(out);
    wtr.write_record(["time", "day", "subject", "teacherId"])?;

    for slot in grid.slots() {
        let subject = slot.cell.subject.clone().unwrap_or_default();
        let teacher_id = slot.cell.teacher_id.map(|id| id.to_string()).unwrap_or_default();
        wtr.write_record([slot.time, slot.day, subject.as_str(), teacher_id.as_str()])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Exports the roster to a CSV file, replacing it if present
pub fn export_roster_to_csv(registry: &TeacherRegistry, csv_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let file = std::fs::File::create(csv_path)?;
    write_roster_csv(registry, file)
}

/// Exports the grid to a CSV file, replacing it if present
pub fn export_grid_to_csv(grid: &TimetableGrid, csv_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let file = std::fs::File::create(csv_path)?;
    write_grid_csv(grid, file)
}
