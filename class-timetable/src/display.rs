use std::collections::HashMap;
use std::fs::File;
use std::io::Write;

use crate::roster::TeacherRegistry;
use crate::timetable::{Cell, Timetable};

/// Number of colour classes handed out before they wrap around.
const PALETTE_SIZE: usize = 10;

/// Hands out a colour class per subject in order of first appearance:
/// `color-1` to `color-10`, then wrapping. Empty cells are `empty`, lunch
/// is `lunch`.
#[derive(Debug, Clone)]
pub struct SubjectPalette {
    classes: HashMap<String, String>,
    next: usize,
}

impl Default for SubjectPalette {
    fn default() -> Self {
        Self {
            classes: HashMap::new(),
            next: 1,
        }
    }
}

impl SubjectPalette {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn class_for(&mut self, subject: Option<&str>) -> String {
        let subject = match subject {
            None => return "empty".to_string(),
            Some(s) if s.eq_ignore_ascii_case("lunch") => return "lunch".to_string(),
            Some(s) => s,
        };
        if let Some(class) = self.classes.get(subject) {
            return class.clone();
        }
        let class = format!("color-{}", self.next);
        self.next = self.next % PALETTE_SIZE + 1;
        self.classes.insert(subject.to_string(), class.clone());
        class
    }
}

/// Name of the teacher assigned to a cell, blank if none
pub fn teacher_name<'a>(registry: &'a TeacherRegistry, cell: &Cell) -> &'a str {
    cell.teacher_id
        .and_then(|id| registry.get(id))
        .map(|t| t.name.as_str())
        .unwrap_or("")
}

/// Formats a cell as "Subject (Teacher)"
pub fn format_cell(registry: &TeacherRegistry, cell: &Cell) -> String {
    match (cell.subject.as_deref(), teacher_name(registry, cell)) {
        (None, _) => "[EMPTY]".to_string(),
        (Some(subject), "") => subject.to_string(),
        (Some(subject), teacher) => format!("{} ({})", subject, teacher),
    }
}

/// Renders the grid with days as rows and time slots as columns
pub fn render_timetable(timetable: &Timetable) -> String {
    let grid = timetable.grid();
    let registry = timetable.registry();

    let mut rows: Vec<Vec<String>> = Vec::with_capacity(grid.days().len() + 1);
    let mut header = vec!["Day".to_string()];
    header.extend(grid.time_slots().iter().cloned());
    rows.push(header);

    for day in grid.days() {
        let mut row = vec![day.clone()];
        for time in grid.time_slots() {
            let text = grid
                .get_cell(time, day)
                .map(|cell| format_cell(registry, cell))
                .unwrap_or_default();
            row.push(text);
        }
        rows.push(row);
    }

    let columns = rows[0].len();
    let widths: Vec<usize> = (0..columns)
        .map(|c| rows.iter().map(|r| r[c].chars().count()).max().unwrap_or(0))
        .collect();

    let mut out = String::new();
    for row in &rows {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(text, &width)| format!("{:<width$}", text, width = width))
            .collect();
        out.push_str(line.join(" | ").trim_end());
        out.push('\n');
    }
    out
}

/// Prints the roster in a readable format
pub fn print_roster(registry: &TeacherRegistry) {
    println!("\n=== Teachers ({}) ===", registry.len());
    for teacher in registry.iter() {
        let status = if teacher.is_absent { " [ABSENT]" } else { "" };
        println!(
            "  {} (ID: {}) - {}{}",
            teacher.name,
            teacher.id,
            teacher.subjects.join(", "),
            status
        );
    }
}

/// Prints the timetable grid
pub fn print_timetable(title: &str, timetable: &Timetable) {
    println!("\n=== {} ===", title);
    if let Some(lunch) = timetable.grid().lunch_slot() {
        println!("Lunch: {}", lunch);
    }
    print!("{}", render_timetable(timetable));
}

/// Writes the timetable grid to a text file
pub fn write_timetable_to_file(
    title: &str,
    timetable: &Timetable,
    filename: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut file = File::create(filename)?;
    writeln!(file, "** {} **", title)?;
    writeln!(file, "Generated {}", chrono::Local::now().format("%Y-%m-%d %H:%M"))?;
    write!(file, "{}", render_timetable(timetable))?;
    Ok(())
}
