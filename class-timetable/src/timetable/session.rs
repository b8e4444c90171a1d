use tracing::debug;

use super::assignment::Relocation;
use super::config::GridConfig;
use super::grid::TimetableGrid;
use super::substitution::SubstitutionResolver;
use super::types::{Cell, SlotRef, TeacherId};
use crate::error::Result;
use crate::roster::{Teacher, TeacherRegistry};

/// One session's timetable: a teacher roster plus the grid it staffs.
///
/// All roster and grid operations go through here so that cross-component
/// rules hold: cells only ever reference teachers on the roster, and
/// removing a teacher clears the cells it taught. Callers must serialize
/// access; nothing in here locks.
#[derive(Debug, Clone)]
pub struct Timetable {
    registry: TeacherRegistry,
    grid: TimetableGrid,
}

impl Timetable {
    pub fn new(registry: TeacherRegistry, config: &GridConfig) -> Result<Self> {
        let grid = TimetableGrid::initialize(config)?;
        Ok(Self { registry, grid })
    }

    /// Rebuilds the grid from scratch, dropping every assignment. The roster
    /// is kept.
    pub fn reinitialize(&mut self, config: &GridConfig) -> Result<()> {
        self.grid = TimetableGrid::initialize(config)?;
        debug!(
            time_slots = self.grid.time_slots().len(),
            days = self.grid.days().len(),
            lunch = ?self.grid.lunch_slot(),
            "grid rebuilt"
        );
        Ok(())
    }

    pub fn registry(&self) -> &TeacherRegistry {
        &self.registry
    }

    pub fn grid(&self) -> &TimetableGrid {
        &self.grid
    }

    pub fn resolver(&self) -> SubstitutionResolver<'_> {
        SubstitutionResolver::new(&self.registry, &self.grid)
    }

    // ----- roster -----

    pub fn add_teacher<I, S>(&mut self, name: &str, subjects: I) -> Result<&Teacher>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let teacher = self.registry.add(name, subjects)?;
        debug!(id = %teacher.id, name = %teacher.name, "teacher added");
        Ok(teacher)
    }

    /// Removes a teacher and clears every cell it was assigned to.
    /// Returns the removed teacher, or `None` if the id was unknown.
    pub fn remove_teacher(&mut self, id: TeacherId) -> Option<Teacher> {
        let removed = self.registry.remove(id)?;
        let cleared = self.grid.clear_teacher(id);
        debug!(%id, cleared, "teacher removed");
        Some(removed)
    }

    pub fn toggle_absence(&mut self, id: TeacherId) -> Result<bool> {
        let absent = self.registry.toggle_absence(id)?;
        debug!(%id, absent, "absence toggled");
        Ok(absent)
    }

    pub fn teacher(&self, id: TeacherId) -> Option<&Teacher> {
        self.registry.get(id)
    }

    // ----- grid -----

    pub fn cell(&self, time: &str, day: &str) -> Result<&Cell> {
        self.grid.get_cell(time, day)
    }

    /// Places a roster teacher into an empty cell. Only the teacher's
    /// existence is checked, not its qualification for `subject`.
    pub fn assign(&mut self, time: &str, day: &str, teacher_id: TeacherId, subject: &str) -> Result<()> {
        self.registry.require(teacher_id)?;
        self.grid.assign(time, day, teacher_id, subject)?;
        debug!(time, day, %teacher_id, subject, "slot assigned");
        Ok(())
    }

    pub fn relocate(&mut self, from_time: &str, from_day: &str, to_time: &str, to_day: &str) -> Result<Relocation> {
        let outcome = self.grid.relocate(from_time, from_day, to_time, to_day)?;
        debug!(from_time, from_day, to_time, to_day, ?outcome, "slot relocated");
        Ok(outcome)
    }

    pub fn remove_assignment(&mut self, time: &str, day: &str) -> Result<Cell> {
        let removed = self.grid.remove_assignment(time, day)?;
        debug!(time, day, "assignment removed");
        Ok(removed)
    }

    // ----- substitution -----

    pub fn find_substitutes(&self, time: &str, subject: &str) -> Result<Vec<&Teacher>> {
        self.resolver().find_substitutes(time, subject)
    }

    pub fn substitutes_for(&self, time: &str, day: &str) -> Result<Vec<&Teacher>> {
        self.resolver().substitutes_for(time, day)
    }

    pub fn absent_slots(&self) -> Vec<SlotRef<'_>> {
        self.resolver().absent_slots()
    }

    /// Puts `substitute` on the cell. The id must be on the roster; whether
    /// it came from [`Timetable::find_substitutes`] is up to the caller.
    pub fn apply_substitute(&mut self, time: &str, day: &str, substitute: TeacherId) -> Result<()> {
        self.registry.require(substitute)?;
        self.grid.apply_substitute(time, day, substitute)?;
        debug!(time, day, %substitute, "substitute applied");
        Ok(())
    }
}
