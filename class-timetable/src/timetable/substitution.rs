use std::collections::HashSet;

use super::grid::TimetableGrid;
use super::types::{SlotRef, TeacherId};
use crate::error::{Result, TimetableError};
use crate::roster::{Teacher, TeacherRegistry};

/// Finds replacement teachers for cells whose teacher is absent.
///
/// A substitute for (time, subject) teaches the subject, is not absent, and
/// is not already teaching at that time on any day. The resolver only
/// advises; [`TimetableGrid::apply_substitute`] does not re-check.
#[derive(Debug, Clone, Copy)]
pub struct SubstitutionResolver<'a> {
    registry: &'a TeacherRegistry,
    grid: &'a TimetableGrid,
}

impl<'a> SubstitutionResolver<'a> {
    pub fn new(registry: &'a TeacherRegistry, grid: &'a TimetableGrid) -> Self {
        Self { registry, grid }
    }

    /// Teacher ids assigned anywhere in the given time slot
    pub fn busy_at(&self, time: &str) -> Result<HashSet<TeacherId>> {
        Ok(self
            .grid
            .row(time)?
            .iter()
            .filter_map(|cell| cell.teacher_id)
            .collect())
    }

    /// Available substitutes in roster order. An empty list is a normal
    /// outcome, not an error.
    pub fn find_substitutes(&self, time: &str, subject: &str) -> Result<Vec<&'a Teacher>> {
        let busy = self.busy_at(time)?;
        Ok(self
            .registry
            .iter()
            .filter(|t| t.teaches(subject) && !t.is_absent)
            .filter(|t| !busy.contains(&t.id))
            .collect())
    }

    /// Substitutes for whatever subject the cell at (time, day) holds.
    pub fn substitutes_for(&self, time: &str, day: &str) -> Result<Vec<&'a Teacher>> {
        if self.grid.is_fixed(time, day)? {
            return Err(TimetableError::fixed_slot(time, day));
        }
        let subject = self
            .grid
            .get_cell(time, day)?
            .subject
            .as_deref()
            .ok_or_else(|| TimetableError::empty_slot(time, day))?;
        self.find_substitutes(time, subject)
    }

    /// Cells whose assigned teacher is currently marked absent
    pub fn absent_slots(&self) -> Vec<SlotRef<'a>> {
        self.grid
            .slots()
            .filter(|slot| {
                slot.cell
                    .teacher_id
                    .and_then(|id| self.registry.get(id))
                    .map_or(false, |t| t.is_absent)
            })
            .collect()
    }
}

impl TimetableGrid {
    /// Hands the cell at (time, day) over to `substitute`, keeping its subject.
    ///
    /// The cell must be non-fixed and hold a subject. Qualification is not
    /// re-validated.
    pub fn apply_substitute(&mut self, time: &str, day: &str, substitute: TeacherId) -> Result<()> {
        let index = self.mutable_index(time, day)?;
        let cell = &mut self.cells_mut()[index];
        if cell.is_empty() {
            return Err(TimetableError::empty_slot(time, day));
        }
        cell.teacher_id = Some(substitute);
        Ok(())
    }
}
