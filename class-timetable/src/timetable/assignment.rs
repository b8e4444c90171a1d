use serde::Serialize;

use super::grid::TimetableGrid;
use super::types::{Cell, TeacherId};
use crate::error::{Result, TimetableError};

/// What a relocation did to the two cells involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Relocation {
    /// The destination was empty; the source is empty now.
    Moved,
    /// Both cells were occupied and exchanged their contents.
    Swapped,
}

impl TimetableGrid {
    /// Places a teacher and subject into an empty, non-fixed cell.
    ///
    /// Never overwrites: an occupied cell is rejected. The teacher's
    /// qualifications are not checked here.
    pub fn assign(&mut self, time: &str, day: &str, teacher_id: TeacherId, subject: &str) -> Result<()> {
        let subject = subject.trim();
        if subject.is_empty() {
            return Err(TimetableError::validation("subject is required"));
        }
        let index = self.mutable_index(time, day)?;
        if !self.cells()[index].is_empty() {
            return Err(TimetableError::slot_occupied(time, day));
        }
        self.cells_mut()[index] = Cell::assigned(subject, teacher_id);
        Ok(())
    }

    /// Moves the source cell onto an empty destination, or swaps the two
    /// cells when the destination is occupied. Fixed cells can be neither
    /// source nor destination.
    pub fn relocate(
        &mut self,
        from_time: &str,
        from_day: &str,
        to_time: &str,
        to_day: &str,
    ) -> Result<Relocation> {
        let from = self.mutable_index(from_time, from_day)?;
        let to = self.mutable_index(to_time, to_day)?;
        if from == to {
            return Err(TimetableError::same_slot(from_time, from_day));
        }

        let outcome = if self.cells()[to].is_empty() {
            Relocation::Moved
        } else {
            Relocation::Swapped
        };
        // a move is a swap with an empty cell
        self.cells_mut().swap(from, to);
        Ok(outcome)
    }

    /// Clears a non-fixed cell and returns what it held.
    pub fn remove_assignment(&mut self, time: &str, day: &str) -> Result<Cell> {
        let index = self.mutable_index(time, day)?;
        Ok(std::mem::take(&mut self.cells_mut()[index]))
    }

    /// Clears every cell taught by `teacher_id`; returns how many were cleared.
    ///
    /// Lunch cells never carry a teacher, so they are never touched.
    pub fn clear_teacher(&mut self, teacher_id: TeacherId) -> usize {
        let mut cleared = 0;
        for cell in self.cells_mut() {
            if cell.teacher_id == Some(teacher_id) {
                cell.clear();
                cleared += 1;
            }
        }
        cleared
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timetable::config::GridConfig;

    const NINE: &str = "09:00-10:00";
    const TEN: &str = "10:00-11:00";
    const ELEVEN: &str = "11:00-12:00";

    fn grid() -> TimetableGrid {
        let config = GridConfig::new([NINE, TEN, ELEVEN], ["Monday", "Tuesday"], Some(ELEVEN));
        TimetableGrid::initialize(&config).unwrap()
    }

    #[test]
    fn test_assign_then_get() {
        let mut g = grid();
        g.assign(NINE, "Monday", TeacherId(1), "Math").unwrap();
        assert_eq!(g.get_cell(NINE, "Monday").unwrap(), &Cell::assigned("Math", TeacherId(1)));
    }

    #[test]
    fn test_assign_never_overwrites() {
        let mut g = grid();
        g.assign(NINE, "Monday", TeacherId(1), "Math").unwrap();
        let err = g.assign(NINE, "Monday", TeacherId(2), "English").unwrap_err();
        assert!(matches!(err, TimetableError::SlotOccupied { .. }));
        assert_eq!(g.get_cell(NINE, "Monday").unwrap(), &Cell::assigned("Math", TeacherId(1)));
    }

    #[test]
    fn test_assign_blank_subject() {
        let mut g = grid();
        assert!(matches!(
            g.assign(NINE, "Monday", TeacherId(1), "   "),
            Err(TimetableError::Validation(_))
        ));
        assert!(g.get_cell(NINE, "Monday").unwrap().is_empty());
    }

    #[test]
    fn test_assign_to_lunch() {
        let mut g = grid();
        assert!(matches!(
            g.assign(ELEVEN, "Monday", TeacherId(1), "Math"),
            Err(TimetableError::FixedSlot { .. })
        ));
    }

    #[test]
    fn test_relocate_moves_into_empty_cell() {
        let mut g = grid();
        g.assign(NINE, "Monday", TeacherId(1), "Math").unwrap();
        assert_eq!(g.relocate(NINE, "Monday", TEN, "Tuesday").unwrap(), Relocation::Moved);
        assert!(g.get_cell(NINE, "Monday").unwrap().is_empty());
        assert_eq!(g.get_cell(TEN, "Tuesday").unwrap(), &Cell::assigned("Math", TeacherId(1)));
    }

    #[test]
    fn test_relocate_swaps_occupied_cells() {
        let mut g = grid();
        g.assign(NINE, "Monday", TeacherId(1), "Math").unwrap();
        g.assign(TEN, "Monday", TeacherId(2), "English").unwrap();
        assert_eq!(g.relocate(NINE, "Monday", TEN, "Monday").unwrap(), Relocation::Swapped);
        assert_eq!(g.get_cell(NINE, "Monday").unwrap(), &Cell::assigned("English", TeacherId(2)));
        assert_eq!(g.get_cell(TEN, "Monday").unwrap(), &Cell::assigned("Math", TeacherId(1)));
    }

    #[test]
    fn test_relocate_rejects_fixed_endpoints() {
        let mut g = grid();
        g.assign(NINE, "Monday", TeacherId(1), "Math").unwrap();
        assert!(matches!(
            g.relocate(NINE, "Monday", ELEVEN, "Monday"),
            Err(TimetableError::FixedSlot { .. })
        ));
        assert!(matches!(
            g.relocate(ELEVEN, "Tuesday", NINE, "Tuesday"),
            Err(TimetableError::FixedSlot { .. })
        ));
        assert_eq!(g.get_cell(NINE, "Monday").unwrap(), &Cell::assigned("Math", TeacherId(1)));
        assert_eq!(g.get_cell(ELEVEN, "Monday").unwrap(), &Cell::lunch());
    }

    #[test]
    fn test_relocate_onto_itself() {
        let mut g = grid();
        assert!(matches!(
            g.relocate(NINE, "Monday", NINE, "Monday"),
            Err(TimetableError::SameSlot { .. })
        ));
    }

    #[test]
    fn test_remove_assignment_returns_previous_content() {
        let mut g = grid();
        g.assign(TEN, "Tuesday", TeacherId(3), "Lab").unwrap();
        let removed = g.remove_assignment(TEN, "Tuesday").unwrap();
        assert_eq!(removed, Cell::assigned("Lab", TeacherId(3)));
        assert!(g.get_cell(TEN, "Tuesday").unwrap().is_empty());
        assert!(g.remove_assignment(ELEVEN, "Tuesday").is_err());
    }

    #[test]
    fn test_clear_teacher() {
        let mut g = grid();
        g.assign(NINE, "Monday", TeacherId(1), "Math").unwrap();
        g.assign(TEN, "Tuesday", TeacherId(1), "Science").unwrap();
        g.assign(TEN, "Monday", TeacherId(2), "English").unwrap();
        assert_eq!(g.clear_teacher(TeacherId(1)), 2);
        assert!(g.slots().all(|s| s.cell.teacher_id != Some(TeacherId(1))));
        assert_eq!(g.get_cell(TEN, "Monday").unwrap().teacher_id, Some(TeacherId(2)));
        assert_eq!(g.clear_teacher(TeacherId(9)), 0);
    }
}
