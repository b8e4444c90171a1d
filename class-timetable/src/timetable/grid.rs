use std::collections::HashMap;

use super::config::GridConfig;
use super::types::{Cell, SlotRef};
use crate::error::{Result, TimetableError};

/// The weekly grid: one cell for every (time slot, day) pair.
///
/// Cells are stored time-major. A grid only exists once it has been built
/// from a validated [`GridConfig`], and the time slots and days never change
/// afterwards; reconfiguring means building a new grid.
#[derive(Debug, Clone)]
pub struct TimetableGrid {
    time_slots: Vec<String>,
    days: Vec<String>,
    time_index: HashMap<String, usize>,
    day_index: HashMap<String, usize>,
    lunch: Option<usize>,
    cells: Vec<Cell>,
}

impl TimetableGrid {
    /// Builds a fresh grid. Every cell of the lunch slot holds the fixed
    /// "Lunch" cell, every other cell starts empty.
    pub fn initialize(config: &GridConfig) -> Result<Self> {
        config.validate()?;

        let lunch = config
            .lunch
            .as_ref()
            .and_then(|lunch| config.time_slots.iter().position(|t| t == lunch));

        let mut cells = Vec::with_capacity(config.time_slots.len() * config.days.len());
        for t in 0..config.time_slots.len() {
            for _ in &config.days {
                cells.push(if Some(t) == lunch { Cell::lunch() } else { Cell::empty() });
            }
        }

        Ok(Self {
            time_index: index_of(&config.time_slots),
            day_index: index_of(&config.days),
            time_slots: config.time_slots.clone(),
            days: config.days.clone(),
            lunch,
            cells,
        })
    }

    pub fn time_slots(&self) -> &[String] {
        &self.time_slots
    }

    pub fn days(&self) -> &[String] {
        &self.days
    }

    /// Label of the lunch time slot, if one was configured
    pub fn lunch_slot(&self) -> Option<&str> {
        self.lunch.map(|t| self.time_slots[t].as_str())
    }

    pub fn contains_time(&self, time: &str) -> bool {
        self.time_index.contains_key(time)
    }

    pub fn is_fixed(&self, time: &str, day: &str) -> Result<bool> {
        let (t, _) = self.coordinates(time, day)?;
        Ok(self.lunch == Some(t))
    }

    pub fn get_cell(&self, time: &str, day: &str) -> Result<&Cell> {
        let index = self.index(time, day)?;
        Ok(&self.cells[index])
    }

    /// Overwrites a non-fixed cell. A cell without a subject is stored as
    /// empty, so a teacher never sits in a slot that has no subject.
    pub fn set_cell(&mut self, time: &str, day: &str, cell: Cell) -> Result<()> {
        let index = self.mutable_index(time, day)?;
        self.cells[index] = if cell.subject.is_none() { Cell::empty() } else { cell };
        Ok(())
    }

    /// Empties a non-fixed cell. Clearing an empty cell is a no-op.
    pub fn clear_cell(&mut self, time: &str, day: &str) -> Result<()> {
        let index = self.mutable_index(time, day)?;
        self.cells[index].clear();
        Ok(())
    }

    /// All cells in time-major order
    pub fn slots(&self) -> impl Iterator<Item = SlotRef<'_>> {
        let days = self.days.len();
        self.cells.iter().enumerate().map(move |(index, cell)| {
            let t = index / days;
            SlotRef {
                time: &self.time_slots[t],
                day: &self.days[index % days],
                cell,
                fixed: self.lunch == Some(t),
            }
        })
    }

    /// The cells of one time slot across every day
    pub fn row(&self, time: &str) -> Result<&[Cell]> {
        let t = *self
            .time_index
            .get(time)
            .ok_or_else(|| TimetableError::out_of_bounds(time, "*"))?;
        let days = self.days.len();
        Ok(&self.cells[t * days..(t + 1) * days])
    }

    pub(crate) fn coordinates(&self, time: &str, day: &str) -> Result<(usize, usize)> {
        match (self.time_index.get(time), self.day_index.get(day)) {
            (Some(&t), Some(&d)) => Ok((t, d)),
            _ => Err(TimetableError::out_of_bounds(time, day)),
        }
    }

    pub(crate) fn index(&self, time: &str, day: &str) -> Result<usize> {
        let (t, d) = self.coordinates(time, day)?;
        Ok(t * self.days.len() + d)
    }

    /// Index of a cell that may be changed; fixed cells are rejected.
    pub(crate) fn mutable_index(&self, time: &str, day: &str) -> Result<usize> {
        let (t, d) = self.coordinates(time, day)?;
        if self.lunch == Some(t) {
            return Err(TimetableError::fixed_slot(time, day));
        }
        Ok(t * self.days.len() + d)
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    pub(crate) fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

fn index_of(labels: &[String]) -> HashMap<String, usize> {
    labels
        .iter()
        .enumerate()
        .map(|(i, label)| (label.clone(), i))
        .collect()
}
