//! Free-cell search for food and power-ups
//!
//! Random probing first (cheap on a sparse grid), then a deterministic scan so
//! a nearly full grid still finds its last free cells.

use std::fmt;

use rand::Rng;

use super::grid::{Cell, Grid};
use super::hazard::HazardField;
use super::snake::Snake;
use crate::consts::MAX_CREATION_ATTEMPTS;

/// Every free cell is taken
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementError {
    GridFull,
}

impl fmt::Display for PlacementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlacementError::GridFull => write!(f, "no free cell available"),
        }
    }
}

impl std::error::Error for PlacementError {}

/// What is already on the grid
#[derive(Debug, Clone, Copy)]
pub struct Occupancy<'a> {
    pub snake: &'a Snake,
    pub hazards: &'a HazardField,
    pub food: Option<Cell>,
}

impl Occupancy<'_> {
    fn is_free(&self, cell: Cell, exclude: &[Cell]) -> bool {
        !self.snake.occupies(cell)
            && !self.hazards.contains(cell)
            && self.food != Some(cell)
            && !exclude.contains(&cell)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PositionFinder {
    grid: Grid,
    max_attempts: u32,
}

impl Default for PositionFinder {
    fn default() -> Self {
        Self::new(Grid::default(), MAX_CREATION_ATTEMPTS)
    }
}

impl PositionFinder {
    pub fn new(grid: Grid, max_attempts: u32) -> Self {
        Self { grid, max_attempts }
    }

    /// Find a cell free of snake, hazards, food and `exclude`
    pub fn find<R: Rng>(
        &self,
        rng: &mut R,
        occupancy: &Occupancy<'_>,
        exclude: &[Cell],
    ) -> Result<Cell, PlacementError> {
        if self.grid.size <= 0 {
            return Err(PlacementError::GridFull);
        }

        for _ in 0..self.max_attempts {
            let cell = Cell::new(
                rng.random_range(0..self.grid.size),
                rng.random_range(0..self.grid.size),
            );
            if occupancy.is_free(cell, exclude) {
                return Ok(cell);
            }
        }

        log::debug!(
            "random placement failed after {} attempts, scanning grid",
            self.max_attempts
        );
        self.grid
            .cells()
            .find(|&cell| occupancy.is_free(cell, exclude))
            .ok_or(PlacementError::GridFull)
    }
}
