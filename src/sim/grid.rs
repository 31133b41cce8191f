//! Grid geometry: cells, directions and bounds
//!
//! The simulation only ever needs `in_bounds` and `step`. Pixel mapping is
//! provided for presentation layers and never feeds back into gameplay.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::GRID_SIZE;

/// A grid cell. Coordinates are signed so an out-of-bounds candidate head
/// (e.g. `x = -1`) is representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Neighbouring cell one unit in `direction`
    #[inline]
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Movement direction. Screen convention: `Up` decreases `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Unit offset `(dx, dy)`
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// Square playing field of `size x size` cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub size: i32,
}

impl Default for Grid {
    fn default() -> Self {
        Self { size: GRID_SIZE }
    }
}

impl Grid {
    pub fn new(size: i32) -> Self {
        Self { size }
    }

    #[inline]
    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.x < self.size && cell.y >= 0 && cell.y < self.size
    }

    /// Total number of cells
    pub fn cell_count(&self) -> usize {
        (self.size.max(0) as usize).pow(2)
    }

    /// Centre cell (rounded down), where a new snake's head starts
    pub fn center(&self) -> Cell {
        Cell::new(self.size / 2, self.size / 2)
    }

    /// Every cell in scan order: x outer, y inner
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.size).flat_map(move |x| (0..self.size).map(move |y| Cell::new(x, y)))
    }

    /// Pixel-space centre of a cell
    pub fn cell_to_pixel(&self, cell: Cell, cell_size: f32) -> Vec2 {
        Vec2::new(
            (cell.x as f32 + 0.5) * cell_size,
            (cell.y as f32 + 0.5) * cell_size,
        )
    }

    /// Cell under a pixel position, if it lies on the grid
    pub fn pixel_to_cell(&self, pos: Vec2, cell_size: f32) -> Option<Cell> {
        if cell_size <= 0.0 {
            return None;
        }
        let cell = Cell::new(
            (pos.x / cell_size).floor() as i32,
            (pos.y / cell_size).floor() as i32,
        );
        self.in_bounds(cell).then_some(cell)
    }
}
