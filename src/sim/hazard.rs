//! Laser hazards: static beams that end the run on contact

use serde::{Deserialize, Serialize};

use super::grid::Cell;

/// Beam axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// A laser beam covering `length` cells from `origin` along its axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hazard {
    pub origin: Cell,
    pub orientation: Orientation,
    pub length: u32,
}

impl Hazard {
    pub const fn new(origin: Cell, orientation: Orientation, length: u32) -> Self {
        Self {
            origin,
            orientation,
            length,
        }
    }

    pub fn contains(&self, cell: Cell) -> bool {
        // Widened so a huge length cannot wrap
        let (on_axis, start, pos) = match self.orientation {
            Orientation::Horizontal => (cell.y == self.origin.y, self.origin.x, cell.x),
            Orientation::Vertical => (cell.x == self.origin.x, self.origin.y, cell.y),
        };
        on_axis && pos >= start && i64::from(pos) < i64::from(start) + i64::from(self.length)
    }

    /// Occupied cells, origin first
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..i32::try_from(self.length).unwrap_or(i32::MAX)).map(move |i| match self.orientation {
            Orientation::Horizontal => Cell::new(self.origin.x + i, self.origin.y),
            Orientation::Vertical => Cell::new(self.origin.x, self.origin.y + i),
        })
    }
}

/// The reference laser layout
pub fn default_layout() -> Vec<Hazard> {
    vec![
        Hazard::new(Cell::new(5, 5), Orientation::Horizontal, 5),
        Hazard::new(Cell::new(10, 14), Orientation::Vertical, 4),
        Hazard::new(Cell::new(14, 8), Orientation::Horizontal, 3),
        Hazard::new(Cell::new(3, 10), Orientation::Vertical, 6),
    ]
}

/// Fixed set of hazards for one session. Rebuilt only on reset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HazardField {
    hazards: Vec<Hazard>,
}

impl HazardField {
    pub fn new(hazards: Vec<Hazard>) -> Self {
        Self { hazards }
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.hazards.iter().any(|h| h.contains(cell))
    }

    pub fn hazards(&self) -> &[Hazard] {
        &self.hazards
    }

    pub fn len(&self) -> usize {
        self.hazards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hazards.is_empty()
    }
}
