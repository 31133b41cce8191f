//! The snake body

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::grid::{Cell, Direction};

/// Ordered body segments, head first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snake {
    segments: VecDeque<Cell>,
}

impl Snake {
    /// A straight snake of `length` segments with its head at `head`,
    /// trailing away from `heading`
    pub fn spawn(head: Cell, heading: Direction, length: usize) -> Self {
        let back = heading.opposite();
        let mut segments = VecDeque::with_capacity(length.max(1));
        let mut cell = head;
        for _ in 0..length.max(1) {
            segments.push_back(cell);
            cell = cell.step(back);
        }
        Self { segments }
    }

    /// Build from explicit segments (head first)
    pub fn from_segments(segments: impl IntoIterator<Item = Cell>) -> Self {
        let segments: VecDeque<Cell> = segments.into_iter().collect();
        debug_assert!(!segments.is_empty(), "snake must have at least one segment");
        Self { segments }
    }

    pub fn head(&self) -> Cell {
        self.segments[0]
    }

    pub fn tail(&self) -> Cell {
        self.segments[self.segments.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> impl ExactSizeIterator<Item = Cell> + '_ {
        self.segments.iter().copied()
    }

    /// Whether any segment, head included, sits on `cell`
    pub fn occupies(&self, cell: Cell) -> bool {
        self.segments.contains(&cell)
    }

    /// Where the head would land moving one step in `direction`
    pub fn peek_next_head(&self, direction: Direction) -> Cell {
        self.head().step(direction)
    }

    /// Hit test against the body, skipping the current head (index 0)
    pub fn collides_with_body(&self, cell: Cell) -> bool {
        self.segments.iter().skip(1).any(|&s| s == cell)
    }

    /// Push a new head; drop the tail unless growing. Returns the removed tail.
    pub fn advance(&mut self, new_head: Cell, grow: bool) -> Option<Cell> {
        self.segments.push_front(new_head);
        let removed = if grow { None } else { self.segments.pop_back() };
        debug_assert!(!self.segments.is_empty());
        removed
    }
}
