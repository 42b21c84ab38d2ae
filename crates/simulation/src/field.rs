//! Occupancy grid: one bit per cell, row-major, linear index `x + y * width`.
//!
//! Bounds are strict (`0 <= x < width`, `0 <= y < height`). Out-of-bounds
//! reads report the cell as occupied — the boundary acts as a solid wall —
//! and out-of-bounds writes are no-ops, so callers that probe before moving
//! can never corrupt the grid.

use crate::vector::Vec2;

#[derive(Debug, Clone)]
pub struct OccupancyField {
    width: i32,
    height: i32,
    cells: Vec<bool>,
}

impl OccupancyField {
    #[must_use]
    pub fn new(width: i32, height: i32) -> Self {
        assert!(width > 0 && height > 0, "field dimensions must be positive");
        Self {
            width,
            height,
            cells: vec![false; (width * height) as usize],
        }
    }

    #[must_use]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[must_use]
    pub fn in_bounds(&self, pos: Vec2) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    fn index(&self, pos: Vec2) -> usize {
        (pos.x + pos.y * self.width) as usize
    }

    /// True if the cell holds no grain. Out-of-bounds cells count as
    /// occupied (solid wall).
    #[must_use]
    pub fn is_empty(&self, pos: Vec2) -> bool {
        if self.in_bounds(pos) {
            !self.cells[self.index(pos)]
        } else {
            false
        }
    }

    /// Mark or unmark a cell. Out-of-bounds writes are no-ops.
    pub fn set(&mut self, pos: Vec2, occupied: bool) {
        if self.in_bounds(pos) {
            let i = self.index(pos);
            self.cells[i] = occupied;
        }
    }

    /// Empty every cell. Idempotent.
    pub fn clear(&mut self) {
        self.cells.fill(false);
    }

    /// Number of occupied cells. Grain moves relocate occupancy, so this
    /// stays constant across ticks.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }
}
