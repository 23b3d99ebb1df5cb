//! Geometry types for terminal coordinates and regions.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::util::clamp;

/// Position in the terminal grid (row, column) plus the overflow flag.
///
/// `overflow` is raised when a move had to be clamped to fit the grid, and for
/// the screen cursor it doubles as the "pending wrap" marker after a character
/// was written into the last column. It is never cleared implicitly by
/// [`RowCol::clamp_move`]; callers check it and call
/// [`RowCol::clear_overflow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
pub struct RowCol {
    /// Row index (0-based)
    pub row: u16,
    /// Column index (0-based)
    pub column: u16,
    /// Set when the last move exceeded the bounds it was clamped to
    pub overflow: bool,
}

impl RowCol {
    /// Create a new position with a cleared overflow flag.
    pub fn new(row: u16, column: u16) -> Self {
        Self {
            row,
            column,
            overflow: false,
        }
    }

    /// Create a new position with an explicit overflow flag.
    pub fn with_overflow(row: u16, column: u16, overflow: bool) -> Self {
        Self {
            row,
            column,
            overflow,
        }
    }

    /// Origin position (0, 0).
    pub fn origin() -> Self {
        Self::new(0, 0)
    }

    /// Move to an absolute position, replacing the overflow flag.
    pub fn move_to(&mut self, row: u16, column: u16, overflow: bool) {
        self.row = row;
        self.column = column;
        self.overflow = overflow;
    }

    /// Move to `(row, column)` clamped into `bounds`.
    ///
    /// Returns `true` and raises the overflow flag when either coordinate had
    /// to be clamped. An in-range move leaves the flag as it was.
    pub fn clamp_move(&mut self, row: i32, column: i32, bounds: Size) -> bool {
        let max_row = i32::from(bounds.height.saturating_sub(1));
        let max_column = i32::from(bounds.width.saturating_sub(1));

        let clamped_row = clamp(row, 0, max_row);
        let clamped_column = clamp(column, 0, max_column);
        let clamped = clamped_row != row || clamped_column != column;

        self.row = clamped_row as u16;
        self.column = clamped_column as u16;
        if clamped {
            self.overflow = true;
        }
        clamped
    }

    /// Copy all fields from another position.
    pub fn set_to(&mut self, other: &RowCol) {
        *self = *other;
    }

    /// Reset the overflow flag.
    pub fn clear_overflow(&mut self) {
        self.overflow = false;
    }
}

/// Width and height of a terminal or region, in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Size {
    /// Number of columns
    pub width: u16,
    /// Number of rows
    pub height: u16,
}

impl Size {
    /// Create a new size.
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Change both dimensions in place.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
    }

    /// Copy both dimensions from another size.
    pub fn set_to(&mut self, other: &Size) {
        *self = *other;
    }

    /// Total cell count (width * height).
    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Whether either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Check if a position lies inside a grid of this size.
    pub fn contains(&self, pos: &RowCol) -> bool {
        pos.row < self.height && pos.column < self.width
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::new(80, 24)
    }
}

/// Bounding box for a terminal region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Bounds {
    /// Starting row
    pub row: u16,
    /// Starting column
    pub column: u16,
    /// Width in columns
    pub width: u16,
    /// Height in rows
    pub height: u16,
}

impl Bounds {
    /// Create new bounds.
    pub fn new(row: u16, column: u16, width: u16, height: u16) -> Self {
        Self {
            row,
            column,
            width,
            height,
        }
    }

    /// Bounds covering a whole grid of the given size.
    pub fn of(size: Size) -> Self {
        Self::new(0, 0, size.width, size.height)
    }

    /// Check if a position is contained within these bounds.
    pub fn contains(&self, pos: &RowCol) -> bool {
        pos.row >= self.row
            && (pos.row as u32) < self.row as u32 + self.height as u32
            && pos.column >= self.column
            && (pos.column as u32) < self.column as u32 + self.width as u32
    }
}
