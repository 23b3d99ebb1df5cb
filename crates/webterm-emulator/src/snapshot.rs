//! Serializable render surface.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use webterm_core::{Cell, RenderTheme, Result, RowCol, Size};

use crate::screen::{CursorStyle, Modes};

/// One visible row in a [`ScreenSnapshot`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SnapshotRow {
    /// Monotonic row index, stable across scrolling
    pub index: u64,
    /// Whether text soft-wrapped onto the next row
    pub wrapped: bool,
    /// Cells, exactly one per column
    pub cells: Vec<Cell>,
}

/// Everything a renderer needs to draw the screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScreenSnapshot {
    /// Screen size
    pub size: Size,
    /// Cursor position; `overflow` marks a pending wrap
    pub cursor: RowCol,
    /// Cursor visibility
    pub cursor_visible: bool,
    /// Cursor style
    pub cursor_style: CursorStyle,
    /// Window title
    pub title: String,
    /// Whether the alternate buffer is showing
    pub alternate_screen: bool,
    /// Active modes
    pub modes: Modes,
    /// Rows held in the primary scrollback
    pub scrollback_rows: usize,
    /// Row text with trailing blanks trimmed
    pub lines: Vec<String>,
    /// Full cell data
    pub rows: Vec<SnapshotRow>,
    /// Colors and font for default-styled cells
    pub theme: RenderTheme,
}

impl ScreenSnapshot {
    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Text of the visible rows joined by newlines.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}
