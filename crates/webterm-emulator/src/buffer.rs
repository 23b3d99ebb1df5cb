//! Row storage for one screen buffer plus its scrollback.
//!
//! A [`Buffer`] owns exactly `height` visible rows of exactly `width` cells.
//! Rows scrolled off the top of a region that starts at row 0 move into the
//! scrollback when the buffer keeps one (the primary buffer does, the
//! alternate buffer does not).

use std::collections::VecDeque;

use webterm_core::{Cell, Size};

/// One row of cells.
///
/// `index` is assigned from a per-buffer counter when the row is created and
/// never changes, so rows can be ordered even after scrolling reshuffles them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    index: u64,
    cells: Vec<Cell>,
    wrapped: bool,
}

impl Row {
    /// Create a row of `width` copies of `blank`.
    pub fn new(index: u64, width: u16, blank: Cell) -> Self {
        Self {
            index,
            cells: vec![blank; width as usize],
            wrapped: false,
        }
    }

    /// Monotonic creation index of this row.
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Cells of this row.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Mutable cells of this row.
    pub fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// Cell at `column`, if in range.
    pub fn cell(&self, column: u16) -> Option<&Cell> {
        self.cells.get(column as usize)
    }

    /// Mutable cell at `column`, if in range.
    pub fn cell_mut(&mut self, column: u16) -> Option<&mut Cell> {
        self.cells.get_mut(column as usize)
    }

    /// Number of cells.
    pub fn width(&self) -> u16 {
        self.cells.len() as u16
    }

    /// Whether text soft-wrapped from this row onto the next one.
    pub fn is_wrapped(&self) -> bool {
        self.wrapped
    }

    /// Mark whether text soft-wrapped from this row.
    pub fn set_wrapped(&mut self, wrapped: bool) {
        self.wrapped = wrapped;
    }

    /// Row text with trailing blanks trimmed.
    pub fn text(&self) -> String {
        let text: String = self.cells.iter().map(|c| c.character).collect();
        text.trim_end().to_string()
    }

    /// Replace every cell with `blank`.
    pub fn fill(&mut self, blank: Cell) {
        self.cells.fill(blank);
        self.wrapped = false;
    }

    /// Replace cells in `[start, end)` with `blank`; out-of-range parts are ignored.
    pub fn erase(&mut self, start: u16, end: u16, blank: Cell) {
        let len = self.cells.len();
        let start = (start as usize).min(len);
        let end = (end as usize).min(len);
        if start < end {
            self.cells[start..end].fill(blank);
        }
    }

    /// Insert `count` blanks at `column`, pushing cells off the right edge.
    pub fn insert(&mut self, column: u16, count: u16, blank: Cell) {
        let len = self.cells.len();
        let column = column as usize;
        if column >= len || count == 0 {
            return;
        }
        let count = (count as usize).min(len - column);
        self.cells[column..].rotate_right(count);
        self.cells[column..column + count].fill(blank);
    }

    /// Delete `count` cells at `column`, filling from the right with blanks.
    pub fn delete(&mut self, column: u16, count: u16, blank: Cell) {
        let len = self.cells.len();
        let column = column as usize;
        if column >= len || count == 0 {
            return;
        }
        let count = (count as usize).min(len - column);
        self.cells[column..].rotate_left(count);
        self.cells[len - count..].fill(blank);
    }

    /// Truncate or pad the row to `width` cells.
    pub fn resize(&mut self, width: u16, blank: Cell) {
        self.cells.resize(width as usize, blank);
    }
}

/// Visible rows plus scrollback for one screen buffer.
#[derive(Debug, Clone)]
pub struct Buffer {
    rows: Vec<Row>,
    scrollback: VecDeque<Row>,
    scrollback_limit: usize,
    width: u16,
    next_index: u64,
}

impl Buffer {
    /// Create a blank buffer.
    ///
    /// A `scrollback_limit` of 0 disables scrollback entirely.
    pub fn new(size: Size, scrollback_limit: usize) -> Self {
        let mut buffer = Self {
            rows: Vec::with_capacity(size.height as usize),
            scrollback: VecDeque::new(),
            scrollback_limit,
            width: size.width,
            next_index: 0,
        };
        for _ in 0..size.height {
            let row = buffer.blank_row(Cell::default());
            buffer.rows.push(row);
        }
        buffer
    }

    /// Visible size of the buffer.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.rows.len() as u16)
    }

    /// Visible rows, top to bottom.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Visible row `row`.
    pub fn row(&self, row: u16) -> Option<&Row> {
        self.rows.get(row as usize)
    }

    /// Mutable visible row `row`.
    pub fn row_mut(&mut self, row: u16) -> Option<&mut Row> {
        self.rows.get_mut(row as usize)
    }

    /// Cell at `(row, column)`.
    pub fn cell(&self, row: u16, column: u16) -> Option<&Cell> {
        self.row(row).and_then(|r| r.cell(column))
    }

    /// Mutable cell at `(row, column)`.
    pub fn cell_mut(&mut self, row: u16, column: u16) -> Option<&mut Cell> {
        self.row_mut(row).and_then(|r| r.cell_mut(column))
    }

    /// Rows that scrolled off the top, oldest first.
    pub fn scrollback(&self) -> impl Iterator<Item = &Row> {
        self.scrollback.iter()
    }

    /// Number of rows held in scrollback.
    pub fn scrollback_len(&self) -> usize {
        self.scrollback.len()
    }

    /// Whether this buffer keeps scrolled-off rows.
    pub fn keeps_scrollback(&self) -> bool {
        self.scrollback_limit > 0
    }

    /// Blank every visible row.
    pub fn clear(&mut self, blank: Cell) {
        for row in &mut self.rows {
            row.fill(blank);
        }
    }

    /// Drop all scrollback.
    pub fn clear_scrollback(&mut self) {
        self.scrollback.clear();
    }

    /// Fill every visible cell with `ch` using default attributes.
    pub fn fill(&mut self, ch: char) {
        self.clear(Cell::new(ch));
    }

    /// Scroll rows `[top, bottom]` up by `count`, blanking the vacated rows.
    ///
    /// When `top` is the first row, evicted rows are kept in scrollback.
    pub fn scroll_up(&mut self, top: u16, bottom: u16, count: u16, blank: Cell) {
        let evicted = self.shift_up(top, bottom, count, blank);
        if top == 0 && self.keeps_scrollback() {
            for row in evicted {
                self.push_scrollback(row);
            }
        }
    }

    /// Remove `count` rows at `top`, pulling up rows through `bottom`.
    ///
    /// Unlike [`Buffer::scroll_up`] the removed rows are always discarded.
    pub fn delete_rows(&mut self, top: u16, bottom: u16, count: u16, blank: Cell) {
        self.shift_up(top, bottom, count, blank);
    }

    /// Scroll rows `[top, bottom]` down by `count`, blanking the vacated rows.
    pub fn scroll_down(&mut self, top: u16, bottom: u16, count: u16, blank: Cell) {
        let Some((top, bottom, count)) = self.region(top, bottom, count) else {
            return;
        };

        self.rows.drain(bottom + 1 - count..=bottom);
        for offset in 0..count {
            let row = self.blank_row(blank);
            self.rows.insert(top + offset, row);
        }
    }

    /// Resize the buffer, keeping the row at `cursor_row` on screen.
    ///
    /// Returns the cursor row in the resized buffer. When the height shrinks
    /// past the cursor, rows above it are moved into scrollback (or dropped if
    /// the buffer keeps none); remaining surplus rows are cut from the bottom.
    pub fn resize(&mut self, size: Size, cursor_row: u16) -> u16 {
        let blank = Cell::default();
        if size.width != self.width {
            for row in &mut self.rows {
                row.resize(size.width, blank);
            }
            self.width = size.width;
        }

        let mut cursor_row = cursor_row.min(self.rows.len().saturating_sub(1) as u16);
        let height = size.height as usize;
        if self.rows.len() > height {
            let shift = (cursor_row as usize + 1).saturating_sub(height);
            for row in self.rows.drain(..shift).collect::<Vec<_>>() {
                if self.keeps_scrollback() {
                    self.push_scrollback(row);
                }
            }
            cursor_row -= shift as u16;
            self.rows.truncate(height);
        }
        while self.rows.len() < height {
            let row = self.blank_row(blank);
            self.rows.push(row);
        }
        cursor_row
    }

    fn shift_up(&mut self, top: u16, bottom: u16, count: u16, blank: Cell) -> Vec<Row> {
        let Some((top, bottom, count)) = self.region(top, bottom, count) else {
            return Vec::new();
        };

        let evicted: Vec<Row> = self.rows.drain(top..top + count).collect();
        let insert_at = bottom + 1 - count;
        for offset in 0..count {
            let row = self.blank_row(blank);
            self.rows.insert(insert_at + offset, row);
        }
        evicted
    }

    fn region(&self, top: u16, bottom: u16, count: u16) -> Option<(usize, usize, usize)> {
        let last = self.rows.len().checked_sub(1)?;
        let top = top as usize;
        let bottom = (bottom as usize).min(last);
        if top > bottom || count == 0 {
            return None;
        }
        let count = (count as usize).min(bottom - top + 1);
        Some((top, bottom, count))
    }

    fn blank_row(&mut self, blank: Cell) -> Row {
        let row = Row::new(self.next_index, self.width, blank);
        self.next_index += 1;
        row
    }

    fn push_scrollback(&mut self, row: Row) {
        self.scrollback.push_back(row);
        while self.scrollback.len() > self.scrollback_limit {
            self.scrollback.pop_front();
        }
    }
}
