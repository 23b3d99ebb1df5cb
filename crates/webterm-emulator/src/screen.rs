//! Screen model: active buffer, cursor, scroll region, modes and tab stops.
//!
//! The interpreter drives a [`Screen`] through the operations below; renderers
//! read it back through [`Screen::visible_rows`], [`Screen::snapshot`] and
//! friends.
//!
//! The cursor's `overflow` flag doubles as the pending-wrap marker: writing
//! into the last column leaves the cursor in place with `overflow` set, and
//! only the next printable character wraps to the following line.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use webterm_core::{Bounds, Cell, RenderTheme, RowCol, Size, TextAttributes};

use crate::buffer::{Buffer, Row};
use crate::snapshot::{ScreenSnapshot, SnapshotRow};

/// Cursor visual style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CursorStyle {
    /// Block cursor (fills entire cell)
    #[default]
    Block,
    /// Underline cursor (bottom of cell)
    Underline,
    /// Bar cursor (vertical line at left)
    Bar,
}

/// Cursor state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
    /// Current position; `overflow` marks a pending wrap
    pub position: RowCol,
    /// Attributes stamped onto written cells
    pub attrs: TextAttributes,
    /// Visibility (DECTCEM)
    pub visible: bool,
    /// Cursor style (DECSCUSR)
    pub style: CursorStyle,
    /// Whether the cursor blinks
    pub blink: bool,
}

impl Default for Cursor {
    fn default() -> Self {
        Self {
            position: RowCol::origin(),
            attrs: TextAttributes::default(),
            visible: true,
            style: CursorStyle::Block,
            blink: true,
        }
    }
}

/// Character set that can be designated into G0..G3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Charset {
    /// US ASCII (`B`)
    #[default]
    Ascii,
    /// United Kingdom (`A`): `#` is the pound sign
    Uk,
    /// DEC special graphics (`0`): line drawing in `` ` ``..`~`
    DecSpecialGraphics,
}

impl Charset {
    /// Charset selected by the final byte of a designation sequence.
    pub fn from_final(ch: char) -> Option<Self> {
        match ch {
            'B' => Some(Charset::Ascii),
            'A' => Some(Charset::Uk),
            '0' => Some(Charset::DecSpecialGraphics),
            _ => None,
        }
    }

    fn translate(self, ch: char) -> char {
        match self {
            Charset::Ascii => ch,
            Charset::Uk => {
                if ch == '#' {
                    '£'
                } else {
                    ch
                }
            }
            Charset::DecSpecialGraphics => match ch {
                '`' => '◆',
                'a' => '▒',
                'b' => '␉',
                'c' => '␌',
                'd' => '␍',
                'e' => '␊',
                'f' => '°',
                'g' => '±',
                'h' => '␤',
                'i' => '␋',
                'j' => '┘',
                'k' => '┐',
                'l' => '┌',
                'm' => '└',
                'n' => '┼',
                'o' => '⎺',
                'p' => '⎻',
                'q' => '─',
                'r' => '⎼',
                's' => '⎽',
                't' => '├',
                'u' => '┤',
                'v' => '┴',
                'w' => '┬',
                'x' => '│',
                'y' => '≤',
                'z' => '≥',
                '{' => 'π',
                '|' => '≠',
                '}' => '£',
                '~' => '·',
                _ => ch,
            },
        }
    }
}

/// G0..G3 designations plus the SO/SI shift state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Charsets {
    slots: [Charset; 4],
    shifted: bool,
}

impl Charsets {
    fn translate(&self, ch: char) -> char {
        let active = if self.shifted { self.slots[1] } else { self.slots[0] };
        active.translate(ch)
    }
}

/// Terminal modes toggled by SM/RM and DECSET/DECRST.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Modes {
    /// DECAWM: wrap at the right margin
    pub wraparound: bool,
    /// IRM: insert instead of replace
    pub insert: bool,
    /// DECOM: cursor addressing relative to the scroll region
    pub origin: bool,
    /// LNM: line feed also returns the carriage
    pub linefeed_newline: bool,
    /// DECCKM: application cursor keys
    pub application_cursor: bool,
    /// DECKPAM/DECKPNM: application keypad
    pub application_keypad: bool,
}

impl Default for Modes {
    fn default() -> Self {
        Self {
            wraparound: true,
            insert: false,
            origin: false,
            linefeed_newline: false,
            application_cursor: false,
            application_keypad: false,
        }
    }
}

/// State saved by DECSC and restored by DECRC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SavedCursor {
    position: RowCol,
    attrs: TextAttributes,
    origin: bool,
    charsets: Charsets,
}

/// The screen: primary and alternate buffers, cursor and mode state.
#[derive(Debug, Clone)]
pub struct Screen {
    size: Size,
    primary: Buffer,
    alternate: Buffer,
    alternate_active: bool,
    cursor: Cursor,
    /// Saved cursors for the primary and alternate buffers
    saved: [Option<SavedCursor>; 2],
    /// Scroll region (top, bottom) - 0-indexed, inclusive
    scroll_region: (u16, u16),
    modes: Modes,
    tab_stops: Vec<bool>,
    charsets: Charsets,
    title: String,
    scrollback_limit: usize,
}

fn default_tab_stops(width: u16) -> Vec<bool> {
    (0..width).map(|col| col != 0 && col % 8 == 0).collect()
}

impl Screen {
    /// Create a blank screen.
    ///
    /// `scrollback_limit` applies to the primary buffer only; the alternate
    /// buffer never keeps scrollback.
    pub fn new(size: Size, scrollback_limit: usize) -> Self {
        Self {
            size,
            primary: Buffer::new(size, scrollback_limit),
            alternate: Buffer::new(size, 0),
            alternate_active: false,
            cursor: Cursor::default(),
            saved: [None, None],
            scroll_region: (0, size.height.saturating_sub(1)),
            modes: Modes::default(),
            tab_stops: default_tab_stops(size.width),
            charsets: Charsets::default(),
            title: String::new(),
            scrollback_limit,
        }
    }

    /// Screen size.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Get cursor reference.
    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    /// Current cursor position.
    pub fn cursor_position(&self) -> RowCol {
        self.cursor.position
    }

    /// Check if cursor is visible.
    pub fn cursor_visible(&self) -> bool {
        self.cursor.visible
    }

    /// Show or hide the cursor.
    pub fn set_cursor_visible(&mut self, visible: bool) {
        self.cursor.visible = visible;
    }

    /// Set the cursor style and blink state.
    pub fn set_cursor_style(&mut self, style: CursorStyle, blink: bool) {
        self.cursor.style = style;
        self.cursor.blink = blink;
    }

    /// Attributes applied to newly written cells.
    pub fn attrs(&self) -> &TextAttributes {
        &self.cursor.attrs
    }

    /// Mutable attributes applied to newly written cells.
    pub fn attrs_mut(&mut self) -> &mut TextAttributes {
        &mut self.cursor.attrs
    }

    /// Current modes.
    pub fn modes(&self) -> &Modes {
        &self.modes
    }

    /// Mutable modes.
    pub fn modes_mut(&mut self) -> &mut Modes {
        &mut self.modes
    }

    /// Window title set through OSC 0/2.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Replace the window title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Scroll region as (top, bottom), inclusive.
    pub fn scroll_region(&self) -> (u16, u16) {
        self.scroll_region
    }

    /// Whether the alternate buffer is active.
    pub fn is_alternate(&self) -> bool {
        self.alternate_active
    }

    /// The active buffer.
    pub fn buffer(&self) -> &Buffer {
        if self.alternate_active {
            &self.alternate
        } else {
            &self.primary
        }
    }

    fn buffer_mut(&mut self) -> &mut Buffer {
        if self.alternate_active {
            &mut self.alternate
        } else {
            &mut self.primary
        }
    }

    /// The primary buffer, whether or not it is active.
    pub fn primary(&self) -> &Buffer {
        &self.primary
    }

    /// Visible rows of the active buffer.
    pub fn visible_rows(&self) -> &[Row] {
        self.buffer().rows()
    }

    /// Get cell at position in the active buffer.
    pub fn cell(&self, row: u16, column: u16) -> Option<&Cell> {
        self.buffer().cell(row, column)
    }

    fn blank(&self) -> Cell {
        Cell::blank(self.cursor.attrs.erase_attrs())
    }

    // ------------------------------------------------------------------
    // Printing
    // ------------------------------------------------------------------

    /// Print a run of printable characters at the cursor.
    pub fn print(&mut self, text: &str) {
        for ch in text.chars() {
            self.print_char(ch);
        }
    }

    /// Print one character at the cursor.
    pub fn print_char(&mut self, ch: char) {
        let ch = self.charsets.translate(ch);

        if self.cursor.position.overflow {
            self.cursor.position.clear_overflow();
            if self.modes.wraparound {
                let row = self.cursor.position.row;
                if let Some(row) = self.buffer_mut().row_mut(row) {
                    row.set_wrapped(true);
                }
                self.cursor.position.column = 0;
                self.index();
            }
        }

        let RowCol { row, column, .. } = self.cursor.position;
        let attrs = self.cursor.attrs;
        let blank = self.blank();
        let insert = self.modes.insert;
        if let Some(line) = self.buffer_mut().row_mut(row) {
            if insert {
                line.insert(column, 1, blank);
            }
            if let Some(cell) = line.cell_mut(column) {
                *cell = Cell::styled(ch, attrs);
            }
        }

        if column + 1 >= self.size.width {
            self.cursor.position.overflow = true;
        } else {
            self.cursor.position.column = column + 1;
        }
    }

    // ------------------------------------------------------------------
    // Line movement
    // ------------------------------------------------------------------

    /// Move down one row, scrolling the region at its bottom margin (IND).
    pub fn index(&mut self) {
        let (_, bottom) = self.scroll_region;
        let row = self.cursor.position.row;
        if row == bottom {
            self.scroll_up(1);
        } else if row + 1 < self.size.height {
            self.cursor.position.row = row + 1;
        }
        self.cursor.position.clear_overflow();
    }

    /// Move up one row, scrolling the region at its top margin (RI).
    pub fn reverse_index(&mut self) {
        let (top, _) = self.scroll_region;
        let row = self.cursor.position.row;
        if row == top {
            self.scroll_down(1);
        } else if row > 0 {
            self.cursor.position.row = row - 1;
        }
        self.cursor.position.clear_overflow();
    }

    /// Line feed: index, plus carriage return when LNM is set.
    pub fn line_feed(&mut self) {
        self.index();
        if self.modes.linefeed_newline {
            self.carriage_return();
        }
    }

    /// Carriage return plus index (NEL).
    pub fn next_line(&mut self) {
        self.carriage_return();
        self.index();
    }

    /// Move to column 0.
    pub fn carriage_return(&mut self) {
        self.cursor.position.column = 0;
        self.cursor.position.clear_overflow();
    }

    /// Move one column left, stopping at column 0.
    pub fn backspace(&mut self) {
        self.cursor_backward(1);
    }

    // ------------------------------------------------------------------
    // Cursor movement
    // ------------------------------------------------------------------

    /// Clamp an explicit move into the screen and drop any pending wrap.
    fn move_cursor(&mut self, row: i32, column: i32) {
        let size = self.size;
        self.cursor.position.clamp_move(row, column, size);
        if self.cursor.position.overflow {
            trace!(row, column, "cursor move clamped");
            self.cursor.position.clear_overflow();
        }
    }

    /// Move up `count` rows, stopping at the top margin when inside the region (CUU).
    pub fn cursor_up(&mut self, count: u16) {
        let RowCol { row, column, .. } = self.cursor.position;
        let (top, _) = self.scroll_region;
        let limit = if row >= top { top } else { 0 };
        let target = (i32::from(row) - i32::from(count)).max(i32::from(limit));
        self.move_cursor(target, i32::from(column));
    }

    /// Move down `count` rows, stopping at the bottom margin when inside the region (CUD).
    pub fn cursor_down(&mut self, count: u16) {
        let RowCol { row, column, .. } = self.cursor.position;
        let (_, bottom) = self.scroll_region;
        let limit = if row <= bottom {
            bottom
        } else {
            self.size.height.saturating_sub(1)
        };
        let target = (i32::from(row) + i32::from(count)).min(i32::from(limit));
        self.move_cursor(target, i32::from(column));
    }

    /// Move right `count` columns (CUF).
    pub fn cursor_forward(&mut self, count: u16) {
        let RowCol { row, column, .. } = self.cursor.position;
        self.move_cursor(i32::from(row), i32::from(column) + i32::from(count));
    }

    /// Move left `count` columns (CUB).
    pub fn cursor_backward(&mut self, count: u16) {
        let RowCol { row, column, .. } = self.cursor.position;
        self.move_cursor(i32::from(row), i32::from(column) - i32::from(count));
    }

    /// Move to `(row, column)`, relative to the scroll region in origin mode (CUP).
    pub fn set_cursor_position(&mut self, row: u16, column: u16) {
        let row = self.absolute_row(row);
        self.move_cursor(row, i32::from(column));
    }

    /// Move to `column` on the current row (CHA/HPA).
    pub fn set_cursor_column(&mut self, column: u16) {
        let row = self.cursor.position.row;
        self.move_cursor(i32::from(row), i32::from(column));
    }

    /// Move to `row` in the current column (VPA), honoring origin mode.
    pub fn set_cursor_row(&mut self, row: u16) {
        let column = self.cursor.position.column;
        let row = self.absolute_row(row);
        self.move_cursor(row, i32::from(column));
    }

    fn absolute_row(&self, row: u16) -> i32 {
        if self.modes.origin {
            let (top, bottom) = self.scroll_region;
            (i32::from(top) + i32::from(row)).min(i32::from(bottom))
        } else {
            i32::from(row)
        }
    }

    // ------------------------------------------------------------------
    // Tab stops
    // ------------------------------------------------------------------

    /// Advance to the `count`th next tab stop, or the last column (HT/CHT).
    pub fn forward_tab(&mut self, count: u16) {
        let last = self.size.width.saturating_sub(1);
        let mut column = self.cursor.position.column;
        for _ in 0..count {
            column = (column + 1..self.size.width)
                .find(|&c| self.tab_stops.get(c as usize).copied().unwrap_or(false))
                .unwrap_or(last);
            if column == last {
                break;
            }
        }
        self.cursor.position.column = column;
        self.cursor.position.clear_overflow();
    }

    /// Move back to the `count`th previous tab stop, or column 0 (CBT).
    pub fn back_tab(&mut self, count: u16) {
        let mut column = self.cursor.position.column;
        for _ in 0..count {
            column = (0..column)
                .rev()
                .find(|&c| self.tab_stops.get(c as usize).copied().unwrap_or(false))
                .unwrap_or(0);
            if column == 0 {
                break;
            }
        }
        self.cursor.position.column = column;
        self.cursor.position.clear_overflow();
    }

    /// Set a tab stop at the cursor column (HTS).
    pub fn set_tab_stop(&mut self) {
        let column = self.cursor.position.column as usize;
        if let Some(stop) = self.tab_stops.get_mut(column) {
            *stop = true;
        }
    }

    /// Clear the tab stop at the cursor column (TBC 0).
    pub fn clear_tab_stop(&mut self) {
        let column = self.cursor.position.column as usize;
        if let Some(stop) = self.tab_stops.get_mut(column) {
            *stop = false;
        }
    }

    /// Clear every tab stop (TBC 3).
    pub fn clear_all_tab_stops(&mut self) {
        self.tab_stops.fill(false);
    }

    // ------------------------------------------------------------------
    // Erasing and editing
    // ------------------------------------------------------------------

    /// Erase in display (ED): 0 below, 1 above, 2 all, 3 scrollback.
    pub fn erase_display(&mut self, mode: u32) {
        let RowCol { row, column, .. } = self.cursor.position;
        let width = self.size.width;
        let height = self.size.height;
        let blank = self.blank();
        let buffer = self.buffer_mut();
        match mode {
            0 => {
                if let Some(line) = buffer.row_mut(row) {
                    line.erase(column, width, blank);
                }
                for r in row + 1..height {
                    if let Some(line) = buffer.row_mut(r) {
                        line.fill(blank);
                    }
                }
            }
            1 => {
                for r in 0..row {
                    if let Some(line) = buffer.row_mut(r) {
                        line.fill(blank);
                    }
                }
                if let Some(line) = buffer.row_mut(row) {
                    line.erase(0, column + 1, blank);
                }
            }
            2 => buffer.clear(blank),
            3 => buffer.clear_scrollback(),
            _ => debug!(mode, "unknown erase display mode"),
        }
    }

    /// Erase in line (EL): 0 right of cursor, 1 left of cursor, 2 whole line.
    pub fn erase_line(&mut self, mode: u32) {
        let RowCol { row, column, .. } = self.cursor.position;
        let width = self.size.width;
        let blank = self.blank();
        let Some(line) = self.buffer_mut().row_mut(row) else {
            return;
        };
        match mode {
            0 => line.erase(column, width, blank),
            1 => line.erase(0, column + 1, blank),
            2 => line.fill(blank),
            _ => debug!(mode, "unknown erase line mode"),
        }
    }

    /// Blank `count` cells starting at the cursor (ECH).
    pub fn erase_chars(&mut self, count: u16) {
        let RowCol { row, column, .. } = self.cursor.position;
        let blank = self.blank();
        if let Some(line) = self.buffer_mut().row_mut(row) {
            line.erase(column, column.saturating_add(count), blank);
        }
    }

    /// Insert `count` blank cells at the cursor (ICH).
    pub fn insert_chars(&mut self, count: u16) {
        let RowCol { row, column, .. } = self.cursor.position;
        let blank = self.blank();
        if let Some(line) = self.buffer_mut().row_mut(row) {
            line.insert(column, count, blank);
        }
        self.cursor.position.clear_overflow();
    }

    /// Delete `count` cells at the cursor (DCH).
    pub fn delete_chars(&mut self, count: u16) {
        let RowCol { row, column, .. } = self.cursor.position;
        let blank = self.blank();
        if let Some(line) = self.buffer_mut().row_mut(row) {
            line.delete(column, count, blank);
        }
        self.cursor.position.clear_overflow();
    }

    /// Insert `count` blank lines at the cursor row inside the region (IL).
    pub fn insert_lines(&mut self, count: u16) {
        let row = self.cursor.position.row;
        let (top, bottom) = self.scroll_region;
        if row < top || row > bottom {
            return;
        }
        let blank = self.blank();
        self.buffer_mut().scroll_down(row, bottom, count, blank);
        self.carriage_return();
    }

    /// Delete `count` lines at the cursor row inside the region (DL).
    pub fn delete_lines(&mut self, count: u16) {
        let row = self.cursor.position.row;
        let (top, bottom) = self.scroll_region;
        if row < top || row > bottom {
            return;
        }
        let blank = self.blank();
        self.buffer_mut().delete_rows(row, bottom, count, blank);
        self.carriage_return();
    }

    /// Scroll the region up by `count` lines (SU).
    pub fn scroll_up(&mut self, count: u16) {
        let (top, bottom) = self.scroll_region;
        let blank = self.blank();
        self.buffer_mut().scroll_up(top, bottom, count, blank);
    }

    /// Scroll the region down by `count` lines (SD).
    pub fn scroll_down(&mut self, count: u16) {
        let (top, bottom) = self.scroll_region;
        let blank = self.blank();
        self.buffer_mut().scroll_down(top, bottom, count, blank);
    }

    /// Set the scroll region (DECSTBM), 0-indexed and inclusive.
    ///
    /// Invalid regions are ignored. The cursor moves home either way.
    pub fn set_scroll_region(&mut self, top: u16, bottom: u16) {
        if top < bottom && bottom < self.size.height {
            self.scroll_region = (top, bottom);
        } else {
            debug!(top, bottom, "ignoring invalid scroll region");
        }
        self.set_cursor_position(0, 0);
    }

    /// Reset the scroll region to the whole screen.
    pub fn reset_scroll_region(&mut self) {
        self.scroll_region = (0, self.size.height.saturating_sub(1));
    }

    /// Fill the screen with `E` (DECALN).
    pub fn screen_alignment(&mut self) {
        self.buffer_mut().fill('E');
        self.reset_scroll_region();
        self.modes.origin = false;
        self.set_cursor_position(0, 0);
    }

    // ------------------------------------------------------------------
    // Save/restore, buffers and charsets
    // ------------------------------------------------------------------

    fn saved_slot(&self) -> usize {
        usize::from(self.alternate_active)
    }

    /// Save cursor position, attributes, origin mode and charsets (DECSC).
    pub fn save_cursor(&mut self) {
        let slot = self.saved_slot();
        self.saved[slot] = Some(SavedCursor {
            position: self.cursor.position,
            attrs: self.cursor.attrs,
            origin: self.modes.origin,
            charsets: self.charsets,
        });
    }

    /// Restore the state saved by [`Screen::save_cursor`] (DECRC).
    ///
    /// Without a saved state the cursor goes home with default attributes.
    pub fn restore_cursor(&mut self) {
        let saved = self.saved[self.saved_slot()].unwrap_or(SavedCursor {
            position: RowCol::origin(),
            attrs: TextAttributes::default(),
            origin: false,
            charsets: Charsets::default(),
        });
        self.cursor.attrs = saved.attrs;
        self.modes.origin = saved.origin;
        self.charsets = saved.charsets;
        let RowCol {
            mut row,
            column,
            overflow,
        } = saved.position;
        if saved.origin {
            // The region may have moved since the save.
            let (top, bottom) = self.scroll_region;
            row = row.clamp(top, bottom);
        }
        self.move_cursor(i32::from(row), i32::from(column));
        self.cursor.position.overflow = overflow;
    }

    /// Switch to the alternate buffer, clearing it first.
    ///
    /// Returns `false` if it was already active.
    pub fn enter_alternate_screen(&mut self) -> bool {
        if self.alternate_active {
            return false;
        }
        let blank = self.blank();
        self.alternate.clear(blank);
        self.alternate_active = true;
        info!("switched to alternate screen");
        true
    }

    /// Switch back to the primary buffer, leaving its content untouched.
    ///
    /// Returns `false` if it was already active.
    pub fn leave_alternate_screen(&mut self) -> bool {
        if !self.alternate_active {
            return false;
        }
        self.alternate_active = false;
        info!("switched to primary screen");
        true
    }

    /// Designate `charset` into slot G0..G3.
    pub fn designate_charset(&mut self, slot: usize, charset: Charset) {
        if let Some(target) = self.charsets.slots.get_mut(slot) {
            *target = charset;
        }
    }

    /// Shift Out: use G1.
    pub fn shift_out(&mut self) {
        self.charsets.shifted = true;
    }

    /// Shift In: use G0.
    pub fn shift_in(&mut self) {
        self.charsets.shifted = false;
    }

    // ------------------------------------------------------------------
    // Resize and reset
    // ------------------------------------------------------------------

    /// Resize both buffers, preserving content where possible.
    ///
    /// Content is kept from the top-left corner, except that the cursor row
    /// stays visible when the height shrinks. The scroll region resets.
    pub fn resize(&mut self, size: Size) {
        if size == self.size || size.is_empty() {
            return;
        }
        let row = self.cursor.position.row;
        let row = if self.alternate_active {
            // The primary keeps the row its cursor was saved on.
            let saved_row = self.saved[0].map_or(0, |saved| saved.position.row);
            let primary_row = self.primary.resize(size, saved_row);
            if let Some(saved) = self.saved[0].as_mut() {
                saved.position.row = primary_row;
            }
            self.alternate.resize(size, row)
        } else {
            self.alternate.resize(size, row);
            self.primary.resize(size, row)
        };

        info!(
            columns = size.width,
            rows = size.height,
            "screen resized"
        );
        self.size = size;
        self.tab_stops = default_tab_stops(size.width);
        self.reset_scroll_region();
        let column = self.cursor.position.column;
        self.move_cursor(i32::from(row), i32::from(column));
    }

    /// Full reset (RIS): blank buffers, default modes and cursor, no title.
    pub fn full_reset(&mut self) {
        *self = Screen::new(self.size, self.scrollback_limit);
    }

    /// Soft reset (DECSTR): modes, attributes, region, charsets and saved
    /// cursors go back to defaults; content and position stay.
    pub fn soft_reset(&mut self) {
        self.modes = Modes::default();
        self.cursor.attrs = TextAttributes::default();
        self.cursor.visible = true;
        self.charsets = Charsets::default();
        self.saved = [None, None];
        self.reset_scroll_region();
    }

    // ------------------------------------------------------------------
    // Render surface
    // ------------------------------------------------------------------

    /// Extract text from a specific region.
    ///
    /// Trailing whitespace is trimmed from each line.
    pub fn extract_text(&self, bounds: &Bounds) -> String {
        let buffer = self.buffer();
        let mut lines = Vec::with_capacity(bounds.height as usize);
        for row in bounds.row..bounds.row.saturating_add(bounds.height) {
            let Some(line) = buffer.row(row) else {
                break;
            };
            let text: String = line
                .cells()
                .iter()
                .skip(bounds.column as usize)
                .take(bounds.width as usize)
                .map(|c| c.character)
                .collect();
            lines.push(text.trim_end().to_string());
        }
        lines.join("\n")
    }

    /// Convert the visible screen to plain text.
    pub fn to_plain_text(&self) -> String {
        self.extract_text(&Bounds::of(self.size))
    }

    /// Serializable copy of everything a renderer needs.
    pub fn snapshot(&self) -> ScreenSnapshot {
        let rows: Vec<SnapshotRow> = self
            .visible_rows()
            .iter()
            .map(|row| SnapshotRow {
                index: row.index(),
                wrapped: row.is_wrapped(),
                cells: row.cells().to_vec(),
            })
            .collect();

        ScreenSnapshot {
            size: self.size,
            cursor: self.cursor.position,
            cursor_visible: self.cursor.visible,
            cursor_style: self.cursor.style,
            title: self.title.clone(),
            alternate_screen: self.alternate_active,
            modes: self.modes,
            scrollback_rows: self.primary.scrollback_len(),
            lines: self.visible_rows().iter().map(Row::text).collect(),
            rows,
            theme: RenderTheme::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use webterm_core::Color;

    fn screen(width: u16, height: u16) -> Screen {
        Screen::new(Size::new(width, height), 100)
    }

    fn line(screen: &Screen, row: u16) -> String {
        screen.buffer().row(row).map(Row::text).unwrap_or_default()
    }

    #[test]
    fn test_screen_new() {
        let screen = screen(80, 24);
        assert_eq!(screen.size(), Size::new(80, 24));
        assert_eq!(screen.cursor_position(), RowCol::origin());
        assert!(screen.cursor_visible());
        assert_eq!(screen.scroll_region(), (0, 23));
        assert!(!screen.is_alternate());
    }

    #[test]
    fn test_print_stamps_attributes() {
        let mut screen = screen(10, 3);
        screen.attrs_mut().foreground = Color::Red;
        screen.print("Hi");
        let cell = screen.cell(0, 0).unwrap();
        assert_eq!(cell.character, 'H');
        assert_eq!(cell.attrs.foreground, Color::Red);
        assert_eq!(screen.cursor_position(), RowCol::new(0, 2));
    }

    #[test]
    fn test_print_last_column_sets_pending_wrap() {
        let mut screen = screen(5, 3);
        screen.print("abcde");
        assert_eq!(screen.cursor_position(), RowCol::with_overflow(0, 4, true));
        assert_eq!(line(&screen, 1), "");

        screen.print("f");
        assert_eq!(line(&screen, 0), "abcde");
        assert_eq!(line(&screen, 1), "f");
        assert_eq!(screen.cursor_position(), RowCol::new(1, 1));
        assert!(screen.buffer().row(0).unwrap().is_wrapped());
    }

    #[test]
    fn test_print_without_wraparound_overwrites_last_column() {
        let mut screen = screen(5, 3);
        screen.modes_mut().wraparound = false;
        screen.print("abcdefg");
        assert_eq!(line(&screen, 0), "abcdg");
        assert_eq!(screen.cursor_position().row, 0);
    }

    #[test]
    fn test_carriage_return_clears_pending_wrap() {
        let mut screen = screen(3, 2);
        screen.print("abc");
        screen.carriage_return();
        screen.print("x");
        assert_eq!(line(&screen, 0), "xbc");
        assert_eq!(line(&screen, 1), "");
    }

    #[test]
    fn test_wrap_at_bottom_scrolls_into_scrollback() {
        let mut screen = screen(3, 2);
        screen.print("abcdefg");
        assert_eq!(line(&screen, 0), "def");
        assert_eq!(line(&screen, 1), "g");
        assert_eq!(screen.primary().scrollback_len(), 1);
    }

    #[test]
    fn test_insert_mode_shifts_right() {
        let mut screen = screen(6, 1);
        screen.print("abc");
        screen.set_cursor_column(0);
        screen.modes_mut().insert = true;
        screen.print("X");
        assert_eq!(line(&screen, 0), "Xabc");
    }

    #[test]
    fn test_line_feed_and_lnm() {
        let mut screen = screen(10, 5);
        screen.print("ab");
        screen.line_feed();
        assert_eq!(screen.cursor_position(), RowCol::new(1, 2));
        screen.modes_mut().linefeed_newline = true;
        screen.line_feed();
        assert_eq!(screen.cursor_position(), RowCol::new(2, 0));
    }

    #[test]
    fn test_explicit_move_clamps_and_clears_overflow() {
        let mut screen = screen(10, 5);
        screen.set_cursor_position(50, 50);
        assert_eq!(screen.cursor_position(), RowCol::new(4, 9));
        screen.cursor_up(100);
        assert_eq!(screen.cursor_position(), RowCol::new(0, 9));
        screen.cursor_backward(3);
        assert_eq!(screen.cursor_position(), RowCol::new(0, 6));
        screen.cursor_forward(30);
        assert_eq!(screen.cursor_position(), RowCol::new(0, 9));
        screen.cursor_down(2);
        assert_eq!(screen.cursor_position(), RowCol::new(2, 9));
    }

    #[test]
    fn test_cursor_up_stops_at_region_top() {
        let mut screen = screen(10, 10);
        screen.set_scroll_region(3, 7);
        screen.set_cursor_position(5, 0);
        screen.cursor_up(10);
        assert_eq!(screen.cursor_position().row, 3);
        screen.cursor_down(10);
        assert_eq!(screen.cursor_position().row, 7);
    }

    #[test]
    fn test_origin_mode_addressing() {
        let mut screen = screen(10, 10);
        screen.set_scroll_region(2, 5);
        screen.modes_mut().origin = true;
        screen.set_cursor_position(0, 0);
        assert_eq!(screen.cursor_position().row, 2);
        screen.set_cursor_position(9, 0);
        assert_eq!(screen.cursor_position().row, 5);
    }

    #[test]
    fn test_index_scrolls_region_only() {
        let mut screen = screen(5, 5);
        for (row, text) in ["a", "b", "c", "d", "e"].iter().enumerate() {
            screen.set_cursor_position(row as u16, 0);
            screen.print(text);
        }
        screen.set_scroll_region(1, 3);
        screen.set_cursor_position(3, 0);
        screen.index();
        let lines: Vec<String> = (0..5).map(|r| line(&screen, r)).collect();
        assert_eq!(lines, vec!["a", "c", "d", "", "e"]);
        assert_eq!(screen.primary().scrollback_len(), 0);

        screen.set_cursor_position(1, 0);
        screen.reverse_index();
        let lines: Vec<String> = (0..5).map(|r| line(&screen, r)).collect();
        assert_eq!(lines, vec!["a", "", "c", "d", "e"]);
    }

    #[test]
    fn test_insert_delete_lines() {
        let mut screen = screen(5, 4);
        for (row, text) in ["a", "b", "c", "d"].iter().enumerate() {
            screen.set_cursor_position(row as u16, 0);
            screen.print(text);
        }
        screen.set_cursor_position(1, 3);
        screen.insert_lines(1);
        let lines: Vec<String> = (0..4).map(|r| line(&screen, r)).collect();
        assert_eq!(lines, vec!["a", "", "b", "c"]);
        assert_eq!(screen.cursor_position().column, 0);

        screen.delete_lines(2);
        let lines: Vec<String> = (0..4).map(|r| line(&screen, r)).collect();
        assert_eq!(lines, vec!["a", "c", "", ""]);
    }

    #[test]
    fn test_erase_display_and_line() {
        let mut screen = screen(5, 3);
        screen.print("aaaaabbbbbccccc");
        screen.set_cursor_position(1, 2);
        screen.erase_line(0);
        assert_eq!(line(&screen, 1), "bb");
        screen.erase_line(1);
        assert_eq!(line(&screen, 1), "");
        screen.erase_display(1);
        assert_eq!(line(&screen, 0), "");
        assert_eq!(line(&screen, 2), "ccccc");
        screen.erase_display(2);
        assert_eq!(screen.to_plain_text(), "\n\n");
    }

    #[test]
    fn test_erase_keeps_background() {
        let mut screen = screen(5, 1);
        screen.attrs_mut().background = Color::Blue;
        screen.attrs_mut().bold = true;
        screen.erase_line(2);
        let cell = screen.cell(0, 0).unwrap();
        assert_eq!(cell.attrs.background, Color::Blue);
        assert!(!cell.attrs.bold);
    }

    #[test]
    fn test_erase_insert_delete_chars() {
        let mut screen = screen(6, 1);
        screen.print("abcdef");
        screen.set_cursor_column(1);
        screen.erase_chars(2);
        assert_eq!(line(&screen, 0), "a  def");
        screen.delete_chars(2);
        assert_eq!(line(&screen, 0), "adef");
        screen.insert_chars(1);
        assert_eq!(line(&screen, 0), "a def");
    }

    #[test]
    fn test_tab_stops() {
        let mut screen = screen(20, 1);
        screen.forward_tab(1);
        assert_eq!(screen.cursor_position().column, 8);
        screen.forward_tab(5);
        assert_eq!(screen.cursor_position().column, 19);
        screen.back_tab(1);
        assert_eq!(screen.cursor_position().column, 16);

        screen.set_cursor_column(3);
        screen.set_tab_stop();
        screen.set_cursor_column(0);
        screen.forward_tab(1);
        assert_eq!(screen.cursor_position().column, 3);

        screen.clear_all_tab_stops();
        screen.forward_tab(1);
        assert_eq!(screen.cursor_position().column, 19);
    }

    #[test]
    fn test_save_restore_cursor() {
        let mut screen = screen(10, 5);
        screen.set_cursor_position(2, 3);
        screen.attrs_mut().bold = true;
        screen.save_cursor();

        screen.set_cursor_position(4, 4);
        screen.attrs_mut().bold = false;
        screen.restore_cursor();
        assert_eq!(screen.cursor_position(), RowCol::new(2, 3));
        assert!(screen.attrs().bold);

        // Restoring again yields the same state.
        screen.set_cursor_position(0, 0);
        screen.restore_cursor();
        assert_eq!(screen.cursor_position(), RowCol::new(2, 3));
    }

    #[test]
    fn test_restore_in_origin_mode_stays_in_region() {
        let mut screen = screen(20, 12);
        screen.set_scroll_region(4, 9);
        screen.modes_mut().origin = true;
        screen.set_cursor_position(0, 0);
        screen.save_cursor();

        screen.modes_mut().origin = false;
        screen.set_scroll_region(7, 11);
        screen.restore_cursor();
        assert!(screen.modes().origin);
        assert_eq!(screen.cursor_position().row, 7);
    }

    #[test]
    fn test_alternate_screen_round_trip() {
        let mut screen = screen(10, 3);
        screen.print("primary");
        assert!(screen.enter_alternate_screen());
        assert!(!screen.enter_alternate_screen());
        assert_eq!(line(&screen, 0), "");
        screen.set_cursor_position(0, 0);
        screen.print("alt");
        assert_eq!(line(&screen, 0), "alt");

        assert!(screen.leave_alternate_screen());
        assert_eq!(line(&screen, 0), "primary");

        // The alternate buffer is cleared on every entry.
        screen.enter_alternate_screen();
        assert_eq!(line(&screen, 0), "");
    }

    #[test]
    fn test_alternate_screen_has_no_scrollback() {
        let mut screen = screen(3, 2);
        screen.enter_alternate_screen();
        screen.print("abcdefghi");
        assert_eq!(screen.buffer().scrollback_len(), 0);
        assert_eq!(screen.primary().scrollback_len(), 0);
    }

    #[test]
    fn test_dec_special_graphics() {
        let mut screen = screen(10, 1);
        screen.designate_charset(0, Charset::DecSpecialGraphics);
        screen.print("lqk");
        assert_eq!(line(&screen, 0), "┌─┐");

        screen.designate_charset(1, Charset::Uk);
        screen.shift_out();
        screen.print("#");
        screen.shift_in();
        screen.print("q");
        assert_eq!(line(&screen, 0), "┌─┐£─");
    }

    #[test]
    fn test_resize_keeps_cursor_line() {
        let mut screen = screen(10, 5);
        screen.set_cursor_position(4, 0);
        screen.print("last");
        screen.resize(Size::new(8, 2));
        assert_eq!(screen.size(), Size::new(8, 2));
        assert_eq!(screen.cursor_position(), RowCol::new(1, 4));
        assert_eq!(line(&screen, 1), "last");
        assert_eq!(screen.scroll_region(), (0, 1));
        assert_eq!(screen.primary().scrollback_len(), 3);
    }

    #[test]
    fn test_resize_in_alternate_uses_primary_saved_row() {
        let mut screen = screen(10, 5);
        screen.print("top");
        screen.set_cursor_position(1, 0);
        screen.save_cursor();
        screen.enter_alternate_screen();
        screen.set_cursor_position(4, 0);
        screen.print("alt");

        screen.resize(Size::new(10, 2));
        assert_eq!(screen.primary().scrollback_len(), 0);
        assert_eq!(screen.cursor_position().row, 1);

        screen.leave_alternate_screen();
        screen.restore_cursor();
        assert_eq!(line(&screen, 0), "top");
        assert_eq!(screen.cursor_position(), RowCol::new(1, 0));
    }

    #[test]
    fn test_resize_clamps_cursor_column() {
        let mut screen = screen(10, 5);
        screen.set_cursor_position(0, 9);
        screen.resize(Size::new(4, 5));
        assert_eq!(screen.cursor_position(), RowCol::new(0, 3));
    }

    #[test]
    fn test_screen_alignment() {
        let mut screen = screen(3, 2);
        screen.set_cursor_position(1, 1);
        screen.screen_alignment();
        assert_eq!(screen.to_plain_text(), "EEE\nEEE");
        assert_eq!(screen.cursor_position(), RowCol::origin());
    }

    #[test]
    fn test_soft_and_full_reset() {
        let mut screen = screen(10, 5);
        screen.print("keep");
        screen.modes_mut().insert = true;
        screen.set_cursor_visible(false);
        screen.set_scroll_region(1, 3);
        screen.soft_reset();
        assert_eq!(*screen.modes(), Modes::default());
        assert!(screen.cursor_visible());
        assert_eq!(screen.scroll_region(), (0, 4));
        assert_eq!(line(&screen, 0), "keep");

        screen.set_title("t");
        screen.full_reset();
        assert_eq!(line(&screen, 0), "");
        assert_eq!(screen.title(), "");
        assert_eq!(screen.cursor_position(), RowCol::origin());
    }

    #[test]
    fn test_extract_text() {
        let mut screen = screen(10, 3);
        screen.print("Hello");
        screen.set_cursor_position(1, 0);
        screen.print("World");
        assert_eq!(screen.extract_text(&Bounds::new(0, 1, 3, 2)), "ell\norl");
        assert_eq!(screen.to_plain_text(), "Hello\nWorld\n");
    }

    #[test]
    fn test_snapshot() {
        let mut screen = screen(4, 2);
        screen.set_title("demo");
        screen.print("ab");
        let snapshot = screen.snapshot();
        assert_eq!(snapshot.size, Size::new(4, 2));
        assert_eq!(snapshot.cursor, RowCol::new(0, 2));
        assert_eq!(snapshot.title, "demo");
        assert_eq!(snapshot.lines, vec!["ab".to_string(), String::new()]);
        assert_eq!(snapshot.rows.len(), 2);
        assert_eq!(snapshot.rows[0].cells.len(), 4);
    }
}
