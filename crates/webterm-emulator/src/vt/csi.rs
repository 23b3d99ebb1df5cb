//! CSI dispatch table.

use tracing::{debug, trace};

use super::{sgr, Vt, VtEvent};
use crate::parse_state::CsiModifiers;
use crate::screen::{CursorStyle, Screen};

/// Reply to primary DA and DECID: VT100 with advanced video.
pub(super) const PRIMARY_DEVICE_ATTRIBUTES: &str = "\x1b[?1;2c";

/// Reply to secondary DA.
const SECONDARY_DEVICE_ATTRIBUTES: &str = "\x1b[>0;256;0c";

/// Saturating conversion of a parameter to a cell count or coordinate.
fn count(value: u32) -> u16 {
    value.min(u32::from(u16::MAX)) as u16
}

impl Vt {
    fn iarg(&self, index: usize, default: u32) -> u16 {
        count(self.state.iarg(index, default))
    }

    /// 1-based parameter converted to a 0-based coordinate.
    fn coordinate(&self, index: usize) -> u16 {
        self.iarg(index, 1) - 1
    }

    pub(super) fn dispatch_csi(
        &mut self,
        modifiers: CsiModifiers,
        final_byte: char,
        screen: &mut Screen,
    ) {
        trace!(
            leading = ?modifiers.leading,
            trailing = ?modifiers.trailing,
            final_byte = %final_byte,
            args = ?self.state.args(),
            "csi dispatch"
        );

        match (modifiers.leading, modifiers.trailing) {
            (None, None) => self.dispatch_ansi(final_byte, screen),
            (Some('?'), None) => self.dispatch_private(final_byte, screen),
            (Some('>'), None) if final_byte == 'c' => {
                if self.state.raw_iarg(0).unwrap_or(0) == 0 {
                    self.reply(SECONDARY_DEVICE_ATTRIBUTES);
                }
            }
            (None, Some(' ')) if final_byte == 'q' => self.set_cursor_style(screen),
            (None, Some('!')) if final_byte == 'p' => {
                screen.soft_reset();
            }
            _ => self.unknown_csi(modifiers, final_byte),
        }
    }

    fn unknown_csi(&mut self, modifiers: CsiModifiers, final_byte: char) {
        let mut sequence = String::from("CSI ");
        if let Some(leading) = modifiers.leading {
            sequence.push(leading);
        }
        sequence.push_str(&self.state.args().join(";"));
        if let Some(trailing) = modifiers.trailing {
            sequence.push(trailing);
        }
        sequence.push(final_byte);
        self.unknown(&sequence);
    }

    fn dispatch_ansi(&mut self, final_byte: char, screen: &mut Screen) {
        match final_byte {
            '@' => screen.insert_chars(self.iarg(0, 1)),
            'A' => screen.cursor_up(self.iarg(0, 1)),
            'B' | 'e' => screen.cursor_down(self.iarg(0, 1)),
            'C' | 'a' => screen.cursor_forward(self.iarg(0, 1)),
            'D' => screen.cursor_backward(self.iarg(0, 1)),
            'E' => {
                screen.cursor_down(self.iarg(0, 1));
                screen.carriage_return();
            }
            'F' => {
                screen.cursor_up(self.iarg(0, 1));
                screen.carriage_return();
            }
            'G' | '`' => screen.set_cursor_column(self.coordinate(0)),
            'H' | 'f' => screen.set_cursor_position(self.coordinate(0), self.coordinate(1)),
            'I' => screen.forward_tab(self.iarg(0, 1)),
            'J' => screen.erase_display(self.state.raw_iarg(0).unwrap_or(0)),
            'K' => screen.erase_line(self.state.raw_iarg(0).unwrap_or(0)),
            'L' => screen.insert_lines(self.iarg(0, 1)),
            'M' => screen.delete_lines(self.iarg(0, 1)),
            'P' => screen.delete_chars(self.iarg(0, 1)),
            'S' => screen.scroll_up(self.iarg(0, 1)),
            'T' => screen.scroll_down(self.iarg(0, 1)),
            'X' => screen.erase_chars(self.iarg(0, 1)),
            'Z' => screen.back_tab(self.iarg(0, 1)),
            'b' => {
                if let Some(ch) = self.last_printed {
                    for _ in 0..self.iarg(0, 1) {
                        screen.print_char(ch);
                    }
                }
            }
            'c' => {
                if self.state.raw_iarg(0).unwrap_or(0) == 0 {
                    self.reply(PRIMARY_DEVICE_ATTRIBUTES);
                }
            }
            'd' => screen.set_cursor_row(self.coordinate(0)),
            'g' => match self.state.raw_iarg(0).unwrap_or(0) {
                0 => screen.clear_tab_stop(),
                3 => screen.clear_all_tab_stops(),
                other => debug!(mode = other, "ignoring tab clear mode"),
            },
            'h' => self.set_ansi_modes(screen, true),
            'l' => self.set_ansi_modes(screen, false),
            'm' => sgr::apply(screen.attrs_mut(), self.state.args()),
            'n' => self.device_status_report(screen, false),
            'r' => {
                let height = u32::from(screen.size().height);
                let top = self.iarg(0, 1) - 1;
                let bottom = count(self.state.iarg(1, height)) - 1;
                screen.set_scroll_region(top, bottom);
            }
            's' => screen.save_cursor(),
            'u' => screen.restore_cursor(),
            't' => trace!("ignoring window manipulation"),
            other => self.unknown_csi(CsiModifiers::default(), other),
        }
    }

    fn dispatch_private(&mut self, final_byte: char, screen: &mut Screen) {
        match final_byte {
            'h' => self.set_private_modes(screen, true),
            'l' => self.set_private_modes(screen, false),
            // Selective erase behaves like plain erase: no cell is protected.
            'J' => screen.erase_display(self.state.raw_iarg(0).unwrap_or(0)),
            'K' => screen.erase_line(self.state.raw_iarg(0).unwrap_or(0)),
            'n' => self.device_status_report(screen, true),
            other => self.unknown_csi(
                CsiModifiers {
                    leading: Some('?'),
                    trailing: None,
                },
                other,
            ),
        }
    }

    fn device_status_report(&mut self, screen: &Screen, private: bool) {
        match self.state.raw_iarg(0) {
            Some(5) if !private => self.reply("\x1b[0n"),
            Some(6) => {
                let position = screen.cursor_position();
                let row = if screen.modes().origin {
                    position.row.saturating_sub(screen.scroll_region().0)
                } else {
                    position.row
                };
                let marker = if private { "?" } else { "" };
                let report = format!("\x1b[{marker}{};{}R", row + 1, position.column + 1);
                self.reply(&report);
            }
            other => debug!(?other, private, "ignoring status report request"),
        }
    }

    fn set_ansi_modes(&mut self, screen: &mut Screen, enabled: bool) {
        for index in 0..self.state.args().len().max(1) {
            match self.state.raw_iarg(index) {
                Some(4) => screen.modes_mut().insert = enabled,
                Some(20) => screen.modes_mut().linefeed_newline = enabled,
                other => debug!(mode = ?other, enabled, "ignoring ANSI mode"),
            }
        }
    }

    fn set_private_modes(&mut self, screen: &mut Screen, enabled: bool) {
        for index in 0..self.state.args().len().max(1) {
            match self.state.raw_iarg(index) {
                Some(1) => screen.modes_mut().application_cursor = enabled,
                Some(6) => {
                    screen.modes_mut().origin = enabled;
                    screen.set_cursor_position(0, 0);
                }
                Some(7) => screen.modes_mut().wraparound = enabled,
                Some(12) => {
                    let style = screen.cursor().style;
                    screen.set_cursor_style(style, enabled);
                }
                Some(25) => screen.set_cursor_visible(enabled),
                Some(47) | Some(1047) => self.switch_buffer(screen, enabled),
                Some(1048) => {
                    if enabled {
                        screen.save_cursor();
                    } else {
                        screen.restore_cursor();
                    }
                }
                Some(1049) => {
                    if enabled {
                        screen.save_cursor();
                        self.switch_buffer(screen, true);
                    } else {
                        self.switch_buffer(screen, false);
                        screen.restore_cursor();
                    }
                }
                other => debug!(mode = ?other, enabled, "ignoring DEC private mode"),
            }
        }
    }

    fn switch_buffer(&mut self, screen: &mut Screen, alternate: bool) {
        let changed = if alternate {
            screen.enter_alternate_screen()
        } else {
            screen.leave_alternate_screen()
        };
        if changed {
            self.events.push(VtEvent::AlternateScreen(alternate));
        }
    }

    fn set_cursor_style(&mut self, screen: &mut Screen) {
        let (style, blink) = match self.state.raw_iarg(0).unwrap_or(0) {
            0 | 1 => (CursorStyle::Block, true),
            2 => (CursorStyle::Block, false),
            3 => (CursorStyle::Underline, true),
            4 => (CursorStyle::Underline, false),
            5 => (CursorStyle::Bar, true),
            6 => (CursorStyle::Bar, false),
            other => {
                debug!(style = other, "ignoring cursor style");
                return;
            }
        };
        screen.set_cursor_style(style, blink);
    }
}
