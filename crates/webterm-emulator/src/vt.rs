//! Incremental VT/xterm sequence interpreter.
//!
//! [`Vt::interpret`] consumes one chunk of decoded terminal output and applies
//! it to a [`Screen`]. A sequence may be split anywhere across chunks: the
//! interpreter parks the dispatch function and collected arguments in its
//! [`ParseState`] and resumes with them on the next chunk.
//!
//! Malformed and unknown sequences are consumed and dropped; they never reach
//! the grid. String sequences (OSC, DCS, PM, APC, SOS) longer than the
//! configured limit are discarded wholesale.

mod csi;
mod sgr;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use webterm_core::config::DEFAULT_MAX_STRING_SEQUENCE;
use webterm_core::TerminalPreferences;

use crate::parse_state::{CsiModifiers, ParseFunction, ParseState, StringKind};
use crate::screen::{Charset, Screen};

const BEL: char = '\x07';
const ESC: char = '\x1b';
const CAN: char = '\x18';
const SUB: char = '\x1a';
const ST_8BIT: char = '\u{9c}';

/// Most parameters a CSI sequence may carry.
const MAX_CSI_PARAMS: usize = 32;
/// Longest single CSI parameter, colon sub-parameters included.
const MAX_CSI_PARAM_LEN: usize = 32;

/// Side effects of interpretation other than screen mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "value")]
pub enum VtEvent {
    /// BEL received in plain text
    Bell,
    /// Window title changed through OSC 0 or 2
    TitleChanged(String),
    /// Bytes to send back to the host (device attribute and status reports)
    Reply(String),
    /// Alternate buffer entered (`true`) or left (`false`)
    AlternateScreen(bool),
}

/// Recovery counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VtStats {
    /// String sequences discarded for exceeding the length limit
    pub dropped_string_sequences: u64,
    /// Unknown or malformed sequences consumed without effect
    pub unknown_sequences: u64,
}

/// The interpreter.
#[derive(Debug, Clone)]
pub struct Vt {
    state: ParseState,
    max_string_sequence: usize,
    enable_8bit_control: bool,
    last_printed: Option<char>,
    events: Vec<VtEvent>,
    stats: VtStats,
}

impl Default for Vt {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_STRING_SEQUENCE, false)
    }
}

impl Vt {
    /// Create an interpreter.
    pub fn new(max_string_sequence: usize, enable_8bit_control: bool) -> Self {
        Self {
            state: ParseState::new(None),
            max_string_sequence,
            enable_8bit_control,
            last_printed: None,
            events: Vec::new(),
            stats: VtStats::default(),
        }
    }

    /// Create an interpreter configured from preferences.
    pub fn from_preferences(prefs: &TerminalPreferences) -> Self {
        Self::new(prefs.max_string_sequence, prefs.enable_8bit_control)
    }

    /// Interpret one chunk of terminal output.
    pub fn interpret(&mut self, chunk: &str, screen: &mut Screen) {
        self.state.reset_buf(Some(chunk));
        while !self.state.is_complete() {
            self.step(screen);
        }
        self.state.reset_buf(None);
    }

    /// Drain events produced since the last call.
    pub fn take_events(&mut self) -> Vec<VtEvent> {
        std::mem::take(&mut self.events)
    }

    /// Recovery counters.
    pub fn stats(&self) -> VtStats {
        self.stats
    }

    /// Current parse state.
    pub fn state(&self) -> &ParseState {
        &self.state
    }

    /// Abandon any half-parsed sequence.
    pub fn reset(&mut self) {
        self.state.reset(None);
        self.last_printed = None;
    }

    fn step(&mut self, screen: &mut Screen) {
        match self.state.func() {
            ParseFunction::PlainText => self.parse_plain_text(screen),
            ParseFunction::Escape => self.parse_escape(screen),
            ParseFunction::EscapeIntermediate(intro) => {
                self.parse_escape_intermediate(intro, screen)
            }
            ParseFunction::Csi(modifiers) => self.parse_csi(modifiers, screen),
            ParseFunction::CsiIgnore => self.parse_csi_ignore(screen),
            ParseFunction::String(kind) => self.parse_string(kind, screen),
            ParseFunction::StringEscape(kind) => self.parse_string_escape(kind, screen),
        }
    }

    fn is_control(&self, ch: char) -> bool {
        ch < ' '
            || ch == '\x7f'
            || (self.enable_8bit_control && ('\u{80}'..='\u{9f}').contains(&ch))
    }

    fn parse_plain_text(&mut self, screen: &mut Screen) {
        let remaining = self.state.peek_remaining_buf();
        let run = remaining
            .iter()
            .position(|&ch| self.is_control(ch))
            .unwrap_or(remaining.len());

        if run > 0 {
            let text: String = remaining[..run].iter().collect();
            self.state.advance(run);
            self.last_printed = text.chars().last();
            screen.print(&text);
            return;
        }

        if let Some(ch) = self.state.consume_char() {
            self.dispatch_control(ch, screen);
        }
    }

    /// Execute a C0 (or enabled C1) control.
    ///
    /// Only ESC, CAN, SUB and the sequence-introducing C1 controls change the
    /// parse function; everything else executes in place.
    fn dispatch_control(&mut self, ch: char, screen: &mut Screen) {
        match ch {
            '\0' | '\x7f' => {}
            BEL => self.events.push(VtEvent::Bell),
            '\x08' => screen.backspace(),
            '\t' => screen.forward_tab(1),
            '\n' | '\x0b' | '\x0c' => screen.line_feed(),
            '\r' => screen.carriage_return(),
            '\x0e' => screen.shift_out(),
            '\x0f' => screen.shift_in(),
            CAN | SUB => {
                self.state.reset_arguments(None);
                self.state.set_func(ParseFunction::PlainText);
            }
            ESC => {
                self.state.reset_arguments(None);
                self.state.set_func(ParseFunction::Escape);
            }
            '\u{84}' => screen.index(),
            '\u{85}' => screen.next_line(),
            '\u{88}' => screen.set_tab_stop(),
            '\u{8d}' => screen.reverse_index(),
            '\u{90}' => self.start_string(StringKind::Dcs),
            '\u{98}' => self.start_string(StringKind::Sos),
            '\u{9b}' => self.start_csi(),
            '\u{9d}' => self.start_string(StringKind::Osc),
            '\u{9e}' => self.start_string(StringKind::Pm),
            '\u{9f}' => self.start_string(StringKind::Apc),
            ST_8BIT => {}
            other => trace!(code = other as u32, "ignoring control character"),
        }
    }

    fn unknown(&mut self, sequence: &str) {
        debug!(sequence, "ignoring unknown sequence");
        self.stats.unknown_sequences += 1;
    }

    // ------------------------------------------------------------------
    // ESC
    // ------------------------------------------------------------------

    fn parse_escape(&mut self, screen: &mut Screen) {
        let Some(ch) = self.state.consume_char() else {
            return;
        };
        self.state.set_func(ParseFunction::PlainText);
        trace!(ch = %ch, "escape dispatch");

        match ch {
            '[' => self.start_csi(),
            ']' => self.start_string(StringKind::Osc),
            'P' => self.start_string(StringKind::Dcs),
            '^' => self.start_string(StringKind::Pm),
            '_' => self.start_string(StringKind::Apc),
            'X' => self.start_string(StringKind::Sos),
            '7' => screen.save_cursor(),
            '8' => screen.restore_cursor(),
            'D' => screen.index(),
            'E' => screen.next_line(),
            'H' => screen.set_tab_stop(),
            'M' => screen.reverse_index(),
            'c' => self.full_reset(screen),
            '=' => screen.modes_mut().application_keypad = true,
            '>' => screen.modes_mut().application_keypad = false,
            'Z' => self.reply(csi::PRIMARY_DEVICE_ATTRIBUTES),
            // Stray ST, or the tail of a discarded string sequence.
            '\\' => {}
            // Single shifts; G2/G3 are never designated to anything useful.
            'N' | 'O' => trace!(ch = %ch, "ignoring single shift"),
            '(' | ')' | '*' | '+' | '-' | '.' | '/' | '#' | '%' | ' ' => {
                self.state.set_func(ParseFunction::EscapeIntermediate(ch));
            }
            c if self.is_control(c) => {
                self.state.set_func(ParseFunction::Escape);
                self.dispatch_control(c, screen);
            }
            other => self.unknown(&format!("ESC {other}")),
        }
    }

    fn parse_escape_intermediate(&mut self, intro: char, screen: &mut Screen) {
        let Some(ch) = self.state.consume_char() else {
            return;
        };
        if self.is_control(ch) {
            self.dispatch_control(ch, screen);
            return;
        }
        self.state.set_func(ParseFunction::PlainText);

        match intro {
            '(' | ')' | '*' | '+' => {
                let slot = match intro {
                    '(' => 0,
                    ')' => 1,
                    '*' => 2,
                    _ => 3,
                };
                match Charset::from_final(ch) {
                    Some(charset) => screen.designate_charset(slot, charset),
                    None => debug!(intro = %intro, ch = %ch, "unsupported character set"),
                }
            }
            '-' | '.' | '/' => debug!(intro = %intro, ch = %ch, "ignoring 96-character set"),
            '#' => match ch {
                '8' => screen.screen_alignment(),
                '3' | '4' | '5' | '6' => trace!(ch = %ch, "ignoring line size change"),
                other => self.unknown(&format!("ESC # {other}")),
            },
            '%' => trace!(ch = %ch, "ignoring character encoding selection"),
            ' ' => trace!(ch = %ch, "ignoring control transmission selection"),
            _ => self.unknown(&format!("ESC {intro} {ch}")),
        }
    }

    fn full_reset(&mut self, screen: &mut Screen) {
        let was_alternate = screen.is_alternate();
        screen.full_reset();
        self.last_printed = None;
        if was_alternate {
            self.events.push(VtEvent::AlternateScreen(false));
        }
    }

    // ------------------------------------------------------------------
    // CSI
    // ------------------------------------------------------------------

    fn start_csi(&mut self) {
        self.state.reset_arguments(None);
        self.state.set_func(ParseFunction::Csi(CsiModifiers::default()));
    }

    fn parse_csi(&mut self, mut modifiers: CsiModifiers, screen: &mut Screen) {
        while let Some(ch) = self.state.consume_char() {
            match ch {
                '0'..='9' | ':' if modifiers.trailing.is_none() => {
                    if self.state.args().last().map_or(0, String::len) >= MAX_CSI_PARAM_LEN {
                        self.ignore_csi("CSI parameter too long");
                        return;
                    }
                    self.state.append_to_last_arg(ch);
                }
                ';' if modifiers.trailing.is_none() => {
                    if self.state.args().len() >= MAX_CSI_PARAMS {
                        self.ignore_csi("too many CSI parameters");
                        return;
                    }
                    if self.state.args().is_empty() {
                        self.state.push_arg();
                    }
                    self.state.push_arg();
                }
                '?' | '>' | '<' | '='
                    if modifiers.leading.is_none()
                        && modifiers.trailing.is_none()
                        && self.state.args().is_empty() =>
                {
                    modifiers.leading = Some(ch);
                }
                ' ' | '!' | '"' | '#' | '$' | '%' | '&' | '\'' | '*'
                    if modifiers.trailing.is_none() =>
                {
                    modifiers.trailing = Some(ch);
                }
                '@'..='~' => {
                    self.state.set_func(ParseFunction::PlainText);
                    self.dispatch_csi(modifiers, ch, screen);
                    self.state.reset_arguments(None);
                    return;
                }
                c if self.is_control(c) => {
                    self.state.set_func(ParseFunction::Csi(modifiers));
                    self.dispatch_control(c, screen);
                    if self.state.func() != ParseFunction::Csi(modifiers) {
                        return;
                    }
                }
                other => {
                    trace!(ch = %other, "malformed CSI sequence");
                    self.ignore_csi("malformed CSI sequence");
                    return;
                }
            }
        }
        self.state.set_func(ParseFunction::Csi(modifiers));
    }

    /// Drop the collected parameters and swallow the rest of the sequence.
    fn ignore_csi(&mut self, reason: &'static str) {
        debug!(reason, "ignoring CSI sequence");
        self.stats.unknown_sequences += 1;
        self.state.reset_arguments(None);
        self.state.set_func(ParseFunction::CsiIgnore);
    }

    fn parse_csi_ignore(&mut self, screen: &mut Screen) {
        while let Some(ch) = self.state.consume_char() {
            match ch {
                '@'..='~' => {
                    self.state.set_func(ParseFunction::PlainText);
                    return;
                }
                ESC | CAN | SUB => {
                    self.dispatch_control(ch, screen);
                    return;
                }
                _ => {}
            }
        }
    }

    // ------------------------------------------------------------------
    // String sequences
    // ------------------------------------------------------------------

    fn start_string(&mut self, kind: StringKind) {
        self.state.reset_arguments(Some(""));
        self.state.set_func(ParseFunction::String(kind));
    }

    fn is_string_terminator(&self, ch: char) -> bool {
        matches!(ch, BEL | ESC | CAN | SUB) || (self.enable_8bit_control && ch == ST_8BIT)
    }

    fn parse_string(&mut self, kind: StringKind, screen: &mut Screen) {
        let remaining = self.state.peek_remaining_buf();
        let terminator = remaining
            .iter()
            .position(|&ch| self.is_string_terminator(ch));
        let payload_len = terminator.unwrap_or(remaining.len());
        let total = self.state.first_arg_len() + payload_len;

        let Some(end) = terminator else {
            let len = remaining.len();
            if total > self.max_string_sequence {
                self.state.advance(len);
                self.drop_string(kind, total);
                return;
            }
            let text: String = remaining.iter().collect();
            self.state.advance(len);
            self.state.append_to_first_arg(&text);
            return;
        };

        let text: String = remaining[..end].iter().collect();
        let terminator = remaining[end];
        self.state.advance(end + 1);

        if total > self.max_string_sequence {
            self.drop_string(kind, total);
            if terminator == ESC {
                self.state.set_func(ParseFunction::Escape);
            }
            return;
        }

        self.state.append_to_first_arg(&text);
        match terminator {
            ESC => self.state.set_func(ParseFunction::StringEscape(kind)),
            CAN | SUB => {
                trace!(?kind, "string sequence cancelled");
                self.state.reset_arguments(None);
                self.state.set_func(ParseFunction::PlainText);
            }
            _ => self.finish_string(kind, screen),
        }
    }

    fn parse_string_escape(&mut self, kind: StringKind, screen: &mut Screen) {
        if self.state.peek_char() == Some('\\') {
            self.state.advance(1);
            self.finish_string(kind, screen);
            return;
        }
        // ESC followed by anything but `\` abandons the string and starts a
        // fresh escape sequence with that character.
        trace!(?kind, "string sequence interrupted by escape");
        self.state.reset_arguments(None);
        self.state.set_func(ParseFunction::Escape);
        self.parse_escape(screen);
    }

    fn drop_string(&mut self, kind: StringKind, len: usize) {
        warn!(
            ?kind,
            len,
            max = self.max_string_sequence,
            "discarding oversize string sequence"
        );
        self.stats.dropped_string_sequences += 1;
        self.state.reset_arguments(None);
        self.state.set_func(ParseFunction::PlainText);
    }

    fn finish_string(&mut self, kind: StringKind, screen: &mut Screen) {
        self.state.set_func(ParseFunction::PlainText);
        let payload = self.state.arg(0).unwrap_or_default().to_string();
        self.state.reset_arguments(None);

        match kind {
            StringKind::Osc => self.dispatch_osc(&payload, screen),
            other => trace!(kind = ?other, len = payload.len(), "ignoring string sequence"),
        }
    }

    fn dispatch_osc(&mut self, payload: &str, screen: &mut Screen) {
        let (code, text) = payload.split_once(';').unwrap_or((payload, ""));
        match code {
            "0" | "2" => {
                trace!(title = text, "title changed");
                screen.set_title(text);
                self.events.push(VtEvent::TitleChanged(text.to_string()));
            }
            "1" => trace!("ignoring icon name"),
            other => debug!(code = other, "ignoring OSC"),
        }
    }

    fn reply(&mut self, text: &str) {
        self.events.push(VtEvent::Reply(text.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use webterm_core::{Color, RowCol, Size};

    fn setup() -> (Vt, Screen) {
        (Vt::default(), Screen::new(Size::new(80, 24), 100))
    }

    fn line(screen: &Screen, row: u16) -> String {
        screen.buffer().row(row).map(|r| r.text()).unwrap_or_default()
    }

    #[test]
    fn test_plain_text() {
        let (mut vt, mut screen) = setup();
        vt.interpret("Hello, World!", &mut screen);
        assert_eq!(line(&screen, 0), "Hello, World!");
        assert_eq!(screen.cursor_position(), RowCol::new(0, 13));
    }

    #[test]
    fn test_crlf() {
        let (mut vt, mut screen) = setup();
        vt.interpret("hello\r\n", &mut screen);
        assert_eq!(line(&screen, 0), "hello");
        assert_eq!(screen.cursor_position(), RowCol::new(1, 0));
    }

    #[test]
    fn test_bell_event() {
        let (mut vt, mut screen) = setup();
        vt.interpret("a\x07b", &mut screen);
        assert_eq!(vt.take_events(), vec![VtEvent::Bell]);
        assert!(vt.take_events().is_empty());
        assert_eq!(line(&screen, 0), "ab");
    }

    #[test]
    fn test_split_csi_across_chunks() {
        let (mut vt, mut screen) = setup();
        vt.interpret("\x1b[", &mut screen);
        assert!(matches!(vt.state().func(), ParseFunction::Csi(_)));
        vt.interpret("3", &mut screen);
        vt.interpret("1mX", &mut screen);
        assert_eq!(screen.cell(0, 0).unwrap().character, 'X');
        assert_eq!(screen.cell(0, 0).unwrap().attrs.foreground, Color::Red);
        assert_eq!(vt.state().func(), ParseFunction::PlainText);
    }

    #[test]
    fn test_cursor_position() {
        let (mut vt, mut screen) = setup();
        vt.interpret("\x1b[5;10H", &mut screen);
        assert_eq!(screen.cursor_position(), RowCol::new(4, 9));
        vt.interpret("\x1b[H", &mut screen);
        assert_eq!(screen.cursor_position(), RowCol::origin());
        vt.interpret("\x1b[0;0H", &mut screen);
        assert_eq!(screen.cursor_position(), RowCol::origin());
        vt.interpret("\x1b[;7H", &mut screen);
        assert_eq!(screen.cursor_position(), RowCol::new(0, 6));
    }

    #[test]
    fn test_zero_count_means_one() {
        let (mut vt, mut screen) = setup();
        vt.interpret("\x1b[10;10H\x1b[0A", &mut screen);
        assert_eq!(screen.cursor_position(), RowCol::new(8, 9));
    }

    #[test]
    fn test_controls_inside_csi_execute_in_place() {
        let (mut vt, mut screen) = setup();
        vt.interpret("abc\x1b[2\x08D", &mut screen);
        // BS moves from column 3 to 2, then CUB 2 moves to 0.
        assert_eq!(screen.cursor_position(), RowCol::new(0, 0));
    }

    #[test]
    fn test_malformed_csi_is_swallowed() {
        let (mut vt, mut screen) = setup();
        vt.interpret("\x1b[1;2\u{e9}3mafter", &mut screen);
        assert_eq!(line(&screen, 0), "after");
        assert_eq!(vt.stats().unknown_sequences, 1);
    }

    #[test]
    fn test_runaway_csi_parameters_are_bounded() {
        let (mut vt, mut screen) = setup();
        vt.interpret("\x1b[", &mut screen);
        for _ in 0..1_000 {
            vt.interpret(&";".repeat(1_000), &mut screen);
            assert!(vt.state().args().len() <= MAX_CSI_PARAMS);
        }
        assert_eq!(vt.state().func(), ParseFunction::CsiIgnore);
        vt.interpret("mok", &mut screen);
        assert_eq!(line(&screen, 0), "ok");
        assert_eq!(vt.stats().unknown_sequences, 1);

        vt.interpret("\x1b[", &mut screen);
        for _ in 0..100 {
            vt.interpret(&"9".repeat(1_000), &mut screen);
            assert!(vt.state().args().iter().all(|a| a.len() <= MAX_CSI_PARAM_LEN));
        }
        vt.interpret("H!", &mut screen);
        assert_eq!(line(&screen, 0), "ok!");
        assert_eq!(vt.stats().unknown_sequences, 2);
    }

    #[test]
    fn test_csi_parameter_limit_is_inclusive() {
        let (mut vt, mut screen) = setup();
        let params = vec!["0"; MAX_CSI_PARAMS - 1].join(";");
        vt.interpret(&format!("\x1b[{params};1mB"), &mut screen);
        assert!(screen.cell(0, 0).unwrap().attrs.bold);
        assert_eq!(vt.stats().unknown_sequences, 0);
    }

    #[test]
    fn test_unknown_csi_final_is_dropped() {
        let (mut vt, mut screen) = setup();
        vt.interpret("a\x1b[5yb", &mut screen);
        assert_eq!(line(&screen, 0), "ab");
        assert_eq!(vt.stats().unknown_sequences, 1);
    }

    #[test]
    fn test_unknown_escape_is_dropped() {
        let (mut vt, mut screen) = setup();
        vt.interpret("a\x1bQb", &mut screen);
        assert_eq!(line(&screen, 0), "ab");
        assert_eq!(vt.stats().unknown_sequences, 1);
    }

    #[test]
    fn test_osc_title_bel_and_st() {
        let (mut vt, mut screen) = setup();
        vt.interpret("\x1b]0;first\x07", &mut screen);
        vt.interpret("\x1b]2;sec", &mut screen);
        vt.interpret("ond\x1b", &mut screen);
        vt.interpret("\\text", &mut screen);
        assert_eq!(
            vt.take_events(),
            vec![
                VtEvent::TitleChanged("first".to_string()),
                VtEvent::TitleChanged("second".to_string()),
            ]
        );
        assert_eq!(line(&screen, 0), "text");
    }

    #[test]
    fn test_other_osc_ignored() {
        let (mut vt, mut screen) = setup();
        vt.interpret("\x1b]52;c;Zm9v\x07\x1b]1;icon\x07x", &mut screen);
        assert!(vt.take_events().is_empty());
        assert_eq!(line(&screen, 0), "x");
    }

    #[test]
    fn test_string_aborted_by_escape() {
        let (mut vt, mut screen) = setup();
        vt.interpret("\x1b]0;never\x1b[31mX", &mut screen);
        assert!(vt.take_events().is_empty());
        assert_eq!(line(&screen, 0), "X");
        assert_eq!(screen.cell(0, 0).unwrap().attrs.foreground, Color::Red);
    }

    #[test]
    fn test_string_cancelled_by_can() {
        let (mut vt, mut screen) = setup();
        vt.interpret("\x1bPpayload\x18visible", &mut screen);
        assert_eq!(line(&screen, 0), "visible");
    }

    #[test]
    fn test_dcs_pm_apc_consumed() {
        let (mut vt, mut screen) = setup();
        vt.interpret("\x1bPq#0\x1b\\a\x1b^pm\x1b\\b\x1b_apc\x07c", &mut screen);
        assert_eq!(line(&screen, 0), "abc");
        assert_eq!(vt.stats(), VtStats::default());
    }

    #[test]
    fn test_oversize_string_within_chunk_is_dropped() {
        let mut vt = Vt::new(8, false);
        let mut screen = Screen::new(Size::new(80, 24), 0);
        vt.interpret("\x1b]0;0123456789abcdef\x07after", &mut screen);
        assert!(vt.take_events().is_empty());
        assert_eq!(line(&screen, 0), "after");
        assert_eq!(vt.stats().dropped_string_sequences, 1);
    }

    #[test]
    fn test_oversize_unterminated_string_is_dropped() {
        let mut vt = Vt::new(8, false);
        let mut screen = Screen::new(Size::new(80, 24), 0);
        vt.interpret("\x1b]0;0123", &mut screen);
        vt.interpret("456789abcdef", &mut screen);
        assert_eq!(vt.state().func(), ParseFunction::PlainText);
        assert_eq!(line(&screen, 0), "");
        assert_eq!(vt.stats().dropped_string_sequences, 1);

        vt.interpret("next", &mut screen);
        assert_eq!(line(&screen, 0), "next");
    }

    #[test]
    fn test_oversize_string_with_st_terminator() {
        let mut vt = Vt::new(4, false);
        let mut screen = Screen::new(Size::new(80, 24), 0);
        vt.interpret("\x1b]0;toolong\x1b\\ok", &mut screen);
        assert_eq!(line(&screen, 0), "ok");
        assert_eq!(vt.stats().dropped_string_sequences, 1);
        assert_eq!(vt.stats().unknown_sequences, 0);
    }

    #[test]
    fn test_device_attributes_reply() {
        let (mut vt, mut screen) = setup();
        vt.interpret("\x1b[c\x1b[>c\x1bZ", &mut screen);
        assert_eq!(
            vt.take_events(),
            vec![
                VtEvent::Reply("\x1b[?1;2c".to_string()),
                VtEvent::Reply("\x1b[>0;256;0c".to_string()),
                VtEvent::Reply("\x1b[?1;2c".to_string()),
            ]
        );
    }

    #[test]
    fn test_status_reports() {
        let (mut vt, mut screen) = setup();
        vt.interpret("\x1b[5n\x1b[3;4H\x1b[6n", &mut screen);
        assert_eq!(
            vt.take_events(),
            vec![
                VtEvent::Reply("\x1b[0n".to_string()),
                VtEvent::Reply("\x1b[3;4R".to_string()),
            ]
        );
    }

    #[test]
    fn test_alternate_screen_1049() {
        let (mut vt, mut screen) = setup();
        vt.interpret("main\x1b[?1049h", &mut screen);
        assert!(screen.is_alternate());
        assert_eq!(line(&screen, 0), "");
        vt.interpret("\x1b[Halt\x1b[?1049l", &mut screen);
        assert!(!screen.is_alternate());
        assert_eq!(line(&screen, 0), "main");
        assert_eq!(screen.cursor_position(), RowCol::new(0, 4));
        assert_eq!(
            vt.take_events(),
            vec![VtEvent::AlternateScreen(true), VtEvent::AlternateScreen(false)]
        );
    }

    #[test]
    fn test_decset_modes() {
        let (mut vt, mut screen) = setup();
        vt.interpret("\x1b[?25l\x1b[?7l\x1b[?1h\x1b[4h\x1b[20h", &mut screen);
        assert!(!screen.cursor_visible());
        assert!(!screen.modes().wraparound);
        assert!(screen.modes().application_cursor);
        assert!(screen.modes().insert);
        assert!(screen.modes().linefeed_newline);

        vt.interpret("\x1b[?25;7h\x1b[4l", &mut screen);
        assert!(screen.cursor_visible());
        assert!(screen.modes().wraparound);
        assert!(!screen.modes().insert);
    }

    #[test]
    fn test_scroll_region_and_index() {
        let mut vt = Vt::default();
        let mut screen = Screen::new(Size::new(10, 5), 100);
        vt.interpret("a\r\nb\r\nc\r\nd\r\ne", &mut screen);
        vt.interpret("\x1b[2;4r\x1b[4;1H\n", &mut screen);
        let lines: Vec<String> = (0..5).map(|r| line(&screen, r)).collect();
        assert_eq!(lines, vec!["a", "c", "d", "", "e"]);
    }

    #[test]
    fn test_cursor_style() {
        let (mut vt, mut screen) = setup();
        vt.interpret("\x1b[6 q", &mut screen);
        assert_eq!(screen.cursor().style, crate::screen::CursorStyle::Bar);
        assert!(!screen.cursor().blink);
    }

    #[test]
    fn test_soft_reset() {
        let (mut vt, mut screen) = setup();
        vt.interpret("\x1b[1m\x1b[4h\x1b[!pX", &mut screen);
        assert!(!screen.modes().insert);
        assert!(!screen.cell(0, 0).unwrap().attrs.bold);
    }

    #[test]
    fn test_full_reset() {
        let (mut vt, mut screen) = setup();
        vt.interpret("junk\x1b[?1049h\x1bc", &mut screen);
        assert!(!screen.is_alternate());
        assert_eq!(line(&screen, 0), "");
        assert_eq!(
            vt.take_events(),
            vec![VtEvent::AlternateScreen(true), VtEvent::AlternateScreen(false)]
        );
    }

    #[test]
    fn test_charset_designation() {
        let (mut vt, mut screen) = setup();
        vt.interpret("\x1b(0lqk\x1b(Bq", &mut screen);
        assert_eq!(line(&screen, 0), "┌─┐q");
        vt.interpret("\r\x1b)0\x0eq\x0fq", &mut screen);
        assert_eq!(line(&screen, 0), "─q┐q");
    }

    #[test]
    fn test_decaln() {
        let mut vt = Vt::default();
        let mut screen = Screen::new(Size::new(3, 2), 0);
        vt.interpret("\x1b#8", &mut screen);
        assert_eq!(screen.to_plain_text(), "EEE\nEEE");
    }

    #[test]
    fn test_repeat_last_character() {
        let (mut vt, mut screen) = setup();
        vt.interpret("x\x1b[3b", &mut screen);
        assert_eq!(line(&screen, 0), "xxxx");
    }

    #[test]
    fn test_8bit_controls_disabled_by_default() {
        let (mut vt, mut screen) = setup();
        vt.interpret("\u{9b}31mX", &mut screen);
        assert_eq!(screen.cell(0, 1).unwrap().character, '3');
    }

    #[test]
    fn test_8bit_controls_enabled() {
        let mut vt = Vt::new(DEFAULT_MAX_STRING_SEQUENCE, true);
        let mut screen = Screen::new(Size::new(80, 24), 0);
        vt.interpret("\u{9b}31mX\u{9d}0;t\u{9c}", &mut screen);
        assert_eq!(line(&screen, 0), "X");
        assert_eq!(screen.cell(0, 0).unwrap().attrs.foreground, Color::Red);
        assert_eq!(vt.take_events(), vec![VtEvent::TitleChanged("t".to_string())]);
    }
}
