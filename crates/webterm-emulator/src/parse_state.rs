//! Resumable parse cursor shared by the interpreter's dispatch functions.
//!
//! Everything needed to pick a half-finished control sequence back up lives
//! here: the pending input, the position inside it, the dispatch function to
//! resume with, and the arguments collected so far. The interpreter keeps no
//! other mid-sequence state, so feeding `"\x1b["` and then `"31m"` behaves
//! exactly like feeding `"\x1b[31m"` at once.

/// Kind of string sequence being collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StringKind {
    /// Operating System Command (`ESC ]`)
    Osc,
    /// Device Control String (`ESC P`)
    Dcs,
    /// Privacy Message (`ESC ^`)
    Pm,
    /// Application Program Command (`ESC _`)
    Apc,
    /// Start Of String (`ESC X`)
    Sos,
}

/// Private markers and intermediates seen inside a CSI sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CsiModifiers {
    /// Marker before the first parameter (`?`, `>`, `<`, `=`)
    pub leading: Option<char>,
    /// Intermediate after the parameters (`SP`, `!`, `"`, `$`, ...)
    pub trailing: Option<char>,
}

/// The dispatch function the interpreter resumes with on the next step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParseFunction {
    /// Printing text and executing C0 controls
    #[default]
    PlainText,
    /// Saw `ESC`, waiting for the byte that selects the sequence
    Escape,
    /// Saw `ESC` plus an introducer such as `(` or `#`, waiting for the final byte
    EscapeIntermediate(char),
    /// Collecting CSI parameters
    Csi(CsiModifiers),
    /// Swallowing a malformed CSI sequence up to its final byte
    CsiIgnore,
    /// Collecting the payload of a string sequence
    String(StringKind),
    /// Saw `ESC` inside a string sequence, expecting `\` to terminate it
    StringEscape(StringKind),
}

/// Parse a decimal argument, saturating on overflow.
///
/// Returns `None` for empty or non-numeric text.
fn parse_decimal(text: &str) -> Option<u32> {
    if text.is_empty() {
        return None;
    }
    let mut value: u32 = 0;
    for ch in text.chars() {
        let digit = ch.to_digit(10)?;
        value = value.saturating_mul(10).saturating_add(digit);
    }
    Some(value)
}

/// Current state of the parse.
#[derive(Debug, Clone, Default)]
pub struct ParseState {
    buf: Option<Vec<char>>,
    pos: usize,
    func: ParseFunction,
    args: Vec<String>,
}

impl ParseState {
    /// Create a parse state positioned at the start of `buf`.
    pub fn new(buf: Option<&str>) -> Self {
        Self {
            buf: buf.map(|s| s.chars().collect()),
            pos: 0,
            func: ParseFunction::default(),
            args: Vec::new(),
        }
    }

    /// Reset the parse function, buffer, position and arguments together.
    pub fn reset(&mut self, buf: Option<&str>) {
        self.reset_parse_function();
        self.reset_buf(buf);
        self.reset_arguments(None);
    }

    /// Reset the parse function only.
    pub fn reset_parse_function(&mut self) {
        self.func = ParseFunction::default();
    }

    /// Reset the buffer and position only.
    pub fn reset_buf(&mut self, buf: Option<&str>) {
        self.buf = buf.map(|s| s.chars().collect());
        self.pos = 0;
    }

    /// Reset the argument list only, optionally seeding argument 0.
    pub fn reset_arguments(&mut self, arg_zero: Option<&str>) {
        self.args.clear();
        if let Some(arg) = arg_zero {
            self.args.push(arg.to_string());
        }
    }

    /// Get argument `index` as an integer.
    ///
    /// Absent, empty and zero arguments all yield `default`: an explicit `0`
    /// means "use the default" in VT parameter syntax.
    pub fn iarg(&self, index: usize, default: u32) -> u32 {
        match self.args.get(index).and_then(|arg| parse_decimal(arg)) {
            Some(0) | None => default,
            Some(value) => value,
        }
    }

    /// Get argument `index` as an integer, keeping an explicit zero.
    ///
    /// Used for selectors such as `ED`/`EL` modes and SGR codes, where `0` is
    /// a meaningful value of its own.
    pub fn raw_iarg(&self, index: usize) -> Option<u32> {
        self.args.get(index).and_then(|arg| parse_decimal(arg))
    }

    /// Advance the parse position by `count` characters.
    ///
    /// Callers validate `count` against the remaining input.
    pub fn advance(&mut self, count: usize) {
        let len = self.buf_len();
        debug_assert!(self.pos + count <= len, "advance past end of buffer");
        self.pos = (self.pos + count).min(len);
    }

    /// The unread portion of the buffer, without moving the position.
    pub fn peek_remaining_buf(&self) -> &[char] {
        match &self.buf {
            Some(buf) => &buf[self.pos.min(buf.len())..],
            None => &[],
        }
    }

    /// The next character, without moving the position.
    pub fn peek_char(&self) -> Option<char> {
        self.buf.as_ref().and_then(|buf| buf.get(self.pos).copied())
    }

    /// The next character, advancing the position past it.
    pub fn consume_char(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.pos += 1;
        Some(ch)
    }

    /// True if there is no buffer or the position is at or past its end.
    pub fn is_complete(&self) -> bool {
        match &self.buf {
            None => true,
            Some(buf) => self.pos >= buf.len(),
        }
    }

    /// Current position inside the buffer.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Current dispatch function.
    pub fn func(&self) -> ParseFunction {
        self.func
    }

    /// Replace the dispatch function.
    pub fn set_func(&mut self, func: ParseFunction) {
        self.func = func;
    }

    /// Collected arguments.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Argument `index` as text.
    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }

    /// Start a new, empty argument.
    pub fn push_arg(&mut self) {
        self.args.push(String::new());
    }

    /// Append a character to the last argument, creating argument 0 if needed.
    pub fn append_to_last_arg(&mut self, ch: char) {
        match self.args.last_mut() {
            Some(last) => last.push(ch),
            None => self.args.push(ch.to_string()),
        }
    }

    /// Append text to argument 0, creating it if needed.
    ///
    /// String sequences accumulate their payload here.
    pub fn append_to_first_arg(&mut self, text: &str) {
        match self.args.first_mut() {
            Some(first) => first.push_str(text),
            None => self.args.push(text.to_string()),
        }
    }

    /// Length in characters of argument 0 (0 if absent).
    pub fn first_arg_len(&self) -> usize {
        self.args.first().map_or(0, |arg| arg.chars().count())
    }

    fn buf_len(&self) -> usize {
        self.buf.as_ref().map_or(0, Vec::len)
    }
}
