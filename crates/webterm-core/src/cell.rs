//! Cell, color and text attribute types for the terminal grid.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Terminal color supporting ANSI, 256-color palette, and true RGB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    /// Default terminal color (resolved by the renderer from preferences)
    #[default]
    Default,

    /// Standard ANSI colors (0-7)
    Black,
    /// ANSI Red
    Red,
    /// ANSI Green
    Green,
    /// ANSI Yellow
    Yellow,
    /// ANSI Blue
    Blue,
    /// ANSI Magenta
    Magenta,
    /// ANSI Cyan
    Cyan,
    /// ANSI White
    White,

    /// Bright ANSI colors (8-15)
    BrightBlack,
    /// Bright Red
    BrightRed,
    /// Bright Green
    BrightGreen,
    /// Bright Yellow
    BrightYellow,
    /// Bright Blue
    BrightBlue,
    /// Bright Magenta
    BrightMagenta,
    /// Bright Cyan
    BrightCyan,
    /// Bright White
    BrightWhite,

    /// 256-color palette index (0-255)
    Indexed(u8),

    /// True color RGB (24-bit)
    Rgb {
        /// Red component
        r: u8,
        /// Green component
        g: u8,
        /// Blue component
        b: u8,
    },
}

impl Color {
    /// Map an ANSI palette index (0-15) to its named color.
    ///
    /// Indices above 15 map to [`Color::Indexed`].
    pub fn ansi(index: u8) -> Self {
        match index {
            0 => Color::Black,
            1 => Color::Red,
            2 => Color::Green,
            3 => Color::Yellow,
            4 => Color::Blue,
            5 => Color::Magenta,
            6 => Color::Cyan,
            7 => Color::White,
            8 => Color::BrightBlack,
            9 => Color::BrightRed,
            10 => Color::BrightGreen,
            11 => Color::BrightYellow,
            12 => Color::BrightBlue,
            13 => Color::BrightMagenta,
            14 => Color::BrightCyan,
            15 => Color::BrightWhite,
            n => Color::Indexed(n),
        }
    }
}

/// Text attributes stamped onto a cell when it is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
pub struct TextAttributes {
    /// Bold/bright text
    pub bold: bool,
    /// Faint (dimmed) text
    pub faint: bool,
    /// Italic text
    pub italic: bool,
    /// Underlined text
    pub underline: bool,
    /// Blinking text
    pub blink: bool,
    /// Inverse video (swap fg/bg)
    pub inverse: bool,
    /// Invisible text
    pub invisible: bool,
    /// Strikethrough text
    pub strikethrough: bool,
    /// Foreground color
    pub foreground: Color,
    /// Background color
    pub background: Color,
}

impl TextAttributes {
    /// Check if attributes are all default (no formatting).
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Attributes used for erased cells: everything reset except the
    /// background color, which erase operations carry over.
    pub fn erase_attrs(&self) -> Self {
        Self {
            background: self.background,
            ..Self::default()
        }
    }

    /// Create attributes with bold enabled.
    pub fn with_bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Create attributes with inverse video enabled.
    pub fn with_inverse(mut self) -> Self {
        self.inverse = true;
        self
    }

    /// Create attributes with underline enabled.
    pub fn with_underline(mut self) -> Self {
        self.underline = true;
        self
    }

    /// Create attributes with the given foreground color.
    pub fn with_foreground(mut self, color: Color) -> Self {
        self.foreground = color;
        self
    }

    /// Create attributes with the given background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }
}

/// Single character cell in the terminal grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Cell {
    /// Unicode character (space if blank)
    pub character: char,
    /// Attribute snapshot taken when the cell was written
    pub attrs: TextAttributes,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            character: ' ',
            attrs: TextAttributes::default(),
        }
    }
}

impl Cell {
    /// Create a new cell with a character and default styling.
    pub fn new(character: char) -> Self {
        Self {
            character,
            ..Default::default()
        }
    }

    /// Create a cell with a character and attribute snapshot.
    pub fn styled(character: char, attrs: TextAttributes) -> Self {
        Self { character, attrs }
    }

    /// A blank cell carrying the given attributes.
    pub fn blank(attrs: TextAttributes) -> Self {
        Self {
            character: ' ',
            attrs,
        }
    }

    /// Check if cell is empty (space with default attributes).
    pub fn is_empty(&self) -> bool {
        self.character == ' ' && self.attrs.is_default()
    }
}
