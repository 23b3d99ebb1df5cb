//! Terminal preferences consumed by the emulator.
//!
//! Preferences are supplied once at construction (and the geometry again on
//! resize); the emulator never stores or persists them. Keys use the
//! kebab-case names web terminals traditionally use, so a YAML file such as
//!
//! ```yaml
//! columns: 120
//! rows: 40
//! max-string-sequence: 4096
//! ```
//!
//! overrides just those values.

use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::colors;
use crate::error::{Error, Result};
use crate::geometry::Size;

/// Default limit for DCS, OSC, PM and APC payloads.
pub const DEFAULT_MAX_STRING_SEQUENCE: usize = 100_000;

/// Terminal preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TerminalPreferences {
    /// Initial screen width in columns
    pub columns: u16,
    /// Initial screen height in rows
    pub rows: u16,
    /// Background color for text with no other color attributes
    pub background_color: String,
    /// Foreground color for text with no other color attributes
    pub foreground_color: String,
    /// Color of the visible cursor
    pub cursor_color: String,
    /// Font family handed to the renderer
    pub font_family: String,
    /// Font size in pixels, handed to the renderer
    pub font_size: u16,
    /// Anti-aliasing mode, handed to the renderer
    pub font_smoothing: String,
    /// Max length of a DCS, OSC, PM, or APC sequence before it is dropped
    pub max_string_sequence: usize,
    /// Render bold with a bold font (`true`), bright colors only (`false`),
    /// or let the renderer decide (`None`)
    pub enable_bold: Option<bool>,
    /// Recognize single-character C1 controls (U+0080..U+009F)
    #[serde(rename = "enable-8bit-control")]
    pub enable_8bit_control: bool,
    /// Lines of primary-buffer history kept above the visible screen
    pub scrollback_lines: usize,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for TerminalPreferences {
    fn default() -> Self {
        Self {
            columns: 80,
            rows: 24,
            background_color: "rgb(16, 16, 16)".to_string(),
            foreground_color: "rgb(240, 240, 240)".to_string(),
            cursor_color: "rgba(255,0,0,0.5)".to_string(),
            font_family: "\"DejaVu Sans Mono\", \"Everson Mono\", FreeMono, \"Menlo\", \"Terminal\", monospace".to_string(),
            font_size: 15,
            font_smoothing: "antialiased".to_string(),
            max_string_sequence: DEFAULT_MAX_STRING_SEQUENCE,
            enable_bold: None,
            enable_8bit_control: false,
            scrollback_lines: 10_000,
            log_level: "info".to_string(),
        }
    }
}

/// Renderer-facing defaults carried on every screen snapshot.
///
/// The emulator never interprets these; cells with default colors are drawn
/// with them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RenderTheme {
    /// Color for cells with the default background
    pub background_color: String,
    /// Color for cells with the default foreground
    pub foreground_color: String,
    /// Cursor color
    pub cursor_color: String,
    /// Font family
    pub font_family: String,
    /// Font size in pixels
    pub font_size: u16,
    /// Anti-aliasing mode
    pub font_smoothing: String,
    /// Bold rendering, see [`TerminalPreferences::enable_bold`]
    pub enable_bold: Option<bool>,
}

impl Default for RenderTheme {
    fn default() -> Self {
        TerminalPreferences::default().theme()
    }
}

impl TerminalPreferences {
    /// Load preferences from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse preferences from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let prefs: TerminalPreferences = serde_yaml::from_str(yaml)?;
        prefs.validate()?;
        Ok(prefs)
    }

    /// Validate preference values.
    pub fn validate(&self) -> Result<()> {
        if self.columns == 0 || self.rows == 0 {
            return Err(Error::InvalidDimensions {
                columns: self.columns,
                rows: self.rows,
            });
        }

        if self.max_string_sequence == 0 {
            return Err(Error::Config(
                "max-string-sequence must be > 0".to_string(),
            ));
        }

        for (key, value) in [
            ("background-color", &self.background_color),
            ("foreground-color", &self.foreground_color),
            ("cursor-color", &self.cursor_color),
        ] {
            colors::parse_css(value)
                .map_err(|e| Error::Config(format!("{key}: {e}")))?;
        }

        Ok(())
    }

    /// Initial screen size.
    pub fn size(&self) -> Size {
        Size::new(self.columns, self.rows)
    }

    /// Renderer-facing subset of the preferences.
    pub fn theme(&self) -> RenderTheme {
        RenderTheme {
            background_color: self.background_color.clone(),
            foreground_color: self.foreground_color.clone(),
            cursor_color: self.cursor_color.clone(),
            font_family: self.font_family.clone(),
            font_size: self.font_size,
            font_smoothing: self.font_smoothing.clone(),
            enable_bold: self.enable_bold,
        }
    }

    /// Override the initial screen size.
    pub fn with_size(mut self, size: Size) -> Self {
        self.columns = size.width;
        self.rows = size.height;
        self
    }
}
