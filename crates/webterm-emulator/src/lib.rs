//! # webterm-emulator
//!
//! Incremental terminal emulation for webterm.
//!
//! This crate provides:
//! - A resumable parse state and VT/xterm sequence interpreter
//! - The screen model: primary/alternate buffers, scrollback, cursor
//! - The IO routing stack for nested programs
//! - A terminal facade with pub/sub notifications and UTF-8 stream decoding
//!
//! ## Architecture
//!
//! This is Layer 1 in the architecture - it depends on webterm-core
//! and provides terminal emulation functionality.
//!
//! ```
//! use webterm_core::TerminalPreferences;
//! use webterm_emulator::Terminal;
//!
//! let mut terminal = Terminal::new(TerminalPreferences::default()).unwrap();
//! terminal.consume("\x1b[1mhello\x1b[0m\r\n");
//! assert_eq!(terminal.snapshot().lines[0], "hello");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod buffer;
pub mod io;
pub mod parse_state;
pub mod pubsub;
pub mod screen;
pub mod snapshot;
pub mod terminal;
pub mod utf8;
pub mod vt;

// Re-export commonly used types
pub use buffer::{Buffer, Row};
pub use io::{Dispatch, IoContext, IoHandler, IoStack, IoStats, LoggingHandler};
pub use parse_state::{ParseFunction, ParseState};
pub use pubsub::PubSub;
pub use screen::{Cursor, CursorStyle, Screen};
pub use snapshot::{ScreenSnapshot, SnapshotRow};
pub use terminal::{Terminal, TerminalEvent};
pub use utf8::Utf8Decoder;
pub use vt::{Vt, VtEvent, VtStats};
