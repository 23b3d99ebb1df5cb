//! # webterm-core
//!
//! Core types for webterm.
//!
//! This crate contains all fundamental types with **no internal dependencies**
//! on other webterm crates. It provides:
//!
//! - Geometry types (RowCol, Size, Bounds)
//! - Cell, color and text attribute types for the terminal grid
//! - CSS/X11 color conversions
//! - Terminal preferences
//! - IO context identifiers
//! - Error types
//!
//! ## Architecture
//!
//! This is Layer 0 in the architecture - all other crates depend on this one,
//! but this crate has no dependencies on other webterm crates.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cell;
pub mod colors;
pub mod config;
pub mod context;
pub mod error;
pub mod geometry;
pub mod util;

// Re-export commonly used types
pub use cell::{Cell, Color, TextAttributes};
pub use config::{RenderTheme, TerminalPreferences};
pub use context::ContextId;
pub use error::{Error, Result};
pub use geometry::{Bounds, RowCol, Size};
