//! Error types for webterm.

use thiserror::Error;

use crate::ContextId;

/// Main error type for webterm operations.
///
/// Malformed terminal output never produces one of these: unknown or
/// oversized sequences are recovered inside the interpreter. Errors are
/// reserved for misuse of the API and for configuration problems.
#[derive(Debug, Error)]
pub enum Error {
    /// Write issued through an IO context that is not the active one
    #[error("Attempt to print from inactive IO context: {0}")]
    InactiveContext(ContextId),

    /// IO context is not on the terminal's stack
    #[error("Unknown IO context: {0}")]
    UnknownContext(ContextId),

    /// Invalid terminal dimensions
    #[error("Invalid dimensions: {columns}x{rows}")]
    InvalidDimensions {
        /// Number of columns
        columns: u16,
        /// Number of rows
        rows: u16,
    },

    /// Unparseable color value
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// YAML parse errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error with custom message
    #[error("{0}")]
    Other(String),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
