//! Error types for the Polylemma library.
//!
//! All fallible operations return [`Result`], whose error side is the
//! [`PolylemmaError`] enum. Ordinary "word not recognized" outcomes are not
//! errors: the analyzer falls back to foundlings instead.
//!
//! # Examples
//!
//! ```
//! use polylemma::error::{PolylemmaError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(PolylemmaError::invalid_argument("empty language list"))
//! }
//!
//! assert!(example_operation().is_err());
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Polylemma operations.
///
/// Uses `thiserror` for the `Error` implementation and offers constructor
/// helpers for the string-carrying variants.
#[derive(Error, Debug)]
pub enum PolylemmaError {
    /// I/O errors (dictionary, stop-word or option files)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Analysis-related errors
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Malformed data (grammemes, language codes, data files)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Inconsistent configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid argument passed by the caller
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An analysis mode that the lemmer does not implement
    #[error("Unsupported mode: {0}")]
    UnsupportedMode(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with PolylemmaError.
pub type Result<T> = std::result::Result<T, PolylemmaError>;

impl PolylemmaError {
    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        PolylemmaError::Analysis(msg.into())
    }

    /// Create a new parse error.
    pub fn parse<S: Into<String>>(msg: S) -> Self {
        PolylemmaError::Parse(msg.into())
    }

    /// Create a new configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        PolylemmaError::Config(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        PolylemmaError::InvalidArgument(msg.into())
    }

    /// Create a new unsupported mode error.
    pub fn unsupported_mode<S: Into<String>>(msg: S) -> Self {
        PolylemmaError::UnsupportedMode(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        PolylemmaError::Other(msg.into())
    }
}
