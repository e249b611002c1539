//! Core error type for capcheck operations
//!
//! Caption text itself never produces an error: malformed timestamps and
//! orphaned payloads are skipped by the parser. `CoreError` covers the
//! fallible edges around the pipeline, namely strict timecode parsing,
//! user-supplied term lists and option loading.

use core::fmt;
use thiserror::Error;

/// Main error type for capcheck core operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Timecode did not match `HH:MM:SS:FF` or had an out-of-range field
    #[error("Invalid timecode: {0}")]
    InvalidTimecode(String),

    /// Options or term lists could not be loaded
    #[error("Configuration error: {0}")]
    InvalidConfig(String),

    /// A matcher built from user terms failed to compile
    #[error("Invalid pattern for term '{term}': {message}")]
    InvalidPattern { term: String, message: String },
}

impl CoreError {
    /// Create timecode error with the offending input and a reason
    pub fn invalid_timecode<T: fmt::Display>(timecode: T, reason: &str) -> Self {
        Self::InvalidTimecode(format!("{timecode} ({reason})"))
    }

    /// Create configuration error from message
    pub fn config<T: fmt::Display>(message: T) -> Self {
        Self::InvalidConfig(format!("{message}"))
    }

    /// Create pattern error for a user term
    pub fn pattern<T: fmt::Display>(term: &str, message: T) -> Self {
        Self::InvalidPattern {
            term: term.to_string(),
            message: format!("{message}"),
        }
    }

    /// Check if error is recoverable
    ///
    /// A bad timecode only affects one row, so analysis can continue.
    /// Configuration problems must be fixed before analysis is meaningful.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::InvalidTimecode(_) => true,
            Self::InvalidConfig(_) | Self::InvalidPattern { .. } => false,
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = core::result::Result<T, CoreError>;
