//! Error types for capcheck
//!
//! # Error Philosophy
//!
//! - Use `thiserror` for structured error handling (no `anyhow` bloat)
//! - Malformed caption input is never an error, only an absent result
//! - Configuration mistakes surface early, at rule or option construction
//!
//! # Examples
//!
//! ```rust
//! use capcheck_core::utils::errors::CoreError;
//!
//! let err = CoreError::invalid_timecode("00:00:00:45", "frame out of range");
//! assert!(err.is_recoverable());
//! ```

mod core;

pub use self::core::{CoreError, Result};

/// Convert from integer parse errors
impl From<::core::num::ParseIntError> for CoreError {
    fn from(err: ::core::num::ParseIntError) -> Self {
        Self::InvalidTimecode(format!("Integer parse error: {err}"))
    }
}

/// Convert from option (de)serialization errors
#[cfg(feature = "serde")]
impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidConfig(format!("{err}"))
    }
}
