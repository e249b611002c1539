//! Utility functions and shared types for capcheck core
//!
//! Contains the error type, hashing helpers and character-class tests
//! used across the parser, segmenter and rules.

pub mod errors;
pub mod hashers;
pub mod text;

pub use errors::{CoreError, Result};
pub use text::{contains_cjk, is_english_like};
