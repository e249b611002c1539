//! Frame-based timing model
//!
//! Caption timecodes use the fixed `HH:MM:SS:FF` layout, where `FF` is a
//! frame number below the frame rate. Every timecode converts to a single
//! integer frame count so durations and contiguity checks are plain integer
//! arithmetic.
//!
//! # Example
//!
//! ```rust
//! use capcheck_core::timing::{parse_timecode, format_timecode, FRAME_RATE};
//!
//! let frames = parse_timecode("00:00:01:15")?;
//! assert_eq!(frames, FRAME_RATE + 15);
//! assert_eq!(format_timecode(frames), "00:00:01:15");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::utils::errors::{CoreError, Result};

/// Frame rate used by caption timecodes
pub const FRAME_RATE: u32 = 30;

/// Absolute frame count from the start of the programme
pub type Frame = u32;

/// Parse an `HH:MM:SS:FF` timecode at [`FRAME_RATE`]
///
/// # Errors
///
/// Returns an error if the layout is wrong, a field is not numeric,
/// minutes or seconds reach 60, or the frame field reaches the frame rate.
pub fn parse_timecode(timecode: &str) -> Result<Frame> {
    parse_timecode_at(timecode, FRAME_RATE)
}

/// Parse an `HH:MM:SS:FF` timecode at an explicit frame rate
///
/// # Errors
///
/// Same conditions as [`parse_timecode`]; additionally a zero rate is rejected.
pub fn parse_timecode_at(timecode: &str, rate: u32) -> Result<Frame> {
    if rate == 0 {
        return Err(CoreError::invalid_timecode(timecode, "frame rate must be positive"));
    }

    let bytes = timecode.as_bytes();
    if bytes.len() != 11 || bytes[2] != b':' || bytes[5] != b':' || bytes[8] != b':' {
        return Err(CoreError::invalid_timecode(timecode, "expected HH:MM:SS:FF"));
    }

    let field = |range: core::ops::Range<usize>| -> Result<u32> {
        let part = &timecode[range];
        if !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CoreError::invalid_timecode(timecode, "non-numeric field"));
        }
        Ok(part.parse::<u32>()?)
    };

    let hours = field(0..2)?;
    let minutes = field(3..5)?;
    let seconds = field(6..8)?;
    let frames = field(9..11)?;

    if minutes >= 60 {
        return Err(CoreError::invalid_timecode(timecode, "minutes must be < 60"));
    }
    if seconds >= 60 {
        return Err(CoreError::invalid_timecode(timecode, "seconds must be < 60"));
    }
    if frames >= rate {
        return Err(CoreError::invalid_timecode(timecode, "frame out of range"));
    }

    Ok(((hours * 60 + minutes) * 60 + seconds) * rate + frames)
}

/// Format a frame count as `HH:MM:SS:FF` at [`FRAME_RATE`]
#[must_use]
pub fn format_timecode(frames: Frame) -> String {
    format_timecode_at(frames, FRAME_RATE)
}

/// Format a frame count as `HH:MM:SS:FF` at an explicit frame rate
#[must_use]
pub fn format_timecode_at(frames: Frame, rate: u32) -> String {
    let rate = rate.max(1);
    let ff = frames % rate;
    let total_seconds = frames / rate;
    let ss = total_seconds % 60;
    let mm = (total_seconds / 60) % 60;
    let hh = total_seconds / 3600;
    format!("{hh:02}:{mm:02}:{ss:02}:{ff:02}")
}

/// Reading speed in characters per second
///
/// A zero-length duration yields positive infinity.
#[must_use]
pub fn characters_per_second(char_count: usize, duration_frames: Frame) -> f64 {
    if duration_frames == 0 {
        return f64::INFINITY;
    }
    char_count as f64 * f64::from(FRAME_RATE) / f64::from(duration_frames)
}
