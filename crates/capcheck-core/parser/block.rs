//! Timestamp line matching and block parsing
//!
//! A timestamp line carries two `HH:MM:SS:FF` timecodes separated by one
//! or more tabs. Leading markers before the first timecode are tolerated,
//! and tab-separated inline text may follow the second timecode:
//!
//! ```text
//! *00:00:01:00\t00:00:03:15\tinline note
//! Payload text shown on screen
//! ```
//!
//! A block is a timestamp line plus the first payload line after it.
//! Parsing never fails loudly: any malformation yields `None` and the
//! caller moves on to the next line.

use super::lines::LineSource;
use crate::{
    timing::{parse_timecode, Frame},
    utils::text::is_blank,
};

/// Byte length of an `HH:MM:SS:FF` timecode
const TIMECODE_LEN: usize = 11;

/// Raw timecode pair found on a timestamp line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestampMatch<'a> {
    /// First timecode as written
    pub start: &'a str,
    /// Second timecode as written
    pub end: &'a str,
    /// Tab-separated text trailing the second timecode, if any
    pub inline_text: Option<&'a str>,
}

/// One timestamp row and its payload line
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct TimestampBlock {
    /// Line holding the timecodes
    pub ts_line_index: usize,
    /// Line holding the payload text
    pub payload_line_index: usize,
    /// Payload line exactly as written
    pub payload_text: String,
    /// Start frame, inclusive
    pub start_frame: Frame,
    /// End frame, never below `start_frame`
    pub end_frame: Frame,
}

impl TimestampBlock {
    /// On-screen duration in frames
    #[must_use]
    pub const fn duration_frames(&self) -> Frame {
        self.end_frame - self.start_frame
    }
}

/// Check the `DD:DD:DD:DD` shape at `pos` without validating ranges
fn has_timecode_shape(bytes: &[u8], pos: usize) -> bool {
    let Some(window) = bytes.get(pos..pos + TIMECODE_LEN) else {
        return false;
    };
    window.iter().enumerate().all(|(i, b)| {
        if i % 3 == 2 {
            *b == b':'
        } else {
            b.is_ascii_digit()
        }
    })
}

/// Find the timecode pair on a line
///
/// # Example
///
/// ```rust
/// use capcheck_core::parser::match_timestamp_line;
///
/// let m = match_timestamp_line(">>00:00:01:00\t\t00:00:02:00\tnote").unwrap();
/// assert_eq!(m.start, "00:00:01:00");
/// assert_eq!(m.end, "00:00:02:00");
/// assert_eq!(m.inline_text, Some("note"));
///
/// assert!(match_timestamp_line("00:00:01:00 00:00:02:00").is_none());
/// ```
#[must_use]
pub fn match_timestamp_line(line: &str) -> Option<TimestampMatch<'_>> {
    let bytes = line.as_bytes();
    if bytes.len() < TIMECODE_LEN * 2 + 1 {
        return None;
    }

    for pos in 0..=bytes.len() - (TIMECODE_LEN * 2 + 1) {
        if !has_timecode_shape(bytes, pos) {
            continue;
        }

        let mut cursor = pos + TIMECODE_LEN;
        let tabs_start = cursor;
        while bytes.get(cursor) == Some(&b'\t') {
            cursor += 1;
        }
        if cursor == tabs_start || !has_timecode_shape(bytes, cursor) {
            continue;
        }

        let end_pos = cursor;
        cursor += TIMECODE_LEN;
        let rest = &line[cursor..];

        let inline_text = if rest.trim().is_empty() {
            None
        } else if rest.starts_with('\t') {
            let text = rest.trim_start_matches('\t').trim_end();
            (!text.is_empty()).then_some(text)
        } else {
            continue;
        };

        return Some(TimestampMatch {
            start: &line[pos..pos + TIMECODE_LEN],
            end: &line[end_pos..end_pos + TIMECODE_LEN],
            inline_text,
        });
    }

    None
}

/// Check whether a line has the timestamp layout
#[must_use]
pub fn is_timestamp_line(line: &str) -> bool {
    match_timestamp_line(line).is_some()
}

/// Parse both timecodes of a timestamp line into frames
///
/// Returns `None` if the line has no timecode pair, either timecode is out
/// of range, or the range is inverted.
#[must_use]
pub fn parse_frame_range(line: &str) -> Option<(Frame, Frame)> {
    let m = match_timestamp_line(line)?;
    let start = parse_timecode(m.start).ok()?;
    let end = parse_timecode(m.end).ok()?;
    (end >= start).then_some((start, end))
}

/// Parse the block whose timestamp line is at `index`
///
/// The payload is the first non-blank, non-timestamp line after the
/// timestamp. Blank lines end the search unless `ignore_empty_lines` is
/// set; the next timestamp line or end of input always ends it.
///
/// # Example
///
/// ```rust
/// use capcheck_core::parser::{parse_block_at, TextLines};
///
/// let lines = TextLines::new("00:00:00:00\t00:00:01:00\nHello");
/// let block = parse_block_at(&lines, 0, false).unwrap();
/// assert_eq!(block.payload_line_index, 1);
/// assert_eq!(block.duration_frames(), 30);
/// ```
#[must_use]
pub fn parse_block_at<L: LineSource + ?Sized>(
    lines: &L,
    index: usize,
    ignore_empty_lines: bool,
) -> Option<TimestampBlock> {
    let (start_frame, end_frame) = parse_frame_range(lines.line(index)?)?;
    let payload_line_index = find_payload_line(lines, index, ignore_empty_lines)?;

    Some(TimestampBlock {
        ts_line_index: index,
        payload_line_index,
        payload_text: lines.line_or_empty(payload_line_index).to_string(),
        start_frame,
        end_frame,
    })
}

/// Locate the payload line following the timestamp at `ts_index`
fn find_payload_line<L: LineSource + ?Sized>(
    lines: &L,
    ts_index: usize,
    ignore_empty_lines: bool,
) -> Option<usize> {
    for index in ts_index + 1..lines.line_count() {
        let line = lines.line_or_empty(index);
        if is_timestamp_line(line) {
            return None;
        }
        if is_blank(line) {
            if ignore_empty_lines {
                continue;
            }
            return None;
        }
        return Some(index);
    }
    None
}

/// Index of the next timestamp-formatted line after `index`
///
/// Stops early at a blank line unless `ignore_empty_lines` is set.
#[must_use]
pub fn next_timestamp_line<L: LineSource + ?Sized>(
    lines: &L,
    index: usize,
    ignore_empty_lines: bool,
) -> Option<usize> {
    for candidate in index + 1..lines.line_count() {
        let line = lines.line_or_empty(candidate);
        if is_timestamp_line(line) {
            return Some(candidate);
        }
        if is_blank(line) && !ignore_empty_lines {
            return None;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::TextLines;

    #[test]
    fn matches_plain_timestamp_line() {
        let m = match_timestamp_line("00:00:01:00\t00:00:02:15").unwrap();
        assert_eq!(m.start, "00:00:01:00");
        assert_eq!(m.end, "00:00:02:15");
        assert_eq!(m.inline_text, None);
    }

    #[test]
    fn tolerates_leading_marker_and_trailing_text() {
        let m = match_timestamp_line("* 00:00:01:00\t00:00:02:15\t\tNote here  ").unwrap();
        assert_eq!(m.start, "00:00:01:00");
        assert_eq!(m.inline_text, Some("Note here"));
    }

    #[test]
    fn rejects_space_separator_and_junk_suffix() {
        assert!(match_timestamp_line("00:00:01:00 00:00:02:15").is_none());
        assert!(match_timestamp_line("00:00:01:00\t00:00:02:15x").is_none());
        assert!(match_timestamp_line("Hello world").is_none());
        assert!(match_timestamp_line("").is_none());
    }

    #[test]
    fn frame_range_validation() {
        assert_eq!(parse_frame_range("00:00:01:00\t00:00:02:00"), Some((30, 60)));
        assert_eq!(parse_frame_range("00:00:02:00\t00:00:01:00"), None);
        assert_eq!(parse_frame_range("00:00:01:30\t00:00:02:00"), None);
        assert_eq!(parse_frame_range("00:00:01:00\t00:00:01:00"), Some((30, 30)));
    }

    #[test]
    fn parse_block_finds_payload() {
        let lines = TextLines::new("00:00:00:00\t00:00:01:00\nHello\n");
        let block = parse_block_at(&lines, 0, false).unwrap();
        assert_eq!(block.ts_line_index, 0);
        assert_eq!(block.payload_line_index, 1);
        assert_eq!(block.payload_text, "Hello");
        assert_eq!(block.start_frame, 0);
        assert_eq!(block.end_frame, 30);
    }

    #[test]
    fn blank_line_breaks_payload_search_unless_ignored() {
        let lines = TextLines::new("00:00:00:00\t00:00:01:00\n\nHello");
        assert!(parse_block_at(&lines, 0, false).is_none());
        let block = parse_block_at(&lines, 0, true).unwrap();
        assert_eq!(block.payload_line_index, 2);
    }

    #[test]
    fn next_timestamp_line_is_not_a_payload() {
        let lines = TextLines::new("00:00:00:00\t00:00:01:00\n00:00:01:00\t00:00:02:00\nText");
        assert!(parse_block_at(&lines, 0, false).is_none());
        assert!(parse_block_at(&lines, 1, false).is_some());
    }

    #[test]
    fn out_of_range_and_non_timestamp_indices() {
        let lines = TextLines::new("Just text");
        assert!(parse_block_at(&lines, 0, false).is_none());
        assert!(parse_block_at(&lines, 5, false).is_none());
    }

    #[test]
    fn next_timestamp_line_scan() {
        let lines = TextLines::new("00:00:00:00\t00:00:01:00\nA\n\n00:00:01:00\t00:00:02:00\nB");
        assert_eq!(next_timestamp_line(&lines, 0, false), None);
        assert_eq!(next_timestamp_line(&lines, 0, true), Some(3));
    }
}
