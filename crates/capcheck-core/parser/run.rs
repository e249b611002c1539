//! Run merging and continuation detection
//!
//! Caption tools often split one on-screen cue into several timestamp rows
//! that repeat the same payload with back-to-back timing. A [`Run`] glues
//! those rows together so reading speed is measured over the whole time the
//! text is visible, and so each cue is reported once instead of per row.

use super::{
    block::{is_timestamp_line, next_timestamp_line, parse_block_at, TimestampBlock},
    lines::LineSource,
};
use crate::{timing::Frame, utils::text::is_blank};

/// Maximal chain of frame-contiguous blocks sharing one payload
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Run {
    /// Timestamp line of the first block
    pub start_ts_line_index: usize,
    /// Timestamp line of the last block
    pub end_ts_line_index: usize,
    /// Payload line of the first block
    pub start_payload_line_index: usize,
    /// Payload line of the last block
    pub end_payload_line_index: usize,
    /// Start frame of the first block
    pub start_frame: Frame,
    /// End frame of the last block
    pub end_frame: Frame,
    /// Shared payload text
    pub payload_text: String,
    /// Number of raw rows merged
    pub block_count: usize,
}

impl Run {
    /// Single-block run
    #[must_use]
    pub fn from_block(block: &TimestampBlock) -> Self {
        Self {
            start_ts_line_index: block.ts_line_index,
            end_ts_line_index: block.ts_line_index,
            start_payload_line_index: block.payload_line_index,
            end_payload_line_index: block.payload_line_index,
            start_frame: block.start_frame,
            end_frame: block.end_frame,
            payload_text: block.payload_text.clone(),
            block_count: 1,
        }
    }

    /// Total on-screen duration in frames
    #[must_use]
    pub const fn duration_frames(&self) -> Frame {
        self.end_frame - self.start_frame
    }

    fn absorb(&mut self, block: &TimestampBlock) {
        self.end_ts_line_index = block.ts_line_index;
        self.end_payload_line_index = block.payload_line_index;
        self.end_frame = block.end_frame;
        self.block_count += 1;
    }
}

/// Extend `block` forward over every contiguous row with the same payload
///
/// Stops at the first following timestamp row that fails to parse, carries
/// different text, or starts at a frame other than the running end frame.
///
/// # Example
///
/// ```rust
/// use capcheck_core::parser::{merge_forward, parse_block_at, TextLines};
///
/// let lines = TextLines::new(
///     "00:00:00:00\t00:00:01:00\nHi\n00:00:01:00\t00:00:02:00\nHi",
/// );
/// let first = parse_block_at(&lines, 0, false).unwrap();
/// let run = merge_forward(&lines, &first, false);
/// assert_eq!(run.end_frame, 60);
/// assert_eq!(run.block_count, 2);
/// ```
#[must_use]
pub fn merge_forward<L: LineSource + ?Sized>(
    lines: &L,
    block: &TimestampBlock,
    ignore_empty_lines: bool,
) -> Run {
    let mut run = Run::from_block(block);
    let mut cursor = block.ts_line_index;

    while let Some(next_ts) = next_timestamp_line(lines, cursor, ignore_empty_lines) {
        let Some(next) = parse_block_at(lines, next_ts, ignore_empty_lines) else {
            break;
        };
        if next.payload_text != block.payload_text || next.start_frame != run.end_frame {
            break;
        }
        run.absorb(&next);
        cursor = next_ts;
    }

    run
}

/// Nearest valid block before `block`, scanning backward
///
/// Timestamp rows that fail to parse are skipped. A blank line ends the scan
/// unless `ignore_empty_lines` is set.
#[must_use]
pub fn previous_block<L: LineSource + ?Sized>(
    lines: &L,
    block: &TimestampBlock,
    ignore_empty_lines: bool,
) -> Option<TimestampBlock> {
    for index in (0..block.ts_line_index).rev() {
        let line = lines.line_or_empty(index);
        if is_blank(line) {
            if ignore_empty_lines {
                continue;
            }
            return None;
        }
        if !is_timestamp_line(line) {
            continue;
        }
        if let Some(prev) = parse_block_at(lines, index, ignore_empty_lines) {
            return Some(prev);
        }
    }
    None
}

/// Check whether `block` continues the run of the block before it
///
/// Only the first valid block found walking backward is considered; a
/// better match further back never counts.
#[must_use]
pub fn is_continuation_of_previous<L: LineSource + ?Sized>(
    lines: &L,
    block: &TimestampBlock,
    ignore_empty_lines: bool,
) -> bool {
    previous_block(lines, block, ignore_empty_lines).is_some_and(|prev| {
        prev.payload_text == block.payload_text && prev.end_frame == block.start_frame
    })
}

/// First parseable block after `index`, scanning past any other lines
#[must_use]
pub fn next_parseable_block<L: LineSource + ?Sized>(
    lines: &L,
    index: usize,
    ignore_empty_lines: bool,
) -> Option<TimestampBlock> {
    (index + 1..lines.line_count())
        .find_map(|candidate| parse_block_at(lines, candidate, ignore_empty_lines))
}

/// Every run in the document, in order, each reported once
#[must_use]
pub fn collect_runs<L: LineSource + ?Sized>(lines: &L, ignore_empty_lines: bool) -> Vec<Run> {
    (0..lines.line_count())
        .filter_map(|index| parse_block_at(lines, index, ignore_empty_lines))
        .filter(|block| !is_continuation_of_previous(lines, block, ignore_empty_lines))
        .map(|block| merge_forward(lines, &block, ignore_empty_lines))
        .collect()
}
