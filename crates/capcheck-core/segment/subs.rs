//! Caption-dialect segmentation

use super::{Segment, SegmentKind};
use crate::{
    parser::{parse_block_at, LineSource},
    utils::text::is_english_like,
};

/// One timed segment per parseable block, anchored at the payload line
///
/// Continuation rows are kept as their own segments; rules that measure
/// a whole cue collapse them through the run merger.
///
/// # Example
///
/// ```rust
/// use capcheck_core::{parser::TextLines, segment::parse_subs};
///
/// let lines = TextLines::new("00:00:00:00\t00:00:01:00\nHello there\nbroken line");
/// let segments = parse_subs(&lines, false);
/// assert_eq!(segments.len(), 1);
/// assert_eq!(segments[0].line_index, 1);
/// assert!(segments[0].english_like);
/// ```
#[must_use]
pub fn parse_subs<L: LineSource + ?Sized>(lines: &L, ignore_empty_lines: bool) -> Vec<Segment> {
    (0..lines.line_count())
        .filter_map(|index| parse_block_at(lines, index, ignore_empty_lines))
        .map(|block| Segment {
            line_index: block.payload_line_index,
            end_line_index: block.payload_line_index,
            english_like: is_english_like(&block.payload_text),
            text: block.payload_text,
            kind: SegmentKind::Timed {
                ts_line_index: block.ts_line_index,
                start_frame: block.start_frame,
                end_frame: block.end_frame,
            },
        })
        .collect()
}
