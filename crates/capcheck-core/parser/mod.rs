//! Timed-dialect parsing
//!
//! Turns raw lines into timestamp blocks and runs. All functions read
//! through [`LineSource`] and return `None` for malformed input instead of
//! erroring, so a single broken row never stops analysis.

pub mod block;
pub mod lines;
pub mod run;

pub use block::{
    is_timestamp_line, match_timestamp_line, next_timestamp_line, parse_block_at,
    parse_frame_range, TimestampBlock, TimestampMatch,
};
pub use lines::{normalize_line_endings, LineSource, TextLines};
pub use run::{
    collect_runs, is_continuation_of_previous, merge_forward, next_parseable_block,
    previous_block, Run,
};
