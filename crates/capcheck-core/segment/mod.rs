//! Segmentation of raw documents into rule-evaluation units
//!
//! Two dialects are supported:
//!
//! - **Subs**: tab-separated timecode rows, one [`Segment`] per block
//! - **News**: bilingual VO/SUPER scripts, one [`Segment`] per paired
//!   source/target block
//!
//! A third, degenerate shape wraps every raw line as its own segment so
//! whole-document rules can run in line mode through the same contract.

use crate::{
    parser::{is_timestamp_line, LineSource},
    timing::Frame,
    utils::text::is_english_like,
};

mod news;
mod subs;

pub use news::parse_news;
pub use subs::parse_subs;

/// Dialect of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ScriptType {
    /// Timed caption rows
    Subs,
    /// VO/SUPER news script
    News,
}

/// Kind of news-script block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum BlockType {
    /// Voice-over narration
    Vo,
    /// On-screen super (lower third, caption graphic)
    Super,
}

/// Variant-specific part of a segment
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "kind", rename_all = "lowercase", rename_all_fields = "camelCase")
)]
pub enum SegmentKind {
    /// One raw document line (line-mode adapter)
    Line,
    /// One timestamp block of the caption dialect
    Timed {
        /// Line holding the timecodes
        ts_line_index: usize,
        /// Start frame
        start_frame: Frame,
        /// End frame
        end_frame: Frame,
    },
    /// One source/target block of the news dialect
    Script {
        /// VO or SUPER
        block_type: BlockType,
        /// Source lines joined with `\n`
        source_text: String,
        /// Line index of every source line
        source_line_indices: Vec<usize>,
        /// Line index of every target line, matching the lines of `text`
        target_line_indices: Vec<usize>,
    },
}

/// Unit of text a rule evaluates
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Segment {
    /// Anchor line used for reporting
    pub line_index: usize,
    /// Last document line covered by the segment
    pub end_line_index: usize,
    /// Evaluated text (payload, or joined target lines)
    pub text: String,
    /// Whether the text reads as English and is subject to style rules
    pub english_like: bool,
    /// Variant data
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub kind: SegmentKind,
}

impl Segment {
    /// Degenerate single-line segment
    #[must_use]
    pub fn line(line_index: usize, text: &str) -> Self {
        Self {
            line_index,
            end_line_index: line_index,
            text: text.to_string(),
            english_like: is_english_like(text),
            kind: SegmentKind::Line,
        }
    }

    /// Timing of a timed segment as `(ts_line_index, start, end)`
    #[must_use]
    pub const fn timing(&self) -> Option<(usize, Frame, Frame)> {
        match self.kind {
            SegmentKind::Timed {
                ts_line_index,
                start_frame,
                end_frame,
            } => Some((ts_line_index, start_frame, end_frame)),
            SegmentKind::Line | SegmentKind::Script { .. } => None,
        }
    }

    /// Check whether this is a timed caption segment
    #[must_use]
    pub const fn is_timed(&self) -> bool {
        matches!(self.kind, SegmentKind::Timed { .. })
    }

    /// Source text of a script segment
    #[must_use]
    pub fn source_text(&self) -> Option<&str> {
        match &self.kind {
            SegmentKind::Script { source_text, .. } => Some(source_text),
            SegmentKind::Line | SegmentKind::Timed { .. } => None,
        }
    }

    /// Block type of a script segment
    #[must_use]
    pub const fn block_type(&self) -> Option<BlockType> {
        match &self.kind {
            SegmentKind::Script { block_type, .. } => Some(*block_type),
            SegmentKind::Line | SegmentKind::Timed { .. } => None,
        }
    }

    /// Each visible text line with the document line it came from
    ///
    /// Line and timed segments yield their single line; script segments
    /// yield one entry per target line.
    #[must_use]
    pub fn text_lines(&self) -> Vec<(usize, &str)> {
        match &self.kind {
            SegmentKind::Script {
                target_line_indices,
                ..
            } => target_line_indices
                .iter()
                .copied()
                .zip(self.text.split('\n'))
                .collect(),
            SegmentKind::Line | SegmentKind::Timed { .. } => {
                vec![(self.line_index, self.text.as_str())]
            }
        }
    }
}

/// Wrap every line as its own [`SegmentKind::Line`] segment
#[must_use]
pub fn line_segments<L: LineSource + ?Sized>(lines: &L) -> Vec<Segment> {
    (0..lines.line_count())
        .map(|index| Segment::line(index, lines.line_or_empty(index)))
        .collect()
}

/// Guess the dialect: any timestamp row means captions
#[must_use]
pub fn detect_script_type<L: LineSource + ?Sized>(lines: &L) -> ScriptType {
    let timed = (0..lines.line_count()).any(|index| is_timestamp_line(lines.line_or_empty(index)));
    if timed {
        ScriptType::Subs
    } else {
        ScriptType::News
    }
}

/// Segment a document under the given dialect
#[must_use]
pub fn segment_lines<L: LineSource + ?Sized>(
    lines: &L,
    script_type: ScriptType,
    ignore_empty_lines: bool,
) -> Vec<Segment> {
    match script_type {
        ScriptType::Subs => parse_subs(lines, ignore_empty_lines),
        ScriptType::News => parse_news(lines),
    }
}
