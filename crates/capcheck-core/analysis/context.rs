//! Evaluation context handed to each rule invocation

use crate::{
    analysis::config::AnalysisOptions,
    parser::{is_timestamp_line, next_parseable_block, parse_block_at, LineSource, TimestampBlock},
    segment::{Segment, SegmentKind},
};

/// How the segments of a pass were produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextMode {
    /// One segment per raw line; timing is rediscovered from the text
    Line,
    /// Segments come from a dialect segmenter
    Segment,
}

/// Everything a rule may look at for one segment
///
/// Rules never mutate anything; each call sees the full document so
/// cross-segment checks (runs, adjacency, baselines) stay possible.
#[derive(Clone, Copy)]
pub struct RuleContext<'a> {
    /// Segment being evaluated
    pub segment_index: usize,
    /// Every segment of the document
    pub segments: &'a [Segment],
    /// Raw document lines
    pub lines: &'a dyn LineSource,
    /// Active options
    pub options: &'a AnalysisOptions,
    /// Origin of the segments
    pub mode: ContextMode,
}

impl<'a> RuleContext<'a> {
    /// Create a context for one segment
    #[must_use]
    pub fn new(
        segment_index: usize,
        segments: &'a [Segment],
        lines: &'a dyn LineSource,
        options: &'a AnalysisOptions,
        mode: ContextMode,
    ) -> Self {
        Self {
            segment_index,
            segments,
            lines,
            options,
            mode,
        }
    }

    /// Current segment, absent for a document-scope call on an empty document
    #[must_use]
    pub fn segment(&self) -> Option<&'a Segment> {
        self.segments.get(self.segment_index)
    }

    /// Shorthand for `options.ignore_empty_lines`
    #[must_use]
    pub const fn ignore_empty_lines(&self) -> bool {
        self.options.ignore_empty_lines
    }

    /// Text lines of the current segment subject to text checks
    ///
    /// In line mode timestamp rows carry no visible text and are skipped.
    #[must_use]
    pub fn text_lines(&self) -> Vec<(usize, &'a str)> {
        let Some(segment) = self.segment() else {
            return Vec::new();
        };
        match self.mode {
            ContextMode::Line if is_timestamp_line(&segment.text) => Vec::new(),
            ContextMode::Line | ContextMode::Segment => segment.text_lines(),
        }
    }

    /// Timed block the current segment stands for
    ///
    /// Line mode parses a block at the current line, so only timestamp rows
    /// yield one. Segment mode rebuilds the block from a timed segment.
    #[must_use]
    pub fn timed_block(&self) -> Option<TimestampBlock> {
        let segment = self.segment()?;
        match self.mode {
            ContextMode::Line => {
                parse_block_at(self.lines, segment.line_index, self.ignore_empty_lines())
            }
            ContextMode::Segment => block_from_segment(segment),
        }
    }

    /// Timed block immediately following the current one
    #[must_use]
    pub fn next_timed_block(&self) -> Option<TimestampBlock> {
        match self.mode {
            ContextMode::Line => {
                let current = self.timed_block()?;
                next_parseable_block(self.lines, current.ts_line_index, self.ignore_empty_lines())
            }
            ContextMode::Segment => self
                .segments
                .get(self.segment_index + 1)
                .and_then(block_from_segment),
        }
    }
}

fn block_from_segment(segment: &Segment) -> Option<TimestampBlock> {
    match segment.kind {
        SegmentKind::Timed {
            ts_line_index,
            start_frame,
            end_frame,
        } => Some(TimestampBlock {
            ts_line_index,
            payload_line_index: segment.line_index,
            payload_text: segment.text.clone(),
            start_frame,
            end_frame,
        }),
        SegmentKind::Line | SegmentKind::Script { .. } => None,
    }
}
