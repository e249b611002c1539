//! Raw measurements produced by rules
//!
//! [`Metric`] is a closed sum type: every rule emits one of these variants
//! and downstream code matches exhaustively. Serialized form is an object
//! tagged by a `type` field, e.g.
//!
//! ```json
//! {"type":"MERGE_CANDIDATE","lineIndex":4,"nextLineIndex":6,"gapFrames":30,"editDistance":1, ...}
//! ```

use crate::{segment::BlockType, timing::Frame};
use bitflags::bitflags;
use core::fmt;

/// Type tag of a metric or finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum MetricKind {
    MaxChars,
    LeadingWhitespace,
    Cps,
    MaxCps,
    MinCps,
    CpsBalance,
    MergeCandidate,
    NumberStyle,
    PercentStyle,
    Capitalization,
    Punctuation,
    Baseline,
    MissingTranslation,
}

bitflags! {
    /// Set of metric kinds, used to filter output
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MetricKinds: u16 {
        const MAX_CHARS = 1 << 0;
        const LEADING_WHITESPACE = 1 << 1;
        const CPS = 1 << 2;
        const MAX_CPS = 1 << 3;
        const MIN_CPS = 1 << 4;
        const CPS_BALANCE = 1 << 5;
        const MERGE_CANDIDATE = 1 << 6;
        const NUMBER_STYLE = 1 << 7;
        const PERCENT_STYLE = 1 << 8;
        const CAPITALIZATION = 1 << 9;
        const PUNCTUATION = 1 << 10;
        const BASELINE = 1 << 11;
        const MISSING_TRANSLATION = 1 << 12;
    }
}

impl MetricKind {
    /// Every kind, in declaration order
    pub const ALL: [Self; 13] = [
        Self::MaxChars,
        Self::LeadingWhitespace,
        Self::Cps,
        Self::MaxCps,
        Self::MinCps,
        Self::CpsBalance,
        Self::MergeCandidate,
        Self::NumberStyle,
        Self::PercentStyle,
        Self::Capitalization,
        Self::Punctuation,
        Self::Baseline,
        Self::MissingTranslation,
    ];

    /// Wire tag, e.g. `MAX_CHARS`
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MaxChars => "MAX_CHARS",
            Self::LeadingWhitespace => "LEADING_WHITESPACE",
            Self::Cps => "CPS",
            Self::MaxCps => "MAX_CPS",
            Self::MinCps => "MIN_CPS",
            Self::CpsBalance => "CPS_BALANCE",
            Self::MergeCandidate => "MERGE_CANDIDATE",
            Self::NumberStyle => "NUMBER_STYLE",
            Self::PercentStyle => "PERCENT_STYLE",
            Self::Capitalization => "CAPITALIZATION",
            Self::Punctuation => "PUNCTUATION",
            Self::Baseline => "BASELINE",
            Self::MissingTranslation => "MISSING_TRANSLATION",
        }
    }

    /// Parse a wire tag
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == tag)
    }

    /// Single-bit flag for this kind
    #[must_use]
    pub const fn flag(self) -> MetricKinds {
        match self {
            Self::MaxChars => MetricKinds::MAX_CHARS,
            Self::LeadingWhitespace => MetricKinds::LEADING_WHITESPACE,
            Self::Cps => MetricKinds::CPS,
            Self::MaxCps => MetricKinds::MAX_CPS,
            Self::MinCps => MetricKinds::MIN_CPS,
            Self::CpsBalance => MetricKinds::CPS_BALANCE,
            Self::MergeCandidate => MetricKinds::MERGE_CANDIDATE,
            Self::NumberStyle => MetricKinds::NUMBER_STYLE,
            Self::PercentStyle => MetricKinds::PERCENT_STYLE,
            Self::Capitalization => MetricKinds::CAPITALIZATION,
            Self::Punctuation => MetricKinds::PUNCTUATION,
            Self::Baseline => MetricKinds::BASELINE,
            Self::MissingTranslation => MetricKinds::MISSING_TRANSLATION,
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl MetricKinds {
    /// Check whether a metric survives this filter
    ///
    /// Raw `CPS` metrics are kept whenever any CPS-derived kind is enabled,
    /// since they are only an intermediate for `MAX_CPS` / `MIN_CPS`.
    #[must_use]
    pub const fn allows(self, kind: MetricKind) -> bool {
        match kind {
            MetricKind::Cps => self.intersects(Self::CPS.union(Self::MAX_CPS).union(Self::MIN_CPS)),
            other => self.contains(other.flag()),
        }
    }
}

impl FromIterator<MetricKind> for MetricKinds {
    fn from_iter<I: IntoIterator<Item = MetricKind>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::empty(), |acc, kind| acc | kind.flag())
    }
}

/// Line longer than the configured maximum
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct MaxCharsMetric {
    pub line_index: usize,
    pub text: String,
    pub char_count: usize,
    pub max_chars: usize,
}

/// Line that starts with whitespace
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct LeadingWhitespaceMetric {
    pub line_index: usize,
    pub text: String,
}

/// Reading speed of one run
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CpsMetric {
    /// Payload line of the first block of the run
    pub line_index: usize,
    pub ts_line_index: usize,
    pub text: String,
    /// Characters per second; infinite for zero-length runs
    pub cps: f64,
    pub char_count: usize,
    pub start_frame: Frame,
    pub end_frame: Frame,
    pub duration_frames: Frame,
}

/// Reading speed outside a configured limit
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CpsLimitMetric {
    pub line_index: usize,
    pub ts_line_index: usize,
    pub text: String,
    pub cps: f64,
    /// The limit that was crossed
    pub limit: f64,
    pub char_count: usize,
    pub duration_frames: Frame,
}

impl CpsLimitMetric {
    /// Attach a limit to a raw reading-speed measurement
    #[must_use]
    pub fn from_cps(cps: &CpsMetric, limit: f64) -> Self {
        Self {
            line_index: cps.line_index,
            ts_line_index: cps.ts_line_index,
            text: cps.text.clone(),
            cps: cps.cps,
            limit,
            char_count: cps.char_count,
            duration_frames: cps.duration_frames,
        }
    }
}

/// Reading-speed jump between adjacent runs
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CpsBalanceMetric {
    /// Payload line of the faster run
    pub line_index: usize,
    pub current_line_index: usize,
    pub next_line_index: usize,
    pub current_cps: f64,
    pub next_cps: f64,
    pub delta_cps: f64,
}

/// Adjacent cues that are near-duplicates
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct MergeCandidateMetric {
    pub line_index: usize,
    pub next_line_index: usize,
    pub gap_frames: Frame,
    pub edit_distance: usize,
    pub text: String,
    pub next_text: String,
}

/// How a number is written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum NumberForm {
    Digits,
    Words,
}

/// Number written in the wrong form
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct NumberStyleMetric {
    pub line_index: usize,
    pub token: String,
    pub value: u64,
    pub found: NumberForm,
    pub expected: NumberForm,
    /// Character offset of the token within the line
    pub column: usize,
}

/// `N percent` that should read `N%`
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PercentStyleMetric {
    pub line_index: usize,
    pub token: String,
    pub expected: String,
    pub column: usize,
}

/// Configured term written with the wrong capitalization
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CapitalizationMetric {
    pub line_index: usize,
    pub found: String,
    pub expected: String,
    pub column: usize,
}

/// Punctuation and quote-balance issue codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum PunctuationCode {
    UnmatchedOpeningQuote,
    UnmatchedClosingQuote,
    MissingOpeningQuoteContinuation,
    LowercaseAfterPeriod,
    MissingPunctuationBeforeCapital,
    MissingColonBeforeQuote,
    MissingEndPunctuation,
}

/// Punctuation or quote-balance issue
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PunctuationMetric {
    pub line_index: usize,
    pub code: PunctuationCode,
    pub text: String,
    /// Cue the issue is measured against, for cross-cue checks
    pub previous_line_index: Option<usize>,
}

/// Why a baseline entry was reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum BaselineReason {
    /// Baseline entry absent from the current text
    Missing,
    /// Current entry absent from the baseline
    Extra,
    /// Same timing, different inline text
    InlineText,
}

/// Drift from the baseline transcript
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct BaselineMetric {
    pub line_index: usize,
    pub reason: BaselineReason,
    pub baseline_line_index: Option<usize>,
    pub current_line_index: Option<usize>,
    /// Start timecode as written
    pub start: String,
    /// End timecode as written
    pub end: String,
    pub expected: Option<String>,
    pub found: Option<String>,
}

/// Source block with no translation
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct MissingTranslationMetric {
    pub line_index: usize,
    pub source_text: String,
    pub block_type: BlockType,
}

/// Measurement emitted by a rule
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")
)]
pub enum Metric {
    MaxChars(MaxCharsMetric),
    LeadingWhitespace(LeadingWhitespaceMetric),
    Cps(CpsMetric),
    MaxCps(CpsLimitMetric),
    MinCps(CpsLimitMetric),
    CpsBalance(CpsBalanceMetric),
    MergeCandidate(MergeCandidateMetric),
    NumberStyle(NumberStyleMetric),
    PercentStyle(PercentStyleMetric),
    Capitalization(CapitalizationMetric),
    Punctuation(PunctuationMetric),
    Baseline(BaselineMetric),
    MissingTranslation(MissingTranslationMetric),
}

impl Metric {
    /// Type tag
    #[must_use]
    pub const fn kind(&self) -> MetricKind {
        match self {
            Self::MaxChars(_) => MetricKind::MaxChars,
            Self::LeadingWhitespace(_) => MetricKind::LeadingWhitespace,
            Self::Cps(_) => MetricKind::Cps,
            Self::MaxCps(_) => MetricKind::MaxCps,
            Self::MinCps(_) => MetricKind::MinCps,
            Self::CpsBalance(_) => MetricKind::CpsBalance,
            Self::MergeCandidate(_) => MetricKind::MergeCandidate,
            Self::NumberStyle(_) => MetricKind::NumberStyle,
            Self::PercentStyle(_) => MetricKind::PercentStyle,
            Self::Capitalization(_) => MetricKind::Capitalization,
            Self::Punctuation(_) => MetricKind::Punctuation,
            Self::Baseline(_) => MetricKind::Baseline,
            Self::MissingTranslation(_) => MetricKind::MissingTranslation,
        }
    }

    /// Line the metric is anchored to
    #[must_use]
    pub const fn line_index(&self) -> usize {
        match self {
            Self::MaxChars(m) => m.line_index,
            Self::LeadingWhitespace(m) => m.line_index,
            Self::Cps(m) => m.line_index,
            Self::MaxCps(m) | Self::MinCps(m) => m.line_index,
            Self::CpsBalance(m) => m.line_index,
            Self::MergeCandidate(m) => m.line_index,
            Self::NumberStyle(m) => m.line_index,
            Self::PercentStyle(m) => m.line_index,
            Self::Capitalization(m) => m.line_index,
            Self::Punctuation(m) => m.line_index,
            Self::Baseline(m) => m.line_index,
            Self::MissingTranslation(m) => m.line_index,
        }
    }
}
