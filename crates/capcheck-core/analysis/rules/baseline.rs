//! Baseline drift detection
//!
//! A trusted transcript is parsed once when the rule is built. Each
//! analysis aligns the timestamp rows of the current text against it with
//! a longest-common-subsequence over `(start, end)` frame pairs, then
//! reports rows that disappeared, rows that appeared and rows whose inline
//! text changed under identical timing.

use crate::{
    analysis::{
        context::RuleContext,
        metric::{BaselineMetric, BaselineReason, Metric, MetricKind},
        Rule,
    },
    parser::{match_timestamp_line, LineSource, TextLines},
    timing::{parse_timecode, Frame},
};

/// One timestamp row of a transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaselineEntry {
    pub line_index: usize,
    pub start_frame: Frame,
    pub end_frame: Frame,
    /// Start timecode as written
    pub start: String,
    /// End timecode as written
    pub end: String,
    /// Tab-separated text after the timecodes, empty if none
    pub inline_text: String,
}

impl BaselineEntry {
    const fn key(&self) -> (Frame, Frame) {
        (self.start_frame, self.end_frame)
    }
}

/// Every valid timestamp row in document order
///
/// Rows with an out-of-range field or an end before the start are skipped.
#[must_use]
pub fn parse_entries<L: LineSource + ?Sized>(lines: &L) -> Vec<BaselineEntry> {
    (0..lines.line_count())
        .filter_map(|line_index| {
            let found = match_timestamp_line(lines.line_or_empty(line_index))?;
            let start_frame = parse_timecode(found.start).ok()?;
            let end_frame = parse_timecode(found.end).ok()?;
            (end_frame >= start_frame).then(|| BaselineEntry {
                line_index,
                start_frame,
                end_frame,
                start: found.start.to_string(),
                end: found.end.to_string(),
                inline_text: found.inline_text.unwrap_or_default().trim().to_string(),
            })
        })
        .collect()
}

/// One step of an alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    /// Baseline entry matched to current entry
    Matched(usize, usize),
    /// Baseline entry with no counterpart
    Missing(usize),
    /// Current entry with no counterpart
    Extra(usize),
}

/// Align two key sequences along a longest common subsequence
///
/// Steps come out in document order; matched pairs are strictly increasing
/// on both sides.
///
/// # Example
///
/// ```rust
/// use capcheck_core::analysis::rules::baseline::{align, Alignment};
///
/// let steps = align(&[1, 2, 3], &[1, 3, 4]);
/// assert_eq!(
///     steps,
///     vec![
///         Alignment::Matched(0, 0),
///         Alignment::Missing(1),
///         Alignment::Matched(2, 1),
///         Alignment::Extra(2),
///     ]
/// );
/// ```
#[must_use]
pub fn align<K: PartialEq>(baseline: &[K], current: &[K]) -> Vec<Alignment> {
    let (n, m) = (baseline.len(), current.len());
    let width = m + 1;
    // suffix[i * width + j] = LCS length of baseline[i..] and current[j..]
    let mut suffix = vec![0u32; (n + 1) * width];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            suffix[i * width + j] = if baseline[i] == current[j] {
                suffix[(i + 1) * width + j + 1] + 1
            } else {
                suffix[(i + 1) * width + j].max(suffix[i * width + j + 1])
            };
        }
    }

    let mut steps = Vec::with_capacity(n.max(m));
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if baseline[i] == current[j] {
            steps.push(Alignment::Matched(i, j));
            i += 1;
            j += 1;
        } else if suffix[(i + 1) * width + j] >= suffix[i * width + j + 1] {
            steps.push(Alignment::Missing(i));
            i += 1;
        } else {
            steps.push(Alignment::Extra(j));
            j += 1;
        }
    }
    steps.extend((i..n).map(Alignment::Missing));
    steps.extend((j..m).map(Alignment::Extra));
    steps
}

/// Compares the current text against a baseline transcript
pub struct BaselineRule {
    entries: Vec<BaselineEntry>,
}

impl BaselineRule {
    /// Parse the baseline once
    #[must_use]
    pub fn new(baseline_text: &str) -> Self {
        let entries = parse_entries(&TextLines::new(baseline_text));
        log::debug!("baseline holds {} timestamp rows", entries.len());
        Self { entries }
    }

    /// Parsed baseline rows
    #[must_use]
    pub fn entries(&self) -> &[BaselineEntry] {
        &self.entries
    }

    /// Compare the baseline with `current`
    #[must_use]
    pub fn compare<L: LineSource + ?Sized>(&self, lines: &L) -> Vec<BaselineMetric> {
        let current = parse_entries(lines);
        let baseline_keys: Vec<_> = self.entries.iter().map(BaselineEntry::key).collect();
        let current_keys: Vec<_> = current.iter().map(BaselineEntry::key).collect();
        let steps = align(&baseline_keys, &current_keys);

        // Current line of the matched partner for each baseline entry
        let mut partner: Vec<Option<usize>> = vec![None; self.entries.len()];
        for step in &steps {
            if let Alignment::Matched(b, c) = *step {
                partner[b] = Some(current[c].line_index);
            }
        }

        let line_count = lines.line_count();
        let mut metrics = Vec::new();
        for step in steps {
            match step {
                Alignment::Matched(b, c) => {
                    let (expected, found) = (&self.entries[b], &current[c]);
                    if expected.inline_text != found.inline_text {
                        metrics.push(BaselineMetric {
                            line_index: found.line_index,
                            reason: BaselineReason::InlineText,
                            baseline_line_index: Some(expected.line_index),
                            current_line_index: Some(found.line_index),
                            start: found.start.clone(),
                            end: found.end.clone(),
                            expected: Some(expected.inline_text.clone()),
                            found: Some(found.inline_text.clone()),
                        });
                    }
                }
                Alignment::Missing(b) => {
                    let expected = &self.entries[b];
                    metrics.push(BaselineMetric {
                        line_index: missing_anchor(expected.line_index, b, &partner, line_count),
                        reason: BaselineReason::Missing,
                        baseline_line_index: Some(expected.line_index),
                        current_line_index: None,
                        start: expected.start.clone(),
                        end: expected.end.clone(),
                        expected: Some(expected.inline_text.clone()),
                        found: None,
                    });
                }
                Alignment::Extra(c) => {
                    let found = &current[c];
                    metrics.push(BaselineMetric {
                        line_index: found.line_index,
                        reason: BaselineReason::Extra,
                        baseline_line_index: None,
                        current_line_index: Some(found.line_index),
                        start: found.start.clone(),
                        end: found.end.clone(),
                        expected: None,
                        found: Some(found.inline_text.clone()),
                    });
                }
            }
        }
        metrics
    }
}

/// Where to report a baseline row that is gone
///
/// The same line number when the current text is long enough, otherwise the
/// nearest matched row after it, then before it, then the last line.
fn missing_anchor(
    baseline_line: usize,
    entry: usize,
    partner: &[Option<usize>],
    line_count: usize,
) -> usize {
    if baseline_line < line_count {
        return baseline_line;
    }
    partner[entry + 1..]
        .iter()
        .find_map(|line| *line)
        .or_else(|| partner[..entry].iter().rev().find_map(|line| *line))
        .unwrap_or_else(|| line_count.saturating_sub(1))
}

impl Rule for BaselineRule {
    fn id(&self) -> &'static str {
        "baseline"
    }

    fn name(&self) -> &'static str {
        "Baseline"
    }

    fn description(&self) -> &'static str {
        "Reports timestamp rows dropped, added or edited against a baseline transcript"
    }

    fn kind(&self) -> MetricKind {
        MetricKind::Baseline
    }

    fn scope(&self) -> super::RuleScope {
        super::RuleScope::Document
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Metric> {
        self.compare(ctx.lines)
            .into_iter()
            .map(Metric::Baseline)
            .collect()
    }
}
