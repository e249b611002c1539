//! Near-duplicate adjacent captions
//!
//! Two timed cues separated by a short gap whose texts differ by only a
//! few edits are usually one caption that was split by accident.

use crate::{
    analysis::{
        context::RuleContext,
        metric::{MergeCandidateMetric, Metric, MetricKind},
        Rule,
    },
    utils::text::normalize_for_compare,
};

/// Flags adjacent timed cues that look like the same caption
pub struct MergeCandidateRule;

impl Rule for MergeCandidateRule {
    fn id(&self) -> &'static str {
        "merge-candidate"
    }

    fn name(&self) -> &'static str {
        "Merge Candidate"
    }

    fn description(&self) -> &'static str {
        "Flags adjacent captions with nearly identical text and a short gap"
    }

    fn kind(&self) -> MetricKind {
        MetricKind::MergeCandidate
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Metric> {
        let (Some(current), Some(next)) = (ctx.timed_block(), ctx.next_timed_block()) else {
            return Vec::new();
        };
        let Some(gap) = next.start_frame.checked_sub(current.end_frame) else {
            return Vec::new();
        };
        if gap > ctx.options.max_gap_frames {
            return Vec::new();
        }

        let left = normalize_for_compare(&current.payload_text);
        let right = normalize_for_compare(&next.payload_text);
        if left.is_empty() || right.is_empty() || left == right {
            return Vec::new();
        }

        let Some(distance) = bounded_levenshtein(&left, &right, ctx.options.max_edit_distance)
        else {
            return Vec::new();
        };

        vec![Metric::MergeCandidate(MergeCandidateMetric {
            line_index: current.payload_line_index,
            next_line_index: next.payload_line_index,
            gap_frames: gap,
            edit_distance: distance,
            text: current.payload_text,
            next_text: next.payload_text,
        })]
    }
}

/// Levenshtein distance between `a` and `b`, or `None` if it exceeds `max`
///
/// Works on Unicode scalar values with two rolling rows and abandons the
/// computation as soon as every cell of a row is above `max`.
///
/// # Example
///
/// ```rust
/// use capcheck_core::analysis::rules::bounded_levenshtein;
///
/// assert_eq!(bounded_levenshtein("gap text", "gap text.", 2), Some(1));
/// assert_eq!(bounded_levenshtein("kitten", "sitting", 2), None);
/// ```
#[must_use]
pub fn bounded_levenshtein(a: &str, b: &str, max: usize) -> Option<usize> {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.len().abs_diff(b.len()) > max {
        return None;
    }
    if a.is_empty() || b.is_empty() {
        return Some(a.len().max(b.len()));
    }

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        current[0] = i + 1;
        let mut row_min = current[0];
        for (j, &cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != cb);
            let deletion = previous[j + 1] + 1;
            let insertion = current[j] + 1;
            current[j + 1] = substitution.min(deletion).min(insertion);
            row_min = row_min.min(current[j + 1]);
        }
        if row_min > max {
            return None;
        }
        core::mem::swap(&mut previous, &mut current);
    }

    let distance = previous[b.len()];
    (distance <= max).then_some(distance)
}
