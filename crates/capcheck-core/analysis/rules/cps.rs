//! Reading-speed rule
//!
//! Emits one raw `CPS` metric per run. Limits are applied later, during
//! classification, so the same measurement can feed both `MAX_CPS` and
//! `MIN_CPS` findings.

use crate::{
    analysis::{
        context::RuleContext,
        metric::{CpsMetric, Metric, MetricKind},
        Rule,
    },
    parser::{is_continuation_of_previous, merge_forward, LineSource, Run, TimestampBlock},
    timing::characters_per_second,
    utils::text::char_count,
};

/// Measures characters per second for every run of identical blocks
///
/// Only the first block of a run reports; continuation blocks are silent.
pub struct CpsRule;

impl Rule for CpsRule {
    fn id(&self) -> &'static str {
        "cps"
    }

    fn name(&self) -> &'static str {
        "Reading Speed"
    }

    fn description(&self) -> &'static str {
        "Measures characters per second across merged runs"
    }

    fn kind(&self) -> MetricKind {
        MetricKind::Cps
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Metric> {
        ctx.timed_block()
            .and_then(|block| run_starting_at(ctx.lines, &block, ctx.ignore_empty_lines()))
            .map(|run| vec![Metric::Cps(measure_run(&run))])
            .unwrap_or_default()
    }
}

/// Run headed by `block`, or `None` when `block` continues an earlier run
pub(crate) fn run_starting_at(
    lines: &dyn LineSource,
    block: &TimestampBlock,
    ignore_empty_lines: bool,
) -> Option<Run> {
    if is_continuation_of_previous(lines, block, ignore_empty_lines) {
        return None;
    }
    Some(merge_forward(lines, block, ignore_empty_lines))
}

/// Reading speed of a run
pub(crate) fn measure_run(run: &Run) -> CpsMetric {
    let count = char_count(&run.payload_text);
    let duration = run.duration_frames();
    CpsMetric {
        line_index: run.start_payload_line_index,
        ts_line_index: run.start_ts_line_index,
        text: run.payload_text.clone(),
        cps: characters_per_second(count, duration),
        char_count: count,
        start_frame: run.start_frame,
        end_frame: run.end_frame,
        duration_frames: duration,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        analysis::{
            context::ContextMode,
            test_support::{check_lines, check_segments},
            AnalysisOptions,
        },
        parser::TextLines,
        segment::{line_segments, ScriptType},
    };

    fn cps_values(metrics: &[Metric]) -> Vec<(usize, f64)> {
        metrics
            .iter()
            .map(|metric| match metric {
                Metric::Cps(cps) => (cps.line_index, cps.cps),
                other => panic!("unexpected metric {other:?}"),
            })
            .collect()
    }

    #[test]
    fn continuation_rows_merge_into_one_run() {
        // 16 characters over 30 frames, then the same text for 30 more
        let text = "00:00:00:00\t00:00:01:00\nSixteen chars ok\n\
                    00:00:01:00\t00:00:02:00\nSixteen chars ok";
        let metrics = check_lines(&CpsRule, text);
        assert_eq!(cps_values(&metrics), vec![(1, 8.0)]);
    }

    #[test]
    fn first_valid_previous_block_decides_continuation() {
        // The run "A" is broken by "B", so the second "A" starts a new run
        let text = "00:00:00:00\t00:00:01:00\nAAA\n\
                    00:00:01:00\t00:00:02:00\nB\n\
                    00:00:02:00\t00:00:03:00\nAAA";
        let metrics = check_lines(&CpsRule, text);
        assert_eq!(metrics.len(), 3);
    }

    #[test]
    fn zero_duration_is_infinite() {
        let text = "00:00:01:00\t00:00:01:00\nInstant";
        let metrics = check_lines(&CpsRule, text);
        let values = cps_values(&metrics);
        assert!(values[0].1.is_infinite());
    }

    #[test]
    fn line_and_segment_modes_agree() {
        let text = "00:00:00:00\t00:00:00:15\nQuick line of text\n\
                    00:00:00:15\t00:00:01:00\nQuick line of text\n\
                    00:00:02:00\t00:00:04:00\nSlow";
        let by_line = check_lines(&CpsRule, text);
        let by_segment = check_segments(&CpsRule, text, ScriptType::Subs);
        assert_eq!(by_line, by_segment);
        assert_eq!(by_line.len(), 2);
    }

    #[test]
    fn blank_line_breaks_run_unless_ignored() {
        let text = "00:00:00:00\t00:00:01:00\nSame\n\n00:00:01:00\t00:00:02:00\nSame";
        assert_eq!(check_lines(&CpsRule, text).len(), 2);

        let lines = TextLines::new(text);
        let segments = line_segments(&lines);
        let options = AnalysisOptions::default().with_ignore_empty_lines(true);
        let metrics: Vec<Metric> = (0..segments.len())
            .flat_map(|index| {
                CpsRule.check(&RuleContext::new(
                    index,
                    &segments,
                    &lines,
                    &options,
                    ContextMode::Line,
                ))
            })
            .collect();
        assert_eq!(cps_values(&metrics), vec![(1, 2.0)]);
    }
}
