//! Reading-speed balance between adjacent runs.

use super::cps::{measure_run, run_starting_at};
use crate::{
    analysis::{
        context::RuleContext,
        metric::{CpsBalanceMetric, Metric, MetricKind},
        Rule,
    },
    parser::{is_continuation_of_previous, merge_forward, next_parseable_block, LineSource, Run},
};

/// Flags a run whose reading speed jumps against the next run
///
/// Both runs are merged first, so a long caption split over identical rows
/// compares as one unit. The metric anchors at the faster of the two.
pub struct CpsBalanceRule;

impl Rule for CpsBalanceRule {
    fn id(&self) -> &'static str {
        "cps-balance"
    }

    fn name(&self) -> &'static str {
        "Reading Speed Balance"
    }

    fn description(&self) -> &'static str {
        "Flags abrupt reading-speed changes between adjacent captions"
    }

    fn kind(&self) -> MetricKind {
        MetricKind::CpsBalance
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Metric> {
        let ignore = ctx.ignore_empty_lines();
        let Some(current) = ctx
            .timed_block()
            .and_then(|block| run_starting_at(ctx.lines, &block, ignore))
        else {
            return Vec::new();
        };
        let Some(next) = next_run(ctx.lines, &current, ignore) else {
            return Vec::new();
        };

        let current_cps = measure_run(&current);
        let next_cps = measure_run(&next);
        if current_cps.duration_frames == 0 || next_cps.duration_frames == 0 {
            return Vec::new();
        }

        let delta = (current_cps.cps - next_cps.cps).abs();
        if delta < ctx.options.cps_balance_delta {
            return Vec::new();
        }

        let faster = if current_cps.cps >= next_cps.cps {
            current_cps.line_index
        } else {
            next_cps.line_index
        };
        vec![Metric::CpsBalance(CpsBalanceMetric {
            line_index: faster,
            current_line_index: current_cps.line_index,
            next_line_index: next_cps.line_index,
            current_cps: current_cps.cps,
            next_cps: next_cps.cps,
            delta_cps: delta,
        })]
    }
}

/// First run starting after `run`, skipping rows that merely continue it
fn next_run(lines: &dyn LineSource, run: &Run, ignore_empty_lines: bool) -> Option<Run> {
    let mut cursor = run.end_ts_line_index;
    loop {
        let block = next_parseable_block(lines, cursor, ignore_empty_lines)?;
        if !is_continuation_of_previous(lines, &block, ignore_empty_lines) {
            return Some(merge_forward(lines, &block, ignore_empty_lines));
        }
        cursor = block.ts_line_index;
    }
}
