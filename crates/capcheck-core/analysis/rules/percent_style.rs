//! Percent style rule.

use crate::{
    analysis::{
        context::RuleContext,
        metric::{Metric, MetricKind, PercentStyleMetric},
        Rule,
    },
    utils::text::is_english_like,
};
use regex::Regex;
use std::sync::LazyLock;

static PERCENT_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d+(?:\.\d+)?)\s+percent\b")
        .expect("percent pattern compiles")
});

/// Flags `N percent`, which should be written `N%`
///
/// # Example
///
/// ```rust
/// use capcheck_core::analysis::rules::percent_style::find_percent_words;
///
/// let found = find_percent_words("Up 1,200 percent since May");
/// assert_eq!(found[0].1, "1,200%");
/// ```
pub struct PercentStyleRule;

impl Rule for PercentStyleRule {
    fn id(&self) -> &'static str {
        "percent-style"
    }

    fn name(&self) -> &'static str {
        "Percent Style"
    }

    fn description(&self) -> &'static str {
        "Flags numbers followed by the word percent"
    }

    fn kind(&self) -> MetricKind {
        MetricKind::PercentStyle
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Metric> {
        let mut metrics = Vec::new();
        for (line_index, text) in ctx.text_lines() {
            if !is_english_like(text) {
                continue;
            }
            for (token, expected, column) in find_percent_words(text) {
                metrics.push(Metric::PercentStyle(PercentStyleMetric {
                    line_index,
                    token,
                    expected,
                    column,
                }));
            }
        }
        metrics
    }
}

/// Every `N percent` in a line as `(token, replacement, column)`
#[must_use]
pub fn find_percent_words(line: &str) -> Vec<(String, String, usize)> {
    PERCENT_WORD
        .captures_iter(line)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let number = caps.get(1)?;
            Some((
                whole.as_str().to_string(),
                format!("{}%", number.as_str()),
                line[..whole.start()].chars().count(),
            ))
        })
        .collect()
}
