//! Line-length rule.

use crate::{
    analysis::{
        context::RuleContext,
        metric::{MaxCharsMetric, Metric, MetricKind},
        Rule,
    },
    utils::text::{char_count, is_blank},
};

/// Flags visible lines longer than `max_chars`
///
/// Length is counted in Unicode scalar values of the trimmed line.
///
/// # Example
///
/// ```rust
/// use capcheck_core::analysis::{rules::MaxCharsRule, Rule};
///
/// assert_eq!(MaxCharsRule.id(), "max-chars");
/// ```
pub struct MaxCharsRule;

impl Rule for MaxCharsRule {
    fn id(&self) -> &'static str {
        "max-chars"
    }

    fn name(&self) -> &'static str {
        "Max Characters"
    }

    fn description(&self) -> &'static str {
        "Flags lines longer than the configured character limit"
    }

    fn kind(&self) -> MetricKind {
        MetricKind::MaxChars
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Metric> {
        let max_chars = ctx.options.max_chars;
        ctx.text_lines()
            .into_iter()
            .filter(|(_, text)| !is_blank(text))
            .filter_map(|(line_index, text)| {
                let count = char_count(text);
                (count > max_chars).then(|| {
                    Metric::MaxChars(MaxCharsMetric {
                        line_index,
                        text: text.to_string(),
                        char_count: count,
                        max_chars,
                    })
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::test_support::check_lines;

    #[test]
    fn long_line_is_flagged() {
        let text = "x".repeat(60);
        let metrics = check_lines(&MaxCharsRule, &text);
        assert_eq!(metrics.len(), 1);
        let Metric::MaxChars(metric) = &metrics[0] else {
            panic!("unexpected metric {metrics:?}");
        };
        assert_eq!(metric.char_count, 60);
        assert_eq!(metric.max_chars, 54);
    }

    #[test]
    fn limit_is_inclusive() {
        assert!(check_lines(&MaxCharsRule, &"x".repeat(54)).is_empty());
    }

    #[test]
    fn counts_scalars_not_bytes() {
        let text = "é".repeat(54);
        assert!(check_lines(&MaxCharsRule, &text).is_empty());
    }

    #[test]
    fn timestamp_rows_are_not_measured() {
        let text = "00:00:00:00\t00:00:01:00\tan inline note that is really quite long and goes on\nShort";
        assert!(check_lines(&MaxCharsRule, text).is_empty());
    }
}
