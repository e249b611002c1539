//! Leading-whitespace rule.

use crate::analysis::{
    context::RuleContext,
    metric::{LeadingWhitespaceMetric, Metric, MetricKind},
    Rule,
};

/// Flags visible lines that begin with a space or tab
pub struct LeadingWhitespaceRule;

impl Rule for LeadingWhitespaceRule {
    fn id(&self) -> &'static str {
        "leading-whitespace"
    }

    fn name(&self) -> &'static str {
        "Leading Whitespace"
    }

    fn description(&self) -> &'static str {
        "Flags lines that start with whitespace"
    }

    fn kind(&self) -> MetricKind {
        MetricKind::LeadingWhitespace
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Metric> {
        ctx.text_lines()
            .into_iter()
            .filter(|(_, text)| text.starts_with(char::is_whitespace) && !text.trim().is_empty())
            .map(|(line_index, text)| {
                Metric::LeadingWhitespace(LeadingWhitespaceMetric {
                    line_index,
                    text: text.to_string(),
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
    fn indented_line_is_flagged() {
        let metrics = check_lines(&LeadingWhitespaceRule, "fine\n  indented\n\tTabbed");
        let indices: Vec<_> = metrics.iter().map(Metric::line_index).collect();
        assert_eq!(indices, vec![1, 2]);
    }

    #[test]
    fn whitespace_only_lines_are_ignored() {
        assert!(check_lines(&LeadingWhitespaceRule, "   \n\t").is_empty());
    }
}
