//! Rule execution engine
//!
//! Runs an ordered [`RuleSet`] over the segments of a document and collects
//! the [`Metric`]s they emit, then classifies them into [`Finding`]s.
//!
//! # Execution contract
//!
//! - Rules run in set order; within a rule, segments run in document order.
//!   Output order is therefore rule-major and fully deterministic.
//! - Segment-scope rules see every segment. Document-scope rules (punctuation,
//!   baseline) see context index 0 exactly once, even for a document with no
//!   segments.
//! - `enabled_rule_types` filters the collected metrics afterwards; rules are
//!   never skipped based on it.
//!
//! # Example
//!
//! ```rust
//! use capcheck_core::analysis::{AnalysisOptions, Analyzer, MetricKind};
//! use capcheck_core::segment::ScriptType;
//!
//! let analyzer = Analyzer::new(AnalysisOptions::default());
//! let text = "00:00:00:00\t00:00:01:00\nThis caption has thirty chars.";
//! let findings = analyzer.findings(text, ScriptType::Subs);
//! assert!(findings.iter().any(|f| f.kind() == MetricKind::MaxCps));
//! ```

use crate::{
    parser::{LineSource, TextLines},
    segment::{detect_script_type, line_segments, segment_lines, ScriptType, Segment},
};

pub mod config;
pub mod context;
pub mod finding;
pub mod metric;
pub mod rules;

pub use config::{parse_term_list, AnalysisOptions};
pub use context::{ContextMode, RuleContext};
pub use finding::{classify, Finding, Severity};
pub use metric::{Metric, MetricKind, MetricKinds};
pub use rules::{RuleScope, RuleSet};

/// A single check run by the engine
///
/// Rules are stateless apart from configuration captured at construction,
/// so one instance can serve any number of analyses.
pub trait Rule: Send + Sync {
    /// Unique identifier, e.g. `max-chars`
    fn id(&self) -> &'static str;

    /// Human-readable name
    fn name(&self) -> &'static str;

    /// One-line description
    fn description(&self) -> &'static str;

    /// Kind of metric the rule emits
    fn kind(&self) -> MetricKind;

    /// Whether the rule runs per segment or once per document
    fn scope(&self) -> RuleScope {
        RuleScope::Segment
    }

    /// Evaluate one context
    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Metric>;
}

fn run_rules(
    segments: &[Segment],
    lines: &dyn LineSource,
    rules: &RuleSet,
    options: &AnalysisOptions,
    mode: ContextMode,
    filter: Option<usize>,
) -> Vec<Metric> {
    let indices = match filter {
        Some(index) if index >= segments.len() => return Vec::new(),
        Some(index) => index..index + 1,
        None => 0..segments.len(),
    };

    let mut metrics = Vec::new();
    for rule in rules.iter() {
        let before = metrics.len();
        match rule.scope() {
            RuleScope::Document => {
                if indices.start == 0 {
                    let ctx = RuleContext::new(0, segments, lines, options, mode);
                    metrics.extend(rule.check(&ctx));
                }
            }
            RuleScope::Segment => {
                for index in indices.clone() {
                    let ctx = RuleContext::new(index, segments, lines, options, mode);
                    metrics.extend(rule.check(&ctx));
                }
            }
        }
        log::trace!("rule {} emitted {} metrics", rule.id(), metrics.len() - before);
    }

    let enabled = options.enabled_kinds();
    metrics.retain(|metric| enabled.allows(metric.kind()));
    metrics
}

/// Analyze text line by line
///
/// Every raw line becomes its own segment; timing rules rediscover blocks
/// from the text around each line.
#[must_use]
pub fn analyze_lines(text: &str, rules: &RuleSet, options: &AnalysisOptions) -> Vec<Metric> {
    let lines = TextLines::new(text);
    let segments = line_segments(&lines);
    let metrics = run_rules(&segments, &lines, rules, options, ContextMode::Line, None);
    log::debug!(
        "line analysis: {} lines, {} metrics",
        lines.line_count(),
        metrics.len()
    );
    metrics
}

/// Analyze pre-built segments of `lines`
///
/// With `filter` set, only that segment is evaluated (document rules only
/// when it is segment 0); an index past the end yields nothing.
#[must_use]
pub fn analyze_segments(
    segments: &[Segment],
    lines: &dyn LineSource,
    rules: &RuleSet,
    options: &AnalysisOptions,
    filter: Option<usize>,
) -> Vec<Metric> {
    run_rules(segments, lines, rules, options, ContextMode::Segment, filter)
}

/// Segment `text` under `script_type` and analyze it
#[must_use]
pub fn analyze_text_by_type(
    text: &str,
    script_type: ScriptType,
    rules: &RuleSet,
    options: &AnalysisOptions,
) -> Vec<Metric> {
    let lines = TextLines::new(text);
    let segments = segment_lines(&lines, script_type, options.ignore_empty_lines);
    let metrics = analyze_segments(&segments, &lines, rules, options, None);
    log::debug!(
        "{script_type:?} analysis: {} segments, {} metrics",
        segments.len(),
        metrics.len()
    );
    metrics
}

/// Detect the dialect of `text`, then analyze it
#[must_use]
pub fn analyze_text(text: &str, rules: &RuleSet, options: &AnalysisOptions) -> Vec<Metric> {
    let script_type = detect_script_type(&TextLines::new(text));
    log::debug!("detected {script_type:?} dialect");
    analyze_text_by_type(text, script_type, rules, options)
}

/// Rule set and options bundled for repeated analysis
///
/// The baseline, when configured, is parsed once and reused by every call.
pub struct Analyzer {
    rules: RuleSet,
    options: AnalysisOptions,
}

impl Analyzer {
    /// Analyzer with the built-in rules
    #[must_use]
    pub fn new(options: AnalysisOptions) -> Self {
        Self::with_rules(RuleSet::builtin(), options)
    }

    /// Analyzer with a custom rule set
    #[must_use]
    pub const fn with_rules(rules: RuleSet, options: AnalysisOptions) -> Self {
        Self { rules, options }
    }

    /// Active rule set
    #[must_use]
    pub const fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Active options
    #[must_use]
    pub const fn options(&self) -> &AnalysisOptions {
        &self.options
    }

    /// Raw metrics for `text` in the given dialect
    #[must_use]
    pub fn metrics(&self, text: &str, script_type: ScriptType) -> Vec<Metric> {
        analyze_text_by_type(text, script_type, &self.rules, &self.options)
    }

    /// Findings for `text` in the given dialect
    #[must_use]
    pub fn findings(&self, text: &str, script_type: ScriptType) -> Vec<Finding> {
        classify(&self.metrics(text, script_type), &self.options)
    }

    /// Findings for `text` in its detected dialect
    #[must_use]
    pub fn findings_auto(&self, text: &str) -> Vec<Finding> {
        classify(
            &analyze_text(text, &self.rules, &self.options),
            &self.options,
        )
    }

    /// Findings from line-mode analysis
    #[must_use]
    pub fn findings_by_line(&self, text: &str) -> Vec<Finding> {
        classify(
            &analyze_lines(text, &self.rules, &self.options),
            &self.options,
        )
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::metric::MaxCharsMetric;

    struct CountingRule {
        scope: RuleScope,
    }

    impl Rule for CountingRule {
        fn id(&self) -> &'static str {
            "counting"
        }
        fn name(&self) -> &'static str {
            "Counting"
        }
        fn description(&self) -> &'static str {
            "Emits one metric per call"
        }
        fn kind(&self) -> MetricKind {
            MetricKind::MaxChars
        }
        fn scope(&self) -> RuleScope {
            self.scope
        }
        fn check(&self, ctx: &RuleContext<'_>) -> Vec<Metric> {
            vec![Metric::MaxChars(MaxCharsMetric {
                line_index: ctx.segment_index,
                text: String::new(),
                char_count: 0,
                max_chars: 0,
            })]
        }
    }

    fn counting(scope: RuleScope) -> RuleSet {
        RuleSet::empty().with_rule(Box::new(CountingRule { scope }))
    }

    #[test]
    fn document_rules_run_once() {
        let options = AnalysisOptions::default();
        let metrics = analyze_lines("a\nb\nc", &counting(RuleScope::Document), &options);
        assert_eq!(metrics.len(), 1);
        let metrics = analyze_lines("a\nb\nc", &counting(RuleScope::Segment), &options);
        assert_eq!(metrics.len(), 3);
    }

    #[test]
    fn document_rules_run_without_segments() {
        let options = AnalysisOptions::default();
        let lines = TextLines::new("");
        let metrics = analyze_segments(&[], &lines, &counting(RuleScope::Document), &options, None);
        assert_eq!(metrics.len(), 1);
    }

    #[test]
    fn segment_filter() {
        let options = AnalysisOptions::default();
        let lines = TextLines::new("a\nb");
        let segments = line_segments(&lines);
        let rules = counting(RuleScope::Segment).with_rule(Box::new(CountingRule {
            scope: RuleScope::Document,
        }));

        let only_second = analyze_segments(&segments, &lines, &rules, &options, Some(1));
        assert_eq!(only_second.len(), 1);
        assert_eq!(only_second[0].line_index(), 1);

        let first = analyze_segments(&segments, &lines, &rules, &options, Some(0));
        assert_eq!(first.len(), 2);

        assert!(analyze_segments(&segments, &lines, &rules, &options, Some(2)).is_empty());
    }

    #[test]
    fn enabled_types_filter_output() {
        let options = AnalysisOptions::default().with_enabled_rule_types([MetricKind::Baseline]);
        let metrics = analyze_lines("a\nb", &counting(RuleScope::Segment), &options);
        assert!(metrics.is_empty());
    }

    #[test]
    fn rule_major_order() {
        let text = format!("{}\n  indented", "x".repeat(60));
        let metrics = analyze_lines(&text, &RuleSet::builtin(), &AnalysisOptions::default());
        let kinds: Vec<_> = metrics.iter().map(|m| (m.kind(), m.line_index())).collect();
        assert_eq!(
            kinds,
            vec![
                (MetricKind::MaxChars, 0),
                (MetricKind::LeadingWhitespace, 1),
            ]
        );
    }

    #[test]
    fn detects_dialect_for_auto_analysis() {
        let analyzer = Analyzer::new(AnalysisOptions::default());
        let findings = analyzer.findings_auto("VO:\n中文\n");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind(), MetricKind::MissingTranslation);
    }
}
