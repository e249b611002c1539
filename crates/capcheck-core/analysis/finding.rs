//! Classification of metrics into user-facing findings
//!
//! Every metric kind has a fixed severity and an instruction template.
//! Raw `CPS` metrics are the one exception: they are compared against the
//! configured limits and become `MAX_CPS` / `MIN_CPS` findings, or vanish.

use crate::analysis::{
    config::AnalysisOptions,
    metric::{BaselineReason, CpsLimitMetric, Metric, MetricKind, NumberForm, PunctuationCode},
};
use core::fmt;

/// How urgently a finding must be addressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Severity {
    /// Worth a look, may be intentional
    Warn,
    /// Must be fixed before delivery
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

impl MetricKind {
    /// Fixed severity of findings of this kind
    #[must_use]
    pub const fn severity(self) -> Severity {
        match self {
            Self::LeadingWhitespace
            | Self::MinCps
            | Self::CpsBalance
            | Self::MergeCandidate
            | Self::Punctuation => Severity::Warn,
            Self::MaxChars
            | Self::Cps
            | Self::MaxCps
            | Self::NumberStyle
            | Self::PercentStyle
            | Self::Capitalization
            | Self::Baseline
            | Self::MissingTranslation => Severity::Error,
        }
    }
}

/// Metric with severity and an instruction for the editor
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Finding {
    /// Underlying measurement, flattened into the finding on the wire
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub metric: Metric,
    pub severity: Severity,
    pub instruction: String,
}

impl Finding {
    /// Wrap a metric with its kind's severity and instruction
    #[must_use]
    pub fn from_metric(metric: Metric) -> Self {
        Self {
            severity: metric.kind().severity(),
            instruction: instruction(&metric),
            metric,
        }
    }

    /// Type tag
    #[must_use]
    pub const fn kind(&self) -> MetricKind {
        self.metric.kind()
    }

    /// Anchor line
    #[must_use]
    pub const fn line_index(&self) -> usize {
        self.metric.line_index()
    }
}

/// Turn metrics into findings
///
/// `CPS` fans out against `max_cps` / `min_cps`; every other metric maps
/// one to one. Output is then restricted to the enabled kinds and, unless
/// `include_warnings` is set, to errors.
///
/// # Example
///
/// ```rust
/// use capcheck_core::analysis::{
///     classify, AnalysisOptions, Metric, MetricKind,
///     metric::LeadingWhitespaceMetric,
/// };
///
/// let metrics = vec![Metric::LeadingWhitespace(LeadingWhitespaceMetric {
///     line_index: 0,
///     text: " indented".to_string(),
/// })];
/// let findings = classify(&metrics, &AnalysisOptions::default());
/// assert_eq!(findings[0].kind(), MetricKind::LeadingWhitespace);
///
/// let strict = AnalysisOptions::default().with_include_warnings(false);
/// assert!(classify(&metrics, &strict).is_empty());
/// ```
#[must_use]
pub fn classify(metrics: &[Metric], options: &AnalysisOptions) -> Vec<Finding> {
    let enabled = options.enabled_kinds();
    let findings: Vec<Finding> = metrics
        .iter()
        .filter_map(|metric| match metric {
            Metric::Cps(cps) => {
                if cps.cps > options.max_cps {
                    Some(Metric::MaxCps(CpsLimitMetric::from_cps(cps, options.max_cps)))
                } else {
                    options
                        .min_cps
                        .filter(|min| cps.cps < *min)
                        .map(|min| Metric::MinCps(CpsLimitMetric::from_cps(cps, min)))
                }
            }
            other => Some(other.clone()),
        })
        .filter(|metric| enabled.contains(metric.kind().flag()))
        .map(Finding::from_metric)
        .filter(|finding| options.include_warnings || finding.severity == Severity::Error)
        .collect();
    log::debug!(
        "classified {} metrics into {} findings",
        metrics.len(),
        findings.len()
    );
    findings
}

fn form(form: NumberForm) -> &'static str {
    match form {
        NumberForm::Digits => "digits",
        NumberForm::Words => "words",
    }
}

/// Instruction text for a metric
#[must_use]
pub fn instruction(metric: &Metric) -> String {
    match metric {
        Metric::MaxChars(m) => format!(
            "Line is {} characters; shorten it to {} or fewer.",
            m.char_count, m.max_chars
        ),
        Metric::LeadingWhitespace(_) => "Remove the whitespace at the start of the line.".to_string(),
        Metric::Cps(m) => format!("Reading speed is {:.1} characters per second.", m.cps),
        Metric::MaxCps(m) => {
            if m.cps.is_infinite() {
                "Caption has no duration; give it time on screen.".to_string()
            } else {
                format!(
                    "Reading speed is {:.1} cps, above the {:.1} cps limit; shorten the text or extend the caption.",
                    m.cps, m.limit
                )
            }
        }
        Metric::MinCps(m) => format!(
            "Reading speed is {:.1} cps, below the {:.1} cps minimum; shorten the caption or add text.",
            m.cps, m.limit
        ),
        Metric::CpsBalance(m) => format!(
            "Reading speed jumps by {:.1} cps between adjacent captions ({:.1} vs {:.1}); rebalance the text.",
            m.delta_cps, m.current_cps, m.next_cps
        ),
        Metric::MergeCandidate(m) => format!(
            "Caption nearly repeats the next one ({} edit(s), {} frame gap); consider merging them.",
            m.edit_distance, m.gap_frames
        ),
        Metric::NumberStyle(m) => format!(
            "Write \"{}\" in {} instead of {}.",
            m.token,
            form(m.expected),
            form(m.found)
        ),
        Metric::PercentStyle(m) => format!("Write \"{}\" as \"{}\".", m.token, m.expected),
        Metric::Capitalization(m) => format!("Write \"{}\" as \"{}\".", m.found, m.expected),
        Metric::Punctuation(m) => punctuation_instruction(m.code).to_string(),
        Metric::Baseline(m) => match m.reason {
            BaselineReason::Missing => format!(
                "Timestamp row {} to {} from the baseline is missing; restore it.",
                m.start, m.end
            ),
            BaselineReason::Extra => format!(
                "Timestamp row {} to {} is not in the baseline; remove it or check the timing.",
                m.start, m.end
            ),
            BaselineReason::InlineText => format!(
                "Inline text at {} changed from \"{}\" to \"{}\"; restore the baseline text.",
                m.start,
                m.expected.as_deref().unwrap_or_default(),
                m.found.as_deref().unwrap_or_default()
            ),
        },
        Metric::MissingTranslation(_) => "Add an English translation for this block.".to_string(),
    }
}

const fn punctuation_instruction(code: PunctuationCode) -> &'static str {
    match code {
        PunctuationCode::UnmatchedOpeningQuote => "Close the opening quote or remove it.",
        PunctuationCode::UnmatchedClosingQuote => "Add the matching opening quote or remove this one.",
        PunctuationCode::MissingOpeningQuoteContinuation => {
            "Quoted speech continues from the previous caption; open this caption with a quote."
        }
        PunctuationCode::LowercaseAfterPeriod => {
            "Previous caption ends a sentence; capitalize the first word."
        }
        PunctuationCode::MissingPunctuationBeforeCapital => {
            "Previous caption does not end a sentence; add punctuation there or lowercase this word."
        }
        PunctuationCode::MissingColonBeforeQuote => {
            "Introduce the quotation with a colon at the end of the previous caption."
        }
        PunctuationCode::MissingEndPunctuation => "End the final caption with punctuation.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::metric::{CpsMetric, MergeCandidateMetric};

    fn cps(value: f64) -> Metric {
        Metric::Cps(CpsMetric {
            line_index: 1,
            ts_line_index: 0,
            text: "text".to_string(),
            cps: value,
            char_count: 4,
            start_frame: 0,
            end_frame: 30,
            duration_frames: 30,
        })
    }

    #[test]
    fn cps_fans_out_by_limit() {
        let options = AnalysisOptions::default().with_cps_limits(17.0, Some(5.0));
        let findings = classify(&[cps(30.0), cps(10.0), cps(2.0)], &options);
        let kinds: Vec<_> = findings.iter().map(Finding::kind).collect();
        assert_eq!(kinds, vec![MetricKind::MaxCps, MetricKind::MinCps]);
        assert_eq!(findings[0].severity, Severity::Error);
        assert_eq!(findings[1].severity, Severity::Warn);
    }

    #[test]
    fn min_cps_needs_configuration() {
        let findings = classify(&[cps(0.5)], &AnalysisOptions::default());
        assert!(findings.is_empty());
    }

    #[test]
    fn infinite_cps_is_max_cps() {
        let findings = classify(&[cps(f64::INFINITY)], &AnalysisOptions::default());
        assert_eq!(findings.len(), 1);
        assert!(findings[0].instruction.contains("no duration"));
    }

    #[test]
    fn warnings_can_be_dropped() {
        let metric = Metric::MergeCandidate(MergeCandidateMetric {
            line_index: 1,
            next_line_index: 3,
            gap_frames: 30,
            edit_distance: 1,
            text: "Gap text".to_string(),
            next_text: "Gap text.".to_string(),
        });
        let options = AnalysisOptions::default();
        assert_eq!(classify(&[metric.clone()], &options).len(), 1);
        let options = options.with_include_warnings(false);
        assert!(classify(&[metric], &options).is_empty());
    }

    #[test]
    fn enabled_kinds_filter_after_fan_out() {
        let options = AnalysisOptions::default()
            .with_cps_limits(17.0, Some(5.0))
            .with_enabled_rule_types([MetricKind::MinCps]);
        let findings = classify(&[cps(30.0), cps(2.0)], &options);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind(), MetricKind::MinCps);
    }

    #[test]
    fn severity_table() {
        assert_eq!(MetricKind::MaxChars.severity(), Severity::Error);
        assert_eq!(MetricKind::Baseline.severity(), Severity::Error);
        assert_eq!(MetricKind::Punctuation.severity(), Severity::Warn);
        assert_eq!(MetricKind::CpsBalance.severity(), Severity::Warn);
        assert_eq!(Severity::Warn.to_string(), "warn");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn finding_json_is_flat() {
        let findings = classify(&[cps(30.0)], &AnalysisOptions::default());
        let json = serde_json::to_value(&findings[0]).unwrap();
        assert_eq!(json["type"], "MAX_CPS");
        assert_eq!(json["severity"], "error");
        assert_eq!(json["lineIndex"], 1);
        assert_eq!(json["limit"], 17.0);
        assert!(json["instruction"].as_str().unwrap().contains("30.0"));
    }
}
