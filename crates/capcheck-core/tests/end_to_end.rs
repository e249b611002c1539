//! End-to-end scenarios through the public API
//!
//! Each test feeds a small document through [`Analyzer`] or the free
//! analysis functions and checks the findings a reviewer would see.

use capcheck_core::{
    analysis::{
        metric::{BaselineReason, NumberForm, PunctuationCode},
        parse_term_list,
    },
    analyze_lines, AnalysisOptions, Analyzer, Finding, Metric, MetricKind, RuleSet, ScriptType,
    Severity,
};
use pretty_assertions::assert_eq;

fn of_kind(findings: &[Finding], kind: MetricKind) -> Vec<&Finding> {
    findings.iter().filter(|f| f.kind() == kind).collect()
}

#[test]
fn thirty_characters_in_one_second_is_thirty_cps() {
    let payload = "A".repeat(30);
    let text = format!("00:00:00:00\t00:00:01:00\n{payload}");
    let metrics = analyze_lines(&text, &RuleSet::builtin(), &AnalysisOptions::default());
    let cps: Vec<_> = metrics
        .iter()
        .filter_map(|metric| match metric {
            Metric::Cps(cps) => Some(cps),
            _ => None,
        })
        .collect();
    assert_eq!(cps.len(), 1);
    assert!((cps[0].cps - 30.0).abs() < f64::EPSILON);
    assert_eq!(cps[0].line_index, 1);

    let analyzer = Analyzer::new(AnalysisOptions::default());
    let findings = analyzer.findings(&text, ScriptType::Subs);
    let max_cps = of_kind(&findings, MetricKind::MaxCps);
    assert_eq!(max_cps.len(), 1);
    assert_eq!(max_cps[0].severity, Severity::Error);
    assert!(of_kind(&findings, MetricKind::Cps).is_empty());
}

#[test]
fn baseline_reports_dropped_row() {
    let baseline = "00:00:00:00\t00:00:01:00\tSRC1\n00:00:01:00\t00:00:02:00\tSRC2";
    let current = "00:00:00:00\t00:00:01:00\tSRC1";
    let analyzer = Analyzer::with_rules(
        RuleSet::builtin().with_baseline(baseline),
        AnalysisOptions::default(),
    );

    let findings = analyzer.findings(current, ScriptType::Subs);
    let drift = of_kind(&findings, MetricKind::Baseline);
    assert_eq!(drift.len(), 1);
    let Metric::Baseline(metric) = &drift[0].metric else {
        panic!("unexpected metric {:?}", drift[0]);
    };
    assert_eq!(metric.reason, BaselineReason::Missing);
    assert_eq!(metric.baseline_line_index, Some(1));

    // The baseline is parsed once and reused across calls
    let again = analyzer.findings(baseline, ScriptType::Subs);
    assert!(of_kind(&again, MetricKind::Baseline).is_empty());
}

#[test]
fn near_duplicate_cues_are_merge_candidates() {
    let text = "00:00:08:00\t00:00:09:00\nGap text\n00:00:10:00\t00:00:11:00\nGap text.";
    let analyzer = Analyzer::new(AnalysisOptions::default());
    let findings = analyzer.findings(text, ScriptType::Subs);
    let merges = of_kind(&findings, MetricKind::MergeCandidate);
    assert_eq!(merges.len(), 1);
    let Metric::MergeCandidate(metric) = &merges[0].metric else {
        panic!("unexpected metric {:?}", merges[0]);
    };
    assert_eq!(metric.edit_distance, 1);
    assert_eq!(metric.gap_frames, 30);
    assert_eq!(merges[0].severity, Severity::Warn);
}

#[test]
fn reading_speed_jump_anchors_on_faster_run() {
    let fast = "Twenty-five characters ok";
    assert_eq!(fast.chars().count(), 25);
    let text = format!("00:00:00:00\t00:00:01:00\n{fast}\n00:00:01:00\t00:00:02:00\nYes");
    let analyzer = Analyzer::new(AnalysisOptions::default());
    let findings = analyzer.findings(&text, ScriptType::Subs);
    let balance = of_kind(&findings, MetricKind::CpsBalance);
    assert_eq!(balance.len(), 1);
    let Metric::CpsBalance(metric) = &balance[0].metric else {
        panic!("unexpected metric {:?}", balance[0]);
    };
    assert_eq!(metric.line_index, 1);
    assert!((metric.delta_cps - 22.0).abs() < 1e-9);
}

#[test]
fn number_style_in_captions() {
    let analyzer = Analyzer::new(AnalysisOptions::default());
    let text = "00:00:00:00\t00:00:03:00\nThis is 5 examples.\n\
                00:00:03:00\t00:00:06:00\nIt happened at 3:30 yesterday.";
    let findings = analyzer.findings(text, ScriptType::Subs);
    let numbers = of_kind(&findings, MetricKind::NumberStyle);
    assert_eq!(numbers.len(), 1);
    let Metric::NumberStyle(metric) = &numbers[0].metric else {
        panic!("unexpected metric {:?}", numbers[0]);
    };
    assert_eq!(metric.token, "5");
    assert_eq!(metric.found, NumberForm::Digits);
    assert_eq!(metric.expected, NumberForm::Words);
    assert_eq!(metric.line_index, 1);
}

#[test]
fn warnings_can_be_suppressed() {
    let text = "00:00:08:00\t00:00:09:00\nGap text\n00:00:10:00\t00:00:11:00\nGap text.";
    let options = AnalysisOptions::default().with_include_warnings(false);
    let findings = Analyzer::new(options).findings(text, ScriptType::Subs);
    assert!(findings.iter().all(|f| f.severity == Severity::Error));
    assert!(of_kind(&findings, MetricKind::MergeCandidate).is_empty());
}

#[test]
fn capitalization_terms_from_a_term_file() {
    let terms = parse_term_list("# brands\niPhone\nYouTube\n");
    let rules = RuleSet::builtin()
        .with_capitalization_terms(&terms)
        .unwrap();
    let analyzer = Analyzer::with_rules(rules, AnalysisOptions::default());
    let findings = analyzer.findings(
        "00:00:00:00\t00:00:05:00\nShe posted it on Youtube today.",
        ScriptType::Subs,
    );
    let caps = of_kind(&findings, MetricKind::Capitalization);
    assert_eq!(caps.len(), 1);
    assert!(caps[0].instruction.contains("YouTube"));
}

#[test]
fn news_script_end_to_end() {
    let script = "\
001_0010
VO:
今天的新闻
Today in the news we look at 5 stories.

/*SUPER: 标题*/
Headline For Today

中文没有翻译
";
    let analyzer = Analyzer::new(AnalysisOptions::default());
    let findings = analyzer.findings(script, ScriptType::News);

    let missing = of_kind(&findings, MetricKind::MissingTranslation);
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].line_index(), 8);

    let numbers = of_kind(&findings, MetricKind::NumberStyle);
    assert_eq!(numbers.len(), 1);
    assert_eq!(numbers[0].line_index(), 3);

    assert!(findings.iter().all(|f| f.kind() != MetricKind::MaxCps));
}

#[test]
fn punctuation_flows_across_cues() {
    let text = "00:00:00:00\t00:00:02:00\nAnd then he said\n\
                00:00:02:00\t00:00:04:00\n\"We are leaving now.\"";
    let findings = Analyzer::new(AnalysisOptions::default()).findings(text, ScriptType::Subs);
    let punctuation = of_kind(&findings, MetricKind::Punctuation);
    assert_eq!(punctuation.len(), 1);
    let Metric::Punctuation(metric) = &punctuation[0].metric else {
        panic!("unexpected metric {:?}", punctuation[0]);
    };
    assert_eq!(metric.code, PunctuationCode::MissingColonBeforeQuote);
    assert_eq!(metric.previous_line_index, Some(1));
}

#[test]
fn auto_detection_picks_the_dialect() {
    let analyzer = Analyzer::new(AnalysisOptions::default());
    let timed = analyzer.findings_auto("00:00:00:00\t00:00:00:10\nWay too fast to read.");
    assert_eq!(of_kind(&timed, MetricKind::MaxCps).len(), 1);
    let news = analyzer.findings_auto("VO:\n新闻\n");
    assert_eq!(of_kind(&news, MetricKind::MissingTranslation).len(), 1);
}

#[cfg(feature = "serde")]
#[test]
fn findings_serialize_flat() {
    let text = "00:00:08:00\t00:00:09:00\nGap text\n00:00:10:00\t00:00:11:00\nGap text.";
    let findings = Analyzer::new(AnalysisOptions::default()).findings(text, ScriptType::Subs);
    let json = serde_json::to_value(&findings).unwrap();
    let merge = json
        .as_array()
        .unwrap()
        .iter()
        .find(|f| f["type"] == "MERGE_CANDIDATE")
        .unwrap();
    assert_eq!(merge["editDistance"], 1);
    assert_eq!(merge["gapFrames"], 30);
    assert_eq!(merge["severity"], "warn");
    assert!(merge["instruction"].is_string());
}

#[cfg(feature = "serde")]
#[test]
fn options_from_json_drive_analysis() {
    let options = AnalysisOptions::from_json(r#"{"maxChars": 10, "enabledRuleTypes": ["MAX_CHARS"]}"#)
        .unwrap();
    let findings = Analyzer::new(options).findings_by_line("A line longer than ten\nshort");
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].kind(), MetricKind::MaxChars);
    assert_eq!(findings[0].line_index(), 0);
}
