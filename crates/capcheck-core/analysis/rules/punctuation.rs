//! Punctuation and quote-balance analysis
//!
//! Runs once per document. Captions are first collapsed into cues (one per
//! run in the caption dialect, one per translated block in the news
//! dialect), then three groups of checks run over the ordered cues:
//!
//! 1. Quote spans: an odd number of double quotes leaves one quote
//!    unmatched. An opening quote left open is fine as long as the next
//!    adjacent cue picks the dialogue up again with its own leading quote.
//! 2. Cross-cue sentence flow between adjacent cues (only blank lines in
//!    between): capitalization after a period, terminal punctuation before
//!    a capital, colon before a quotation.
//! 3. The final cue must end a sentence.
//!
//! Per-cue findings are reported once per distinct text, so a refrain
//! repeated through a song is flagged a single time.

use crate::{
    analysis::{
        context::RuleContext,
        metric::{Metric, MetricKind, PunctuationCode, PunctuationMetric},
        Rule,
    },
    parser::{collect_runs, LineSource},
    segment::{Segment, SegmentKind},
    utils::{
        hashers::create_hash_set,
        text::{is_blank, is_english_like},
    },
};
use ahash::RandomState;
use std::collections::HashSet;

const DOUBLE_QUOTES: [char; 3] = ['"', '\u{201C}', '\u{201D}'];
const CLOSERS: [char; 6] = ['"', '\'', '\u{201D}', '\u{2019}', ')', ']'];
const TERMINALS: [char; 5] = ['.', '!', '?', ':', '\u{2026}'];
const DASHES: [char; 2] = ['\u{2014}', '\u{2013}'];

/// Flags punctuation and quote-balance problems across cues
pub struct PunctuationRule {
    /// Lowercased proper nouns allowed after a missing period
    proper_nouns: HashSet<String, RandomState>,
    /// Lowercased abbreviations, without their trailing period
    abbreviations: HashSet<String, RandomState>,
}

impl Default for PunctuationRule {
    fn default() -> Self {
        Self::new(Vec::<String>::new(), Vec::<String>::new())
    }
}

impl PunctuationRule {
    /// Create the rule with proper nouns and abbreviations that may start
    /// a cue with a capital or end one with a period mid-sentence
    #[must_use]
    pub fn new<I, J, S, T>(proper_nouns: I, abbreviations: J) -> Self
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let normalize = |term: &str| term.trim().trim_end_matches('.').to_lowercase();
        let mut nouns = create_hash_set();
        nouns.extend(
            proper_nouns
                .into_iter()
                .map(|term| normalize(term.as_ref()))
                .filter(|term| !term.is_empty()),
        );
        let mut abbreviations_set = create_hash_set();
        abbreviations_set.extend(
            abbreviations
                .into_iter()
                .map(|term| normalize(term.as_ref()))
                .filter(|term| !term.is_empty()),
        );
        Self {
            proper_nouns: nouns,
            abbreviations: abbreviations_set,
        }
    }

    fn is_known_word(&self, word: &str) -> bool {
        let word = word.to_lowercase();
        self.proper_nouns.contains(&word) || self.abbreviations.contains(&word)
    }

    fn ends_with_abbreviation(&self, text: &str) -> bool {
        last_word(text).is_some_and(|word| {
            self.abbreviations
                .contains(&word.trim_end_matches('.').to_lowercase())
        })
    }
}

impl Rule for PunctuationRule {
    fn id(&self) -> &'static str {
        "punctuation"
    }

    fn name(&self) -> &'static str {
        "Punctuation"
    }

    fn description(&self) -> &'static str {
        "Checks quote balance, sentence flow between captions and final punctuation"
    }

    fn kind(&self) -> MetricKind {
        MetricKind::Punctuation
    }

    fn scope(&self) -> super::RuleScope {
        super::RuleScope::Document
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Metric> {
        let cues = build_cues(ctx);
        log::trace!("punctuation: {} cues", cues.len());
        let mut report = Report::default();
        self.check_cues(&cues, ctx.lines, &mut report);
        report.metrics
    }
}

/// Text shown on screen as one unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cue {
    /// Line findings anchor to
    pub anchor: usize,
    /// First document line of the cue
    pub first_line: usize,
    /// Last document line of the cue
    pub last_line: usize,
    /// Trimmed display text
    pub text: String,
}

/// Collapse the document into English cues
fn build_cues(ctx: &RuleContext<'_>) -> Vec<Cue> {
    let scripted = ctx
        .segments
        .iter()
        .any(|segment| matches!(segment.kind, SegmentKind::Script { .. }));
    let cues: Vec<Cue> = if scripted {
        ctx.segments.iter().filter_map(script_cue).collect()
    } else {
        collect_runs(ctx.lines, ctx.ignore_empty_lines())
            .into_iter()
            .map(|run| Cue {
                anchor: run.start_payload_line_index,
                first_line: run.start_ts_line_index,
                last_line: run.end_payload_line_index,
                text: run.payload_text.trim().to_string(),
            })
            .collect()
    };
    cues.into_iter()
        .filter(|cue| is_english_like(&cue.text))
        .collect()
}

fn script_cue(segment: &Segment) -> Option<Cue> {
    let SegmentKind::Script {
        source_line_indices,
        target_line_indices,
        ..
    } = &segment.kind
    else {
        return None;
    };
    if target_line_indices.is_empty() {
        return None;
    }
    let first_line = source_line_indices
        .iter()
        .chain(target_line_indices)
        .copied()
        .min()
        .unwrap_or(segment.line_index);
    let text = segment
        .text
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    Some(Cue {
        anchor: segment.line_index,
        first_line,
        last_line: segment.end_line_index,
        text,
    })
}

/// Cues separated by nothing but blank lines
fn are_adjacent(lines: &dyn LineSource, previous: &Cue, next: &Cue) -> bool {
    next.first_line > previous.last_line
        && (previous.last_line + 1..next.first_line).all(|index| is_blank(lines.line_or_empty(index)))
}

/// Which way an unmatched double quote faces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unmatched {
    Opening,
    Closing,
}

/// Unmatched double quote of a cue, if the count is odd
fn unmatched_double_quote(text: &str) -> Option<Unmatched> {
    let positions: Vec<usize> = text
        .char_indices()
        .filter(|(_, c)| DOUBLE_QUOTES.contains(c))
        .map(|(i, _)| i)
        .collect();
    if positions.len() % 2 == 0 {
        return None;
    }
    let last = *positions.last()?;
    let followed_by_word = text[last..].chars().nth(1).is_some_and(char::is_alphanumeric);
    let ends_with_quote = text.ends_with(DOUBLE_QUOTES);
    if followed_by_word || !ends_with_quote {
        Some(Unmatched::Opening)
    } else {
        Some(Unmatched::Closing)
    }
}

/// Leading single quote with no other single quote after it
fn has_unmatched_single_quote(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some('\'' | '\u{2018}') => !chars.any(|c| matches!(c, '\'' | '\u{2019}')),
        _ => false,
    }
}

fn starts_with_double_quote(text: &str) -> bool {
    text.starts_with(DOUBLE_QUOTES)
}

/// Text with trailing quotes and brackets removed
fn strip_closers(text: &str) -> &str {
    text.trim_end().trim_end_matches(CLOSERS)
}

fn ends_with_ellipsis(text: &str) -> bool {
    let text = strip_closers(text);
    text.ends_with("...") || text.ends_with('\u{2026}')
}

/// Ends on terminal punctuation, an ellipsis or a dash
fn ends_sentence(text: &str) -> bool {
    let text = strip_closers(text);
    text.ends_with(TERMINALS) || text.ends_with(DASHES) || text.ends_with("---")
}

fn last_word(text: &str) -> Option<&str> {
    strip_closers(text).split_whitespace().last()
}

fn first_word(text: &str) -> Option<&str> {
    text.split_whitespace()
        .next()
        .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric() && c != '\''))
}

fn is_acronym(word: &str) -> bool {
    let letters: Vec<char> = word.chars().filter(|c| c.is_alphabetic()).collect();
    letters.len() >= 2 && letters.iter().all(|c| c.is_uppercase())
}

fn is_pronoun_i(word: &str) -> bool {
    word == "I" || word.starts_with("I'") || word.starts_with("I\u{2019}")
}

/// Accumulates metrics, deduplicating per-cue findings by text
#[derive(Default)]
struct Report {
    metrics: Vec<Metric>,
    seen: HashSet<(PunctuationCode, String), RandomState>,
}

impl Report {
    fn per_cue(&mut self, code: PunctuationCode, cue: &Cue) {
        if self.seen.insert((code, cue.text.clone())) {
            self.push(code, cue, None);
        }
    }

    fn push(&mut self, code: PunctuationCode, cue: &Cue, previous: Option<&Cue>) {
        self.metrics.push(Metric::Punctuation(PunctuationMetric {
            line_index: cue.anchor,
            code,
            text: cue.text.clone(),
            previous_line_index: previous.map(|cue| cue.anchor),
        }));
    }
}

impl PunctuationRule {
    fn check_cues(&self, cues: &[Cue], lines: &dyn LineSource, report: &mut Report) {
        // Cue that left a double quote open, carried while the span lasts
        let mut open_span: Option<usize> = None;

        for (index, cue) in cues.iter().enumerate() {
            let previous = index
                .checked_sub(1)
                .map(|i| &cues[i])
                .filter(|previous| are_adjacent(lines, previous, cue));

            if let Some(opener) = open_span {
                if previous.is_none() {
                    report.per_cue(PunctuationCode::UnmatchedOpeningQuote, &cues[opener]);
                    open_span = None;
                }
            }

            let continuing = open_span.is_some();
            let leading_quote = starts_with_double_quote(&cue.text);
            if continuing && !leading_quote {
                report.push(
                    PunctuationCode::MissingOpeningQuoteContinuation,
                    cue,
                    open_span.map(|opener| &cues[opener]),
                );
            }

            if let Some(previous) = previous {
                self.check_flow(previous, cue, continuing && leading_quote, report);
            }

            open_span = match unmatched_double_quote(&cue.text) {
                Some(Unmatched::Opening) => Some(index),
                Some(Unmatched::Closing) => {
                    if !continuing {
                        report.per_cue(PunctuationCode::UnmatchedClosingQuote, cue);
                    }
                    None
                }
                None => None,
            };

            if has_unmatched_single_quote(&cue.text) {
                report.per_cue(PunctuationCode::UnmatchedOpeningQuote, cue);
            }
        }

        if let Some(opener) = open_span {
            report.per_cue(PunctuationCode::UnmatchedOpeningQuote, &cues[opener]);
        }

        if let Some(last) = cues.last() {
            let starts_with_letter = last.text.chars().next().is_some_and(char::is_alphabetic);
            if starts_with_letter && !ends_sentence(&last.text) && !ends_with_ellipsis(&last.text) {
                report.push(PunctuationCode::MissingEndPunctuation, last, None);
            }
        }
    }

    /// Sentence-flow checks between two adjacent cues
    fn check_flow(&self, previous: &Cue, next: &Cue, continues_quote: bool, report: &mut Report) {
        let prev_text = strip_closers(&previous.text);
        let Some(first_char) = next.text.chars().next() else {
            return;
        };

        if prev_text.ends_with('.')
            && !ends_with_ellipsis(&previous.text)
            && !self.ends_with_abbreviation(&previous.text)
            && first_char.is_lowercase()
        {
            report.push(PunctuationCode::LowercaseAfterPeriod, next, Some(previous));
            return;
        }

        if starts_with_double_quote(&next.text) {
            let prev_closes_span =
                unmatched_double_quote(&previous.text) == Some(Unmatched::Closing);
            if !continues_quote && !ends_sentence(&previous.text) && !prev_closes_span {
                report.push(PunctuationCode::MissingColonBeforeQuote, next, Some(previous));
            }
            return;
        }

        if first_char.is_uppercase() && !ends_sentence(&previous.text) {
            let word = first_word(&next.text).unwrap_or_default();
            if !is_pronoun_i(word) && !is_acronym(word) && !self.is_known_word(word) {
                report.push(
                    PunctuationCode::MissingPunctuationBeforeCapital,
                    next,
                    Some(previous),
                );
            }
        }
    }
}
