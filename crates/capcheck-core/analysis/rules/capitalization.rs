//! Capitalization of configured terms
//!
//! Brand and product names have a fixed spelling (`iPhone`, `YouTube`,
//! `COVID-19`). Each configured term is matched case-insensitively at word
//! boundaries and reported whenever the text spells it differently.

use crate::{
    analysis::{
        context::RuleContext,
        metric::{CapitalizationMetric, Metric, MetricKind},
        Rule,
    },
    utils::{errors::Result, hashers::create_hash_set, text::is_english_like, CoreError},
};
use regex::Regex;

/// Term with its compiled case-insensitive matcher
struct TermMatcher {
    term: String,
    pattern: Regex,
}

/// Flags configured terms written with the wrong capitalization
#[derive(Default)]
pub struct CapitalizationRule {
    terms: Vec<TermMatcher>,
}

impl CapitalizationRule {
    /// Compile matchers for `terms`
    ///
    /// Terms that differ only in case keep the first spelling.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidPattern`] if a matcher fails to compile.
    pub fn new<I, S>(terms: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = create_hash_set();
        let mut matchers = Vec::new();
        for term in terms {
            let term = term.as_ref().trim();
            if term.is_empty() || !seen.insert(term.to_lowercase()) {
                continue;
            }
            let pattern = Regex::new(&term_pattern(term))
                .map_err(|err| CoreError::pattern(term, err))?;
            matchers.push(TermMatcher {
                term: term.to_string(),
                pattern,
            });
        }
        log::debug!("compiled {} capitalization terms", matchers.len());
        Ok(Self { terms: matchers })
    }

    /// Number of distinct terms
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Check whether no terms are configured
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Case-insensitive pattern, with word boundaries only on word-character edges
fn term_pattern(term: &str) -> String {
    let is_word = |c: Option<char>| c.is_some_and(|c| c.is_alphanumeric() || c == '_');
    let head = if is_word(term.chars().next()) { r"\b" } else { "" };
    let tail = if is_word(term.chars().last()) { r"\b" } else { "" };
    format!("(?i){head}{}{tail}", regex::escape(term))
}

impl Rule for CapitalizationRule {
    fn id(&self) -> &'static str {
        "capitalization"
    }

    fn name(&self) -> &'static str {
        "Capitalization"
    }

    fn description(&self) -> &'static str {
        "Flags configured terms written with the wrong capitalization"
    }

    fn kind(&self) -> MetricKind {
        MetricKind::Capitalization
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Metric> {
        if self.terms.is_empty() {
            return Vec::new();
        }
        let mut metrics = Vec::new();
        for (line_index, text) in ctx.text_lines() {
            if !is_english_like(text) {
                continue;
            }
            for matcher in &self.terms {
                for found in matcher.pattern.find_iter(text) {
                    if found.as_str() == matcher.term {
                        continue;
                    }
                    metrics.push(Metric::Capitalization(CapitalizationMetric {
                        line_index,
                        found: found.as_str().to_string(),
                        expected: matcher.term.clone(),
                        column: text[..found.start()].chars().count(),
                    }));
                }
            }
        }
        metrics.sort_by_key(|metric| match metric {
            Metric::Capitalization(m) => (m.line_index, m.column),
            other => (other.line_index(), 0),
        });
        metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::test_support::check_lines;

    fn found(rule: &CapitalizationRule, text: &str) -> Vec<(String, String)> {
        check_lines(rule, text)
            .into_iter()
            .map(|metric| match metric {
                Metric::Capitalization(m) => (m.found, m.expected),
                other => panic!("unexpected metric {other:?}"),
            })
            .collect()
    }

    #[test]
    fn miscased_terms_are_flagged() {
        let rule = CapitalizationRule::new(["iPhone", "YouTube"]).unwrap();
        assert_eq!(
            found(&rule, "He filmed it on an Iphone for youtube."),
            vec![
                ("Iphone".to_string(), "iPhone".to_string()),
                ("youtube".to_string(), "YouTube".to_string())
            ]
        );
    }

    #[test]
    fn correct_spelling_is_silent() {
        let rule = CapitalizationRule::new(["iPhone"]).unwrap();
        assert!(found(&rule, "My iPhone broke today").is_empty());
    }

    #[test]
    fn matches_respect_word_boundaries() {
        let rule = CapitalizationRule::new(["NASA"]).unwrap();
        assert!(found(&rule, "The nasalized vowels here").is_empty());
        assert_eq!(found(&rule, "Nasa launched it").len(), 1);
    }

    #[test]
    fn symbols_in_terms_are_escaped() {
        let rule = CapitalizationRule::new(["C++", "COVID-19"]).unwrap();
        assert_eq!(
            found(&rule, "Learning c++ during covid-19 lockdown"),
            vec![
                ("c++".to_string(), "C++".to_string()),
                ("covid-19".to_string(), "COVID-19".to_string())
            ]
        );
    }

    #[test]
    fn duplicate_terms_keep_first_spelling() {
        let rule = CapitalizationRule::new(["iPhone", "IPHONE", "  ", "iphone"]).unwrap();
        assert_eq!(rule.len(), 1);
    }
}
