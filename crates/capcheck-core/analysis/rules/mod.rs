//! Built-in rules and the ordered rule registry
//!
//! Each rule lives in its own module. [`RuleSet::builtin`] returns them in
//! the fixed order the engine runs them, which is also the order metrics
//! come out in:
//!
//! | id | kind | scope |
//! |---|---|---|
//! | `max-chars` | `MAX_CHARS` | segment |
//! | `leading-whitespace` | `LEADING_WHITESPACE` | segment |
//! | `cps` | `CPS` | segment |
//! | `cps-balance` | `CPS_BALANCE` | segment |
//! | `merge-candidate` | `MERGE_CANDIDATE` | segment |
//! | `number-style` | `NUMBER_STYLE` | segment |
//! | `percent-style` | `PERCENT_STYLE` | segment |
//! | `capitalization` | `CAPITALIZATION` | segment |
//! | `punctuation` | `PUNCTUATION` | document |
//! | `missing-translation` | `MISSING_TRANSLATION` | segment |
//! | `baseline` | `BASELINE` | document |
//!
//! Capitalization terms, proper nouns and the baseline transcript are
//! configuration; the builder methods on [`RuleSet`] swap in configured
//! instances.
//!
//! # Example
//!
//! ```rust
//! use capcheck_core::analysis::rules::RuleSet;
//!
//! let rules = RuleSet::builtin()
//!     .with_capitalization_terms(["iPhone"])?
//!     .with_baseline("00:00:00:00\t00:00:01:00\tSRC1");
//! assert!(rules.rule_by_id("baseline").is_some());
//! # Ok::<(), capcheck_core::CoreError>(())
//! ```

use super::Rule;
use crate::utils::errors::Result;

pub mod baseline;
pub mod capitalization;
pub mod cps;
pub mod cps_balance;
pub mod leading_whitespace;
pub mod max_chars;
pub mod merge_candidate;
pub mod missing_translation;
pub mod number_style;
pub mod percent_style;
pub mod punctuation;

pub use baseline::BaselineRule;
pub use capitalization::CapitalizationRule;
pub use cps::CpsRule;
pub use cps_balance::CpsBalanceRule;
pub use leading_whitespace::LeadingWhitespaceRule;
pub use max_chars::MaxCharsRule;
pub use merge_candidate::{bounded_levenshtein, MergeCandidateRule};
pub use missing_translation::MissingTranslationRule;
pub use number_style::NumberStyleRule;
pub use percent_style::PercentStyleRule;
pub use punctuation::PunctuationRule;

/// How often a rule runs per analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleScope {
    /// Once for every segment
    Segment,
    /// Once per document, at the first context
    Document,
}

/// Ordered list of rules
pub struct RuleSet {
    rules: Vec<Box<dyn Rule>>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::builtin()
    }
}

impl RuleSet {
    /// Rule set with no rules
    #[must_use]
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Every built-in rule, unconfigured
    ///
    /// Capitalization starts with no terms. The baseline rule is only
    /// added by [`RuleSet::with_baseline`].
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            rules: vec![
                Box::new(MaxCharsRule),
                Box::new(LeadingWhitespaceRule),
                Box::new(CpsRule),
                Box::new(CpsBalanceRule),
                Box::new(MergeCandidateRule),
                Box::new(NumberStyleRule),
                Box::new(PercentStyleRule),
                Box::new(CapitalizationRule::default()),
                Box::new(PunctuationRule::default()),
                Box::new(MissingTranslationRule),
            ],
        }
    }

    /// Append a rule
    #[must_use]
    pub fn with_rule(mut self, rule: Box<dyn Rule>) -> Self {
        self.rules.push(rule);
        self
    }

    /// Put `rule` in place of the rule sharing its id, or append it
    fn replace(mut self, rule: Box<dyn Rule>) -> Self {
        match self.rules.iter().position(|r| r.id() == rule.id()) {
            Some(index) => self.rules[index] = rule,
            None => self.rules.push(rule),
        }
        self
    }

    /// Configure capitalization terms
    ///
    /// # Errors
    ///
    /// Returns [`crate::CoreError::InvalidPattern`] if a term cannot be
    /// compiled into a matcher.
    pub fn with_capitalization_terms<I, S>(self, terms: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rule = CapitalizationRule::new(terms)?;
        Ok(self.replace(Box::new(rule)))
    }

    /// Configure proper nouns and abbreviations for punctuation checks
    #[must_use]
    pub fn with_proper_nouns<I, J, S, T>(self, proper_nouns: I, abbreviations: J) -> Self
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        self.replace(Box::new(PunctuationRule::new(proper_nouns, abbreviations)))
    }

    /// Compare every analysis against `baseline_text`
    #[must_use]
    pub fn with_baseline(self, baseline_text: &str) -> Self {
        self.replace(Box::new(BaselineRule::new(baseline_text)))
    }

    /// Rules in execution order
    pub fn iter(&self) -> impl Iterator<Item = &dyn Rule> {
        self.rules.iter().map(AsRef::as_ref)
    }

    /// Look a rule up by id
    #[must_use]
    pub fn rule_by_id(&self, id: &str) -> Option<&dyn Rule> {
        self.iter().find(|rule| rule.id() == id)
    }

    /// Ids in execution order
    #[must_use]
    pub fn ids(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.id()).collect()
    }

    /// Number of rules
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check whether the set has no rules
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
