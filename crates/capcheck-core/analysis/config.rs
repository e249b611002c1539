//! Options controlling analysis behavior
//!
//! [`AnalysisOptions`] is a plain value: every field has a default, and the
//! serialized form uses camelCase keys so option files written for other
//! tooling load unchanged.

use crate::{
    analysis::metric::{MetricKind, MetricKinds},
    utils::hashers::create_hash_set,
};

/// Default maximum characters per line
pub const DEFAULT_MAX_CHARS: usize = 54;

/// Default maximum reading speed
pub const DEFAULT_MAX_CPS: f64 = 17.0;

/// Default reading-speed jump that triggers a balance warning
pub const DEFAULT_CPS_BALANCE_DELTA: f64 = 5.0;

/// Default largest gap, in frames, between merge candidates
pub const DEFAULT_MAX_GAP_FRAMES: u32 = 30;

/// Default largest edit distance between merge candidates
pub const DEFAULT_MAX_EDIT_DISTANCE: usize = 2;

/// Configuration for an analysis pass
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct AnalysisOptions {
    /// Let blank lines sit between a timestamp row and its payload, and
    /// between rows of one run
    pub ignore_empty_lines: bool,
    /// Longest allowed line, in characters
    pub max_chars: usize,
    /// Fastest allowed reading speed
    pub max_cps: f64,
    /// Slowest allowed reading speed, if any
    pub min_cps: Option<f64>,
    /// Reading-speed jump between adjacent runs worth reporting
    pub cps_balance_delta: f64,
    /// Largest gap between merge candidates
    pub max_gap_frames: u32,
    /// Largest edit distance between merge candidates
    pub max_edit_distance: usize,
    /// Kinds to report (empty = all)
    pub enabled_rule_types: Vec<MetricKind>,
    /// Report warning-severity findings
    pub include_warnings: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            ignore_empty_lines: false,
            max_chars: DEFAULT_MAX_CHARS,
            max_cps: DEFAULT_MAX_CPS,
            min_cps: None,
            cps_balance_delta: DEFAULT_CPS_BALANCE_DELTA,
            max_gap_frames: DEFAULT_MAX_GAP_FRAMES,
            max_edit_distance: DEFAULT_MAX_EDIT_DISTANCE,
            enabled_rule_types: Vec::new(),
            include_warnings: true,
        }
    }
}

impl AnalysisOptions {
    /// Load options from a JSON object
    ///
    /// Missing keys take their defaults, and so do out-of-range limits
    /// (see [`AnalysisOptions::sanitized`]).
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfig`](crate::CoreError::InvalidConfig)
    /// on malformed JSON.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> crate::Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        let options = options.sanitized();
        log::debug!("loaded analysis options: {options:?}");
        Ok(options)
    }

    /// Replace limits that make the checks meaningless with their defaults
    ///
    /// A zero or non-finite `maxCps`, a `minCps` outside `0..=maxCps` and a
    /// negative `cpsBalanceDelta` each fall back with a warning.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        if !self.max_cps.is_finite() || self.max_cps <= 0.0 {
            log::warn!(
                "maxCps {} out of range, using {DEFAULT_MAX_CPS}",
                self.max_cps
            );
            self.max_cps = DEFAULT_MAX_CPS;
        }
        if let Some(min) = self.min_cps {
            if !min.is_finite() || min < 0.0 || min > self.max_cps {
                log::warn!("minCps {min} out of range, disabling MIN_CPS");
                self.min_cps = None;
            }
        }
        if !self.cps_balance_delta.is_finite() || self.cps_balance_delta < 0.0 {
            log::warn!(
                "cpsBalanceDelta {} out of range, using {DEFAULT_CPS_BALANCE_DELTA}",
                self.cps_balance_delta
            );
            self.cps_balance_delta = DEFAULT_CPS_BALANCE_DELTA;
        }
        self
    }

    /// Kinds that survive filtering
    #[must_use]
    pub fn enabled_kinds(&self) -> MetricKinds {
        if self.enabled_rule_types.is_empty() {
            MetricKinds::all()
        } else {
            self.enabled_rule_types.iter().copied().collect()
        }
    }

    /// Set blank-line tolerance.
    #[must_use]
    pub const fn with_ignore_empty_lines(mut self, ignore: bool) -> Self {
        self.ignore_empty_lines = ignore;
        self
    }

    /// Set the line-length limit.
    #[must_use]
    pub const fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    /// Set the reading-speed limits.
    #[must_use]
    pub const fn with_cps_limits(mut self, max_cps: f64, min_cps: Option<f64>) -> Self {
        self.max_cps = max_cps;
        self.min_cps = min_cps;
        self
    }

    /// Restrict output to the given kinds.
    #[must_use]
    pub fn with_enabled_rule_types<I: IntoIterator<Item = MetricKind>>(mut self, kinds: I) -> Self {
        self.enabled_rule_types = kinds.into_iter().collect();
        self
    }

    /// Include or drop warning findings.
    #[must_use]
    pub const fn with_include_warnings(mut self, include: bool) -> Self {
        self.include_warnings = include;
        self
    }
}

/// Parse a newline-separated term list
///
/// Blank lines and `#` comments are skipped; duplicates are dropped while
/// keeping first-seen order.
///
/// # Example
///
/// ```rust
/// use capcheck_core::analysis::config::parse_term_list;
///
/// let terms = parse_term_list("# brands\niPhone\n\nYouTube\niPhone\n");
/// assert_eq!(terms, vec!["iPhone", "YouTube"]);
/// ```
#[must_use]
pub fn parse_term_list(text: &str) -> Vec<String> {
    let mut seen = create_hash_set();
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter(|line| seen.insert(*line))
        .map(str::to_string)
        .collect()
}
