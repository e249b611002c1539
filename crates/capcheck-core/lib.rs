//! # capcheck core
//!
//! Quality-assurance analyzer for time-coded caption scripts and bilingual
//! VO/SUPER news scripts. Flags reading-speed problems, style violations,
//! missing translations and drift against a trusted baseline transcript.
//!
//! ## Pipeline
//!
//! raw text → line-ending normalization → [`segment`] → rule engine
//! ([`analysis`]) → [`Metric`]s → [`classify`] → [`Finding`]s
//!
//! ## Quick Start
//!
//! ```rust
//! use capcheck_core::{AnalysisOptions, Analyzer, RuleSet, ScriptType};
//!
//! let script = "\
//! 00:00:08:00\t00:00:09:00
//! Gap text
//! 00:00:10:00\t00:00:11:00
//! Gap text.";
//!
//! let analyzer = Analyzer::with_rules(
//!     RuleSet::builtin().with_capitalization_terms(["iPhone"])?,
//!     AnalysisOptions::default(),
//! );
//! for finding in analyzer.findings(script, ScriptType::Subs) {
//!     println!("line {}: [{}] {}", finding.line_index() + 1, finding.severity, finding.instruction);
//! }
//! # Ok::<(), capcheck_core::CoreError>(())
//! ```
//!
//! ## Dialects
//!
//! - **Subs**: `HH:MM:SS:FF<TAB>HH:MM:SS:FF` rows at 30 fps, each followed by
//!   the payload line shown on screen
//! - **News**: CJK source lines paired with English targets, grouped into
//!   VO narration and SUPER graphics blocks

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(clippy::all)]
#![deny(unsafe_code)]

pub mod analysis;
pub mod parser;
pub mod segment;
pub mod timing;
pub mod utils;

pub use analysis::{
    analyze_lines, analyze_segments, analyze_text, analyze_text_by_type, classify,
    AnalysisOptions, Analyzer, Finding, Metric, MetricKind, Rule, RuleSet, Severity,
};
pub use parser::{TextLines, TimestampBlock};
pub use segment::{ScriptType, Segment};
pub use timing::{Frame, FRAME_RATE};
pub use utils::{CoreError, Result};

/// Crate version for runtime compatibility checks
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
