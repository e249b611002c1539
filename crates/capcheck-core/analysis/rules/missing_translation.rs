//! Missing translation rule.

use crate::{
    analysis::{
        context::RuleContext,
        metric::{Metric, MetricKind, MissingTranslationMetric},
        Rule,
    },
    segment::SegmentKind,
};

/// Flags script blocks whose source text has no English lines after it
pub struct MissingTranslationRule;

impl Rule for MissingTranslationRule {
    fn id(&self) -> &'static str {
        "missing-translation"
    }

    fn name(&self) -> &'static str {
        "Missing Translation"
    }

    fn description(&self) -> &'static str {
        "Flags VO or SUPER source blocks that were never translated"
    }

    fn kind(&self) -> MetricKind {
        MetricKind::MissingTranslation
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Metric> {
        let Some(segment) = ctx.segment() else {
            return Vec::new();
        };
        match &segment.kind {
            SegmentKind::Script {
                block_type,
                source_text,
                target_line_indices,
                ..
            } if target_line_indices.is_empty() && !source_text.is_empty() => {
                vec![Metric::MissingTranslation(MissingTranslationMetric {
                    line_index: segment.line_index,
                    source_text: source_text.clone(),
                    block_type: *block_type,
                })]
            }
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{analysis::test_support::check_segments, segment::{BlockType, ScriptType}};

    #[test]
    fn untranslated_block_is_flagged() {
        let text = "VO:\n中文一\nTranslated line\n\n中文二\n\n/*SUPER\n字幕\n*/";
        let metrics = check_segments(&MissingTranslationRule, text, ScriptType::News);
        let found: Vec<_> = metrics
            .iter()
            .map(|metric| match metric {
                Metric::MissingTranslation(m) => (m.line_index, m.block_type),
                other => panic!("unexpected metric {other:?}"),
            })
            .collect();
        assert_eq!(found, vec![(4, BlockType::Vo), (7, BlockType::Super)]);
    }

    #[test]
    fn captions_are_never_flagged() {
        let text = "00:00:00:00\t00:00:01:00\n中文";
        assert!(check_segments(&MissingTranslationRule, text, ScriptType::Subs).is_empty());
    }
}
