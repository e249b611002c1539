//! News-dialect segmentation
//!
//! A news script interleaves source-language lines (CJK) with their
//! English translation, grouped into VO narration and SUPER graphics:
//!
//! ```text
//! 001_0010
//! VO:
//! 今天的新闻
//! Today's news
//!
//! /*SUPER: 标题*/
//! Headline text
//! ```
//!
//! Structural lines and blank lines close the pending block. SUPER mode is
//! switched on by a `/*SUPER` comment or a `SUPER:` label and lasts until
//! the next blank or structural line.

use super::{BlockType, Segment, SegmentKind};
use crate::{
    parser::LineSource,
    utils::text::{contains_cjk, is_blank, is_english_like},
};

/// Classification of a trimmed news-script line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineClass<'a> {
    /// Blank line
    Blank,
    /// `LABEL:` with whatever follows the colon
    Label { name: &'a str, rest: &'a str },
    /// `NNN_NNNN` scene marker or `<<<` / `>>>` marker
    Marker,
    /// Opening `/*` comment delimiter with the text after it
    CommentStart(&'a str),
    /// Anything else
    Content,
}

fn classify(trimmed: &str) -> LineClass<'_> {
    if trimmed.is_empty() {
        return LineClass::Blank;
    }
    if let Some(rest) = trimmed.strip_prefix("/*") {
        return LineClass::CommentStart(rest);
    }
    if trimmed.starts_with("<<<") || trimmed.starts_with(">>>") || is_scene_marker(trimmed) {
        return LineClass::Marker;
    }
    if let Some((name, rest)) = split_label(trimmed) {
        return LineClass::Label { name, rest };
    }
    LineClass::Content
}

/// `NNN_NNNN` at line start
fn is_scene_marker(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() >= 8
        && bytes[..3].iter().all(u8::is_ascii_digit)
        && bytes[3] == b'_'
        && bytes[4..8].iter().all(u8::is_ascii_digit)
}

/// Two to five uppercase ASCII letters followed by a colon
fn split_label(text: &str) -> Option<(&str, &str)> {
    let letters = text.bytes().take_while(u8::is_ascii_uppercase).count();
    if !(2..=5).contains(&letters) || text.as_bytes().get(letters) != Some(&b':') {
        return None;
    }
    Some((&text[..letters], text[letters + 1..].trim()))
}

/// Body of a `/*SUPER` opener, if the comment is a SUPER comment
fn super_body(after_open: &str) -> Option<&str> {
    let trimmed = after_open.trim_start();
    let head = trimmed.get(..5)?;
    if !head.eq_ignore_ascii_case("super") {
        return None;
    }
    Some(trimmed[5..].trim_start_matches(|c: char| c == ':' || c.is_whitespace()))
}

/// Forward-scan state for one news document
#[derive(Debug, Default)]
struct NewsSegmenter {
    segments: Vec<Segment>,
    source: Vec<(usize, String)>,
    target: Vec<(usize, String)>,
    pending_type: Option<BlockType>,
    super_mode: bool,
    in_comment: bool,
    in_super_comment: bool,
}

impl NewsSegmenter {
    fn current_type(&self) -> BlockType {
        if self.super_mode {
            BlockType::Super
        } else {
            BlockType::Vo
        }
    }

    fn feed(&mut self, index: usize, line: &str) {
        let trimmed = line.trim();

        if self.in_comment {
            self.feed_comment_body(index, trimmed);
            return;
        }

        match classify(trimmed) {
            LineClass::Blank | LineClass::Marker => self.flush_and_reset(),
            LineClass::Label { name, rest } => {
                self.flush_and_reset();
                if name == "SUPER" {
                    self.super_mode = true;
                }
                self.content(index, rest);
            }
            LineClass::CommentStart(after_open) => self.open_comment(index, after_open),
            LineClass::Content => self.content(index, trimmed),
        }
    }

    fn open_comment(&mut self, index: usize, after_open: &str) {
        let is_super = super_body(after_open).is_some();
        let body = super_body(after_open).unwrap_or(after_open);
        let (body, closed) = match body.find("*/") {
            Some(pos) => (&body[..pos], true),
            None => (body, false),
        };

        if is_super {
            self.super_mode = true;
            self.content(index, body.trim());
        }
        if !closed {
            self.in_comment = true;
            self.in_super_comment = is_super;
        }
    }

    fn feed_comment_body(&mut self, index: usize, trimmed: &str) {
        let (body, closed) = match trimmed.find("*/") {
            Some(pos) => (&trimmed[..pos], true),
            None => (trimmed, false),
        };
        if self.in_super_comment {
            self.content(index, body.trim());
        }
        if closed {
            self.in_comment = false;
            self.in_super_comment = false;
        }
    }

    fn content(&mut self, index: usize, text: &str) {
        if is_blank(text) {
            return;
        }
        let block_type = self.current_type();

        if contains_cjk(text) {
            if !self.target.is_empty() || self.pending_type.is_some_and(|t| t != block_type) {
                self.flush();
            }
            self.source.push((index, text.to_string()));
            self.pending_type = Some(block_type);
        } else if is_english_like(text) {
            if self.pending_type.is_some_and(|t| t != block_type) {
                self.flush();
            }
            self.target.push((index, text.to_string()));
            self.pending_type = Some(block_type);
        }
    }

    fn flush_and_reset(&mut self) {
        self.flush();
        self.super_mode = false;
    }

    fn flush(&mut self) {
        let block_type = self.pending_type.take().unwrap_or(BlockType::Vo);
        if self.source.is_empty() && self.target.is_empty() {
            return;
        }

        let source = core::mem::take(&mut self.source);
        let target = core::mem::take(&mut self.target);

        let line_index = target
            .first()
            .or_else(|| source.first())
            .map_or(0, |(index, _)| *index);
        let end_line_index = source
            .iter()
            .chain(target.iter())
            .map(|(index, _)| *index)
            .max()
            .unwrap_or(line_index);

        let text = join_lines(&target);
        self.segments.push(Segment {
            line_index,
            end_line_index,
            english_like: !target.is_empty(),
            text,
            kind: SegmentKind::Script {
                block_type,
                source_text: join_lines(&source),
                source_line_indices: source.iter().map(|(index, _)| *index).collect(),
                target_line_indices: target.iter().map(|(index, _)| *index).collect(),
            },
        });
    }
}

fn join_lines(lines: &[(usize, String)]) -> String {
    lines
        .iter()
        .map(|(_, text)| text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Segment a VO/SUPER news script
///
/// # Example
///
/// ```rust
/// use capcheck_core::{parser::TextLines, segment::{parse_news, BlockType}};
///
/// let lines = TextLines::new("VO:\n今天天气很好\nThe weather is nice today");
/// let segments = parse_news(&lines);
/// assert_eq!(segments.len(), 1);
/// assert_eq!(segments[0].line_index, 2);
/// assert_eq!(segments[0].source_text(), Some("今天天气很好"));
/// assert_eq!(segments[0].block_type(), Some(BlockType::Vo));
/// ```
#[must_use]
pub fn parse_news<L: LineSource + ?Sized>(lines: &L) -> Vec<Segment> {
    let mut segmenter = NewsSegmenter::default();
    for index in 0..lines.line_count() {
        segmenter.feed(index, lines.line_or_empty(index));
    }
    segmenter.flush();
    segmenter.segments
}
