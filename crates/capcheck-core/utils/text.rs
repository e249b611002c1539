//! Character-class helpers shared by the segmenter and the rules.

/// Check whether a character belongs to a CJK block
///
/// Covers unified ideographs (and extension A), CJK punctuation,
/// kana, Hangul syllables and fullwidth forms.
#[must_use]
pub const fn is_cjk(c: char) -> bool {
    matches!(c,
        '\u{3000}'..='\u{303F}'
        | '\u{3040}'..='\u{30FF}'
        | '\u{3400}'..='\u{4DBF}'
        | '\u{4E00}'..='\u{9FFF}'
        | '\u{AC00}'..='\u{D7AF}'
        | '\u{F900}'..='\u{FAFF}'
        | '\u{FF00}'..='\u{FFEF}'
    )
}

/// Check whether text contains any CJK character
#[must_use]
pub fn contains_cjk(text: &str) -> bool {
    text.chars().any(is_cjk)
}

/// Check whether a line reads as English
///
/// English-like text has at least three Latin letters, does not open with
/// a bracket or parenthesis, and carries no CJK characters.
///
/// # Example
///
/// ```rust
/// use capcheck_core::utils::text::is_english_like;
///
/// assert!(is_english_like("Hello there"));
/// assert!(!is_english_like("(NATS)"));
/// assert!(!is_english_like("中文 abc"));
/// assert!(!is_english_like("OK"));
/// ```
#[must_use]
pub fn is_english_like(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.starts_with(['[', '(']) {
        return false;
    }
    if contains_cjk(trimmed) {
        return false;
    }
    trimmed.chars().filter(char::is_ascii_alphabetic).count() >= 3
}

/// Number of Unicode scalar values in the trimmed text
#[must_use]
pub fn char_count(text: &str) -> usize {
    text.trim().chars().count()
}

/// Trim, collapse internal whitespace runs to one space, and lowercase
#[must_use]
pub fn normalize_for_compare(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Check whether a line is empty once whitespace is removed
#[must_use]
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}
