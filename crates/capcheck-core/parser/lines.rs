//! Line-source abstraction
//!
//! Every parser and rule reads text through [`LineSource`], so the same
//! analysis runs over an in-memory string or a live editor buffer.

/// Read-only, index-addressed access to document lines
pub trait LineSource {
    /// Number of lines in the document
    fn line_count(&self) -> usize;

    /// Line at `index`, without its terminator
    ///
    /// Returns `None` when `index` is out of range.
    fn line(&self, index: usize) -> Option<&str>;

    /// Line at `index`, or the empty string when out of range
    fn line_or_empty(&self, index: usize) -> &str {
        self.line(index).unwrap_or("")
    }
}

impl<S: AsRef<str>> LineSource for [S] {
    fn line_count(&self) -> usize {
        self.len()
    }

    fn line(&self, index: usize) -> Option<&str> {
        self.get(index).map(AsRef::as_ref)
    }
}

impl<S: AsRef<str>> LineSource for Vec<S> {
    fn line_count(&self) -> usize {
        self.len()
    }

    fn line(&self, index: usize) -> Option<&str> {
        self.get(index).map(AsRef::as_ref)
    }
}

/// Owned document split into lines after line-ending normalization
///
/// Splitting follows `str::split('\n')`, so an empty document has one
/// empty line and a trailing newline yields a trailing empty line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextLines {
    lines: Vec<String>,
}

impl TextLines {
    /// Normalize line endings and split into lines
    ///
    /// # Example
    ///
    /// ```rust
    /// use capcheck_core::parser::{LineSource, TextLines};
    ///
    /// let lines = TextLines::new("one\r\ntwo\rthree");
    /// assert_eq!(lines.line_count(), 3);
    /// assert_eq!(lines.line(2), Some("three"));
    /// ```
    #[must_use]
    pub fn new(text: &str) -> Self {
        let normalized = normalize_line_endings(text);
        Self {
            lines: normalized.split('\n').map(str::to_string).collect(),
        }
    }

    /// Iterate over lines in document order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }
}

impl LineSource for TextLines {
    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }
}

/// Convert `\r\n` and lone `\r` line endings to `\n`
#[must_use]
pub fn normalize_line_endings(text: &str) -> String {
    if !text.contains('\r') {
        return text.to_string();
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_has_one_line() {
        let lines = TextLines::new("");
        assert_eq!(lines.line_count(), 1);
        assert_eq!(lines.line(0), Some(""));
        assert_eq!(lines.line(1), None);
    }

    #[test]
    fn mixed_line_endings() {
        assert_eq!(normalize_line_endings("a\r\nb\rc\n"), "a\nb\nc\n");
        let lines = TextLines::new("a\r\nb\n");
        assert_eq!(lines.iter().collect::<Vec<_>>(), vec!["a", "b", ""]);
    }

    #[test]
    fn slices_are_line_sources() {
        let lines = ["first", "second"];
        assert_eq!(lines[..].line_count(), 2);
        assert_eq!(lines[..].line(1), Some("second"));
        assert_eq!(lines[..].line_or_empty(9), "");

        let owned = vec!["x".to_string()];
        assert_eq!(owned.line(0), Some("x"));
    }
}
