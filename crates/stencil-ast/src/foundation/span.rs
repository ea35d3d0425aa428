//! Source locations for diagnostics.
//!
//! A template is always a single source text, so a [`Span`] carries no file
//! identifier. The owning [`TemplateSource`] turns spans back into
//! `(line, column)` pairs and snippets when diagnostics are rendered.
//!
//! # Examples
//!
//! ```
//! # use stencil_ast::foundation::{Span, TemplateSource};
//! let source = TemplateSource::new("page.stl", "<#var x>\n${x}");
//! let span = Span::new(9, 13, 2);
//!
//! assert_eq!(source.snippet(span), "${x}");
//! assert_eq!(source.line_col(span), (2, 1));
//! ```

use serde::{Deserialize, Serialize};

/// Byte range inside a template source, with the 1-based line of its start
/// cached so plain `Display` output needs no source lookup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Byte offset of the first character
    pub start: u32,
    /// Byte offset one past the last character
    pub end: u32,
    /// 1-based line of `start`
    pub line: u32,
}

impl Span {
    pub fn new(start: u32, end: u32, line: u32) -> Self {
        debug_assert!(end >= start, "inverted span {start}..{end}");
        Self { start, end, line }
    }

    /// Zero-length span at the very start of the template.
    pub fn empty() -> Self {
        Self::new(0, 0, 1)
    }

    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Smallest span covering both `self` and `other`.
    pub fn to(&self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
            line: self.line.min(other.line),
        }
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}", self.line)
    }
}

/// The text a template was parsed from, indexed by line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateSource {
    /// Template name used in rendered locations (usually its path)
    pub name: String,
    /// Original source text
    pub text: String,
    /// Byte offset of every line start; `line_starts[0] == 0`
    line_starts: Vec<u32>,
}

impl TemplateSource {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let line_starts = std::iter::once(0)
            .chain(
                text.char_indices()
                    .filter(|(_, ch)| *ch == '\n')
                    .map(|(idx, _)| (idx + 1) as u32),
            )
            .collect();
        Self {
            name: name.into(),
            text,
            line_starts,
        }
    }

    /// 1-based `(line, column)` of the span start. Offsets past the end of
    /// the text are clamped to the last position.
    pub fn line_col(&self, span: Span) -> (u32, u32) {
        let offset = span.start.min(self.text.len() as u32);
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        };
        let column = offset - self.line_starts[line_idx] + 1;
        (line_idx as u32 + 1, column)
    }

    /// Text of a 1-based line without its line terminator.
    pub fn line_text(&self, line: u32) -> Option<&str> {
        let idx = (line as usize).checked_sub(1)?;
        let start = *self.line_starts.get(idx)? as usize;
        let end = self
            .line_starts
            .get(idx + 1)
            .map(|next| *next as usize)
            .unwrap_or(self.text.len());
        Some(self.text[start..end].trim_end_matches(|c: char| c == '\n' || c == '\r'))
    }

    /// Source text covered by `span`, clamped to the text bounds.
    pub fn snippet(&self, span: Span) -> &str {
        let len = self.text.len();
        let start = (span.start as usize).min(len);
        let end = (span.end as usize).clamp(start, len);
        &self.text[start..end]
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_cover() {
        let a = Span::new(4, 8, 1);
        let b = Span::new(10, 20, 2);
        let covered = a.to(b);
        assert_eq!(covered, Span::new(4, 20, 1));
        assert_eq!(covered.len(), 16);
        assert!(Span::empty().is_empty());
    }

    #[test]
    fn test_line_col_across_lines() {
        let source = TemplateSource::new("t.stl", "ab\ncd\n\nef");
        assert_eq!(source.line_col(Span::new(0, 1, 1)), (1, 1));
        assert_eq!(source.line_col(Span::new(4, 5, 2)), (2, 2));
        assert_eq!(source.line_col(Span::new(6, 6, 3)), (3, 1));
        assert_eq!(source.line_col(Span::new(8, 9, 4)), (4, 2));
        assert_eq!(source.line_count(), 4);
    }

    #[test]
    fn test_line_text_strips_terminator() {
        let source = TemplateSource::new("t.stl", "first\r\nsecond\n");
        assert_eq!(source.line_text(1), Some("first"));
        assert_eq!(source.line_text(2), Some("second"));
        assert_eq!(source.line_text(3), Some(""));
        assert_eq!(source.line_text(0), None);
        assert_eq!(source.line_text(9), None);
    }

    #[test]
    fn test_snippet_is_clamped() {
        let source = TemplateSource::new("t.stl", "${user}");
        assert_eq!(source.snippet(Span::new(2, 6, 1)), "user");
        assert_eq!(source.snippet(Span::new(5, 100, 1)), "r}");
        assert_eq!(source.snippet(Span::new(50, 60, 1)), "");
    }
}
