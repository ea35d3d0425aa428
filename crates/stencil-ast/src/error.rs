//! Analysis diagnostics.
//!
//! Every problem the post-parse pass finds becomes a [`Diagnostic`]: a
//! categorized, located message. Diagnostics are advisory. They are collected
//! on the template in traversal order and never abort analysis.
//!
//! # Design
//!
//! - `Diagnostic` - one finding with a primary span and optional related spans
//! - `DiagnosticKind` - which structural rule produced it
//! - `DiagnosticFormatter` - renders diagnostics against a [`TemplateSource`]
//!
//! # Examples
//!
//! ```
//! # use stencil_ast::error::*;
//! # use stencil_ast::foundation::Span;
//! let diagnostic = Diagnostic::new(
//!     DiagnosticKind::MisplacedBreak,
//!     Span::new(10, 18, 2),
//!     "The break directive can only be used within a loop.".to_string(),
//! );
//! assert_eq!(diagnostic.kind.name(), "misplaced break");
//! ```

use crate::foundation::{Span, TemplateSource};
use std::fmt;

/// A non-fatal analysis finding tied to a source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Rule that produced this diagnostic
    pub kind: DiagnosticKind,
    /// Location of the offending node
    pub span: Span,
    /// Human-readable explanation
    pub message: String,
    /// Related locations (e.g. "first declared here")
    pub labels: Vec<Label>,
    /// Hints appended after the snippet
    pub notes: Vec<String>,
}

/// Category of a diagnostic, one per structural rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    // Header
    /// Header parameter name outside the recognized set
    UnknownHeaderParameter,
    /// Header parameter whose value could not be read
    InvalidHeaderParameter,

    // Scope
    /// Name declared twice where the language forbids it
    DuplicateDeclaration,
    /// Macro nested inside a construct other than a block or escape scope
    MisplacedMacro,

    // Assignment
    /// Assignment target that is not an L-value
    NotAssignable,
    /// `assign`/`local` directive used in strict-variable mode
    DeprecatedDirective,
    /// `local` directive outside any macro or function
    MisplacedLocal,

    // Control flow
    /// `break` outside any loop
    MisplacedBreak,
    /// `return` outside any macro or function
    MisplacedReturn,
    /// `return` whose value presence disagrees with the enclosing macro kind
    ReturnValueMismatch,

    // Escaping
    /// `noescape` with no enclosing `escape`
    MisplacedNoEscape,

    // Expressions and settings
    /// Built-in name that resolves to nothing
    UnknownBuiltIn,
    /// Property-setting key outside the configurable set
    UnknownSetting,
    /// String literal whose embedded interpolations do not parse
    InvalidStringLiteral,
}

/// Secondary labeled span in a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub span: Span,
    pub message: String,
}

impl Diagnostic {
    /// Creates a diagnostic with no labels or notes.
    pub fn new(kind: DiagnosticKind, span: Span, message: String) -> Self {
        Self {
            kind,
            span,
            message,
            labels: Vec::new(),
            notes: Vec::new(),
        }
    }

    /// Adds a related location.
    pub fn with_label(mut self, span: Span, message: String) -> Self {
        self.labels.push(Label { span, message });
        self
    }

    /// Adds a hint.
    pub fn with_note(mut self, note: String) -> Self {
        self.notes.push(note);
        self
    }
}

impl DiagnosticKind {
    /// Stable human-readable category name.
    pub fn name(self) -> &'static str {
        match self {
            DiagnosticKind::UnknownHeaderParameter => "unknown header parameter",
            DiagnosticKind::InvalidHeaderParameter => "invalid header parameter",
            DiagnosticKind::DuplicateDeclaration => "duplicate declaration",
            DiagnosticKind::MisplacedMacro => "misplaced macro",
            DiagnosticKind::NotAssignable => "not assignable",
            DiagnosticKind::DeprecatedDirective => "deprecated directive",
            DiagnosticKind::MisplacedLocal => "misplaced local",
            DiagnosticKind::MisplacedBreak => "misplaced break",
            DiagnosticKind::MisplacedReturn => "misplaced return",
            DiagnosticKind::ReturnValueMismatch => "return value mismatch",
            DiagnosticKind::MisplacedNoEscape => "misplaced noescape",
            DiagnosticKind::UnknownBuiltIn => "unknown built-in",
            DiagnosticKind::UnknownSetting => "unknown setting",
            DiagnosticKind::InvalidStringLiteral => "invalid string literal",
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error: {}: {} ({})", self.kind.name(), self.message, self.span)
    }
}

impl std::error::Error for Diagnostic {}

/// Renders diagnostics with the offending source line and a caret underline.
///
/// ```text
/// error: misplaced break: The break directive can only be used within a loop.
///   --> page.stl:2:1
///    |
///  2 | <#break>
///    | ^^^^^^^^
/// ```
pub struct DiagnosticFormatter<'a> {
    source: &'a TemplateSource,
}

impl<'a> DiagnosticFormatter<'a> {
    pub fn new(source: &'a TemplateSource) -> Self {
        Self { source }
    }

    /// Formats one diagnostic, including labels and notes.
    pub fn format(&self, diagnostic: &Diagnostic) -> String {
        let mut output = format!(
            "error: {}: {}\n",
            diagnostic.kind.name(),
            diagnostic.message
        );

        let (line, col) = self.source.line_col(diagnostic.span);
        output.push_str(&format!("  --> {}:{}:{}\n", self.source.name, line, col));

        if let Some(text) = self.source.line_text(line) {
            let first_line_len = (text.len() + 1).saturating_sub(col as usize);
            let width = (diagnostic.span.len() as usize).clamp(1, first_line_len.max(1));
            output.push_str("   |\n");
            output.push_str(&format!("{:3} | {}\n", line, text));
            output.push_str(&format!(
                "   | {}{}\n",
                " ".repeat(col as usize - 1),
                "^".repeat(width)
            ));
        }

        for label in &diagnostic.labels {
            let (label_line, label_col) = self.source.line_col(label.span);
            output.push_str(&format!(
                "   = note: {} at {}:{}:{}\n",
                label.message, self.source.name, label_line, label_col
            ));
        }

        for note in &diagnostic.notes {
            output.push_str(&format!("   = help: {}\n", note));
        }

        output
    }

    /// Formats several diagnostics separated by blank lines.
    pub fn format_all(&self, diagnostics: &[Diagnostic]) -> String {
        diagnostics
            .iter()
            .map(|d| self.format(d))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> TemplateSource {
        TemplateSource::new("page.stl", "<#list xs as x>\n<#break>\n</#list>")
    }

    #[test]
    fn test_diagnostic_chaining() {
        let diagnostic = Diagnostic::new(
            DiagnosticKind::DuplicateDeclaration,
            Span::new(0, 5, 1),
            "The variable x has already been declared in this block.".to_string(),
        )
        .with_label(Span::new(6, 8, 1), "first declared here".to_string())
        .with_note("rename one of the variables".to_string());

        assert_eq!(diagnostic.labels.len(), 1);
        assert_eq!(diagnostic.notes, vec!["rename one of the variables"]);
    }

    #[test]
    fn test_display_includes_kind_and_line() {
        let diagnostic = Diagnostic::new(
            DiagnosticKind::UnknownSetting,
            Span::new(16, 24, 2),
            "bad key".to_string(),
        );
        let text = diagnostic.to_string();
        assert!(text.contains("unknown setting"));
        assert!(text.contains("bad key"));
        assert!(text.contains("line 2"));
    }

    #[test]
    fn test_formatter_underlines_span() {
        let source = source();
        let diagnostic = Diagnostic::new(
            DiagnosticKind::MisplacedBreak,
            Span::new(16, 24, 2),
            "The break directive can only be used within a loop.".to_string(),
        );

        let formatted = DiagnosticFormatter::new(&source).format(&diagnostic);
        assert!(formatted.starts_with("error: misplaced break:"));
        assert!(formatted.contains("--> page.stl:2:1"));
        assert!(formatted.contains("  2 | <#break>"));
        assert!(formatted.contains("   | ^^^^^^^^\n"));
    }

    #[test]
    fn test_formatter_labels_and_notes() {
        let source = source();
        let diagnostic = Diagnostic::new(
            DiagnosticKind::DuplicateDeclaration,
            Span::new(16, 24, 2),
            "duplicate".to_string(),
        )
        .with_label(Span::new(0, 15, 1), "first declared here".to_string())
        .with_note("use a different name".to_string());

        let formatted = DiagnosticFormatter::new(&source).format(&diagnostic);
        assert!(formatted.contains("note: first declared here at page.stl:1:1"));
        assert!(formatted.contains("help: use a different name"));
    }

    #[test]
    fn test_format_all_joins() {
        let source = source();
        let diagnostics = vec![
            Diagnostic::new(
                DiagnosticKind::MisplacedBreak,
                Span::new(16, 24, 2),
                "first".to_string(),
            ),
            Diagnostic::new(
                DiagnosticKind::UnknownBuiltIn,
                Span::new(0, 3, 1),
                "second".to_string(),
            ),
        ];
        let formatted = DiagnosticFormatter::new(&source).format_all(&diagnostics);
        assert!(formatted.contains("first"));
        assert!(formatted.contains("second"));
        assert_eq!(formatted.matches("error:").count(), 2);
    }
}
