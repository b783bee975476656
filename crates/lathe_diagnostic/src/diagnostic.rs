//! Diagnostic records.

use std::fmt;

use lathe_ast::Span;

use crate::DiagCode;

/// Severity level for diagnostics.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Note => write!(f, "note"),
        }
    }
}

/// A labeled span with a message.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Label {
    pub span: Span,
    pub message: String,
}

impl Label {
    /// Create a label.
    pub fn new(span: Span, message: impl Into<String>) -> Self {
        Label {
            span,
            message: message.into(),
        }
    }
}

/// One diagnostic: code, severity, primary message, optional labels/notes.
///
/// Build with the `error`/`warning` constructors and the `with_*` chain;
/// every `with_*` method is `#[must_use]` so a forgotten reassignment is a
/// compile warning, not a silently dropped note.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Diagnostic {
    pub code: DiagCode,
    pub severity: Severity,
    pub message: String,
    pub span: Span,
    pub labels: Vec<Label>,
    pub notes: Vec<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    pub fn error(code: DiagCode, message: impl Into<String>) -> Self {
        Diagnostic {
            code,
            severity: Severity::Error,
            message: message.into(),
            span: Span::NONE,
            labels: Vec::new(),
            notes: Vec::new(),
        }
    }

    /// Create a warning diagnostic.
    pub fn warning(code: DiagCode, message: impl Into<String>) -> Self {
        Diagnostic {
            code,
            severity: Severity::Warning,
            message: message.into(),
            span: Span::NONE,
            labels: Vec::new(),
            notes: Vec::new(),
        }
    }

    /// Attach the primary source span.
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Attach a labeled span.
    #[must_use]
    pub fn with_label(mut self, label: Label) -> Self {
        self.labels.push(label);
        self
    }

    /// Attach a free-form note.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Check whether this diagnostic is an error.
    #[inline]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.code, self.message)?;
        if self.span.is_some() {
            write!(f, " at {}", self.span.start)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lathe_ast::Pos;

    #[test]
    fn builder_chain_collects_parts() {
        let d = Diagnostic::warning(DiagCode::W1001, "missing @param tag for `count`")
            .with_span(Span::at(10, 4))
            .with_note("inserted a stub tag");
        assert_eq!(d.severity, Severity::Warning);
        assert_eq!(d.span.start, Pos::new(10, 4));
        assert_eq!(d.notes.len(), 1);
        assert!(!d.is_error());
    }

    #[test]
    fn display_includes_code_and_position() {
        let d = Diagnostic::error(DiagCode::F0001, "method declaration has no body")
            .with_span(Span::at(3, 0));
        let text = d.to_string();
        assert!(text.contains("F0001"));
        assert!(text.contains("3:0"));
    }

    #[test]
    fn generated_span_is_not_displayed() {
        let d = Diagnostic::warning(DiagCode::W1005, "file has no header comment");
        assert!(!d.to_string().contains("at"));
    }
}
