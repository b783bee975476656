//! Fatal render errors.
//!
//! These represent structurally inconsistent input, not formatting choices:
//! a tree the strategies cannot walk has no safe partial output, so the
//! render of that file aborts and the error becomes an `F`-coded diagnostic
//! naming the offending node and its source position. Everything recoverable
//! (doc-tag repairs, degraded layouts) is a warning, never an error.

use lathe_ast::{NodeKind, Pos, Span};
use lathe_diagnostic::{DiagCode, Diagnostic};
use thiserror::Error;

/// A fatal input-structure defect found during rendering.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// A node is missing a child its kind requires.
    #[error("{kind} at {pos} is missing its {what}")]
    MissingChild {
        kind: NodeKind,
        pos: Pos,
        what: &'static str,
    },

    /// Bracket or parenthesis structure does not balance.
    #[error("unmatched bracket in {kind} at {pos}")]
    UnmatchedBracket { kind: NodeKind, pos: Pos },

    /// A comment chain is not monotonic in source order.
    #[error("comment chain on {kind} at {pos} breaks source order at record {index}")]
    CommentOrder {
        kind: NodeKind,
        pos: Pos,
        index: usize,
    },
}

impl RenderError {
    /// The diagnostic code for this error.
    pub fn code(&self) -> DiagCode {
        match self {
            RenderError::MissingChild { .. } => DiagCode::F0001,
            RenderError::UnmatchedBracket { .. } => DiagCode::F0002,
            RenderError::CommentOrder { .. } => DiagCode::F0003,
        }
    }

    /// Source position of the offending node.
    pub fn pos(&self) -> Pos {
        match self {
            RenderError::MissingChild { pos, .. }
            | RenderError::UnmatchedBracket { pos, .. }
            | RenderError::CommentOrder { pos, .. } => *pos,
        }
    }

    /// Convert into the diagnostic reported to the caller.
    pub fn into_diagnostic(self) -> Diagnostic {
        let span = Span::new(self.pos(), self.pos());
        let message = self.to_string();
        Diagnostic::error(self.code(), message).with_span(span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_variants() {
        let e = RenderError::MissingChild {
            kind: NodeKind::Method,
            pos: Pos::new(4, 0),
            what: "parameter list",
        };
        assert_eq!(e.code(), DiagCode::F0001);
        assert!(e.code().is_fatal());
        assert_eq!(e.pos().line, 4);
    }

    #[test]
    fn diagnostic_carries_position_and_kind() {
        let e = RenderError::CommentOrder {
            kind: NodeKind::Field,
            pos: Pos::new(12, 4),
            index: 1,
        };
        let d = e.into_diagnostic();
        assert_eq!(d.code, DiagCode::F0003);
        assert!(d.message.contains("field declaration"));
        assert_eq!(d.span.start, Pos::new(12, 4));
    }
}
