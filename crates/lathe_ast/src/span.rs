//! Source positions for tree nodes and comments.
//!
//! The formatter never reads source text, but it does read source *positions*:
//! original blank-line spacing is recovered by comparing the end line of one
//! node with the start line of the next. The parser collaborator is required
//! to record a position for every token and comment it hands over.

use std::fmt;

/// A source position: 1-based line, 0-based column.
///
/// Line 0 is the sentinel for synthesized nodes and comments that have no
/// position in the original source (generated doc stubs, inserted
/// parentheses). Such positions compare equal to [`Pos::NONE`] and are
/// skipped by every original-spacing computation.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Pos {
    pub line: u32,
    pub col: u32,
}

impl Pos {
    /// Sentinel for "no source position".
    pub const NONE: Pos = Pos { line: 0, col: 0 };

    /// Create a position.
    #[inline]
    pub const fn new(line: u32, col: u32) -> Self {
        Pos { line, col }
    }

    /// Check whether this is the no-position sentinel.
    #[inline]
    pub const fn is_none(self) -> bool {
        self.line == 0
    }

    /// Check whether this position came from real source text.
    #[inline]
    pub const fn is_some(self) -> bool {
        self.line != 0
    }
}

impl fmt::Debug for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            write!(f, "Pos::NONE")
        } else {
            write!(f, "{}:{}", self.line, self.col)
        }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            write!(f, "<generated>")
        } else {
            write!(f, "{}:{}", self.line, self.col)
        }
    }
}

impl Default for Pos {
    fn default() -> Self {
        Pos::NONE
    }
}

/// Start/end position pair for a node or comment.
///
/// `end` points at the last line the construct occupies, not one past it, so
/// the original blank-line count between two siblings is
/// `next.start.line - prev.end.line - 1`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct Span {
    pub start: Pos,
    pub end: Pos,
}

impl Span {
    /// Sentinel span for synthesized constructs.
    pub const NONE: Span = Span {
        start: Pos::NONE,
        end: Pos::NONE,
    };

    /// Create a span from explicit positions.
    #[inline]
    pub const fn new(start: Pos, end: Pos) -> Self {
        Span { start, end }
    }

    /// Span covering a single line, columns `col..col`.
    #[inline]
    pub const fn at(line: u32, col: u32) -> Self {
        Span {
            start: Pos::new(line, col),
            end: Pos::new(line, col),
        }
    }

    /// Span covering `start_line..=end_line` starting at column 0.
    #[inline]
    pub const fn lines(start_line: u32, end_line: u32) -> Self {
        Span {
            start: Pos::new(start_line, 0),
            end: Pos::new(end_line, 0),
        }
    }

    /// Check whether this is the no-position sentinel.
    #[inline]
    pub const fn is_none(self) -> bool {
        self.start.is_none()
    }

    /// Check whether this span came from real source text.
    #[inline]
    pub const fn is_some(self) -> bool {
        self.start.is_some()
    }

    /// Merge two spans into one covering both.
    ///
    /// A sentinel span on either side yields the other side unchanged.
    pub fn union(self, other: Span) -> Span {
        match (self.is_some(), other.is_some()) {
            (true, true) => Span {
                start: self.start.min(other.start),
                end: self.end.max(other.end),
            },
            (true, false) => self,
            (false, _) => other,
        }
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            write!(f, "Span::NONE")
        } else {
            write!(f, "{:?}..{:?}", self.start, self.end)
        }
    }
}

/// Trait for types that carry a source span.
pub trait Spanned {
    /// Get the source span.
    fn span(&self) -> Span;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_sentinel() {
        assert!(Pos::NONE.is_none());
        assert!(Span::NONE.is_none());
        assert!(Pos::new(1, 0).is_some());
    }

    #[test]
    fn union_prefers_real_positions() {
        let a = Span::lines(3, 5);
        let b = Span::lines(7, 9);
        let merged = a.union(b);
        assert_eq!(merged.start.line, 3);
        assert_eq!(merged.end.line, 9);

        assert_eq!(Span::NONE.union(b), b);
        assert_eq!(a.union(Span::NONE), a);
    }

    #[test]
    fn display_marks_generated() {
        assert_eq!(Pos::NONE.to_string(), "<generated>");
        assert_eq!(Pos::new(12, 4).to_string(), "12:4");
    }
}
