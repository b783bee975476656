//! Comment records and per-node comment chains.
//!
//! Comments are hidden tokens: the parser attaches them to the node they
//! precede (leading chain) or trail on the same line (trailing chain). The
//! formatter re-emits them, decides spacing between them, and may splice in
//! synthesized records (doc stubs, close-brace annotations) tagged as
//! generated so a later run refreshes instead of duplicating them.

use crate::{Name, Span};
use smallvec::SmallVec;
use std::fmt;

/// The lexical kind of a comment.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum CommentKind {
    /// `// text`
    Line,
    /// `/* text */`, possibly spanning several lines.
    Block,
    /// `/** text */` documentation comment.
    Doc,
    /// `//~ text` section separator line.
    Separator,
}

impl CommentKind {
    /// Check if this is a documentation comment.
    #[inline]
    pub fn is_doc(self) -> bool {
        matches!(self, CommentKind::Doc)
    }
}

/// One comment record.
///
/// `text` holds the content without delimiters; the kind decides how the
/// renderer frames it. Multi-line block and doc content uses embedded `\n`,
/// one entry per content line, without decoration columns.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Comment {
    pub kind: CommentKind,
    pub text: Name,
    pub span: Span,
    /// Set on records synthesized by the formatter (the original's
    /// "auto-generated marker" kind). Generated records carry no source
    /// position and are replaced, not duplicated, on a re-run.
    pub generated: bool,
}

impl Comment {
    /// Create a comment with a source position.
    #[inline]
    pub fn new(kind: CommentKind, text: Name, span: Span) -> Self {
        Comment {
            kind,
            text,
            span,
            generated: false,
        }
    }

    /// Create a formatter-generated comment with no source position.
    #[inline]
    pub fn generated(kind: CommentKind, text: Name) -> Self {
        Comment {
            kind,
            text,
            span: Span::NONE,
            generated: true,
        }
    }
}

impl fmt::Debug for Comment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} {:?} @ {:?}{}",
            self.kind,
            self.text,
            self.span,
            if self.generated { " (generated)" } else { "" }
        )
    }
}

/// Ordered chain of comments attached before or after one node.
///
/// Positioned records are monotonic in source order; splice operations
/// preserve that order. Generated records (no position) may sit anywhere.
/// Most nodes carry zero or one comment, so two slots live inline.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CommentChain {
    comments: SmallVec<[Comment; 2]>,
}

impl CommentChain {
    /// Create an empty chain.
    #[inline]
    pub fn new() -> Self {
        CommentChain {
            comments: SmallVec::new(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.comments.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Comment> {
        self.comments.iter()
    }

    #[inline]
    pub fn first(&self) -> Option<&Comment> {
        self.comments.first()
    }

    #[inline]
    pub fn last(&self) -> Option<&Comment> {
        self.comments.last()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Comment> {
        self.comments.get(index)
    }

    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Comment> {
        self.comments.get_mut(index)
    }

    /// Append a comment at the end of the chain.
    pub fn push(&mut self, comment: Comment) {
        self.comments.push(comment);
    }

    /// Insert a comment at an index, shifting later records.
    pub fn insert(&mut self, index: usize, comment: Comment) {
        self.comments.insert(index, comment);
    }

    /// Remove and return the record at an index.
    pub fn remove(&mut self, index: usize) -> Comment {
        self.comments.remove(index)
    }

    /// Remove every record matching the predicate.
    pub fn retain(&mut self, keep: impl FnMut(&mut Comment) -> bool) {
        self.comments.retain(keep);
    }

    /// Move all records of `other` onto the end of this chain.
    pub fn merge(&mut self, other: &mut CommentChain) {
        self.comments.append(&mut other.comments);
    }

    /// Check that positioned records appear in source order.
    ///
    /// Returns the index of the first record that breaks monotonic order.
    /// Generated records are skipped; a chain that interleaves them freely
    /// is still well formed.
    pub fn check_order(&self) -> Result<(), usize> {
        let mut prev: Option<Span> = None;
        for (i, c) in self.comments.iter().enumerate() {
            if c.span.is_none() {
                continue;
            }
            if let Some(p) = prev {
                if c.span.start < p.start {
                    return Err(i);
                }
            }
            prev = Some(c.span);
        }
        Ok(())
    }

    /// First doc comment in the chain, if any.
    pub fn doc(&self) -> Option<&Comment> {
        self.comments.iter().find(|c| c.kind.is_doc())
    }

    /// Index of the first doc comment in the chain, if any.
    pub fn doc_index(&self) -> Option<usize> {
        self.comments.iter().position(|c| c.kind.is_doc())
    }
}

impl fmt::Debug for CommentChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CommentChain({} comments)", self.comments.len())
    }
}

impl<'a> IntoIterator for &'a CommentChain {
    type Item = &'a Comment;
    type IntoIter = std::slice::Iter<'a, Comment>;

    fn into_iter(self) -> Self::IntoIter {
        self.comments.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StringInterner;

    #[test]
    fn push_and_iterate() {
        let interner = StringInterner::new();
        let mut chain = CommentChain::new();
        chain.push(Comment::new(
            CommentKind::Line,
            interner.intern("first"),
            Span::lines(1, 1),
        ));
        chain.push(Comment::new(
            CommentKind::Block,
            interner.intern("second"),
            Span::lines(3, 4),
        ));
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.first().map(|c| c.kind), Some(CommentKind::Line));
        assert_eq!(chain.last().map(|c| c.kind), Some(CommentKind::Block));
    }

    #[test]
    fn retain_drops_matching_records() {
        let interner = StringInterner::new();
        let mut chain = CommentChain::new();
        chain.push(Comment::new(
            CommentKind::Line,
            interner.intern("authored"),
            Span::lines(1, 1),
        ));
        chain.push(Comment::generated(
            CommentKind::Line,
            interner.intern("synthesized"),
        ));
        chain.retain(|c| !c.generated);
        assert_eq!(chain.len(), 1);
        assert!(!chain.first().map_or(true, |c| c.generated));
    }

    #[test]
    fn order_check_flags_regression() {
        let interner = StringInterner::new();
        let mut chain = CommentChain::new();
        chain.push(Comment::new(
            CommentKind::Line,
            interner.intern("later"),
            Span::lines(9, 9),
        ));
        chain.push(Comment::new(
            CommentKind::Line,
            interner.intern("earlier"),
            Span::lines(2, 2),
        ));
        assert_eq!(chain.check_order(), Err(1));
    }

    #[test]
    fn generated_records_do_not_break_order() {
        let interner = StringInterner::new();
        let mut chain = CommentChain::new();
        chain.push(Comment::new(
            CommentKind::Line,
            interner.intern("a"),
            Span::lines(1, 1),
        ));
        chain.push(Comment::generated(CommentKind::Doc, interner.intern("stub")));
        chain.push(Comment::new(
            CommentKind::Line,
            interner.intern("b"),
            Span::lines(5, 5),
        ));
        assert_eq!(chain.check_order(), Ok(()));
    }

    #[test]
    fn merge_preserves_both_sides() {
        let interner = StringInterner::new();
        let mut a = CommentChain::new();
        a.push(Comment::new(
            CommentKind::Line,
            interner.intern("a"),
            Span::lines(1, 1),
        ));
        let mut b = CommentChain::new();
        b.push(Comment::new(
            CommentKind::Line,
            interner.intern("b"),
            Span::lines(2, 2),
        ));
        a.merge(&mut b);
        assert_eq!(a.len(), 2);
        assert!(b.is_empty());
        assert_eq!(a.check_order(), Ok(()));
    }

    #[test]
    fn doc_lookup() {
        let interner = StringInterner::new();
        let mut chain = CommentChain::new();
        chain.push(Comment::new(
            CommentKind::Line,
            interner.intern("note"),
            Span::lines(1, 1),
        ));
        chain.push(Comment::new(
            CommentKind::Doc,
            interner.intern("Does things."),
            Span::lines(2, 4),
        ));
        assert_eq!(chain.doc_index(), Some(1));
    }
}
