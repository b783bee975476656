//! Alignment markers.
//!
//! A marker anchors a (line, column) position that later text on a wrapped
//! line aligns under: continuation arguments under the first argument, a
//! ternary `:` under its `?`, deep-indent continuations under the nearest
//! open bracket. Markers are strictly nested with syntactic scope: every
//! strategy pops exactly what it pushed, and the depth after any strategy
//! invocation equals the depth before. Violating that is a programming
//! defect, caught by debug assertions, not a runtime condition.

use smallvec::SmallVec;

/// An anchored alignment position.
///
/// `depth` is the stack depth at push time; `pop` checks it so an
/// out-of-order pop fails loudly in debug builds.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Marker {
    pub line: u32,
    pub column: usize,
    depth: usize,
}

/// Stack of alignment markers.
///
/// Owned by the render surface, so a probe surface starts from a disposable
/// clone of the commit surface's stack and never touches the persistent one.
#[derive(Clone, Debug, Default)]
pub struct MarkerStack {
    stack: SmallVec<[Marker; 8]>,
}

impl MarkerStack {
    /// Create an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current depth.
    #[inline]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Push an anchor at an explicit position.
    pub fn push(&mut self, line: u32, column: usize) -> Marker {
        let marker = Marker {
            line,
            column,
            depth: self.stack.len(),
        };
        self.stack.push(marker);
        marker
    }

    /// Pop a marker pushed by the same scope.
    pub fn pop(&mut self, marker: Marker) {
        let top = self.stack.pop();
        debug_assert_eq!(
            top,
            Some(marker),
            "marker popped out of LIFO order (depth {} expected {})",
            self.stack.len(),
            marker.depth,
        );
    }

    /// Innermost anchor without popping.
    ///
    /// Deep-indent strategies read this to align continuations under the
    /// nearest open bracket instead of a fixed indent unit.
    #[inline]
    pub fn peek_last(&self) -> Option<Marker> {
        self.stack.last().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_pop_balances() {
        let mut stack = MarkerStack::new();
        let outer = stack.push(1, 8);
        let inner = stack.push(1, 16);
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.peek_last().map(|m| m.column), Some(16));
        stack.pop(inner);
        stack.pop(outer);
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    #[should_panic(expected = "LIFO")]
    #[cfg(debug_assertions)]
    fn out_of_order_pop_is_a_defect() {
        let mut stack = MarkerStack::new();
        let outer = stack.push(1, 8);
        let _inner = stack.push(1, 16);
        stack.pop(outer);
    }

    #[test]
    fn peek_on_empty_is_none() {
        let stack = MarkerStack::new();
        assert_eq!(stack.peek_last(), None);
    }
}
