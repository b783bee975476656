//! Arena-backed parse tree.
//!
//! Nodes live in a flat arena addressed by stable [`NodeId`] indices; the
//! parent/first-child/sibling shape of the original pointer structure becomes
//! `Option<NodeId>` links. Splicing (inserted parentheses, synthesized
//! comments) is a bounded link rewrite under single ownership of the arena.
//! Link symmetry is a structural invariant: every rewrite keeps
//! `prev_sibling`/`next_sibling` pairs and `parent`/`first_child` pairs in
//! agreement, checked by debug assertions.

use crate::{CommentChain, Name, NodeKind, Span};

/// Index of a node in a [`Tree`] arena.
///
/// Equality is an integer compare. `NodeId` is only meaningful together with
/// the tree that allocated it.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct NodeId(u32);

impl NodeId {
    /// Create from a raw index.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        NodeId(raw)
    }

    /// Get the raw index.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Debug for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// One parse-tree node.
///
/// Leaf kinds carry their token text in `text`; interior kinds link to their
/// children. The comment chains hold hidden tokens the parser attached before
/// (`leading`) and after, on the same line (`trailing`).
#[derive(Clone, Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub text: Option<Name>,
    pub span: Span,
    pub parent: Option<NodeId>,
    pub first_child: Option<NodeId>,
    pub next_sibling: Option<NodeId>,
    pub prev_sibling: Option<NodeId>,
    pub leading: CommentChain,
    pub trailing: CommentChain,
}

impl Node {
    fn new(kind: NodeKind, text: Option<Name>, span: Span) -> Self {
        Node {
            kind,
            text,
            span,
            parent: None,
            first_child: None,
            next_sibling: None,
            prev_sibling: None,
            leading: CommentChain::new(),
            trailing: CommentChain::new(),
        }
    }

    /// Check whether the node has any attached comment, leading or trailing.
    #[inline]
    pub fn has_comments(&self) -> bool {
        !self.leading.is_empty() || !self.trailing.is_empty()
    }
}

/// The parse-tree arena.
///
/// Single-rooted and acyclic. The root is the first allocated node; the
/// parser collaborator (or [`TreeBuilder`]) constructs the tree, the
/// formatter's prepare pass performs the only post-construction mutation.
#[derive(Clone, Debug)]
pub struct Tree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Tree {
    /// Create a tree with a root node of the given kind.
    pub fn new(root_kind: NodeKind, span: Span) -> Self {
        Tree {
            nodes: vec![Node::new(root_kind, None, span)],
            root: NodeId(0),
        }
    }

    /// The root node id.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes in the arena.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Borrow a node.
    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Borrow a node mutably.
    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    /// Kind of a node, as a shorthand.
    #[inline]
    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.node(id).kind
    }

    /// Allocate a detached interior node.
    pub fn alloc(&mut self, kind: NodeKind, span: Span) -> NodeId {
        self.alloc_node(Node::new(kind, None, span))
    }

    /// Allocate a detached leaf node carrying token text.
    pub fn alloc_leaf(&mut self, kind: NodeKind, text: Name, span: Span) -> NodeId {
        self.alloc_node(Node::new(kind, Some(text), span))
    }

    fn alloc_node(&mut self, node: Node) -> NodeId {
        let id = NodeId(u32::try_from(self.nodes.len()).unwrap_or_else(|_| {
            // 2^32 nodes in one source file is beyond any real input.
            panic!("tree arena exceeded u32 node capacity")
        }));
        self.nodes.push(node);
        id
    }

    /// Append a detached node as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        debug_assert!(self.node(child).parent.is_none(), "child already attached");
        match self.last_child(parent) {
            Some(last) => {
                self.node_mut(last).next_sibling = Some(child);
                self.node_mut(child).prev_sibling = Some(last);
            }
            None => {
                self.node_mut(parent).first_child = Some(child);
            }
        }
        self.node_mut(child).parent = Some(parent);
    }

    /// Insert a detached node immediately before `anchor` in its sibling list.
    pub fn insert_before(&mut self, anchor: NodeId, node: NodeId) {
        debug_assert!(self.node(node).parent.is_none(), "node already attached");
        let parent = self.node(anchor).parent;
        debug_assert!(parent.is_some(), "cannot insert beside the root");
        let prev = self.node(anchor).prev_sibling;

        self.node_mut(node).parent = parent;
        self.node_mut(node).prev_sibling = prev;
        self.node_mut(node).next_sibling = Some(anchor);
        self.node_mut(anchor).prev_sibling = Some(node);
        match prev {
            Some(p) => self.node_mut(p).next_sibling = Some(node),
            None => {
                if let Some(parent) = parent {
                    self.node_mut(parent).first_child = Some(node);
                }
            }
        }
    }

    /// Insert a detached node immediately after `anchor` in its sibling list.
    pub fn insert_after(&mut self, anchor: NodeId, node: NodeId) {
        debug_assert!(self.node(node).parent.is_none(), "node already attached");
        let parent = self.node(anchor).parent;
        debug_assert!(parent.is_some(), "cannot insert beside the root");
        let next = self.node(anchor).next_sibling;

        self.node_mut(node).parent = parent;
        self.node_mut(node).prev_sibling = Some(anchor);
        self.node_mut(node).next_sibling = next;
        self.node_mut(anchor).next_sibling = Some(node);
        if let Some(n) = next {
            self.node_mut(n).prev_sibling = Some(node);
        }
    }

    /// Splice a `Paren` node around `id`, taking its place in the sibling
    /// list and adopting it as the sole child.
    ///
    /// Used by the prepare pass for configured ternary parenthesization.
    pub fn wrap_in_parens(&mut self, id: NodeId) -> NodeId {
        let span = self.node(id).span;
        let paren = self.alloc(NodeKind::Paren, span);

        let parent = self.node(id).parent;
        let prev = self.node(id).prev_sibling;
        let next = self.node(id).next_sibling;

        // Put the paren where the wrapped node was.
        self.node_mut(paren).parent = parent;
        self.node_mut(paren).prev_sibling = prev;
        self.node_mut(paren).next_sibling = next;
        match prev {
            Some(p) => self.node_mut(p).next_sibling = Some(paren),
            None => {
                if let Some(parent) = parent {
                    self.node_mut(parent).first_child = Some(paren);
                }
            }
        }
        if let Some(n) = next {
            self.node_mut(n).prev_sibling = Some(paren);
        }

        // Adopt the wrapped node.
        let wrapped = self.node_mut(id);
        wrapped.parent = Some(paren);
        wrapped.prev_sibling = None;
        wrapped.next_sibling = None;
        self.node_mut(paren).first_child = Some(id);
        paren
    }

    /// First child of a node.
    #[inline]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).first_child
    }

    /// Last child of a node, walking the sibling list.
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        let mut cur = self.node(id).first_child?;
        while let Some(next) = self.node(cur).next_sibling {
            cur = next;
        }
        Some(cur)
    }

    /// Iterate the direct children of a node in sibling order.
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            cursor: self.node(id).first_child,
        }
    }

    /// Number of direct children.
    pub fn child_count(&self, id: NodeId) -> usize {
        self.children(id).count()
    }

    /// The `n`th direct child (0-based).
    pub fn nth_child(&self, id: NodeId, n: usize) -> Option<NodeId> {
        self.children(id).nth(n)
    }

    /// First direct child with the given kind.
    pub fn child_of_kind(&self, id: NodeId, kind: NodeKind) -> Option<NodeId> {
        self.children(id).find(|&c| self.kind(c) == kind)
    }

    /// Check whether any node in the subtree (including `id` itself)
    /// satisfies the predicate.
    pub fn subtree_any(&self, id: NodeId, pred: &mut impl FnMut(&Node) -> bool) -> bool {
        if pred(self.node(id)) {
            return true;
        }
        let mut child = self.node(id).first_child;
        while let Some(c) = child {
            if self.subtree_any(c, pred) {
                return true;
            }
            child = self.node(c).next_sibling;
        }
        false
    }

    /// Iterate every node id in allocation order.
    ///
    /// Allocation order is not traversal order; use it for whole-tree scans
    /// that do not care about shape (validation, re-tagging).
    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        #[allow(clippy::cast_possible_truncation)]
        (0..self.nodes.len() as u32).map(NodeId)
    }
}

/// Iterator over direct children.
pub struct Children<'a> {
    tree: &'a Tree,
    cursor: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.cursor?;
        self.cursor = self.tree.node(id).next_sibling;
        Some(id)
    }
}

/// Stack-based construction API for parser collaborators and tests.
///
/// `open` pushes an interior node, `close` pops it; `leaf` appends a token
/// leaf to the currently open node. The builder keeps the arena invariants by
/// construction.
pub struct TreeBuilder<'a> {
    interner: &'a crate::StringInterner,
    tree: Tree,
    stack: Vec<NodeId>,
}

impl<'a> TreeBuilder<'a> {
    /// Start a file tree.
    pub fn new(interner: &'a crate::StringInterner) -> Self {
        let tree = Tree::new(NodeKind::File, Span::NONE);
        let root = tree.root();
        TreeBuilder {
            interner,
            tree,
            stack: vec![root],
        }
    }

    fn top(&self) -> NodeId {
        // The root stays on the stack until finish(), so the stack is
        // never empty while building.
        *self.stack.last().unwrap_or(&self.tree.root)
    }

    /// Open an interior node under the current one.
    pub fn open(&mut self, kind: NodeKind, span: Span) -> &mut Self {
        let id = self.tree.alloc(kind, span);
        self.tree.append_child(self.top(), id);
        self.stack.push(id);
        self
    }

    /// Close the most recently opened node.
    pub fn close(&mut self) -> &mut Self {
        debug_assert!(self.stack.len() > 1, "close without matching open");
        self.stack.pop();
        self
    }

    /// Append a leaf with interned token text.
    pub fn leaf(&mut self, kind: NodeKind, text: &str, span: Span) -> &mut Self {
        let name = self.interner.intern(text);
        let id = self.tree.alloc_leaf(kind, name, span);
        self.tree.append_child(self.top(), id);
        self
    }

    /// Append an empty interior node (no children) under the current one.
    pub fn node(&mut self, kind: NodeKind, span: Span) -> &mut Self {
        let id = self.tree.alloc(kind, span);
        self.tree.append_child(self.top(), id);
        self
    }

    /// Attach a leading comment to the currently open node.
    pub fn leading(&mut self, kind: crate::CommentKind, text: &str, span: Span) -> &mut Self {
        let name = self.interner.intern(text);
        let top = self.top();
        self.tree
            .node_mut(top)
            .leading
            .push(crate::Comment::new(kind, name, span));
        self
    }

    /// Attach a leading comment to the most recently appended child.
    pub fn leading_on_last(
        &mut self,
        kind: crate::CommentKind,
        text: &str,
        span: Span,
    ) -> &mut Self {
        let name = self.interner.intern(text);
        if let Some(last) = self.tree.last_child(self.top()) {
            self.tree
                .node_mut(last)
                .leading
                .push(crate::Comment::new(kind, name, span));
        }
        self
    }

    /// Attach a trailing comment to the most recently appended child.
    pub fn trailing_on_last(
        &mut self,
        kind: crate::CommentKind,
        text: &str,
        span: Span,
    ) -> &mut Self {
        let name = self.interner.intern(text);
        if let Some(last) = self.tree.last_child(self.top()) {
            self.tree
                .node_mut(last)
                .trailing
                .push(crate::Comment::new(kind, name, span));
        }
        self
    }

    /// Set the span of the most recently appended child.
    pub fn span_on_last(&mut self, span: Span) -> &mut Self {
        if let Some(last) = self.tree.last_child(self.top()) {
            self.tree.node_mut(last).span = span;
        }
        self
    }

    /// Finish building and return the tree.
    pub fn finish(mut self) -> Tree {
        debug_assert!(self.stack.len() == 1, "unclosed node at finish");
        self.stack.clear();
        self.tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StringInterner;

    fn interner() -> StringInterner {
        StringInterner::new()
    }

    #[test]
    fn append_builds_sibling_chain() {
        let mut tree = Tree::new(NodeKind::File, Span::NONE);
        let root = tree.root();
        let a = tree.alloc(NodeKind::Class, Span::lines(1, 3));
        let b = tree.alloc(NodeKind::Class, Span::lines(5, 7));
        tree.append_child(root, a);
        tree.append_child(root, b);

        let kids: Vec<NodeId> = tree.children(root).collect();
        assert_eq!(kids, vec![a, b]);
        assert_eq!(tree.node(b).prev_sibling, Some(a));
        assert_eq!(tree.node(a).next_sibling, Some(b));
        assert_eq!(tree.node(a).parent, Some(root));
    }

    #[test]
    fn insert_before_first_rewires_parent() {
        let mut tree = Tree::new(NodeKind::File, Span::NONE);
        let root = tree.root();
        let a = tree.alloc(NodeKind::Import, Span::NONE);
        tree.append_child(root, a);
        let pkg = tree.alloc(NodeKind::Package, Span::NONE);
        tree.insert_before(a, pkg);

        assert_eq!(tree.first_child(root), Some(pkg));
        assert_eq!(tree.node(pkg).next_sibling, Some(a));
        assert_eq!(tree.node(a).prev_sibling, Some(pkg));
    }

    #[test]
    fn insert_after_middle_keeps_chain() {
        let mut tree = Tree::new(NodeKind::File, Span::NONE);
        let root = tree.root();
        let a = tree.alloc(NodeKind::Import, Span::NONE);
        let c = tree.alloc(NodeKind::Class, Span::NONE);
        tree.append_child(root, a);
        tree.append_child(root, c);
        let b = tree.alloc(NodeKind::Import, Span::NONE);
        tree.insert_after(a, b);

        let kids: Vec<NodeId> = tree.children(root).collect();
        assert_eq!(kids, vec![a, b, c]);
        assert_eq!(tree.node(c).prev_sibling, Some(b));
    }

    #[test]
    fn wrap_in_parens_takes_the_slot() {
        let i = interner();
        let mut tree = Tree::new(NodeKind::File, Span::NONE);
        let root = tree.root();
        let stmt = tree.alloc(NodeKind::ExprStmt, Span::NONE);
        tree.append_child(root, stmt);
        let cond = tree.alloc_leaf(NodeKind::Ident, i.intern("x"), Span::NONE);
        tree.append_child(stmt, cond);

        let paren = tree.wrap_in_parens(cond);
        assert_eq!(tree.first_child(stmt), Some(paren));
        assert_eq!(tree.first_child(paren), Some(cond));
        assert_eq!(tree.node(cond).parent, Some(paren));
        assert_eq!(tree.node(cond).next_sibling, None);
    }

    #[test]
    fn builder_round_trip() {
        let i = interner();
        let mut b = TreeBuilder::new(&i);
        b.open(NodeKind::Class, Span::lines(1, 5));
        b.leaf(NodeKind::Ident, "Widget", Span::at(1, 6));
        b.open(NodeKind::TypeBody, Span::lines(1, 5));
        b.close();
        b.close();
        let tree = b.finish();

        let class = tree.first_child(tree.root()).unwrap_or(tree.root());
        assert_eq!(tree.kind(class), NodeKind::Class);
        assert_eq!(tree.child_count(class), 2);
        let name = tree.child_of_kind(class, NodeKind::Ident);
        assert!(name.is_some());
    }

    #[test]
    fn subtree_any_finds_nested_kind() {
        let i = interner();
        let mut b = TreeBuilder::new(&i);
        b.open(NodeKind::Block, Span::NONE);
        b.open(NodeKind::If, Span::NONE);
        b.leaf(NodeKind::Ident, "cond", Span::NONE);
        b.open(NodeKind::Block, Span::NONE);
        b.node(NodeKind::LocalVar, Span::NONE);
        b.close();
        b.close();
        b.close();
        let tree = b.finish();

        let has_local = {
            let root = tree.root();
            let mut pred = |n: &Node| n.kind == NodeKind::LocalVar;
            tree.subtree_any(root, &mut pred)
        };
        assert!(has_local);
    }
}
