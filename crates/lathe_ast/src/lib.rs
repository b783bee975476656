//! Parse-tree data model for the Lathe source formatter.
//!
//! This crate owns everything the layout engine consumes but does not
//! produce: the node arena and its kind union, source positions, comment
//! records and per-node comment chains, and the shared string interner.
//! A parser collaborator (or [`TreeBuilder`] in tests) constructs the tree;
//! `lathe_fmt` renders it.

mod comment;
mod interner;
mod name;
mod node_kind;
mod span;
mod tree;

pub use comment::{Comment, CommentChain, CommentKind};
pub use interner::{InternOverflow, StringInterner};
pub use name::Name;
pub use node_kind::NodeKind;
pub use span::{Pos, Span, Spanned};
pub use tree::{Children, Node, NodeId, Tree, TreeBuilder};
