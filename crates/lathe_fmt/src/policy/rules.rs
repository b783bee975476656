//! Declarative spacing tables.
//!
//! The base blank-line count between two statement-level nodes is a pure
//! function of (node kind, predecessor kind) and the configuration; the
//! evaluation in [`super`] then layers forced boundary overrides and
//! preserved original spacing on top. Comment runs use a second table keyed
//! by (comment kind, previous comment kind).

use lathe_ast::{CommentKind, NodeKind};

use crate::config::FormatConfig;

/// Base blank lines before `kind` when it follows `prev`.
pub(crate) fn blank_lines_between(
    kind: NodeKind,
    prev: Option<NodeKind>,
    cfg: &FormatConfig,
) -> usize {
    let Some(prev) = prev else {
        // First node of its container; boundary overrides handle the
        // open-brace case, nothing is forced here.
        return 0;
    };

    // Section boundaries of the file preamble outrank the per-kind rows.
    if prev == NodeKind::Package {
        return usize::from(cfg.blank_lines_after_package);
    }
    if prev == NodeKind::Import && kind != NodeKind::Import {
        return usize::from(cfg.blank_lines_after_imports);
    }

    match kind {
        k if k.is_type_decl() => usize::from(cfg.blank_lines_before_class),
        NodeKind::Method
        | NodeKind::Constructor
        | NodeKind::StaticInit
        | NodeKind::InstanceInit => usize::from(cfg.blank_lines_before_method),
        NodeKind::Field => {
            // A field directly after executable members reads as a new
            // section even when fields are otherwise packed.
            if matches!(prev, NodeKind::Method | NodeKind::Constructor) || prev.is_type_decl() {
                usize::from(cfg.blank_lines_before_field).max(1)
            } else {
                usize::from(cfg.blank_lines_before_field)
            }
        }
        k if k.is_control() => usize::from(cfg.blank_lines_before_block),
        _ => 0,
    }
}

/// Blank lines between two adjacent comments in one run.
pub(crate) fn comment_gap(kind: CommentKind, prev: CommentKind) -> usize {
    match (prev, kind) {
        // Separators stand alone.
        (CommentKind::Separator, _) | (_, CommentKind::Separator) => 1,
        // A doc comment after ordinary commentary starts its own paragraph.
        (CommentKind::Line | CommentKind::Block, CommentKind::Doc) => 1,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preamble_sections_take_precedence() {
        let cfg = FormatConfig::default();
        assert_eq!(
            blank_lines_between(NodeKind::Import, Some(NodeKind::Package), &cfg),
            1
        );
        assert_eq!(
            blank_lines_between(NodeKind::Class, Some(NodeKind::Import), &cfg),
            2
        );
        assert_eq!(
            blank_lines_between(NodeKind::Import, Some(NodeKind::Import), &cfg),
            0
        );
    }

    #[test]
    fn members_use_their_rows() {
        let cfg = FormatConfig::default();
        assert_eq!(
            blank_lines_between(NodeKind::Method, Some(NodeKind::Field), &cfg),
            1
        );
        assert_eq!(
            blank_lines_between(NodeKind::Field, Some(NodeKind::Field), &cfg),
            0
        );
        assert_eq!(
            blank_lines_between(NodeKind::Field, Some(NodeKind::Method), &cfg),
            1
        );
    }

    #[test]
    fn first_node_gets_no_base_spacing() {
        let cfg = FormatConfig::default();
        assert_eq!(blank_lines_between(NodeKind::Class, None, &cfg), 0);
    }

    #[test]
    fn comment_runs_space_heterogeneous_kinds() {
        assert_eq!(comment_gap(CommentKind::Line, CommentKind::Line), 0);
        assert_eq!(comment_gap(CommentKind::Doc, CommentKind::Line), 1);
        assert_eq!(comment_gap(CommentKind::Separator, CommentKind::Line), 1);
        assert_eq!(comment_gap(CommentKind::Block, CommentKind::Doc), 0);
    }
}
