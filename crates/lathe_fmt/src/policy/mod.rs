//! Blank-line and comment placement policy.
//!
//! Every statement-level node rendered inside a block, type body, or the
//! file root goes through [`render_statement`]: it computes the blank lines
//! before the node, flushes the leading comment chain, dispatches the node
//! itself, and flushes the trailing chain. Nested non-statement nodes never
//! compute spacing of their own; they inherit the enclosing statement's
//! decision by simply being rendered inline.
//!
//! The blank-line count is the base table value, overridden by forced
//! open/close-brace boundary counts, then raised to the original source gap
//! (clamped to the configured maximum) wherever the node's syntactic
//! position legally allows free vertical spacing.

pub(crate) mod rules;

use lathe_ast::{Comment, CommentKind, NodeId, NodeKind, Tree};
use lathe_diagnostic::{DiagCode, Diagnostic};
use tracing::debug;

use crate::error::RenderError;
use crate::render::RenderJob;
use crate::surface::RenderSurface;

/// The once-per-file warning for alignment columns rounded on a tab grid.
pub(crate) fn tab_rounding_warning() -> Diagnostic {
    Diagnostic::warning(
        DiagCode::W2001,
        "indentation is ambiguous under the all-tabs policy; \
         alignment columns were rounded to tab stops",
    )
}

/// First source line the node occupies, counting its leading comments.
///
/// Generated comments carry no position and are skipped.
pub(crate) fn visible_start_line(tree: &Tree, id: NodeId) -> Option<u32> {
    let node = tree.node(id);
    for c in node.leading.iter() {
        if c.span.is_some() {
            return Some(c.span.start.line);
        }
    }
    node.span.is_some().then(|| node.span.start.line)
}

/// Last source line the node occupies, counting trailing comments.
pub(crate) fn end_line(tree: &Tree, id: NodeId) -> Option<u32> {
    let node = tree.node(id);
    let mut end = node.span.is_some().then(|| node.span.end.line);
    for c in node.trailing.iter() {
        if c.span.is_some() {
            end = Some(end.map_or(c.span.end.line, |e| e.max(c.span.end.line)));
        }
    }
    end
}

/// Original blank-line gap between a node and its predecessor, if both have
/// source positions.
pub(crate) fn original_gap(tree: &Tree, id: NodeId, prev: NodeId) -> Option<usize> {
    let start = visible_start_line(tree, id)?;
    let end = end_line(tree, prev)?;
    if start > end {
        Some((start - end - 1) as usize)
    } else {
        Some(0)
    }
}

/// Blank lines to emit before a statement-level node.
pub(crate) fn blank_lines_before(
    job: &RenderJob,
    id: NodeId,
    prev: Option<NodeId>,
    first_in_body: bool,
) -> usize {
    let tree = job.tree;
    let cfg = job.cfg;
    let kind = tree.kind(id);
    let prev_kind = prev.map(|p| tree.kind(p));

    let mut n = rules::blank_lines_between(kind, prev_kind, cfg);

    // (a) forced boundary counts override the table.
    if first_in_body {
        if let Some(forced) = cfg.blank_lines_after_open_brace {
            n = usize::from(forced);
        }
    }

    // (b)+(c) where the syntactic position allows free vertical spacing,
    // raise to the original gap, clamped to the preserve cap.
    let position_allows = tree
        .node(id)
        .parent
        .is_some_and(|p| tree.kind(p).allows_free_spacing());
    if position_allows {
        if let Some(prev) = prev {
            if let Some(orig) = original_gap(tree, id, prev) {
                let clamped = orig.min(cfg.keep_blank_lines);
                if clamped > n {
                    debug!(?kind, orig, clamped, "preserving original blank lines");
                    n = clamped;
                }
            }
        }
    }
    n
}

/// Emit the forced spacing before a closing brace, if configured.
pub(crate) fn before_close_brace(job: &RenderJob, s: &mut RenderSurface) {
    if let Some(forced) = job.cfg.blank_lines_before_close_brace {
        if forced > 0 {
            s.blank_lines(usize::from(forced));
        }
    }
}

/// Render one statement-level child: spacing, leading comments, the node,
/// trailing comments.
pub(crate) fn render_statement(
    job: &mut RenderJob,
    id: NodeId,
    s: &mut RenderSurface,
    prev: Option<NodeId>,
    first_in_body: bool,
) -> Result<(), RenderError> {
    s.ensure_newline();
    let blanks = blank_lines_before(job, id, prev, first_in_body);
    if blanks > 0 {
        s.blank_lines(blanks);
    }
    flush_leading(job, id, s)?;
    job.render(id, s)?;
    flush_trailing(job, id, s)
}

/// Flush a node's leading comment chain before its own text.
///
/// The first comment of the run floats at the node's natural column; every
/// later comment is forced to align under the first, regardless of its
/// original column. Heterogeneous kinds get the run-spacing table between
/// them.
pub(crate) fn flush_leading(
    job: &mut RenderJob,
    id: NodeId,
    s: &mut RenderSurface,
) -> Result<(), RenderError> {
    let tree = job.tree;
    let node = tree.node(id);
    if node.leading.is_empty() {
        return Ok(());
    }
    if let Err(index) = node.leading.check_order() {
        return Err(RenderError::CommentOrder {
            kind: node.kind,
            pos: node.span.start,
            index,
        });
    }

    let owner = node.kind;
    let mut anchor: Option<usize> = None;
    let mut prev_kind: Option<CommentKind> = None;
    for comment in node.leading.iter().copied() {
        match (prev_kind, anchor) {
            (Some(prev), Some(col)) => {
                let gap = rules::comment_gap(comment.kind, prev);
                if gap > 0 {
                    s.blank_lines(gap);
                }
                s.break_to_column(col);
            }
            _ => s.ensure_newline(),
        }
        let col = s.effective_column();
        emit_comment(job, &comment, owner, s);
        anchor.get_or_insert(col);
        prev_kind = Some(comment.kind);
        s.ensure_newline();
    }
    Ok(())
}

/// Flush a node's trailing (endline) comment chain with single-space
/// padding, on the line the node just finished.
pub(crate) fn flush_trailing(
    job: &mut RenderJob,
    id: NodeId,
    s: &mut RenderSurface,
) -> Result<(), RenderError> {
    let tree = job.tree;
    let node = tree.node(id);
    if node.trailing.is_empty() {
        return Ok(());
    }
    if let Err(index) = node.trailing.check_order() {
        return Err(RenderError::CommentOrder {
            kind: node.kind,
            pos: node.span.start,
            index,
        });
    }

    let owner = node.kind;
    for comment in node.trailing.iter().copied() {
        s.space();
        emit_endline_comment(job, &comment, owner, s);
    }
    Ok(())
}

/// Emit one comment in canonical block form at the current position.
pub(crate) fn emit_comment(
    job: &RenderJob,
    comment: &Comment,
    owner: NodeKind,
    s: &mut RenderSurface,
) {
    let text = job.text(comment.text);
    match comment.kind {
        CommentKind::Line => {
            for (i, line) in text.split('\n').enumerate() {
                if i > 0 {
                    s.newline();
                }
                emit_prefixed(s, "//", line, owner);
            }
        }
        CommentKind::Separator => {
            emit_prefixed(s, "//~", text, owner);
        }
        CommentKind::Block | CommentKind::Doc => {
            let open = if comment.kind == CommentKind::Doc {
                "/**"
            } else {
                "/*"
            };
            if !text.contains('\n') {
                s.emit(open, owner);
                if !text.is_empty() {
                    s.space();
                    s.emit(text, owner);
                }
                s.space();
                s.emit("*/", owner);
            } else {
                let col = s.emit(open, owner) - open.chars().count();
                for line in text.split('\n') {
                    s.break_to_column(col);
                    emit_prefixed(s, " *", line, owner);
                }
                s.break_to_column(col);
                s.emit(" */", owner);
            }
        }
    }
}

/// Emit a trailing comment in its single-line form.
fn emit_endline_comment(job: &RenderJob, comment: &Comment, owner: NodeKind, s: &mut RenderSurface) {
    let text = job.text(comment.text);
    match comment.kind {
        CommentKind::Line | CommentKind::Separator => {
            // Endline comments flatten to one line; the parser never
            // attaches a multi-line record here.
            emit_prefixed(s, "//", text, owner);
        }
        CommentKind::Block | CommentKind::Doc => {
            s.emit("/*", owner);
            if !text.is_empty() {
                s.space();
                s.emit(&text.replace('\n', " "), owner);
            }
            s.space();
            s.emit("*/", owner);
        }
    }
}

fn emit_prefixed(s: &mut RenderSurface, prefix: &str, line: &str, owner: NodeKind) {
    s.emit(prefix, owner);
    if !line.is_empty() {
        s.space();
        s.emit(line, owner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lathe_ast::{Span, StringInterner, TreeBuilder};
    use pretty_assertions::assert_eq;

    use crate::config::FormatConfig;

    fn render_single(tree: &Tree, cfg: &FormatConfig, interner: &StringInterner) -> String {
        let mut job = RenderJob::new(tree, cfg, interner);
        let mut s = RenderSurface::new(cfg);
        let root = tree.root();
        let first = tree.first_child(root);
        let mut prev = None;
        let mut result = Ok(());
        for child in tree.children(root) {
            result = result.and_then(|()| {
                render_statement(&mut job, child, &mut s, prev, first == Some(child))
            });
            prev = Some(child);
        }
        assert!(result.is_ok());
        s.finish()
    }

    #[test]
    fn original_gap_counts_blank_lines() {
        let interner = StringInterner::new();
        let mut b = TreeBuilder::new(&interner);
        b.leaf(NodeKind::Ident, "a", Span::lines(1, 1));
        b.leaf(NodeKind::Ident, "b", Span::lines(4, 4));
        let tree = b.finish();
        let kids: Vec<NodeId> = tree.children(tree.root()).collect();
        assert_eq!(original_gap(&tree, kids[1], kids[0]), Some(2));
    }

    #[test]
    fn leading_comment_counts_toward_the_gap() {
        let interner = StringInterner::new();
        let mut b = TreeBuilder::new(&interner);
        b.leaf(NodeKind::Ident, "a", Span::lines(1, 1));
        b.leaf(NodeKind::Ident, "b", Span::lines(5, 5));
        b.leading_on_last(CommentKind::Line, "note", Span::lines(3, 3));
        let tree = b.finish();
        let kids: Vec<NodeId> = tree.children(tree.root()).collect();
        // Gap is measured to the comment, not the node.
        assert_eq!(original_gap(&tree, kids[1], kids[0]), Some(1));
    }

    #[test]
    fn preserved_spacing_is_clamped() {
        let interner = StringInterner::new();
        let cfg = FormatConfig::default();
        let mut b = TreeBuilder::new(&interner);
        b.node(NodeKind::EmptyStmt, Span::lines(1, 1));
        b.node(NodeKind::EmptyStmt, Span::lines(9, 9));
        let tree = b.finish();

        let out = render_single(&tree, &cfg, &interner);
        // Seven original blank lines clamp to keep_blank_lines = 2.
        assert_eq!(out, ";\n\n\n;\n");
    }

    #[test]
    fn comment_run_aligns_under_the_first() {
        let interner = StringInterner::new();
        let cfg = FormatConfig::default();
        let mut b = TreeBuilder::new(&interner);
        b.node(NodeKind::EmptyStmt, Span::lines(1, 1));
        b.leading_on_last(CommentKind::Line, "first", Span::lines(1, 1));
        b.leading_on_last(CommentKind::Line, "second", Span::lines(2, 2));
        let tree = b.finish();

        let out = render_single(&tree, &cfg, &interner);
        assert_eq!(out, "// first\n// second\n;\n");
    }

    #[test]
    fn doc_comment_renders_star_frame() {
        let interner = StringInterner::new();
        let cfg = FormatConfig::default();
        let mut b = TreeBuilder::new(&interner);
        b.node(NodeKind::EmptyStmt, Span::lines(3, 3));
        b.leading_on_last(CommentKind::Doc, "Summary.\n@param x the input", Span::lines(1, 2));
        let tree = b.finish();

        let out = render_single(&tree, &cfg, &interner);
        assert_eq!(out, "/**\n * Summary.\n * @param x the input\n */\n;\n");
    }

    #[test]
    fn trailing_comment_pads_one_space() {
        let interner = StringInterner::new();
        let cfg = FormatConfig::default();
        let mut b = TreeBuilder::new(&interner);
        b.node(NodeKind::EmptyStmt, Span::lines(1, 1));
        b.trailing_on_last(CommentKind::Line, "why", Span::at(1, 10));
        let tree = b.finish();

        let out = render_single(&tree, &cfg, &interner);
        assert_eq!(out, "; // why\n");
    }

    #[test]
    fn out_of_order_chain_is_fatal() {
        let interner = StringInterner::new();
        let cfg = FormatConfig::default();
        let mut b = TreeBuilder::new(&interner);
        b.node(NodeKind::EmptyStmt, Span::lines(9, 9));
        b.leading_on_last(CommentKind::Line, "later", Span::lines(5, 5));
        b.leading_on_last(CommentKind::Line, "earlier", Span::lines(2, 2));
        let tree = b.finish();

        let mut job = RenderJob::new(&tree, &cfg, &interner);
        let mut s = RenderSurface::new(&cfg);
        let child = tree.first_child(tree.root()).into_iter().next();
        let err = child.map(|c| flush_leading(&mut job, c, &mut s));
        assert!(matches!(
            err,
            Some(Err(RenderError::CommentOrder { index: 1, .. }))
        ));
    }
}
