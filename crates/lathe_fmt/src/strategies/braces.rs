//! Brace and block layout.
//!
//! Per enclosing construct kind: same-line vs. own-line opening brace,
//! empty-block collapse (or one synthesized no-op statement), and brace
//! removal around single-statement control bodies. Removal is refused
//! whenever it would change variable scope (a local declaration inside) or
//! strand an attached comment.

use lathe_ast::{NodeId, NodeKind, Tree};
use tracing::debug;

use super::align;
use crate::config::{BracePlacement, ControlBraces};
use crate::error::RenderError;
use crate::policy;
use crate::render::RenderJob;
use crate::surface::{BraceOptions, RenderSurface};

/// Type, enum, or anonymous-class body.
pub(crate) fn type_body(
    job: &mut RenderJob,
    id: NodeId,
    s: &mut RenderSurface,
) -> Result<(), RenderError> {
    let tree = job.tree;
    let kind = tree.kind(id);
    let placement = match tree.node(id).parent {
        // Anonymous class bodies always cuddle onto the `new` expression.
        _ if kind == NodeKind::AnonClassBody => BracePlacement::SameLine,
        Some(parent) => job.cfg.brace_placement(tree.kind(parent)),
        None => job.cfg.braces_types,
    };

    let saved = s.flags;
    if kind == NodeKind::AnonClassBody {
        s.flags.in_anon_body = true;
    }
    let result = braced(job, id, s, placement, |job, id, s| {
        if job.tree.kind(id) == NodeKind::EnumBody {
            enum_body(job, id, s)
        } else {
            align::statement_list(job, id, s, true)
        }
    });
    s.flags = saved;
    result
}

/// Statement block: method body, control body, or free-standing block.
pub(crate) fn block(
    job: &mut RenderJob,
    id: NodeId,
    s: &mut RenderSurface,
) -> Result<(), RenderError> {
    let tree = job.tree;
    let placement = match tree.node(id).parent {
        Some(parent) => job.cfg.brace_placement(tree.kind(parent)),
        None => job.cfg.braces_control,
    };
    braced(job, id, s, placement, |job, id, s| {
        align::statement_list(job, id, s, true)
    })
}

/// Shared brace framing: open per placement, fill, close. Empty bodies
/// collapse to a cuddled pair or hold one synthesized no-op statement.
fn braced(
    job: &mut RenderJob,
    id: NodeId,
    s: &mut RenderSurface,
    placement: BracePlacement,
    fill: impl FnOnce(&mut RenderJob, NodeId, &mut RenderSurface) -> Result<(), RenderError>,
) -> Result<(), RenderError> {
    let empty = job.tree.first_child(id).is_none();
    let next_line = placement == BracePlacement::NextLine;

    if empty && job.cfg.cuddle_empty_braces && !job.cfg.insert_empty_statement {
        if next_line {
            s.ensure_newline();
        } else {
            s.space();
        }
        s.emit("{}", job.tree.kind(id));
        return Ok(());
    }

    s.open_brace(BraceOptions {
        newline_before: next_line,
        newline_after: true,
        indent_after: true,
    });
    if empty {
        // insert_empty_statement is on, or cuddling is off.
        if job.cfg.insert_empty_statement {
            s.emit(";", NodeKind::EmptyStmt);
        }
    } else {
        fill(job, id, s)?;
    }
    policy::before_close_brace(job, s);
    s.close_brace(true);
    Ok(())
}

/// Enum body: constants one per line with `,` separators, a terminating `;`
/// when members follow, then the members as an ordinary statement list.
fn enum_body(
    job: &mut RenderJob,
    id: NodeId,
    s: &mut RenderSurface,
) -> Result<(), RenderError> {
    let tree = job.tree;
    let constants: Vec<NodeId> = tree
        .children(id)
        .filter(|&c| tree.kind(c) == NodeKind::EnumConstant)
        .collect();
    let members: Vec<NodeId> = tree
        .children(id)
        .filter(|&c| tree.kind(c) != NodeKind::EnumConstant)
        .collect();

    let mut prev = None;
    for (i, &constant) in constants.iter().enumerate() {
        s.ensure_newline();
        policy::flush_leading(job, constant, s)?;
        job.render(constant, s)?;
        if i + 1 < constants.len() {
            s.emit(",", NodeKind::EnumConstant);
        } else if !members.is_empty() {
            s.emit(";", NodeKind::EnumConstant);
        }
        policy::flush_trailing(job, constant, s)?;
        prev = Some(constant);
    }
    for &member in &members {
        policy::render_statement(job, member, s, prev, false)?;
        prev = Some(member);
    }
    Ok(())
}

/// Body of a control statement: `if`/`else` branches, loop bodies.
///
/// Returns `true` when the body ended with a closing brace still open for
/// cuddling (`} else`, `} while`), `false` when the next token must start
/// its own line.
pub(crate) fn control_body(
    job: &mut RenderJob,
    body: NodeId,
    s: &mut RenderSurface,
) -> Result<bool, RenderError> {
    let tree = job.tree;
    if tree.kind(body) == NodeKind::Block {
        if job.cfg.control_braces == ControlBraces::RemoveWhenSafe {
            if let Some(only) = brace_removal_candidate(tree, body) {
                debug!("dropping braces around single-statement body");
                return unbraced_body(job, only, s);
            }
        }
        job.render(body, s)?;
        return Ok(true);
    }

    match job.cfg.control_braces {
        // Synthesize the braces the source did not have.
        ControlBraces::Always => {
            s.open_brace(BraceOptions {
                newline_before: job.cfg.braces_control == BracePlacement::NextLine,
                newline_after: true,
                indent_after: true,
            });
            policy::render_statement(job, body, s, None, false)?;
            policy::before_close_brace(job, s);
            s.close_brace(true);
            Ok(true)
        }
        ControlBraces::Preserve | ControlBraces::RemoveWhenSafe => unbraced_body(job, body, s),
    }
}

/// Render a single statement as an indented, unbraced body.
fn unbraced_body(
    job: &mut RenderJob,
    stmt: NodeId,
    s: &mut RenderSurface,
) -> Result<bool, RenderError> {
    s.ensure_newline();
    s.indent();
    let result = policy::render_statement(job, stmt, s, None, false);
    s.unindent();
    result?;
    Ok(false)
}

/// The single statement of a block whose braces may be dropped, if safe.
///
/// Removal is refused when the block holds anything but exactly one
/// statement, when that statement declares a local variable (scope change),
/// or when any node in the body carries comments (they would be stranded).
pub(crate) fn brace_removal_candidate(tree: &Tree, block: NodeId) -> Option<NodeId> {
    let only = tree.first_child(block)?;
    if tree.node(only).next_sibling.is_some() {
        return None;
    }
    if tree.kind(only) == NodeKind::LocalVar {
        return None;
    }
    let mut has_comments = |n: &lathe_ast::Node| n.has_comments();
    if tree.node(block).has_comments() || tree.subtree_any(only, &mut has_comments) {
        return None;
    }
    Some(only)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lathe_ast::{CommentKind, Span, StringInterner, TreeBuilder};

    #[test]
    fn removal_refused_for_local_declaration() {
        let interner = StringInterner::new();
        let mut b = TreeBuilder::new(&interner);
        b.open(NodeKind::Block, Span::NONE);
        b.open(NodeKind::LocalVar, Span::NONE);
        b.leaf(NodeKind::TypeRef, "int", Span::NONE);
        b.leaf(NodeKind::Ident, "x", Span::NONE);
        b.close();
        b.close();
        let tree = b.finish();
        let block = tree.first_child(tree.root()).into_iter().next();
        assert_eq!(block.and_then(|blk| brace_removal_candidate(&tree, blk)), None);
    }

    #[test]
    fn removal_refused_for_attached_comment() {
        let interner = StringInterner::new();
        let mut b = TreeBuilder::new(&interner);
        b.open(NodeKind::Block, Span::NONE);
        b.node(NodeKind::EmptyStmt, Span::NONE);
        b.leading_on_last(CommentKind::Line, "keep me", Span::lines(2, 2));
        b.close();
        let tree = b.finish();
        let block = tree.first_child(tree.root()).into_iter().next();
        assert_eq!(block.and_then(|blk| brace_removal_candidate(&tree, blk)), None);
    }

    #[test]
    fn removal_allowed_for_plain_statement() {
        let interner = StringInterner::new();
        let mut b = TreeBuilder::new(&interner);
        b.open(NodeKind::Block, Span::NONE);
        b.node(NodeKind::EmptyStmt, Span::NONE);
        b.close();
        let tree = b.finish();
        let block = tree.first_child(tree.root()).into_iter().next();
        assert!(block.and_then(|blk| brace_removal_candidate(&tree, blk)).is_some());
    }

    #[test]
    fn removal_refused_for_two_statements() {
        let interner = StringInterner::new();
        let mut b = TreeBuilder::new(&interner);
        b.open(NodeKind::Block, Span::NONE);
        b.node(NodeKind::EmptyStmt, Span::NONE);
        b.node(NodeKind::EmptyStmt, Span::NONE);
        b.close();
        let tree = b.finish();
        let block = tree.first_child(tree.root()).into_iter().next();
        assert_eq!(block.and_then(|blk| brace_removal_candidate(&tree, blk)), None);
    }
}
