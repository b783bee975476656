//! Statement lists and assignment-operator alignment.
//!
//! Every braced body and the file root render their statement-level
//! children through [`statement_list`]. When alignment is enabled, runs of
//! consecutive declarations and assignments form chunks whose operators pad
//! to a common column; a chunk breaks at a comment, at an oversize original
//! gap, or at any member without an operator.

use lathe_ast::{NodeId, NodeKind, Tree};
use tracing::debug;

use super::decls;
use crate::error::RenderError;
use crate::policy;
use crate::render::RenderJob;
use crate::surface::RenderSurface;

/// Render the statement-level children of `id` in order.
///
/// `in_body` marks a braced body, where the first child is subject to the
/// forced after-open-brace blank count.
pub(crate) fn statement_list(
    job: &mut RenderJob,
    id: NodeId,
    s: &mut RenderSurface,
    in_body: bool,
) -> Result<(), RenderError> {
    let tree = job.tree;
    let items: Vec<NodeId> = tree.children(id).collect();
    let mut prev: Option<NodeId> = None;
    let mut i = 0;
    while i < items.len() {
        let run = if alignment_active(job, s) {
            chunk_len(job, &items[i..])
        } else {
            1
        };
        if run >= 2 {
            aligned_chunk(job, &items[i..i + run], s, prev, in_body && prev.is_none())?;
            prev = Some(items[i + run - 1]);
            i += run;
        } else {
            let item = items[i];
            policy::render_statement(job, item, s, prev, in_body && prev.is_none())?;
            prev = Some(item);
            i += 1;
        }
    }
    Ok(())
}

/// Check whether alignment applies at this position.
fn alignment_active(job: &RenderJob, s: &RenderSurface) -> bool {
    job.cfg.align_assignments && !s.flags.in_anon_body && !s.flags.in_control_header
}

/// Check whether a node carries an alignable operator: a declaration with
/// an initializer or an expression statement holding an assignment.
fn has_operator(job: &RenderJob, id: NodeId) -> bool {
    let tree = job.tree;
    match tree.kind(id) {
        NodeKind::Field | NodeKind::LocalVar => decls::decl_init(job, id).is_some(),
        NodeKind::ExprStmt => assign_lhs(tree, id).is_some(),
        _ => false,
    }
}

/// Left-hand side of the assignment inside an expression statement, if the
/// statement is a plain assignment.
fn assign_lhs(tree: &Tree, stmt: NodeId) -> Option<NodeId> {
    let expr = tree.first_child(stmt)?;
    if tree.kind(expr) != NodeKind::Assign {
        return None;
    }
    tree.first_child(expr)
}

/// Length of the alignment chunk starting at `items[0]`.
fn chunk_len(job: &RenderJob, items: &[NodeId]) -> usize {
    let tree = job.tree;
    let Some(&first) = items.first() else {
        return 0;
    };
    if !has_operator(job, first) {
        return 1;
    }
    let mut len = 1;
    while len < items.len() {
        let next = items[len];
        if !has_operator(job, next) {
            break;
        }
        if job.cfg.chunks_by_comments && tree.node(next).has_comments() {
            break;
        }
        if job.cfg.chunks_by_blank_lines {
            let gap = policy::original_gap(tree, next, items[len - 1]).unwrap_or(0);
            if gap > job.cfg.align_max_gap_lines {
                break;
            }
        }
        len += 1;
    }
    len
}

/// Render one chunk with its operators padded to a common column.
///
/// Each member's left-hand side is probed once; the operator column is one
/// past the widest. Members render through the ordinary statement path with
/// the job's alignment offset set, which the assignment and declaration
/// strategies consume.
fn aligned_chunk(
    job: &mut RenderJob,
    members: &[NodeId],
    s: &mut RenderSurface,
    prev: Option<NodeId>,
    first_in_body: bool,
) -> Result<(), RenderError> {
    let mut widest = 0;
    for &member in members {
        widest = widest.max(lhs_end(job, member, s)?);
    }
    debug!(members = members.len(), column = widest + 1, "alignment chunk");

    let saved = job.align_offset;
    let mut prev = prev;
    let mut first = first_in_body;
    let result = (|| -> Result<(), RenderError> {
        for &member in members {
            // Re-armed per member; each statement's outermost operator
            // consumes it.
            job.align_offset = Some(widest + 1);
            policy::render_statement(job, member, s, prev, first)?;
            prev = Some(member);
            first = false;
        }
        Ok(())
    })();
    job.align_offset = saved;
    result
}

/// Column the member's left-hand side ends at when rendered at the current
/// indent level.
fn lhs_end(
    job: &mut RenderJob,
    member: NodeId,
    s: &RenderSurface,
) -> Result<usize, RenderError> {
    let tree = job.tree;
    let probe = match tree.kind(member) {
        NodeKind::Field | NodeKind::LocalVar => job.probe_with(s, |job, p| {
            p.ensure_newline();
            decls::decl_lhs(job, member, p)
        })?,
        NodeKind::ExprStmt => {
            let lhs = assign_lhs(tree, member).ok_or_else(|| {
                let node = tree.node(member);
                RenderError::MissingChild {
                    kind: node.kind,
                    pos: node.span.start,
                    what: "assignment target",
                }
            })?;
            job.probe_with(s, |job, p| {
                p.ensure_newline();
                job.render(lhs, p)
            })?
        }
        _ => {
            let node = tree.node(member);
            return Err(RenderError::MissingChild {
                kind: node.kind,
                pos: node.span.start,
                what: "alignable declaration",
            });
        }
    };
    Ok(probe.end_column)
}
