//! Expression strategies.

use lathe_ast::{NodeId, NodeKind};
use tracing::debug;

use super::{continuation_column, rel_width, req_child};
use crate::error::RenderError;
use crate::render::RenderJob;
use crate::surface::RenderSurface;

/// `lhs op rhs` assignment.
///
/// The operator pads to the active alignment-chunk column when one is set;
/// an oversize right-hand side wraps to the continuation column with the
/// `wrapped_assign` flag raised for nested layouts.
pub(crate) fn assign(
    job: &mut RenderJob,
    id: NodeId,
    s: &mut RenderSurface,
) -> Result<(), RenderError> {
    let lhs = req_child(job, id, 0, "assignment target")?;
    let rhs = req_child(job, id, 1, "assigned value")?;
    let op = match job.tree.node(id).text {
        Some(name) => job.text(name),
        None => "=",
    };

    job.render(lhs, s)?;
    // Taking the offset keeps it to the outermost operator of the
    // statement; a nested assignment falls back to plain spacing.
    match job.align_offset.take() {
        Some(column) => {
            s.pad_to(column);
        }
        None => s.space(),
    }
    s.emit(op, NodeKind::Assign);

    let seed = s.column();
    let probe = job.probe(rhs, s)?;
    if probe.lines == 1 && s.fits(1 + rel_width(&probe, seed)) {
        s.space();
        job.render(rhs, s)
    } else {
        debug!(column = seed, "assignment value wraps");
        s.break_to_column(continuation_column(job, s));
        let saved = s.flags;
        s.flags.wrapped_assign = true;
        let result = job.render(rhs, s);
        s.flags = saved;
        result
    }
}

/// `cond ? then : else`, with the `:` pinned under its `?` when wrapped.
pub(crate) fn ternary(
    job: &mut RenderJob,
    id: NodeId,
    s: &mut RenderSurface,
) -> Result<(), RenderError> {
    let cond = req_child(job, id, 0, "condition")?;
    let then = req_child(job, id, 1, "true branch")?;
    let alt = req_child(job, id, 2, "false branch")?;

    job.render(cond, s)?;
    s.space();
    let question_col = s.emit("?", NodeKind::Ternary) - 1;
    let marker = s.push_marker_at(s.line(), question_col);
    s.space();
    job.render(then, s)?;

    let seed = s.column();
    let alt_probe = job.probe(alt, s)?;
    let result = if alt_probe.lines == 1 && s.fits(3 + rel_width(&alt_probe, seed)) {
        s.space();
        s.emit(":", NodeKind::Ternary);
        s.space();
        job.render(alt, s)
    } else {
        // Align the `:` exactly under the `?`.
        s.break_to_marker(marker);
        s.emit(":", NodeKind::Ternary);
        s.space();
        job.render(alt, s)
    };
    s.pop_marker(marker);
    result
}

/// `lhs op rhs` binary expression; wraps before the operator so continuation
/// lines lead with it.
pub(crate) fn binary(
    job: &mut RenderJob,
    id: NodeId,
    s: &mut RenderSurface,
) -> Result<(), RenderError> {
    let lhs = req_child(job, id, 0, "left operand")?;
    let rhs = req_child(job, id, 1, "right operand")?;
    let op = match job.tree.node(id).text {
        Some(name) => job.text(name),
        None => {
            let node = job.tree.node(id);
            return Err(RenderError::MissingChild {
                kind: node.kind,
                pos: node.span.start,
                what: "operator token",
            });
        }
    };

    job.render(lhs, s)?;
    let seed = s.column();
    let probe = job.probe(rhs, s)?;
    let tail = op.chars().count() + 2 + rel_width(&probe, seed);
    if probe.lines > 1 || s.fits(tail) {
        s.space();
        s.emit(op, NodeKind::Binary);
        s.space();
        job.render(rhs, s)
    } else {
        s.break_to_column(continuation_column(job, s));
        s.emit(op, NodeKind::Binary);
        s.space();
        job.render(rhs, s)
    }
}

/// Prefix unary expression.
pub(crate) fn unary(
    job: &mut RenderJob,
    id: NodeId,
    s: &mut RenderSurface,
) -> Result<(), RenderError> {
    let operand = req_child(job, id, 0, "operand")?;
    if let Some(name) = job.tree.node(id).text {
        let op = job.text(name);
        s.emit(op, NodeKind::Unary);
    }
    job.render(operand, s)
}

/// Call: callee followed by its argument list.
pub(crate) fn call(
    job: &mut RenderJob,
    id: NodeId,
    s: &mut RenderSurface,
) -> Result<(), RenderError> {
    let callee = req_child(job, id, 0, "callee")?;
    let arg_list = req_child(job, id, 1, "argument list")?;
    job.render(callee, s)?;
    job.render(arg_list, s)
}

/// Qualified name / member access: children joined with `.`.
///
/// Every `.` is a legal split point; a segment that would run past the
/// width limit breaks to the continuation column first.
pub(crate) fn select(
    job: &mut RenderJob,
    id: NodeId,
    s: &mut RenderSurface,
) -> Result<(), RenderError> {
    let parts: Vec<NodeId> = job.tree.children(id).collect();
    let Some((&head, rest)) = parts.split_first() else {
        let node = job.tree.node(id);
        return Err(RenderError::MissingChild {
            kind: node.kind,
            pos: node.span.start,
            what: "qualifier",
        });
    };

    job.render(head, s)?;
    for &part in rest {
        let seed = s.column();
        let probe = job.probe(part, s)?;
        if probe.lines > 1 || s.fits(1 + rel_width(&probe, seed)) {
            s.emit(".", NodeKind::Select);
        } else {
            debug!(column = seed, "dotted chain wraps");
            s.break_to_column(continuation_column(job, s));
            s.emit(".", NodeKind::Select);
        }
        job.render(part, s)?;
    }
    Ok(())
}

/// `new Type(args)`, `new Type[] { ... }`, optionally with an anonymous
/// class body.
pub(crate) fn new_expr(
    job: &mut RenderJob,
    id: NodeId,
    s: &mut RenderSurface,
) -> Result<(), RenderError> {
    let tree = job.tree;
    let type_ref = req_child(job, id, 0, "instantiated type")?;
    s.emit("new", NodeKind::New);
    s.space();
    job.render(type_ref, s)?;

    for child in tree.children(id).skip(1) {
        match tree.kind(child) {
            NodeKind::ArrayInit => {
                s.space();
                job.render(child, s)?;
            }
            _ => job.render(child, s)?,
        }
    }
    Ok(())
}

/// Parenthesized expression. Anchors a marker so deep-indent continuations
/// inside align under the bracket.
pub(crate) fn paren(
    job: &mut RenderJob,
    id: NodeId,
    s: &mut RenderSurface,
) -> Result<(), RenderError> {
    let inner = req_child(job, id, 0, "parenthesized expression")?;
    s.emit("(", NodeKind::Paren);
    s.enter_parens();
    let marker = s.push_marker();
    let result = job.render(inner, s);
    s.pop_marker(marker);
    s.leave_parens();
    result?;
    s.emit(")", NodeKind::Paren);
    Ok(())
}

/// `(Type) expr` cast.
pub(crate) fn cast(
    job: &mut RenderJob,
    id: NodeId,
    s: &mut RenderSurface,
) -> Result<(), RenderError> {
    let type_ref = req_child(job, id, 0, "cast type")?;
    let operand = req_child(job, id, 1, "cast operand")?;
    s.emit("(", NodeKind::Cast);
    job.render(type_ref, s)?;
    s.emit(")", NodeKind::Cast);
    s.space();
    job.render(operand, s)
}
