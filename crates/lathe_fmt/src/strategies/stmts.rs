//! Statement strategies: control flow, jumps, labels.

use lathe_ast::{NodeId, NodeKind};

use super::{braces, req_child};
use crate::config::BracePlacement;
use crate::dispatch;
use crate::error::RenderError;
use crate::policy;
use crate::render::RenderJob;
use crate::surface::{BraceOptions, RenderSurface};

/// Keyword of a control node; the kind table covers every kind routed here.
fn keyword(job: &RenderJob, id: NodeId) -> &'static str {
    let kind = job.tree.kind(id);
    kind.keyword().unwrap_or(kind.display_name())
}

/// Parenthesized control header: `(expr)` with a marker anchored after the
/// bracket so deep-indent continuations inside align under it.
fn paren_header(
    job: &mut RenderJob,
    expr: NodeId,
    s: &mut RenderSurface,
) -> Result<(), RenderError> {
    s.emit("(", NodeKind::Paren);
    s.enter_parens();
    let marker = s.push_marker();
    let result = job.render(expr, s);
    s.pop_marker(marker);
    s.leave_parens();
    result?;
    s.emit(")", NodeKind::Paren);
    Ok(())
}

pub(crate) fn empty(
    _job: &mut RenderJob,
    _id: NodeId,
    s: &mut RenderSurface,
) -> Result<(), RenderError> {
    s.emit(";", NodeKind::EmptyStmt);
    Ok(())
}

pub(crate) fn expr_stmt(
    job: &mut RenderJob,
    id: NodeId,
    s: &mut RenderSurface,
) -> Result<(), RenderError> {
    let expr = req_child(job, id, 0, "expression")?;
    job.render(expr, s)?;
    if !s.flags.in_control_header {
        s.emit(";", NodeKind::ExprStmt);
    }
    Ok(())
}

/// `if (cond) body [else body]`, chaining `else if` on one line.
pub(crate) fn if_stmt(
    job: &mut RenderJob,
    id: NodeId,
    s: &mut RenderSurface,
) -> Result<(), RenderError> {
    let cond = req_child(job, id, 0, "condition")?;
    let then = req_child(job, id, 1, "then branch")?;

    s.emit("if", NodeKind::If);
    s.space();
    paren_header(job, cond, s)?;
    let cuddled = braces::control_body(job, then, s)?;

    if let Some(alt) = job.tree.nth_child(id, 2) {
        if cuddled && job.cfg.braces_control == BracePlacement::SameLine {
            s.space();
        } else {
            s.ensure_newline();
        }
        s.emit("else", NodeKind::If);
        if job.tree.kind(alt) == NodeKind::If {
            s.space();
            job.render(alt, s)?;
        } else {
            braces::control_body(job, alt, s)?;
        }
    }
    Ok(())
}

/// `for (init; cond; update) body`.
///
/// Sections render inside the header with the `in_control_header` flag
/// raised, which suppresses statement terminators and alignment inside.
pub(crate) fn for_stmt(
    job: &mut RenderJob,
    id: NodeId,
    s: &mut RenderSurface,
) -> Result<(), RenderError> {
    let tree = job.tree;
    let init = tree.child_of_kind(id, NodeKind::ForInit);
    let cond = tree.child_of_kind(id, NodeKind::ForCond);
    let update = tree.child_of_kind(id, NodeKind::ForUpdate);
    let body = tree.last_child(id).ok_or_else(|| {
        let node = tree.node(id);
        RenderError::MissingChild {
            kind: node.kind,
            pos: node.span.start,
            what: "loop body",
        }
    })?;

    s.emit("for", NodeKind::For);
    s.space();
    s.emit("(", NodeKind::Paren);
    s.enter_parens();
    let marker = s.push_marker();
    let saved = s.flags;
    s.flags.in_control_header = true;
    let header = (|| -> Result<(), RenderError> {
        if let Some(init) = init {
            job.render(init, s)?;
        }
        s.emit(";", NodeKind::For);
        if let Some(cond) = cond {
            s.space();
            job.render(cond, s)?;
        }
        s.emit(";", NodeKind::For);
        if let Some(update) = update {
            s.space();
            job.render(update, s)?;
        }
        Ok(())
    })();
    s.flags = saved;
    s.pop_marker(marker);
    s.leave_parens();
    header?;
    s.emit(")", NodeKind::Paren);

    braces::control_body(job, body, s)?;
    Ok(())
}

/// Header section of a `for` loop.
///
/// Init and update join their children with `, `; the condition holds a
/// single expression and renders it as-is.
pub(crate) fn for_section(
    job: &mut RenderJob,
    id: NodeId,
    s: &mut RenderSurface,
) -> Result<(), RenderError> {
    let tree = job.tree;
    let kind = tree.kind(id);
    if kind == NodeKind::ForCond {
        return dispatch::default_container(job, id, s);
    }
    let mut first = true;
    for child in tree.children(id) {
        if !first {
            s.emit(",", kind);
            s.space();
        }
        job.render(child, s)?;
        first = false;
    }
    Ok(())
}

pub(crate) fn while_stmt(
    job: &mut RenderJob,
    id: NodeId,
    s: &mut RenderSurface,
) -> Result<(), RenderError> {
    let cond = req_child(job, id, 0, "condition")?;
    let body = req_child(job, id, 1, "loop body")?;
    s.emit("while", NodeKind::While);
    s.space();
    paren_header(job, cond, s)?;
    braces::control_body(job, body, s)?;
    Ok(())
}

/// `do body while (cond);`, cuddling `while` onto the closing brace.
pub(crate) fn do_while(
    job: &mut RenderJob,
    id: NodeId,
    s: &mut RenderSurface,
) -> Result<(), RenderError> {
    let body = req_child(job, id, 0, "loop body")?;
    let cond = req_child(job, id, 1, "condition")?;
    s.emit("do", NodeKind::DoWhile);
    let cuddled = braces::control_body(job, body, s)?;
    if cuddled {
        s.space();
    } else {
        s.ensure_newline();
    }
    s.emit("while", NodeKind::DoWhile);
    s.space();
    paren_header(job, cond, s)?;
    s.emit(";", NodeKind::DoWhile);
    Ok(())
}

/// `switch (expr) { case groups }`.
pub(crate) fn switch(
    job: &mut RenderJob,
    id: NodeId,
    s: &mut RenderSurface,
) -> Result<(), RenderError> {
    let scrutinee = req_child(job, id, 0, "switch expression")?;
    s.emit("switch", NodeKind::Switch);
    s.space();
    paren_header(job, scrutinee, s)?;

    s.open_brace(BraceOptions {
        newline_before: job.cfg.braces_control == BracePlacement::NextLine,
        newline_after: true,
        indent_after: true,
    });
    let tree = job.tree;
    let mut prev = None;
    for group in tree.children(id).skip(1) {
        policy::render_statement(job, group, s, prev, prev.is_none())?;
        prev = Some(group);
    }
    policy::before_close_brace(job, s);
    s.close_brace(true);
    Ok(())
}

/// One `case`/`default` group: labels at group indent, statements one
/// level deeper.
pub(crate) fn case_group(
    job: &mut RenderJob,
    id: NodeId,
    s: &mut RenderSurface,
) -> Result<(), RenderError> {
    let tree = job.tree;
    let mut saw_label = false;
    let mut indented = false;
    let mut prev = None;
    for child in tree.children(id) {
        if tree.kind(child) == NodeKind::CaseLabel {
            s.ensure_newline();
            job.render(child, s)?;
            s.emit(":", NodeKind::CaseLabel);
            saw_label = true;
        } else {
            if !indented {
                s.indent();
                indented = true;
            }
            policy::render_statement(job, child, s, prev, false)?;
            prev = Some(child);
        }
    }
    if indented {
        s.unindent();
    }
    if !saw_label {
        let node = tree.node(id);
        return Err(RenderError::MissingChild {
            kind: node.kind,
            pos: node.span.start,
            what: "case label",
        });
    }
    Ok(())
}

/// `try { } catch (..) { } finally { }`, clauses cuddled onto the closing
/// brace of the previous block.
pub(crate) fn try_stmt(
    job: &mut RenderJob,
    id: NodeId,
    s: &mut RenderSurface,
) -> Result<(), RenderError> {
    let body = req_child(job, id, 0, "try body")?;
    s.emit("try", NodeKind::Try);
    job.render(body, s)?;
    for clause in job.tree.children(id).skip(1) {
        if job.cfg.braces_control == BracePlacement::SameLine {
            s.space();
        } else {
            s.ensure_newline();
        }
        job.render(clause, s)?;
    }
    Ok(())
}

pub(crate) fn catch_clause(
    job: &mut RenderJob,
    id: NodeId,
    s: &mut RenderSurface,
) -> Result<(), RenderError> {
    let param = req_child(job, id, 0, "exception parameter")?;
    let body = req_child(job, id, 1, "catch body")?;
    s.emit("catch", NodeKind::Catch);
    s.space();
    paren_header(job, param, s)?;
    job.render(body, s)
}

pub(crate) fn finally_clause(
    job: &mut RenderJob,
    id: NodeId,
    s: &mut RenderSurface,
) -> Result<(), RenderError> {
    let body = req_child(job, id, 0, "finally body")?;
    s.emit("finally", NodeKind::Finally);
    job.render(body, s)
}

pub(crate) fn sync_stmt(
    job: &mut RenderJob,
    id: NodeId,
    s: &mut RenderSurface,
) -> Result<(), RenderError> {
    let lock = req_child(job, id, 0, "lock expression")?;
    let body = req_child(job, id, 1, "synchronized body")?;
    s.emit("synchronized", NodeKind::Sync);
    s.space();
    paren_header(job, lock, s)?;
    job.render(body, s)
}

/// `return;`, `return expr;`, `throw expr;`.
pub(crate) fn return_throw(
    job: &mut RenderJob,
    id: NodeId,
    s: &mut RenderSurface,
) -> Result<(), RenderError> {
    let kind = job.tree.kind(id);
    s.emit(keyword(job, id), kind);
    if let Some(value) = job.tree.first_child(id) {
        s.space();
        job.render(value, s)?;
    } else if kind == NodeKind::Throw {
        let node = job.tree.node(id);
        return Err(RenderError::MissingChild {
            kind: node.kind,
            pos: node.span.start,
            what: "thrown value",
        });
    }
    s.emit(";", kind);
    Ok(())
}

/// `break;`, `continue;`, optionally with a label.
pub(crate) fn break_continue(
    job: &mut RenderJob,
    id: NodeId,
    s: &mut RenderSurface,
) -> Result<(), RenderError> {
    let kind = job.tree.kind(id);
    s.emit(keyword(job, id), kind);
    if let Some(target) = job.tree.first_child(id) {
        s.space();
        job.render(target, s)?;
    }
    s.emit(";", kind);
    Ok(())
}

/// `name:` on its own line, the labeled statement below at the same indent.
pub(crate) fn label(
    job: &mut RenderJob,
    id: NodeId,
    s: &mut RenderSurface,
) -> Result<(), RenderError> {
    let name = req_child(job, id, 0, "label name")?;
    let stmt = req_child(job, id, 1, "labeled statement")?;
    job.render(name, s)?;
    s.emit(":", NodeKind::Label);
    s.ensure_newline();
    policy::render_statement(job, stmt, s, None, false)
}
