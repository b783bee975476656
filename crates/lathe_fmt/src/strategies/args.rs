//! Parameter and argument list packing.
//!
//! Three layouts: everything inline, wrapped with elements aligned under
//! the first, and forced one-per-line. Auto probes the inline form first;
//! when it overflows, the first element moves to the continuation column
//! (or under the open bracket with deep indent) and the rest flow after
//! it, breaking again at each overflow.

use lathe_ast::{NodeId, NodeKind};
use smallvec::SmallVec;
use tracing::debug;

use super::{continuation_column, rel_width};
use crate::config::ListLayout;
use crate::error::RenderError;
use crate::marker::Marker;
use crate::render::RenderJob;
use crate::surface::RenderSurface;

pub(crate) fn param_list(
    job: &mut RenderJob,
    id: NodeId,
    s: &mut RenderSurface,
) -> Result<(), RenderError> {
    let layout = job.cfg.param_layout;
    list(job, id, s, layout)
}

pub(crate) fn arg_list(
    job: &mut RenderJob,
    id: NodeId,
    s: &mut RenderSurface,
) -> Result<(), RenderError> {
    let layout = job.cfg.arg_layout;
    list(job, id, s, layout)
}

/// Bracketed, comma-separated list with a marker anchored after the
/// opening parenthesis.
fn list(
    job: &mut RenderJob,
    id: NodeId,
    s: &mut RenderSurface,
    layout: ListLayout,
) -> Result<(), RenderError> {
    let kind = job.tree.kind(id);
    s.emit("(", kind);
    s.enter_parens();
    let marker = s.push_marker();
    let result = elements(job, id, s, layout, marker);
    s.pop_marker_adjust(marker);
    s.leave_parens();
    result?;
    s.emit(")", kind);
    Ok(())
}

fn elements(
    job: &mut RenderJob,
    id: NodeId,
    s: &mut RenderSurface,
    layout: ListLayout,
    marker: Marker,
) -> Result<(), RenderError> {
    let kind = job.tree.kind(id);
    let items: SmallVec<[NodeId; 8]> = job.tree.children(id).collect();
    if items.is_empty() {
        return Ok(());
    }

    match layout {
        ListLayout::Auto => {
            let seed = s.column();
            let inline = job.probe_with(s, |job, p| {
                for (i, &item) in items.iter().enumerate() {
                    if i > 0 {
                        p.emit(",", kind);
                        p.space();
                    }
                    job.render(item, p)?;
                }
                Ok(())
            })?;
            // One column of slack for the closing bracket.
            if inline.lines == 1 && s.fits(rel_width(&inline, seed) + 1) {
                for (i, &item) in items.iter().enumerate() {
                    if i > 0 {
                        s.emit(",", kind);
                        s.space();
                    }
                    job.render(item, s)?;
                }
                return Ok(());
            }

            // The inline form overflows: the first element wraps (under the
            // open bracket with deep indent, otherwise to the continuation
            // column) and the rest flow, breaking again at overflow and
            // aligning under the first. When even the flowed form still
            // overflows, the stacked form is probed as well and the shape
            // with fewer overflowing lines wins.
            let align = continuation_column(job, s);
            debug!(align, count = items.len(), "argument list wraps");
            let flowed = job.probe_with(s, |job, p| {
                p.break_to_column(align);
                flow(job, &items, kind, align, p)
            })?;
            let mut use_stacked = false;
            if flowed.overflows() {
                let stacked = job.probe_with(s, |job, p| {
                    p.break_to_column(align);
                    stack(job, &items, kind, align, p)
                })?;
                use_stacked = stacked.better_than(&flowed);
            }
            s.break_to_column(align);
            if use_stacked {
                stack(job, &items, kind, align, s)?;
            } else {
                flow(job, &items, kind, align, s)?;
            }
        }
        ListLayout::OnePerLine => {
            // First element stays on the bracket line; the rest stack
            // under it.
            for (i, &item) in items.iter().enumerate() {
                if i > 0 {
                    s.emit(",", kind);
                    s.break_to_marker(marker);
                }
                job.render(item, s)?;
            }
        }
    }
    Ok(())
}

/// Flow elements left to right, breaking back to `align` at overflow.
fn flow(
    job: &mut RenderJob,
    items: &[NodeId],
    kind: NodeKind,
    align: usize,
    s: &mut RenderSurface,
) -> Result<(), RenderError> {
    for (i, &item) in items.iter().enumerate() {
        if i > 0 {
            s.emit(",", kind);
            let probe = job.probe(item, s)?;
            let rel = rel_width(&probe, s.column());
            if probe.lines == 1 && s.fits(rel + 2) {
                s.space();
            } else {
                s.break_to_column(align);
            }
        }
        job.render(item, s)?;
    }
    Ok(())
}

/// Stack every element at `align`, one per line.
fn stack(
    job: &mut RenderJob,
    items: &[NodeId],
    kind: NodeKind,
    align: usize,
    s: &mut RenderSurface,
) -> Result<(), RenderError> {
    for (i, &item) in items.iter().enumerate() {
        if i > 0 {
            s.emit(",", kind);
            s.break_to_column(align);
        }
        job.render(item, s)?;
    }
    Ok(())
}
