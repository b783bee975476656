//! Construct-specific layout strategies.
//!
//! One stateless function per node kind, selected by the dispatch match.
//! Each strategy renders its own fixed-position tokens and recursively
//! dispatches children; wrapping decisions go through probes, alignment
//! through markers, and spacing through the policy module.

pub(crate) mod align;
pub(crate) mod args;
pub(crate) mod array;
pub(crate) mod braces;
pub(crate) mod decls;
pub(crate) mod exprs;
pub(crate) mod stmts;

use lathe_ast::NodeId;

use crate::error::RenderError;
use crate::probe::ProbeResult;
use crate::render::RenderJob;
use crate::surface::RenderSurface;

/// The `n`th child of a node, or the fatal missing-child error.
pub(crate) fn req_child(
    job: &RenderJob,
    id: NodeId,
    n: usize,
    what: &'static str,
) -> Result<NodeId, RenderError> {
    let node = job.tree.node(id);
    job.tree.nth_child(id, n).ok_or(RenderError::MissingChild {
        kind: node.kind,
        pos: node.span.start,
        what,
    })
}

/// Column a wrapped continuation line starts at.
///
/// Deep indent aligns under the nearest open bracket when one is anchored;
/// otherwise the continuation is the statement indent plus the configured
/// continuation offset.
pub(crate) fn continuation_column(job: &RenderJob, s: &RenderSurface) -> usize {
    if job.cfg.deep_indent {
        if let Some(marker) = s.peek_marker() {
            return marker.column;
        }
    }
    s.indent_level() * job.cfg.indent_size + job.cfg.continuation_indent
}

/// Width a probe took relative to where it was seeded.
pub(crate) fn rel_width(result: &ProbeResult, seed_column: usize) -> usize {
    result.width.saturating_sub(seed_column)
}
