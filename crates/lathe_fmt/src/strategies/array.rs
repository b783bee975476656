//! Array initializer layout.

use lathe_ast::{NodeId, NodeKind};
use smallvec::SmallVec;

use super::rel_width;
use crate::error::RenderError;
use crate::policy;
use crate::render::RenderJob;
use crate::surface::RenderSurface;

/// `{ a, b, c }` initializer.
///
/// Elements flow inline and wrap at overflow, aligned under the first.
/// A nested initializer forces one element per line, as does a configured
/// fixed element count. Blank lines the author put between elements are
/// kept as hard breaks.
pub(crate) fn array_init(
    job: &mut RenderJob,
    id: NodeId,
    s: &mut RenderSurface,
) -> Result<(), RenderError> {
    let tree = job.tree;
    let items: SmallVec<[NodeId; 8]> = tree.children(id).collect();
    if items.is_empty() {
        s.emit("{}", NodeKind::ArrayInit);
        return Ok(());
    }

    let nested = items.iter().any(|&e| tree.kind(e) == NodeKind::ArrayInit);
    let per_line = if nested {
        Some(1)
    } else {
        job.cfg.array_elements_per_line
    };

    s.emit("{", NodeKind::ArrayInit);
    s.space();
    let marker = s.push_marker();
    let align = marker.column;

    let mut on_line = 0usize;
    let mut prev: Option<NodeId> = None;
    let result = (|| -> Result<(), RenderError> {
        for (i, &item) in items.iter().enumerate() {
            if i > 0 {
                s.emit(",", NodeKind::ArrayInit);
                let gap = prev
                    .and_then(|p| policy::original_gap(tree, item, p))
                    .unwrap_or(0);
                let forced = per_line.is_some_and(|n| on_line >= n);
                if gap > 0 {
                    s.blank_lines(gap.min(job.cfg.keep_blank_lines));
                    s.break_to_column(align);
                    on_line = 0;
                } else if forced {
                    s.break_to_column(align);
                    on_line = 0;
                } else {
                    let probe = job.probe(item, s)?;
                    let rel = rel_width(&probe, s.column());
                    // Room for the space before and the ` }` after.
                    if probe.lines == 1 && s.fits(rel + 3) {
                        s.space();
                    } else {
                        s.break_to_column(align);
                        on_line = 0;
                    }
                }
            }
            job.render(item, s)?;
            on_line += 1;
            prev = Some(item);
        }
        Ok(())
    })();
    s.pop_marker_adjust(marker);
    result?;

    s.space();
    s.emit("}", NodeKind::ArrayInit);
    Ok(())
}
