//! Lathe layout engine
//!
//! Renders a parsed, comment-annotated tree back to canonical source text
//! under a style policy. Parsing, file I/O, and diagnostics presentation
//! belong to collaborators; this crate turns one [`lathe_ast::Tree`] plus
//! one [`FormatConfig`] into text plus warnings.
//!
//! # Architecture
//!
//! Rendering is a single recursive descent with speculative lookahead:
//!
//! 1. **Prepare pass**: every tree mutation (doc stubs, close-brace
//!    annotations, doc-tag repair, configured parentheses) runs up front,
//!    so layout works on a shared `&Tree`.
//! 2. **Layout pass**: per-kind strategies render onto a [`surface`],
//!    probing oversize subtrees against disposable surfaces before
//!    committing to an inline or wrapped form.
//!
//! # Modules
//!
//! - [`config`]: the style policy, one immutable value per run
//! - [`surface`]: the render surface with commit and probe modes
//! - [`error`]: fatal input-structure defects
//! - `policy`: blank-line and comment-spacing rules
//! - `strategies`: per-construct layout

pub mod config;
mod dispatch;
mod doctags;
pub mod error;
mod marker;
mod policy;
mod prepare;
mod probe;
mod render;
mod strategies;
pub mod surface;

use lathe_ast::{StringInterner, Tree};
use lathe_diagnostic::{Diagnostic, DiagnosticQueue};
use rayon::prelude::*;
use tracing::info;

pub use config::{
    BracePlacement, ControlBraces, DocTargets, FormatConfig, IndentPolicy, ListLayout,
};
pub use error::RenderError;
pub use render::RenderStats;

/// Result of formatting one file.
#[derive(Debug)]
pub struct FormatOutcome {
    /// The rendered text; `None` when a fatal defect aborted the render.
    /// There is never partial output.
    pub text: Option<String>,
    /// Warnings and, on abort, the fatal error, sorted by source position.
    pub diagnostics: Vec<Diagnostic>,
    /// Render counters.
    pub stats: RenderStats,
}

impl FormatOutcome {
    /// Check whether the render produced output.
    #[inline]
    pub fn is_ok(&self) -> bool {
        self.text.is_some()
    }
}

/// Format one tree.
///
/// The tree is mutable because the prepare pass splices synthesized
/// comments and parentheses into it before layout; the layout pass itself
/// reads it shared.
pub fn format_tree(
    tree: &mut Tree,
    cfg: &FormatConfig,
    interner: &StringInterner,
) -> FormatOutcome {
    let mut diags = DiagnosticQueue::new();
    prepare::prepare(tree, cfg, interner, &mut diags);

    let job = render::RenderJob::new(tree, cfg, interner).with_diagnostics(diags);
    let surface = surface::RenderSurface::new(cfg);
    let (result, mut queue, stats) = job.run(surface);

    let text = match result {
        Ok(text) => Some(text),
        Err(e) => {
            queue.push(e.into_diagnostic());
            None
        }
    };
    info!(
        ok = text.is_some(),
        lines = stats.lines,
        probes = stats.probes,
        "render finished"
    );
    FormatOutcome {
        text,
        diagnostics: queue.drain(),
        stats,
    }
}

/// Format many trees in parallel.
///
/// Files are independent: workers share only the immutable config and the
/// interner. Outcomes come back in input order, one per tree, and one
/// file's fatal defect never disturbs the others.
pub fn format_trees(
    trees: &mut [Tree],
    cfg: &FormatConfig,
    interner: &StringInterner,
) -> Vec<FormatOutcome> {
    trees
        .par_iter_mut()
        .map(|tree| format_tree(tree, cfg, interner))
        .collect()
}
