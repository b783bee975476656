//! The render job: per-file state threaded through every strategy call.

use lathe_ast::{Name, NodeId, StringInterner, Tree};
use lathe_diagnostic::{Diagnostic, DiagnosticQueue};
use tracing::trace;

use crate::config::FormatConfig;
use crate::dispatch;
use crate::error::RenderError;
use crate::probe::{ProbePool, ProbeResult};
use crate::surface::RenderSurface;

/// Counters surfaced to collaborators after a render.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Lines in the emitted text.
    pub lines: u32,
    /// Probe renders run while deciding layouts.
    pub probes: u64,
}

/// Mutable state of one file render.
///
/// Owns the diagnostic queue and the probe pool; borrows the tree, config,
/// and interner, all of which are shared read-only across concurrent jobs.
/// The tree is immutable here — every tree mutation happened in the prepare
/// pass — which is what makes probe rendering provably side-effect-free.
pub struct RenderJob<'a> {
    pub(crate) tree: &'a Tree,
    pub(crate) cfg: &'a FormatConfig,
    pub(crate) interner: &'a StringInterner,
    pub(crate) diags: DiagnosticQueue,
    pool: ProbePool,
    /// Operator column of the active alignment chunk, if any.
    pub(crate) align_offset: Option<usize>,
}

impl<'a> RenderJob<'a> {
    /// Create a job over a prepared tree.
    pub fn new(tree: &'a Tree, cfg: &'a FormatConfig, interner: &'a StringInterner) -> Self {
        RenderJob {
            tree,
            cfg,
            interner,
            diags: DiagnosticQueue::new(),
            pool: ProbePool::new(),
            align_offset: None,
        }
    }

    /// Take over an externally filled diagnostic queue (the prepare pass
    /// queues warnings before the job exists).
    pub fn with_diagnostics(mut self, diags: DiagnosticQueue) -> Self {
        self.diags = diags;
        self
    }

    /// Text of an interned name.
    #[inline]
    pub(crate) fn text(&self, name: Name) -> &'a str {
        self.interner.lookup_static(name)
    }

    /// Token text of a leaf node, or `""` for interior nodes.
    pub(crate) fn node_text(&self, id: NodeId) -> &'a str {
        match self.tree.node(id).text {
            Some(name) => self.text(name),
            None => "",
        }
    }

    /// Queue a warning at most once per file.
    pub(crate) fn warn_once(&mut self, diagnostic: Diagnostic) {
        self.diags.push_once(diagnostic);
    }

    /// Render a subtree onto a surface.
    ///
    /// This is the recursion point every strategy uses for its children.
    pub(crate) fn render(
        &mut self,
        id: NodeId,
        surface: &mut RenderSurface,
    ) -> Result<(), RenderError> {
        dispatch::dispatch(self, id, surface)
    }

    /// Measure a subtree without touching commit state.
    ///
    /// Renders `id` against a pooled surface seeded from `src` and returns
    /// the measurements. A fatal error inside the probe is a fatal error of
    /// the render: the same walk would fail in commit mode.
    pub(crate) fn probe(
        &mut self,
        id: NodeId,
        src: &RenderSurface,
    ) -> Result<ProbeResult, RenderError> {
        self.probe_with(src, |job, surface| dispatch::dispatch(job, id, surface))
    }

    /// Measure an arbitrary rendering closure without touching commit state.
    ///
    /// Used where the measured unit is not a whole node, e.g. the left-hand
    /// side of a declaration when sizing an alignment chunk.
    pub(crate) fn probe_with<F>(
        &mut self,
        src: &RenderSurface,
        render: F,
    ) -> Result<ProbeResult, RenderError>
    where
        F: FnOnce(&mut Self, &mut RenderSurface) -> Result<(), RenderError>,
    {
        let mut surface = self.pool.take(src, self.cfg);
        let outcome = render(self, &mut surface);
        let result = ProbeResult::from_surface(&surface);
        self.pool.put(surface);
        outcome?;
        trace!(?result, "probe");
        Ok(result)
    }

    /// Drive the whole render: root dispatch, then finalization.
    pub(crate) fn run(
        mut self,
        mut surface: RenderSurface,
    ) -> (Result<String, RenderError>, DiagnosticQueue, RenderStats) {
        let mut outcome = self.render(self.tree.root(), &mut surface);
        if outcome.is_ok() && surface.paren_depth() != 0 {
            let root = self.tree.node(self.tree.root());
            outcome = Err(RenderError::UnmatchedBracket {
                kind: root.kind,
                pos: root.span.end,
            });
        }
        if surface.tab_rounded() {
            self.warn_once(crate::policy::tab_rounding_warning());
        }
        let stats = RenderStats {
            lines: surface.line(),
            probes: self.pool.probes_run(),
        };
        match outcome {
            Ok(()) => (Ok(surface.finish()), self.diags, stats),
            Err(e) => (Err(e), self.diags, stats),
        }
    }
}
