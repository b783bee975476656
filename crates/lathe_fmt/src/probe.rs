//! Speculative (probe) rendering support.
//!
//! A probe renders a subtree into a disposable surface seeded from the
//! current commit state and reports what happened: how wide it got, how many
//! lines it took, where it ended. Strategies consult the result before
//! committing to an inline or wrapped layout; some probe two candidates and
//! keep the one with fewer overflowing lines.
//!
//! Probe surfaces are pooled per render job so nested probing does not
//! allocate a fresh buffer per call. Pooling is an optimization only; a
//! pool that always allocates would behave identically.

use crate::surface::RenderSurface;

/// Measurements from one probe render.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ProbeResult {
    /// Widest column any line reached, counted from the seeded column.
    pub width: usize,
    /// Lines the rendering touched (1 = stayed on the seeded line).
    pub lines: u32,
    /// Column the cursor ended on.
    pub end_column: usize,
    /// Lines that exceeded the configured width.
    pub lines_over: u32,
}

impl ProbeResult {
    /// Read the measurements off a finished probe surface.
    pub fn from_surface(surface: &RenderSurface) -> Self {
        ProbeResult {
            width: surface.max_column(),
            lines: surface.newlines() + 1,
            end_column: surface.column(),
            lines_over: surface.lines_over(),
        }
    }

    /// Check whether any line exceeded the width limit.
    #[inline]
    pub fn overflows(&self) -> bool {
        self.lines_over > 0
    }

    /// Order candidates: fewer overflowing lines wins, then fewer lines,
    /// then narrower.
    pub fn better_than(&self, other: &ProbeResult) -> bool {
        (self.lines_over, self.lines, self.width) < (other.lines_over, other.lines, other.width)
    }
}

/// Free list of probe surfaces owned by one render job.
#[derive(Default)]
pub struct ProbePool {
    free: Vec<RenderSurface>,
    /// Probes run, surfaced in render stats.
    taken: u64,
}

impl ProbePool {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check out a surface seeded from `src`.
    ///
    /// The returned surface is in probe mode with `src`'s position, flags,
    /// and a disposable clone of its marker stack.
    pub fn take(&mut self, src: &RenderSurface, cfg: &crate::config::FormatConfig) -> RenderSurface {
        self.taken += 1;
        let mut surface = self
            .free
            .pop()
            .unwrap_or_else(|| RenderSurface::new(cfg));
        surface.seed_from(src);
        surface
    }

    /// Return a surface to the free list.
    pub fn put(&mut self, surface: RenderSurface) {
        self.free.push(surface);
    }

    /// Probes run through this pool.
    #[inline]
    pub fn probes_run(&self) -> u64 {
        self.taken
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FormatConfig;
    use lathe_ast::NodeKind;

    #[test]
    fn result_reads_probe_measurements() {
        let cfg = FormatConfig::with_max_line_len(10);
        let commit = RenderSurface::new(&cfg);
        let mut pool = ProbePool::new();

        let mut probe = pool.take(&commit, &cfg);
        probe.emit("abcdefgh", NodeKind::Ident);
        probe.newline();
        probe.emit("toolongforlimit", NodeKind::Ident);
        let result = ProbeResult::from_surface(&probe);
        pool.put(probe);

        assert_eq!(result.lines, 2);
        assert_eq!(result.width, 15);
        assert_eq!(result.lines_over, 1);
        assert!(result.overflows());
    }

    #[test]
    fn pool_reuses_surfaces() {
        let cfg = FormatConfig::default();
        let commit = RenderSurface::new(&cfg);
        let mut pool = ProbePool::new();

        let probe = pool.take(&commit, &cfg);
        pool.put(probe);
        let probe = pool.take(&commit, &cfg);
        assert_eq!(probe.as_str(), "");
        assert_eq!(pool.probes_run(), 2);
        pool.put(probe);
    }

    #[test]
    fn candidate_ordering_prefers_fewer_overflows() {
        let narrow = ProbeResult {
            width: 40,
            lines: 4,
            end_column: 10,
            lines_over: 0,
        };
        let wide = ProbeResult {
            width: 90,
            lines: 1,
            end_column: 90,
            lines_over: 1,
        };
        assert!(narrow.better_than(&wide));
        assert!(!wide.better_than(&narrow));
    }
}
