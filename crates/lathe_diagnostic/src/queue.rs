//! Per-render diagnostic collection.

use crate::{DiagCode, Diagnostic};

/// Queue collecting the diagnostics of one file render.
///
/// Each render job owns its own queue; there is no cross-file state. The
/// queue deduplicates per-file-once codes (e.g. `W2001` fires at most once
/// per file no matter how many alignment columns round) and sorts by source
/// position on drain.
#[derive(Default, Debug)]
pub struct DiagnosticQueue {
    diagnostics: Vec<Diagnostic>,
    errors: usize,
    warnings: usize,
}

impl DiagnosticQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        if diagnostic.is_error() {
            self.errors += 1;
        } else {
            self.warnings += 1;
        }
        self.diagnostics.push(diagnostic);
    }

    /// Add a diagnostic unless one with the same code is already queued.
    ///
    /// Returns `true` when the diagnostic was added.
    pub fn push_once(&mut self, diagnostic: Diagnostic) -> bool {
        if self.has_code(diagnostic.code) {
            return false;
        }
        self.push(diagnostic);
        true
    }

    /// Check whether a code is already queued.
    pub fn has_code(&self, code: DiagCode) -> bool {
        self.diagnostics.iter().any(|d| d.code == code)
    }

    /// Number of error-severity diagnostics.
    #[inline]
    pub fn error_count(&self) -> usize {
        self.errors
    }

    /// Number of warning-severity diagnostics.
    #[inline]
    pub fn warning_count(&self) -> usize {
        self.warnings
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Drain the queue sorted by source position, then by code.
    ///
    /// Positionless diagnostics (whole-file warnings, generated constructs)
    /// sort first so they lead the report.
    pub fn drain(mut self) -> Vec<Diagnostic> {
        self.diagnostics
            .sort_by_key(|d| (d.span.start, d.code.as_str()));
        self.diagnostics
    }
}
