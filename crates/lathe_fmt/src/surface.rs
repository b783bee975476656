//! The render surface.
//!
//! Tracks line, column, and indent while emitting text, in one of two modes:
//! commit surfaces write the real output, probe surfaces write a disposable
//! sink seeded from the current commit state so strategies can measure a
//! candidate layout without observable effect.
//!
//! Indentation is written lazily on the first non-blank emission of a line,
//! so purely blank lines never carry trailing whitespace, and pending blank
//! lines at end of file are simply never flushed. The marker stack lives on
//! the surface, which is what makes a probe's marker scope disposable: it is
//! cloned with the rest of the seed state.

use lathe_ast::NodeKind;
use tracing::trace;

use crate::config::{FormatConfig, IndentPolicy};
use crate::marker::{Marker, MarkerStack};

/// Execution mode of a surface.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Writes the real output.
    Commit,
    /// Writes a throwaway sink used only to measure width and line count.
    Probe,
}

/// Per-construct state flags threaded through strategy calls.
///
/// Strategies that override a flag save and restore it around the call, the
/// same way indent levels are scoped.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SurfaceFlags {
    /// Inside an anonymous class body; disables assignment alignment.
    pub in_anon_body: bool,
    /// Inside a control-statement header; statements render without their
    /// own terminator and alignment is disabled.
    pub in_control_header: bool,
    /// The enclosing assignment wrapped its right-hand side.
    pub wrapped_assign: bool,
}

/// Indentation rendering parameters, copied out of the config so the
/// surface does not borrow it.
#[derive(Copy, Clone, Debug)]
struct IndentStyle {
    policy: IndentPolicy,
    size: usize,
}

/// Options for [`RenderSurface::open_brace`].
#[derive(Copy, Clone, Debug)]
pub struct BraceOptions {
    /// Break the line before the brace (next-line placement).
    pub newline_before: bool,
    /// Break the line after the brace.
    pub newline_after: bool,
    /// Raise the indent level after the brace.
    pub indent_after: bool,
}

/// The render surface.
pub struct RenderSurface {
    out: String,
    mode: Mode,
    style: IndentStyle,
    max_line_len: usize,

    /// 1-based line of the cursor.
    line: u32,
    /// 0-based column of the cursor, tab-expanded.
    column: usize,
    /// Current indent level.
    indent: usize,
    /// No text emitted on the current line yet; indentation is pending.
    at_line_start: bool,
    /// Blank lines to write before the next text, never flushed at EOF.
    pending_blank: usize,
    /// Column the pending indentation targets instead of `indent * size`.
    align_target: Option<usize>,

    /// Kind of the last node that emitted text.
    last_kind: Option<NodeKind>,
    /// Open-parenthesis nesting depth.
    paren_depth: usize,
    /// Per-construct flags.
    pub flags: SurfaceFlags,
    /// Alignment markers; cloned into probe seeds.
    markers: MarkerStack,

    /// Widest column reached, for probe measurement.
    max_column: usize,
    /// Newlines written, for probe measurement and render stats.
    newlines: u32,
    /// Lines that exceeded the width limit, for probe comparisons.
    lines_over: u32,
    /// The current line already counted toward `lines_over`.
    line_over: bool,
    /// An alignment column was rounded on the tab grid (reported as W2001
    /// once per file by the job).
    tab_rounded: bool,
}

impl RenderSurface {
    /// Create a commit surface for one file render.
    pub fn new(cfg: &FormatConfig) -> Self {
        RenderSurface {
            out: String::with_capacity(4 * 1024),
            mode: Mode::Commit,
            style: IndentStyle {
                policy: cfg.indent_policy,
                size: cfg.indent_size.max(1),
            },
            max_line_len: cfg.max_line_len,
            line: 1,
            column: 0,
            indent: 0,
            at_line_start: true,
            pending_blank: 0,
            align_target: None,
            last_kind: None,
            paren_depth: 0,
            flags: SurfaceFlags::default(),
            markers: MarkerStack::new(),
            max_column: 0,
            newlines: 0,
            lines_over: 0,
            line_over: false,
            tab_rounded: false,
        }
    }

    /// Reset this surface into a probe seeded from `src`.
    ///
    /// The seed copies everything a layout decision can observe: position,
    /// indent, flags, last kind, and a disposable clone of the marker stack.
    /// The output buffer starts empty; measurements count from the seeded
    /// column.
    pub fn seed_from(&mut self, src: &RenderSurface) {
        self.out.clear();
        self.mode = Mode::Probe;
        self.style = src.style;
        self.max_line_len = src.max_line_len;
        self.line = src.line;
        self.column = src.column;
        self.indent = src.indent;
        self.at_line_start = src.at_line_start;
        self.pending_blank = 0;
        self.align_target = src.align_target;
        self.last_kind = src.last_kind;
        self.paren_depth = src.paren_depth;
        self.flags = src.flags;
        self.markers = src.markers.clone();
        self.max_column = src.column;
        self.newlines = 0;
        self.lines_over = 0;
        self.line_over = src.column > src.max_line_len;
        self.tab_rounded = false;
    }

    /// Execution mode.
    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Check whether this is a probe surface.
    #[inline]
    pub fn is_probe(&self) -> bool {
        self.mode == Mode::Probe
    }

    /// Current column (0-based, tab-expanded).
    #[inline]
    pub fn column(&self) -> usize {
        self.column
    }

    /// Column the next emission will start at, accounting for pending
    /// indentation.
    pub fn effective_column(&self) -> usize {
        if self.at_line_start {
            self.align_target.unwrap_or(self.indent * self.style.size)
        } else {
            self.column
        }
    }

    /// Current line (1-based).
    #[inline]
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Current indent level.
    #[inline]
    pub fn indent_level(&self) -> usize {
        self.indent
    }

    /// Kind of the last node that emitted text.
    #[inline]
    pub fn last_kind(&self) -> Option<NodeKind> {
        self.last_kind
    }

    /// Open-parenthesis nesting depth.
    #[inline]
    pub fn paren_depth(&self) -> usize {
        self.paren_depth
    }

    /// Check whether the cursor is at a line start with indentation pending.
    #[inline]
    pub fn at_line_start(&self) -> bool {
        self.at_line_start
    }

    /// Configured maximum line width.
    #[inline]
    pub fn max_line_len(&self) -> usize {
        self.max_line_len
    }

    /// Check whether `width` more columns fit on the current line.
    pub fn fits(&self, width: usize) -> bool {
        self.effective_column() + width <= self.max_line_len
    }

    /// Columns remaining on the current line.
    pub fn remaining(&self) -> usize {
        self.max_line_len.saturating_sub(self.effective_column())
    }

    /// Newlines written so far.
    #[inline]
    pub fn newlines(&self) -> u32 {
        self.newlines
    }

    /// Widest column reached so far.
    #[inline]
    pub fn max_column(&self) -> usize {
        self.max_column
    }

    /// Lines that exceeded the width limit so far.
    #[inline]
    pub fn lines_over(&self) -> u32 {
        self.lines_over
    }

    /// Whether any alignment column was rounded on the tab grid.
    #[inline]
    pub fn tab_rounded(&self) -> bool {
        self.tab_rounded
    }

    // -- emission ---------------------------------------------------------

    /// Emit text attributed to a node kind; returns the column after it.
    ///
    /// Flushes pending blank lines and indentation first. The text must not
    /// contain newlines; multi-line content goes through [`Self::newline`].
    pub fn emit(&mut self, text: &str, kind: NodeKind) -> usize {
        debug_assert!(!text.contains('\n'), "emit text must be single-line");
        if text.is_empty() {
            return self.column;
        }
        self.flush_line_start();
        self.out.push_str(text);
        self.column += str_width(text);
        self.note_width();
        self.last_kind = Some(kind);
        self.column
    }

    /// Emit a single space unless the cursor is at a line start.
    pub fn space(&mut self) {
        if !self.at_line_start {
            self.out.push(' ');
            self.column += 1;
            self.note_width();
        }
    }

    /// Pad with whitespace up to `column`; returns the column reached.
    ///
    /// Under the all-tabs policy the pad is written in tabs and the reached
    /// column is the next tab stop at or beyond the request; the rounding is
    /// recorded for the once-per-file warning.
    pub fn pad_to(&mut self, column: usize) -> usize {
        self.flush_line_start();
        if self.column >= column {
            return self.column;
        }
        match self.style.policy {
            IndentPolicy::Spaces | IndentPolicy::LeadingTabs => {
                while self.column < column {
                    self.out.push(' ');
                    self.column += 1;
                }
            }
            IndentPolicy::Tabs => {
                if column % self.style.size != 0 {
                    self.tab_rounded = true;
                }
                while self.column < column {
                    self.out.push('\t');
                    self.column = next_tab_stop(self.column, self.style.size);
                }
            }
        }
        self.note_width();
        self.column
    }

    /// Break the current line.
    ///
    /// On a line that already holds text this starts a fresh one; at a line
    /// start it queues a blank line instead, which only materializes when
    /// text follows.
    pub fn newline(&mut self) {
        if self.at_line_start {
            self.pending_blank += 1;
        } else {
            self.push_newline();
            self.at_line_start = true;
            self.align_target = None;
        }
    }

    /// Break the line only when it already holds text.
    pub fn ensure_newline(&mut self) {
        if !self.at_line_start {
            self.newline();
        }
    }

    /// Queue `n` blank lines before the next text.
    ///
    /// Combined by maximum with blanks already pending, so a policy decision
    /// and a preserved original gap do not add up.
    pub fn blank_lines(&mut self, n: usize) {
        self.ensure_newline();
        self.pending_blank = self.pending_blank.max(n);
    }

    /// Raise the indent level.
    pub fn indent(&mut self) {
        self.indent += 1;
    }

    /// Lower the indent level.
    pub fn unindent(&mut self) {
        debug_assert!(self.indent > 0, "unindent below zero");
        self.indent = self.indent.saturating_sub(1);
    }

    /// Note an opening parenthesis (after emitting it).
    pub fn enter_parens(&mut self) {
        self.paren_depth += 1;
    }

    /// Note a closing parenthesis.
    pub fn leave_parens(&mut self) {
        debug_assert!(self.paren_depth > 0, "unbalanced parenthesis tracking");
        self.paren_depth = self.paren_depth.saturating_sub(1);
    }

    /// Emit an opening brace with the given placement.
    pub fn open_brace(&mut self, opts: BraceOptions) {
        if opts.newline_before {
            self.ensure_newline();
        } else {
            self.space();
        }
        self.emit("{", NodeKind::Block);
        if opts.indent_after {
            self.indent();
        }
        if opts.newline_after {
            self.newline();
        }
    }

    /// Emit a closing brace on its own line at the lowered indent level.
    pub fn close_brace(&mut self, unindent_before: bool) {
        if unindent_before {
            self.unindent();
        }
        self.ensure_newline();
        self.emit("}", NodeKind::Block);
    }

    // -- markers ----------------------------------------------------------

    /// Push a marker at the cursor position.
    ///
    /// The anchored column accounts for pending indentation, so a marker
    /// pushed at a line start aligns under where text would land.
    pub fn push_marker(&mut self) -> Marker {
        let column = self.effective_column();
        self.markers.push(self.line, column)
    }

    /// Push a marker at a pinned position (ternary `:` under its `?`).
    pub fn push_marker_at(&mut self, line: u32, column: usize) -> Marker {
        self.markers.push(line, column)
    }

    /// Pop a marker (strict LIFO).
    pub fn pop_marker(&mut self, marker: Marker) {
        self.markers.pop(marker);
    }

    /// Pop a marker and re-target pending indentation.
    ///
    /// When the surface sits at a line start that was aligned to the popped
    /// marker, the pending indent falls back to the next-innermost marker,
    /// or to the plain indent level when none remains.
    pub fn pop_marker_adjust(&mut self, marker: Marker) {
        self.markers.pop(marker);
        if self.at_line_start && self.align_target == Some(marker.column) {
            self.align_target = self.markers.peek_last().map(|m| m.column);
        }
    }

    /// Innermost marker, for deep-indent continuation.
    #[inline]
    pub fn peek_marker(&self) -> Option<Marker> {
        self.markers.peek_last()
    }

    /// Current marker depth, asserted balanced around strategy calls.
    #[inline]
    pub fn marker_depth(&self) -> usize {
        self.markers.depth()
    }

    /// Break the line and align the next text under `marker`.
    pub fn break_to_marker(&mut self, marker: Marker) {
        self.ensure_newline();
        self.align_target = Some(marker.column);
    }

    /// Break the line and indent the next text to an explicit column.
    pub fn break_to_column(&mut self, column: usize) {
        self.ensure_newline();
        self.align_target = Some(column);
    }

    // -- completion -------------------------------------------------------

    /// Finish a commit render and return the text.
    ///
    /// Pending blank lines die here, which is what suppresses a superfluous
    /// trailing blank line at top-level end of file; the single trailing
    /// newline is the extra line break after the last top-level closing
    /// brace.
    pub fn finish(mut self) -> String {
        trace!(lines = self.line, "surface finished");
        if !self.out.is_empty() && !self.out.ends_with('\n') {
            self.push_newline();
        }
        self.out
    }

    /// Borrow the text written so far (tests and probes).
    pub fn as_str(&self) -> &str {
        &self.out
    }

    // -- internal ---------------------------------------------------------

    fn push_newline(&mut self) {
        self.out.push('\n');
        self.line += 1;
        self.newlines += 1;
        self.column = 0;
        self.line_over = false;
    }

    /// Record the width of the current line after it grew.
    fn note_width(&mut self) {
        self.max_column = self.max_column.max(self.column);
        if self.column > self.max_line_len && !self.line_over {
            self.line_over = true;
            self.lines_over += 1;
        }
    }

    /// Write pending blank lines and indentation before the first text of a
    /// line.
    fn flush_line_start(&mut self) {
        if !self.at_line_start {
            return;
        }
        for _ in 0..self.pending_blank {
            self.push_newline();
        }
        self.pending_blank = 0;
        self.at_line_start = false;

        let target = self.align_target.unwrap_or(self.indent * self.style.size);
        self.align_target = None;
        if target == 0 {
            return;
        }
        match self.style.policy {
            IndentPolicy::Spaces => {
                for _ in 0..target {
                    self.out.push(' ');
                }
                self.column = target;
            }
            IndentPolicy::Tabs => {
                if target % self.style.size != 0 {
                    self.tab_rounded = true;
                }
                let mut col = 0;
                while col < target {
                    self.out.push('\t');
                    col = next_tab_stop(col, self.style.size);
                }
                self.column = col;
            }
            IndentPolicy::LeadingTabs => {
                let level_cols = self.indent * self.style.size;
                let tabs = level_cols.min(target) / self.style.size;
                for _ in 0..tabs {
                    self.out.push('\t');
                }
                let mut col = tabs * self.style.size;
                while col < target {
                    self.out.push(' ');
                    col += 1;
                }
                self.column = col;
            }
        }
        self.note_width();
    }
}

/// Width of a text fragment in columns.
///
/// Character count, not byte length; the formatter does not attempt
/// double-width terminal rendering.
#[inline]
fn str_width(text: &str) -> usize {
    text.chars().count()
}

/// The tab stop following `column` on a grid of `size`.
#[inline]
fn next_tab_stop(column: usize, size: usize) -> usize {
    (column / size + 1) * size
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn surface() -> RenderSurface {
        RenderSurface::new(&FormatConfig::default())
    }

    #[test]
    fn emit_tracks_column() {
        let mut s = surface();
        assert_eq!(s.emit("int", NodeKind::TypeRef), 3);
        s.space();
        assert_eq!(s.emit("a", NodeKind::Ident), 5);
        assert_eq!(s.as_str(), "int a");
    }

    #[test]
    fn indentation_is_lazy() {
        let mut s = surface();
        s.emit("{", NodeKind::Block);
        s.indent();
        s.newline();
        // Two blank lines queued; neither carries whitespace.
        s.newline();
        s.newline();
        s.emit("x", NodeKind::Ident);
        assert_eq!(s.as_str(), "{\n\n\n    x");
    }

    #[test]
    fn pending_blanks_die_at_eof() {
        let mut s = surface();
        s.emit("}", NodeKind::Block);
        s.newline();
        s.newline();
        s.newline();
        assert_eq!(s.finish(), "}\n");
    }

    #[test]
    fn blank_lines_combine_by_max() {
        let mut s = surface();
        s.emit("a;", NodeKind::ExprStmt);
        s.blank_lines(1);
        s.blank_lines(2);
        s.emit("b;", NodeKind::ExprStmt);
        assert_eq!(s.as_str(), "a;\n\n\nb;");
    }

    #[test]
    fn all_tabs_indentation() {
        let cfg = FormatConfig {
            indent_policy: IndentPolicy::Tabs,
            ..Default::default()
        };
        let mut s = RenderSurface::new(&cfg);
        s.indent();
        s.indent();
        s.emit("x", NodeKind::Ident);
        assert_eq!(s.as_str(), "\t\tx");
        assert_eq!(s.column(), 9);
        assert!(!s.tab_rounded());
    }

    #[test]
    fn tab_alignment_rounds_and_records() {
        let cfg = FormatConfig {
            indent_policy: IndentPolicy::Tabs,
            ..Default::default()
        };
        let mut s = RenderSurface::new(&cfg);
        s.emit("a", NodeKind::Ident);
        let reached = s.pad_to(6);
        // 6 is not on the 4-column grid; rounded up to 8.
        assert_eq!(reached, 8);
        assert!(s.tab_rounded());
    }

    #[test]
    fn leading_tabs_mix() {
        let cfg = FormatConfig {
            indent_policy: IndentPolicy::LeadingTabs,
            ..Default::default()
        };
        let mut s = RenderSurface::new(&cfg);
        s.indent();
        s.newline();
        s.break_to_column(6);
        s.emit("x", NodeKind::Ident);
        // One tab for the indent level, spaces to the alignment column.
        assert_eq!(s.as_str(), "\n\t  x");
    }

    #[test]
    fn probe_seed_matches_commit_state() {
        let mut commit = surface();
        commit.indent();
        commit.emit("foo(", NodeKind::Call);
        commit.enter_parens();
        let m = commit.push_marker();

        let mut probe = surface();
        probe.seed_from(&commit);
        assert!(probe.is_probe());
        assert_eq!(probe.column(), commit.column());
        assert_eq!(probe.paren_depth(), 1);
        assert_eq!(probe.marker_depth(), 1);

        // Probe emission does not touch the commit surface.
        probe.emit("bar, baz", NodeKind::ArgList);
        assert_eq!(commit.as_str(), "foo(");
        assert_eq!(probe.max_column(), commit.column() + 8);

        commit.pop_marker(m);
        commit.leave_parens();
    }

    #[test]
    fn break_to_marker_aligns_next_text() {
        let mut s = surface();
        s.emit("call(", NodeKind::Call);
        let m = s.push_marker();
        s.emit("first,", NodeKind::Ident);
        s.break_to_marker(m);
        s.emit("second", NodeKind::Ident);
        assert_eq!(s.as_str(), "call(first,\n     second");
        s.pop_marker(m);
    }

    #[test]
    fn pop_adjust_falls_back_to_outer_marker() {
        let mut s = surface();
        s.emit("outer(", NodeKind::Call);
        let outer = s.push_marker();
        s.emit("inner(", NodeKind::Call);
        let inner = s.push_marker();
        s.break_to_marker(inner);
        s.pop_marker_adjust(inner);
        s.emit("x", NodeKind::Ident);
        assert_eq!(s.as_str(), "outer(inner(\n      x");
        s.pop_marker(outer);
    }

    #[test]
    fn open_close_brace_round_trip() {
        let mut s = surface();
        s.emit("void run()", NodeKind::Method);
        s.open_brace(BraceOptions {
            newline_before: false,
            newline_after: true,
            indent_after: true,
        });
        s.emit("work();", NodeKind::ExprStmt);
        s.close_brace(true);
        assert_eq!(s.finish(), "void run() {\n    work();\n}\n");
    }

    #[test]
    fn fits_accounts_for_pending_indent() {
        let cfg = FormatConfig::with_max_line_len(10);
        let mut s = RenderSurface::new(&cfg);
        s.indent();
        s.newline();
        // Pending indent of 4 leaves 6 columns.
        assert!(s.fits(6));
        assert!(!s.fits(7));
    }
}
