//! Layout configuration.
//!
//! [`FormatConfig`] is constructed once per run and passed by shared
//! reference through every strategy call; nothing mutates it after
//! construction, so concurrently rendered files share one instance freely.

use bitflags::bitflags;
use lathe_ast::NodeKind;

/// Default maximum line width before wrapping.
pub const MAX_LINE_LEN: usize = 80;

/// Default spaces per indentation level.
pub const INDENT_SIZE: usize = 4;

/// Whitespace policy for computed indentation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum IndentPolicy {
    /// Spaces everywhere (default).
    #[default]
    Spaces,
    /// Tabs everywhere. Alignment columns that do not land on a tab stop
    /// are rounded and reported once per file.
    Tabs,
    /// Tabs up to the indent level, spaces for alignment beyond it.
    LeadingTabs,
}

/// Where an opening brace goes relative to its construct header.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum BracePlacement {
    /// `class Foo {` — brace cuddled onto the header line (default).
    #[default]
    SameLine,
    /// Brace alone on the following line.
    NextLine,
}

/// Whether control statements keep their braces.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum ControlBraces {
    /// Always brace control bodies, inserting braces where missing (default).
    #[default]
    Always,
    /// Keep whatever the source had.
    Preserve,
    /// Drop braces around single-statement bodies when doing so cannot
    /// change scope or strand a comment.
    RemoveWhenSafe,
}

/// Layout mode for parameter and argument lists.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum ListLayout {
    /// Inline when it fits, wrap at overflow otherwise (default).
    #[default]
    Auto,
    /// Force every element onto its own line.
    OnePerLine,
}

bitflags! {
    /// Declaration kinds that get a synthesized doc-comment stub when the
    /// source has none.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
    pub struct DocTargets: u8 {
        const CLASSES      = 1 << 0;
        const INTERFACES   = 1 << 1;
        const METHODS      = 1 << 2;
        const CONSTRUCTORS = 1 << 3;
        const FIELDS       = 1 << 4;
    }
}

impl DocTargets {
    /// Check whether a node kind is targeted for doc-stub synthesis.
    pub fn covers(self, kind: NodeKind) -> bool {
        match kind {
            NodeKind::Class | NodeKind::Enum | NodeKind::Annotation => {
                self.contains(DocTargets::CLASSES)
            }
            NodeKind::Interface => self.contains(DocTargets::INTERFACES),
            NodeKind::Method => self.contains(DocTargets::METHODS),
            NodeKind::Constructor => self.contains(DocTargets::CONSTRUCTORS),
            NodeKind::Field => self.contains(DocTargets::FIELDS),
            _ => false,
        }
    }
}

/// The style policy for one formatting run.
///
/// Every field has a documented default; `FormatConfig::default()` is a
/// complete, usable configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormatConfig {
    /// Maximum line width. Lines exceed it only when a single
    /// non-splittable token forces them to. Default 80.
    pub max_line_len: usize,

    /// Columns per indentation level. Default 4.
    pub indent_size: usize,

    /// Tabs/spaces policy for computed indentation. Default spaces.
    pub indent_policy: IndentPolicy,

    /// Extra columns for wrapped continuation lines. Default 8.
    pub continuation_indent: usize,

    /// Align continuation lines under the nearest open bracket instead of
    /// a fixed continuation indent. Default off.
    pub deep_indent: bool,

    /// Opening-brace placement for type declarations. Default same line.
    pub braces_types: BracePlacement,

    /// Opening-brace placement for methods and constructors. Default same line.
    pub braces_methods: BracePlacement,

    /// Opening-brace placement for control statements. Default same line.
    pub braces_control: BracePlacement,

    /// Collapse empty blocks to a `{}` pair on one line. Default on.
    pub cuddle_empty_braces: bool,

    /// Put one `;` no-op statement inside otherwise-empty blocks.
    /// Default off. Ignored when `cuddle_empty_braces` collapses the block.
    pub insert_empty_statement: bool,

    /// Brace handling for control-statement bodies. Default always braced.
    pub control_braces: ControlBraces,

    /// Maximum original blank lines preserved between nodes. Default 2.
    pub keep_blank_lines: usize,

    /// Blank lines before a type declaration. Default 2.
    pub blank_lines_before_class: u8,

    /// Blank lines before a method or constructor. Default 1.
    pub blank_lines_before_method: u8,

    /// Blank lines before a field. Default 0.
    pub blank_lines_before_field: u8,

    /// Blank lines before a control statement or block. Default 0.
    pub blank_lines_before_block: u8,

    /// Forced blank lines after every opening brace. `None` leaves the
    /// policy table in charge. Default `None`.
    pub blank_lines_after_open_brace: Option<u8>,

    /// Forced blank lines before every closing brace. Default `None`.
    pub blank_lines_before_close_brace: Option<u8>,

    /// Blank lines after the package declaration. Default 1.
    pub blank_lines_after_package: u8,

    /// Blank lines between the import section and what follows. Default 2.
    pub blank_lines_after_imports: u8,

    /// Pad assignment operators of consecutive declarations to a common
    /// column. Default off.
    pub align_assignments: bool,

    /// Largest original line gap that keeps two declarations in the same
    /// alignment chunk. Default 1.
    pub align_max_gap_lines: usize,

    /// A comment between declarations starts a new alignment chunk.
    /// Default on.
    pub chunks_by_comments: bool,

    /// Original blank lines beyond the gap threshold start a new alignment
    /// chunk. Default on.
    pub chunks_by_blank_lines: bool,

    /// Argument-list layout. Default auto.
    pub arg_layout: ListLayout,

    /// Parameter-list layout. Default auto.
    pub param_layout: ListLayout,

    /// Fixed element count per line in array initializers; `None` wraps by
    /// measured overflow. Default `None`.
    pub array_elements_per_line: Option<usize>,

    /// Declarations that get a synthesized doc stub when undocumented.
    /// Default none.
    pub doc_stubs: DocTargets,

    /// Repair `@param` tags against the parameter list. Default on.
    pub fix_doc_tags: bool,

    /// Maintain `// end ...` annotations on type and method close braces.
    /// Default off.
    pub close_brace_annotation: bool,

    /// Warn when the file carries no leading header comment. Default off.
    pub header_required: bool,

    /// Parenthesize ternary operands. Default off.
    pub parenthesize_ternary: bool,
}

impl Default for FormatConfig {
    fn default() -> Self {
        FormatConfig {
            max_line_len: MAX_LINE_LEN,
            indent_size: INDENT_SIZE,
            indent_policy: IndentPolicy::Spaces,
            continuation_indent: 8,
            deep_indent: false,
            braces_types: BracePlacement::SameLine,
            braces_methods: BracePlacement::SameLine,
            braces_control: BracePlacement::SameLine,
            cuddle_empty_braces: true,
            insert_empty_statement: false,
            control_braces: ControlBraces::Always,
            keep_blank_lines: 2,
            blank_lines_before_class: 2,
            blank_lines_before_method: 1,
            blank_lines_before_field: 0,
            blank_lines_before_block: 0,
            blank_lines_after_open_brace: None,
            blank_lines_before_close_brace: None,
            blank_lines_after_package: 1,
            blank_lines_after_imports: 2,
            align_assignments: false,
            align_max_gap_lines: 1,
            chunks_by_comments: true,
            chunks_by_blank_lines: true,
            arg_layout: ListLayout::Auto,
            param_layout: ListLayout::Auto,
            array_elements_per_line: None,
            doc_stubs: DocTargets::empty(),
            fix_doc_tags: true,
            close_brace_annotation: false,
            header_required: false,
            parenthesize_ternary: false,
        }
    }
}

impl FormatConfig {
    /// Config with a specific maximum line width.
    pub fn with_max_line_len(max_line_len: usize) -> Self {
        FormatConfig {
            max_line_len,
            ..Default::default()
        }
    }

    /// Opening-brace placement for the given construct kind.
    pub fn brace_placement(&self, kind: NodeKind) -> BracePlacement {
        if kind.is_type_decl() {
            self.braces_types
        } else if matches!(kind, NodeKind::Method | NodeKind::Constructor) {
            self.braces_methods
        } else {
            self.braces_control
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_complete() {
        let cfg = FormatConfig::default();
        assert_eq!(cfg.max_line_len, 80);
        assert_eq!(cfg.indent_size, 4);
        assert_eq!(cfg.keep_blank_lines, 2);
        assert!(cfg.cuddle_empty_braces);
        assert!(!cfg.align_assignments);
        assert!(cfg.doc_stubs.is_empty());
    }

    #[test]
    fn brace_placement_splits_by_group() {
        let cfg = FormatConfig {
            braces_types: BracePlacement::NextLine,
            ..Default::default()
        };
        assert_eq!(
            cfg.brace_placement(NodeKind::Class),
            BracePlacement::NextLine
        );
        assert_eq!(
            cfg.brace_placement(NodeKind::Method),
            BracePlacement::SameLine
        );
        assert_eq!(cfg.brace_placement(NodeKind::If), BracePlacement::SameLine);
    }

    #[test]
    fn doc_targets_cover_by_kind() {
        let targets = DocTargets::METHODS | DocTargets::CLASSES;
        assert!(targets.covers(NodeKind::Method));
        assert!(targets.covers(NodeKind::Class));
        assert!(targets.covers(NodeKind::Enum));
        assert!(!targets.covers(NodeKind::Interface));
        assert!(!targets.covers(NodeKind::Field));
    }
}
