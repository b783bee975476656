//! The prepare pass: every tree mutation, before any layout.
//!
//! Layout (including probe rendering) works on a shared `&Tree`, so
//! everything that splices nodes or comment records runs here first:
//! re-tagging previously synthesized comments, doc-comment stubs,
//! close-brace annotations, doc-tag repair, and configured ternary
//! parentheses. Warnings queue onto the diagnostic queue the render job
//! later takes over.

use lathe_ast::{Comment, CommentKind, NodeId, NodeKind, Span, StringInterner, Tree};
use lathe_diagnostic::{DiagCode, Diagnostic, DiagnosticQueue};
use tracing::debug;

use crate::config::FormatConfig;
use crate::doctags::{self, TagFix};

/// Prefix of synthesized doc-stub text; also how a re-run recognizes a
/// stub the previous run left behind.
const DOC_STUB_PREFIX: &str = "TODO document ";

/// Prefix of synthesized close-brace annotations.
const END_MARK_PREFIX: &str = "end ";

/// Run every pre-layout mutation on the tree.
pub(crate) fn prepare(
    tree: &mut Tree,
    cfg: &FormatConfig,
    interner: &StringInterner,
    diags: &mut DiagnosticQueue,
) {
    let ids: Vec<NodeId> = tree.ids().collect();

    retag_generated(tree, interner, &ids);
    if cfg.header_required {
        check_header(tree, diags);
    }
    if !cfg.doc_stubs.is_empty() {
        doc_stubs(tree, cfg, interner, diags, &ids);
    }
    if cfg.close_brace_annotation {
        close_brace_annotations(tree, interner, &ids);
    }
    if cfg.fix_doc_tags {
        repair_doc_tags(tree, interner, diags, &ids);
    }
    if cfg.parenthesize_ternary {
        parenthesize_ternaries(tree, &ids);
    }
}

/// Re-tag comments a previous run synthesized.
///
/// Parsers cannot know a comment was formatter-generated, so stubs and end
/// marks come back as ordinary records. Recognizing them by their template
/// text makes a re-run replace them instead of stacking duplicates.
fn retag_generated(tree: &mut Tree, interner: &StringInterner, ids: &[NodeId]) {
    for &id in ids {
        let node = tree.node_mut(id);
        for i in 0..node.leading.len() {
            let Some(c) = node.leading.get_mut(i) else {
                break;
            };
            if c.kind == CommentKind::Doc
                && interner.lookup_static(c.text).starts_with(DOC_STUB_PREFIX)
            {
                c.generated = true;
            }
        }
        for i in 0..node.trailing.len() {
            let Some(c) = node.trailing.get_mut(i) else {
                break;
            };
            if c.kind == CommentKind::Line
                && interner.lookup_static(c.text).starts_with(END_MARK_PREFIX)
            {
                c.generated = true;
            }
        }
    }
}

/// Warn when the file opens with no header comment at all.
fn check_header(tree: &Tree, diags: &mut DiagnosticQueue) {
    let root = tree.root();
    let first = tree.first_child(root);
    let documented = !tree.node(root).leading.is_empty()
        || first.is_some_and(|f| !tree.node(f).leading.is_empty());
    if !documented {
        let span = first.map_or(Span::NONE, |f| tree.node(f).span);
        diags.push(
            Diagnostic::warning(DiagCode::W1005, "file has no header comment").with_span(span),
        );
    }
}

/// Synthesize doc-comment stubs for undocumented target declarations.
fn doc_stubs(
    tree: &mut Tree,
    cfg: &FormatConfig,
    interner: &StringInterner,
    diags: &mut DiagnosticQueue,
    ids: &[NodeId],
) {
    for &id in ids {
        let kind = tree.kind(id);
        if !cfg.doc_stubs.covers(kind) {
            continue;
        }
        let Some(name) = decl_name(tree, interner, id) else {
            continue;
        };
        let text = interner.intern(&format!("{DOC_STUB_PREFIX}{name}."));

        // A stub from an earlier run refreshes in place.
        let node = tree.node_mut(id);
        if let Some(i) = node.leading.doc_index() {
            if let Some(doc) = node.leading.get_mut(i) {
                if doc.generated {
                    doc.text = text;
                }
            }
            continue;
        }
        debug!(?kind, name, "synthesizing doc stub");
        let span = node.span;
        node.leading.push(Comment::generated(CommentKind::Doc, text));
        diags.push(
            Diagnostic::warning(DiagCode::W1004, format!("{kind} {name} has no doc comment"))
                .with_span(span),
        );
    }
}

/// Maintain `// end Name` annotations after type and method close braces.
///
/// The record lives on the declaration's trailing chain, which flushes
/// right after the declaration's last token, the closing brace.
fn close_brace_annotations(tree: &mut Tree, interner: &StringInterner, ids: &[NodeId]) {
    for &id in ids {
        let kind = tree.kind(id);
        let annotated = kind.is_type_decl()
            || matches!(kind, NodeKind::Method | NodeKind::Constructor);
        if !annotated {
            continue;
        }
        let Some(name) = decl_name(tree, interner, id) else {
            continue;
        };
        let text = interner.intern(&format!("{END_MARK_PREFIX}{name}"));
        let node = tree.node_mut(id);
        node.trailing.retain(|c| !c.generated);
        node.trailing
            .push(Comment::generated(CommentKind::Line, text));
    }
}

/// Repair `@param` tags of documented methods and constructors.
fn repair_doc_tags(
    tree: &mut Tree,
    interner: &StringInterner,
    diags: &mut DiagnosticQueue,
    ids: &[NodeId],
) {
    for &id in ids {
        if !matches!(tree.kind(id), NodeKind::Method | NodeKind::Constructor) {
            continue;
        }
        let Some(doc_index) = tree.node(id).leading.doc_index() else {
            continue;
        };
        let Some(doc) = tree.node(id).leading.get(doc_index) else {
            continue;
        };
        if doc.generated {
            continue;
        }
        let doc_text = interner.lookup_static(doc.text);

        let params = param_names(tree, interner, id);
        let params: Vec<&str> = params.iter().map(String::as_str).collect();
        let Some(repair) = doctags::repair_params(doc_text, &params) else {
            continue;
        };

        let span = tree.node(id).span;
        let name = decl_name(tree, interner, id).unwrap_or_default();
        for fix in &repair.fixes {
            let (code, message) = match fix {
                TagFix::Inserted(p) => (
                    DiagCode::W1001,
                    format!("@param {p} was missing from the doc of {name}"),
                ),
                TagFix::Renamed { from, to } => (
                    DiagCode::W1002,
                    format!("@param {from} renamed to {to} in the doc of {name}"),
                ),
                TagFix::Dropped(p) => (
                    DiagCode::W1003,
                    format!("@param {p} names no parameter of {name}"),
                ),
            };
            diags.push(Diagnostic::warning(code, message).with_span(span));
        }

        let text = interner.intern(&repair.text);
        if let Some(doc) = tree.node_mut(id).leading.get_mut(doc_index) {
            doc.text = text;
        }
    }
}

/// Wrap composite ternary operands in parentheses.
fn parenthesize_ternaries(tree: &mut Tree, ids: &[NodeId]) {
    for &id in ids {
        if tree.kind(id) != NodeKind::Ternary {
            continue;
        }
        let operands: Vec<NodeId> = tree.children(id).collect();
        for operand in operands {
            if matches!(
                tree.kind(operand),
                NodeKind::Binary | NodeKind::Ternary | NodeKind::Assign
            ) {
                tree.wrap_in_parens(operand);
            }
        }
    }
}

/// Declared name of a type, method, or field node.
fn decl_name(tree: &Tree, interner: &StringInterner, id: NodeId) -> Option<String> {
    let ident = tree.child_of_kind(id, NodeKind::Ident)?;
    let name = tree.node(ident).text?;
    Some(interner.lookup_static(name).to_owned())
}

/// Parameter names of a method, in declaration order.
fn param_names(tree: &Tree, interner: &StringInterner, id: NodeId) -> Vec<String> {
    let Some(list) = tree.child_of_kind(id, NodeKind::ParamList) else {
        return Vec::new();
    };
    tree.children(list)
        .filter_map(|p| {
            let ident = tree.child_of_kind(p, NodeKind::Ident)?;
            let name = tree.node(ident).text?;
            Some(interner.lookup_static(name).to_owned())
        })
        .collect()
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "tests use unwrap for brevity")]
mod tests {
    use super::*;
    use lathe_ast::TreeBuilder;

    fn method_with_doc(interner: &StringInterner, doc: &str, params: &[&str]) -> Tree {
        let mut b = TreeBuilder::new(interner);
        b.open(NodeKind::Method, Span::lines(3, 6));
        b.leading(CommentKind::Doc, doc, Span::lines(1, 2));
        b.leaf(NodeKind::TypeRef, "void", Span::NONE);
        b.leaf(NodeKind::Ident, "run", Span::NONE);
        b.open(NodeKind::ParamList, Span::NONE);
        for p in params {
            b.open(NodeKind::Param, Span::NONE);
            b.leaf(NodeKind::TypeRef, "int", Span::NONE);
            b.leaf(NodeKind::Ident, p, Span::NONE);
            b.close();
        }
        b.close();
        b.open(NodeKind::Block, Span::NONE);
        b.close();
        b.close();
        b.finish()
    }

    fn method_doc_text<'a>(tree: &Tree, interner: &'a StringInterner) -> &'a str {
        let file = tree.root();
        let method = tree.first_child(file).unwrap();
        let doc = tree.node(method).leading.doc().unwrap();
        interner.lookup_static(doc.text)
    }

    #[test]
    fn tag_repair_rewrites_doc_and_warns() {
        let interner = StringInterner::new();
        let mut tree = method_with_doc(&interner, "Runs.\n@param cuont how many", &["count"]);
        let cfg = FormatConfig::default();
        let mut diags = DiagnosticQueue::new();
        prepare(&mut tree, &cfg, &interner, &mut diags);

        assert_eq!(
            method_doc_text(&tree, &interner),
            "Runs.\n@param count how many"
        );
        assert!(diags.has_code(DiagCode::W1002));
        assert!(!diags.has_code(DiagCode::W1001));
    }

    #[test]
    fn doc_stub_synthesized_once() {
        let interner = StringInterner::new();
        let cfg = FormatConfig {
            doc_stubs: crate::config::DocTargets::METHODS,
            ..Default::default()
        };

        let mut b = TreeBuilder::new(&interner);
        b.open(NodeKind::Method, Span::lines(1, 2));
        b.leaf(NodeKind::TypeRef, "void", Span::NONE);
        b.leaf(NodeKind::Ident, "go", Span::NONE);
        b.node(NodeKind::ParamList, Span::NONE);
        b.open(NodeKind::Block, Span::NONE);
        b.close();
        b.close();
        let mut tree = b.finish();

        let mut diags = DiagnosticQueue::new();
        prepare(&mut tree, &cfg, &interner, &mut diags);
        let method = tree.first_child(tree.root()).unwrap();
        let doc = tree.node(method).leading.doc().copied().unwrap();
        assert!(doc.generated);
        assert_eq!(interner.lookup_static(doc.text), "TODO document go.");
        assert!(diags.has_code(DiagCode::W1004));

        // A second run refreshes the stub instead of stacking another.
        let mut diags = DiagnosticQueue::new();
        prepare(&mut tree, &cfg, &interner, &mut diags);
        let leading = &tree.node(method).leading;
        assert_eq!(leading.iter().filter(|c| c.kind.is_doc()).count(), 1);
    }

    #[test]
    fn ternary_operands_wrapped() {
        let interner = StringInterner::new();
        let mut b = TreeBuilder::new(&interner);
        b.open(NodeKind::Ternary, Span::NONE);
        b.open(NodeKind::Binary, Span::NONE);
        b.leaf(NodeKind::Ident, "a", Span::NONE);
        b.leaf(NodeKind::Ident, "b", Span::NONE);
        b.close();
        b.leaf(NodeKind::Literal, "1", Span::NONE);
        b.leaf(NodeKind::Literal, "2", Span::NONE);
        b.close();
        let mut tree = b.finish();
        // Binary operator token.
        let ternary = tree.first_child(tree.root()).unwrap();
        let binary = tree.first_child(ternary).unwrap();
        tree.node_mut(binary).text = Some(interner.intern("<"));

        let cfg = FormatConfig {
            parenthesize_ternary: true,
            ..Default::default()
        };
        let mut diags = DiagnosticQueue::new();
        prepare(&mut tree, &cfg, &interner, &mut diags);

        let kinds: Vec<NodeKind> = tree.children(ternary).map(|c| tree.kind(c)).collect();
        assert_eq!(
            kinds,
            vec![NodeKind::Paren, NodeKind::Literal, NodeKind::Literal]
        );
    }

    #[test]
    fn header_warning_only_when_required() {
        let interner = StringInterner::new();
        let mut b = TreeBuilder::new(&interner);
        b.open(NodeKind::Package, Span::lines(1, 1));
        b.leaf(NodeKind::Ident, "demo", Span::NONE);
        b.close();
        let mut tree = b.finish();

        let mut diags = DiagnosticQueue::new();
        prepare(
            &mut tree,
            &FormatConfig::default(),
            &interner,
            &mut diags,
        );
        assert!(!diags.has_code(DiagCode::W1005));

        let cfg = FormatConfig {
            header_required: true,
            ..Default::default()
        };
        let mut diags = DiagnosticQueue::new();
        prepare(&mut tree, &cfg, &interner, &mut diags);
        assert!(diags.has_code(DiagCode::W1005));
    }
}
