//! Property-based layout tests.
//!
//! Random statement sequences are built into trees and rendered under
//! randomized configurations, checking the engine's structural guarantees:
//! deterministic output, the width contract, the blank-line cap, clean
//! whitespace, bracket balance, and comment-safe brace removal.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use lathe_ast::{CommentKind, NodeKind, Span, StringInterner, Tree, TreeBuilder};
use lathe_fmt::{format_tree, format_trees, ControlBraces, FormatConfig};
use proptest::prelude::*;

/// One top-level statement of a generated file.
#[derive(Clone, Debug)]
enum Stmt {
    Local { name: String, value: String },
    Call { callee: String, args: Vec<String> },
    Ret(Option<String>),
    If { cond: String, callee: String },
    While { cond: String, callee: String },
}

fn ident() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9]{0,7}").expect("valid regex")
}

fn literal() -> impl Strategy<Value = String> {
    prop_oneof![
        (0i32..10_000).prop_map(|n| n.to_string()),
        Just("true".to_string()),
        Just("null".to_string()),
    ]
}

fn stmt() -> impl Strategy<Value = Stmt> {
    prop_oneof![
        (ident(), literal()).prop_map(|(name, value)| Stmt::Local { name, value }),
        (ident(), prop::collection::vec(ident(), 0..6))
            .prop_map(|(callee, args)| Stmt::Call { callee, args }),
        prop::option::of(ident()).prop_map(Stmt::Ret),
        (ident(), ident()).prop_map(|(cond, callee)| Stmt::If { cond, callee }),
        (ident(), ident()).prop_map(|(cond, callee)| Stmt::While { cond, callee }),
    ]
}

/// Statements paired with the blank-line gap the "source" had before each.
fn stmt_list() -> impl Strategy<Value = Vec<(Stmt, u32)>> {
    prop::collection::vec((stmt(), 0u32..6), 1..12)
}

fn config() -> impl Strategy<Value = FormatConfig> {
    (
        prop::sample::select(vec![40usize, 60, 80, 100]),
        any::<bool>(),
        prop::sample::select(vec![
            ControlBraces::Always,
            ControlBraces::Preserve,
            ControlBraces::RemoveWhenSafe,
        ]),
    )
        .prop_map(|(max_line_len, align_assignments, control_braces)| FormatConfig {
            max_line_len,
            align_assignments,
            control_braces,
            ..Default::default()
        })
}

fn push_call(b: &mut TreeBuilder, callee: &str, args: &[String], span: Span) {
    b.open(NodeKind::ExprStmt, span);
    b.open(NodeKind::Call, Span::NONE);
    b.leaf(NodeKind::Ident, callee, Span::NONE);
    b.open(NodeKind::ArgList, Span::NONE);
    for arg in args {
        b.leaf(NodeKind::Ident, arg, Span::NONE);
    }
    b.close();
    b.close();
    b.close();
}

fn push_stmt(b: &mut TreeBuilder, stmt: &Stmt, span: Span) {
    match stmt {
        Stmt::Local { name, value } => {
            b.open(NodeKind::LocalVar, span);
            b.leaf(NodeKind::TypeRef, "int", Span::NONE);
            b.leaf(NodeKind::Ident, name, Span::NONE);
            b.leaf(NodeKind::Literal, value, Span::NONE);
            b.close();
        }
        Stmt::Call { callee, args } => push_call(b, callee, args, span),
        Stmt::Ret(value) => {
            b.open(NodeKind::Return, span);
            if let Some(value) = value {
                b.leaf(NodeKind::Ident, value, Span::NONE);
            }
            b.close();
        }
        Stmt::If { cond, callee } => {
            b.open(NodeKind::If, span);
            b.leaf(NodeKind::Ident, cond, Span::NONE);
            b.open(NodeKind::Block, Span::NONE);
            push_call(b, callee, &[], Span::NONE);
            b.close();
            b.close();
        }
        Stmt::While { cond, callee } => {
            b.open(NodeKind::While, span);
            b.leaf(NodeKind::Ident, cond, Span::NONE);
            b.open(NodeKind::Block, Span::NONE);
            push_call(b, callee, &[], Span::NONE);
            b.close();
            b.close();
        }
    }
}

/// Build a file tree with synthetic source lines encoding the gaps.
fn build(stmts: &[(Stmt, u32)], interner: &StringInterner) -> Tree {
    let mut b = TreeBuilder::new(interner);
    let mut line = 1u32;
    for (stmt, gap) in stmts {
        line += gap;
        push_stmt(&mut b, stmt, Span::lines(line, line));
        line += 1;
    }
    b.finish()
}

fn fmt(tree: &mut Tree, cfg: &FormatConfig, interner: &StringInterner) -> String {
    let outcome = format_tree(tree, cfg, interner);
    match outcome.text {
        Some(text) => text,
        None => panic!("render failed: {:?}", outcome.diagnostics),
    }
}

proptest! {
    #[test]
    fn rendering_is_deterministic(stmts in stmt_list(), cfg in config()) {
        let interner = StringInterner::new();
        let tree = build(&stmts, &interner);

        let first = fmt(&mut tree.clone(), &cfg, &interner);
        let second = fmt(&mut tree.clone(), &cfg, &interner);
        prop_assert_eq!(&first, &second);

        // The parallel driver gives every file the identical result.
        let mut batch = vec![tree.clone(), tree.clone(), tree];
        for outcome in format_trees(&mut batch, &cfg, &interner) {
            prop_assert_eq!(outcome.text.as_deref(), Some(first.as_str()));
        }
    }

    #[test]
    fn lines_stay_within_the_width(stmts in stmt_list(), cfg in config()) {
        let interner = StringInterner::new();
        let mut tree = build(&stmts, &interner);
        let text = fmt(&mut tree, &cfg, &interner);
        for line in text.lines() {
            prop_assert!(
                line.chars().count() <= cfg.max_line_len,
                "line exceeds {}: {line:?}",
                cfg.max_line_len
            );
        }
    }

    #[test]
    fn output_whitespace_is_clean(stmts in stmt_list(), cfg in config()) {
        let interner = StringInterner::new();
        let mut tree = build(&stmts, &interner);
        let text = fmt(&mut tree, &cfg, &interner);

        prop_assert!(text.ends_with('\n'));
        prop_assert!(!text.ends_with("\n\n"));
        for line in text.lines() {
            prop_assert_eq!(line, line.trim_end(), "trailing whitespace: {:?}", line);
        }
    }

    #[test]
    fn blank_runs_respect_the_cap(stmts in stmt_list(), cfg in config()) {
        let interner = StringInterner::new();
        let mut tree = build(&stmts, &interner);
        let text = fmt(&mut tree, &cfg, &interner);

        // keep_blank_lines is 2, so at most two consecutive empty lines.
        prop_assert!(
            !text.contains("\n\n\n\n"),
            "blank-line cap exceeded in {text:?}"
        );
    }

    #[test]
    fn brackets_balance(stmts in stmt_list(), cfg in config()) {
        let interner = StringInterner::new();
        let mut tree = build(&stmts, &interner);
        let text = fmt(&mut tree, &cfg, &interner);

        let count = |c: char| text.chars().filter(|&x| x == c).count();
        prop_assert_eq!(count('('), count(')'));
        prop_assert_eq!(count('{'), count('}'));
    }

    #[test]
    fn every_statement_survives(stmts in stmt_list(), cfg in config()) {
        let interner = StringInterner::new();
        let mut tree = build(&stmts, &interner);
        let text = fmt(&mut tree, &cfg, &interner);

        for (stmt, _) in &stmts {
            let token = match stmt {
                Stmt::Local { name, .. } => name,
                Stmt::Call { callee, .. } => callee,
                Stmt::Ret(_) => continue,
                Stmt::If { callee, .. } | Stmt::While { callee, .. } => callee,
            };
            prop_assert!(text.contains(token.as_str()), "{token} lost from {text:?}");
        }
    }

    #[test]
    fn brace_removal_never_strands_a_comment(callee in ident(), commented in any::<bool>()) {
        let interner = StringInterner::new();
        let mut b = TreeBuilder::new(&interner);
        b.open(NodeKind::While, Span::NONE);
        b.leaf(NodeKind::Ident, "busy", Span::NONE);
        b.open(NodeKind::Block, Span::NONE);
        push_call(&mut b, &callee, &[], Span::NONE);
        if commented {
            b.leading_on_last(CommentKind::Line, "keep", Span::lines(2, 2));
        }
        b.close();
        b.close();
        let mut tree = b.finish();

        let cfg = FormatConfig {
            control_braces: ControlBraces::RemoveWhenSafe,
            ..Default::default()
        };
        let text = fmt(&mut tree, &cfg, &interner);
        if commented {
            prop_assert!(text.contains('{'), "comment stranded: {text:?}");
            prop_assert!(text.contains("// keep"));
        } else {
            prop_assert!(!text.contains('{'), "braces kept: {text:?}");
        }
    }
}
