//! Property-based tests for the C-Flat front end
//!
//! These tests use proptest to verify invariants across many randomly
//! generated inputs, catching edge cases that hand-written tests might miss.

use cflat::format::{FormatConfig, format_source, format_tree};
use cflat::parse_source;
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

const BINARY_OPS: &[&str] = &[
    "||", "&&", "|", "^", "&", "==", "!=", "<", "<=", ">", ">=", "<<", ">>", "+", "-", "*", "/", "%", "**",
];

/// Fully parenthesized expressions over a few variables and non-negative integers.
fn expr_strategy() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        prop::sample::select(vec!["a", "b", "cat", "dog"]).prop_map(str::to_string),
        (0i64..1000).prop_map(|n| n.to_string()),
    ];
    leaf.prop_recursive(4, 24, 2, |inner| {
        prop_oneof![
            (inner.clone(), prop::sample::select(BINARY_OPS), inner.clone())
                .prop_map(|(l, op, r)| format!("({l} {op} {r})")),
            (prop::sample::select(vec!["-", "!", "~"]), inner).prop_map(|(op, e)| format!("({op}{e})")),
        ]
    })
}

fn program_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(expr_strategy(), 1..6)
}

fn declarations(exprs: &[String]) -> Vec<String> {
    exprs
        .iter()
        .enumerate()
        .map(|(i, e)| format!("var {}: int = {e};", "v".repeat(i + 1)))
        .collect()
}

fn dump(source: &str) -> String {
    let parsed = parse_source(source);
    assert!(!parsed.has_errors(), "unexpected errors for {source:?}");
    format_tree(&parsed.program, &FormatConfig::new().with_positions(false))
}

// =============================================================================
// Format Properties
// =============================================================================

proptest! {
    /// Property: printing drops redundant parentheses without changing the tree
    #[test]
    fn format_preserves_tree_shape(exprs in program_strategy()) {
        let source = declarations(&exprs).join("\n");
        let formatted = format_source(&source).unwrap();
        prop_assert_eq!(dump(&source), dump(&formatted));
    }

    /// Property: Formatting is idempotent (format(format(x)) == format(x))
    #[test]
    fn format_is_idempotent(exprs in program_strategy()) {
        let source = declarations(&exprs).join(" ");
        let once = format_source(&source).unwrap();
        let twice = format_source(&once).unwrap();
        prop_assert_eq!(once, twice);
    }
}

// =============================================================================
// Parser Properties
// =============================================================================

proptest! {
    /// Property: every top-level declaration is placed at its first token, in source order
    #[test]
    fn declaration_positions_follow_source(
        lines in prop::collection::vec((0usize..6, expr_strategy()), 1..8)
    ) {
        let exprs: Vec<String> = lines.iter().map(|(_, e)| e.clone()).collect();
        let source = declarations(&exprs)
            .iter()
            .zip(&lines)
            .map(|(decl, (indent, _))| format!("{}{decl}", " ".repeat(*indent)))
            .collect::<Vec<_>>()
            .join("\n");
        let parsed = parse_source(&source);
        prop_assert!(!parsed.has_errors());

        let positions: Vec<(usize, usize)> =
            parsed.program.declarations.iter().map(|d| (d.pos.line, d.pos.column)).collect();
        let expected: Vec<(usize, usize)> =
            lines.iter().enumerate().map(|(i, (indent, _))| (i + 1, *indent)).collect();
        prop_assert_eq!(positions, expected);
    }

    /// Property: after any junk, the next `;` is a boundary the parser resumes from
    #[test]
    fn parser_resumes_after_junk(junk in "[0-9+*%<>=!&|^~ ]{1,24}") {
        let source = format!("{junk};\nvar zed: int;");
        let parsed = parse_source(&source);
        let last = parsed.program.declarations.last().map(|d| &d.kind);
        let resumed = matches!(last, Some(cflat::ast::Declaration::Var(v)) if v.name == "zed");
        prop_assert!(resumed, "no recovery for {:?}", source);
    }

    /// Property: arbitrary input never panics, and errors point inside the source
    #[test]
    fn parse_never_panics(source in "[a-z0-9 ;:{}()\\[\\]+*=<>!,.?\"'\n-]{0,64}") {
        let parsed = parse_source(&source);
        let line_count = source.split('\n').count();
        for diagnostic in &parsed.diagnostics {
            prop_assert!(diagnostic.pos.line >= 1 && diagnostic.pos.line <= line_count);
            prop_assert!(diagnostic.span.end <= source.len());
        }
        let _ = format_source(&source);
    }
}
