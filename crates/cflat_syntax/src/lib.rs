//! Syntax frontend for the C-Flat language: lexer, parser, AST, diagnostics.
//!
//! This crate is dependency-light and intended for reuse across the compiler driver, the formatter, and future
//! tooling.
//!
//! ## Notes
//! - This crate is intentionally “syntax-only”: it does not do name resolution, type checking, or code generation.
//! - Vocabulary identity (keywords/operators/punctuation) comes from `cflat_core::lang` registries.
//! - Neither stage stops at the first problem: lex and parse errors are collected and returned with the tree.
//!
//! ## Examples
//! ```rust
//! use cflat_syntax::parse_source;
//!
//! let parsed = parse_source("var x: int = 1 + 2;");
//! assert!(!parsed.has_errors());
//! assert_eq!(parsed.program.declarations.len(), 1);
//! ```
//!
//! ## See also
//! - `cflat_core::lang` for registry-backed language vocabulary (keywords/operators/punctuation).

pub mod ast;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod token_helpers;

use parser::Parsed;

/// Lex and parse `source` in one go.
///
/// Lex errors come first in the returned diagnostics, followed by everything the parser reported.
#[tracing::instrument(skip_all, fields(len = source.len()))]
pub fn parse_source(source: &str) -> Parsed {
    let lexed = lexer::lex(source);
    let mut parsed = parser::parse(&lexed.tokens);
    if !lexed.errors.is_empty() {
        let mut diagnostics = lexed.errors;
        diagnostics.append(&mut parsed.diagnostics);
        parsed.diagnostics = diagnostics;
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lex_errors_precede_parse_errors() {
        let parsed = parse_source("var s: string = \"open;\nvar x: int = ;");
        let kinds: Vec<_> = parsed.errors().map(|e| e.kind).collect();
        assert_eq!(kinds.first(), Some(&diagnostics::ErrorKind::Lex));
        assert!(kinds.contains(&diagnostics::ErrorKind::Syntax));
    }
}
