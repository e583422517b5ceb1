//! Canonical language vocabulary for the C-Flat compiler front end.
//!
//! This crate is intentionally small and dependency-free. It holds the registries that the lexer, parser,
//! pretty-printer and diagnostics share, so that no component has to spell a keyword or operator by hand.
//!
//! ## Notes
//!
//! - This is a "vocabulary core" crate: **no IO**, no global state, and no AST types.
//! - Current scope: reserved keywords, operators (with binary precedence levels), punctuation, and the
//!   longest-match symbol table used by the lexer.

pub mod lang;
