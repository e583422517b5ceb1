//! Parser for the C-Flat programming language
//!
//! Converts a token stream into an AST: a keyword-driven recursive-descent parser for declarations and statements,
//! and precedence climbing over the operator registry's binary levels for expressions.
//!
//! Parsing never stops at the first error. An error abandons the declaration being parsed; the parser then
//! synchronizes on a statement/block boundary and carries on, so one run reports every independent problem.
//!
//! ## Examples
//!
//! ```rust
//! use cflat_syntax::{lexer, parser};
//!
//! let source = "fun add(a: int, b: int) : int { return a + b; }";
//! let lexed = lexer::lex(source);
//! let parsed = parser::parse(&lexed.tokens);
//! assert!(!parsed.has_errors());
//! assert_eq!(parsed.program.declarations.len(), 1);
//! ```

use crate::ast::*;
use crate::diagnostics::{CompileError, ParseStage, errors};
use crate::lexer::{Token, TokenKind};
use cflat_core::lang::keywords::KeywordId;
use cflat_core::lang::operators::{self, OperatorId};
use cflat_core::lang::punctuation::PunctuationId;

// NOTE: This module is split across multiple files using `include!` to keep all parser
// methods in the same Rust module (preserving privacy + call patterns) while avoiding
// a single large source file.

include!("parser/core.rs");
include!("parser/helpers.rs");
include!("parser/decl.rs");
include!("parser/stmts.rs");
include!("parser/expr.rs");
include!("parser/util.rs");
include!("parser/api.rs");
include!("parser/tests.rs");
