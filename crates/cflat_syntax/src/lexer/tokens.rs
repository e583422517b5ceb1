//! Token types for the C-Flat lexer.
//!
//! The lexer uses **registry-backed IDs** for language vocabulary:
//! - `Keyword(KeywordId)` for reserved words
//! - `Operator(OperatorId)` for operators
//! - `Punctuation(PunctuationId)` for punctuation tokens
//!
//! ## Notes
//! - Every keyword gets its own token kind; the parser never compares identifier text against keyword spellings.
//! - Use `crate::token_helpers` for ergonomic token matching at call sites.

use std::fmt;

use crate::ast::{Position, Span};
use cflat_core::lang::keywords::{self, KeywordId};
use cflat_core::lang::operators::{self, OperatorId};
use cflat_core::lang::punctuation::{self, PunctuationId};

// ============================================================================
// TOKEN TYPES
// ============================================================================

/// Kind of token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // ========== Keyword / operator / punctuation (ID-based) ==========
    Keyword(KeywordId),
    Operator(OperatorId),
    Punctuation(PunctuationId),

    // ========== Identifiers and Literals ==========
    Ident(String),
    Int(i64),
    Float(f64),
    Char(char),
    String(String),

    // ========== Special ==========
    /// A character no lexical rule accepts. The parser reports it.
    Unrecognized(char),
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Keyword(id) => write!(f, "`{}`", keywords::as_str(*id)),
            TokenKind::Operator(id) => write!(f, "`{}`", operators::as_str(*id)),
            TokenKind::Punctuation(id) => write!(f, "`{}`", punctuation::as_str(*id)),
            TokenKind::Ident(name) => write!(f, "identifier `{}`", name),
            TokenKind::Int(n) => write!(f, "integer {}", n),
            TokenKind::Float(x) => write!(f, "float {}", x),
            TokenKind::Char(c) => write!(f, "character {:?}", c),
            TokenKind::String(s) => write!(f, "string {:?}", s),
            TokenKind::Unrecognized(c) => write!(f, "unrecognized character {:?}", c),
            TokenKind::Eof => write!(f, "end of file"),
        }
    }
}

/// A token with its kind, raw text and source location.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Raw source text of the token (empty for `Eof`).
    pub lexeme: String,
    pub pos: Position,
    pub span: Span,
}

impl Token {
    /// Construct a new token.
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, pos: Position, span: Span) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            pos,
            span,
        }
    }
}

/// Resolve an identifier spelling to a keyword id, if reserved.
pub fn keyword_id(name: &str) -> Option<KeywordId> {
    keywords::from_str(name)
}
