//! Lexer for the C-Flat programming language
//!
//! Handles tokenization including:
//! - Keywords and identifiers
//! - Integer (decimal and `0x` hex), floating, character and string literals
//! - Operators and punctuation, by longest match over `cflat_core::lang::symbols`
//! - `//` line comments
//!
//! Lexing never stops at the first problem: malformed literals are recorded as errors and scanning resumes,
//! and unknown characters become [`TokenKind::Unrecognized`] tokens for the parser to report.
//!
//! ## Module Structure
//!
//! - `tokens` - Token types (TokenKind, Token)
//! - `strings` - Character/string literal scanning and escapes
//! - `numbers` - Numeric literal scanning

mod numbers;
mod strings;
pub mod tokens;

pub use tokens::{Token, TokenKind, keyword_id};

use crate::ast::{Position, Span};
use crate::diagnostics::CompileError;
use cflat_core::lang::symbols::{self, Symbol};

/// Output of [`lex`]: the token stream plus any lex errors.
///
/// `tokens` always ends with exactly one [`TokenKind::Eof`].
#[derive(Debug, Clone, PartialEq)]
pub struct Lexed {
    pub tokens: Vec<Token>,
    pub errors: Vec<CompileError>,
}

impl Lexed {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Lexer for C-Flat source code.
pub struct Lexer<'a> {
    source: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    current_pos: usize,
    line: usize,
    column: usize,
    /// The previous character was `\r`, so a following `\n` does not start another line.
    after_cr: bool,
    tokens: Vec<Token>,
    errors: Vec<CompileError>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            current_pos: 0,
            line: 1,
            column: 0,
            after_cr: false,
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Tokenize the entire source code.
    pub fn tokenize(mut self) -> Lexed {
        loop {
            self.skip_trivia();
            if self.is_at_end() {
                break;
            }
            self.scan_token();
        }

        let eof = Token::new(
            TokenKind::Eof,
            "",
            self.position(),
            Span::new(self.current_pos, self.current_pos),
        );
        self.tokens.push(eof);

        Lexed {
            tokens: self.tokens,
            errors: self.errors,
        }
    }

    // ========================================================================
    // Core character handling
    // ========================================================================

    fn is_at_end(&mut self) -> bool {
        self.chars.peek().is_none()
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn peek_next(&self) -> Option<char> {
        let mut iter = self.source[self.current_pos..].chars();
        iter.next();
        iter.next()
    }

    fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    fn advance(&mut self) -> Option<char> {
        let (pos, c) = self.chars.next()?;
        self.current_pos = pos + c.len_utf8();
        match c {
            '\n' if self.after_cr => {
                self.after_cr = false;
            }
            '\n' | '\r' => {
                self.line += 1;
                self.column = 0;
                self.after_cr = c == '\r';
            }
            _ => {
                self.column += 1;
                self.after_cr = false;
            }
        }
        Some(c)
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn add_token(&mut self, kind: TokenKind, start: usize, pos: Position) {
        let lexeme = &self.source[start..self.current_pos];
        self.tokens
            .push(Token::new(kind, lexeme, pos, Span::new(start, self.current_pos)));
    }

    fn error(&mut self, message: impl Into<String>, start: usize, pos: Position) {
        let err = CompileError::lex(message.into(), pos, Span::new(start, self.current_pos));
        tracing::error!(%err, "lex error");
        self.errors.push(err);
    }

    // ========================================================================
    // Main scanning dispatch
    // ========================================================================

    /// Skip whitespace and `//` comments.
    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.advance();
                }
                Some('/') if self.peek_next() == Some('/') => {
                    while let Some(c) = self.peek() {
                        if c == '\n' || c == '\r' {
                            break;
                        }
                        self.advance();
                    }
                }
                _ => return,
            }
        }
    }

    fn scan_token(&mut self) {
        let start = self.current_pos;
        let pos = self.position();

        let Some(c) = self.peek() else {
            return;
        };

        match c {
            '\'' => {
                self.advance();
                self.scan_char(start, pos);
            }
            '"' => {
                self.advance();
                self.scan_string(start, pos);
            }
            '0'..='9' => self.scan_number(start, pos),
            _ if is_ident_start(c) => self.scan_identifier(start, pos),
            _ => {
                if let Some((symbol, len)) = symbols::longest_match(&self.source[start..]) {
                    // Symbols are ASCII, so byte length equals char count.
                    for _ in 0..len {
                        self.advance();
                    }
                    let kind = match symbol {
                        Symbol::Operator(id) => TokenKind::Operator(id),
                        Symbol::Punctuation(id) => TokenKind::Punctuation(id),
                    };
                    self.add_token(kind, start, pos);
                } else {
                    self.advance();
                    tracing::error!(line = pos.line, column = pos.column, character = %c, "unrecognized character");
                    self.add_token(TokenKind::Unrecognized(c), start, pos);
                }
            }
        }
    }

    // ========================================================================
    // Identifier scanning
    // ========================================================================

    fn scan_identifier(&mut self, start: usize, pos: Position) {
        while let Some(c) = self.peek() {
            if is_ident_continue(c) {
                self.advance();
            } else {
                break;
            }
        }

        let name = &self.source[start..self.current_pos];
        let kind = match keyword_id(name) {
            Some(id) => TokenKind::Keyword(id),
            None => TokenKind::Ident(name.to_string()),
        };
        self.add_token(kind, start, pos);
    }
}

// ============================================================================
// Helper functions
// ============================================================================

/// Check if a character can start an identifier.
fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// Check if a character can continue an identifier. Digits are not part of identifiers.
fn is_ident_continue(c: char) -> bool {
    is_ident_start(c)
}

/// Convenience function to lex a source string.
///
/// This is a shorthand for `Lexer::new(source).tokenize()`.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn lex(source: &str) -> Lexed {
    let lexed = Lexer::new(source).tokenize();
    tracing::debug!(
        tokens = lexed.tokens.len(),
        errors = lexed.errors.len(),
        "lexed source"
    );
    lexed
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use cflat_core::lang::keywords::{self, KeywordId};
    use cflat_core::lang::operators::{self, OperatorId};
    use cflat_core::lang::punctuation::{self, PunctuationId};

    fn kinds(source: &str) -> Vec<TokenKind> {
        let lexed = lex(source);
        assert!(lexed.errors.is_empty(), "unexpected lex errors: {:?}", lexed.errors);
        lexed.tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_keyword_registry_parity() {
        for k in keywords::KEYWORDS {
            let tokens = kinds(k.canonical);
            assert_eq!(tokens, vec![TokenKind::Keyword(k.id), TokenKind::Eof], "keyword {:?}", k.canonical);
        }
    }

    #[test]
    fn test_operator_registry_parity() {
        for o in operators::OPERATORS {
            let tokens = kinds(o.spelling);
            assert_eq!(tokens, vec![TokenKind::Operator(o.id), TokenKind::Eof], "operator {:?}", o.spelling);
        }
    }

    #[test]
    fn test_punctuation_registry_parity() {
        for p in punctuation::PUNCTUATION {
            let tokens = kinds(p.canonical);
            assert_eq!(
                tokens,
                vec![TokenKind::Punctuation(p.id), TokenKind::Eof],
                "punctuation {:?}",
                p.canonical
            );
        }
    }

    #[test]
    fn test_longest_match() {
        assert_eq!(
            kinds("a<<=b>>c"),
            vec![
                TokenKind::Ident("a".into()),
                TokenKind::Operator(OperatorId::ShlEq),
                TokenKind::Ident("b".into()),
                TokenKind::Operator(OperatorId::Shr),
                TokenKind::Ident("c".into()),
                TokenKind::Eof,
            ]
        );
        assert_eq!(
            kinds("x+++y"),
            vec![
                TokenKind::Ident("x".into()),
                TokenKind::Operator(OperatorId::PlusPlus),
                TokenKind::Operator(OperatorId::Plus),
                TokenKind::Ident("y".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_keywords_are_case_sensitive() {
        assert_eq!(
            kinds("var Var"),
            vec![
                TokenKind::Keyword(KeywordId::Var),
                TokenKind::Ident("Var".into()),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            kinds("42 0x1F 3.25 7."),
            vec![
                TokenKind::Int(42),
                TokenKind::Int(31),
                TokenKind::Float(3.25),
                TokenKind::Int(7),
                TokenKind::Punctuation(PunctuationId::Dot),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_integer_overflow_is_an_error() {
        let lexed = lex("99999999999999999999");
        assert_eq!(lexed.errors.len(), 1);
        assert_eq!(lexed.tokens[0].kind, TokenKind::Int(0));
    }

    #[test]
    fn test_char_and_string_escapes() {
        assert_eq!(
            kinds(r#"'a' '\n' '\q' "a\tb\"c\\""#),
            vec![
                TokenKind::Char('a'),
                TokenKind::Char('\n'),
                TokenKind::Char('q'),
                TokenKind::String("a\tb\"c\\".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_unterminated_literals_are_recoverable() {
        let lexed = lex("\"abc\nvar");
        assert_eq!(lexed.errors.len(), 1);
        assert!(lexed.errors[0].message.contains("Unterminated string"));
        assert_eq!(lexed.tokens[1].kind, TokenKind::Keyword(KeywordId::Var));

        let lexed = lex("'ab x");
        assert_eq!(lexed.errors.len(), 1);
        assert!(lexed.tokens.iter().any(|t| t.kind == TokenKind::Ident("x".into())));
    }

    #[test]
    fn test_unrecognized_character() {
        let tokens = kinds("a @ b");
        assert_eq!(tokens[1], TokenKind::Unrecognized('@'));
        assert_eq!(tokens.len(), 4);
    }

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(
            kinds("a // comment ; }\nb / c"),
            vec![
                TokenKind::Ident("a".into()),
                TokenKind::Ident("b".into()),
                TokenKind::Operator(OperatorId::Slash),
                TokenKind::Ident("c".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_positions() {
        let lexed = lex("var x;\n  x = 1;\r\ny");
        let positions: Vec<_> = lexed.tokens.iter().map(|t| (t.pos.line, t.pos.column)).collect();
        assert_eq!(
            positions,
            vec![(1, 0), (1, 4), (1, 5), (2, 2), (2, 4), (2, 6), (2, 7), (3, 0), (3, 1)]
        );
        assert_eq!(lexed.tokens[1].lexeme, "x");
        assert_eq!(lexed.tokens[1].span, Span::new(4, 5));
    }

    #[test]
    fn test_eof_is_always_last() {
        for source in ["", "   ", "// only a comment", "x"] {
            let lexed = lex(source);
            assert_eq!(lexed.tokens.last().map(|t| &t.kind), Some(&TokenKind::Eof));
            assert_eq!(lexed.tokens.iter().filter(|t| t.kind == TokenKind::Eof).count(), 1);
        }
    }

    #[test]
    fn test_identifiers_stop_at_digits() {
        assert_eq!(
            kinds("ab1"),
            vec![TokenKind::Ident("ab".into()), TokenKind::Int(1), TokenKind::Eof]
        );
    }
}
