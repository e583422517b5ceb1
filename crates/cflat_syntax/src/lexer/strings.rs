//! Character and string literal scanning for the C-Flat lexer
//!
//! Both literal forms share one escape set: `\n \r \t \b \\ \"`. Any other escaped character stands for itself,
//! so `'\''` is a quote character.

use super::Lexer;
use super::tokens::TokenKind;
use crate::ast::Position;

/// Resolve the character after a backslash.
pub(super) fn unescape(c: char) -> char {
    match c {
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        'b' => '\u{8}',
        other => other,
    }
}

impl<'a> Lexer<'a> {
    /// Scan a character literal. The opening `'` is already consumed.
    pub(super) fn scan_char(&mut self, start: usize, pos: Position) {
        let value = match self.peek() {
            None | Some('\n' | '\r') => {
                self.error("Unterminated character literal.", start, pos);
                return;
            }
            Some('\\') => {
                self.advance();
                match self.advance() {
                    Some(c) => unescape(c),
                    None => {
                        self.error("Unterminated character literal.", start, pos);
                        return;
                    }
                }
            }
            Some(c) => {
                self.advance();
                c
            }
        };

        if !self.match_char('\'') {
            self.error("Unterminated character literal.", start, pos);
        }
        self.add_token(TokenKind::Char(value), start, pos);
    }

    /// Scan a string literal. The opening `"` is already consumed.
    pub(super) fn scan_string(&mut self, start: usize, pos: Position) {
        let mut value = String::new();
        loop {
            match self.advance() {
                Some('"') => break,
                Some('\\') => match self.advance() {
                    Some(c) => value.push(unescape(c)),
                    None => {
                        self.error("Unterminated String Literal.", start, pos);
                        break;
                    }
                },
                Some('\n' | '\r') => {
                    self.error("Unterminated String Literal.", start, pos);
                    break;
                }
                Some(c) => value.push(c),
                None => {
                    self.error("Unterminated String Literal.", start, pos);
                    break;
                }
            }
        }
        self.add_token(TokenKind::String(value), start, pos);
    }
}
