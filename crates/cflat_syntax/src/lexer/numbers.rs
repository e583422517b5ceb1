//! Number scanning for the C-Flat lexer
//!
//! Handles decimal and `0x` hexadecimal integers and `digits.digits` floating literals.

use super::Lexer;
use super::tokens::TokenKind;
use crate::ast::Position;

impl<'a> Lexer<'a> {
    pub(super) fn scan_number(&mut self, start: usize, pos: Position) {
        let source = self.source;
        if self.peek() == Some('0')
            && matches!(self.peek_next(), Some('x' | 'X'))
            && source[start + 2..].starts_with(|c: char| c.is_ascii_hexdigit())
        {
            self.advance(); // 0
            self.advance(); // x
            let digits_start = self.current_pos;
            self.eat_while(|c| c.is_ascii_hexdigit());
            let digits = &source[digits_start..self.current_pos];
            let value = match i64::from_str_radix(digits, 16) {
                Ok(n) => n,
                Err(_) => {
                    self.error(format!("Integer literal 0x{} does not fit in 64 bits", digits), start, pos);
                    0
                }
            };
            self.add_token(TokenKind::Int(value), start, pos);
            return;
        }

        self.eat_while(|c| c.is_ascii_digit());

        // Fractional part only when a digit follows the dot, so `7.` stays an integer and a dot.
        if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            self.eat_while(|c| c.is_ascii_digit());
            let text = &source[start..self.current_pos];
            match text.parse::<f64>() {
                Ok(f) => self.add_token(TokenKind::Float(f), start, pos),
                Err(_) => {
                    self.error(format!("Invalid float literal: {}", text), start, pos);
                    self.add_token(TokenKind::Float(0.0), start, pos);
                }
            }
            return;
        }

        let text = &source[start..self.current_pos];
        let value = match text.parse::<i64>() {
            Ok(n) => n,
            Err(_) => {
                self.error(format!("Integer literal {} does not fit in 64 bits", text), start, pos);
                0
            }
        };
        self.add_token(TokenKind::Int(value), start, pos);
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(c) = self.peek() {
            if pred(c) {
                self.advance();
            } else {
                break;
            }
        }
    }
}
