//! Diagnostics for the C-Flat front end
//!
//! A single [`CompileError`] type covers lex errors, syntax errors and warnings. Errors abort the declaration being
//! parsed and drive synchronization; warnings are recorded next to them and never change the tree.
//!
//! `CompileError` implements [`miette::Diagnostic`], so the CLI can render it with a source snippet.

use std::fmt;

use miette::{LabeledSpan, Severity};
use thiserror::Error;

use crate::ast::{Position, Span};

/// The parser layer that raised an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseStage {
    Expression,
    Statement,
    Declaration,
}

impl fmt::Display for ParseStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseStage::Expression => write!(f, "expression"),
            ParseStage::Statement => write!(f, "statement"),
            ParseStage::Declaration => write!(f, "declaration"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Lex,
    Syntax,
    Warning,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Lex => write!(f, "lex error"),
            ErrorKind::Syntax => write!(f, "syntax error"),
            ErrorKind::Warning => write!(f, "warning"),
        }
    }
}

/// A compile-time diagnostic with location information
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{}", render(.kind, .stage, .pos, .message))]
pub struct CompileError {
    pub message: String,
    pub pos: Position,
    pub span: Span,
    pub kind: ErrorKind,
    pub stage: Option<ParseStage>,
    pub notes: Vec<String>,
    pub hints: Vec<String>,
}

impl CompileError {
    fn with_kind(kind: ErrorKind, message: String, pos: Position, span: Span) -> Self {
        Self {
            message,
            pos,
            span,
            kind,
            stage: None,
            notes: Vec::new(),
            hints: Vec::new(),
        }
    }

    pub fn lex(message: String, pos: Position, span: Span) -> Self {
        Self::with_kind(ErrorKind::Lex, message, pos, span)
    }

    pub fn syntax(message: String, pos: Position, span: Span) -> Self {
        Self::with_kind(ErrorKind::Syntax, message, pos, span)
    }

    pub fn warning(message: String, pos: Position, span: Span) -> Self {
        Self::with_kind(ErrorKind::Warning, message, pos, span)
    }

    /// Tag the error with the parser layer that raised it, unless already tagged.
    pub fn in_stage(mut self, stage: ParseStage) -> Self {
        self.stage.get_or_insert(stage);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }

    pub fn is_warning(&self) -> bool {
        self.kind == ErrorKind::Warning
    }

    pub fn is_error(&self) -> bool {
        !self.is_warning()
    }
}

fn render(kind: &ErrorKind, stage: &Option<ParseStage>, pos: &Position, message: &str) -> String {
    let Position { line, column } = *pos;
    match (kind, stage) {
        (ErrorKind::Warning, _) => format!("WARNING: Line {line}, character {column} - {message}"),
        (ErrorKind::Lex, _) => format!("ERROR(Lexer): Line {line}, character {column} - {message}"),
        (ErrorKind::Syntax, Some(stage)) => {
            format!("ERROR(Parser): Line {line}, character {column} while parsing {stage} - {message}")
        }
        (ErrorKind::Syntax, None) => format!("ERROR(Parser): Line {line}, character {column} - {message}"),
    }
}

impl miette::Diagnostic for CompileError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match self.kind {
            ErrorKind::Lex => "cflat::lex",
            ErrorKind::Syntax => "cflat::syntax",
            ErrorKind::Warning => "cflat::warning",
        };
        Some(Box::new(code))
    }

    fn severity(&self) -> Option<Severity> {
        Some(match self.kind {
            ErrorKind::Warning => Severity::Warning,
            ErrorKind::Lex | ErrorKind::Syntax => Severity::Error,
        })
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        if self.hints.is_empty() && self.notes.is_empty() {
            return None;
        }
        let text = self
            .notes
            .iter()
            .map(|n| format!("note: {n}"))
            .chain(self.hints.iter().map(|h| format!("hint: {h}")))
            .collect::<Vec<_>>()
            .join("\n");
        Some(Box::new(text))
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let len = self.span.end.saturating_sub(self.span.start);
        Some(Box::new(std::iter::once(LabeledSpan::new(
            Some(self.kind.to_string()),
            self.span.start,
            len,
        ))))
    }
}

// ============================================================================
// Error catalog: recurring diagnostics
// ============================================================================

/// Constructors for diagnostics raised from more than one place.
pub mod errors {
    use super::*;

    pub fn unrecognized_token(c: char, pos: Position, span: Span) -> CompileError {
        CompileError::syntax(format!("Unimplemented token - Unable to recognize {}", c), pos, span)
    }

    pub fn inferred_type(what: &str, name: &str, pos: Position, span: Span) -> CompileError {
        CompileError::warning(
            format!("{what} `{name}` is not typed. Its type will be inferred from its use."),
            pos,
            span,
        )
    }

    pub fn constant_conditional(construct: &str, value: &str, pos: Position, span: Span) -> CompileError {
        CompileError::warning(
            format!("Conditional in {construct} statement always evaluates to {value}"),
            pos,
            span,
        )
    }

    pub fn bad_conditional(construct: &str, found: &str, pos: Position, span: Span) -> CompileError {
        CompileError::syntax(
            format!("Bad conditional. {found} is not a boolean in {construct} statement"),
            pos,
            span,
        )
        .with_hint("Conditions must be a comparison, a logical `&&`/`||`, or a `!` expression")
    }

    pub fn unbraced_body(construct: &str, pos: Position, span: Span) -> CompileError {
        CompileError::warning(format!("{construct} body is not enclosed in braces."), pos, span).with_note(
            "The language is not whitespace aware: statements after the first are not part of the body, and an \
             `else` binds to the nearest `if`.",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_error_display_includes_stage() {
        let err = CompileError::syntax("Expected `;`".into(), Position::new(3, 7), Span::new(20, 21))
            .in_stage(ParseStage::Statement);
        assert_eq!(
            err.to_string(),
            "ERROR(Parser): Line 3, character 7 while parsing statement - Expected `;`"
        );
    }

    #[test]
    fn first_stage_tag_wins() {
        let err = CompileError::syntax("x".into(), Position::new(1, 0), Span::default())
            .in_stage(ParseStage::Expression)
            .in_stage(ParseStage::Declaration);
        assert_eq!(err.stage, Some(ParseStage::Expression));
    }

    #[test]
    fn warning_display() {
        let err = CompileError::warning("Empty enum".into(), Position::new(2, 0), Span::default());
        assert!(err.is_warning());
        assert_eq!(err.to_string(), "WARNING: Line 2, character 0 - Empty enum");
    }
}
