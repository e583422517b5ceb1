/// Parser core types and entrypoint.
///
/// This chunk defines the [`Parser`] type, its top-level `parse()` loop, and the [`Parsed`] result.
///
/// ## Notes
/// - This file is `include!`'d into `crate::parser` to keep all parser methods in a
///   single module while avoiding a single “god file”.
///
/// Result of a parse run: the program plus every diagnostic collected on the way.
///
/// A run with any error is a failed run, even though `program` still holds every declaration that parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed {
    pub program: Program,
    /// Errors and warnings in the order they were raised.
    pub diagnostics: Vec<CompileError>,
}

impl Parsed {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(CompileError::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &CompileError> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &CompileError> {
        self.diagnostics.iter().filter(|d| d.is_warning())
    }
}

/// Start of a construct: position and byte offset of its first token.
#[derive(Debug, Clone, Copy)]
struct Mark {
    pos: Position,
    start: usize,
}

/// Parser state.
///
/// ## Notes
/// - The parser is single-pass and recovers from errors by synchronizing at statement/declaration boundaries.
/// - `semicolon_exempt` waives the next mandatory `;` once. It is set by the few call sites that place a
///   brace-terminated construct where a `;` is expected, and consumed by `expect_semicolon`.
/// - Blocks and sub-expressions that cannot end a statement (arguments, conditions, indices, parentheses) run
///   through `detached`, so a waiver raised inside them never reaches the enclosing statement.
pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    diagnostics: Vec<CompileError>,
    semicolon_exempt: bool,
    /// Parsing the iteration slot of a `for` header, whose `;` is already waived.
    in_for_iteration: bool,
    /// Returned for any lookahead past the end of `tokens`.
    eof: Token,
}

impl<'a> Parser<'a> {
    /// Create a new parser for a token stream.
    ///
    /// ## Parameters
    /// - `tokens`: Token stream produced by `cflat_syntax::lexer`. A missing trailing `Eof` is tolerated.
    pub fn new(tokens: &'a [Token]) -> Self {
        let eof = match tokens.last() {
            Some(last) => Token::new(
                TokenKind::Eof,
                "",
                last.pos,
                Span::new(last.span.end, last.span.end),
            ),
            None => Token::new(TokenKind::Eof, "", Position::new(1, 0), Span::default()),
        };
        Self {
            tokens,
            pos: 0,
            diagnostics: Vec::new(),
            semicolon_exempt: false,
            in_for_iteration: false,
            eof,
        }
    }

    /// Parse the entire token stream into a [`Program`].
    ///
    /// Each failed declaration records one error and triggers synchronization; parsing then resumes with the
    /// next declaration.
    pub fn parse(mut self) -> Parsed {
        let mut declarations = Vec::new();

        while !self.is_at_end() {
            let start = self.pos;
            match self.declaration() {
                Ok(decl) => declarations.push(decl),
                Err(e) => {
                    tracing::debug!(%e, "recovering from syntax error");
                    self.diagnostics.push(e);
                    // The abandoned construct may have left a waiver behind.
                    self.semicolon_exempt = false;
                    self.in_for_iteration = false;
                    if self.pos == start && self.at_sync_keyword() {
                        self.advance();
                    }
                    self.synchronize();
                }
            }
        }

        Parsed {
            program: Program { declarations },
            diagnostics: self.diagnostics,
        }
    }
}
