/// Token-stream helpers and error recovery.
///
/// This chunk contains the low-level primitives used throughout parsing:
/// - Peeking/consuming tokens (`peek`, `advance`)
/// - Matching / expecting keywords, operators, and punctuation
/// - The one-shot semicolon waiver (`set_semicolon_exempt`, `expect_semicolon`)
/// - Error recovery (`synchronize`)
///
/// Most functions in this file are internal (`fn`) and are documented primarily
/// to aid maintenance and onboarding.
impl<'a> Parser<'a> {
    // ========================================================================
    // Helpers
    // ========================================================================

    /// Return `true` if the current token is [`TokenKind::Eof`].
    fn is_at_end(&self) -> bool {
        self.peek().kind.is_eof()
    }

    /// Return the current token without consuming it.
    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&self.eof)
    }

    /// Return the token after the current token without consuming it.
    fn peek_next(&self) -> &Token {
        self.tokens.get(self.pos + 1).unwrap_or(&self.eof)
    }

    /// Advance to the next token and return the token we just consumed.
    ///
    /// Never moves past `Eof`.
    fn advance(&mut self) -> &Token {
        if self.is_at_end() {
            return self.peek();
        }
        self.pos += 1;
        &self.tokens[self.pos - 1]
    }

    /// Return `true` if the current token is the given keyword.
    fn check_keyword(&self, id: KeywordId) -> bool {
        self.peek().kind.is_keyword(id)
    }

    /// Return `true` if the current token is the given punctuation.
    fn check_punct(&self, id: PunctuationId) -> bool {
        self.peek().kind.is_punctuation(id)
    }

    /// Return `true` if the current token is the given operator.
    fn check_op(&self, id: OperatorId) -> bool {
        self.peek().kind.is_operator(id)
    }

    fn match_keyword(&mut self, id: KeywordId) -> bool {
        if self.check_keyword(id) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn match_punct(&mut self, id: PunctuationId) -> bool {
        if self.check_punct(id) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn match_op(&mut self, id: OperatorId) -> bool {
        if self.check_op(id) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_keyword(&mut self, id: KeywordId, msg: &str) -> Result<&Token, CompileError> {
        if self.check_keyword(id) {
            Ok(self.advance())
        } else {
            Err(self.error_here(msg))
        }
    }

    fn expect_punct(&mut self, id: PunctuationId, msg: &str) -> Result<&Token, CompileError> {
        if self.check_punct(id) {
            Ok(self.advance())
        } else {
            Err(self.error_here(msg))
        }
    }

    /// Build a syntax error at the current token.
    ///
    /// An unrecognized character is reported as such, whatever the caller expected.
    fn error_here(&self, msg: &str) -> CompileError {
        let tok = self.peek();
        match tok.kind {
            TokenKind::Unrecognized(c) => errors::unrecognized_token(c, tok.pos, tok.span),
            _ => CompileError::syntax(format!("{}, found {}", msg, tok.kind), tok.pos, tok.span),
        }
    }

    /// Record a warning. Warnings never interrupt parsing.
    fn warn(&mut self, warning: CompileError) {
        tracing::debug!(%warning, "parse warning");
        self.diagnostics.push(warning);
    }

    /// Fail with `msg` when the current token is `Eof` or a stray `;` inside a delimited list.
    fn guard_list_end(&self, msg: &str) -> Result<(), CompileError> {
        if self.is_at_end() || self.check_punct(PunctuationId::Semicolon) {
            let tok = self.peek();
            return Err(CompileError::syntax(msg.to_string(), tok.pos, tok.span));
        }
        Ok(())
    }

    // ========================================================================
    // Positions
    // ========================================================================

    /// Remember where the construct starting at the current token begins.
    fn mark(&self) -> Mark {
        let tok = self.peek();
        Mark {
            pos: tok.pos,
            start: tok.span.start,
        }
    }

    /// Byte offset just past the last consumed token.
    fn prev_end(&self) -> usize {
        match self.pos.checked_sub(1).and_then(|i| self.tokens.get(i)) {
            Some(tok) => tok.span.end,
            None => self.peek().span.start,
        }
    }

    /// Wrap `kind` in a node spanning from `mark` to the last consumed token.
    fn finish<T>(&self, mark: Mark, kind: T) -> Node<T> {
        let end = self.prev_end().max(mark.start);
        Node::new(kind, mark.pos, Span::new(mark.start, end))
    }

    // ========================================================================
    // Semicolon waiver
    // ========================================================================

    /// Waive the next mandatory `;`.
    fn set_semicolon_exempt(&mut self) {
        if self.semicolon_exempt {
            tracing::error!(pos = %self.peek().pos, "semicolon waiver set twice");
            debug_assert!(false, "semicolon waiver set twice");
        }
        self.semicolon_exempt = true;
    }

    fn clear_semicolon_exempt(&mut self) {
        if !self.semicolon_exempt {
            tracing::error!(pos = %self.peek().pos, "semicolon waiver cleared while unset");
            debug_assert!(false, "semicolon waiver cleared while unset");
        }
        self.semicolon_exempt = false;
    }

    /// Run `parse` with the waiver state put aside, then restore it.
    ///
    /// Whatever `parse` leaves behind is dropped: a waiver raised inside a block, an argument list or a
    /// condition belongs to that inner construct, not to the statement around it.
    fn detached<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<T, CompileError>,
    ) -> Result<T, CompileError> {
        let exempt = std::mem::take(&mut self.semicolon_exempt);
        let in_for_iteration = std::mem::take(&mut self.in_for_iteration);
        let result = parse(self);
        self.semicolon_exempt = exempt;
        self.in_for_iteration = in_for_iteration;
        result
    }

    /// An expression that cannot end the statement it appears in.
    fn inner_expression(&mut self) -> Result<Node<Expr>, CompileError> {
        self.detached(|p| p.expression())
    }

    /// Expect the `;` that ends a simple statement, unless a waiver is pending.
    ///
    /// A pending waiver is consumed here; a `;` that happens to follow is eaten as well.
    fn expect_semicolon(&mut self, msg: &str) -> Result<(), CompileError> {
        if self.semicolon_exempt {
            self.clear_semicolon_exempt();
            self.match_punct(PunctuationId::Semicolon);
            return Ok(());
        }
        self.expect_punct(PunctuationId::Semicolon, msg)?;
        Ok(())
    }

    // ========================================================================
    // Recovery
    // ========================================================================

    /// Keywords that begin a new statement or declaration.
    fn at_sync_keyword(&self) -> bool {
        matches!(
            self.peek().keyword_id(),
            Some(
                KeywordId::If
                    | KeywordId::While
                    | KeywordId::For
                    | KeywordId::Foreach
                    | KeywordId::Do
                    | KeywordId::Class
                    | KeywordId::Struct
                    | KeywordId::Var
                    | KeywordId::Fun
                    | KeywordId::Enum
                    | KeywordId::Switch
                    | KeywordId::Else
                    | KeywordId::Throw
                    | KeywordId::Try
                    | KeywordId::Catch
            )
        )
    }

    /// Skip tokens until a statement boundary.
    ///
    /// Stops after a `;` or `}`, or before a keyword that starts a statement or declaration.
    /// Unrecognized characters dropped on the way are still reported, once each.
    fn synchronize(&mut self) {
        while !self.is_at_end() {
            if self.at_sync_keyword() {
                return;
            }
            let tok = self.peek();
            if let TokenKind::Unrecognized(c) = tok.kind {
                let reported = self.diagnostics.last().is_some_and(|d| d.span == tok.span);
                if !reported {
                    let err = errors::unrecognized_token(c, tok.pos, tok.span);
                    self.diagnostics.push(err);
                }
            }
            let boundary = self.check_punct(PunctuationId::Semicolon) || self.check_punct(PunctuationId::RBrace);
            self.advance();
            if boundary {
                return;
            }
        }
    }
}
