/// Miscellaneous parser utilities.
///
/// This chunk contains small shared parsing helpers that don’t cleanly fit into
/// “decl”, “stmt”, or “expr” (identifier parsing and argument lists).
impl<'a> Parser<'a> {
    // ========================================================================
    // Utilities
    // ========================================================================

    fn identifier(&mut self, msg: &str) -> Result<Ident, CompileError> {
        match &self.peek().kind {
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            _ => Err(self.error_here(msg)),
        }
    }

    /// Comma-separated expressions up to and including the closing `)`.
    ///
    /// The opening `(` has already been consumed. Reaching `;` or end of file first fails with `msg`.
    fn arguments(&mut self, msg: &str) -> Result<Vec<Node<Expr>>, CompileError> {
        let mut args = Vec::new();
        while !self.check_punct(PunctuationId::RParen) {
            if self.match_punct(PunctuationId::Comma) {
                continue;
            }
            self.guard_list_end(msg)?;
            args.push(self.inner_expression()?);
        }
        self.advance();
        Ok(args)
    }
}
