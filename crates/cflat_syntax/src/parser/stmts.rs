/// Statement parsing methods.
///
/// This chunk parses statement forms (e.g. `if`, `while`, `for`, `switch`, `return`, assignments)
/// as well as brace-delimited blocks.
///
/// ## Notes
/// - Statements end with `;` unless they end with a block. `expect_semicolon` honours the one-shot waiver.
/// - Conditionals of `if`/`while`/`do`/`for` are checked for a boolean shape while parsing.
impl<'a> Parser<'a> {
    // ========================================================================
    // Statements
    // ========================================================================

    /// `{ declaration* }`
    ///
    /// A pending semicolon waiver does not apply inside the block; it is restored once the block closes.
    fn block(&mut self) -> Result<Node<Statement>, CompileError> {
        let mark = self.mark();
        self.expect_punct(PunctuationId::LBrace, "Expected `{`")?;
        let body = self.detached(|p| {
            let mut body = Vec::new();
            while !p.check_punct(PunctuationId::RBrace) {
                if p.is_at_end() {
                    return Err(p.error_here("Unterminated block. Did you forget a closing `}`?"));
                }
                body.push(p.declaration()?);
            }
            Ok(body)
        })?;
        self.advance();
        Ok(self.finish(mark, Statement::Block(body)))
    }

    fn statement(&mut self) -> Result<Node<Statement>, CompileError> {
        self.statement_inner().map_err(|e| e.in_stage(ParseStage::Statement))
    }

    fn statement_inner(&mut self) -> Result<Node<Statement>, CompileError> {
        if self.check_punct(PunctuationId::LBrace) {
            return self.block();
        }

        let mark = self.mark();
        let stmt = match self.peek().keyword_id() {
            Some(KeywordId::If) => self.if_stmt()?,
            Some(KeywordId::While) => self.while_stmt()?,
            Some(KeywordId::Do) => self.do_while_stmt()?,
            Some(KeywordId::For) => self.for_stmt()?,
            Some(KeywordId::Foreach) => self.foreach_stmt()?,
            Some(KeywordId::Switch) => self.switch_stmt()?,
            Some(KeywordId::Try) => self.try_stmt()?,
            Some(KeywordId::Throw) => self.throw_stmt()?,
            Some(KeywordId::Return) => self.return_stmt()?,
            Some(KeywordId::Goto) => {
                self.advance();
                let label = self.identifier("Goto statements must be followed by a label")?;
                self.expect_semicolon("Statements must end with `;`")?;
                Statement::Goto(label)
            }
            Some(KeywordId::Break) => {
                self.advance();
                self.expect_semicolon("Statements must end with `;`")?;
                Statement::Break
            }
            Some(KeywordId::Continue) => {
                self.advance();
                self.expect_semicolon("Statements must end with `;`")?;
                Statement::Continue
            }
            _ if self.at_label() => {
                let label = self.identifier("Expected a label")?;
                self.advance();
                Statement::Label(label)
            }
            _ => self.expr_or_assignment()?,
        };
        Ok(self.finish(mark, stmt))
    }

    /// `name :` at statement start.
    fn at_label(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Ident(_)) && self.peek_next().kind.is_punctuation(PunctuationId::Colon)
    }

    /// `expr ;` or `target OP value ;`. Compound operators are desugared here.
    fn expr_or_assignment(&mut self) -> Result<Statement, CompileError> {
        let target = self.expression()?;
        let assign_op = self.peek().operator_id().filter(|op| operators::is_assignment(*op));
        let Some(op) = assign_op else {
            self.expect_semicolon("Statements must end with `;`")?;
            return Ok(Statement::Expr(target.kind));
        };
        // A block lambda on the left of `=` does not end the statement.
        if self.semicolon_exempt && !self.in_for_iteration {
            self.clear_semicolon_exempt();
        }

        self.advance();
        let rhs = self.expression()?;
        let value = match operators::compound_base(op).and_then(BinaryOp::from_operator) {
            Some(bin) => {
                let span = target.span.merge(rhs.span);
                let lhs = Box::new(target.clone());
                Node::new(Expr::Binary(lhs, bin, Box::new(rhs)), target.pos, span)
            }
            None => rhs,
        };
        self.expect_semicolon("Statements must end with `;`")?;
        Ok(Statement::Assignment(AssignmentStmt { target, value }))
    }

    /// Warn when a control-flow body is a single statement rather than a block.
    fn check_braced(&mut self, construct: &str, body: &Node<Statement>) {
        if !body.kind.is_block() {
            self.warn(errors::unbraced_body(construct, body.pos, body.span));
        }
    }

    /// Parse a conditional and check that it has a boolean shape.
    fn conditional(&mut self, construct: &str) -> Result<Node<Expr>, CompileError> {
        let cond = self.inner_expression()?;
        match &cond.kind {
            Expr::Binary(_, op, _) if op.is_boolean() => {}
            Expr::Unary(UnaryOp::Not, _) => {}
            Expr::Bool(value) => {
                self.warn(errors::constant_conditional(construct, &value.to_string(), cond.pos, cond.span));
            }
            kind if kind.is_literal() => {
                let value = format!("the constant {}", kind.describe());
                self.warn(errors::constant_conditional(construct, &value, cond.pos, cond.span));
            }
            kind => {
                return Err(errors::bad_conditional(construct, kind.describe(), cond.pos, cond.span));
            }
        }
        Ok(cond)
    }

    /// `( conditional )`
    fn paren_conditional(&mut self, construct: &str) -> Result<Node<Expr>, CompileError> {
        self.expect_punct(
            PunctuationId::LParen,
            &format!("Each {construct} statement must contain a conditional enclosed in parentheses"),
        )?;
        let cond = self.conditional(construct)?;
        self.expect_punct(PunctuationId::RParen, &format!("Expected `)` after {construct} conditional"))?;
        Ok(cond)
    }

    fn if_stmt(&mut self) -> Result<Statement, CompileError> {
        self.advance();
        let condition = self.paren_conditional("if")?;
        let then_branch = self.statement()?;
        self.check_braced("If", &then_branch);

        let else_branch = if self.match_keyword(KeywordId::Else) {
            let alt = self.statement()?;
            self.check_braced("Else", &alt);
            Some(Box::new(alt))
        } else {
            None
        };

        Ok(Statement::If(IfStmt {
            condition,
            then_branch: Box::new(then_branch),
            else_branch,
        }))
    }

    fn while_stmt(&mut self) -> Result<Statement, CompileError> {
        self.advance();
        let condition = self.paren_conditional("while")?;
        let body = self.statement()?;
        self.check_braced("While loop", &body);
        Ok(Statement::While(WhileStmt {
            condition,
            body: Box::new(body),
        }))
    }

    /// `do body while (cond);`
    fn do_while_stmt(&mut self) -> Result<Statement, CompileError> {
        self.advance();
        let body = self.statement()?;
        self.expect_keyword(KeywordId::While, "Expected `while` after do body")?;
        let condition = self.paren_conditional("do-while")?;
        self.check_braced("Do-while loop", &body);
        self.expect_semicolon("Expected `;` after do-while conditional")?;
        Ok(Statement::DoWhile(WhileStmt {
            condition,
            body: Box::new(body),
        }))
    }

    /// `for ([init]; [cond]; [iteration]) body`
    ///
    /// The iteration slot is a statement whose own closing `;` is waived.
    fn for_stmt(&mut self) -> Result<Statement, CompileError> {
        self.advance();
        self.expect_punct(PunctuationId::LParen, "Expected `(` after `for`")?;

        let init = if self.match_punct(PunctuationId::Semicolon) {
            None
        } else {
            let decl = self.declaration()?;
            if self.prev_is_rbrace() {
                self.set_semicolon_exempt();
                self.expect_semicolon("Expected `;` after for loop initializer")?;
            }
            Some(Box::new(decl))
        };

        let condition = if self.match_punct(PunctuationId::Semicolon) {
            None
        } else {
            let cond = self.conditional("for")?;
            self.expect_punct(PunctuationId::Semicolon, "For loop conditionals must end with `;`")?;
            Some(cond)
        };

        let iteration = if self.check_punct(PunctuationId::RParen) {
            None
        } else if self.starts_braced_statement() {
            Some(Box::new(self.statement()?))
        } else {
            self.set_semicolon_exempt();
            self.in_for_iteration = true;
            let stmt = self.statement();
            self.in_for_iteration = false;
            let stmt = stmt?;
            // A trailing label has no terminator to consume the waiver.
            if self.semicolon_exempt {
                self.clear_semicolon_exempt();
            }
            Some(Box::new(stmt))
        };

        self.expect_punct(PunctuationId::RParen, "Expected `)` to close the for loop header")?;
        let body = self.statement()?;
        self.check_braced("For loop", &body);

        Ok(Statement::For(ForStmt {
            init,
            condition,
            iteration,
            body: Box::new(body),
        }))
    }

    /// The last consumed token is a `}`.
    fn prev_is_rbrace(&self) -> bool {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .is_some_and(|tok| tok.kind.is_punctuation(PunctuationId::RBrace))
    }

    /// Statements that end with a block and never demand a `;`.
    fn starts_braced_statement(&self) -> bool {
        self.check_punct(PunctuationId::LBrace)
            || matches!(
                self.peek().keyword_id(),
                Some(
                    KeywordId::If
                        | KeywordId::While
                        | KeywordId::For
                        | KeywordId::Foreach
                        | KeywordId::Switch
                        | KeywordId::Try
                )
            )
    }

    /// `foreach (item : collection) body`
    fn foreach_stmt(&mut self) -> Result<Statement, CompileError> {
        self.advance();
        self.expect_punct(PunctuationId::LParen, "Expected `(` after `foreach`")?;
        let item = self.identifier("Expected the iteration variable of a foreach loop")?;
        self.expect_punct(PunctuationId::Colon, "Expected `:` after the foreach iteration variable")?;
        let collection = self.identifier("Expected the collection of a foreach loop")?;
        self.expect_punct(PunctuationId::RParen, "Expected `)` to close the foreach header")?;
        let body = self.statement()?;
        self.check_braced("Foreach loop", &body);
        Ok(Statement::ForEach(ForEachStmt {
            item,
            collection,
            body: Box::new(body),
        }))
    }

    /// `switch (expr) { case pattern: statement ... default: statement }`
    fn switch_stmt(&mut self) -> Result<Statement, CompileError> {
        self.advance();
        self.expect_punct(PunctuationId::LParen, "Switch statements must be followed by the expression to switch on")?;
        let scrutinee = self.inner_expression()?;
        self.expect_punct(PunctuationId::RParen, "Unclosed expression in switch")?;
        self.expect_punct(PunctuationId::LBrace, "Switch statements must be followed by a switch block")?;

        let mut cases = Vec::new();
        while !self.check_punct(PunctuationId::RBrace) {
            if self.is_at_end() {
                return Err(self.error_here("Unterminated switch block. Did you forget a closing `}`?"));
            }
            let pattern = self.switch_pattern()?;
            let body = self.statement()?;
            cases.push(SwitchCase { pattern, body });
        }
        self.advance();

        Ok(Statement::Switch(SwitchStmt { scrutinee, cases }))
    }

    /// `case pattern :` or `default :`. `default` is stored as the pattern `true`.
    fn switch_pattern(&mut self) -> Result<Node<Expr>, CompileError> {
        let mark = self.mark();
        if self.match_keyword(KeywordId::Default) {
            let pattern = self.finish(mark, Expr::Bool(true));
            self.expect_punct(PunctuationId::Colon, "`default` must be followed by a colon")?;
            return Ok(pattern);
        }

        self.expect_keyword(KeywordId::Case, "Switch blocks accept only `case` and `default` arms")?;
        let pattern = self.inner_expression()?;
        self.expect_punct(PunctuationId::Colon, "Case patterns must be followed by a colon")?;
        match pattern.kind {
            Expr::Bool(_) | Expr::Int(_) | Expr::Str(_) | Expr::Char(_) | Expr::Variable(_) => Ok(pattern),
            _ => Err(CompileError::syntax(
                format!("Invalid switch case pattern: {}", pattern.kind.describe()),
                pattern.pos,
                pattern.span,
            )
            .with_hint("switch accepts booleans, integers, strings, characters and enum members only")),
        }
    }

    /// `try { } catch (name [: type]) { }`
    fn try_stmt(&mut self) -> Result<Statement, CompileError> {
        self.advance();
        let body = self.block()?;
        self.expect_keyword(KeywordId::Catch, "Try block must be followed by a catch block")?;
        self.expect_punct(PunctuationId::LParen, "`catch` must be followed by the exception to catch")?;
        let at = self.mark();
        let catch_name = self.identifier("Expected an exception name in catch")?;
        let catch_type = self.optional_type("Exception", &catch_name, at)?;
        self.expect_punct(PunctuationId::RParen, "Expected `)` after the caught exception")?;
        let catch_body = self.block()?;
        Ok(Statement::Try(TryStmt {
            body: Box::new(body),
            catch_name,
            catch_type,
            catch_body: Box::new(catch_body),
        }))
    }

    /// `throw Name(args);`
    fn throw_stmt(&mut self) -> Result<Statement, CompileError> {
        self.advance();
        let exception = self.identifier("Expected an exception to throw")?;
        self.expect_punct(PunctuationId::LParen, "Exceptions must have argument lists enclosed in parentheses")?;
        let args = self.arguments("Invalid exception. Argument list is not terminated")?;
        self.expect_semicolon("Statements must end with `;`")?;
        Ok(Statement::Throw(ThrowStmt { exception, args }))
    }

    /// `return [expr];`
    fn return_stmt(&mut self) -> Result<Statement, CompileError> {
        self.advance();
        let value = if self.check_punct(PunctuationId::Semicolon) {
            None
        } else {
            Some(self.expression()?)
        };
        self.expect_semicolon("Statements must end with `;`")?;
        Ok(Statement::Return(ReturnStmt { value }))
    }
}
