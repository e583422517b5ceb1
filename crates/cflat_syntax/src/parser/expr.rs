/// Expression parsing methods.
///
/// Layers, loosest first: lambda, ternary, the binary levels of the operator registry, unary `~`/`-`,
/// logical `!`, `++`/`--`, identifier postfix forms (index, scope, call), and primaries.
///
/// ## Notes
/// - Binary levels come from `cflat_core::lang::operators`; level `0` binds loosest.
/// - Every level is left-associative, `**` included.
impl<'a> Parser<'a> {
    // ========================================================================
    // Expressions
    // ========================================================================

    fn expression(&mut self) -> Result<Node<Expr>, CompileError> {
        self.lambda().map_err(|e| e.in_stage(ParseStage::Expression))
    }

    /// `lambda (params) [: type] body`
    ///
    /// A lambda whose body is a block waives the `;` of the statement it ends.
    fn lambda(&mut self) -> Result<Node<Expr>, CompileError> {
        if !self.check_keyword(KeywordId::Lambda) {
            return self.ternary();
        }
        let mark = self.mark();
        self.advance();
        let params = self.params("lambda")?;
        let return_type = self.optional_type("Return type of", "lambda", mark)?;
        let body = self.statement()?;
        if body.kind.is_block() && !self.in_for_iteration {
            self.set_semicolon_exempt();
        }
        Ok(self.finish(
            mark,
            Expr::Lambda(LambdaExpr {
                params,
                return_type,
                body: Box::new(body),
            }),
        ))
    }

    /// `cond ? a : b`, where every part is a binary-level expression.
    fn ternary(&mut self) -> Result<Node<Expr>, CompileError> {
        let mark = self.mark();
        let predicate = self.binary(0)?;
        if !self.match_punct(PunctuationId::Question) {
            return Ok(predicate);
        }
        let consequent = self.binary(0)?;
        self.expect_punct(
            PunctuationId::Colon,
            "Ternaries require alternate expressions of the form pred ? cons : alt",
        )?;
        let alternate = self.binary(0)?;
        Ok(self.finish(
            mark,
            Expr::Ternary(Box::new(predicate), Box::new(consequent), Box::new(alternate)),
        ))
    }

    /// Precedence climbing over the registry's binary levels.
    fn binary(&mut self, level: u8) -> Result<Node<Expr>, CompileError> {
        if level >= operators::BINARY_LEVELS {
            return self.unary();
        }
        let mut lhs = self.binary(level + 1)?;
        while let Some(op) = self.binary_op_at(level) {
            self.advance();
            let rhs = self.binary(level + 1)?;
            let span = lhs.span.merge(rhs.span);
            let pos = lhs.pos;
            lhs = Node::new(Expr::Binary(Box::new(lhs), op, Box::new(rhs)), pos, span);
        }
        Ok(lhs)
    }

    /// The current token as a binary operator of exactly `level`.
    fn binary_op_at(&self, level: u8) -> Option<BinaryOp> {
        let id = self.peek().operator_id()?;
        if operators::binary_level(id) != Some(level) {
            return None;
        }
        BinaryOp::from_operator(id)
    }

    /// `~e` and `-e`
    fn unary(&mut self) -> Result<Node<Expr>, CompileError> {
        let mark = self.mark();
        let op = if self.match_op(OperatorId::Tilde) {
            UnaryOp::BitNot
        } else if self.match_op(OperatorId::Minus) {
            UnaryOp::Negate
        } else {
            return self.logical_not();
        };
        let operand = self.unary()?;
        Ok(self.finish(mark, Expr::Unary(op, Box::new(operand))))
    }

    /// `!e`
    fn logical_not(&mut self) -> Result<Node<Expr>, CompileError> {
        let mark = self.mark();
        if !self.match_op(OperatorId::Bang) {
            return self.inc_dec();
        }
        let operand = self.logical_not()?;
        Ok(self.finish(mark, Expr::Unary(UnaryOp::Not, Box::new(operand))))
    }

    /// `++e`, `--e`, `e++`, `e--`
    fn inc_dec(&mut self) -> Result<Node<Expr>, CompileError> {
        let mark = self.mark();
        if let Some(delta) = self.inc_dec_op() {
            let delta = self.finish(mark, Expr::Int(delta));
            let target = self.call()?;
            return Ok(self.modify(mark, target, delta, false));
        }

        let target = self.call()?;
        let op_mark = self.mark();
        match self.inc_dec_op() {
            Some(delta) => {
                let delta = self.finish(op_mark, Expr::Int(delta));
                Ok(self.modify(mark, target, delta, true))
            }
            None => Ok(target),
        }
    }

    /// Consume `++`/`--` and return the signed delta.
    fn inc_dec_op(&mut self) -> Option<i64> {
        if self.match_op(OperatorId::PlusPlus) {
            Some(1)
        } else if self.match_op(OperatorId::MinusMinus) {
            Some(-1)
        } else {
            None
        }
    }

    fn modify(&self, mark: Mark, target: Node<Expr>, delta: Node<Expr>, return_previous: bool) -> Node<Expr> {
        self.finish(
            mark,
            Expr::Modify(ModifyExpr {
                target: Box::new(target),
                delta: Box::new(delta),
                return_previous,
            }),
        )
    }

    /// `name[index]`, `name.expr`, `name(args)` or a plain variable.
    fn call(&mut self) -> Result<Node<Expr>, CompileError> {
        let name = match &self.peek().kind {
            TokenKind::Ident(name) => name.clone(),
            _ => return self.primary(),
        };
        let mark = self.mark();
        self.advance();

        let expr = if self.match_punct(PunctuationId::LBracket) {
            let index = self.inner_expression()?;
            self.expect_punct(PunctuationId::RBracket, "List accesses require a closing `]`")?;
            Expr::ListAccess(name, Box::new(index))
        } else if self.match_punct(PunctuationId::Dot) {
            let inner = self.expression()?;
            Expr::ScopeOf(name, Box::new(inner))
        } else if self.match_punct(PunctuationId::LParen) {
            let args = self.arguments("Invalid function call. Argument list is not terminated")?;
            Expr::Call(name, args)
        } else {
            Expr::Variable(name)
        };
        Ok(self.finish(mark, expr))
    }

    fn primary(&mut self) -> Result<Node<Expr>, CompileError> {
        let mark = self.mark();
        let expr = match &self.peek().kind {
            TokenKind::Int(n) => Expr::Int(*n),
            TokenKind::Float(x) => Expr::Float(*x),
            TokenKind::String(s) => Expr::Str(s.clone()),
            TokenKind::Char(c) => Expr::Char(*c),
            TokenKind::Keyword(KeywordId::True) => Expr::Bool(true),
            TokenKind::Keyword(KeywordId::False) => Expr::Bool(false),
            TokenKind::Punctuation(PunctuationId::LParen) => {
                self.advance();
                let inner = self.inner_expression()?;
                self.expect_punct(PunctuationId::RParen, "Unterminated parenthetical")?;
                return Ok(inner);
            }
            _ => {
                return Err(self.error_here(
                    "Unexpected token. Expected one of integer, float, string literal, \
                     parenthetical expression, boolean, or identifier",
                ));
            }
        };
        self.advance();
        Ok(self.finish(mark, expr))
    }
}
