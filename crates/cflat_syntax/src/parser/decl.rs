/// Declaration parsing methods.
///
/// This chunk is responsible for parsing declarations: variables, arrays, enums,
/// classes/structs, and functions. Anything else falls through to statement parsing.
///
/// ## Notes
/// - Every entrypoint returns a [`Node<T>`] positioned at the first token of the construct.
/// - Error recovery is handled by `Parser::synchronize()` (in `helpers.rs`).
impl<'a> Parser<'a> {
    // ========================================================================
    // Declarations
    // ========================================================================

    fn declaration(&mut self) -> Result<Node<Declaration>, CompileError> {
        self.declaration_inner().map_err(|e| e.in_stage(ParseStage::Declaration))
    }

    fn declaration_inner(&mut self) -> Result<Node<Declaration>, CompileError> {
        let mark = self.mark();
        let decl = match self.peek().keyword_id() {
            Some(KeywordId::Var) => Declaration::Var(self.var_decl()?),
            Some(KeywordId::Array) => Declaration::Array(self.array_decl()?),
            Some(KeywordId::Enum) => Declaration::Enum(self.enum_decl()?),
            Some(KeywordId::Class) => Declaration::Class(self.class_decl()?),
            Some(KeywordId::Struct) => Declaration::Struct(self.struct_decl()?),
            Some(KeywordId::Fun) => Declaration::Function(self.function_decl()?),
            _ => return Ok(self.statement()?.map(Declaration::Stmt)),
        };
        Ok(self.finish(mark, decl))
    }

    /// `var name [: type] [= expr] ;`
    fn var_decl(&mut self) -> Result<VarDecl, CompileError> {
        self.expect_keyword(KeywordId::Var, "Expected `var`")?;
        let at = self.mark();
        let name = self.identifier("Expected a variable name after `var`")?;
        let ty = self.optional_type("Variable", &name, at)?;
        let init = if self.match_op(OperatorId::Eq) {
            Some(self.expression()?)
        } else {
            None
        };
        self.expect_semicolon("Expected `;` after variable declaration")?;
        Ok(VarDecl { name, ty, init })
    }

    /// `array name ["[" length "]"] [: type] [= { e, ... }] ;`
    fn array_decl(&mut self) -> Result<ArrayDecl, CompileError> {
        self.expect_keyword(KeywordId::Array, "Expected `array`")?;
        let at = self.mark();
        let name = self.identifier("Expected an array name")?;

        let mut length = ArrayDecl::UNSPECIFIED_LENGTH;
        if self.match_punct(PunctuationId::LBracket) {
            length = match self.peek().kind {
                TokenKind::Int(n) => {
                    self.advance();
                    n
                }
                _ => return Err(self.error_here("Array lengths must be whole integers")),
            };
            self.expect_punct(PunctuationId::RBracket, "Expected `]` after array length")?;
        }

        let ty = self.optional_type("Array", &name, at)?;
        let init = if self.match_op(OperatorId::Eq) {
            Some(self.array_initializer()?)
        } else {
            None
        };
        self.expect_semicolon("Expected `;` after array declaration")?;
        Ok(ArrayDecl { name, ty, length, init })
    }

    /// `{ e, ... }`. An empty list is allowed.
    fn array_initializer(&mut self) -> Result<Vec<Node<Expr>>, CompileError> {
        self.expect_punct(PunctuationId::LBrace, "Array initializers must start with `{`")?;
        let mut items = Vec::new();
        if self.match_punct(PunctuationId::RBrace) {
            return Ok(items);
        }
        loop {
            self.guard_list_end("Unterminated array initializer")?;
            items.push(self.inner_expression()?);
            if !self.match_punct(PunctuationId::Comma) {
                break;
            }
        }
        self.expect_punct(PunctuationId::RBrace, "Expected `}` after array initializer")?;
        Ok(items)
    }

    /// `enum Name { A, B: 5, C }`
    ///
    /// Implicit members count up from the previous member's value, starting at 0.
    fn enum_decl(&mut self) -> Result<EnumDecl, CompileError> {
        let kw = self.mark();
        self.expect_keyword(KeywordId::Enum, "Expected `enum`")?;
        let name = self.identifier("Expected an enum name")?;
        self.expect_punct(PunctuationId::LBrace, "Expected `{` after enum name")?;

        let mut members = Vec::new();
        let mut next = 0i64;
        while !self.check_punct(PunctuationId::RBrace) {
            if self.is_at_end() {
                return Err(self.error_here("Unterminated enum"));
            }
            let member = self.identifier("Expected an enum member")?;
            let value = if self.match_punct(PunctuationId::Colon) {
                self.enum_value()?
            } else {
                next
            };
            next = value.wrapping_add(1);
            members.push(EnumMember { name: member, value });
            if !self.match_punct(PunctuationId::Comma) && !self.check_punct(PunctuationId::RBrace) {
                return Err(self.error_here("Expected `,` or `}` after enum member"));
            }
        }
        self.advance();

        if members.is_empty() {
            let span = Span::new(kw.start, self.prev_end());
            self.warn(CompileError::warning(format!("Empty enum `{name}`"), kw.pos, span));
        }
        Ok(EnumDecl { name, members })
    }

    /// `[-]integer`
    fn enum_value(&mut self) -> Result<i64, CompileError> {
        let negative = self.match_op(OperatorId::Minus);
        match self.peek().kind {
            TokenKind::Int(n) => {
                self.advance();
                Ok(if negative { n.wrapping_neg() } else { n })
            }
            _ => Err(self.error_here("Enum values must be integers")),
        }
    }

    /// `class Name [: Base | : (A, B)] { declarations }`
    fn class_decl(&mut self) -> Result<ClassDecl, CompileError> {
        self.expect_keyword(KeywordId::Class, "Expected `class`")?;
        let name = self.identifier("Expected a class name")?;

        let mut inherits = Vec::new();
        if self.match_punct(PunctuationId::Colon) {
            if self.match_punct(PunctuationId::LParen) {
                loop {
                    inherits.push(self.identifier("Expected a class to inherit from")?);
                    if !self.match_punct(PunctuationId::Comma) {
                        break;
                    }
                }
                self.expect_punct(PunctuationId::RParen, "Expected `)` after inheritance list")?;
            } else {
                inherits.push(self.identifier("Expected a class to inherit from")?);
            }
        }

        let members = self.declaration_block("classes")?;
        Ok(ClassDecl { name, inherits, members })
    }

    /// `struct Name { declarations }`
    fn struct_decl(&mut self) -> Result<StructDecl, CompileError> {
        self.expect_keyword(KeywordId::Struct, "Expected `struct`")?;
        let name = self.identifier("Expected a struct name")?;
        let members = self.declaration_block("structs")?;
        Ok(StructDecl { name, members })
    }

    /// `{ declaration* }` body of a class or struct.
    fn declaration_block(&mut self, owner: &str) -> Result<Vec<Node<Declaration>>, CompileError> {
        let msg = format!("The bodies of {owner} must be braced");
        self.expect_punct(PunctuationId::LBrace, &msg)?;
        let members = self.detached(|p| {
            let mut members = Vec::new();
            while !p.check_punct(PunctuationId::RBrace) && !p.is_at_end() {
                members.push(p.declaration()?);
            }
            Ok(members)
        })?;
        self.expect_punct(PunctuationId::RBrace, &msg)?;
        Ok(members)
    }

    /// `fun name (params) [: type] { body }`
    fn function_decl(&mut self) -> Result<FunctionDecl, CompileError> {
        self.expect_keyword(KeywordId::Fun, "Expected `fun`")?;
        let at = self.mark();
        let name = self.identifier("Expected a function name")?;
        let params = self.params(&name)?;
        let return_type = self.optional_type("Return type of function", &name, at)?;
        if !self.check_punct(PunctuationId::LBrace) {
            return Err(self.error_here("Function bodies must be braced"));
        }
        let body = Box::new(self.statement()?);
        Ok(FunctionDecl {
            name,
            params,
            return_type,
            body,
        })
    }

    /// `( [!] name : type [, name : type]* )`
    ///
    /// Shared by functions and lambdas. Comma mistakes and an unmarked empty list are warnings.
    fn params(&mut self, owner: &str) -> Result<Vec<Param>, CompileError> {
        let open = self.mark();
        self.expect_punct(
            PunctuationId::LParen,
            &format!("The parameter list of `{owner}` must be enclosed in parentheses"),
        )?;

        let mut params = Vec::new();
        let mut expect_comma = false;
        let mut allow_empty = false;
        loop {
            let tok = self.peek();
            let (pos, span) = (tok.pos, tok.span);
            match &tok.kind {
                TokenKind::Ident(_) => {
                    if expect_comma {
                        self.warn(CompileError::warning(
                            format!("Expected a comma between parameters of `{owner}`"),
                            pos,
                            span,
                        ));
                    }
                    expect_comma = true;
                    let name = self.identifier("Expected a parameter")?;
                    self.expect_punct(
                        PunctuationId::Colon,
                        "A parameter must be an identifier followed by a colon and a type name",
                    )?;
                    let ty = TypeRef::Named(self.identifier("Expected a type name after `:` in parameter list")?);
                    params.push(Param { name, ty });
                }
                TokenKind::Punctuation(PunctuationId::RParen) => {
                    self.advance();
                    break;
                }
                TokenKind::Punctuation(PunctuationId::Comma) => {
                    if !expect_comma {
                        self.warn(CompileError::warning(
                            format!("Unexpected comma in parameter list of `{owner}`"),
                            pos,
                            span,
                        ));
                    }
                    expect_comma = false;
                    self.advance();
                }
                TokenKind::Operator(OperatorId::Bang) => {
                    allow_empty = true;
                    self.advance();
                }
                _ => return Err(self.error_here("Invalid parameter list")),
            }
        }

        if params.is_empty() && !allow_empty {
            let span = Span::new(open.start, self.prev_end());
            self.warn(
                CompileError::warning(format!("Empty parameter list for `{owner}`"), open.pos, span)
                    .with_hint(format!("mark the list as intentionally empty: `{owner}(!)`")),
            );
        }
        Ok(params)
    }

    /// `[: type]`. A missing annotation yields [`TypeRef::Infer`] and a warning at `at`.
    fn optional_type(&mut self, what: &str, name: &str, at: Mark) -> Result<TypeRef, CompileError> {
        if self.match_punct(PunctuationId::Colon) {
            return Ok(TypeRef::Named(
                self.identifier("A colon must be followed by a type identifier")?,
            ));
        }
        let span = Span::new(at.start, self.prev_end());
        self.warn(errors::inferred_type(what, name, at.pos, span));
        Ok(TypeRef::Infer)
    }
}
