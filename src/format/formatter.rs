//! Core formatting logic for C-Flat source code
//!
//! Walks the AST and emits source that parses back to the same tree shape.

use cflat_syntax::ast::*;

use super::config::FormatConfig;
use super::writer::FormatWriter;

/// Formatter that transforms AST back to formatted source code
pub struct Formatter {
    writer: FormatWriter,
    blank_lines_top_level: usize,
    /// The next statement terminator is left out (the iteration slot of a `for` header).
    suppress_semicolon: bool,
}

impl Formatter {
    /// Create a new formatter with the given config
    pub fn new(config: FormatConfig) -> Self {
        Self {
            writer: FormatWriter::new(&config),
            blank_lines_top_level: config.blank_lines_top_level,
            suppress_semicolon: false,
        }
    }

    /// Format a program and return the formatted source
    pub fn format(mut self, program: &Program) -> String {
        self.format_program(program);
        self.writer.finish()
    }

    // ========================================================================
    // Program
    // ========================================================================

    fn format_program(&mut self, program: &Program) {
        for (i, decl) in program.declarations.iter().enumerate() {
            if i > 0 {
                self.writer.blank_lines(self.blank_lines_top_level);
            }
            self.format_declaration(&decl.kind);
            self.writer.newline();
        }
    }

    /// Write `;` unless the waiver is pending, consuming the waiver.
    fn terminate(&mut self) {
        if !std::mem::take(&mut self.suppress_semicolon) {
            self.writer.write(";");
        }
    }

    /// `{ items }`. A pending waiver does not reach inside the braces.
    fn format_block(&mut self, items: &[Node<Declaration>]) {
        if items.is_empty() {
            self.writer.write("{}");
            return;
        }
        let saved = std::mem::take(&mut self.suppress_semicolon);
        self.writer.writeln("{");
        self.writer.indent();
        for item in items {
            self.format_declaration(&item.kind);
            self.writer.newline();
        }
        self.writer.dedent();
        self.writer.write("}");
        self.suppress_semicolon = saved;
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    fn format_declaration(&mut self, decl: &Declaration) {
        match decl {
            Declaration::Var(var) => self.format_var(var),
            Declaration::Array(array) => self.format_array(array),
            Declaration::Enum(en) => self.format_enum(en),
            Declaration::Class(class) => {
                self.writer.write("class ");
                self.writer.write(&class.name);
                match class.inherits.as_slice() {
                    [] => {}
                    [base] => {
                        self.writer.write(" : ");
                        self.writer.write(base);
                    }
                    bases => {
                        self.writer.write(" : (");
                        self.writer.write(&bases.join(", "));
                        self.writer.write(")");
                    }
                }
                self.writer.write(" ");
                self.format_block(&class.members);
            }
            Declaration::Struct(st) => {
                self.writer.write("struct ");
                self.writer.write(&st.name);
                self.writer.write(" ");
                self.format_block(&st.members);
            }
            Declaration::Function(func) => self.format_function(func),
            Declaration::Stmt(stmt) => self.format_statement(stmt),
        }
    }

    fn format_var(&mut self, var: &VarDecl) {
        self.writer.write("var ");
        self.writer.write(&var.name);
        self.format_type_annotation(&var.ty);
        if let Some(init) = &var.init {
            self.writer.write(" = ");
            self.format_expr(&init.kind);
        }
        self.terminate();
    }

    fn format_array(&mut self, array: &ArrayDecl) {
        self.writer.write("array ");
        self.writer.write(&array.name);
        if array.length != ArrayDecl::UNSPECIFIED_LENGTH {
            self.writer.write(&format!("[{}]", array.length));
        }
        self.format_type_annotation(&array.ty);
        if let Some(items) = &array.init {
            self.writer.write(" = {");
            self.format_expr_list(items);
            self.writer.write("}");
        }
        self.terminate();
    }

    /// Members whose value continues the implicit count are written without one.
    fn format_enum(&mut self, en: &EnumDecl) {
        self.writer.write("enum ");
        self.writer.write(&en.name);
        if en.members.is_empty() {
            self.writer.write(" {}");
            return;
        }
        self.writer.writeln(" {");
        self.writer.indent();
        let mut next = 0i64;
        for (i, member) in en.members.iter().enumerate() {
            self.writer.write(&member.name);
            if member.value != next {
                self.writer.write(&format!(": {}", member.value));
            }
            next = member.value.wrapping_add(1);
            if i + 1 < en.members.len() {
                self.writer.write(",");
            }
            self.writer.newline();
        }
        self.writer.dedent();
        self.writer.write("}");
    }

    fn format_function(&mut self, func: &FunctionDecl) {
        self.writer.write("fun ");
        self.writer.write(&func.name);
        self.format_params(&func.params);
        self.format_type_annotation(&func.return_type);
        self.writer.write(" ");
        self.format_statement(&func.body.kind);
    }

    fn format_params(&mut self, params: &[Param]) {
        if params.is_empty() {
            self.writer.write("(!)");
            return;
        }
        let rendered: Vec<String> = params
            .iter()
            .map(|p| match &p.ty {
                TypeRef::Named(ty) => format!("{}: {}", p.name, ty),
                TypeRef::Infer => p.name.clone(),
            })
            .collect();
        self.writer.write("(");
        self.writer.write(&rendered.join(", "));
        self.writer.write(")");
    }

    fn format_type_annotation(&mut self, ty: &TypeRef) {
        if let TypeRef::Named(name) = ty {
            self.writer.write(": ");
            self.writer.write(name);
        }
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn format_statement(&mut self, stmt: &Statement) {
        match stmt {
            Statement::Block(items) => self.format_block(items),
            Statement::If(if_stmt) => self.format_if(if_stmt),
            Statement::While(w) => {
                self.writer.write("while (");
                self.format_expr(&w.condition.kind);
                self.writer.write(")");
                self.format_body(&w.body.kind);
            }
            Statement::DoWhile(w) => {
                self.writer.write("do");
                self.format_body(&w.body.kind);
                self.body_end(&w.body.kind);
                self.writer.write("while (");
                self.format_expr(&w.condition.kind);
                self.writer.write(")");
                self.terminate();
            }
            Statement::For(for_stmt) => self.format_for(for_stmt),
            Statement::ForEach(each) => {
                self.writer.write(&format!("foreach ({} : {})", each.item, each.collection));
                self.format_body(&each.body.kind);
            }
            Statement::Switch(switch) => self.format_switch(switch),
            Statement::Try(try_stmt) => {
                self.writer.write("try ");
                self.format_statement(&try_stmt.body.kind);
                self.writer.write(" catch (");
                self.writer.write(&try_stmt.catch_name);
                self.format_type_annotation(&try_stmt.catch_type);
                self.writer.write(") ");
                self.format_statement(&try_stmt.catch_body.kind);
            }
            Statement::Throw(throw) => {
                self.writer.write("throw ");
                self.writer.write(&throw.exception);
                self.writer.write("(");
                self.format_expr_list(&throw.args);
                self.writer.write(")");
                self.terminate();
            }
            Statement::Return(ret) => match &ret.value {
                Some(value) => {
                    self.writer.write("return ");
                    self.format_expr(&value.kind);
                    self.terminate();
                }
                None => {
                    // A bare return is only recognised by its `;`.
                    self.suppress_semicolon = false;
                    self.writer.write("return;");
                }
            },
            Statement::Goto(label) => {
                self.writer.write("goto ");
                self.writer.write(label);
                self.terminate();
            }
            Statement::Label(label) => {
                self.writer.write(label);
                self.writer.write(":");
            }
            Statement::Break => {
                self.writer.write("break");
                self.terminate();
            }
            Statement::Continue => {
                self.writer.write("continue");
                self.terminate();
            }
            Statement::Assignment(assign) => {
                self.format_expr(&assign.target.kind);
                self.writer.write(" = ");
                self.format_expr(&assign.value.kind);
                self.terminate();
            }
            Statement::Expr(expr) => {
                self.format_expr(expr);
                self.terminate();
            }
        }
    }

    /// Body of a control-flow construct: blocks stay on the header line, single statements go one level deeper.
    fn format_body(&mut self, body: &Statement) {
        if let Statement::Block(items) = body {
            self.writer.write(" ");
            self.format_block(items);
        } else {
            self.writer.newline();
            self.writer.indent();
            self.format_statement(body);
            self.writer.dedent();
        }
    }

    /// Separator before a keyword that continues a construct after its body (`else`, `while`).
    fn body_end(&mut self, body: &Statement) {
        if body.is_block() {
            self.writer.write(" ");
        } else {
            self.writer.newline();
        }
    }

    fn format_if(&mut self, if_stmt: &IfStmt) {
        self.writer.write("if (");
        self.format_expr(&if_stmt.condition.kind);
        self.writer.write(")");
        self.format_body(&if_stmt.then_branch.kind);

        if let Some(alt) = &if_stmt.else_branch {
            self.body_end(&if_stmt.then_branch.kind);
            self.writer.write("else");
            if let Statement::If(_) = alt.kind {
                self.writer.write(" ");
                self.format_statement(&alt.kind);
            } else {
                self.format_body(&alt.kind);
            }
        }
    }

    fn format_for(&mut self, for_stmt: &ForStmt) {
        self.writer.write("for (");
        match &for_stmt.init {
            Some(init) => {
                self.format_declaration(&init.kind);
                if decl_closes_with_brace(&init.kind) {
                    self.writer.write(";");
                }
            }
            None => self.writer.write(";"),
        }
        if let Some(cond) = &for_stmt.condition {
            self.writer.write(" ");
            self.format_expr(&cond.kind);
        }
        self.writer.write(";");
        if let Some(iteration) = &for_stmt.iteration {
            self.writer.write(" ");
            self.suppress_semicolon = !starts_braced(&iteration.kind);
            self.format_statement(&iteration.kind);
            self.suppress_semicolon = false;
        }
        self.writer.write(")");
        self.format_body(&for_stmt.body.kind);
    }

    fn format_switch(&mut self, switch: &SwitchStmt) {
        self.writer.write("switch (");
        self.format_expr(&switch.scrutinee.kind);
        self.writer.write(") {");
        self.writer.newline();
        self.writer.indent();
        for case in &switch.cases {
            if case.is_default() {
                self.writer.write("default: ");
            } else {
                self.writer.write("case ");
                self.format_expr(&case.pattern.kind);
                self.writer.write(": ");
            }
            self.format_statement(&case.body.kind);
            self.writer.newline();
        }
        self.writer.dedent();
        self.writer.write("}");
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    fn format_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Binary(left, op, right) => {
                let level = op.level();
                self.format_operand(&left.kind, binary_operand_needs_parens(&left.kind, level, false));
                self.writer.write(&format!(" {} ", op));
                self.format_operand(&right.kind, binary_operand_needs_parens(&right.kind, level, true));
            }
            Expr::Unary(op, operand) => {
                self.writer.write(&op.to_string());
                let wrap = matches!(
                    operand.kind,
                    Expr::Binary(..) | Expr::Ternary(..) | Expr::Lambda(_) | Expr::ScopeOf(..) | Expr::Unary(..) | Expr::Modify(_)
                );
                self.format_operand(&operand.kind, wrap);
            }
            Expr::Ternary(pred, cons, alt) => {
                self.format_operand(&pred.kind, ternary_part_needs_parens(&pred.kind));
                self.writer.write(" ? ");
                self.format_operand(&cons.kind, ternary_part_needs_parens(&cons.kind));
                self.writer.write(" : ");
                self.format_operand(&alt.kind, ternary_part_needs_parens(&alt.kind));
            }
            Expr::Call(name, args) => {
                self.writer.write(name);
                self.writer.write("(");
                self.format_expr_list(args);
                self.writer.write(")");
            }
            Expr::ListAccess(name, index) => {
                self.writer.write(name);
                self.writer.write("[");
                self.format_expr(&index.kind);
                self.writer.write("]");
            }
            Expr::ScopeOf(scope, inner) => {
                self.writer.write(scope);
                self.writer.write(".");
                self.format_expr(&inner.kind);
            }
            Expr::Variable(name) => self.writer.write(name),
            Expr::Modify(modify) => {
                let op = if modify.delta_value() < 0 { "--" } else { "++" };
                let wrap = !matches!(
                    modify.target.kind,
                    Expr::Variable(_) | Expr::Call(..) | Expr::ListAccess(..)
                );
                if !modify.return_previous {
                    self.writer.write(op);
                }
                self.format_operand(&modify.target.kind, wrap);
                if modify.return_previous {
                    self.writer.write(op);
                }
            }
            Expr::Lambda(lambda) => {
                self.writer.write("lambda ");
                self.format_params(&lambda.params);
                self.format_type_annotation(&lambda.return_type);
                self.writer.write(" ");
                self.format_statement(&lambda.body.kind);
            }
            Expr::Int(n) if *n < 0 => self.writer.write(&format!("({})", n)),
            Expr::Int(n) => self.writer.write(&n.to_string()),
            Expr::Float(x) => self.writer.write(&float_literal(*x)),
            Expr::Bool(b) => self.writer.write(if *b { "true" } else { "false" }),
            Expr::Char(c) => self.writer.write(&format!("'{}'", escape(&c.to_string(), '\''))),
            Expr::Str(s) => self.writer.write(&format!("\"{}\"", escape(s, '"'))),
        }
    }

    fn format_operand(&mut self, expr: &Expr, wrap: bool) {
        if wrap {
            self.writer.write("(");
        }
        self.format_expr(expr);
        if wrap {
            self.writer.write(")");
        }
    }

    fn format_expr_list(&mut self, items: &[Node<Expr>]) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.writer.write(", ");
            }
            self.format_expr(&item.kind);
        }
    }
}

/// Declarations whose text ends in `}`.
fn decl_closes_with_brace(decl: &Declaration) -> bool {
    match decl {
        Declaration::Var(_) | Declaration::Array(_) => false,
        Declaration::Enum(_) | Declaration::Class(_) | Declaration::Struct(_) | Declaration::Function(_) => true,
        Declaration::Stmt(stmt) => closes_with_brace(stmt),
    }
}

fn closes_with_brace(stmt: &Statement) -> bool {
    match stmt {
        Statement::Block(_) | Statement::Switch(_) | Statement::Try(_) => true,
        Statement::If(s) => closes_with_brace(&s.else_branch.as_ref().unwrap_or(&s.then_branch).kind),
        Statement::While(w) => closes_with_brace(&w.body.kind),
        Statement::For(f) => closes_with_brace(&f.body.kind),
        Statement::ForEach(f) => closes_with_brace(&f.body.kind),
        _ => false,
    }
}

/// Statements the parser reads without a semicolon waiver in a `for` header.
fn starts_braced(stmt: &Statement) -> bool {
    matches!(
        stmt,
        Statement::Block(_)
            | Statement::If(_)
            | Statement::While(_)
            | Statement::For(_)
            | Statement::ForEach(_)
            | Statement::Switch(_)
            | Statement::Try(_)
    )
}

/// Binary levels are left-associative, so a right operand at the parent's own level needs parentheses.
fn binary_operand_needs_parens(child: &Expr, parent_level: u8, right: bool) -> bool {
    match child {
        Expr::Binary(_, op, _) if right => op.level() <= parent_level,
        Expr::Binary(_, op, _) => op.level() < parent_level,
        Expr::Ternary(..) | Expr::Lambda(_) | Expr::ScopeOf(..) => true,
        _ => false,
    }
}

fn ternary_part_needs_parens(part: &Expr) -> bool {
    matches!(part, Expr::Ternary(..) | Expr::Lambda(_) | Expr::ScopeOf(..))
}

/// Shortest text that lexes back as a float literal (the lexer wants `digits.digits`).
fn float_literal(x: f64) -> String {
    let text = format!("{:?}", x.abs());
    let text = if text.contains(['e', 'E']) || !text.contains('.') {
        format!("{:.1}", x.abs())
    } else {
        text
    };
    if x.is_sign_negative() { format!("(-{})", text) } else { text }
}

/// Escape special characters in a string or char literal
fn escape(s: &str, quote: char) -> String {
    let mut result = String::new();
    for c in s.chars() {
        match c {
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            '\u{8}' => result.push_str("\\b"),
            '\\' => result.push_str("\\\\"),
            c if c == quote => {
                result.push('\\');
                result.push(c);
            }
            c => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_literal_keeps_fraction() {
        assert_eq!(float_literal(3.0), "3.0");
        assert_eq!(float_literal(2.5), "2.5");
        assert_eq!(float_literal(1e20), "100000000000000000000.0");
        assert_eq!(float_literal(-1.5), "(-1.5)");
    }

    #[test]
    fn test_escape_only_own_quote() {
        assert_eq!(escape("say \"hi\"\n", '"'), "say \\\"hi\\\"\\n");
        assert_eq!(escape("'", '"'), "'");
        assert_eq!(escape("'", '\''), "\\'");
        assert_eq!(escape("\\", '\''), "\\\\");
    }

    #[test]
    fn test_right_operand_at_same_level_is_wrapped() {
        let add = Expr::Binary(
            Box::new(Node::new(Expr::Int(1), Position::new(1, 0), Span::default())),
            BinaryOp::Add,
            Box::new(Node::new(Expr::Int(2), Position::new(1, 4), Span::default())),
        );
        assert!(binary_operand_needs_parens(&add, BinaryOp::Sub.level(), true));
        assert!(!binary_operand_needs_parens(&add, BinaryOp::Sub.level(), false));
        assert!(binary_operand_needs_parens(&add, BinaryOp::Mul.level(), false));
        assert!(!binary_operand_needs_parens(&add, BinaryOp::Lt.level(), true));
    }
}
