//! Debug dump of the syntax tree
//!
//! Every node renders as `Kind{field=value, ...}@(line, col)`. The dump is produced on one line per top-level
//! declaration and then laid out by [`indent_tree_text`], which breaks after every `{`, `[` and `,`.

use cflat_syntax::ast::*;

use super::config::FormatConfig;

/// Renders nodes in the brace-delimited dump form.
pub struct TreePrinter {
    show_positions: bool,
}

impl TreePrinter {
    pub fn new(config: &FormatConfig) -> Self {
        Self {
            show_positions: config.show_positions,
        }
    }

    /// One line per top-level declaration.
    pub fn program(&self, program: &Program) -> Vec<String> {
        program.declarations.iter().map(|d| self.declaration(d)).collect()
    }

    fn node(&self, kind: &str, mut fields: Vec<(&str, String)>, pos: Position, ty: &TypeSlot) -> String {
        if let Some(ty) = ty.get() {
            fields.push(("annotation", ty.to_string()));
        }
        let body = fields
            .into_iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join(", ");
        if self.show_positions {
            format!("{kind}{{{body}}}@{pos}")
        } else {
            format!("{kind}{{{body}}}")
        }
    }

    fn list<T>(&self, items: &[T], render: impl Fn(&T) -> String) -> String {
        let items: Vec<String> = items.iter().map(render).collect();
        format!("[{}]", items.join(", "))
    }

    fn optional<T>(&self, item: Option<&T>, render: impl Fn(&T) -> String) -> String {
        item.map(render).unwrap_or_else(|| "null".to_string())
    }

    pub fn declaration(&self, node: &Node<Declaration>) -> String {
        let (kind, fields) = match &node.kind {
            Declaration::Var(var) => (
                "SimpleVarDeclaration",
                vec![
                    ("name", var.name.clone()),
                    ("type", var.ty.to_string()),
                    ("init", self.optional(var.init.as_ref(), |e| self.expr(e))),
                ],
            ),
            Declaration::Array(array) => (
                "ArrayDeclaration",
                vec![
                    ("name", array.name.clone()),
                    ("type", array.ty.to_string()),
                    ("length", array.length.to_string()),
                    (
                        "init",
                        self.optional(array.init.as_ref(), |items| self.list(items, |e| self.expr(e))),
                    ),
                ],
            ),
            Declaration::Enum(en) => (
                "EnumDeclaration",
                vec![
                    ("name", en.name.clone()),
                    ("members", self.list(&en.members, |m| format!("{}={}", m.name, m.value))),
                ],
            ),
            Declaration::Class(class) => (
                "ClassDeclaration",
                vec![
                    ("name", class.name.clone()),
                    ("inherits", self.list(&class.inherits, Clone::clone)),
                    ("members", self.list(&class.members, |d| self.declaration(d))),
                ],
            ),
            Declaration::Struct(st) => (
                "StructDeclaration",
                vec![
                    ("name", st.name.clone()),
                    ("members", self.list(&st.members, |d| self.declaration(d))),
                ],
            ),
            Declaration::Function(func) => (
                "FunctionDeclaration",
                vec![
                    ("name", func.name.clone()),
                    ("params", self.params(&func.params)),
                    ("returns", func.return_type.to_string()),
                    ("body", self.statement(&func.body)),
                ],
            ),
            Declaration::Stmt(stmt) => return self.statement_kind(stmt, node.pos, &node.ty),
        };
        self.node(kind, fields, node.pos, &node.ty)
    }

    fn params(&self, params: &[Param]) -> String {
        self.list(params, |p| format!("{}: {}", p.name, p.ty))
    }

    pub fn statement(&self, node: &Node<Statement>) -> String {
        self.statement_kind(&node.kind, node.pos, &node.ty)
    }

    fn statement_kind(&self, stmt: &Statement, pos: Position, ty: &TypeSlot) -> String {
        let (kind, fields) = match stmt {
            Statement::Block(items) => ("Block", vec![("body", self.list(items, |d| self.declaration(d)))]),
            Statement::If(s) => (
                "If",
                vec![
                    ("conditional", self.expr(&s.condition)),
                    ("consequent", self.statement(&s.then_branch)),
                    ("alternate", self.optional(s.else_branch.as_ref(), |b| self.statement(b))),
                ],
            ),
            Statement::While(w) => (
                "While",
                vec![("conditional", self.expr(&w.condition)), ("body", self.statement(&w.body))],
            ),
            Statement::DoWhile(w) => (
                "DoWhile",
                vec![("body", self.statement(&w.body)), ("conditional", self.expr(&w.condition))],
            ),
            Statement::For(f) => (
                "For",
                vec![
                    ("init", self.optional(f.init.as_ref(), |d| self.declaration(d))),
                    ("conditional", self.optional(f.condition.as_ref(), |e| self.expr(e))),
                    ("iteration", self.optional(f.iteration.as_ref(), |s| self.statement(s))),
                    ("body", self.statement(&f.body)),
                ],
            ),
            Statement::ForEach(f) => (
                "ForEach",
                vec![
                    ("item", f.item.clone()),
                    ("collection", f.collection.clone()),
                    ("body", self.statement(&f.body)),
                ],
            ),
            Statement::Switch(s) => (
                "Switch",
                vec![
                    ("scrutinee", self.expr(&s.scrutinee)),
                    (
                        "cases",
                        self.list(&s.cases, |c| {
                            format!("Case{{pattern={}, body={}}}", self.expr(&c.pattern), self.statement(&c.body))
                        }),
                    ),
                ],
            ),
            Statement::Try(t) => (
                "Try",
                vec![
                    ("body", self.statement(&t.body)),
                    ("exception", format!("{}: {}", t.catch_name, t.catch_type)),
                    ("handler", self.statement(&t.catch_body)),
                ],
            ),
            Statement::Throw(t) => (
                "Throw",
                vec![
                    ("exception", t.exception.clone()),
                    ("args", self.list(&t.args, |e| self.expr(e))),
                ],
            ),
            Statement::Return(r) => ("Return", vec![("value", self.optional(r.value.as_ref(), |e| self.expr(e)))]),
            Statement::Goto(label) => ("Goto", vec![("label", label.clone())]),
            Statement::Label(label) => ("Label", vec![("name", label.clone())]),
            Statement::Break => ("Break", vec![]),
            Statement::Continue => ("Continue", vec![]),
            Statement::Assignment(a) => (
                "Assignment",
                vec![("target", self.expr(&a.target)), ("value", self.expr(&a.value))],
            ),
            Statement::Expr(expr) => return self.expr_kind(expr, pos, ty),
        };
        self.node(kind, fields, pos, ty)
    }

    pub fn expr(&self, node: &Node<Expr>) -> String {
        self.expr_kind(&node.kind, node.pos, &node.ty)
    }

    fn expr_kind(&self, expr: &Expr, pos: Position, ty: &TypeSlot) -> String {
        let (kind, fields) = match expr {
            Expr::Binary(l, op, r) => (
                "BinaryOp",
                vec![("op", op.to_string()), ("left", self.expr(l)), ("right", self.expr(r))],
            ),
            Expr::Unary(op, operand) => ("UnaryOp", vec![("op", op.to_string()), ("operand", self.expr(operand))]),
            Expr::Ternary(p, c, a) => (
                "Ternary",
                vec![
                    ("predicate", self.expr(p)),
                    ("consequent", self.expr(c)),
                    ("alternate", self.expr(a)),
                ],
            ),
            Expr::Call(name, args) => (
                "Call",
                vec![("name", name.clone()), ("args", self.list(args, |e| self.expr(e)))],
            ),
            Expr::ListAccess(name, index) => ("ListAccess", vec![("name", name.clone()), ("index", self.expr(index))]),
            Expr::ScopeOf(scope, inner) => ("ScopeOf", vec![("scope", scope.clone()), ("inner", self.expr(inner))]),
            Expr::Variable(name) => ("VariableAccess", vec![("name", name.clone())]),
            Expr::Modify(m) => (
                "Modify",
                vec![
                    ("target", self.expr(&m.target)),
                    ("delta", self.expr(&m.delta)),
                    ("returnPrevious", m.return_previous.to_string()),
                ],
            ),
            Expr::Lambda(l) => (
                "Lambda",
                vec![
                    ("params", self.params(&l.params)),
                    ("returns", l.return_type.to_string()),
                    ("body", self.statement(&l.body)),
                ],
            ),
            Expr::Int(n) => ("Integer", vec![("value", n.to_string())]),
            Expr::Float(x) => ("Floating", vec![("value", format!("{x:?}"))]),
            Expr::Bool(b) => ("Bool", vec![("value", b.to_string())]),
            Expr::Char(c) => ("Char", vec![("value", format!("{c:?}"))]),
            Expr::Str(s) => ("String", vec![("value", format!("{s:?}"))]),
        };
        self.node(kind, fields, pos, ty)
    }
}

/// Lay out a one-line dump: break after `{`, `[` and `,`, indenting by `unit` per nesting level.
///
/// Quoted text and parenthesised positions are copied through untouched, and `{}`/`[]` stay on one line.
pub fn indent_tree_text(text: &str, unit: &str) -> String {
    fn break_line(out: &mut String, unit: &str, depth: usize) {
        out.push('\n');
        for _ in 0..depth {
            out.push_str(unit);
        }
    }

    let mut out = String::with_capacity(text.len() * 2);
    let mut depth = 0usize;
    let mut parens = 0usize;
    let mut quote: Option<char> = None;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            out.push(c);
            if c == '\\' {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            } else if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '"' | '\'' => {
                quote = Some(c);
                out.push(c);
            }
            '(' => {
                parens += 1;
                out.push(c);
            }
            ')' => {
                parens = parens.saturating_sub(1);
                out.push(c);
            }
            '{' | '[' => {
                out.push(c);
                if matches!(chars.peek(), Some('}' | ']')) {
                    if let Some(close) = chars.next() {
                        out.push(close);
                    }
                    continue;
                }
                depth += 1;
                break_line(&mut out, unit, depth);
            }
            '}' | ']' => {
                depth = depth.saturating_sub(1);
                break_line(&mut out, unit, depth);
                out.push(c);
            }
            ',' if parens == 0 => {
                out.push(',');
                if chars.peek() == Some(&' ') {
                    chars.next();
                }
                break_line(&mut out, unit, depth);
            }
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indent_breaks_fields_and_keeps_positions() {
        let text = "If{conditional=Bool{value=true}@(1, 4), alternate=null}@(1, 0)";
        let expected = "If{\n  conditional=Bool{\n    value=true\n  }@(1, 4),\n  alternate=null\n}@(1, 0)";
        assert_eq!(indent_tree_text(text, "  "), expected);
    }

    #[test]
    fn test_indent_leaves_quoted_text_alone() {
        let text = r#"String{value="a, {b}"}"#;
        assert_eq!(indent_tree_text(text, "  "), "String{\n  value=\"a, {b}\"\n}");
        let text = r"Char{value='\''}";
        assert_eq!(indent_tree_text(text, "  "), "Char{\n  value='\\''\n}");
    }

    #[test]
    fn test_indent_keeps_empty_groups_inline() {
        assert_eq!(indent_tree_text("Break{}", "  "), "Break{}");
        assert_eq!(indent_tree_text("Block{body=[]}", "  "), "Block{\n  body=[]\n}");
    }
}
