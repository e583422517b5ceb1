//! Shallow type annotation for C-Flat syntax trees
//!
//! Fills the write-once type slot of nodes whose type is known without name resolution:
//! - literal leaves
//! - declarations with an explicit type (and classes, structs, enums by their own name)
//! - comparisons, logical connectives and `!` (always `bool`)
//! - arithmetic and bitwise operators whose operands are already annotated
//! - enum members, named bare (`Red`, as in switch patterns) or scoped (`Color.Red`)
//!
//! Other variables, calls, list accesses and scope lookups stay unannotated. Enum members are matched by name
//! across the whole program, without scoping. The pass never changes tree shape and fills each slot at most
//! once.

use std::collections::HashMap;

use cflat_core::lang::keywords::{self, KeywordId};
use cflat_syntax::ast::*;

/// Map a written type name to a [`Type`]. Unknown names are user types.
///
/// `lambda` is a keyword, so source text never names it as a type; it maps to [`Type::Lambda`] for callers
/// that build trees by hand.
pub fn type_from_name(name: &str) -> Type {
    if keywords::from_str(name) == Some(KeywordId::Lambda) {
        return Type::Lambda;
    }
    match name {
        "int" => Type::Integer,
        "float" => Type::Floating,
        "bool" => Type::Bool,
        "char" => Type::Char,
        "string" => Type::Str,
        "void" => Type::Void,
        other => Type::Object(other.to_string()),
    }
}

/// Position of a numeric type on the promotion chain `bool/char -> int -> float`.
fn numeric_rank(ty: &Type) -> Option<u8> {
    match ty {
        Type::Bool | Type::Char => Some(0),
        Type::Integer => Some(1),
        Type::Floating => Some(2),
        _ => None,
    }
}

/// Whether a value of `from` can be used where `to` is expected without conversion.
pub fn can_promote(from: &Type, to: &Type) -> bool {
    match (from, to) {
        (Type::Bool | Type::Char, Type::Integer) | (Type::Integer, Type::Floating) => true,
        (Type::Bool | Type::Char, Type::Floating) => true,
        _ => from == to,
    }
}

/// Result type of a non-boolean binary operator, when both operand types are known.
fn binary_result(op: BinaryOp, left: &Type, right: &Type) -> Option<Type> {
    if op == BinaryOp::Add && *left == Type::Str && *right == Type::Str {
        return Some(Type::Str);
    }
    let rank = numeric_rank(left)?.max(numeric_rank(right)?);
    match op {
        BinaryOp::BitOr | BinaryOp::BitXor | BinaryOp::BitAnd | BinaryOp::Shl | BinaryOp::Shr => {
            (rank <= 1).then_some(Type::Integer)
        }
        _ => Some(if rank == 2 { Type::Floating } else { Type::Integer }),
    }
}

/// Type annotation state
#[derive(Debug, Default)]
pub struct TypeAnnotator {
    annotated: usize,
    /// Member name -> name of the enum declaring it. The first declaration wins.
    enum_members: HashMap<String, String>,
}

impl TypeAnnotator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Annotate every declaration of `program`; returns the number of slots filled.
    #[tracing::instrument(skip_all, fields(declarations = program.declarations.len()))]
    pub fn annotate_program(&mut self, program: &Program) -> usize {
        for decl in &program.declarations {
            self.collect_enums(decl);
        }
        for decl in &program.declarations {
            self.annotate_declaration(decl);
        }
        tracing::debug!(annotated = self.annotated, "annotation finished");
        self.annotated
    }

    /// Record the members of every enum declared at `node` or inside a class/struct body.
    fn collect_enums(&mut self, node: &Node<Declaration>) {
        match &node.kind {
            Declaration::Enum(en) => {
                for member in &en.members {
                    self.enum_members
                        .entry(member.name.clone())
                        .or_insert_with(|| en.name.clone());
                }
            }
            Declaration::Class(ClassDecl { members, .. }) | Declaration::Struct(StructDecl { members, .. }) => {
                for member in members {
                    self.collect_enums(member);
                }
            }
            _ => {}
        }
    }

    fn assign(&mut self, slot: &TypeSlot, ty: Type) {
        if !slot.is_set() {
            slot.set(ty);
            self.annotated += 1;
        }
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    fn annotate_declaration(&mut self, node: &Node<Declaration>) {
        match &node.kind {
            Declaration::Var(var) => {
                if let Some(init) = &var.init {
                    self.annotate_expr(init);
                }
                if let TypeRef::Named(name) = &var.ty {
                    self.assign(&node.ty, type_from_name(name));
                }
            }
            Declaration::Array(array) => {
                for item in array.init.iter().flatten() {
                    self.annotate_expr(item);
                }
                if let TypeRef::Named(name) = &array.ty {
                    self.assign(&node.ty, type_from_name(name));
                }
            }
            Declaration::Enum(en) => self.assign(&node.ty, Type::Object(en.name.clone())),
            Declaration::Class(class) => {
                for member in &class.members {
                    self.annotate_declaration(member);
                }
                self.assign(&node.ty, Type::Object(class.name.clone()));
            }
            Declaration::Struct(st) => {
                for member in &st.members {
                    self.annotate_declaration(member);
                }
                self.assign(&node.ty, Type::Object(st.name.clone()));
            }
            Declaration::Function(func) => {
                self.annotate_statement(&func.body);
                if let TypeRef::Named(name) = &func.return_type {
                    self.assign(&node.ty, type_from_name(name));
                }
            }
            Declaration::Stmt(stmt) => self.annotate_statement_kind(stmt, &node.ty),
        }
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn annotate_statement(&mut self, node: &Node<Statement>) {
        self.annotate_statement_kind(&node.kind, &node.ty);
    }

    /// `slot` belongs to the node wrapping `stmt`; only expression statements use it.
    fn annotate_statement_kind(&mut self, stmt: &Statement, slot: &TypeSlot) {
        match stmt {
            Statement::Block(items) => {
                for item in items {
                    self.annotate_declaration(item);
                }
            }
            Statement::If(s) => {
                self.annotate_expr(&s.condition);
                self.annotate_statement(&s.then_branch);
                if let Some(alt) = &s.else_branch {
                    self.annotate_statement(alt);
                }
            }
            Statement::While(w) | Statement::DoWhile(w) => {
                self.annotate_expr(&w.condition);
                self.annotate_statement(&w.body);
            }
            Statement::For(f) => {
                if let Some(init) = &f.init {
                    self.annotate_declaration(init);
                }
                if let Some(cond) = &f.condition {
                    self.annotate_expr(cond);
                }
                if let Some(iteration) = &f.iteration {
                    self.annotate_statement(iteration);
                }
                self.annotate_statement(&f.body);
            }
            Statement::ForEach(f) => self.annotate_statement(&f.body),
            Statement::Switch(s) => {
                self.annotate_expr(&s.scrutinee);
                for case in &s.cases {
                    self.annotate_expr(&case.pattern);
                    self.annotate_statement(&case.body);
                }
            }
            Statement::Try(t) => {
                self.annotate_statement(&t.body);
                self.annotate_statement(&t.catch_body);
            }
            Statement::Throw(t) => {
                for arg in &t.args {
                    self.annotate_expr(arg);
                }
            }
            Statement::Return(r) => {
                if let Some(value) = &r.value {
                    self.annotate_expr(value);
                }
            }
            Statement::Assignment(a) => {
                self.annotate_expr(&a.target);
                self.annotate_expr(&a.value);
            }
            Statement::Expr(expr) => {
                if let Some(ty) = self.annotate_expr_kind(expr) {
                    self.assign(slot, ty);
                }
            }
            Statement::Goto(_) | Statement::Label(_) | Statement::Break | Statement::Continue => {}
        }
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    fn annotate_expr(&mut self, node: &Node<Expr>) {
        if let Some(ty) = self.annotate_expr_kind(&node.kind) {
            self.assign(&node.ty, ty);
        }
    }

    /// Annotate the children of `expr` and return the type of `expr` itself, if known.
    fn annotate_expr_kind(&mut self, expr: &Expr) -> Option<Type> {
        match expr {
            Expr::Binary(left, op, right) => {
                self.annotate_expr(left);
                self.annotate_expr(right);
                if op.is_boolean() {
                    return Some(Type::Bool);
                }
                binary_result(*op, left.ty.get()?, right.ty.get()?)
            }
            Expr::Unary(op, operand) => {
                self.annotate_expr(operand);
                match op {
                    UnaryOp::Not => Some(Type::Bool),
                    UnaryOp::Negate => match numeric_rank(operand.ty.get()?)? {
                        2 => Some(Type::Floating),
                        _ => Some(Type::Integer),
                    },
                    UnaryOp::BitNot => (numeric_rank(operand.ty.get()?)? <= 1).then_some(Type::Integer),
                }
            }
            Expr::Ternary(pred, cons, alt) => {
                self.annotate_expr(pred);
                self.annotate_expr(cons);
                self.annotate_expr(alt);
                let (c, a) = (cons.ty.get()?, alt.ty.get()?);
                if can_promote(c, a) {
                    Some(a.clone())
                } else if can_promote(a, c) {
                    Some(c.clone())
                } else {
                    None
                }
            }
            Expr::Call(_, args) => {
                for arg in args {
                    self.annotate_expr(arg);
                }
                None
            }
            Expr::ListAccess(_, index) => {
                self.annotate_expr(index);
                None
            }
            Expr::ScopeOf(scope, inner) => {
                self.annotate_expr(inner);
                match &inner.kind {
                    Expr::Variable(member) if self.enum_members.get(member) == Some(scope) => {
                        Some(Type::EnumMember(scope.clone()))
                    }
                    _ => None,
                }
            }
            Expr::Variable(name) => self.enum_members.get(name).map(|en| Type::EnumMember(en.clone())),
            Expr::Modify(m) => {
                self.annotate_expr(&m.target);
                self.annotate_expr(&m.delta);
                m.target.ty.get().cloned()
            }
            Expr::Lambda(l) => {
                self.annotate_statement(&l.body);
                Some(Type::Lambda)
            }
            Expr::Int(_) => Some(Type::Integer),
            Expr::Float(_) => Some(Type::Floating),
            Expr::Bool(_) => Some(Type::Bool),
            Expr::Char(_) => Some(Type::Char),
            Expr::Str(_) => Some(Type::Str),
        }
    }
}

/// Annotate `program` in place; returns the number of type slots filled.
pub fn annotate(program: &Program) -> usize {
    TypeAnnotator::new().annotate_program(program)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cflat_syntax::parse_source;

    fn parse(source: &str) -> Program {
        let parsed = parse_source(source);
        assert!(!parsed.has_errors(), "{:?}", parsed.diagnostics);
        parsed.program
    }

    fn init_of(program: &Program, index: usize) -> &Node<Expr> {
        match &program.declarations[index].kind {
            Declaration::Var(var) => var.init.as_ref().expect("initializer"),
            other => panic!("expected a var declaration, got {}", other.describe()),
        }
    }

    #[test]
    fn literals_and_declared_types() {
        let program = parse("var a: int = 1; var b: float = 2.5; var s = \"x\"; var c: Point;");
        annotate(&program);

        assert_eq!(program.declarations[0].ty.get(), Some(&Type::Integer));
        assert_eq!(init_of(&program, 0).ty.get(), Some(&Type::Integer));
        assert_eq!(init_of(&program, 1).ty.get(), Some(&Type::Floating));
        // No written type: the declaration stays open, its literal does not.
        assert_eq!(program.declarations[2].ty.get(), None);
        assert_eq!(init_of(&program, 2).ty.get(), Some(&Type::Str));
        assert_eq!(program.declarations[3].ty.get(), Some(&Type::Object("Point".into())));
    }

    #[test]
    fn arithmetic_promotes_and_comparisons_are_bool() {
        let program = parse("var a = 1 + 2.0; var b = 1 + 'c'; var c = x < 1; var d = x + 1; var e = !x; var f = 1 << 2.0;");
        annotate(&program);

        assert_eq!(init_of(&program, 0).ty.get(), Some(&Type::Floating));
        assert_eq!(init_of(&program, 1).ty.get(), Some(&Type::Integer));
        assert_eq!(init_of(&program, 2).ty.get(), Some(&Type::Bool));
        // `x` is unresolved, so the sum stays open.
        assert_eq!(init_of(&program, 3).ty.get(), None);
        assert_eq!(init_of(&program, 4).ty.get(), Some(&Type::Bool));
        assert_eq!(init_of(&program, 5).ty.get(), None);
    }

    #[test]
    fn string_concatenation_and_negation() {
        let program = parse("var s = \"a\" + \"b\"; var n = -2.5; var t = true ? 1 : 2.0;");
        annotate(&program);
        assert_eq!(init_of(&program, 0).ty.get(), Some(&Type::Str));
        assert_eq!(init_of(&program, 1).ty.get(), Some(&Type::Floating));
        assert_eq!(init_of(&program, 2).ty.get(), Some(&Type::Floating));
    }

    #[test]
    fn nested_bodies_and_expression_statements() {
        let program = parse(
            "class Dog { var legs: int = 4; fun bark(!): string { return \"woof\"; } } \
             fun f(!): void { 1 + 1; var g = lambda (x: int): int { return x; }; }",
        );
        let filled = annotate(&program);
        assert!(filled >= 8);
        assert_eq!(program.declarations[0].ty.get(), Some(&Type::Object("Dog".into())));

        let Declaration::Function(f) = &program.declarations[1].kind else {
            panic!("expected a function");
        };
        assert_eq!(program.declarations[1].ty.get(), Some(&Type::Void));
        let Statement::Block(body) = &f.body.kind else {
            panic!("expected a block body");
        };
        assert_eq!(body[0].ty.get(), Some(&Type::Integer));
        let Declaration::Var(g) = &body[1].kind else {
            panic!("expected a var");
        };
        assert_eq!(g.init.as_ref().and_then(|e| e.ty.get()), Some(&Type::Lambda));
    }

    #[test]
    fn annotating_twice_fills_nothing_new() {
        let program = parse("var a: int = 1 + 2;");
        assert_eq!(annotate(&program), 4);
        assert_eq!(annotate(&program), 0);
    }

    #[test]
    fn enum_members_in_switch_patterns_and_scopes() {
        let program = parse(
            "enum Color { Red, Green } \
             fun paint(c: Color): int { switch (c) { case Red: return 1; default: return 0; } } \
             var g = Color.Green; var h = Shade.Green;",
        );
        annotate(&program);

        let Declaration::Function(paint) = &program.declarations[1].kind else {
            panic!("expected a function");
        };
        let Statement::Block(body) = &paint.body.kind else {
            panic!("expected a block body");
        };
        let Declaration::Stmt(Statement::Switch(switch)) = &body[0].kind else {
            panic!("expected a switch");
        };
        assert_eq!(switch.cases[0].pattern.ty.get(), Some(&Type::EnumMember("Color".into())));
        // `c` is a parameter, not a member.
        assert_eq!(switch.scrutinee.ty.get(), None);

        assert_eq!(init_of(&program, 2).ty.get(), Some(&Type::EnumMember("Color".into())));
        // `Green` belongs to `Color`, not to `Shade`.
        assert_eq!(init_of(&program, 3).ty.get(), None);
        assert_eq!(Type::EnumMember("Color".into()).to_string(), "Color.member");
    }

    #[test]
    fn promotion_chain() {
        assert!(can_promote(&Type::Char, &Type::Integer));
        assert!(can_promote(&Type::Integer, &Type::Floating));
        assert!(can_promote(&Type::Bool, &Type::Floating));
        assert!(!can_promote(&Type::Floating, &Type::Integer));
        assert!(!can_promote(&Type::Str, &Type::Integer));
        assert_eq!(type_from_name("Widget"), Type::Object("Widget".into()));
    }
}
