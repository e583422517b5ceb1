//! Abstract Syntax Tree definitions for C-Flat
//!
//! The grammar layers `Declaration -> Statement -> Expression` are modelled as three sum types with explicit
//! lifting (`Declaration::Stmt`, `Statement::Expr`) rather than a class hierarchy. Every node is wrapped in a
//! [`Node`], which carries the source position of the first token of the construct and a write-once
//! [`TypeSlot`] for the annotation pass.

use std::cell::OnceCell;
use std::fmt;

use cflat_core::lang::operators::{self, OperatorId};

/// Source location span (byte offsets)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// Line/column of the first character of a token or construct.
///
/// Lines are 1-based. Columns are 0-based and restart at 0 after every line break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.line, self.column)
    }
}

/// Identifier
pub type Ident = String;

/// Types attached to nodes by the annotation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Bool,
    Char,
    Floating,
    Integer,
    Str,
    /// A named user type (class, struct, exception, or an unknown type name).
    Object(String),
    Lambda,
    /// A member of the named enum.
    EnumMember(String),
    Void,
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Bool => write!(f, "bool"),
            Type::Char => write!(f, "char"),
            Type::Floating => write!(f, "float"),
            Type::Integer => write!(f, "int"),
            Type::Str => write!(f, "string"),
            Type::Object(name) => write!(f, "{}", name),
            Type::Lambda => write!(f, "lambda"),
            Type::EnumMember(name) => write!(f, "{}.member", name),
            Type::Void => write!(f, "void"),
        }
    }
}

/// Write-once type annotation slot.
///
/// ## Panics
/// - [`TypeSlot::set`] panics when the slot is already filled. Annotating a node twice is a bug in the
///   annotation pass, not a recoverable condition.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TypeSlot(OnceCell<Type>);

impl TypeSlot {
    pub fn new() -> Self {
        Self(OnceCell::new())
    }

    pub fn get(&self) -> Option<&Type> {
        self.0.get()
    }

    pub fn is_set(&self) -> bool {
        self.0.get().is_some()
    }

    pub fn set(&self, ty: Type) {
        if let Err(ty) = self.0.set(ty) {
            panic!(
                "node is already typed as `{}`, refusing to retype it as `{}`",
                self.0.get().map(ToString::to_string).unwrap_or_default(),
                ty
            );
        }
    }
}

/// A syntax node: payload plus position, span, and type annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct Node<T> {
    pub kind: T,
    pub pos: Position,
    pub span: Span,
    pub ty: TypeSlot,
}

impl<T> Node<T> {
    pub fn new(kind: T, pos: Position, span: Span) -> Self {
        Self {
            kind,
            pos,
            span,
            ty: TypeSlot::new(),
        }
    }

    /// Re-wrap the payload, keeping position, span and annotation.
    ///
    /// Used to lift a node into a wider grammatical category, e.g.
    /// `expr.map(Statement::Expr).map(Declaration::Stmt)`.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Node<U> {
        Node {
            kind: f(self.kind),
            pos: self.pos,
            span: self.span,
            ty: self.ty,
        }
    }
}

/// A program is a sequence of top-level declarations
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub declarations: Vec<Node<Declaration>>,
}

/// Marker for an omitted type annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    Named(Ident),
    /// No annotation was written; the type is to be inferred from use.
    Infer,
}

impl TypeRef {
    pub fn is_infer(&self) -> bool {
        matches!(self, TypeRef::Infer)
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            TypeRef::Named(name) => Some(name),
            TypeRef::Infer => None,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(name) => write!(f, "{}", name),
            TypeRef::Infer => write!(f, "!!INFER!!"),
        }
    }
}

/// `name: type` pair used for parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: Ident,
    pub ty: TypeRef,
}

// ============================================================================
// Declarations
// ============================================================================

/// Declarations: the broadest grammatical category
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Var(VarDecl),
    Array(ArrayDecl),
    Enum(EnumDecl),
    Class(ClassDecl),
    Struct(StructDecl),
    Function(FunctionDecl),
    Stmt(Statement),
}

impl Declaration {
    pub fn describe(&self) -> &'static str {
        match self {
            Declaration::Var(_) => "Var Declaration",
            Declaration::Array(_) => "Array Declaration",
            Declaration::Enum(_) => "Enum Declaration",
            Declaration::Class(_) => "Class Declaration",
            Declaration::Struct(_) => "Struct Declaration",
            Declaration::Function(_) => "Function Declaration",
            Declaration::Stmt(stmt) => stmt.describe(),
        }
    }

    pub fn as_statement(&self) -> Option<&Statement> {
        match self {
            Declaration::Stmt(stmt) => Some(stmt),
            _ => None,
        }
    }
}

/// `var name [: type] [= init];`
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub name: Ident,
    pub ty: TypeRef,
    pub init: Option<Node<Expr>>,
}

/// `array name [ "[" length "]" ] [: type] [= { e, ... }];`
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayDecl {
    pub name: Ident,
    pub ty: TypeRef,
    /// Declared length, or `-1` when no length was written.
    pub length: i64,
    pub init: Option<Vec<Node<Expr>>>,
}

impl ArrayDecl {
    /// Sentinel for "no length written".
    pub const UNSPECIFIED_LENGTH: i64 = -1;

    /// The declared length, or the initializer count when no length was written.
    pub fn effective_length(&self) -> Option<usize> {
        if self.length == Self::UNSPECIFIED_LENGTH {
            self.init.as_ref().map(Vec::len)
        } else {
            usize::try_from(self.length).ok()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumDecl {
    pub name: Ident,
    pub members: Vec<EnumMember>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumMember {
    pub name: Ident,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub name: Ident,
    pub inherits: Vec<Ident>,
    pub members: Vec<Node<Declaration>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructDecl {
    pub name: Ident,
    pub members: Vec<Node<Declaration>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: Ident,
    pub params: Vec<Param>,
    pub return_type: TypeRef,
    pub body: Box<Node<Statement>>,
}

// ============================================================================
// Statements
// ============================================================================

/// Statements
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Block(Vec<Node<Declaration>>),
    If(IfStmt),
    While(WhileStmt),
    DoWhile(WhileStmt),
    For(ForStmt),
    ForEach(ForEachStmt),
    Switch(SwitchStmt),
    Try(TryStmt),
    Throw(ThrowStmt),
    Return(ReturnStmt),
    Goto(Ident),
    Label(Ident),
    Break,
    Continue,
    Assignment(AssignmentStmt),
    Expr(Expr),
}

impl Statement {
    pub fn describe(&self) -> &'static str {
        match self {
            Statement::Block(_) => "Block",
            Statement::If(_) => "If",
            Statement::While(_) => "While",
            Statement::DoWhile(_) => "Do While",
            Statement::For(_) => "For",
            Statement::ForEach(_) => "For Each",
            Statement::Switch(_) => "Switch",
            Statement::Try(_) => "Try",
            Statement::Throw(_) => "Throw",
            Statement::Return(_) => "Return",
            Statement::Goto(_) => "Goto",
            Statement::Label(_) => "Label",
            Statement::Break => "Break",
            Statement::Continue => "Continue",
            Statement::Assignment(_) => "Assignment",
            Statement::Expr(expr) => expr.describe(),
        }
    }

    pub fn is_block(&self) -> bool {
        matches!(self, Statement::Block(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub condition: Node<Expr>,
    pub then_branch: Box<Node<Statement>>,
    pub else_branch: Option<Box<Node<Statement>>>,
}

/// Shared by `while (c) body` and `do body while (c);`.
#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub condition: Node<Expr>,
    pub body: Box<Node<Statement>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    pub init: Option<Box<Node<Declaration>>>,
    pub condition: Option<Node<Expr>>,
    pub iteration: Option<Box<Node<Statement>>>,
    pub body: Box<Node<Statement>>,
}

/// `foreach (item : collection) body`
#[derive(Debug, Clone, PartialEq)]
pub struct ForEachStmt {
    pub item: Ident,
    pub collection: Ident,
    pub body: Box<Node<Statement>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchStmt {
    pub scrutinee: Node<Expr>,
    pub cases: Vec<SwitchCase>,
}

/// One `case pattern: body` arm. The `default:` arm has the pattern `true`.
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchCase {
    pub pattern: Node<Expr>,
    pub body: Node<Statement>,
}

impl SwitchCase {
    pub fn is_default(&self) -> bool {
        matches!(self.pattern.kind, Expr::Bool(true))
    }
}

/// `try { } catch (name [: type]) { }`
#[derive(Debug, Clone, PartialEq)]
pub struct TryStmt {
    pub body: Box<Node<Statement>>,
    pub catch_name: Ident,
    pub catch_type: TypeRef,
    pub catch_body: Box<Node<Statement>>,
}

/// `throw Name(args);`
#[derive(Debug, Clone, PartialEq)]
pub struct ThrowStmt {
    pub exception: Ident,
    pub args: Vec<Node<Expr>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub value: Option<Node<Expr>>,
}

impl ReturnStmt {
    /// `return;` with no value.
    pub fn is_bare(&self) -> bool {
        self.value.is_none()
    }
}

/// `target = value;`. Compound forms are stored desugared: `a += b` becomes `a = a + b`.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentStmt {
    pub target: Node<Expr>,
    pub value: Node<Expr>,
}

// ============================================================================
// Expressions
// ============================================================================

/// Expressions
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Binary(Box<Node<Expr>>, BinaryOp, Box<Node<Expr>>),
    Unary(UnaryOp, Box<Node<Expr>>),
    Ternary(Box<Node<Expr>>, Box<Node<Expr>>, Box<Node<Expr>>),
    /// `name(args)`
    Call(Ident, Vec<Node<Expr>>),
    /// `name[index]`
    ListAccess(Ident, Box<Node<Expr>>),
    /// `scope.inner`, where `inner` is a full expression
    ScopeOf(Ident, Box<Node<Expr>>),
    Variable(Ident),
    Modify(ModifyExpr),
    Lambda(LambdaExpr),
    Int(i64),
    Float(f64),
    Bool(bool),
    Char(char),
    Str(String),
}

impl Expr {
    pub fn describe(&self) -> &'static str {
        match self {
            Expr::Binary(..) => "Binary Op",
            Expr::Unary(..) => "Unary Op",
            Expr::Ternary(..) => "Ternary",
            Expr::Call(..) => "Function Call",
            Expr::ListAccess(..) => "List Access",
            Expr::ScopeOf(..) => "Scope Of",
            Expr::Variable(_) => "Variable Access",
            Expr::Modify(_) => "Modify",
            Expr::Lambda(_) => "Lambda",
            Expr::Int(_) => "Integer number",
            Expr::Float(_) => "Floating number",
            Expr::Bool(_) => "Boolean",
            Expr::Char(_) => "Char",
            Expr::Str(_) => "String",
        }
    }

    /// Literal leaves: int, float, bool, char and string.
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            Expr::Int(_) | Expr::Float(_) | Expr::Bool(_) | Expr::Char(_) | Expr::Str(_)
        )
    }
}

/// Unified increment/decrement: read `target`, add `delta`, store, and yield the old value when
/// `return_previous` is set (postfix) or the new value otherwise (prefix).
#[derive(Debug, Clone, PartialEq)]
pub struct ModifyExpr {
    pub target: Box<Node<Expr>>,
    /// Always an `Expr::Int` of `1` or `-1`.
    pub delta: Box<Node<Expr>>,
    pub return_previous: bool,
}

impl ModifyExpr {
    /// The signed delta as a number.
    pub fn delta_value(&self) -> i64 {
        match self.delta.kind {
            Expr::Int(n) => n,
            _ => 0,
        }
    }
}

/// `lambda (params) [: type] body`
#[derive(Debug, Clone, PartialEq)]
pub struct LambdaExpr {
    pub params: Vec<Param>,
    pub return_type: TypeRef,
    pub body: Box<Node<Statement>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Or,
    And,
    BitOr,
    BitXor,
    BitAnd,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Shl,
    Shr,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
}

impl BinaryOp {
    /// Map a binary operator token to its AST operator.
    pub fn from_operator(id: OperatorId) -> Option<Self> {
        Some(match id {
            OperatorId::OrOr => BinaryOp::Or,
            OperatorId::AndAnd => BinaryOp::And,
            OperatorId::Pipe => BinaryOp::BitOr,
            OperatorId::Caret => BinaryOp::BitXor,
            OperatorId::Amp => BinaryOp::BitAnd,
            OperatorId::EqEq => BinaryOp::Eq,
            OperatorId::NotEq => BinaryOp::NotEq,
            OperatorId::Lt => BinaryOp::Lt,
            OperatorId::LtEq => BinaryOp::LtEq,
            OperatorId::Gt => BinaryOp::Gt,
            OperatorId::GtEq => BinaryOp::GtEq,
            OperatorId::Shl => BinaryOp::Shl,
            OperatorId::Shr => BinaryOp::Shr,
            OperatorId::Plus => BinaryOp::Add,
            OperatorId::Minus => BinaryOp::Sub,
            OperatorId::Star => BinaryOp::Mul,
            OperatorId::Slash => BinaryOp::Div,
            OperatorId::Percent => BinaryOp::Mod,
            OperatorId::StarStar => BinaryOp::Pow,
            _ => return None,
        })
    }

    pub fn operator(self) -> OperatorId {
        match self {
            BinaryOp::Or => OperatorId::OrOr,
            BinaryOp::And => OperatorId::AndAnd,
            BinaryOp::BitOr => OperatorId::Pipe,
            BinaryOp::BitXor => OperatorId::Caret,
            BinaryOp::BitAnd => OperatorId::Amp,
            BinaryOp::Eq => OperatorId::EqEq,
            BinaryOp::NotEq => OperatorId::NotEq,
            BinaryOp::Lt => OperatorId::Lt,
            BinaryOp::LtEq => OperatorId::LtEq,
            BinaryOp::Gt => OperatorId::Gt,
            BinaryOp::GtEq => OperatorId::GtEq,
            BinaryOp::Shl => OperatorId::Shl,
            BinaryOp::Shr => OperatorId::Shr,
            BinaryOp::Add => OperatorId::Plus,
            BinaryOp::Sub => OperatorId::Minus,
            BinaryOp::Mul => OperatorId::Star,
            BinaryOp::Div => OperatorId::Slash,
            BinaryOp::Mod => OperatorId::Percent,
            BinaryOp::Pow => OperatorId::StarStar,
        }
    }

    /// Binary precedence level from the operator registry.
    pub fn level(self) -> u8 {
        operators::binary_level(self.operator()).unwrap_or(0)
    }

    /// Comparisons and logical connectives.
    pub fn is_boolean(self) -> bool {
        operators::is_boolean_producing(self.operator())
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", operators::as_str(self.operator()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// `!`
    Not,
    /// `-`
    Negate,
    /// `~`
    BitNot,
}

impl UnaryOp {
    pub fn operator(self) -> OperatorId {
        match self {
            UnaryOp::Not => OperatorId::Bang,
            UnaryOp::Negate => OperatorId::Minus,
            UnaryOp::BitNot => OperatorId::Tilde,
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", operators::as_str(self.operator()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(n: i64) -> Node<Expr> {
        Node::new(Expr::Int(n), Position::new(1, 0), Span::new(0, 1))
    }

    #[test]
    fn type_slot_accepts_one_assignment() {
        let node = int(1);
        assert!(!node.ty.is_set());
        node.ty.set(Type::Integer);
        assert_eq!(node.ty.get(), Some(&Type::Integer));
    }

    #[test]
    #[should_panic(expected = "already typed")]
    fn type_slot_rejects_second_assignment() {
        let node = int(1);
        node.ty.set(Type::Integer);
        node.ty.set(Type::Floating);
    }

    #[test]
    fn map_lifts_and_keeps_position() {
        let expr = Node::new(Expr::Variable("x".into()), Position::new(3, 4), Span::new(10, 11));
        let decl = expr.map(Statement::Expr).map(Declaration::Stmt);
        assert_eq!(decl.pos, Position::new(3, 4));
        assert_eq!(decl.kind.describe(), "Variable Access");
    }

    #[test]
    fn effective_array_length() {
        let mut arr = ArrayDecl {
            name: "a".into(),
            ty: TypeRef::Infer,
            length: ArrayDecl::UNSPECIFIED_LENGTH,
            init: Some(vec![int(1), int(2)]),
        };
        assert_eq!(arr.effective_length(), Some(2));
        arr.length = 5;
        assert_eq!(arr.effective_length(), Some(5));
        arr.length = ArrayDecl::UNSPECIFIED_LENGTH;
        arr.init = None;
        assert_eq!(arr.effective_length(), None);
    }

    #[test]
    fn binary_ops_round_trip_through_registry() {
        for op in [BinaryOp::Or, BinaryOp::Shl, BinaryOp::Pow, BinaryOp::Mod] {
            assert_eq!(BinaryOp::from_operator(op.operator()), Some(op));
        }
        assert_eq!(BinaryOp::from_operator(OperatorId::PlusEq), None);
        assert!(BinaryOp::Pow.level() > BinaryOp::Mul.level());
        assert!(BinaryOp::Lt.is_boolean());
        assert!(!BinaryOp::Add.is_boolean());
    }
}
