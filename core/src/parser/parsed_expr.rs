use std::rc::Rc;

use crate::parser::{BinaryOp, BoolOp, ComparisonOp, Span, UnaryOp};

/// A parsed HOL program: its top-level expressions in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub exprs: Vec<Expr>,
}

/// An expression node together with the source range it was parsed from.
///
/// Spans are ignored by `PartialEq`: two expressions are equal when they have
/// the same shape, so `a + b * c` equals `a + (b * c)`.
#[derive(Debug, Clone)]
pub struct Expr {
    pub span: Span,
    pub kind: ExprKind,
}

impl Expr {
    pub fn new(span: Span, kind: ExprKind) -> Self {
        Self { span, kind }
    }
}

impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Literal(Literal),
    /// An entire variable, `x`.
    Ident(String),
    /// A single list element, `x[[i]]`.
    Element {
        name: String,
        index: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Boolean {
        op: BoolOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Comparison {
        op: ComparisonOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        expr: Box<Expr>,
    },
    If {
        cond: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Option<Box<Expr>>,
    },
    While {
        cond: Box<Expr>,
        body: Box<Expr>,
    },
    For {
        var: String,
        iterable: Box<Expr>,
        body: Box<Expr>,
    },
    Break,
    Next,
    Compound(Vec<Expr>),
    Assign {
        name: String,
        index: Option<Box<Expr>>,
        value: Box<Expr>,
    },
    /// `function(a, b) { ... }`. The body is shared with every function value
    /// created from this definition.
    Function {
        params: Vec<String>,
        body: Rc<Expr>,
    },
    Call {
        name: String,
        args: Vec<Expr>,
    },
    List(Vec<Literal>),
    Print(Box<Expr>),
    Cat(Box<Expr>),
    Read,
    Quit,
}

impl ExprKind {
    /// Grammar rule name of this node, as shown in evaluation traces.
    pub fn name(&self) -> &'static str {
        match self {
            ExprKind::Literal(_) => "constant",
            ExprKind::Ident(_) => "variable",
            ExprKind::Element { .. } => "single_element",
            ExprKind::Binary { .. } => "arith",
            ExprKind::Boolean { .. } => "logical",
            ExprKind::Comparison { .. } => "relational",
            ExprKind::Unary { .. } => "not",
            ExprKind::If { .. } => "if_expr",
            ExprKind::While { .. } => "while_expr",
            ExprKind::For { .. } => "for_expr",
            ExprKind::Break => "break_expr",
            ExprKind::Next => "next_expr",
            ExprKind::Compound(_) => "compound",
            ExprKind::Assign { .. } => "assignment",
            ExprKind::Function { .. } => "function_def",
            ExprKind::Call { .. } => "call",
            ExprKind::List(_) => "list_expr",
            ExprKind::Print(_) => "print_expr",
            ExprKind::Cat(_) => "cat_expr",
            ExprKind::Read => "read_expr",
            ExprKind::Quit => "quit_expr",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
}
