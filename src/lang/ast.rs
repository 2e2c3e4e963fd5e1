use crate::lang::builtins::{BinaryFn, UnaryFn};
use crate::lang::token::Span;

/// Expression node.
///
/// Names are resolved while parsing, so a tree only ever refers to the free
/// variable, a known constant or a whitelisted function.
#[derive(Debug, Clone)]
pub enum Expr {
    /// Numeric literal or resolved constant: `42`, `3.14`, `pi`
    Number(f64, Span),

    /// The free variable `x`.
    Var(Span),

    /// Binary operation: `a + b`, `x^2`
    BinOp {
        op: BinOpKind,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
        span: Span,
    },

    /// Unary negation: `-x`
    Neg { operand: Box<Expr>, span: Span },

    /// One-argument builtin call: `sin(x)`
    Call1 {
        func: UnaryFn,
        arg: Box<Expr>,
        span: Span,
    },

    /// Two-argument builtin call: `atan2(y, x)`
    Call2 {
        func: BinaryFn,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
        span: Span,
    },
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Number(_, s) => *s,
            Expr::Var(s) => *s,
            Expr::BinOp { span, .. } => *span,
            Expr::Neg { span, .. } => *span,
            Expr::Call1 { span, .. } => *span,
            Expr::Call2 { span, .. } => *span,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOpKind {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
}
