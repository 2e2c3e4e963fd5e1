//! Sandboxed expression language for graphed functions.
//!
//! Source text goes through [`lexer::Lexer`] and [`parser::Parser`] into an
//! [`ast::Expr`] whose names are already resolved against the whitelist in
//! [`builtins`], so evaluation can only ever do arithmetic.

pub mod ast;
pub mod builtins;
pub mod cache;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod parser;
pub mod token;

pub use cache::Evaluator;
pub use error::{ErrorKind, LangError, LangResult};
pub use eval::{compile, evaluate, CompiledExpr};

/// Evaluate an expression at a batch of points.
///
/// `Err` means the expression as a whole is unusable (it does not compile);
/// per-point failures are `None` entries in the returned vector, which always
/// has the same length as `xs`.
pub trait PointEvaluator {
    fn evaluate_points(&mut self, source: &str, xs: &[f64]) -> LangResult<Vec<Option<f64>>>;
}
