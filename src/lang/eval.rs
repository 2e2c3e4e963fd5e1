use crate::lang::ast::*;
use crate::lang::error::{LangError, LangResult};
use crate::lang::lexer::Lexer;
use crate::lang::parser::Parser;

/// A parsed expression, ready to be evaluated at any number of points.
#[derive(Debug, Clone)]
pub struct CompiledExpr {
    root: Expr,
}

impl CompiledExpr {
    /// Evaluate at a single `x`. Non-finite results are errors.
    pub fn eval_at(&self, x: f64) -> LangResult<f64> {
        eval_expr(&self.root, x)
    }

    /// Evaluate at every point; a failing sample becomes `None` without
    /// affecting its neighbours.
    pub fn eval_points(&self, xs: &[f64]) -> Vec<Option<f64>> {
        xs.iter().map(|&x| self.eval_at(x).ok()).collect()
    }
}

/// Lex and parse `source` into an evaluable tree.
pub fn compile(source: &str) -> LangResult<CompiledExpr> {
    let tokens = Lexer::new(source).tokenize()?;
    let root = Parser::new(tokens).parse_expression()?;
    Ok(CompiledExpr { root })
}

/// Evaluate `source` at each of `xs`. The result has the same length as
/// `xs`; if the source does not compile every sample is `None`.
pub fn evaluate(source: &str, xs: &[f64]) -> Vec<Option<f64>> {
    match compile(source) {
        Ok(compiled) => compiled.eval_points(xs),
        Err(_) => vec![None; xs.len()],
    }
}

fn eval_expr(expr: &Expr, x: f64) -> LangResult<f64> {
    match expr {
        Expr::Number(n, _) => Ok(*n),
        Expr::Var(_) => Ok(x),

        Expr::Neg { operand, .. } => Ok(-eval_expr(operand, x)?),

        Expr::BinOp { op, lhs, rhs, span } => {
            let l = eval_expr(lhs, x)?;
            let r = eval_expr(rhs, x)?;
            eval_binop(*op, l, r).map_err(|e| e.with_span(*span))
        }

        Expr::Call1 { func, arg, span } => {
            let a = eval_expr(arg, x)?;
            checked((func.func)(a), func.name).map_err(|e| e.with_span(*span))
        }

        Expr::Call2 {
            func,
            lhs,
            rhs,
            span,
        } => {
            let a = eval_expr(lhs, x)?;
            let b = eval_expr(rhs, x)?;
            checked((func.func)(a, b), func.name).map_err(|e| e.with_span(*span))
        }
    }
}

fn eval_binop(op: BinOpKind, l: f64, r: f64) -> LangResult<f64> {
    match op {
        BinOpKind::Add => checked(l + r, "+"),
        BinOpKind::Sub => checked(l - r, "-"),
        BinOpKind::Mul => checked(l * r, "*"),
        BinOpKind::Div => {
            if r == 0.0 {
                return Err(LangError::division_by_zero());
            }
            checked(l / r, "/")
        }
        BinOpKind::Mod => {
            if r == 0.0 {
                return Err(LangError::division_by_zero());
            }
            // Result takes the sign of the divisor
            let m = l % r;
            let m = if m != 0.0 && (m < 0.0) != (r < 0.0) { m + r } else { m };
            checked(m, "%")
        }
        BinOpKind::Pow => {
            if l == 0.0 && r < 0.0 {
                return Err(LangError::division_by_zero());
            }
            checked(l.powf(r), "**")
        }
    }
}

/// Reject NaN and infinite results.
fn checked(value: f64, what: &str) -> LangResult<f64> {
    if value.is_nan() {
        Err(LangError::domain(format!("{}: math domain error", what)))
    } else if value.is_infinite() {
        Err(LangError::overflow(format!("{}: result out of range", what)))
    } else {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::error::ErrorKind;

    fn eval(src: &str, x: f64) -> LangResult<f64> {
        compile(src)?.eval_at(x)
    }

    fn approx(src: &str, x: f64, expected: f64) {
        let got = eval(src, x).unwrap();
        assert!(
            (got - expected).abs() < 1e-9,
            "{} at x={}: expected {}, got {}",
            src,
            x,
            expected,
            got
        );
    }

    #[test]
    fn test_square_is_exact() {
        assert_eq!(
            evaluate("x**2", &[-2.0, -1.0, 0.0, 1.0, 2.0]),
            vec![Some(4.0), Some(1.0), Some(0.0), Some(1.0), Some(4.0)]
        );
    }

    #[test]
    fn test_reciprocal_at_zero_is_undefined() {
        assert_eq!(
            evaluate("1/x", &[-1.0, 0.0, 1.0]),
            vec![Some(-1.0), None, Some(1.0)]
        );
    }

    #[test]
    fn test_sqrt_of_negative_is_undefined() {
        assert_eq!(
            evaluate("sqrt(x)", &[-1.0, 0.0, 4.0]),
            vec![None, Some(0.0), Some(2.0)]
        );
    }

    #[test]
    fn test_syntax_error_yields_all_undefined() {
        assert_eq!(evaluate("x +* 2", &[1.0, 2.0]), vec![None, None]);
        assert_eq!(evaluate("__import__('os')", &[1.0]), vec![None]);
    }

    #[test]
    fn test_empty_input() {
        assert!(evaluate("x", &[]).is_empty());
    }

    #[test]
    fn test_precedence_and_grouping() {
        approx("2 + 3 * x", 2.0, 8.0);
        approx("(2 + 3) * x", 2.0, 10.0);
        approx("-x**2", 3.0, -9.0);
        approx("2^3^2", 0.0, 512.0);
        approx("2**-1", 0.0, 0.5);
    }

    #[test]
    fn test_implicit_multiplication() {
        approx("2x + 1", 3.0, 7.0);
        approx("3(x + 1)", 1.0, 6.0);
        approx("x(x + 1)", 2.0, 6.0);
        approx("2sin(x)", 0.0, 0.0);
        approx("2pi", 0.0, 2.0 * std::f64::consts::PI);
    }

    #[test]
    fn test_functions_and_constants() {
        approx("sin(pi/2)", 0.0, 1.0);
        approx("np.cos(x)", 0.0, 1.0);
        approx("exp(1)", 0.0, std::f64::consts::E);
        approx("log(e)", 0.0, 1.0);
        approx("log(8, 2)", 0.0, 3.0);
        approx("abs(x)", -4.0, 4.0);
        approx("|x - 5|", 2.0, 3.0);
        approx("max(x, 1)", -3.0, 1.0);
        approx("atan2(1, 1)", 0.0, std::f64::consts::FRAC_PI_4);
    }

    #[test]
    fn test_modulo_follows_divisor_sign() {
        approx("x % 3", -1.0, 2.0);
        approx("x % -3", 1.0, -2.0);
        approx("x % 3", 7.0, 1.0);
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(eval("1/x", 0.0).unwrap_err().kind, ErrorKind::DivisionByZero);
        assert_eq!(eval("x % 0", 1.0).unwrap_err().kind, ErrorKind::DivisionByZero);
        assert_eq!(eval("0**-1", 0.0).unwrap_err().kind, ErrorKind::DivisionByZero);
        assert_eq!(eval("log(x)", -1.0).unwrap_err().kind, ErrorKind::DomainError);
        assert_eq!(eval("exp(x)", 1000.0).unwrap_err().kind, ErrorKind::Overflow);
        assert_eq!(eval("x**0.5", -4.0).unwrap_err().kind, ErrorKind::DomainError);
    }

    #[test]
    fn test_overflowing_literal_is_undefined() {
        assert_eq!(evaluate("1e400", &[0.0, 1.0]), vec![None, None]);
        assert_eq!(evaluate("x * 1e400", &[0.0]), vec![None]);
    }

    #[test]
    fn test_long_operator_chain_is_undefined() {
        let chain = format!("x{}", "+x".repeat(20_000));
        assert_eq!(evaluate(&chain, &[1.0, 2.0]), vec![None, None]);
        approx(&format!("x{}", "+x".repeat(99)), 1.0, 100.0);
    }

    #[test]
    fn test_log_of_zero_is_undefined() {
        assert_eq!(evaluate("log(x)", &[0.0, 1.0]), vec![None, Some(0.0)]);
    }

    #[test]
    fn test_runtime_error_carries_span() {
        let err = eval("1 + 1/x", 0.0).unwrap_err();
        assert_eq!(err.span.map(|s| (s.start, s.end)), Some((4, 7)));
    }
}
