use std::f64::consts;
use std::fmt;

/// Names the parser accepts as a namespace qualifier (`np.sin`, `math.pi`).
pub const QUALIFIERS: &[&str] = &["np", "math"];

/// The one free variable of a graphed function.
pub const VARIABLE: &str = "x";

/// Built-in mathematical constants.
pub const CONSTANTS: &[(&str, f64)] = &[
    ("pi", consts::PI),
    ("\u{03C0}", consts::PI), // π
    ("e", consts::E),
    ("tau", consts::TAU),
    ("\u{03C4}", consts::TAU), // τ
];

/// A whitelisted function of one argument.
#[derive(Clone, Copy)]
pub struct UnaryFn {
    pub name: &'static str,
    pub func: fn(f64) -> f64,
}

/// A whitelisted function of two arguments.
#[derive(Clone, Copy)]
pub struct BinaryFn {
    pub name: &'static str,
    pub func: fn(f64, f64) -> f64,
}

impl fmt::Debug for UnaryFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/1", self.name)
    }
}

impl fmt::Debug for BinaryFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/2", self.name)
    }
}

/// What a name resolves to.
#[derive(Debug, Clone, Copy)]
pub enum Builtin {
    Const(f64),
    /// A function callable with one argument, two, or both (`log`).
    Func {
        unary: Option<UnaryFn>,
        binary: Option<BinaryFn>,
    },
}

const MATH_UNARY: &[(&str, fn(f64) -> f64)] = &[
    ("sin", f64::sin),
    ("cos", f64::cos),
    ("tan", f64::tan),
    ("asin", f64::asin),
    ("acos", f64::acos),
    ("atan", f64::atan),
    ("arcsin", f64::asin),
    ("arccos", f64::acos),
    ("arctan", f64::atan),
    ("sinh", f64::sinh),
    ("cosh", f64::cosh),
    ("tanh", f64::tanh),
    ("exp", f64::exp),
    ("ln", f64::ln),
    ("log", f64::ln),
    ("log10", f64::log10),
    ("log2", f64::log2),
    ("sqrt", f64::sqrt),
    ("cbrt", f64::cbrt),
    ("abs", f64::abs),
    ("fabs", f64::abs),
    ("floor", f64::floor),
    ("ceil", f64::ceil),
    ("round", f64::round_ties_even),
    ("sign", sign),
];

const MATH_BINARY: &[(&str, fn(f64, f64) -> f64)] = &[
    ("log", log_base),
    ("pow", f64::powf),
    ("atan2", f64::atan2),
    ("arctan2", f64::atan2),
    ("hypot", f64::hypot),
    ("min", f64::min),
    ("max", f64::max),
];

/// Resolve a name against the whitelist. Anything else is not reachable
/// from an expression.
pub fn lookup(name: &str) -> Option<Builtin> {
    if let Some(&(_, value)) = CONSTANTS.iter().find(|(n, _)| *n == name) {
        return Some(Builtin::Const(value));
    }

    let unary = MATH_UNARY
        .iter()
        .find(|(n, _)| *n == name)
        .map(|&(name, func)| UnaryFn { name, func });
    let binary = MATH_BINARY
        .iter()
        .find(|(n, _)| *n == name)
        .map(|&(name, func)| BinaryFn { name, func });

    if unary.is_none() && binary.is_none() {
        None
    } else {
        Some(Builtin::Func { unary, binary })
    }
}

/// Every name an expression may use, for completion or help text.
pub fn known_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = std::iter::once(VARIABLE)
        .chain(CONSTANTS.iter().map(|(n, _)| *n))
        .chain(MATH_UNARY.iter().map(|(n, _)| *n))
        .chain(MATH_BINARY.iter().map(|(n, _)| *n))
        .collect();
    names.sort_unstable();
    names.dedup();
    names
}

/// `sign(0) == 0`, unlike `f64::signum`.
fn sign(x: f64) -> f64 {
    if x == 0.0 || x.is_nan() {
        x
    } else {
        x.signum()
    }
}

/// `log(x, base)`, argument order as in Python's `math.log`.
fn log_base(x: f64, base: f64) -> f64 {
    x.log(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_constant() {
        match lookup("pi") {
            Some(Builtin::Const(v)) => assert_eq!(v, consts::PI),
            other => panic!("expected constant, got {:?}", other),
        }
        assert!(matches!(lookup("\u{03C0}"), Some(Builtin::Const(_))));
    }

    #[test]
    fn test_log_has_both_arities() {
        match lookup("log") {
            Some(Builtin::Func { unary, binary }) => {
                assert!(unary.is_some());
                assert!(binary.is_some());
                assert!(((binary.unwrap().func)(8.0, 2.0) - 3.0).abs() < 1e-12);
            }
            other => panic!("expected function, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_names_do_not_resolve() {
        for name in ["eval", "__import__", "open", "os", "x", "np", "print"] {
            assert!(lookup(name).is_none(), "{} should not resolve", name);
        }
    }

    #[test]
    fn test_sign_of_zero() {
        assert_eq!(sign(0.0), 0.0);
        assert_eq!(sign(-3.0), -1.0);
        assert_eq!(sign(2.5), 1.0);
    }

    #[test]
    fn test_known_names_sorted_and_unique() {
        let names = known_names();
        assert!(names.contains(&"x"));
        assert!(names.contains(&"sqrt"));
        let mut sorted = names.clone();
        sorted.dedup();
        assert_eq!(sorted.len(), names.len());
    }
}
