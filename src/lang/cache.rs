use lru::LruCache;
use std::num::NonZeroUsize;
use std::rc::Rc;

use crate::lang::error::LangResult;
use crate::lang::eval::{compile, CompiledExpr};
use crate::lang::PointEvaluator;

/// Default number of compiled expressions kept around.
pub const DEFAULT_CAPACITY: usize = 64;

/// Evaluator that remembers compiled expressions, so redrawing the same
/// curves on every pan or zoom does not re-parse them.
pub struct Evaluator {
    cache: LruCache<String, LangResult<Rc<CompiledExpr>>>,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: LruCache::new(capacity),
        }
    }

    /// Compile `source`, reusing an earlier result when there is one.
    /// Failures are cached as well.
    pub fn compile(&mut self, source: &str) -> LangResult<Rc<CompiledExpr>> {
        if let Some(cached) = self.cache.get(source) {
            return cached.clone();
        }
        let compiled = compile(source).map(Rc::new);
        self.cache.put(source.to_string(), compiled.clone());
        compiled
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Clear all cached entries.
    pub fn clear(&mut self) {
        self.cache.clear();
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl PointEvaluator for Evaluator {
    fn evaluate_points(&mut self, source: &str, xs: &[f64]) -> LangResult<Vec<Option<f64>>> {
        Ok(self.compile(source)?.eval_points(xs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::error::ErrorKind;

    #[test]
    fn test_cache_reuses_compiled_expression() {
        let mut evaluator = Evaluator::new();
        let first = evaluator.compile("x**2").unwrap();
        let second = evaluator.compile("x**2").unwrap();
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(evaluator.len(), 1);
    }

    #[test]
    fn test_cache_keeps_errors() {
        let mut evaluator = Evaluator::new();
        let err = evaluator.compile("foo(x)").unwrap_err();
        assert_eq!(err.kind, ErrorKind::NameError);
        assert!(evaluator.compile("foo(x)").is_err());
        assert_eq!(evaluator.len(), 1);
    }

    #[test]
    fn test_cache_lru_eviction() {
        let mut evaluator = Evaluator::with_capacity(2);
        let a = evaluator.compile("x").unwrap();
        evaluator.compile("x + 1").unwrap();
        evaluator.compile("x + 2").unwrap();
        // "x" should have been evicted and compiled afresh
        let a_again = evaluator.compile("x").unwrap();
        assert!(!Rc::ptr_eq(&a, &a_again));
        assert_eq!(evaluator.len(), 2);
    }

    #[test]
    fn test_zero_capacity_still_works() {
        let mut evaluator = Evaluator::with_capacity(0);
        assert!(evaluator.compile("x").is_ok());
        assert_eq!(evaluator.len(), 1);
    }

    #[test]
    fn test_evaluate_points_through_cache() {
        let mut evaluator = Evaluator::new();
        let ys = evaluator.evaluate_points("1/x", &[-1.0, 0.0, 1.0]).unwrap();
        assert_eq!(ys, vec![Some(-1.0), None, Some(1.0)]);
        assert!(evaluator.evaluate_points("1/", &[1.0]).is_err());
    }

    #[test]
    fn test_cache_clear() {
        let mut evaluator = Evaluator::new();
        evaluator.compile("x").unwrap();
        evaluator.clear();
        assert!(evaluator.is_empty());
    }
}
