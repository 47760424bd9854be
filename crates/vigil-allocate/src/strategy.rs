//! Core trait definition for allocation strategies.

use crate::allocation::Allocation;
use std::fmt;
use vigil_signals::MomentumTable;
use vigil_traits::{Result, Symbol, VigilError};

/// Turns one period's momentum scores into an allocation.
///
/// Strategies are memoryless: the allocation for a period depends only on
/// that period's table. All implementations must be thread-safe
/// (`Send + Sync`) so that strategies can be replayed in parallel.
///
/// # Examples
///
/// ```rust,no_run
/// use vigil_allocate::{Allocation, AllocationStrategy};
/// use vigil_signals::MomentumTable;
/// use vigil_traits::Symbol;
///
/// #[derive(Debug)]
/// struct AlwaysCash;
///
/// impl AllocationStrategy for AlwaysCash {
///     fn name(&self) -> &str {
///         "cash"
///     }
///
///     fn assets(&self) -> Vec<Symbol> {
///         Vec::new()
///     }
///
///     fn max_holdings(&self) -> usize {
///         0
///     }
///
///     fn allocate(&self, _scores: &MomentumTable) -> vigil_traits::Result<Allocation> {
///         Ok(Allocation::Cash)
///     }
/// }
/// ```
pub trait AllocationStrategy: Send + Sync + fmt::Debug {
    /// Name of this strategy, used in reports.
    fn name(&self) -> &str;

    /// Symbols the strategy reads scores for and may hold.
    fn assets(&self) -> Vec<Symbol>;

    /// Most assets held at once.
    fn max_holdings(&self) -> usize;

    /// Whether [`allocate`](AllocationStrategy::allocate) reads the scores.
    ///
    /// Static portfolios return `false` and can be run without warm-up.
    fn needs_scores(&self) -> bool {
        true
    }

    /// Chooses the allocation for one period.
    ///
    /// # Errors
    ///
    /// Returns [`VigilError::InsufficientData`] if a score the rule needs is
    /// absent from the table.
    fn allocate(&self, scores: &MomentumTable) -> Result<Allocation>;
}

/// Scores of `symbols`, in order.
pub(crate) fn require_scores<'a>(
    table: &MomentumTable,
    symbols: &'a [Symbol],
) -> Result<Vec<(&'a Symbol, f64)>> {
    symbols
        .iter()
        .map(|symbol| {
            table.score(symbol).map(|s| (symbol, s)).ok_or_else(|| {
                VigilError::InsufficientData(format!("no momentum score for {symbol}"))
            })
        })
        .collect()
}

/// Highest-scoring entry; the earliest wins ties.
pub(crate) fn best<'a>(scored: &[(&'a Symbol, f64)]) -> Option<&'a Symbol> {
    let mut best: Option<(&Symbol, f64)> = None;
    for &(symbol, score) in scored {
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((symbol, score)),
        }
    }
    best.map(|(symbol, _)| symbol)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_best_prefers_first_on_tie() {
        let a = "A".to_string();
        let b = "B".to_string();
        let c = "C".to_string();
        assert_eq!(best(&[(&a, 0.1), (&b, 0.3), (&c, 0.3)]), Some(&b));
        assert_eq!(best(&[(&a, -0.2), (&b, -0.1)]), Some(&b));
        assert_eq!(best(&[]), None);
    }

    #[test]
    fn test_require_scores_missing() {
        let table = MomentumTable::default();
        let symbols = vec!["SPY".to_string()];
        let result = require_scores(&table, &symbols);
        assert!(matches!(result, Err(VigilError::InsufficientData(_))));
    }

    #[test]
    fn test_strategy_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn AllocationStrategy>();
    }
}
