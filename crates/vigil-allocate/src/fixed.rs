//! Static benchmark portfolios.

use crate::allocation::{Allocation, Holding};
use crate::strategy::AllocationStrategy;
use vigil_signals::MomentumTable;
use vigil_traits::{Result, Symbol, VigilError};

const WEIGHT_TOLERANCE: f64 = 1e-6;

/// A portfolio rebalanced to the same weights every period.
///
/// Scores are ignored, so the portfolio can be run from the first period of
/// a panel.
#[derive(Debug, Clone)]
pub struct FixedWeights {
    name: String,
    holdings: Vec<Holding>,
}

impl FixedWeights {
    /// Creates a benchmark from `(symbol, weight)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`VigilError::InvalidConfig`] when there are no weights, a
    /// weight is not positive and finite, a symbol repeats, or the weights do
    /// not sum to one.
    pub fn new<S: Into<Symbol>>(
        name: impl Into<String>,
        weights: impl IntoIterator<Item = (S, f64)>,
    ) -> Result<Self> {
        let name = name.into();
        let holdings: Vec<Holding> = weights
            .into_iter()
            .map(|(symbol, weight)| Holding {
                symbol: symbol.into(),
                weight,
            })
            .collect();

        if holdings.is_empty() {
            return Err(VigilError::InvalidConfig(format!("{name} has no holdings")));
        }
        for (i, h) in holdings.iter().enumerate() {
            if !(h.weight.is_finite() && h.weight > 0.0) {
                return Err(VigilError::InvalidConfig(format!(
                    "{name}: weight of {} must be positive, got {}",
                    h.symbol, h.weight
                )));
            }
            if holdings[..i].iter().any(|other| other.symbol == h.symbol) {
                return Err(VigilError::InvalidConfig(format!(
                    "{name}: {} listed twice",
                    h.symbol
                )));
            }
        }
        let total: f64 = holdings.iter().map(|h| h.weight).sum();
        if (total - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(VigilError::InvalidConfig(format!(
                "{name}: weights sum to {total}, expected 1"
            )));
        }

        Ok(Self { name, holdings })
    }

    /// 60% SPY, 40% BND.
    #[must_use]
    pub fn sixty_forty() -> Self {
        Self {
            name: "60/40".to_string(),
            holdings: vec![
                Holding {
                    symbol: "SPY".to_string(),
                    weight: 0.6,
                },
                Holding {
                    symbol: "BND".to_string(),
                    weight: 0.4,
                },
            ],
        }
    }

    /// Everything in one asset.
    #[must_use]
    pub fn buy_and_hold(symbol: impl Into<Symbol>) -> Self {
        let symbol = symbol.into();
        Self {
            name: format!("{symbol} buy & hold"),
            holdings: vec![Holding { symbol, weight: 1.0 }],
        }
    }

    /// The fixed holdings.
    #[must_use]
    pub fn holdings(&self) -> &[Holding] {
        &self.holdings
    }
}

impl AllocationStrategy for FixedWeights {
    fn name(&self) -> &str {
        &self.name
    }

    fn assets(&self) -> Vec<Symbol> {
        self.holdings.iter().map(|h| h.symbol.clone()).collect()
    }

    fn max_holdings(&self) -> usize {
        self.holdings.len()
    }

    fn needs_scores(&self) -> bool {
        false
    }

    fn allocate(&self, _scores: &MomentumTable) -> Result<Allocation> {
        Ok(Allocation::Invest(self.holdings.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sixty_forty() {
        let benchmark = FixedWeights::sixty_forty();
        assert_eq!(benchmark.name(), "60/40");
        assert!(!benchmark.needs_scores());

        let allocation = benchmark.allocate(&MomentumTable::default()).unwrap();
        assert_relative_eq!(allocation.weight("SPY"), 0.6);
        assert_relative_eq!(allocation.weight("BND"), 0.4);
    }

    #[test]
    fn test_buy_and_hold() {
        let benchmark = FixedWeights::buy_and_hold("SPY");
        assert_eq!(benchmark.name(), "SPY buy & hold");
        assert_eq!(benchmark.assets(), vec!["SPY".to_string()]);
        assert_eq!(
            benchmark.allocate(&MomentumTable::default()).unwrap(),
            Allocation::single("SPY")
        );
    }

    #[test]
    fn test_weights_validated() {
        assert!(FixedWeights::new("ok", [("SPY", 0.7), ("AGG", 0.3)]).is_ok());
        assert!(FixedWeights::new("sum", [("SPY", 0.7), ("AGG", 0.2)]).is_err());
        assert!(FixedWeights::new("neg", [("SPY", 1.2), ("AGG", -0.2)]).is_err());
        assert!(FixedWeights::new("dup", [("SPY", 0.5), ("SPY", 0.5)]).is_err());
        assert!(FixedWeights::new("empty", Vec::<(String, f64)>::new()).is_err());
    }
}
