//! Allocation decisions.

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::fmt;
use vigil_traits::Symbol;

/// One position of an allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    /// Asset held.
    pub symbol: Symbol,
    /// Fraction of the portfolio, in (0, 1].
    pub weight: f64,
}

/// The portfolio chosen for one period.
///
/// Either everything in cash, or positive weights summing to one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Allocation {
    /// No risk position; earns nothing.
    Cash,
    /// Holdings with positive weights summing to one.
    Invest(Vec<Holding>),
}

impl Allocation {
    /// Everything in one asset.
    #[must_use]
    pub fn single(symbol: impl Into<Symbol>) -> Self {
        Self::Invest(vec![Holding {
            symbol: symbol.into(),
            weight: 1.0,
        }])
    }

    /// Equal weights across `symbols`; cash when there are none.
    #[must_use]
    pub fn equal<S: Into<Symbol>>(symbols: impl IntoIterator<Item = S>) -> Self {
        let symbols: Vec<Symbol> = symbols.into_iter().map(Into::into).collect();
        if symbols.is_empty() {
            return Self::Cash;
        }
        let weight = 1.0 / symbols.len() as f64;
        Self::Invest(
            symbols
                .into_iter()
                .map(|symbol| Holding { symbol, weight })
                .collect(),
        )
    }

    /// Holdings; empty for cash.
    #[must_use]
    pub fn holdings(&self) -> &[Holding] {
        match self {
            Self::Cash => &[],
            Self::Invest(holdings) => holdings,
        }
    }

    /// Whether the allocation is all cash.
    #[must_use]
    pub fn is_cash(&self) -> bool {
        self.holdings().is_empty()
    }

    /// Weight of `symbol`, zero when not held.
    #[must_use]
    pub fn weight(&self, symbol: &str) -> f64 {
        self.holdings()
            .iter()
            .filter(|h| h.symbol == symbol)
            .map(|h| h.weight)
            .sum()
    }

    /// Weights laid out along `symbols`.
    #[must_use]
    pub fn to_weights(&self, symbols: &[Symbol]) -> Array1<f64> {
        symbols.iter().map(|s| self.weight(s)).collect()
    }
}

impl fmt::Display for Allocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.holdings() {
            [] => write!(f, "hold cash"),
            [only] => write!(f, "invest in {}", only.symbol),
            many => {
                write!(f, "invest in ")?;
                for (i, h) in many.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{} ({:.1}%)", h.symbol, h.weight * 100.0)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_single() {
        let allocation = Allocation::single("SPY");
        assert!(!allocation.is_cash());
        assert_relative_eq!(allocation.weight("SPY"), 1.0);
        assert_relative_eq!(allocation.weight("AGG"), 0.0);
        assert_eq!(allocation.to_string(), "invest in SPY");
    }

    #[test]
    fn test_equal() {
        let allocation = Allocation::equal(["SPY", "VEA"]);
        assert_relative_eq!(allocation.weight("VEA"), 0.5);
        assert_eq!(allocation.to_string(), "invest in SPY (50.0%), VEA (50.0%)");
        assert!(Allocation::equal(Vec::<String>::new()).is_cash());
    }

    #[test]
    fn test_cash() {
        let allocation = Allocation::Cash;
        assert!(allocation.is_cash());
        assert!(allocation.holdings().is_empty());
        assert_eq!(allocation.to_string(), "hold cash");
    }

    #[test]
    fn test_to_weights() {
        let symbols = vec!["SPY".to_string(), "VEA".to_string(), "SHY".to_string()];
        let weights = Allocation::single("SHY").to_weights(&symbols);
        assert_eq!(weights.to_vec(), vec![0.0, 0.0, 1.0]);
        assert_relative_eq!(Allocation::Cash.to_weights(&symbols).sum(), 0.0);
    }

    #[test]
    fn test_json_shape() {
        assert_eq!(serde_json::to_string(&Allocation::Cash).unwrap(), r#""cash""#);

        let json = serde_json::to_value(Allocation::equal(["SPY", "VEA"])).unwrap();
        assert_eq!(json["invest"][1]["symbol"], "VEA");
        assert_eq!(json["invest"][0]["weight"], 0.5);

        let parsed: Allocation =
            serde_json::from_str(r#"{"invest":[{"symbol":"SHY","weight":1.0}]}"#).unwrap();
        assert_eq!(parsed, Allocation::single("SHY"));
    }
}
