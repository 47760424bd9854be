//! Allocation for the latest available period.

use crate::allocation::Allocation;
use crate::strategy::AllocationStrategy;
use serde::Serialize;
use std::fmt;
use tracing::info;
use vigil_signals::{MomentumTable, VaaMomentum};
use vigil_traits::{Date, PriceSource, Result, VigilError};

/// A strategy's recommendation as of the latest month of a price source.
#[derive(Debug, Clone, Serialize)]
pub struct LiveDecision {
    /// Strategy that produced the decision.
    pub strategy: String,
    /// Month the scores are computed as of.
    pub date: Option<Date>,
    /// Scores the decision was made from.
    pub scores: MomentumTable,
    /// The recommendation.
    pub allocation: Allocation,
}

impl fmt::Display for LiveDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.date {
            Some(date) => write!(f, "{} as of {date}: {}", self.strategy, self.allocation),
            None => write!(f, "{}: {}", self.strategy, self.allocation),
        }
    }
}

/// Scores the strategy's assets at the latest period of `source` and applies it.
///
/// # Errors
///
/// Returns [`VigilError::InsufficientData`] when a required asset lacks the
/// history for a score, or the source's error when a symbol cannot be read.
pub fn decide(
    source: &dyn PriceSource,
    scorer: &VaaMomentum,
    strategy: &dyn AllocationStrategy,
) -> Result<LiveDecision> {
    let scores = if strategy.needs_scores() {
        scorer.latest(source, &strategy.assets())?
    } else {
        MomentumTable::default()
    };

    if strategy.needs_scores() && !scores.is_complete() {
        return Err(VigilError::InsufficientData(format!(
            "need {} months of history for {}",
            scorer.warm_up(),
            scores.unscored().join(", ")
        )));
    }

    let allocation = strategy.allocate(&scores)?;
    info!(
        strategy = strategy.name(),
        date = ?scores.date(),
        %allocation,
        "Live decision"
    );

    Ok(LiveDecision {
        strategy: strategy.name().to_string(),
        date: scores.date(),
        scores,
        allocation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FixedWeights, Vigilant};
    use vigil_traits::{AssetUniverse, MarketData, Periodicity, PricePoint, PriceSeries};

    fn series(symbol: &str, growth: f64, months: usize) -> PriceSeries {
        series_from(symbol, growth, 0, months)
    }

    /// `months` observations starting `skip` months after January 2022.
    fn series_from(symbol: &str, growth: f64, skip: usize, months: usize) -> PriceSeries {
        let points = (skip..skip + months)
            .map(|i| {
                let first = Date::from_ymd_opt(2022 + (i / 12) as i32, (i % 12) as u32 + 1, 1).unwrap();
                PricePoint::new(
                    vigil_traits::types::month_end(first),
                    50.0 * (1.0 + growth).powi(i as i32),
                )
            })
            .collect();
        PriceSeries::new(symbol, Periodicity::Monthly, points).unwrap()
    }

    fn universe() -> AssetUniverse {
        AssetUniverse::new(["A", "B"], ["C"]).unwrap()
    }

    #[test]
    fn test_decide_switches_to_defensive() {
        let data = MarketData::from_series(&[
            series("A", 0.02, 14),
            series("B", -0.01, 14),
            series("C", 0.003, 14),
        ])
        .unwrap();
        let decision =
            decide(&data, &VaaMomentum::default(), &Vigilant::new(universe())).unwrap();

        assert_eq!(decision.allocation, Allocation::single("C"));
        assert_eq!(decision.scores.len(), 3);
        assert!(decision.date.is_some());
        assert!(decision.to_string().ends_with("invest in C"));
    }

    #[test]
    fn test_decide_all_negative_holds_cash() {
        let data = MarketData::from_series(&[
            series("A", -0.02, 14),
            series("B", -0.01, 14),
            series("C", -0.003, 14),
        ])
        .unwrap();
        let decision =
            decide(&data, &VaaMomentum::default(), &Vigilant::new(universe())).unwrap();
        assert!(decision.allocation.is_cash());
        assert!(decision.to_string().ends_with("hold cash"));
    }

    #[test]
    fn test_decide_short_history() {
        let data = MarketData::from_series(&[
            series("A", 0.02, 14),
            series_from("B", 0.01, 8, 6),
            series("C", 0.003, 14),
        ])
        .unwrap();
        let result = decide(&data, &VaaMomentum::default(), &Vigilant::new(universe()));
        assert!(matches!(result, Err(VigilError::InsufficientData(m)) if m.contains('B')));
    }

    #[test]
    fn test_decide_benchmark_skips_scoring() {
        let data = MarketData::from_series(&[series("SPY", 0.01, 2)]).unwrap();
        let decision = decide(
            &data,
            &VaaMomentum::default(),
            &FixedWeights::buy_and_hold("SPY"),
        )
        .unwrap();
        assert_eq!(decision.allocation, Allocation::single("SPY"));
        assert!(decision.scores.is_empty());
    }
}
