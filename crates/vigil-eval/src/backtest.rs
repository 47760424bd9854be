//! Backtesting framework.
//!
//! Replays an allocation strategy over a price panel period by period: the
//! allocation decided with prices through period `t` earns the return from `t`
//! to `t + 1`. The last period has no forward return and makes no decision.

use crate::metrics::{PerformanceStats, StatsTable};
use crate::series::{CumulativeReturnSeries, PeriodReturn, ReturnSeries};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use tracing::{debug, info};
use vigil_allocate::{Allocation, AllocationStrategy};
use vigil_signals::{MomentumTable, VaaMomentum};
use vigil_traits::{Date, Periodicity, PricePanel, Result, Symbol, VigilError};

/// Backtesting configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BacktestConfig {
    /// First decision period; earlier prices still feed the warm-up.
    pub start: Option<Date>,
    /// Prices after this date are ignored.
    pub end: Option<Date>,
}

/// The allocation chosen at one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodAllocation {
    /// Decision period.
    pub date: Date,
    /// Allocation held until the next period.
    pub allocation: Allocation,
}

/// Backtesting results of one strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestResult {
    /// Strategy name.
    pub strategy: String,
    /// Sampling frequency of the replayed panel.
    pub periodicity: Periodicity,
    /// Assets the strategy chose from.
    pub assets: Vec<Symbol>,
    /// Allocation at each decision period.
    pub allocations: Vec<PeriodAllocation>,
    /// Realized portfolio returns.
    pub returns: ReturnSeries,
    /// Growth of one unit from the first decision period.
    pub cumulative: CumulativeReturnSeries,
    /// Average fraction of the portfolio traded per rebalance.
    pub avg_turnover: f64,
}

impl BacktestResult {
    /// Performance statistics of the cumulative series.
    #[must_use]
    pub fn stats(&self) -> PerformanceStats {
        PerformanceStats::from_cumulative(&self.strategy, &self.cumulative, self.periodicity)
    }

    /// First decision period.
    #[must_use]
    pub fn start(&self) -> Option<Date> {
        self.cumulative.start()
    }

    /// The result restricted to decisions on or after `date`, rebased to 1.0.
    ///
    /// # Errors
    ///
    /// Returns [`VigilError::InsufficientData`] when no decision remains.
    pub fn starting_at(&self, date: Date) -> Result<Self> {
        let allocations: Vec<PeriodAllocation> = self
            .allocations
            .iter()
            .filter(|a| a.date >= date)
            .cloned()
            .collect();
        let returns = ReturnSeries::new(
            self.returns
                .returns()
                .iter()
                .filter(|r| r.decided >= date)
                .copied()
                .collect(),
        );
        let cumulative = returns.compound().map_err(|_| {
            VigilError::InsufficientData(format!(
                "{} has no decisions on or after {date}",
                self.strategy
            ))
        })?;
        let avg_turnover = average_turnover(&allocations, &self.assets);

        Ok(Self {
            strategy: self.strategy.clone(),
            periodicity: self.periodicity,
            assets: self.assets.clone(),
            allocations,
            returns,
            cumulative,
            avg_turnover,
        })
    }
}

/// Several strategies replayed over the same panel and aligned on one start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comparison {
    /// Common first decision period.
    pub start: Date,
    /// Results in the order the strategies were given.
    pub results: Vec<BacktestResult>,
}

impl Comparison {
    /// Statistics of every result, ranked by CAGR/MDD.
    #[must_use]
    pub fn stats(&self) -> StatsTable {
        StatsTable::new(self.results.iter().map(BacktestResult::stats).collect())
    }

    /// Result of `strategy`.
    #[must_use]
    pub fn get(&self, strategy: &str) -> Option<&BacktestResult> {
        self.results.iter().find(|r| r.strategy == strategy)
    }
}

/// Backtesting engine.
#[derive(Debug, Default)]
pub struct Backtest {
    /// Configuration
    config: BacktestConfig,
    scorer: VaaMomentum,
}

impl Backtest {
    /// Create a new backtest with configuration and momentum scorer.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use vigil_eval::{Backtest, BacktestConfig};
    /// use vigil_signals::VaaMomentum;
    ///
    /// let backtest = Backtest::new(BacktestConfig::default(), VaaMomentum::default());
    /// let result = backtest.run(&panel, &strategy)?;
    /// println!("{}", result.stats().cagr);
    /// ```
    pub const fn new(config: BacktestConfig, scorer: VaaMomentum) -> Self {
        Self { config, scorer }
    }

    /// The configuration.
    pub const fn config(&self) -> &BacktestConfig {
        &self.config
    }

    /// Run the backtest of one strategy.
    ///
    /// Periods before the strategy's assets all have scores are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`VigilError::SymbolNotFound`] when a strategy asset is not in
    /// the panel and [`VigilError::InsufficientData`] when no period can be
    /// decided and realized.
    pub fn run(&self, panel: &PricePanel, strategy: &dyn AllocationStrategy) -> Result<BacktestResult> {
        let panel: Cow<'_, PricePanel> = match self.config.end {
            Some(end) => Cow::Owned(panel.until(end)?),
            None => Cow::Borrowed(panel),
        };

        let assets = strategy.assets();
        let columns = assets
            .iter()
            .map(|symbol| {
                panel
                    .index_of(symbol)
                    .ok_or_else(|| VigilError::SymbolNotFound(symbol.clone()))
            })
            .collect::<Result<Vec<usize>>>()?;

        let mut allocations = Vec::new();
        let mut returns = Vec::new();
        let mut skipped = 0usize;

        for t in 0..panel.len().saturating_sub(1) {
            let date = panel.dates()[t];
            if self.config.start.is_some_and(|start| date < start) {
                continue;
            }

            let table = if strategy.needs_scores() {
                self.scorer.table_at(&panel, t, &assets)?
            } else {
                MomentumTable::new(Some(date), Vec::new())
            };
            if strategy.needs_scores() && !table.is_complete() {
                skipped += 1;
                continue;
            }

            let allocation = strategy.allocate(&table)?;
            let weights = allocation.to_weights(&assets);
            let forward = columns
                .iter()
                .map(|&col| {
                    panel.forward_return(t, col).ok_or_else(|| {
                        VigilError::InsufficientData(format!("no price after {date}"))
                    })
                })
                .collect::<Result<Array1<f64>>>()?;
            let value = weights.dot(&forward);
            let realized = panel.dates()[t + 1];

            debug!(
                strategy = strategy.name(),
                %date,
                %allocation,
                value,
                "Realized period"
            );

            returns.push(PeriodReturn {
                decided: date,
                realized,
                value,
            });
            allocations.push(PeriodAllocation { date, allocation });
        }

        if returns.is_empty() {
            return Err(VigilError::InsufficientData(format!(
                "{} has no usable periods in {} periods of prices",
                strategy.name(),
                panel.len()
            )));
        }

        let returns = ReturnSeries::new(returns);
        let cumulative = returns.compound()?;
        let avg_turnover = average_turnover(&allocations, &assets);

        info!(
            strategy = strategy.name(),
            periods = returns.len(),
            skipped,
            final_value = cumulative.final_value(),
            "Backtest complete"
        );

        Ok(BacktestResult {
            strategy: strategy.name().to_string(),
            periodicity: panel.periodicity(),
            assets,
            allocations,
            returns,
            cumulative,
            avg_turnover,
        })
    }

    /// Runs several strategies and aligns them on the latest first decision.
    ///
    /// # Errors
    ///
    /// Propagates the first failing run; returns
    /// [`VigilError::InvalidData`] when no strategies are given.
    pub fn compare(
        &self,
        panel: &PricePanel,
        strategies: &[&dyn AllocationStrategy],
    ) -> Result<Comparison> {
        let results = strategies
            .iter()
            .map(|strategy| self.run(panel, *strategy))
            .collect::<Result<Vec<_>>>()?;

        let Some(start) = results.iter().filter_map(BacktestResult::start).max() else {
            return Err(VigilError::InvalidData(
                "no strategies to compare".to_string(),
            ));
        };

        let results = results
            .iter()
            .map(|r| r.starting_at(start))
            .collect::<Result<Vec<_>>>()?;

        debug!(%start, strategies = results.len(), "Aligned comparison");
        Ok(Comparison { start, results })
    }
}

/// Average of half the L1 weight change between consecutive allocations.
fn average_turnover(allocations: &[PeriodAllocation], assets: &[Symbol]) -> f64 {
    let weights: Vec<Array1<f64>> = allocations
        .iter()
        .map(|a| a.allocation.to_weights(assets))
        .collect();
    let turnovers: Vec<f64> = weights
        .windows(2)
        .map(|w| calculate_turnover(&w[0], &w[1]))
        .collect();
    if turnovers.is_empty() {
        0.0
    } else {
        turnovers.iter().sum::<f64>() / turnovers.len() as f64
    }
}

/// Calculate turnover between old and new positions.
fn calculate_turnover(old_positions: &Array1<f64>, new_positions: &Array1<f64>) -> f64 {
    (new_positions - old_positions).mapv(f64::abs).sum() / 2.0
}
