//! Backtesting and performance evaluation for vigil.
//!
//! This crate replays allocation strategies over historical prices and
//! summarizes the outcome:
//! - Period and cumulative return series anchored at 1.0
//! - A backtest engine that decides at `t` and realizes at `t + 1`
//! - CAGR, maximum drawdown, their ratio, volatility and Sharpe
//!
//! # Example
//!
//! ```rust,ignore
//! use vigil_allocate::{FixedWeights, Vigilant};
//! use vigil_eval::{Backtest, BacktestConfig};
//! use vigil_signals::VaaMomentum;
//!
//! let backtest = Backtest::new(BacktestConfig::default(), VaaMomentum::default());
//! let vaa = Vigilant::default();
//! let spy = FixedWeights::buy_and_hold("SPY");
//! let comparison = backtest.compare(&panel, &[&vaa, &spy])?;
//! println!("{}", comparison.stats());
//! ```

pub mod backtest;
pub mod metrics;
pub mod series;

// Re-export main types
pub use backtest::{Backtest, BacktestConfig, BacktestResult, Comparison, PeriodAllocation};
pub use metrics::{
    PerformanceStats, StatsTable, annualized_volatility, cagr, drawdowns, max_drawdown,
    sharpe_ratio,
};
pub use series::{CumulativePoint, CumulativeReturnSeries, PeriodReturn, ReturnSeries};
