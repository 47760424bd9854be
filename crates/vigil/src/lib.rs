#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/vigil/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! ## Quick Start
//!
//! ```ignore
//! use vigil::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let universe = AssetUniverse::default();
//! let panel = PricePanel::from_source(&market_data, &universe.combined(), Periodicity::Monthly)?;
//!
//! let vaa = Vigilant::new(universe);
//! let spy = FixedWeights::buy_and_hold("SPY");
//! let backtest = Backtest::new(BacktestConfig::default(), VaaMomentum::default());
//! let comparison = backtest.compare(&panel, &[&vaa, &spy])?;
//! println!("{}", comparison.stats());
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! 1. A **price source** supplies monthly prices per symbol
//! 2. The **momentum scorer** turns them into weighted 1/3/6/12 month scores
//! 3. An **allocation strategy** picks an asset, a basket or cash from the scores
//! 4. The **backtester** realizes each decision against the next month's returns
//! 5. **Performance metrics** summarize the cumulative series

/// Version information for the vigil crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Core Types
// ============================================================================

/// Core types and traits.
///
/// Price series and panels, the asset universe, and the [`PriceSource`] and
/// [`Signal`] traits.
pub mod traits {
    pub use vigil_traits::*;
}

// Re-export core traits at top level for convenience
pub use vigil_allocate::AllocationStrategy;
pub use vigil_traits::{PriceSource, Signal};

// Re-export error types
pub use vigil_traits::{Result, VigilError};

// Re-export common types
pub use vigil_traits::{AssetUniverse, Date, MarketData, Periodicity, PricePanel, Symbol};

// ============================================================================
// Momentum
// ============================================================================

/// Composite momentum scoring.
///
/// ```text
/// score = 12 * r1 + 4 * r3 + 2 * r6 + 1 * r12
/// ```
///
/// where `rk` is the trailing `k`-month return. The score is undefined until
/// twelve months of history exist.
pub mod signals {
    pub use vigil_signals::*;
}

// ============================================================================
// Allocation
// ============================================================================

/// Allocation rules and benchmarks.
///
/// ## Available Strategies
///
/// - **vaa**: best offensive asset; best defensive asset or cash when any
///   offensive score is negative
/// - **vaa-relative**: top N offensive assets, equally weighted
/// - **vaa-dual**: best non-negative offensive asset, otherwise cash
/// - **FixedWeights**: static benchmark portfolios such as 60/40
pub mod allocate {
    pub use vigil_allocate::*;
}

// ============================================================================
// Evaluation
// ============================================================================

/// Backtesting and performance metrics.
///
/// ### CAGR
///
/// ```text
/// CAGR = (final / initial)^(1 / years) - 1
/// ```
///
/// ### Maximum drawdown
///
/// ```text
/// MDD = min_t (value_t - peak_t) / peak_t
/// ```
///
/// Strategies are ranked by `|CAGR / MDD|`; a series that never draws down
/// has no ratio and ranks last.
pub mod eval {
    pub use vigil_eval::*;
}

// ============================================================================
// Data Providers
// ============================================================================

/// Financial Modeling Prep (FMP) price client.
///
/// ## Setup
///
/// 1. Get a free API key at <https://financialmodelingprep.com/>
/// 2. Set the `FMP_API_KEY` environment variable or add to `.env` file
pub mod fmp {
    pub use vigil_fmp::*;
}

// ============================================================================
// Prelude
// ============================================================================

/// Prelude module for convenient imports.
///
/// ```ignore
/// use vigil::prelude::*;
/// ```
pub mod prelude {
    pub use crate::traits::*;
    pub use vigil_allocate::{
        Allocation, AllocationStrategy, DualOffensive, FixedWeights, RelativeOffensive, Vigilant,
    };
    pub use vigil_eval::{Backtest, BacktestConfig, BacktestResult, Comparison, StatsTable};
    pub use vigil_signals::{MomentumConfig, MomentumTable, VaaMomentum};
}

// ============================================================================
// Tests
// ============================================================================
