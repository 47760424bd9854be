//! Allocation rules for Vigilant Asset Allocation.
//!
//! This crate turns momentum scores into portfolios. It implements the
//! classical VAA switching rule, two offensive-only variants, and fixed-weight
//! benchmark portfolios behind one [`AllocationStrategy`] trait.
//!
//! # Examples
//!
//! ```rust,no_run
//! use vigil_allocate::{AllocationStrategy, Vigilant};
//! use vigil_signals::VaaMomentum;
//! use vigil_traits::{AssetUniverse, MarketData};
//!
//! # fn run(data: &MarketData) -> vigil_traits::Result<()> {
//! let strategy = Vigilant::new(AssetUniverse::default());
//! let decision = vigil_allocate::decide(data, &VaaMomentum::default(), &strategy)?;
//! println!("{decision}");
//! # Ok(())
//! # }
//! ```

mod allocation;
mod fixed;
mod live;
mod registry;
mod strategy;
mod vigilant;

// Re-export main types
pub use allocation::{Allocation, Holding};
pub use fixed::FixedWeights;
pub use live::{LiveDecision, decide};
pub use registry::{
    StrategyInfo, available_strategies, create_benchmark, create_strategy, get_strategy_info,
};
pub use strategy::AllocationStrategy;
pub use vigilant::{DualOffensive, RelativeOffensive, Vigilant};
