//! Momentum scoring.
//!
//! Trailing returns over several lookback windows are combined into one
//! weighted score per symbol:
//! - [`MomentumConfig`]: the windows and their weights
//! - [`VaaMomentum`]: the scorer, over a [`PricePanel`](vigil_traits::PricePanel)
//!   for backtests or a [`PriceSource`](vigil_traits::PriceSource) for the
//!   latest period
//! - [`MomentumTable`]: per-period records, ranked by score

mod config;
mod record;
mod vaa;

pub use config::{MomentumConfig, MomentumWindow};
pub use record::{MomentumRecord, MomentumTable, WindowReturn};
pub use vaa::VaaMomentum;
