//! Momentum signals for the vigil asset allocation framework.
//!
//! The VAA scorer turns monthly price histories into a weighted composite of
//! 1, 3, 6 and 12 month returns. Scores feed the allocation rules in
//! `vigil-allocate` and the backtester in `vigil-eval`.
//!
//! # Example
//!
//! ```ignore
//! use vigil_signals::momentum::VaaMomentum;
//!
//! let scorer = VaaMomentum::default();
//! let table = scorer.latest(&market_data, &universe.combined())?;
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod momentum;

pub use momentum::{MomentumConfig, MomentumRecord, MomentumTable, MomentumWindow, VaaMomentum};
