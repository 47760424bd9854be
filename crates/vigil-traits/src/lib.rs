#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/vigil/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core types and trait definitions for the Vigil asset allocation framework.
//!
//! This crate provides the foundational abstractions shared by the momentum
//! scorer, the allocation strategies and the backtester: price series and
//! panels, the asset universe, and the price source.

/// The version of the vigil-traits crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Module declarations
pub mod error;
pub mod panel;
pub mod signal;
pub mod source;
pub mod types;
pub mod universe;

// Re-exports
pub use error::{Result, VigilError};
pub use panel::PricePanel;
pub use signal::Signal;
pub use source::PriceSource;
pub use types::{Date, MarketData, Periodicity, PricePoint, PriceSeries, Symbol};
pub use universe::AssetUniverse;
