//! Financial Modeling Prep (FMP) API client for vigil.
//!
//! This crate fetches daily end-of-day prices from the
//! [Financial Modeling Prep](https://financialmodelingprep.com/) API and
//! turns them into [`MarketData`](vigil_traits::MarketData), which the
//! momentum scorer and backtester read through the
//! [`PriceSource`](vigil_traits::PriceSource) trait.
//!
//! # Usage
//!
//! ```rust,ignore
//! use vigil_fmp::FmpClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = FmpClient::from_env()?;
//!
//!     // Daily prices for the whole universe, dividend adjusted
//!     let symbols = vec!["SPY".to_string(), "AGG".to_string()];
//!     let data = client.market_data(&symbols, None, None).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Environment Variables
//!
//! Set `FMP_API_KEY` in your environment or `.env` file:
//!
//! ```bash
//! FMP_API_KEY=your_api_key_here
//! ```

mod client;
mod error;
mod types;

pub use client::FmpClient;
pub use error::FmpError;
pub use types::HistoricalPrice;

/// Result type for FMP operations.
pub type Result<T> = std::result::Result<T, FmpError>;
