//! Error types for the Vigil framework.
//!
//! This module defines the error type used throughout the Vigil crates for
//! price validation, momentum scoring, allocation and backtesting.

use thiserror::Error;

/// The main error type for Vigil operations.
#[derive(Debug, Error)]
pub enum VigilError {
    /// Error due to invalid or malformed data.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Error when a required column is missing from the data.
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// Error from Polars operations.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Error when data is insufficient for the requested operation.
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Error when a symbol is not found in the price data.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// Error when a date is out of range or invalid.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Error fetching data from external sources.
    #[error("Data fetch error: {0}")]
    DataFetch(String),

    /// Error when a strategy name is not registered.
    #[error("Strategy not found: {0}")]
    StrategyNotFound(String),

    /// Error in static configuration (universe, weights, windows).
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Generic error for other cases.
    #[error("Error: {0}")]
    Other(String),
}

impl From<String> for VigilError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for VigilError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

/// A specialized Result type for Vigil operations.
pub type Result<T> = std::result::Result<T, VigilError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = VigilError::InsufficientData("12 months required".to_string());
        assert_eq!(err.to_string(), "Insufficient data: 12 months required");

        let err = VigilError::MissingColumn("close".to_string());
        assert_eq!(err.to_string(), "Missing required column: close");

        let err = VigilError::StrategyNotFound("vaa-x".to_string());
        assert_eq!(err.to_string(), "Strategy not found: vaa-x");
    }

    #[test]
    fn test_error_from_str() {
        let err: VigilError = "boom".into();
        assert!(matches!(err, VigilError::Other(ref s) if s == "boom"));
    }

    #[test]
    fn test_result_type() {
        let ok_result: Result<i32> = Ok(42);
        assert!(ok_result.is_ok());

        let err_result: Result<i32> = Err(VigilError::InvalidConfig("bad".to_string()));
        assert!(err_result.is_err());
    }
}
