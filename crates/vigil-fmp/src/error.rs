//! Error types for FMP API client.

use thiserror::Error;
use vigil_traits::VigilError;

/// Errors that can occur when using the FMP API.
#[derive(Debug, Error)]
pub enum FmpError {
    /// Missing API key.
    #[error("FMP_API_KEY environment variable not set")]
    MissingApiKey,

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("Failed to parse JSON response: {0}")]
    Json(#[from] serde_json::Error),

    /// API returned an error.
    #[error("FMP API error: {0}")]
    Api(String),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded. Free tier allows 250 requests/day.")]
    RateLimitExceeded,

    /// Symbol not found.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// No data available.
    #[error("No data available for {0}")]
    NoData(String),

    /// Fetched prices failed validation.
    #[error(transparent)]
    Data(#[from] VigilError),

    /// A fetch task failed to complete.
    #[error("Fetch task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl From<FmpError> for VigilError {
    fn from(err: FmpError) -> Self {
        match err {
            FmpError::Data(inner) => inner,
            FmpError::SymbolNotFound(symbol) => Self::SymbolNotFound(symbol),
            other => Self::DataFetch(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_vigil_error() {
        let err: VigilError = FmpError::RateLimitExceeded.into();
        assert!(matches!(err, VigilError::DataFetch(m) if m.contains("Rate limit")));

        let err: VigilError = FmpError::SymbolNotFound("XYZ".to_string()).into();
        assert!(matches!(err, VigilError::SymbolNotFound(s) if s == "XYZ"));

        let err: VigilError = FmpError::Data(VigilError::InvalidData("bad".to_string())).into();
        assert!(matches!(err, VigilError::InvalidData(_)));
    }
}
