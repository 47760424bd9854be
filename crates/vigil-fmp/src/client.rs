//! FMP API client implementation.

use crate::{Result, error::FmpError, types::HistoricalPrice};
use chrono::NaiveDate;
use reqwest::Client;
use std::env;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};
use vigil_traits::{MarketData, Periodicity, PricePoint, PriceSeries, Symbol};

/// Base URL for the FMP stable API.
const FMP_BASE_URL: &str = "https://financialmodelingprep.com/stable";

/// Financial Modeling Prep API client.
#[derive(Debug, Clone)]
pub struct FmpClient {
    client: Client,
    api_key: String,
}

impl FmpClient {
    /// Create a new FMP client with the given API key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
        }
    }

    /// Create a new FMP client from the `FMP_API_KEY` environment variable.
    ///
    /// This will also load from a `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment variable is not set.
    pub fn from_env() -> Result<Self> {
        // Try to load .env file (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_key = env::var("FMP_API_KEY").map_err(|_| FmpError::MissingApiKey)?;

        Ok(Self::new(api_key))
    }

    /// Build a URL with the API key.
    fn url(&self, endpoint: &str) -> String {
        if endpoint.contains('?') {
            format!("{FMP_BASE_URL}/{endpoint}&apikey={}", self.api_key)
        } else {
            format!("{FMP_BASE_URL}/{endpoint}?apikey={}", self.api_key)
        }
    }

    /// Make a GET request and parse the JSON response.
    async fn get<T: serde::de::DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let url = self.url(endpoint);
        debug!(endpoint, "FMP request");
        let response = self.client.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(FmpError::RateLimitExceeded);
        }

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(FmpError::Api(format!("HTTP {status}: {text}")));
        }

        let text = response.text().await?;

        // Check for error responses
        if text.contains("\"Error Message\"") || text.contains("\"error\"") {
            return Err(FmpError::Api(text));
        }

        serde_json::from_str(&text).map_err(|e| {
            FmpError::Json(serde_json::Error::io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Failed to parse: {e}. Response: {text}"),
            )))
        })
    }

    /// Get historical daily prices for a symbol, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn historical_prices(
        &self,
        symbol: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<HistoricalPrice>> {
        let endpoint = eod_endpoint(symbol, from, to);
        // The stable API returns a flat array, not a wrapped response
        self.get(&endpoint).await
    }

    /// Get the daily price series of a symbol.
    ///
    /// # Errors
    ///
    /// Returns [`FmpError::SymbolNotFound`] when the API returns no rows,
    /// [`FmpError::NoData`] when none of them are usable, or the request or
    /// validation error.
    pub async fn price_series(
        &self,
        symbol: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<PriceSeries> {
        let rows = self.historical_prices(symbol, from, to).await?;
        to_series(symbol, &rows)
    }

    /// Fetch daily prices for several symbols into one frame.
    ///
    /// Symbols are fetched concurrently. Any symbol that fails aborts the
    /// whole fetch.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered.
    pub async fn market_data(
        &self,
        symbols: &[Symbol],
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<MarketData> {
        let mut tasks = JoinSet::new();
        for (i, symbol) in symbols.iter().enumerate() {
            let client = self.clone();
            let symbol = symbol.clone();
            tasks.spawn(async move { (i, client.price_series(&symbol, from, to).await) });
        }

        let mut fetched: Vec<(usize, PriceSeries)> = Vec::with_capacity(symbols.len());
        while let Some(joined) = tasks.join_next().await {
            let (i, series) = joined?;
            fetched.push((i, series?));
        }
        fetched.sort_by_key(|(i, _)| *i);
        let series: Vec<PriceSeries> = fetched.into_iter().map(|(_, s)| s).collect();

        info!(
            symbols = series.len(),
            rows = series.iter().map(PriceSeries::len).sum::<usize>(),
            "Fetched daily prices"
        );
        Ok(MarketData::from_series(&series)?)
    }
}

fn eod_endpoint(symbol: &str, from: Option<NaiveDate>, to: Option<NaiveDate>) -> String {
    let mut params = String::new();
    if let Some(f) = from {
        params.push_str(&format!("&from={}", f.format("%Y-%m-%d")));
    }
    if let Some(t) = to {
        params.push_str(&format!("&to={}", t.format("%Y-%m-%d")));
    }
    format!(
        "historical-price-eod/full?symbol={}{}",
        symbol.to_uppercase(),
        params
    )
}

/// An empty response means FMP does not know the symbol; rows that exist
/// but cannot be parsed mean it has no usable data.
fn to_series(symbol: &str, rows: &[HistoricalPrice]) -> Result<PriceSeries> {
    if rows.is_empty() {
        return Err(FmpError::SymbolNotFound(symbol.to_string()));
    }
    let mut points = Vec::with_capacity(rows.len());
    for row in rows {
        match row.parsed_date() {
            Some(date) => points.push(PricePoint::new(date, row.price())),
            None => warn!(symbol, date = %row.date, "Skipping row with unparseable date"),
        }
    }
    if points.is_empty() {
        return Err(FmpError::NoData(symbol.to_string()));
    }
    Ok(PriceSeries::new(symbol, Periodicity::Daily, points)?)
}
