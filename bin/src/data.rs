//! Data loading utilities for the vigil CLI.

use anyhow::{Context, Result};
use chrono::{Datelike, Months, NaiveDate, Utc};
use tracing::info;
use vigil_fmp::FmpClient;
use vigil_traits::types::month_end;
use vigil_traits::{MarketData, Symbol, VigilError};

/// Load daily market data for the given symbols from FMP.
///
/// Any symbol that cannot be fetched fails the whole load.
pub(crate) async fn load_market_data(
    symbols: &[Symbol],
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<MarketData> {
    let client = FmpClient::from_env()?;
    info!(symbols = symbols.len(), ?from, ?to, "Fetching prices from FMP");
    client
        .market_data(symbols, from, to)
        .await
        .context("Failed to load prices")
}

/// First day to fetch so that `date` has `months` of monthly history before it.
pub(crate) fn warm_up_start(date: NaiveDate, months: usize) -> NaiveDate {
    let months = u32::try_from(months + 2).unwrap_or(u32::MAX);
    date.checked_sub_months(Months::new(months))
        .unwrap_or(NaiveDate::MIN)
}

/// Today in UTC.
pub(crate) fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Latest month-end on or before `date`.
pub(crate) fn completed_month_end(date: NaiveDate) -> NaiveDate {
    if month_end(date) == date {
        return date;
    }
    date.with_day(1)
        .and_then(|first| first.pred_opt())
        .unwrap_or(date)
}

/// Last month-end strictly before today, so the current month never counts.
pub(crate) fn last_closed_month() -> NaiveDate {
    let today = today();
    today
        .with_day(1)
        .and_then(|first| first.pred_opt())
        .unwrap_or(today)
}

/// Parse a date string in YYYY-MM-DD format.
pub(crate) fn parse_date(date_str: &str) -> Result<NaiveDate, VigilError> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|e| VigilError::InvalidDate(format!("{date_str}: {e}")))
}

/// Symbols in first-seen order, without repeats.
pub(crate) fn unique_symbols<'a>(lists: impl IntoIterator<Item = &'a [Symbol]>) -> Vec<Symbol> {
    let mut symbols: Vec<Symbol> = Vec::new();
    for list in lists {
        for symbol in list {
            if !symbols.contains(symbol) {
                symbols.push(symbol.clone());
            }
        }
    }
    symbols
}
