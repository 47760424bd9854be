//! Common types used throughout the Vigil framework.
//!
//! This module defines the core data types for representing symbols, periods
//! and price histories, and the [`MarketData`] frame handed out by price
//! providers.

use crate::{Result, VigilError};
use chrono::{Datelike, Months};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

// Re-export date type from chrono
pub use chrono::NaiveDate as Date;

/// A market symbol identifier, e.g. "SPY" or "AGG".
pub type Symbol = String;

/// Days between 0001-01-01 (CE) and the Unix epoch.
///
/// Polars stores dates as days since the Unix epoch while chrono counts from
/// the common era.
pub const CE_TO_UNIX_EPOCH_DAYS: i32 = 719_163;

/// Sampling frequency of a price series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Periodicity {
    /// One observation per trading day.
    Daily,
    /// One observation per calendar month (month-end).
    #[default]
    Monthly,
}

impl Periodicity {
    /// Number of periods in one year, used to annualize statistics.
    #[must_use]
    pub const fn periods_per_year(&self) -> usize {
        match self {
            Self::Daily => 252,
            Self::Monthly => 12,
        }
    }

    /// Lowercase name of the periodicity.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Monthly => "monthly",
        }
    }
}

impl fmt::Display for Periodicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single (period, price) observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Period label.
    pub date: Date,
    /// Closing price for the period.
    pub price: f64,
}

impl PricePoint {
    /// Create a new observation.
    #[must_use]
    pub const fn new(date: Date, price: f64) -> Self {
        Self { date, price }
    }
}

/// Trailing return `prices[t] / prices[t - lookback] - 1`.
///
/// Returns `None` when `t` is out of range, when fewer than `lookback`
/// observations precede `t`, or when either price is not a positive finite
/// number.
#[must_use]
pub fn trailing_return(prices: &[f64], t: usize, lookback: usize) -> Option<f64> {
    if lookback == 0 || t >= prices.len() {
        return None;
    }
    let past = prices[t.checked_sub(lookback)?];
    let now = prices[t];
    if past > 0.0 && past.is_finite() && now.is_finite() {
        Some(now / past - 1.0)
    } else {
        None
    }
}

/// Last calendar day of the month containing `date`.
#[must_use]
pub fn month_end(date: Date) -> Date {
    date.with_day(1)
        .and_then(|first| first.checked_add_months(Months::new(1)))
        .and_then(|next| next.pred_opt())
        .unwrap_or(date)
}

/// Ordered price history for one symbol.
///
/// Periods are strictly increasing and every price is a positive finite
/// number; both are checked on construction.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    symbol: Symbol,
    periodicity: Periodicity,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Creates a series, sorting the observations by date.
    ///
    /// # Errors
    ///
    /// Returns [`VigilError::InvalidData`] on duplicate dates or on prices
    /// that are not positive and finite.
    pub fn new(
        symbol: impl Into<Symbol>,
        periodicity: Periodicity,
        mut points: Vec<PricePoint>,
    ) -> Result<Self> {
        let symbol = symbol.into();
        points.sort_by_key(|p| p.date);

        if let Some(pair) = points.windows(2).find(|w| w[0].date == w[1].date) {
            return Err(VigilError::InvalidData(format!(
                "{symbol}: duplicate observation for {}",
                pair[0].date
            )));
        }
        if let Some(bad) = points
            .iter()
            .find(|p| !(p.price.is_finite() && p.price > 0.0))
        {
            return Err(VigilError::InvalidData(format!(
                "{symbol}: price {} on {} is not a positive number",
                bad.price, bad.date
            )));
        }

        Ok(Self {
            symbol,
            periodicity,
            points,
        })
    }

    /// The symbol this series belongs to.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Sampling frequency of the series.
    #[must_use]
    pub const fn periodicity(&self) -> Periodicity {
        self.periodicity
    }

    /// The observations, oldest first.
    #[must_use]
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// Number of observations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the series has no observations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The observation dates, oldest first.
    #[must_use]
    pub fn dates(&self) -> Vec<Date> {
        self.points.iter().map(|p| p.date).collect()
    }

    /// The prices, oldest first.
    #[must_use]
    pub fn prices(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.price).collect()
    }

    /// The most recent observation.
    #[must_use]
    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// Observations up to and including `date`.
    #[must_use]
    pub fn until(&self, date: Date) -> Self {
        Self {
            symbol: self.symbol.clone(),
            periodicity: self.periodicity,
            points: self
                .points
                .iter()
                .take_while(|p| p.date <= date)
                .copied()
                .collect(),
        }
    }

    /// Return over `lookback` periods ending at observation `index`.
    #[must_use]
    pub fn momentum_at(&self, index: usize, lookback: usize) -> Option<f64> {
        let prices = self.prices();
        trailing_return(&prices, index, lookback)
    }

    /// Return over `lookback` periods ending at the latest observation.
    #[must_use]
    pub fn momentum(&self, lookback: usize) -> Option<f64> {
        self.len()
            .checked_sub(1)
            .and_then(|last| self.momentum_at(last, lookback))
    }

    /// Resamples to month-end observations.
    ///
    /// Keeps the last observation of every calendar month and labels it with
    /// the month's last calendar day, so that series of different symbols
    /// share identical period labels.
    ///
    /// A month still in progress is labelled like a complete one. Callers
    /// that must not act on partial months end the daily data at the last
    /// completed month-end before resampling.
    #[must_use]
    pub fn to_monthly(&self) -> Self {
        let mut points: Vec<PricePoint> = Vec::new();
        for point in &self.points {
            let label = month_end(point.date);
            match points.last_mut() {
                Some(last) if last.date == label => last.price = point.price,
                _ => points.push(PricePoint::new(label, point.price)),
            }
        }

        Self {
            symbol: self.symbol.clone(),
            periodicity: Periodicity::Monthly,
            points,
        }
    }
}

/// Container for market data.
///
/// `MarketData` wraps a Polars DataFrame of prices in long format, one row per
/// (symbol, date) observation, together with the sampling frequency of the
/// rows.
///
/// # Expected Schema
///
/// - `symbol`: Security identifier
/// - `date`: Observation date
/// - `close`: Closing price
#[derive(Debug, Clone)]
pub struct MarketData {
    /// The underlying DataFrame containing market data.
    data: DataFrame,
    /// Sampling frequency of the rows.
    periodicity: Periodicity,
}

impl MarketData {
    /// Creates a new `MarketData` instance from a DataFrame.
    pub const fn new(data: DataFrame, periodicity: Periodicity) -> Self {
        Self { data, periodicity }
    }

    /// Builds market data from typed price series.
    ///
    /// # Errors
    ///
    /// Returns an error if the series mix periodicities or the frame cannot
    /// be built.
    pub fn from_series(series: &[PriceSeries]) -> Result<Self> {
        let periodicity = series
            .first()
            .map_or_else(Periodicity::default, PriceSeries::periodicity);
        if let Some(other) = series.iter().find(|s| s.periodicity() != periodicity) {
            return Err(VigilError::InvalidData(format!(
                "{} is {} while other series are {periodicity}",
                other.symbol(),
                other.periodicity()
            )));
        }

        let rows: usize = series.iter().map(PriceSeries::len).sum();
        let mut symbols: Vec<String> = Vec::with_capacity(rows);
        let mut dates: Vec<Date> = Vec::with_capacity(rows);
        let mut closes: Vec<f64> = Vec::with_capacity(rows);
        for s in series {
            for point in s.points() {
                symbols.push(s.symbol().to_string());
                dates.push(point.date);
                closes.push(point.price);
            }
        }

        let df = df! {
            "symbol" => symbols,
            "date" => dates,
            "close" => closes,
        }?;

        Ok(Self::new(df, periodicity))
    }

    /// Returns a reference to the underlying DataFrame.
    pub const fn data(&self) -> &DataFrame {
        &self.data
    }

    /// Sampling frequency of the rows.
    pub const fn periodicity(&self) -> Periodicity {
        self.periodicity
    }

    /// Returns the number of rows in the market data.
    pub fn len(&self) -> usize {
        self.data.height()
    }

    /// Returns whether the market data is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Checks if a column exists in the market data.
    pub fn has_column(&self, name: &str) -> bool {
        self.data
            .get_column_names()
            .iter()
            .any(|s| s.as_str() == name)
    }

    /// Distinct symbols in order of first appearance.
    ///
    /// # Errors
    ///
    /// Returns an error if the `symbol` column is missing or not a string column.
    pub fn symbols(&self) -> Result<Vec<Symbol>> {
        if !self.has_column("symbol") {
            return Err(VigilError::MissingColumn("symbol".to_string()));
        }
        let column = self.data.column("symbol")?;
        let mut symbols: Vec<Symbol> = Vec::new();
        for symbol in column.as_materialized_series().str()?.into_iter().flatten() {
            if !symbols.iter().any(|s| s == symbol) {
                symbols.push(symbol.to_string());
            }
        }
        Ok(symbols)
    }
}

impl AsRef<DataFrame> for MarketData {
    fn as_ref(&self) -> &DataFrame {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_periodicity_periods_per_year() {
        assert_eq!(Periodicity::Monthly.periods_per_year(), 12);
        assert_eq!(Periodicity::Daily.periods_per_year(), 252);
        assert_eq!(Periodicity::default(), Periodicity::Monthly);
        assert_eq!(Periodicity::Daily.to_string(), "daily");
    }

    #[test]
    fn test_trailing_return() {
        let prices = vec![100.0, 110.0, 121.0];
        assert_relative_eq!(trailing_return(&prices, 2, 1).unwrap(), 0.1, epsilon = 1e-12);
        assert_relative_eq!(trailing_return(&prices, 2, 2).unwrap(), 0.21, epsilon = 1e-12);
        assert!(trailing_return(&prices, 1, 2).is_none());
        assert!(trailing_return(&prices, 3, 1).is_none());
        assert!(trailing_return(&prices, 2, 0).is_none());
    }

    #[test]
    fn test_month_end() {
        assert_eq!(month_end(date(2024, 2, 10)), date(2024, 2, 29));
        assert_eq!(month_end(date(2023, 12, 1)), date(2023, 12, 31));
        assert_eq!(month_end(date(2023, 4, 30)), date(2023, 4, 30));
    }

    #[test]
    fn test_price_series_sorts_points() {
        let series = PriceSeries::new(
            "SPY",
            Periodicity::Monthly,
            vec![
                PricePoint::new(date(2024, 2, 29), 102.0),
                PricePoint::new(date(2024, 1, 31), 100.0),
            ],
        )
        .unwrap();
        assert_eq!(series.dates(), vec![date(2024, 1, 31), date(2024, 2, 29)]);
        assert_eq!(series.prices(), vec![100.0, 102.0]);
        assert_relative_eq!(series.momentum(1).unwrap(), 0.02, epsilon = 1e-12);
    }

    #[test]
    fn test_price_series_rejects_duplicates() {
        let result = PriceSeries::new(
            "SPY",
            Periodicity::Monthly,
            vec![
                PricePoint::new(date(2024, 1, 31), 100.0),
                PricePoint::new(date(2024, 1, 31), 101.0),
            ],
        );
        assert!(matches!(result, Err(VigilError::InvalidData(_))));
    }

    #[test]
    fn test_price_series_rejects_non_positive_prices() {
        for bad in [0.0, -5.0, f64::NAN] {
            let result = PriceSeries::new(
                "SPY",
                Periodicity::Monthly,
                vec![PricePoint::new(date(2024, 1, 31), bad)],
            );
            assert!(matches!(result, Err(VigilError::InvalidData(_))));
        }
    }

    #[test]
    fn test_to_monthly_keeps_last_observation() {
        let daily = PriceSeries::new(
            "AGG",
            Periodicity::Daily,
            vec![
                PricePoint::new(date(2024, 1, 2), 98.0),
                PricePoint::new(date(2024, 1, 30), 99.0),
                PricePoint::new(date(2024, 2, 1), 100.0),
                PricePoint::new(date(2024, 2, 28), 101.0),
                PricePoint::new(date(2024, 3, 4), 102.0),
            ],
        )
        .unwrap();

        let monthly = daily.to_monthly();
        assert_eq!(monthly.periodicity(), Periodicity::Monthly);
        assert_eq!(
            monthly.dates(),
            vec![date(2024, 1, 31), date(2024, 2, 29), date(2024, 3, 31)]
        );
        assert_eq!(monthly.prices(), vec![99.0, 101.0, 102.0]);
    }

    #[test]
    fn test_until_truncates() {
        let series = PriceSeries::new(
            "SPY",
            Periodicity::Monthly,
            vec![
                PricePoint::new(date(2024, 1, 31), 100.0),
                PricePoint::new(date(2024, 2, 29), 101.0),
                PricePoint::new(date(2024, 3, 31), 102.0),
            ],
        )
        .unwrap();
        let cut = series.until(date(2024, 2, 29));
        assert_eq!(cut.len(), 2);
        assert_eq!(cut.last().unwrap().price, 101.0);
    }

    #[test]
    fn test_market_data_from_series() {
        let spy = PriceSeries::new(
            "SPY",
            Periodicity::Monthly,
            vec![
                PricePoint::new(date(2024, 1, 31), 100.0),
                PricePoint::new(date(2024, 2, 29), 101.0),
            ],
        )
        .unwrap();
        let agg = PriceSeries::new(
            "AGG",
            Periodicity::Monthly,
            vec![PricePoint::new(date(2024, 1, 31), 50.0)],
        )
        .unwrap();

        let market_data = MarketData::from_series(&[spy, agg]).unwrap();
        assert_eq!(market_data.len(), 3);
        assert_eq!(market_data.periodicity(), Periodicity::Monthly);
        assert!(market_data.has_column("symbol"));
        assert!(market_data.has_column("date"));
        assert!(market_data.has_column("close"));
        assert_eq!(market_data.symbols().unwrap(), vec!["SPY", "AGG"]);
    }

    #[test]
    fn test_market_data_rejects_mixed_periodicity() {
        let monthly = PriceSeries::new("SPY", Periodicity::Monthly, vec![]).unwrap();
        let daily = PriceSeries::new("AGG", Periodicity::Daily, vec![]).unwrap();
        let result = MarketData::from_series(&[monthly, daily]);
        assert!(matches!(result, Err(VigilError::InvalidData(_))));
    }

    #[test]
    fn test_market_data_without_symbol_column() {
        let df = df! {
            "close" => &[150.0],
        }
        .unwrap();

        let market_data = MarketData::new(df, Periodicity::Daily);
        assert!(!market_data.has_column("symbol"));
        assert!(matches!(
            market_data.symbols(),
            Err(VigilError::MissingColumn(_))
        ));
        assert_eq!(market_data.data().height(), 1);
    }
}
