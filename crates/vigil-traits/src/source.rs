//! Price source trait.
//!
//! A [`PriceSource`] supplies price histories to the scoring and backtesting
//! code. Retrieval happens up front; everything downstream works on the
//! in-memory series it returns.

use crate::types::{CE_TO_UNIX_EPOCH_DAYS, Date, MarketData, Periodicity, PricePoint, PriceSeries};
use crate::{Result, VigilError};
use polars::prelude::*;

/// A provider of historical prices.
///
/// Implementations must fail (rather than substitute a default) when a symbol
/// cannot be supplied, and must report insufficient history as `None` from
/// [`historical_momentum`](PriceSource::historical_momentum).
pub trait PriceSource: Send + Sync {
    /// Returns the price history of `symbol` at the requested periodicity.
    ///
    /// # Errors
    ///
    /// Returns [`VigilError::SymbolNotFound`] when the source has no data for
    /// the symbol, or another error when the data cannot be read.
    fn prices(&self, symbol: &str, periodicity: Periodicity) -> Result<PriceSeries>;

    /// Monthly return over `lookback_months` as of the latest available month.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`prices`](PriceSource::prices). Insufficient
    /// history is not an error and yields `Ok(None)`.
    fn historical_momentum(&self, symbol: &str, lookback_months: usize) -> Result<Option<f64>> {
        let series = self.prices(symbol, Periodicity::Monthly)?;
        Ok(series.momentum(lookback_months))
    }
}

impl PriceSource for MarketData {
    fn prices(&self, symbol: &str, periodicity: Periodicity) -> Result<PriceSeries> {
        for col in ["symbol", "date", "close"] {
            if !self.has_column(col) {
                return Err(VigilError::MissingColumn(col.to_string()));
            }
        }

        let df = self.data();
        let mask = df
            .column("symbol")?
            .as_materialized_series()
            .str()?
            .equal(symbol);
        let filtered = df.filter(&mask)?;
        if filtered.is_empty() {
            return Err(VigilError::SymbolNotFound(symbol.to_string()));
        }
        let sorted = filtered.sort(["date"], Default::default())?;

        let dates: Vec<Option<Date>> = sorted
            .column("date")?
            .as_materialized_series()
            .date()?
            .into_iter()
            .map(|d: Option<i32>| {
                d.and_then(|days| Date::from_num_days_from_ce_opt(days + CE_TO_UNIX_EPOCH_DAYS))
            })
            .collect();
        let closes: Vec<Option<f64>> = sorted
            .column("close")?
            .as_materialized_series()
            .f64()?
            .into_iter()
            .collect();

        let points: Vec<PricePoint> = dates
            .into_iter()
            .zip(closes)
            .filter_map(|(date, close)| Some(PricePoint::new(date?, close?)))
            .collect();
        let series = PriceSeries::new(symbol, self.periodicity(), points)?;

        match (self.periodicity(), periodicity) {
            (have, want) if have == want => Ok(series),
            (Periodicity::Daily, Periodicity::Monthly) => Ok(series.to_monthly()),
            (have, want) => Err(VigilError::InvalidData(format!(
                "cannot derive {want} prices for {symbol} from {have} data"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd_opt(y, m, d).unwrap()
    }

    fn monthly_data() -> MarketData {
        let df = df! {
            "symbol" => &["SPY", "AGG", "SPY", "AGG", "SPY"],
            "date" => &[
                date(2024, 2, 29),
                date(2024, 1, 31),
                date(2024, 1, 31),
                date(2024, 2, 29),
                date(2024, 3, 31),
            ],
            "close" => &[110.0, 50.0, 100.0, 51.0, 121.0],
        }
        .unwrap();
        MarketData::new(df, Periodicity::Monthly)
    }

    #[test]
    fn test_prices_filters_and_sorts() {
        let data = monthly_data();
        let spy = data.prices("SPY", Periodicity::Monthly).unwrap();
        assert_eq!(spy.symbol(), "SPY");
        assert_eq!(
            spy.dates(),
            vec![date(2024, 1, 31), date(2024, 2, 29), date(2024, 3, 31)]
        );
        assert_eq!(spy.prices(), vec![100.0, 110.0, 121.0]);
    }

    #[test]
    fn test_prices_unknown_symbol() {
        let data = monthly_data();
        let result = data.prices("VWO", Periodicity::Monthly);
        assert!(matches!(result, Err(VigilError::SymbolNotFound(s)) if s == "VWO"));
    }

    #[test]
    fn test_prices_cannot_upsample() {
        let data = monthly_data();
        let result = data.prices("SPY", Periodicity::Daily);
        assert!(matches!(result, Err(VigilError::InvalidData(_))));
    }

    #[test]
    fn test_daily_data_resampled_to_monthly() {
        let df = df! {
            "symbol" => &["SPY", "SPY", "SPY"],
            "date" => &[date(2024, 1, 2), date(2024, 1, 31), date(2024, 2, 15)],
            "close" => &[99.0, 100.0, 105.0],
        }
        .unwrap();
        let data = MarketData::new(df, Periodicity::Daily);

        let monthly = data.prices("SPY", Periodicity::Monthly).unwrap();
        assert_eq!(monthly.dates(), vec![date(2024, 1, 31), date(2024, 2, 29)]);
        assert_eq!(monthly.prices(), vec![100.0, 105.0]);
    }

    #[test]
    fn test_historical_momentum() {
        let data = monthly_data();
        let one = data.historical_momentum("SPY", 1).unwrap().unwrap();
        assert_relative_eq!(one, 0.1, epsilon = 1e-12);
        let two = data.historical_momentum("SPY", 2).unwrap().unwrap();
        assert_relative_eq!(two, 0.21, epsilon = 1e-12);
        assert!(data.historical_momentum("SPY", 12).unwrap().is_none());
        assert!(data.historical_momentum("QQQ", 1).is_err());
    }

    #[test]
    fn test_missing_close_column() {
        let df = df! {
            "symbol" => &["SPY"],
            "date" => &[date(2024, 1, 31)],
        }
        .unwrap();
        let data = MarketData::new(df, Periodicity::Monthly);
        let result = data.prices("SPY", Periodicity::Monthly);
        assert!(matches!(result, Err(VigilError::MissingColumn(c)) if c == "close"));
    }
}
