//! Composite VAA momentum score.

use super::config::MomentumConfig;
use super::record::{MomentumRecord, MomentumTable, WindowReturn};
use polars::prelude::*;
use tracing::debug;
use vigil_traits::{
    Date, MarketData, Periodicity, PricePanel, PriceSeries, PriceSource, Result, Signal, Symbol,
    VigilError,
};

/// Weighted multi-window momentum scorer.
///
/// For every lookback `k` the trailing return is `price[t] / price[t - k] - 1`;
/// the score is the weighted sum of those returns. With the default windows
/// that is `12 * r1 + 4 * r3 + 2 * r6 + r12` on monthly prices.
///
/// # Example
///
/// ```ignore
/// use vigil_signals::momentum::VaaMomentum;
///
/// let scorer = VaaMomentum::default();
/// let table = scorer.table_at(&panel, t, panel.symbols())?;
/// for record in table.ranked() {
///     println!("{} {:?}", record.symbol, record.score);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct VaaMomentum {
    config: MomentumConfig,
}

impl VaaMomentum {
    /// Creates a scorer with the given windows.
    ///
    /// # Errors
    ///
    /// Returns [`VigilError::InvalidConfig`] if the configuration is invalid.
    pub fn new(config: MomentumConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The scorer's windows.
    #[must_use]
    pub const fn config(&self) -> &MomentumConfig {
        &self.config
    }

    /// Periods of history needed before the score is defined.
    #[must_use]
    pub fn warm_up(&self) -> usize {
        self.config.warm_up()
    }

    fn record(&self, symbol: &str, date: Date, momentum: impl Fn(usize) -> Option<f64>) -> MomentumRecord {
        let returns: Vec<WindowReturn> = self
            .config
            .windows
            .iter()
            .map(|w| WindowReturn {
                lookback: w.lookback,
                value: momentum(w.lookback),
            })
            .collect();
        let values: Vec<Option<f64>> = returns.iter().map(|w| w.value).collect();
        let score = self.config.composite(&values);
        MomentumRecord {
            symbol: symbol.to_string(),
            date,
            returns,
            score,
        }
    }

    /// Momentum record of panel column `col` at period `t`.
    ///
    /// # Errors
    ///
    /// Returns [`VigilError::InvalidData`] if `t` or `col` is out of range.
    pub fn record_at(&self, panel: &PricePanel, t: usize, col: usize) -> Result<MomentumRecord> {
        let (Some(&date), Some(symbol)) = (panel.dates().get(t), panel.symbols().get(col)) else {
            return Err(VigilError::InvalidData(format!(
                "period {t} or column {col} outside a {}x{} panel",
                panel.len(),
                panel.symbols().len()
            )));
        };
        Ok(self.record(symbol, date, |k| panel.momentum(t, col, k)))
    }

    /// Momentum table of `symbols` at panel period `t`, in the given order.
    ///
    /// # Errors
    ///
    /// Returns [`VigilError::SymbolNotFound`] if a symbol is not a panel
    /// column, or [`VigilError::InvalidData`] if `t` is out of range.
    pub fn table_at(&self, panel: &PricePanel, t: usize, symbols: &[Symbol]) -> Result<MomentumTable> {
        let Some(&date) = panel.dates().get(t) else {
            return Err(VigilError::InvalidData(format!(
                "period {t} outside a panel of {} periods",
                panel.len()
            )));
        };
        let records = symbols
            .iter()
            .map(|symbol| {
                let col = panel
                    .index_of(symbol)
                    .ok_or_else(|| VigilError::SymbolNotFound(symbol.clone()))?;
                self.record_at(panel, t, col)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(MomentumTable::new(Some(date), records))
    }

    /// Momentum record of the last point of a series.
    ///
    /// A series with no points yields an unscored record dated `fallback`.
    #[must_use]
    pub fn score_series(&self, series: &PriceSeries, fallback: Date) -> MomentumRecord {
        let date = series.last().map_or(fallback, |p| p.date);
        self.record(series.symbol(), date, |k| series.momentum(k))
    }

    /// Momentum table of `symbols` at the latest period a source offers.
    ///
    /// Returns come from [`PriceSource::historical_momentum`]; every symbol
    /// must end on the same month, which dates the table.
    ///
    /// # Errors
    ///
    /// Any symbol the source cannot supply aborts the table, and symbols
    /// whose latest months differ yield [`VigilError::InsufficientData`].
    pub fn latest(&self, source: &dyn PriceSource, symbols: &[Symbol]) -> Result<MomentumTable> {
        let mut table_date: Option<Date> = None;
        let mut records = Vec::with_capacity(symbols.len());

        for symbol in symbols {
            let series = source.prices(symbol, Periodicity::Monthly)?;
            let Some(last) = series.last() else {
                return Err(VigilError::InsufficientData(format!(
                    "no monthly prices for {symbol}"
                )));
            };
            match table_date {
                None => table_date = Some(last.date),
                Some(date) if date != last.date => {
                    return Err(VigilError::InsufficientData(format!(
                        "latest price of {symbol} is for {} but other symbols end at {date}",
                        last.date
                    )));
                }
                Some(_) => {}
            }

            let mut returns = Vec::with_capacity(self.config.windows.len());
            for window in &self.config.windows {
                returns.push(WindowReturn {
                    lookback: window.lookback,
                    value: source.historical_momentum(symbol, window.lookback)?,
                });
            }
            let values: Vec<Option<f64>> = returns.iter().map(|w| w.value).collect();
            let score = self.config.composite(&values);
            debug!(%symbol, date = %last.date, ?score, "Scored symbol");

            records.push(MomentumRecord {
                symbol: symbol.clone(),
                date: last.date,
                returns,
                score,
            });
        }

        Ok(MomentumTable::new(table_date, records))
    }
}

impl Signal for VaaMomentum {
    fn name(&self) -> &str {
        "vaa_momentum"
    }

    fn score(&self, data: &MarketData, date: Date) -> Result<DataFrame> {
        for col in self.required_columns() {
            if !data.has_column(col) {
                return Err(VigilError::MissingColumn((*col).to_string()));
            }
        }

        let records = data
            .symbols()?
            .iter()
            .map(|symbol| {
                let series = data.prices(symbol, Periodicity::Monthly)?.until(date);
                Ok(self.score_series(&series, date))
            })
            .collect::<Result<Vec<_>>>()?;

        MomentumTable::new(Some(date), records).to_frame()
    }

    fn lookback(&self) -> usize {
        self.warm_up()
    }

    fn required_columns(&self) -> &[&str] {
        &["symbol", "date", "close"]
    }
}
