//! Aligned multi-symbol price panels.
//!
//! A [`PricePanel`] holds the prices of several symbols on the periods they
//! all share, as a period x symbol matrix. Scoring and backtesting index into
//! it by row (period) and column (symbol).

use crate::source::PriceSource;
use crate::types::{Date, Periodicity, PriceSeries, Symbol, month_end};
use crate::{Result, VigilError};
use ndarray::{Array2, Axis, Slice};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// Prices of several symbols aligned on common periods.
#[derive(Debug, Clone, PartialEq)]
pub struct PricePanel {
    periodicity: Periodicity,
    dates: Vec<Date>,
    symbols: Vec<Symbol>,
    /// Rows are periods, columns are symbols.
    prices: Array2<f64>,
}

impl PricePanel {
    /// Aligns the given series on the intersection of their periods.
    ///
    /// Monthly panels must cover consecutive calendar months: a month that
    /// one symbol lacks inside the common range is an error rather than a
    /// silently longer period.
    ///
    /// # Errors
    ///
    /// Returns [`VigilError::InvalidData`] when no series are given, when a
    /// symbol appears twice or when periodicities differ, and
    /// [`VigilError::InsufficientData`] when the series share no period or a
    /// monthly panel has a missing month.
    pub fn from_series(series: &[PriceSeries]) -> Result<Self> {
        let Some(first) = series.first() else {
            return Err(VigilError::InvalidData(
                "cannot build a price panel from zero series".to_string(),
            ));
        };
        let periodicity = first.periodicity();

        let mut symbols: Vec<Symbol> = Vec::with_capacity(series.len());
        for s in series {
            if symbols.iter().any(|known| known == s.symbol()) {
                return Err(VigilError::InvalidData(format!(
                    "duplicate series for {}",
                    s.symbol()
                )));
            }
            if s.periodicity() != periodicity {
                return Err(VigilError::InvalidData(format!(
                    "{} is {} while {} is {periodicity}",
                    s.symbol(),
                    s.periodicity(),
                    first.symbol()
                )));
            }
            symbols.push(s.symbol().to_string());
        }

        let lookups: Vec<BTreeMap<Date, f64>> = series
            .iter()
            .map(|s| s.points().iter().map(|p| (p.date, p.price)).collect())
            .collect();

        let mut common: BTreeSet<Date> = lookups[0].keys().copied().collect();
        for lookup in &lookups[1..] {
            common.retain(|d| lookup.contains_key(d));
        }
        let dates: Vec<Date> = common.into_iter().collect();

        if dates.is_empty() {
            return Err(VigilError::InsufficientData(format!(
                "no common {periodicity} periods across {}",
                symbols.join(", ")
            )));
        }

        if periodicity == Periodicity::Monthly {
            check_consecutive_months(&dates, &symbols, &lookups)?;
        }

        for s in series {
            let dropped = s.len() - dates.len();
            if dropped > 0 {
                warn!(
                    symbol = s.symbol(),
                    dropped, "Dropped periods not shared by every symbol"
                );
            }
        }

        let prices = Array2::from_shape_fn((dates.len(), symbols.len()), |(t, j)| {
            lookups[j].get(&dates[t]).copied().unwrap_or(f64::NAN)
        });

        debug!(
            symbols = symbols.len(),
            periods = dates.len(),
            %periodicity,
            "Built price panel"
        );

        Ok(Self {
            periodicity,
            dates,
            symbols,
            prices,
        })
    }

    /// Fetches `symbols` from a price source and aligns them.
    ///
    /// # Errors
    ///
    /// Any symbol the source cannot supply aborts the whole panel.
    pub fn from_source(
        source: &dyn PriceSource,
        symbols: &[Symbol],
        periodicity: Periodicity,
    ) -> Result<Self> {
        let series = symbols
            .iter()
            .map(|symbol| source.prices(symbol, periodicity))
            .collect::<Result<Vec<_>>>()?;
        Self::from_series(&series)
    }

    /// Sampling frequency of the panel.
    pub const fn periodicity(&self) -> Periodicity {
        self.periodicity
    }

    /// Common periods, oldest first.
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Symbols in column order.
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Number of periods.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Whether the panel has no periods.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Column index of `symbol`.
    pub fn index_of(&self, symbol: &str) -> Option<usize> {
        self.symbols.iter().position(|s| s == symbol)
    }

    /// Price of column `col` at period `t`.
    pub fn price(&self, t: usize, col: usize) -> Option<f64> {
        self.prices.get((t, col)).copied()
    }

    /// Trailing return of column `col` over `lookback` periods ending at `t`.
    pub fn momentum(&self, t: usize, col: usize, lookback: usize) -> Option<f64> {
        if lookback == 0 {
            return None;
        }
        let past = self.price(t.checked_sub(lookback)?, col)?;
        let now = self.price(t, col)?;
        Some(now / past - 1.0)
    }

    /// Realized return of column `col` from period `t` to period `t + 1`.
    ///
    /// `None` for the last period, which has no forward observation.
    pub fn forward_return(&self, t: usize, col: usize) -> Option<f64> {
        let now = self.price(t, col)?;
        let next = self.price(t + 1, col)?;
        Some(next / now - 1.0)
    }

    /// The panel restricted to periods on or before `end`.
    ///
    /// # Errors
    ///
    /// Returns [`VigilError::InsufficientData`] when no period remains.
    pub fn until(&self, end: Date) -> Result<Self> {
        let rows = self.dates.iter().take_while(|d| **d <= end).count();
        if rows == 0 {
            return Err(VigilError::InsufficientData(format!(
                "no prices on or before {end}"
            )));
        }
        Ok(Self {
            periodicity: self.periodicity,
            dates: self.dates[..rows].to_vec(),
            symbols: self.symbols.clone(),
            prices: self
                .prices
                .slice_axis(Axis(0), Slice::from(..rows))
                .to_owned(),
        })
    }
}

/// Month-end following `date`.
fn next_month_end(date: Date) -> Option<Date> {
    date.succ_opt().map(month_end)
}

fn check_consecutive_months(
    dates: &[Date],
    symbols: &[Symbol],
    lookups: &[BTreeMap<Date, f64>],
) -> Result<()> {
    for pair in dates.windows(2) {
        let Some(expected) = next_month_end(pair[0]) else {
            continue;
        };
        if pair[1] != expected {
            let missing: Vec<&str> = symbols
                .iter()
                .zip(lookups)
                .filter(|(_, lookup)| !lookup.contains_key(&expected))
                .map(|(symbol, _)| symbol.as_str())
                .collect();
            return Err(VigilError::InsufficientData(format!(
                "no price for {expected} from {}",
                if missing.is_empty() {
                    "any symbol".to_string()
                } else {
                    missing.join(", ")
                }
            )));
        }
    }
    Ok(())
}
