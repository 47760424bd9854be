//! Momentum records and per-period score tables.

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use vigil_traits::{Date, Result, Symbol};

/// Trailing return over one lookback window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowReturn {
    /// Lookback in periods.
    pub lookback: usize,
    /// Return, absent when history is too short.
    pub value: Option<f64>,
}

/// Momentum of one symbol at one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MomentumRecord {
    /// Symbol scored.
    pub symbol: Symbol,
    /// Period the record is computed as of.
    pub date: Date,
    /// Per-window returns.
    pub returns: Vec<WindowReturn>,
    /// Composite score; absent until every window has enough history.
    pub score: Option<f64>,
}

impl MomentumRecord {
    /// Return over the window with the given lookback.
    #[must_use]
    pub fn momentum(&self, lookback: usize) -> Option<f64> {
        self.returns
            .iter()
            .find(|w| w.lookback == lookback)
            .and_then(|w| w.value)
    }

    /// Whether the composite score is defined.
    #[must_use]
    pub const fn is_scored(&self) -> bool {
        self.score.is_some()
    }
}

/// Momentum records of several symbols as of one period, in universe order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MomentumTable {
    date: Option<Date>,
    records: Vec<MomentumRecord>,
}

impl MomentumTable {
    /// Creates a table from records listed in universe order.
    #[must_use]
    pub const fn new(date: Option<Date>, records: Vec<MomentumRecord>) -> Self {
        Self { date, records }
    }

    /// Period of the table, if known.
    #[must_use]
    pub const fn date(&self) -> Option<Date> {
        self.date
    }

    /// Records in universe order.
    #[must_use]
    pub fn records(&self) -> &[MomentumRecord] {
        &self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record of `symbol`.
    #[must_use]
    pub fn get(&self, symbol: &str) -> Option<&MomentumRecord> {
        self.records.iter().find(|r| r.symbol == symbol)
    }

    /// Composite score of `symbol`.
    #[must_use]
    pub fn score(&self, symbol: &str) -> Option<f64> {
        self.get(symbol).and_then(|r| r.score)
    }

    /// Whether every record has a score.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.records.is_empty() && self.records.iter().all(MomentumRecord::is_scored)
    }

    /// Symbols whose score is absent.
    #[must_use]
    pub fn unscored(&self) -> Vec<&str> {
        self.records
            .iter()
            .filter(|r| !r.is_scored())
            .map(|r| r.symbol.as_str())
            .collect()
    }

    /// Records by descending score.
    ///
    /// Equal scores keep universe order; unscored records come last.
    #[must_use]
    pub fn ranked(&self) -> Vec<&MomentumRecord> {
        let mut ranked: Vec<&MomentumRecord> = self.records.iter().collect();
        ranked.sort_by(|a, b| match (a.score, b.score) {
            (Some(x), Some(y)) => y.total_cmp(&x),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
        ranked
    }

    /// The table as a DataFrame.
    ///
    /// Columns: `symbol`, one `mom_{k}m` column per window, and `score`.
    /// Missing values are null.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame cannot be assembled.
    pub fn to_frame(&self) -> Result<DataFrame> {
        let symbols: Vec<&str> = self.records.iter().map(|r| r.symbol.as_str()).collect();
        let lookbacks: Vec<usize> = self
            .records
            .first()
            .map(|r| r.returns.iter().map(|w| w.lookback).collect())
            .unwrap_or_default();

        let mut columns: Vec<Column> = Vec::with_capacity(lookbacks.len() + 2);
        columns.push(Column::new("symbol".into(), symbols));
        for lookback in lookbacks {
            let values: Vec<Option<f64>> = self
                .records
                .iter()
                .map(|r| r.momentum(lookback))
                .collect();
            columns.push(Column::new(format!("mom_{lookback}m").into(), values));
        }
        let scores: Vec<Option<f64>> = self.records.iter().map(|r| r.score).collect();
        columns.push(Column::new("score".into(), scores));

        Ok(DataFrame::new(columns)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(symbol: &str, score: Option<f64>) -> MomentumRecord {
        MomentumRecord {
            symbol: symbol.to_string(),
            date: Date::from_ymd_opt(2024, 1, 31).unwrap(),
            returns: vec![
                WindowReturn {
                    lookback: 1,
                    value: score.map(|s| s / 12.0),
                },
                WindowReturn {
                    lookback: 12,
                    value: None,
                },
            ],
            score,
        }
    }

    #[test]
    fn test_lookup() {
        let table = MomentumTable::new(
            None,
            vec![record("SPY", Some(0.4)), record("AGG", None)],
        );
        assert_eq!(table.len(), 2);
        assert_eq!(table.score("SPY"), Some(0.4));
        assert_eq!(table.score("AGG"), None);
        assert_eq!(table.score("VWO"), None);
        assert!(!table.is_complete());
        assert_eq!(table.unscored(), vec!["AGG"]);
        assert!(table.get("SPY").unwrap().momentum(1).is_some());
        assert!(table.get("SPY").unwrap().momentum(12).is_none());
    }

    #[test]
    fn test_empty_table_is_not_complete() {
        assert!(!MomentumTable::default().is_complete());
    }

    #[test]
    fn test_ranked_ties_keep_universe_order() {
        let table = MomentumTable::new(
            None,
            vec![
                record("A", Some(0.1)),
                record("B", None),
                record("C", Some(0.3)),
                record("D", Some(0.1)),
            ],
        );
        let order: Vec<&str> = table.ranked().iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(order, vec!["C", "A", "D", "B"]);
    }

    #[test]
    fn test_to_frame() {
        let table = MomentumTable::new(
            None,
            vec![record("SPY", Some(0.6)), record("AGG", None)],
        );
        let df = table.to_frame().unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 4);
        assert!(df.column("mom_1m").is_ok());
        assert!(df.column("mom_12m").is_ok());

        let scores: Vec<Option<f64>> = df
            .column("score")
            .unwrap()
            .as_materialized_series()
            .f64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(scores, vec![Some(0.6), None]);
    }
}
