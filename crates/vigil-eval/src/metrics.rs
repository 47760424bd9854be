//! Performance metrics.
//!
//! This module summarizes cumulative return series:
//! - CAGR over the years the series spans
//! - Maximum drawdown from the running peak
//! - CAGR to MDD ratio, undefined when the series never draws down
//! - Annualized volatility and Sharpe ratio of the period returns

use crate::series::CumulativeReturnSeries;
use serde::{Deserialize, Serialize};
use std::fmt;
use vigil_traits::Periodicity;

/// Compound annual growth rate from `initial` to `final_value` over `years`.
///
/// NaN when `years` or `initial` is not positive.
#[must_use]
pub fn cagr(initial: f64, final_value: f64, years: f64) -> f64 {
    if years <= 0.0 || initial <= 0.0 {
        return f64::NAN;
    }
    (final_value / initial).powf(1.0 / years) - 1.0
}

/// Drawdown of each value from the running peak, in [-1, 0].
#[must_use]
pub fn drawdowns(values: &[f64]) -> Vec<f64> {
    let mut peak = f64::NEG_INFINITY;
    values
        .iter()
        .map(|&value| {
            peak = peak.max(value);
            if peak > 0.0 { (value - peak) / peak } else { 0.0 }
        })
        .collect()
}

/// Largest drawdown, as a non-positive fraction; 0.0 without any decline.
#[must_use]
pub fn max_drawdown(values: &[f64]) -> f64 {
    drawdowns(values).into_iter().fold(0.0, f64::min)
}

/// Sample standard deviation of `returns`, annualized.
#[must_use]
pub fn annualized_volatility(returns: &[f64], periods_per_year: usize) -> f64 {
    let valid: Vec<f64> = returns.iter().copied().filter(|x| x.is_finite()).collect();
    if valid.len() < 2 {
        return f64::NAN;
    }
    let mean = valid.iter().sum::<f64>() / valid.len() as f64;
    let variance =
        valid.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (valid.len() - 1) as f64;
    variance.sqrt() * (periods_per_year as f64).sqrt()
}

/// Annualized Sharpe ratio of `returns` with a zero risk-free rate.
#[must_use]
pub fn sharpe_ratio(returns: &[f64], periods_per_year: usize) -> f64 {
    let valid: Vec<f64> = returns.iter().copied().filter(|x| x.is_finite()).collect();
    if valid.len() < 2 {
        return f64::NAN;
    }

    let mean = valid.iter().sum::<f64>() / valid.len() as f64;
    let variance =
        valid.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (valid.len() - 1) as f64;
    let std = variance.sqrt();

    if std == 0.0 {
        f64::NAN
    } else {
        mean / std * (periods_per_year as f64).sqrt()
    }
}

/// Summary statistics of one strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceStats {
    /// Strategy name.
    pub name: String,
    /// Periods spanned.
    pub periods: usize,
    /// Years spanned.
    pub years: f64,
    /// Final over initial value, minus one.
    pub total_return: f64,
    /// Compound annual growth rate.
    pub cagr: f64,
    /// Maximum drawdown, in [-1, 0].
    pub max_drawdown: f64,
    /// `|CAGR / MDD|`; `None` when the maximum drawdown is zero.
    pub cagr_to_mdd: Option<f64>,
    /// Annualized volatility of period returns.
    pub annualized_volatility: f64,
    /// Annualized Sharpe ratio of period returns.
    pub sharpe: f64,
}

impl PerformanceStats {
    /// Statistics of a cumulative series sampled at `periodicity`.
    #[must_use]
    pub fn from_cumulative(
        name: impl Into<String>,
        series: &CumulativeReturnSeries,
        periodicity: Periodicity,
    ) -> Self {
        let values = series.values();
        let periods = series.periods();
        let per_year = periodicity.periods_per_year();
        let years = periods as f64 / per_year as f64;

        let initial = values.first().copied().unwrap_or(1.0);
        let final_value = series.final_value();
        let cagr = cagr(initial, final_value, years);
        let max_drawdown = max_drawdown(&values);
        let cagr_to_mdd = (max_drawdown < 0.0).then(|| (cagr / max_drawdown).abs());

        let returns = series.period_returns();

        Self {
            name: name.into(),
            periods,
            years,
            total_return: final_value / initial - 1.0,
            cagr,
            max_drawdown,
            cagr_to_mdd,
            annualized_volatility: annualized_volatility(&returns, per_year),
            sharpe: sharpe_ratio(&returns, per_year),
        }
    }
}

/// Statistics of several strategies, best CAGR/MDD first.
///
/// Rows without a defined ratio come last, in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsTable {
    rows: Vec<PerformanceStats>,
}

impl StatsTable {
    /// Sorts `rows` by ratio, descending.
    #[must_use]
    pub fn new(mut rows: Vec<PerformanceStats>) -> Self {
        rows.sort_by(|a, b| match (a.cagr_to_mdd, b.cagr_to_mdd) {
            (Some(x), Some(y)) => y.total_cmp(&x),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
        Self { rows }
    }

    /// Rows in ranked order.
    #[must_use]
    pub fn rows(&self) -> &[PerformanceStats] {
        &self.rows
    }

    /// Row of `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PerformanceStats> {
        self.rows.iter().find(|r| r.name == name)
    }
}

impl fmt::Display for StatsTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .rows
            .iter()
            .map(|r| r.name.len())
            .max()
            .unwrap_or(0)
            .max("Strategy".len());

        writeln!(
            f,
            "{:<width$}  {:>8}  {:>8}  {:>8}  {:>8}  {:>7}  {:>7}",
            "Strategy", "CAGR", "MDD", "CAGR/MDD", "Total", "Vol", "Sharpe"
        )?;
        writeln!(f, "{}", "─".repeat(width + 58))?;
        for row in &self.rows {
            let ratio = row
                .cagr_to_mdd
                .map_or_else(|| "n/a".to_string(), |r| format!("{r:.2}"));
            writeln!(
                f,
                "{:<width$}  {:>7.2}%  {:>7.2}%  {:>8}  {:>7.1}%  {:>6.1}%  {:>7.2}",
                row.name,
                row.cagr * 100.0,
                row.max_drawdown * 100.0,
                ratio,
                row.total_return * 100.0,
                row.annualized_volatility * 100.0,
                row.sharpe
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::{PeriodReturn, ReturnSeries};
    use approx::assert_relative_eq;
    use vigil_traits::Date;

    fn cumulative(values: &[f64]) -> CumulativeReturnSeries {
        let date = |i: usize| {
            vigil_traits::types::month_end(
                Date::from_ymd_opt(2020 + (i / 12) as i32, (i % 12) as u32 + 1, 1).unwrap(),
            )
        };
        ReturnSeries::new(
            values
                .iter()
                .enumerate()
                .map(|(i, &value)| PeriodReturn {
                    decided: date(i),
                    realized: date(i + 1),
                    value,
                })
                .collect(),
        )
        .compound()
        .unwrap()
    }

    #[test]
    fn test_cagr_single_period_year() {
        assert_relative_eq!(cagr(1.0, 1.1, 1.0), 0.1, epsilon = 1e-12);
        assert_relative_eq!(cagr(1.25, 1.5, 1.0), 0.2, epsilon = 1e-12);
        assert!(cagr(1.0, 1.1, 0.0).is_nan());
    }

    #[test]
    fn test_cagr_round_trip() {
        let (initial, final_value, years) = (1.0, 2.3, 7.5);
        let rate = cagr(initial, final_value, years);
        assert_relative_eq!(
            (1.0 + rate).powf(years),
            final_value / initial,
            epsilon = 1e-10
        );
    }

    #[test]
    fn test_max_drawdown() {
        let values = vec![1.0, 1.2, 0.9, 1.1, 0.6, 1.5];
        assert_relative_eq!(max_drawdown(&values), 0.6 / 1.2 - 1.0, epsilon = 1e-12);
        assert_eq!(max_drawdown(&[1.0, 1.1, 1.2]), 0.0);
        assert_eq!(max_drawdown(&[]), 0.0);

        let dd = drawdowns(&values);
        assert!(dd.iter().all(|d| (-1.0..=0.0).contains(d)));
        assert_eq!(dd[1], 0.0);
    }

    #[test]
    fn test_calculate_sharpe() {
        let returns = vec![0.01, -0.005, 0.015, 0.002, -0.003];
        assert!(sharpe_ratio(&returns, 12).is_finite());
        assert!(sharpe_ratio(&[0.01, 0.01], 12).is_nan());
        assert!(annualized_volatility(&[0.01], 12).is_nan());
    }

    #[test]
    fn test_stats_from_cumulative() {
        let series = cumulative(&[0.1, -0.2, 0.05, 0.03]);
        let stats = PerformanceStats::from_cumulative("test", &series, Periodicity::Monthly);

        assert_eq!(stats.periods, 4);
        assert_relative_eq!(stats.years, 4.0 / 12.0, epsilon = 1e-12);
        assert_relative_eq!(stats.max_drawdown, -0.2, epsilon = 1e-12);
        assert_relative_eq!(
            (1.0 + stats.cagr).powf(stats.years),
            series.final_value(),
            epsilon = 1e-10
        );
        assert_relative_eq!(
            stats.cagr_to_mdd.unwrap(),
            (stats.cagr / stats.max_drawdown).abs(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_no_drawdown_has_no_ratio() {
        let series = cumulative(&[0.01, 0.02, 0.0]);
        let stats = PerformanceStats::from_cumulative("up", &series, Periodicity::Monthly);
        assert_eq!(stats.max_drawdown, 0.0);
        assert!(stats.cagr_to_mdd.is_none());
    }

    #[test]
    fn test_table_ranks_by_ratio_with_undefined_last() {
        let row = |name: &str, ratio: Option<f64>| PerformanceStats {
            name: name.to_string(),
            periods: 12,
            years: 1.0,
            total_return: 0.1,
            cagr: 0.1,
            max_drawdown: -0.1,
            cagr_to_mdd: ratio,
            annualized_volatility: 0.1,
            sharpe: 1.0,
        };
        let table = StatsTable::new(vec![
            row("flat", None),
            row("low", Some(0.5)),
            row("high", Some(2.0)),
        ]);
        let names: Vec<&str> = table.rows().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["high", "low", "flat"]);
        assert!(table.get("low").is_some());

        let text = table.to_string();
        assert!(text.contains("n/a"));
        assert!(text.lines().count() == 5);
    }
}
