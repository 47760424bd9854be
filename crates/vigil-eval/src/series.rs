//! Period and cumulative return series.

use serde::{Deserialize, Serialize};
use vigil_traits::{Date, Result, VigilError};

/// Return earned by an allocation decided at one period and realized at the next.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodReturn {
    /// Period whose prices the allocation was decided on.
    pub decided: Date,
    /// Period the return is realized at.
    pub realized: Date,
    /// Simple return over the period.
    pub value: f64,
}

/// Portfolio returns in chronological order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReturnSeries {
    returns: Vec<PeriodReturn>,
}

impl ReturnSeries {
    /// Wraps returns that are already in chronological order.
    #[must_use]
    pub const fn new(returns: Vec<PeriodReturn>) -> Self {
        Self { returns }
    }

    /// The returns.
    #[must_use]
    pub fn returns(&self) -> &[PeriodReturn] {
        &self.returns
    }

    /// Return values only.
    #[must_use]
    pub fn values(&self) -> Vec<f64> {
        self.returns.iter().map(|r| r.value).collect()
    }

    /// Number of periods.
    #[must_use]
    pub fn len(&self) -> usize {
        self.returns.len()
    }

    /// Whether the series has no periods.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.returns.is_empty()
    }

    /// Growth of one unit invested at the first decision period.
    ///
    /// # Errors
    ///
    /// Returns [`VigilError::InsufficientData`] for an empty series.
    pub fn compound(&self) -> Result<CumulativeReturnSeries> {
        CumulativeReturnSeries::from_returns(self)
    }
}

/// One point of a cumulative return series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CumulativePoint {
    /// Period of the value.
    pub date: Date,
    /// Value of one unit invested at the start.
    pub value: f64,
}

/// Growth-of-one series.
///
/// The first point is exactly 1.0 at the first decision period; each later
/// point is the compounded value at a realization period. `N + 1` points span
/// `N` periods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CumulativeReturnSeries {
    points: Vec<CumulativePoint>,
}

impl CumulativeReturnSeries {
    /// Compounds period returns.
    ///
    /// # Errors
    ///
    /// Returns [`VigilError::InsufficientData`] for an empty series.
    pub fn from_returns(returns: &ReturnSeries) -> Result<Self> {
        let Some(first) = returns.returns().first() else {
            return Err(VigilError::InsufficientData(
                "no returns to compound".to_string(),
            ));
        };

        let mut points = Vec::with_capacity(returns.len() + 1);
        points.push(CumulativePoint {
            date: first.decided,
            value: 1.0,
        });
        let mut value = 1.0;
        for r in returns.returns() {
            value *= 1.0 + r.value;
            points.push(CumulativePoint {
                date: r.realized,
                value,
            });
        }
        Ok(Self { points })
    }

    /// The points, oldest first.
    #[must_use]
    pub fn points(&self) -> &[CumulativePoint] {
        &self.points
    }

    /// Values only.
    #[must_use]
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// Dates only.
    #[must_use]
    pub fn dates(&self) -> Vec<Date> {
        self.points.iter().map(|p| p.date).collect()
    }

    /// Number of periods spanned.
    #[must_use]
    pub fn periods(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    /// First date of the series.
    #[must_use]
    pub fn start(&self) -> Option<Date> {
        self.points.first().map(|p| p.date)
    }

    /// Last value; 1.0 at the start.
    #[must_use]
    pub fn final_value(&self) -> f64 {
        self.points.last().map_or(1.0, |p| p.value)
    }

    /// Simple returns between consecutive points.
    #[must_use]
    pub fn period_returns(&self) -> Vec<f64> {
        self.points
            .windows(2)
            .map(|w| w[1].value / w[0].value - 1.0)
            .collect()
    }

    /// The series from the first point on or after `date`, rebased to 1.0.
    ///
    /// # Errors
    ///
    /// Returns [`VigilError::InsufficientData`] when no point remains.
    pub fn starting_at(&self, date: Date) -> Result<Self> {
        let Some(from) = self.points.iter().position(|p| p.date >= date) else {
            return Err(VigilError::InsufficientData(format!(
                "cumulative series ends before {date}"
            )));
        };
        let base = self.points[from].value;
        Ok(Self {
            points: self.points[from..]
                .iter()
                .map(|p| CumulativePoint {
                    date: p.date,
                    value: p.value / base,
                })
                .collect(),
        })
    }
}
