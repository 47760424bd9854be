//! Signal trait for scoring securities.
//!
//! This module defines the `Signal` trait: a named computation that scores
//! every symbol of a [`MarketData`] frame as of a date and returns the scores
//! as a DataFrame.

use crate::{Date, MarketData, Result};
use polars::prelude::*;

/// A signal that scores securities.
///
/// Implementations should be thread-safe (`Send + Sync`) so that independent
/// universes can be scored in parallel.
///
/// # Example
///
/// ```no_run
/// use vigil_traits::{Signal, MarketData, Result, Date};
/// use polars::prelude::*;
///
/// struct LastClose;
///
/// impl Signal for LastClose {
///     fn name(&self) -> &str {
///         "last_close"
///     }
///
///     fn score(&self, data: &MarketData, date: Date) -> Result<DataFrame> {
///         Ok(data.data().clone())
///     }
///
///     fn lookback(&self) -> usize {
///         0
///     }
///
///     fn required_columns(&self) -> &[&str] {
///         &["symbol", "date", "close"]
///     }
/// }
/// ```
pub trait Signal: Send + Sync {
    /// Returns the name of this signal.
    fn name(&self) -> &str;

    /// Computes scores for every symbol as of `date`.
    ///
    /// Returns a DataFrame with at minimum a `symbol` column and a `score`
    /// column; symbols without enough history carry a null score.
    ///
    /// # Errors
    ///
    /// Returns an error if required columns are missing or the data cannot
    /// be read.
    fn score(&self, data: &MarketData, date: Date) -> Result<DataFrame>;

    /// Returns the number of prior periods needed before a score is defined.
    fn lookback(&self) -> usize;

    /// Returns the required data columns for this signal.
    fn required_columns(&self) -> &[&str];
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Periodicity;
    use chrono::NaiveDate;

    struct TestSignal {
        name: String,
        lookback: usize,
    }

    impl Signal for TestSignal {
        fn name(&self) -> &str {
            &self.name
        }

        fn score(&self, _data: &MarketData, _date: Date) -> Result<DataFrame> {
            Ok(df! {
                "symbol" => &["SPY", "AGG"],
                "score" => &[0.5, -0.3],
            }?)
        }

        fn lookback(&self) -> usize {
            self.lookback
        }

        fn required_columns(&self) -> &[&str] {
            &["symbol", "close"]
        }
    }

    #[test]
    fn test_signal_metadata() {
        let signal = TestSignal {
            name: "test_signal".to_string(),
            lookback: 12,
        };
        assert_eq!(signal.name(), "test_signal");
        assert_eq!(signal.lookback(), 12);
        assert!(signal.required_columns().contains(&"close"));
    }

    #[test]
    fn test_signal_score() {
        let signal = TestSignal {
            name: "test".to_string(),
            lookback: 12,
        };

        let df = df! {
            "symbol" => &["SPY"],
            "close" => &[450.0],
        }
        .unwrap();

        let market_data = MarketData::new(df, Periodicity::Monthly);
        let date = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();

        let scores = signal.score(&market_data, date).unwrap();
        assert_eq!(scores.height(), 2);
        assert!(scores.column("symbol").is_ok());
        assert!(scores.column("score").is_ok());
    }

    #[test]
    fn test_signal_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn Signal>();
    }
}
