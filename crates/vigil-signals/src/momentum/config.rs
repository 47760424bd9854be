//! Lookback windows and weights of the composite momentum score.

use serde::{Deserialize, Serialize};
use vigil_traits::{Result, VigilError};

/// One lookback window of the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MomentumWindow {
    /// Lookback in periods (months for monthly data).
    pub lookback: usize,
    /// Weight applied to the window's return.
    pub weight: f64,
}

impl MomentumWindow {
    /// Create a new window.
    #[must_use]
    pub const fn new(lookback: usize, weight: f64) -> Self {
        Self { lookback, weight }
    }
}

/// Configuration for the composite momentum score.
///
/// The score is the weighted sum of the windows' trailing returns. It is not
/// divided by the total weight; scaling never changes ranks or signs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MomentumConfig {
    /// Windows, in display order.
    pub windows: Vec<MomentumWindow>,
}

impl Default for MomentumConfig {
    /// The classical VAA weighting: 12 x 1m + 4 x 3m + 2 x 6m + 1 x 12m.
    fn default() -> Self {
        Self {
            windows: vec![
                MomentumWindow::new(1, 12.0),
                MomentumWindow::new(3, 4.0),
                MomentumWindow::new(6, 2.0),
                MomentumWindow::new(12, 1.0),
            ],
        }
    }
}

impl MomentumConfig {
    /// Checks that the windows can produce a score.
    ///
    /// # Errors
    ///
    /// Returns [`VigilError::InvalidConfig`] when there are no windows, a
    /// lookback is zero or repeated, or a weight is not finite.
    pub fn validate(&self) -> Result<()> {
        if self.windows.is_empty() {
            return Err(VigilError::InvalidConfig(
                "momentum score needs at least one window".to_string(),
            ));
        }
        for (i, window) in self.windows.iter().enumerate() {
            if window.lookback == 0 {
                return Err(VigilError::InvalidConfig(
                    "momentum lookback must be at least one period".to_string(),
                ));
            }
            if !window.weight.is_finite() {
                return Err(VigilError::InvalidConfig(format!(
                    "weight of the {}-period window is not finite",
                    window.lookback
                )));
            }
            if self.windows[..i].iter().any(|w| w.lookback == window.lookback) {
                return Err(VigilError::InvalidConfig(format!(
                    "{}-period window listed twice",
                    window.lookback
                )));
            }
        }
        Ok(())
    }

    /// Periods of history required before a score is defined.
    #[must_use]
    pub fn warm_up(&self) -> usize {
        self.windows.iter().map(|w| w.lookback).max().unwrap_or(0)
    }

    /// Lookbacks in display order.
    #[must_use]
    pub fn lookbacks(&self) -> Vec<usize> {
        self.windows.iter().map(|w| w.lookback).collect()
    }

    /// Weighted sum of per-window returns, aligned with `windows`.
    ///
    /// `None` unless every window has a return.
    #[must_use]
    pub fn composite(&self, returns: &[Option<f64>]) -> Option<f64> {
        if returns.len() != self.windows.len() {
            return None;
        }
        self.windows
            .iter()
            .zip(returns)
            .map(|(window, ret)| ret.map(|r| window.weight * r))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_windows() {
        let config = MomentumConfig::default();
        assert_eq!(config.lookbacks(), vec![1, 3, 6, 12]);
        assert_eq!(config.warm_up(), 12);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_composite_is_undivided_dot_product() {
        let config = MomentumConfig::default();
        let score = config
            .composite(&[Some(0.01), Some(0.02), Some(0.03), Some(0.04)])
            .unwrap();
        assert_relative_eq!(score, 12.0 * 0.01 + 4.0 * 0.02 + 2.0 * 0.03 + 0.04, epsilon = 1e-12);
    }

    #[test]
    fn test_composite_requires_every_window() {
        let config = MomentumConfig::default();
        assert!(config.composite(&[Some(0.01), Some(0.02), Some(0.03), None]).is_none());
        assert!(config.composite(&[Some(0.01)]).is_none());
    }

    #[test]
    fn test_validate_rejects_bad_windows() {
        let empty = MomentumConfig { windows: vec![] };
        assert!(empty.validate().is_err());

        let zero = MomentumConfig {
            windows: vec![MomentumWindow::new(0, 1.0)],
        };
        assert!(zero.validate().is_err());

        let repeated = MomentumConfig {
            windows: vec![MomentumWindow::new(3, 1.0), MomentumWindow::new(3, 2.0)],
        };
        assert!(repeated.validate().is_err());

        let nan = MomentumConfig {
            windows: vec![MomentumWindow::new(1, f64::NAN)],
        };
        assert!(nan.validate().is_err());
    }
}
