//! Configuration file for the vigil CLI.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use vigil_allocate::{AllocationStrategy, create_benchmark};
use vigil_eval::BacktestConfig;
use vigil_signals::MomentumConfig;
use vigil_traits::{AssetUniverse, Symbol};

/// A fixed-weight benchmark portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct BenchmarkConfig {
    pub(crate) name: String,
    pub(crate) weights: BTreeMap<Symbol, f64>,
}

impl BenchmarkConfig {
    fn new(name: &str, weights: &[(&str, f64)]) -> Self {
        Self {
            name: name.to_string(),
            weights: weights.iter().map(|(s, w)| ((*s).to_string(), *w)).collect(),
        }
    }

    pub(crate) fn build(&self) -> Result<Box<dyn AllocationStrategy>> {
        create_benchmark(
            &self.name,
            self.weights.iter().map(|(s, w)| (s.as_str(), *w)),
        )
        .with_context(|| format!("Invalid benchmark '{}'", self.name))
    }
}

/// Everything the commands read from `--config`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct VigilConfig {
    pub(crate) universe: AssetUniverse,
    pub(crate) momentum: MomentumConfig,
    pub(crate) backtest: BacktestConfig,
    /// Assets held by `vaa-relative`.
    pub(crate) relative_top_n: usize,
    /// First day of price history fetched for backtests.
    pub(crate) history_start: NaiveDate,
    pub(crate) benchmarks: Vec<BenchmarkConfig>,
}

impl Default for VigilConfig {
    fn default() -> Self {
        Self {
            universe: AssetUniverse::default(),
            momentum: MomentumConfig::default(),
            backtest: BacktestConfig::default(),
            relative_top_n: 1,
            history_start: NaiveDate::from_ymd_opt(2007, 1, 1).unwrap_or_default(),
            benchmarks: vec![
                BenchmarkConfig::new("60/40", &[("SPY", 0.6), ("BND", 0.4)]),
                BenchmarkConfig::new("SPY", &[("SPY", 1.0)]),
            ],
        }
    }
}

impl VigilConfig {
    /// Parses a TOML document.
    pub(crate) fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse config TOML")?;
        config.momentum.validate()?;
        Ok(config)
    }

    /// Loads `path`, or the defaults when no path is given.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("In config file {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults() {
        let config = VigilConfig::default();
        assert_eq!(config.universe, AssetUniverse::default());
        assert_eq!(config.momentum.lookbacks(), vec![1, 3, 6, 12]);
        assert_eq!(config.relative_top_n, 1);
        assert_eq!(config.benchmarks.len(), 2);
        for benchmark in &config.benchmarks {
            assert!(benchmark.build().is_ok());
        }
    }

    #[test]
    fn test_empty_document_is_default() {
        let config = VigilConfig::from_toml("").unwrap();
        assert_eq!(config.universe, AssetUniverse::default());
        assert_eq!(config.backtest, BacktestConfig::default());
    }

    #[test]
    fn test_full_document() {
        let content = r#"
            relative_top_n = 2
            history_start = "2005-01-01"

            [universe]
            offensive = ["SPY", "EFA", "EEM", "AGG"]
            defensive = ["LQD", "IEF", "SHY"]

            [backtest]
            start = "2010-01-31"
            end = "2020-12-31"

            [[momentum.windows]]
            lookback = 1
            weight = 12.0

            [[momentum.windows]]
            lookback = 12
            weight = 1.0

            [[benchmarks]]
            name = "70/30"
            weights = { SPY = 0.7, AGG = 0.3 }
        "#;
        let config = VigilConfig::from_toml(content).unwrap();
        assert_eq!(config.relative_top_n, 2);
        assert_eq!(config.universe.offensive()[1], "EFA");
        assert_eq!(config.backtest.start, NaiveDate::from_ymd_opt(2010, 1, 31));
        assert_eq!(config.momentum.warm_up(), 12);
        assert_eq!(config.benchmarks.len(), 1);
        assert_eq!(config.benchmarks[0].build().unwrap().name(), "70/30");
        assert_relative_eq!(config.benchmarks[0].weights["SPY"], 0.7);
        assert_relative_eq!(config.benchmarks[0].weights.values().sum::<f64>(), 1.0);
    }

    #[test]
    fn test_invalid_universe_rejected() {
        let content = r#"
            [universe]
            offensive = ["SPY"]
            defensive = ["SPY"]
        "#;
        assert!(VigilConfig::from_toml(content).is_err());
    }

    #[test]
    fn test_invalid_momentum_rejected() {
        let content = r#"
            [momentum]
            windows = []
        "#;
        assert!(VigilConfig::from_toml(content).is_err());
    }

    #[test]
    fn test_bad_benchmark_weights() {
        let benchmark = BenchmarkConfig::new("bad", &[("SPY", 0.5)]);
        assert!(benchmark.build().is_err());
    }

    #[test]
    fn test_missing_file() {
        let result = VigilConfig::load(Some(Path::new("/nonexistent/vigil.toml")));
        assert!(result.is_err());
        assert!(VigilConfig::load(None).is_ok());
    }
}
