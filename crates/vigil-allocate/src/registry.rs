//! Strategy registry for discovering and creating allocation strategies by name.

use crate::fixed::FixedWeights;
use crate::strategy::AllocationStrategy;
use crate::vigilant::{DualOffensive, RelativeOffensive, Vigilant};
use serde::Serialize;
use vigil_traits::{AssetUniverse, Result, VigilError};

/// Metadata about a registered strategy.
#[derive(Debug, Clone, Serialize)]
pub struct StrategyInfo {
    /// Unique identifier for the strategy.
    pub name: &'static str,

    /// Alternative names accepted by [`create_strategy`].
    pub aliases: &'static [&'static str],

    /// Human-readable description.
    pub description: &'static str,

    /// Whether the strategy reads the defensive list.
    pub uses_defensive: bool,
}

/// Get information about all registered strategies.
#[must_use]
pub fn available_strategies() -> Vec<StrategyInfo> {
    vec![
        StrategyInfo {
            name: "vaa",
            aliases: &["vigilant", "vaa-g4"],
            description: "Best offensive asset; best defensive asset or cash when any offensive score is negative",
            uses_defensive: true,
        },
        StrategyInfo {
            name: "vaa-relative",
            aliases: &["relative", "relative-offensive"],
            description: "Top N offensive assets by score, equally weighted, regardless of sign",
            uses_defensive: false,
        },
        StrategyInfo {
            name: "vaa-dual",
            aliases: &["dual", "dual-offensive"],
            description: "Best offensive asset with a non-negative score, otherwise cash",
            uses_defensive: false,
        },
    ]
}

/// Get information about a strategy by name or alias.
#[must_use]
pub fn get_strategy_info(name: &str) -> Option<StrategyInfo> {
    let name = name.to_ascii_lowercase();
    available_strategies()
        .into_iter()
        .find(|info| info.name == name || info.aliases.contains(&name.as_str()))
}

/// Create a strategy instance by name.
///
/// `top_n` is only read by `vaa-relative`.
///
/// # Errors
///
/// Returns [`VigilError::StrategyNotFound`] for unknown names, or the
/// strategy's own configuration error.
pub fn create_strategy(
    name: &str,
    universe: &AssetUniverse,
    top_n: usize,
) -> Result<Box<dyn AllocationStrategy>> {
    let Some(info) = get_strategy_info(name) else {
        return Err(VigilError::StrategyNotFound(format!(
            "Unknown strategy: '{name}'. Use 'vigil strategies' to list available strategies."
        )));
    };
    match info.name {
        "vaa" => Ok(Box::new(Vigilant::new(universe.clone()))),
        "vaa-relative" => Ok(Box::new(RelativeOffensive::new(universe, top_n)?)),
        "vaa-dual" => Ok(Box::new(DualOffensive::new(universe))),
        other => Err(VigilError::StrategyNotFound(other.to_string())),
    }
}

/// Create a fixed-weight benchmark.
///
/// # Errors
///
/// Returns [`VigilError::InvalidConfig`] if the weights are invalid.
pub fn create_benchmark<'a>(
    name: &str,
    weights: impl IntoIterator<Item = (&'a str, f64)>,
) -> Result<Box<dyn AllocationStrategy>> {
    Ok(Box::new(FixedWeights::new(name, weights)?))
}
