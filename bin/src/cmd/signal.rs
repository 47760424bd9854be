//! Live allocation command implementation.

use crate::cmd::scores::print_ranked;
use crate::config::VigilConfig;
use crate::data;
use anyhow::{Context, Result};
use vigil_allocate::{create_strategy, decide};
use vigil_signals::VaaMomentum;

/// Show the allocation a strategy makes for the latest month.
pub(crate) async fn show_signal(
    config: &VigilConfig,
    strategy: &str,
    top: Option<usize>,
) -> Result<()> {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║                    Current Allocation                        ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    let top_n = top.unwrap_or(config.relative_top_n);
    let strategy = create_strategy(strategy, &config.universe, top_n)?;
    let scorer = VaaMomentum::new(config.momentum.clone())?;
    let assets = strategy.assets();

    println!("Strategy: {}", strategy.name());
    println!("Assets:   {}", assets.join(", "));
    println!();

    let to = data::last_closed_month();
    let from = data::warm_up_start(to, scorer.warm_up());
    let market_data = data::load_market_data(&assets, Some(from), Some(to)).await?;
    let decision = decide(&market_data, &scorer, strategy.as_ref())
        .with_context(|| format!("Cannot decide {}", strategy.name()))?;

    if !decision.scores.is_empty() {
        print_ranked(&decision.scores.ranked(), &config.momentum.lookbacks());
        println!();
    }
    println!("Decision: {decision}");
    println!();

    Ok(())
}
