//! Strategy listing command implementation.

use crate::config::VigilConfig;
use anyhow::Result;
use vigil_allocate::available_strategies;

/// List registered strategies and the configured benchmarks.
pub(crate) fn list_strategies(config: &VigilConfig, verbose: bool) -> Result<()> {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║                   Available Strategies                       ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("Strategies:");
    println!("{}", "-".repeat(60));
    for info in available_strategies() {
        if verbose {
            let assets = if info.uses_defensive {
                "offensive + defensive"
            } else {
                "offensive only"
            };
            println!("  {:15} - {}", info.name, info.description);
            println!("  {:15}   assets: {assets}", "");
            println!("  {:15}   aliases: {}", "", info.aliases.join(", "));
        } else {
            println!("  {}", info.name);
        }
    }
    println!();

    println!("Benchmarks:");
    println!("{}", "-".repeat(60));
    for benchmark in &config.benchmarks {
        let strategy = benchmark.build()?;
        if verbose {
            let weights: Vec<String> = benchmark
                .weights
                .iter()
                .map(|(symbol, weight)| format!("{symbol} {:.0}%", weight * 100.0))
                .collect();
            println!("  {:15} - {}", strategy.name(), weights.join(", "));
        } else {
            println!("  {}", strategy.name());
        }
    }
    println!();

    println!("Universe:");
    println!("  offensive: {}", config.universe.offensive().join(", "));
    println!("  defensive: {}", config.universe.defensive().join(", "));
    println!();

    if !verbose {
        println!("Use --verbose for strategy descriptions.\n");
    }

    Ok(())
}
