//! Momentum score command implementation.

use crate::config::VigilConfig;
use crate::data;
use anyhow::Result;
use polars::prelude::*;
use vigil_signals::{MomentumRecord, VaaMomentum};
use vigil_traits::Signal;

/// Show momentum scores for symbols, best first.
pub(crate) async fn show_scores(
    config: &VigilConfig,
    symbols: Vec<String>,
    date: Option<&str>,
) -> Result<()> {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║                     Momentum Scores                          ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    let symbols: Vec<String> = if symbols.is_empty() {
        config.universe.combined()
    } else {
        symbols.iter().map(|s| s.trim().to_uppercase()).collect()
    };
    let scorer = VaaMomentum::new(config.momentum.clone())?;
    let weights: Vec<String> = config
        .momentum
        .windows
        .iter()
        .map(|w| format!("{}x{}m", w.weight, w.lookback))
        .collect();

    println!("Symbols: {}", symbols.join(", "));
    println!("Score:   {}", weights.join(" + "));
    println!();

    match date {
        Some(date) => {
            let requested = data::parse_date(date)?;
            let date = data::completed_month_end(requested);
            let from = data::warm_up_start(date, scorer.warm_up());
            let market_data = data::load_market_data(&symbols, Some(from), Some(date)).await?;

            let frame = scorer.score(&market_data, date)?;
            let ranked = frame.sort(
                ["score"],
                SortMultipleOptions::default()
                    .with_order_descending(true)
                    .with_nulls_last(true)
                    .with_maintain_order(true),
            )?;
            if date == requested {
                println!("Scores as of {date}:");
            } else {
                println!("Scores as of {date} (last month-end on or before {requested}):");
            }
            println!("{ranked}");
        }
        None => {
            let to = data::last_closed_month();
            let from = data::warm_up_start(to, scorer.warm_up());
            let market_data = data::load_market_data(&symbols, Some(from), Some(to)).await?;

            let table = scorer.latest(&market_data, &symbols)?;
            match table.date() {
                Some(date) => println!("Scores as of {date}:"),
                None => println!("Scores:"),
            }
            print_ranked(&table.ranked(), &config.momentum.lookbacks());

            let unscored = table.unscored();
            if !unscored.is_empty() {
                println!(
                    "\nNot enough history ({} months) for: {}",
                    scorer.warm_up(),
                    unscored.join(", ")
                );
            }
        }
    }
    println!();

    Ok(())
}

/// Print records as an aligned table.
pub(crate) fn print_ranked(records: &[&MomentumRecord], lookbacks: &[usize]) {
    print!("  {:<4} {:<8}", "#", "Symbol");
    for lookback in lookbacks {
        print!(" {:>9}", format!("{lookback}m"));
    }
    println!(" {:>10}", "Score");
    println!("  {}", "-".repeat(14 + 10 * lookbacks.len() + 11));

    for (rank, record) in records.iter().enumerate() {
        print!("  {:<4} {:<8}", rank + 1, record.symbol);
        for lookback in lookbacks {
            print!(" {:>9}", format_percent(record.momentum(*lookback)));
        }
        println!(" {:>10}", format_score(record.score));
    }
}

fn format_percent(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:+.2}%", v * 100.0))
}

fn format_score(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:+.4}"))
}
