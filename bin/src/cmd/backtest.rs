//! Backtest command implementation.

use crate::config::VigilConfig;
use crate::data;
use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;
use vigil_allocate::{AllocationStrategy, create_strategy};
use vigil_eval::{Backtest, BacktestConfig, Comparison, CumulativePoint, PerformanceStats};
use vigil_signals::VaaMomentum;
use vigil_traits::{Periodicity, PricePanel};

/// How results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => bail!("Unknown format '{other}'. Use 'text' or 'json'."),
        }
    }
}

/// Command-line options of `vigil backtest`.
#[derive(Debug)]
pub(crate) struct BacktestOptions {
    pub(crate) strategies: Vec<String>,
    pub(crate) start: Option<NaiveDate>,
    pub(crate) end: Option<NaiveDate>,
    pub(crate) top: Option<usize>,
    pub(crate) format: OutputFormat,
    pub(crate) output: Option<PathBuf>,
    pub(crate) benchmarks: bool,
}

#[derive(Debug, Serialize)]
struct StrategyReport {
    #[serde(flatten)]
    stats: PerformanceStats,
    avg_turnover: f64,
    months_in_cash: usize,
    last_allocation: Option<String>,
}

#[derive(Debug, Serialize)]
struct Report {
    start: NaiveDate,
    end: Option<NaiveDate>,
    strategies: Vec<StrategyReport>,
}

/// Run strategies and benchmarks over the same history and compare them.
pub(crate) async fn run_backtest(config: &VigilConfig, options: &BacktestOptions) -> Result<()> {
    let top_n = options.top.unwrap_or(config.relative_top_n);
    let strategies = build_strategies(config, &options.strategies, top_n, options.benchmarks)?;
    let backtest_config = merge_config(&config.backtest, options);
    let scorer = VaaMomentum::new(config.momentum.clone())?;

    let assets: Vec<Vec<String>> = strategies.iter().map(|s| s.assets()).collect();
    let symbols = data::unique_symbols(assets.iter().map(Vec::as_slice));
    let fetch_from = fetch_start(config.history_start, backtest_config.start, scorer.warm_up());

    if options.format == OutputFormat::Text {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                       Backtesting                            ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");

        let names: Vec<&str> = strategies.iter().map(|s| s.name()).collect();
        println!("Strategies: {}", names.join(", "));
        println!("Symbols:    {}", symbols.join(", "));
        println!(
            "Period:     {} to {}",
            backtest_config
                .start
                .map_or_else(|| "first scored month".to_string(), |d| d.to_string()),
            backtest_config
                .end
                .map_or_else(|| "last closed month".to_string(), |d| d.to_string())
        );
        println!();
    }

    let market_data =
        data::load_market_data(&symbols, Some(fetch_from), backtest_config.end).await?;
    let panel = PricePanel::from_source(&market_data, &symbols, Periodicity::Monthly)?;
    info!(months = panel.len(), symbols = symbols.len(), "Built monthly panel");

    let backtest = Backtest::new(backtest_config, scorer);
    let refs: Vec<&dyn AllocationStrategy> = strategies.iter().map(AsRef::as_ref).collect();
    let comparison = backtest.compare(&panel, &refs).context("Backtest failed")?;

    match options.format {
        OutputFormat::Text => print_text(&comparison),
        OutputFormat::Json => {
            let report = build_report(&comparison, backtest.config().end);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    if let Some(path) = &options.output {
        write_cumulative(&comparison, path)?;
        if options.format == OutputFormat::Text {
            println!("Cumulative returns written to {}\n", path.display());
        }
    }

    Ok(())
}

fn build_strategies(
    config: &VigilConfig,
    names: &[String],
    top_n: usize,
    with_benchmarks: bool,
) -> Result<Vec<Box<dyn AllocationStrategy>>> {
    let mut strategies = names
        .iter()
        .map(|name| create_strategy(name.trim(), &config.universe, top_n))
        .collect::<vigil_traits::Result<Vec<_>>>()?;

    if with_benchmarks {
        for benchmark in &config.benchmarks {
            strategies.push(benchmark.build()?);
        }
    }

    if strategies.is_empty() {
        bail!("No strategies to backtest");
    }
    Ok(strategies)
}

/// Command-line dates override the configured ones. Without an end the
/// backtest stops at the last closed month.
fn merge_config(base: &BacktestConfig, options: &BacktestOptions) -> BacktestConfig {
    BacktestConfig {
        start: options.start.or(base.start),
        end: Some(
            options
                .end
                .or(base.end)
                .unwrap_or_else(data::last_closed_month),
        ),
    }
}

/// History must begin early enough for the first decision to be scored.
fn fetch_start(history_start: NaiveDate, start: Option<NaiveDate>, warm_up: usize) -> NaiveDate {
    start.map_or(history_start, |start| {
        history_start.min(data::warm_up_start(start, warm_up))
    })
}

fn print_text(comparison: &Comparison) {
    println!("Results from {} (ranked by CAGR/MDD):", comparison.start);
    println!();
    println!("{}", comparison.stats());

    println!("Latest allocations:");
    println!("{}", "-".repeat(60));
    for result in &comparison.results {
        let cash = result
            .allocations
            .iter()
            .filter(|a| a.allocation.is_cash())
            .count();
        match result.allocations.last() {
            Some(last) => println!(
                "  {:20} {} -> {} (turnover {:.1}%, {} months in cash)",
                result.strategy,
                last.date,
                last.allocation,
                result.avg_turnover * 100.0,
                cash
            ),
            None => println!("  {:20} no decisions", result.strategy),
        }
    }
    println!();
}

fn build_report(comparison: &Comparison, end: Option<NaiveDate>) -> Report {
    let stats = comparison.stats();
    let strategies = stats
        .rows()
        .iter()
        .filter_map(|row| {
            let result = comparison.get(&row.name)?;
            Some(StrategyReport {
                stats: row.clone(),
                avg_turnover: result.avg_turnover,
                months_in_cash: result
                    .allocations
                    .iter()
                    .filter(|a| a.allocation.is_cash())
                    .count(),
                last_allocation: result.allocations.last().map(|a| a.allocation.to_string()),
            })
        })
        .collect();

    Report {
        start: comparison.start,
        end,
        strategies,
    }
}

fn write_cumulative(comparison: &Comparison, path: &Path) -> Result<()> {
    let series: BTreeMap<&str, &[CumulativePoint]> = comparison
        .results
        .iter()
        .map(|r| (r.strategy.as_str(), r.cumulative.points()))
        .collect();

    let file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), &series)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
