//! Vigil CLI binary.
//!
//! Scores, live decisions and backtests for Vigilant Asset Allocation.

mod cmd;
mod config;
mod data;

use anyhow::Result;
use clap::{Parser, Subcommand};
use config::VigilConfig;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "vigil")]
#[command(about = "Vigilant Asset Allocation signals and backtests", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available strategies and benchmarks
    Strategies {
        /// Show detailed information
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show momentum scores ranked from best to worst
    Scores {
        /// Ticker symbols (defaults to the configured universe)
        #[arg(value_delimiter = ',')]
        symbols: Vec<String>,

        /// Date to compute scores (YYYY-MM-DD, defaults to latest)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Show the current allocation of a strategy
    Signal {
        /// Strategy name
        #[arg(short, long, default_value = "vaa")]
        strategy: String,

        /// Number of assets held by vaa-relative
        #[arg(short, long)]
        top: Option<usize>,
    },

    /// Backtest strategies against the configured benchmarks
    Backtest {
        /// Strategies to test
        #[arg(
            short,
            long,
            value_delimiter = ',',
            default_value = "vaa,vaa-relative,vaa-dual"
        )]
        strategies: Vec<String>,

        /// First decision date (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,

        /// Last date of the backtest (YYYY-MM-DD)
        #[arg(long)]
        end: Option<String>,

        /// Number of assets held by vaa-relative
        #[arg(short, long)]
        top: Option<usize>,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,

        /// Write cumulative return series to a JSON file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip the configured benchmarks
        #[arg(long)]
        no_benchmarks: bool,
    },
}

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = VigilConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Strategies { verbose } => cmd::strategies::list_strategies(&config, verbose),
        Commands::Scores { symbols, date } => {
            cmd::scores::show_scores(&config, symbols, date.as_deref()).await
        }
        Commands::Signal { strategy, top } => {
            cmd::signal::show_signal(&config, &strategy, top).await
        }
        Commands::Backtest {
            strategies,
            start,
            end,
            top,
            format,
            output,
            no_benchmarks,
        } => {
            let options = cmd::backtest::BacktestOptions {
                strategies,
                start: start.as_deref().map(data::parse_date).transpose()?,
                end: end.as_deref().map(data::parse_date).transpose()?,
                top,
                format: format.parse()?,
                output,
                benchmarks: !no_benchmarks,
            };
            cmd::backtest::run_backtest(&config, &options).await
        }
    }
}
