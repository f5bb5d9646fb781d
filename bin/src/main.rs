//! renko CLI - build Renko charts from tick files.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use renko_lib::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

mod commands;
mod display;

use display::Format;

#[derive(Parser)]
#[command(name = "renko")]
#[command(about = "Build Renko charts from tick data", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Directory containing tick files (default: platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// JSON engine configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (errors only, no progress output)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Resampling bucket width (s1, m1, m5, m15, m30, h1, h4, d1)
    #[arg(long, global = true)]
    bucket: Option<Timeframe>,

    /// Number of trailing bars averaged by the ATR strategy
    #[arg(long, global = true)]
    atr_lookback: Option<usize>,

    /// Brick size strategy (atr, statistical)
    #[arg(long, global = true)]
    strategy: Option<BrickStrategy>,

    /// Seconds a computed chart is reused
    #[arg(long, global = true)]
    cache_ttl: Option<f64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render one tick file to Renko bricks
    Render {
        /// Source identifier (file stem or file name in the data directory)
        source: String,

        /// Output file path. Defaults to <source>.renko.<format>
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "csv")]
        format: Format,

        /// Also write the intermediate OHLC bars to this path
        #[arg(long)]
        bars: Option<PathBuf>,
    },

    /// Render every tick file in the data directory
    RenderAll {
        /// Output directory. Files named <source>.renko.<format>
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "csv")]
        format: Format,

        /// Maximum files rendered concurrently
        #[arg(long, default_value = "4")]
        parallel: usize,
    },

    /// List tick files in the data directory
    List,

    /// Check the data directory and show engine counters and the cache
    Status {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show tick statistics and brick size estimates for a file
    Info {
        /// Source identifier
        source: String,
    },

    /// Interactively render files and inspect the cache
    Browse,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let Some(command) = cli.command.as_ref() else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let config = engine_config(&cli)?;
    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(DirectorySource::default_root);
    tracing::debug!(data_dir = %data_dir.display(), ?config, "starting");

    let engine = RenkoEngine::new(DirectorySource::new(data_dir), config)
        .context("Invalid engine configuration")?;

    match command {
        Commands::Render {
            source,
            output,
            format,
            bars,
        } => commands::render::render(
            &engine,
            source,
            output.clone(),
            *format,
            bars.as_deref(),
            cli.quiet,
        ),
        Commands::RenderAll {
            output_dir,
            format,
            parallel,
        } => {
            commands::render_all::render_all(
                Arc::new(engine),
                output_dir.clone(),
                *format,
                *parallel,
                cli.quiet,
            )
            .await
        }
        Commands::List => commands::list::list_sources(&engine),
        Commands::Status { json } => commands::status::status(&engine, *json),
        Commands::Info { source } => commands::info::show_info(&engine, source),
        Commands::Browse => commands::browse::browse(&engine),
    }
}

/// Installs the stderr subscriber. `RUST_LOG` overrides the flag-derived level.
fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Builds the engine configuration from the optional file and flag overrides.
fn engine_config(cli: &Cli) -> Result<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => EngineConfig::default(),
    };

    if let Some(bucket) = cli.bucket {
        config.bucket_width = bucket;
    }
    if let Some(lookback) = cli.atr_lookback {
        config.atr_lookback = lookback;
    }
    if let Some(strategy) = cli.strategy {
        config.brick_strategy = strategy;
    }
    if let Some(ttl) = cli.cache_ttl {
        config.cache_ttl = Duration::try_from_secs_f64(ttl)
            .with_context(|| format!("Invalid cache TTL: {ttl}"))?;
    }

    Ok(config)
}
