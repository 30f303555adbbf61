//! Membership fee estimator
//!
//! Loads a sectioned CSV rate sheet and prices a membership from the same
//! selections the fee form offers:
//!
//! - `options` lists the values each dropdown accepts
//! - `check` validates the rate sheet and summarises its sections
//! - `calc` prints the national, regional and total fee

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use fee_engine::{load_tables_with, FeeError, FeeTables, LoaderConfig};
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;

use commands::CalcArgs;

/// Command-line arguments for the fee estimator
#[derive(Parser, Debug)]
#[command(name = "fee-cli")]
#[command(version, about = "Membership fee estimator driven by a CSV rate sheet")]
struct Args {
    /// Rate sheet to load
    #[arg(short, long, default_value = "data/fees.csv")]
    file: PathBuf,

    /// Treat missing sections, duplicate labels and short rows as warnings
    #[arg(long)]
    lenient: bool,

    /// JSON file overriding the loader configuration (section names)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the options for every form dropdown
    Options {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Load the rate sheet and report what it contains
    Check,
    /// Calculate the fee for a category and its selections
    Calc(CalcArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    // stdout carries command output only
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(args).await {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::from(exit_status(&err))
        }
    }
}

async fn run(args: Args) -> anyhow::Result<String> {
    let config = loader_config(&args).await?;
    let tables = load(&args.file, &config).await?;

    match &args.command {
        Command::Options { json } => commands::options(&tables, *json),
        Command::Check => Ok(commands::check(&tables)),
        Command::Calc(calc) => commands::calc(&tables, calc),
    }
}

async fn loader_config(args: &Args) -> anyhow::Result<LoaderConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let json = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            LoaderConfig::from_json(&json)
                .with_context(|| format!("Invalid config {}", path.display()))?
        }
        None => LoaderConfig::default(),
    };
    if args.lenient {
        config.strict = false;
    }
    Ok(config)
}

async fn load(path: &Path, config: &LoaderConfig) -> anyhow::Result<FeeTables> {
    info!("Loading rate sheet {}", path.display());
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read rate sheet {}", path.display()))?;
    load_tables_with(&text, config)
        .with_context(|| format!("Failed to load rate sheet {}", path.display()))
}

/// 2 for problems with the user's selections, 1 for everything else
fn exit_status(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<FeeError>() {
        Some(fee_err) if fee_err.is_validation() => 2,
        _ => 1,
    }
}
