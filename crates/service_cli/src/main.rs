//! Merton CLI - Command Line Operations for Structural Credit Risk
//!
//! This is the operational entry point for the Merton workspace.
//!
//! # Commands
//!
//! - `merton run` - Calibrate every firm-date and write result files per variant
//! - `merton calibrate --equity-value <E> ...` - Calibrate a single observation
//! - `merton compare` - Compare naive and improved result files
//!
//! # Architecture
//!
//! As part of the **S**ervice layer, this crate wires the adapter
//! (`adapter_loader`) to the engine (`merton_risk`) and owns configuration
//! and the tracing subscriber.

use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod error;

pub use error::{CliError, Result};

use crate::config::Settings;

/// Merton structural credit model CLI
#[derive(Parser)]
#[command(name = "merton")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "merton.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one or both model variants over the input data
    Run {
        /// Variant to run (naive, improved, both)
        #[arg(short = 'm', long, default_value = "both")]
        variant: String,

        /// Directory holding the input CSV files
        #[arg(short, long)]
        data_dir: Option<String>,

        /// Directory receiving the result files
        #[arg(short, long)]
        output_dir: Option<String>,

        /// Debt alignment override (forward-fill, fiscal-year)
        #[arg(short = 'a', long)]
        debt_alignment: Option<String>,
    },

    /// Calibrate asset value and volatility for one observation
    Calibrate {
        /// Equity value E
        #[arg(short = 'e', long)]
        equity_value: f64,

        /// Annualised equity volatility
        #[arg(short = 's', long)]
        equity_vol: f64,

        /// Face value of debt D
        #[arg(short, long)]
        debt: f64,

        /// Debt maturity in years (defaults to the configured horizon)
        #[arg(short = 't', long)]
        maturity: Option<f64>,

        /// Continuously compounded risk-free rate
        #[arg(short, long, default_value = "0.0", allow_negative_numbers = true)]
        rate: f64,

        /// Output format (json, csv, table)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Compare naive and improved result files
    Compare {
        /// Directory holding the result files
        #[arg(short, long)]
        output_dir: Option<String>,

        /// Write the per-firm comparison to this CSV file
        #[arg(short = 'w', long)]
        write: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialise tracing
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let settings = Settings::load(&cli.config)?;
    debug!(config = %cli.config, ?settings, "Loaded settings");

    rayon::ThreadPoolBuilder::new()
        .num_threads(settings.engine.threads)
        .build_global()?;

    match cli.command {
        Commands::Run {
            variant,
            data_dir,
            output_dir,
            debt_alignment,
        } => commands::run::run(
            &settings,
            &variant,
            data_dir.as_deref(),
            output_dir.as_deref(),
            debt_alignment.as_deref(),
        ),
        Commands::Calibrate {
            equity_value,
            equity_vol,
            debt,
            maturity,
            rate,
            format,
        } => commands::calibrate::run(
            &settings,
            &commands::calibrate::PointInput {
                equity_value,
                equity_vol,
                debt,
                maturity: maturity.unwrap_or(settings.model.maturity_years),
                rate,
            },
            &format,
        ),
        Commands::Compare { output_dir, write } => {
            commands::compare::run(&settings, output_dir.as_deref(), write.as_deref())
        }
    }
}
