//! SoleSim command-line front end.
//!
//! Headless access to the sole contact model and its design tooling.
//!
//! # Commands
//!
//! - `solesim static` - Static contact solve with comfort index
//! - `solesim walk` - Walk-cycle sweep with data log and wear summary
//! - `solesim metrics` - Life, mass, cost and carbon estimates
//! - `solesim design` - Inverse design for a target comfort score
//!
//! Every command accepts the design flags (`--material`, `--heel`, `--fore`,
//! `--arch`, `--modulus`, `--tread`, `--gait`, `--weight`) and a JSON
//! scenario file via `--config`. `--json` switches output to JSON.
//!
//! Logging goes to stderr and honours `RUST_LOG`; `-v` raises it to debug.

mod args;
mod commands;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::args::SimArgs;

/// Footwear sole contact simulator
#[derive(Parser, Debug)]
#[command(name = "solesim")]
#[command(about = "Plantar pressure, gait and wear simulation for shoe soles", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Print reports as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Solve the static contact for one body weight
    Static {
        #[command(flatten)]
        sim: SimArgs,
    },

    /// Sweep a full stride from heel strike to toe-off
    Walk {
        #[command(flatten)]
        sim: SimArgs,

        /// Number of gait phases sampled
        #[arg(long, default_value_t = 20)]
        steps: usize,
    },

    /// Estimate product metrics for a material and design
    Metrics {
        #[command(flatten)]
        sim: SimArgs,
    },

    /// Propose a design that reaches a target comfort score
    Design {
        #[command(flatten)]
        sim: SimArgs,

        /// Comfort score to aim for (0-100)
        #[arg(long, default_value_t = 90.0)]
        target_score: f64,

        /// Number of simulated training designs
        #[arg(long, default_value_t = 50)]
        samples: usize,

        /// Seed for reproducible sampling
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Static { sim } => commands::run_static(&sim, cli.json),
        Commands::Walk { sim, steps } => commands::run_walk(&sim, steps, cli.json),
        Commands::Metrics { sim } => commands::run_metrics(&sim, cli.json),
        Commands::Design {
            sim,
            target_score,
            samples,
            seed,
        } => commands::run_design(&sim, target_score, samples, seed, cli.json),
    }
}
