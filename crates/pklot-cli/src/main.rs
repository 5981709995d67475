//! # pklot CLI entry point
//!
//! Parses command-line arguments, loads the facility configuration and
//! dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pklot_cli::providers::run_providers;
use pklot_cli::quote::{run_quote, QuoteArgs};
use pklot_cli::simulate::{run_simulate, SimulateArgs};
use pklot_cli::spots::run_spots;
use pklot_cli::CliContext;

/// Parking facility toolchain.
///
/// Replays gate events against a configured facility, quotes fees and
/// inspects spot inventory and payment providers.
#[derive(Parser, Debug)]
#[command(name = "pklot", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the facility configuration (YAML). Defaults to the demo lot.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON objects on stderr.
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a gate event script and print one JSON line per event.
    Simulate(SimulateArgs),

    /// Price a stay of a given length.
    Quote(QuoteArgs),

    /// List spot inventory and free counts per category.
    Spots,

    /// List payment providers and their capabilities.
    Providers,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if cli.json_logs {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let result = CliContext::load(cli.config.as_deref()).and_then(|ctx| match &cli.command {
        Commands::Simulate(args) => run_simulate(args, &ctx),
        Commands::Quote(args) => run_quote(args, &ctx),
        Commands::Spots => run_spots(&ctx),
        Commands::Providers => run_providers(&ctx),
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
