//! CLI entry point for the glidepath planner.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use glidepath_cli::commands::{self, PlanOptions};
use glidepath_cli::config::Config;
use glidepath_cli::error::Error;

#[derive(Parser)]
#[command(name = "glidepath")]
#[command(about = "Risk-tiered allocation curve and rebalance planner")]
#[command(version)]
struct Cli {
    /// Path to config TOML (default: ./glidepath.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the allocation curve
    Curve {
        /// Show a single risk level (clamped to 1-10)
        #[arg(long, allow_negative_numbers = true)]
        level: Option<i64>,
    },

    /// Compute a rebalance plan for a holdings snapshot
    Plan {
        /// Path to holdings.json
        holdings: PathBuf,

        /// Risk level, overriding the config (clamped to 1-10)
        #[arg(long, allow_negative_numbers = true)]
        level: Option<i64>,

        /// Drift tolerance in percentage points, overriding the config
        #[arg(long, allow_negative_numbers = true)]
        tolerance: Option<f64>,

        /// Print the plan as JSON
        #[arg(long)]
        json: bool,

        /// Do not append to the audit log
        #[arg(long)]
        no_audit: bool,
    },

    /// Validate the built-in curve and the config
    Check,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let cli = Cli::parse();

    let config = match Config::resolve(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {e}");
            process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Curve { level } => commands::show_curve(level),
        Command::Plan {
            holdings,
            level,
            tolerance,
            json,
            no_audit,
        } => {
            let opts = PlanOptions {
                level,
                tolerance_pct: tolerance,
                json,
                no_audit,
            };
            commands::run_plan(&config, &holdings, &opts)
        }
        Command::Check => commands::run_check(&config),
    };

    if let Err(e) = result {
        match &e {
            Error::Plan(_) => {
                eprintln!("Error: {e}");
                process::exit(2);
            }
            _ => {
                eprintln!("Error: {e}");
                process::exit(1);
            }
        }
    }
}
