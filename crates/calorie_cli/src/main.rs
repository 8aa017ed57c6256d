//! Command-line shell over `calorie_core`.
//!
//! # Responsibility
//! - Validate raw input before it reaches the ledger.
//! - Open the tracker database and render derived values after each command.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "calorie_cli", version, about = "Track meals, workouts and a daily calorie limit")]
struct Cli {
    /// Tracker database file (defaults to the platform data directory)
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// TOML settings file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Meal log
    Meal {
        #[command(subcommand)]
        action: commands::EntryAction,
    },
    /// Workout log
    Workout {
        #[command(subcommand)]
        action: commands::EntryAction,
    },
    /// Set the daily calorie limit
    Limit { calories: u32 },
    /// Clear all meals, workouts and the running total (the limit is kept)
    Reset,
    /// Show the current balance
    Status {
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = commands::open_tracker(cli.db, cli.config).and_then(|mut tracker| {
        match cli.command {
            Commands::Meal { action } => {
                commands::run_entry(&mut tracker, calorie_core::EntryKind::Meal, action)
            }
            Commands::Workout { action } => {
                commands::run_entry(&mut tracker, calorie_core::EntryKind::Workout, action)
            }
            Commands::Limit { calories } => commands::run_limit(&mut tracker, calories),
            Commands::Reset => commands::run_reset(&mut tracker),
            Commands::Status { json } => commands::run_status(&tracker, json),
        }
    });

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
