//! Headless battle runner.
//!
//! Runs battles without graphics. Reports are JSON on stdout; logs go to
//! stderr.
//!
//! # Usage
//!
//! ```bash
//! # Simulate one battle with the bundled roster
//! cargo run -p battle_headless -- simulate --seed 7 --budget 1200
//!
//! # Run a batch for balance testing
//! cargo run -p battle_headless -- batch --count 500 --output results/
//!
//! # Print the army a budget buys
//! cargo run -p battle_headless -- preset --roster data/roster.ron
//!
//! # Check that a seed replays identically
//! cargo run -p battle_headless -- verify --seed 12345 --runs 5
//! ```

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use battle_core::unit::UnitArchetype;
use battle_headless::{
    batch::{run_batch, verify_determinism, BatchConfig},
    roster::roster_or_default,
    runner::{generate_preset, run_battle, RunConfig},
};

#[derive(Parser)]
#[command(name = "battle_headless")]
#[command(about = "Headless tactical battle runner")]
#[command(version)]
struct Cli {
    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a single battle and print its report
    Simulate {
        /// Roster file (defaults to the bundled roster)
        #[arg(short, long)]
        roster: Option<PathBuf>,

        /// Points each side may spend
        #[arg(short, long, default_value = "1500")]
        budget: u32,

        /// Placement seed
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Maximum rounds (0 = unlimited)
        #[arg(long, default_value = "500")]
        max_rounds: u32,

        /// Wall-clock limit in milliseconds (0 = unlimited)
        #[arg(long, default_value = "10000")]
        timeout_ms: u64,
    },

    /// Run a batch of battles for balance testing
    Batch {
        /// Roster file (defaults to the bundled roster)
        #[arg(short, long)]
        roster: Option<PathBuf>,

        /// Points each side may spend
        #[arg(short, long, default_value = "1500")]
        budget: u32,

        /// Starting seed
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Number of battles to run
        #[arg(short, long, default_value = "100")]
        count: u32,

        /// Maximum parallel battles (0 = auto)
        #[arg(short, long, default_value = "0")]
        parallel: u32,

        /// Output directory for results
        #[arg(short, long, default_value = "results")]
        output: PathBuf,
    },

    /// Print the army a budget buys
    Preset {
        /// Roster file (defaults to the bundled roster)
        #[arg(short, long)]
        roster: Option<PathBuf>,

        /// Points to spend
        #[arg(short, long, default_value = "1500")]
        budget: u32,

        /// Placement seed
        #[arg(long, default_value = "0")]
        seed: u64,
    },

    /// Verify determinism by running the same seed multiple times
    Verify {
        /// Roster file (defaults to the bundled roster)
        #[arg(short, long)]
        roster: Option<PathBuf>,

        /// Seed to verify
        #[arg(long, default_value = "12345")]
        seed: u64,

        /// Number of verification runs
        #[arg(long, default_value = "5")]
        runs: u32,
    },
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging to stderr (stdout is for reports)
    let log_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(true),
        )
        .with(filter)
        .init();

    match cli.command {
        Commands::Simulate {
            roster,
            budget,
            seed,
            max_rounds,
            timeout_ms,
        } => {
            let config = RunConfig::default()
                .with_seed(seed)
                .with_budget(budget)
                .with_max_rounds(max_rounds)
                .with_timeout_ms(timeout_ms)
                .with_action_log(true);
            cmd_simulate(roster.as_deref(), &config);
        }
        Commands::Batch {
            roster,
            budget,
            seed,
            count,
            parallel,
            output,
        } => {
            let config = BatchConfig::new(count)
                .with_seed(seed)
                .with_parallelism(parallel)
                .with_run(RunConfig::default().with_budget(budget));
            cmd_batch(roster.as_deref(), config, &output);
        }
        Commands::Preset {
            roster,
            budget,
            seed,
        } => {
            let config = RunConfig::default().with_seed(seed).with_budget(budget);
            cmd_preset(roster.as_deref(), &config);
        }
        Commands::Verify { roster, seed, runs } => {
            cmd_verify(roster.as_deref(), seed, runs);
        }
    }
}

/// Load the roster or exit.
fn load_or_exit(path: Option<&Path>) -> Vec<UnitArchetype> {
    match roster_or_default(path) {
        Ok(roster) => roster,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load roster");
            eprintln!("FATAL: Cannot load roster: {}", e);
            std::process::exit(1);
        }
    }
}

/// Print a value as pretty JSON on stdout or exit.
fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Failed to encode report: {}", e);
            std::process::exit(1);
        }
    }
}

/// Simulate a single battle
fn cmd_simulate(roster: Option<&Path>, config: &RunConfig) {
    let roster = load_or_exit(roster);
    let report = run_battle(config, &roster);
    print_json(&report);
}

/// Run a batch of battles
fn cmd_batch(roster: Option<&Path>, config: BatchConfig, output: &Path) {
    let roster = load_or_exit(roster);

    let num_cpus = std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(1);
    tracing::info!(
        count = config.battle_count,
        parallel = config.parallel_battles,
        seed = config.seed_start,
        budget = config.run.budget,
        output = %output.display(),
        cpus_available = num_cpus,
        "Batch configuration"
    );

    let results = match run_batch(config, &roster) {
        Ok(results) => results,
        Err(e) => {
            eprintln!("FATAL: Batch failed: {}", e);
            std::process::exit(1);
        }
    };

    let results_path = output.join("batch_results.json");
    if let Err(e) = results.save(&results_path) {
        tracing::error!(error = %e, path = %results_path.display(), "Failed to save results");
        eprintln!("FATAL: Failed to save results: {}", e);
        std::process::exit(1);
    }

    let summary = &results.summary;
    eprintln!("\n{}", "=".repeat(50));
    eprintln!("BATCH COMPLETE");
    eprintln!("{}", "=".repeat(50));
    eprintln!("Battles played: {}", summary.total_battles);
    eprintln!("Duration: {:.1}s", results.duration_seconds);
    eprintln!("Average rounds: {:.1}", summary.average_rounds);
    eprintln!("\nWin Rates:");
    for (side, rate) in &summary.win_rates {
        eprintln!("  {}: {:.1}%", side, rate * 100.0);
    }
    if summary.mutual_destructions > 0 {
        eprintln!("Mutual destructions: {}", summary.mutual_destructions);
    }
    if summary.unfinished > 0 {
        eprintln!("Unfinished: {}", summary.unfinished);
    }
    eprintln!("\nResults saved to: {}", results_path.display());
}

/// Print an assembled army
fn cmd_preset(roster: Option<&Path>, config: &RunConfig) {
    let roster = load_or_exit(roster);
    print_json(&generate_preset(config, &roster));
}

/// Verify determinism
fn cmd_verify(roster: Option<&Path>, seed: u64, runs: u32) {
    let roster = load_or_exit(roster);
    tracing::info!("Verifying determinism: seed {} ({} runs)", seed, runs);

    let config = RunConfig::default().with_seed(seed);
    if verify_determinism(&config, &roster, runs) {
        eprintln!("PASS: All {} runs produced identical results", runs);
    } else {
        eprintln!("FAIL: Non-determinism detected!");
        std::process::exit(1);
    }
}
