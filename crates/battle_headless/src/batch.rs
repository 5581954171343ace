//! Batch battle runner for balance testing.
//!
//! Runs many seeded battles in parallel using rayon. Every battle assembles
//! and owns its own armies, so battles share nothing but the roster.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Instant;

use battle_core::unit::UnitArchetype;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::runner::{run_battle, BattleReport, RunConfig, RunnerError, Verdict};

/// Configuration for a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Settings shared by every battle. Its seed is replaced per battle.
    pub run: RunConfig,
    /// Number of battles to run.
    pub battle_count: u32,
    /// Maximum parallel battles (0 = use rayon default).
    pub parallel_battles: u32,
    /// Seed of the first battle; battle `i` uses `seed_start + i`.
    pub seed_start: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            run: RunConfig::default(),
            battle_count: 100,
            parallel_battles: 0,
            seed_start: 0,
        }
    }
}

impl BatchConfig {
    /// Create a config for `battle_count` battles.
    #[must_use]
    pub fn new(battle_count: u32) -> Self {
        Self {
            battle_count,
            ..Default::default()
        }
    }

    /// Set the first seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed_start = seed;
        self
    }

    /// Set per-battle settings.
    #[must_use]
    pub fn with_run(mut self, run: RunConfig) -> Self {
        self.run = run;
        self
    }

    /// Limit parallelism.
    #[must_use]
    pub fn with_parallelism(mut self, threads: u32) -> Self {
        self.parallel_battles = threads;
        self
    }
}

/// Aggregate statistics over a batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Battles run.
    pub total_battles: u32,
    /// Battles won per side.
    pub wins: BTreeMap<String, u32>,
    /// Win rate per side, 0.0 to 1.0.
    pub win_rates: BTreeMap<String, f64>,
    /// Battles where both armies were gone.
    pub mutual_destructions: u32,
    /// Battles stopped by the round limit or the timeout.
    pub unfinished: u32,
    /// Mean rounds per battle.
    pub average_rounds: f64,
}

impl BatchSummary {
    /// Summarize a set of reports.
    #[must_use]
    pub fn from_reports(reports: &[BattleReport]) -> Self {
        let mut summary = Self {
            total_battles: u32::try_from(reports.len()).unwrap_or(u32::MAX),
            ..Default::default()
        };
        if reports.is_empty() {
            return summary;
        }

        let mut total_rounds: u64 = 0;
        for report in reports {
            total_rounds += u64::from(report.rounds);
            match report.verdict {
                Verdict::Victory => {
                    if let Some(winner) = report.winner {
                        *summary.wins.entry(winner.to_string()).or_insert(0) += 1;
                    }
                }
                Verdict::MutualDestruction => summary.mutual_destructions += 1,
                Verdict::RoundLimit | Verdict::TimedOut => summary.unfinished += 1,
            }
        }

        let total = reports.len() as f64;
        summary.win_rates = summary
            .wins
            .iter()
            .map(|(side, &wins)| (side.clone(), f64::from(wins) / total))
            .collect();
        summary.average_rounds = total_rounds as f64 / total;
        summary
    }
}

/// Results from a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResults {
    /// Configuration used.
    pub config: BatchConfig,
    /// Per-battle reports, in seed order.
    pub reports: Vec<BattleReport>,
    /// Aggregate summary.
    pub summary: BatchSummary,
    /// Total runtime.
    pub duration_seconds: f64,
}

impl BatchResults {
    /// Save results to a JSON file, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), RunnerError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load results from a JSON file.
    pub fn load(path: &Path) -> Result<Self, RunnerError> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

fn run_all(config: &BatchConfig, roster: &[UnitArchetype]) -> Vec<BattleReport> {
    let completed = AtomicU32::new(0);

    (0..config.battle_count)
        .into_par_iter()
        .map(|i| {
            let run = config
                .run
                .clone()
                .with_seed(config.seed_start.wrapping_add(u64::from(i)));
            let report = run_battle(&run, roster);

            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
            if done % 10 == 0 {
                debug!("Progress: {}/{}", done, config.battle_count);
            }
            report
        })
        .collect()
}

/// Run a batch of battles.
pub fn run_batch(config: BatchConfig, roster: &[UnitArchetype]) -> Result<BatchResults, RunnerError> {
    let start = Instant::now();
    info!(
        battles = config.battle_count,
        seed_start = config.seed_start,
        budget = config.run.budget,
        "Starting batch run"
    );

    let reports = if config.parallel_battles > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(config.parallel_battles as usize)
            .build()?
            .install(|| run_all(&config, roster))
    } else {
        run_all(&config, roster)
    };

    let summary = BatchSummary::from_reports(&reports);
    let duration_seconds = start.elapsed().as_secs_f64();

    info!(
        "Batch complete: {} battles in {:.1}s ({:.1} battles/sec)",
        reports.len(),
        duration_seconds,
        reports.len() as f64 / duration_seconds.max(0.001)
    );

    Ok(BatchResults {
        config,
        reports,
        summary,
        duration_seconds,
    })
}

/// Run the same seed several times and check every report matches.
pub fn verify_determinism(run: &RunConfig, roster: &[UnitArchetype], runs: u32) -> bool {
    let first = run_battle(run, roster);
    (1..runs).all(|_| run_battle(run, roster) == first)
}
