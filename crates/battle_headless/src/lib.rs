//! Headless battle runner for balance testing and CI verification.
//!
//! This crate hosts the battle engine from `battle_core` without any
//! rendering:
//!
//! - **Behaviors**: reference attack capabilities that pick targets, move,
//!   and resolve damage
//! - **Rosters**: RON archetype lists, with a bundled default
//! - **Runner**: one seeded battle with a round limit and timeout
//! - **Batch**: many seeded battles in parallel, summarized as JSON
//!
//! Logs go to stderr; reports go to stdout or to files.
//!
//! # Example
//!
//! ```bash
//! # One battle, report as JSON
//! cargo run -p battle_headless -- simulate --seed 42
//!
//! # Balance batch
//! cargo run -p battle_headless -- batch --count 1000 --output results/
//!
//! # Inspect an assembled army
//! cargo run -p battle_headless -- preset --budget 800
//! ```

pub mod batch;
pub mod behaviors;
pub mod roster;
pub mod runner;

pub use batch::{run_batch, BatchConfig, BatchResults, BatchSummary};
pub use behaviors::{behavior_by_name, MeleeStrike, RangedVolley};
pub use roster::{default_roster, load_roster, roster_or_default};
pub use runner::{run_battle, BattleReport, RunConfig, RunnerError, TracingBattleLog, Verdict};
