//! Single-battle runner.
//!
//! Assembles both armies from one roster and budget, deploys them on
//! opposite edges of the field, and plays rounds until a side is wiped out,
//! the round limit is hit, or the wall-clock timeout trips.
//!
//! A seed fully determines the placement and therefore the outcome.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use battle_core::assembly::assemble_army;
use battle_core::error::BattleError;
use battle_core::grid::{GridPos, FIELD_WIDTH};
use battle_core::simulation::{Battle, BattleLog, RoundOutcome};
use battle_core::unit::{Army, Side, UnitArchetype, UnitInstance};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for runner operations.
#[derive(Error, Debug)]
pub enum RunnerError {
    /// Failed to read or write a file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Roster data was rejected.
    #[error("Invalid roster: {0}")]
    Battle(#[from] BattleError),
    /// Failed to encode or decode JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// A roster entry names a behavior the runner does not provide.
    #[error("Unit '{unit_type}' uses unknown behavior '{behavior}'")]
    UnknownBehavior {
        /// Archetype type name.
        unit_type: String,
        /// The unrecognized behavior name.
        behavior: String,
    },
    /// Failed to build the batch thread pool.
    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Configuration for one battle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Seed for army placement.
    pub seed: u64,
    /// Points each side may spend.
    pub budget: u32,
    /// Maximum rounds before the battle is called (0 = unlimited).
    pub max_rounds: u32,
    /// Wall-clock limit in milliseconds (0 = unlimited).
    pub timeout_ms: u64,
    /// Emit one tracing event per action.
    pub log_actions: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            budget: 1500,
            max_rounds: 500,
            timeout_ms: 10_000,
            log_actions: false,
        }
    }
}

impl RunConfig {
    /// Set the placement seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the per-side budget.
    #[must_use]
    pub fn with_budget(mut self, budget: u32) -> Self {
        self.budget = budget;
        self
    }

    /// Set the round limit.
    #[must_use]
    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    /// Set the wall-clock limit.
    #[must_use]
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Enable per-action tracing.
    #[must_use]
    pub fn with_action_log(mut self, enabled: bool) -> Self {
        self.log_actions = enabled;
        self
    }
}

/// Reports every action as a structured tracing event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingBattleLog;

impl BattleLog for TracingBattleLog {
    fn record(&mut self, actor: &UnitInstance, target: Option<&UnitInstance>) {
        match target {
            Some(target) => tracing::info!(
                actor = %actor.name,
                at = %actor.position,
                target = %target.name,
                target_health = target.health,
                target_alive = target.alive,
                "Attack"
            ),
            None => tracing::info!(actor = %actor.name, at = %actor.position, "No target"),
        }
    }
}

/// How a battle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// One side was wiped out.
    Victory,
    /// Both sides were empty when the battle was decided.
    MutualDestruction,
    /// The round limit was reached with both sides standing.
    RoundLimit,
    /// The wall-clock limit tripped the cancellation flag.
    TimedOut,
}

/// End-of-battle state of one army.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArmyReport {
    /// Points spent assembling the army.
    pub points: u32,
    /// Units deployed.
    pub deployed: usize,
    /// Units still alive.
    pub survivors: usize,
    /// Health left across all survivors.
    pub remaining_health: u32,
}

impl ArmyReport {
    fn from_army(army: &Army) -> Self {
        Self {
            points: army.points(),
            deployed: army.len(),
            survivors: army.living_count(),
            remaining_health: army.living().map(|(_, unit)| unit.health).sum(),
        }
    }
}

/// Serializable result of one battle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleReport {
    /// Placement seed.
    pub seed: u64,
    /// Rounds started.
    pub rounds: u32,
    /// How the battle ended.
    pub verdict: Verdict,
    /// The winning side, if any.
    pub winner: Option<Side>,
    /// Player army state.
    pub player: ArmyReport,
    /// Computer army state.
    pub computer: ArmyReport,
}

/// One unit of an assembled preset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedUnit {
    /// Instance name.
    pub name: String,
    /// Archetype type name.
    pub unit_type: String,
    /// Deployment cell.
    pub position: GridPos,
}

/// An assembled army, as printed by the `preset` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetReport {
    /// Points spent.
    pub points: u32,
    /// Units in creation order.
    pub units: Vec<PlacedUnit>,
}

impl From<&Army> for PresetReport {
    fn from(army: &Army) -> Self {
        Self {
            points: army.points(),
            units: army
                .units()
                .iter()
                .map(|unit| PlacedUnit {
                    name: unit.name.clone(),
                    unit_type: unit.unit_type.clone(),
                    position: unit.position,
                })
                .collect(),
        }
    }
}

/// Move an army deployed on the left edge to the mirrored right edge.
pub fn mirror_to_right_edge(army: &mut Army) {
    for unit in army.units_mut() {
        unit.position = GridPos::new(FIELD_WIDTH - 1 - unit.position.x, unit.position.y);
    }
}

/// Assemble both armies from one seeded generator, player first.
#[must_use]
pub fn deploy_armies(config: &RunConfig, roster: &[UnitArchetype]) -> (Army, Army) {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let player = assemble_army(roster, config.budget, &mut rng);
    let mut computer = assemble_army(roster, config.budget, &mut rng);
    mirror_to_right_edge(&mut computer);
    (player, computer)
}

/// Assemble a single army, as the player would receive it.
#[must_use]
pub fn generate_preset(config: &RunConfig, roster: &[UnitArchetype]) -> PresetReport {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    PresetReport::from(&assemble_army(roster, config.budget, &mut rng))
}

/// Play rounds until the battle is decided, cancelled, or out of rounds.
fn play(battle: &mut Battle, max_rounds: u32, stop: &AtomicBool) -> Verdict {
    loop {
        if max_rounds > 0 && battle.rounds() >= max_rounds {
            tracing::warn!(rounds = battle.rounds(), "Round limit reached");
            return Verdict::RoundLimit;
        }
        match battle.play_round(stop) {
            RoundOutcome::Completed { actions } => {
                tracing::debug!(round = battle.rounds(), actions, "Round complete");
            }
            RoundOutcome::Finished => {
                return match battle.field().survivor() {
                    Some(_) => Verdict::Victory,
                    None => Verdict::MutualDestruction,
                };
            }
            RoundOutcome::Cancelled => {
                tracing::warn!(rounds = battle.rounds(), "Battle timed out");
                return Verdict::TimedOut;
            }
        }
    }
}

/// Run one battle and report the result.
///
/// # Panics
///
/// Panics if a roster archetype has zero cost. Rosters loaded through
/// [`crate::roster`] are validated.
#[must_use]
pub fn run_battle(config: &RunConfig, roster: &[UnitArchetype]) -> BattleReport {
    let (player, computer) = deploy_armies(config, roster);
    let mut battle = Battle::new(player, computer);
    if config.log_actions {
        battle = battle.with_log(Box::new(TracingBattleLog));
    }

    tracing::info!(
        seed = config.seed,
        budget = config.budget,
        player_units = battle.field().army(Side::Player).len(),
        computer_units = battle.field().army(Side::Computer).len(),
        "Starting battle"
    );

    let stop = AtomicBool::new(false);
    let verdict = if config.timeout_ms == 0 {
        play(&mut battle, config.max_rounds, &stop)
    } else {
        let timeout = Duration::from_millis(config.timeout_ms);
        thread::scope(|scope| {
            let (done_tx, done_rx) = mpsc::channel::<()>();
            let stop = &stop;
            scope.spawn(move || {
                if let Err(RecvTimeoutError::Timeout) = done_rx.recv_timeout(timeout) {
                    stop.store(true, Ordering::Relaxed);
                }
            });

            let verdict = play(&mut battle, config.max_rounds, stop);
            done_tx.send(()).ok();
            verdict
        })
    };

    let winner = battle.field().survivor().filter(|_| verdict == Verdict::Victory);
    let report = BattleReport {
        seed: config.seed,
        rounds: battle.rounds(),
        verdict,
        winner,
        player: ArmyReport::from_army(battle.field().army(Side::Player)),
        computer: ArmyReport::from_army(battle.field().army(Side::Computer)),
    };

    tracing::info!(
        seed = report.seed,
        rounds = report.rounds,
        verdict = ?report.verdict,
        winner = ?report.winner,
        "Battle complete"
    );
    report
}
