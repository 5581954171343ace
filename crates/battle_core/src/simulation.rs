//! Round-based battle simulation.
//!
//! A battle alternates between the two armies in rounds. Each round:
//!
//! 1. Living units of each side are sorted by base attack, strongest first.
//!    The sort is stable, so equal attackers keep their army order.
//! 2. The two lists are interleaved one unit at a time, computer side
//!    first. Whatever remains of the longer list is appended.
//! 3. Units act in that order through their [`AttackCapability`]. The round
//!    stops as soon as either army has no living units left.
//!
//! The engine never resolves damage itself. Capabilities mutate the
//! battlefield; the engine only observes liveness.
//!
//! # Cancellation
//!
//! [`Battle::run`] and [`Battle::play_round`] take a stop flag that is
//! checked before every round and before every unit action. A cancelled
//! battle is left between two actions, never halfway through one.
//!
//! # Example
//!
//! ```
//! use std::sync::atomic::AtomicBool;
//! use battle_core::simulation::{Battle, BattleOutcome};
//! use battle_core::unit::Army;
//!
//! // Two empty armies: decided before the first round, nobody wins
//! let mut battle = Battle::new(Army::default(), Army::default());
//! let outcome = battle.run(&AtomicBool::new(false));
//! assert_eq!(outcome, BattleOutcome::Finished { rounds: 0, winner: None });
//! ```
//!
//! [`AttackCapability`]: crate::unit::AttackCapability

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::battlefield::Battlefield;
use crate::unit::{Army, Side, UnitId, UnitInstance};

/// Side whose units open each round's interleaving.
pub const SECONDARY_SIDE: Side = Side::Computer;

/// Side whose units follow in each round's interleaving.
pub const PRIMARY_SIDE: Side = Side::Player;

/// Receives one record per executed action.
pub trait BattleLog: Send {
    /// `actor` acted and attacked `target`, or could not act if `None`.
    fn record(&mut self, actor: &UnitInstance, target: Option<&UnitInstance>);
}

/// Whether the battle can continue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleState {
    /// Both armies have at least one living unit.
    Active,
    /// At least one army has been wiped out.
    Finished,
}

/// Result of a single round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    /// Every scheduled unit got its turn and both armies survive.
    Completed {
        /// Number of actions executed.
        actions: usize,
    },
    /// An army was wiped out. Remaining turns were skipped.
    Finished,
    /// The stop flag was raised before the round ended.
    Cancelled,
}

/// Result of a whole battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleOutcome {
    /// An army was wiped out.
    Finished {
        /// Rounds started, including the deciding one.
        rounds: u32,
        /// The surviving side, or `None` if both armies are gone.
        winner: Option<Side>,
    },
    /// The caller stopped the battle before it was decided.
    Cancelled {
        /// Rounds started before cancellation.
        rounds: u32,
    },
}

impl BattleOutcome {
    /// True if the battle ended naturally.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        matches!(self, Self::Finished { .. })
    }

    /// Rounds started.
    #[must_use]
    pub const fn rounds(&self) -> u32 {
        match self {
            Self::Finished { rounds, .. } | Self::Cancelled { rounds } => *rounds,
        }
    }
}

/// Interleave two lists one element at a time, `secondary` first.
///
/// When one list runs out the rest of the other follows in order.
#[must_use]
pub fn interleave<T: Clone>(secondary: &[T], primary: &[T]) -> Vec<T> {
    let mut merged = Vec::with_capacity(secondary.len() + primary.len());
    let mut secondary = secondary.iter();
    let mut primary = primary.iter();

    loop {
        let first = secondary.next();
        let second = primary.next();
        if first.is_none() && second.is_none() {
            break;
        }
        merged.extend(first.cloned());
        merged.extend(second.cloned());
    }

    merged
}

/// Living units of `army`, strongest base attack first.
///
/// Equal attack keeps insertion order.
#[must_use]
pub fn sorted_by_attack(army: &Army, side: Side) -> Vec<UnitId> {
    let mut living: Vec<(UnitId, u32)> = army
        .living()
        .map(|(index, unit)| (UnitId::new(side, index), unit.base_attack))
        .collect();

    living.sort_by(|a, b| b.1.cmp(&a.1));
    living.into_iter().map(|(id, _)| id).collect()
}

/// The action order for one round.
#[must_use]
pub fn build_turn_order(field: &Battlefield) -> Vec<UnitId> {
    let secondary = sorted_by_attack(field.army(SECONDARY_SIDE), SECONDARY_SIDE);
    let primary = sorted_by_attack(field.army(PRIMARY_SIDE), PRIMARY_SIDE);
    interleave(&secondary, &primary)
}

/// One battle between a player army and a computer army.
pub struct Battle {
    field: Battlefield,
    log: Option<Box<dyn BattleLog>>,
    rounds: u32,
}

impl std::fmt::Debug for Battle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Battle")
            .field("field", &self.field)
            .field("has_log", &self.log.is_some())
            .field("rounds", &self.rounds)
            .finish()
    }
}

impl Battle {
    /// Create a battle without a log sink.
    #[must_use]
    pub fn new(player: Army, computer: Army) -> Self {
        Self {
            field: Battlefield::new(player, computer),
            log: None,
            rounds: 0,
        }
    }

    /// Attach a log sink.
    #[must_use]
    pub fn with_log(mut self, log: Box<dyn BattleLog>) -> Self {
        self.log = Some(log);
        self
    }

    /// Current battle state.
    #[must_use]
    pub fn state(&self) -> BattleState {
        if self.field.both_sides_alive() {
            BattleState::Active
        } else {
            BattleState::Finished
        }
    }

    /// Rounds started so far.
    #[must_use]
    pub const fn rounds(&self) -> u32 {
        self.rounds
    }

    /// The battlefield.
    #[must_use]
    pub fn field(&self) -> &Battlefield {
        &self.field
    }

    /// Mutable battlefield, for hosts that adjust state between rounds.
    pub fn field_mut(&mut self) -> &mut Battlefield {
        &mut self.field
    }

    /// Hand both armies back as `(player, computer)`.
    #[must_use]
    pub fn into_armies(self) -> (Army, Army) {
        self.field.into_armies()
    }

    /// Play one round.
    pub fn play_round(&mut self, stop: &AtomicBool) -> RoundOutcome {
        if self.state() == BattleState::Finished {
            return RoundOutcome::Finished;
        }
        if stop.load(Ordering::Relaxed) {
            return RoundOutcome::Cancelled;
        }

        self.rounds += 1;
        let order = build_turn_order(&self.field);
        tracing::debug!(round = self.rounds, scheduled = order.len(), "Round started");

        let mut actions = 0;
        for actor in order {
            if !self.field.both_sides_alive() {
                return RoundOutcome::Finished;
            }
            if stop.load(Ordering::Relaxed) {
                return RoundOutcome::Cancelled;
            }
            if self.act(actor) {
                actions += 1;
            }
        }

        if self.field.both_sides_alive() {
            RoundOutcome::Completed { actions }
        } else {
            RoundOutcome::Finished
        }
    }

    /// Play rounds until an army is wiped out or `stop` is raised.
    ///
    /// If no unit can ever act, only `stop` ends the battle.
    pub fn run(&mut self, stop: &AtomicBool) -> BattleOutcome {
        tracing::info!(
            player_units = self.field.army(Side::Player).living_count(),
            computer_units = self.field.army(Side::Computer).living_count(),
            "Battle started"
        );

        loop {
            match self.play_round(stop) {
                RoundOutcome::Completed { .. } => {}
                RoundOutcome::Finished => {
                    let winner = self.field.survivor();
                    tracing::info!(rounds = self.rounds, ?winner, "Battle finished");
                    return BattleOutcome::Finished {
                        rounds: self.rounds,
                        winner,
                    };
                }
                RoundOutcome::Cancelled => {
                    tracing::warn!(rounds = self.rounds, "Battle cancelled");
                    return BattleOutcome::Cancelled {
                        rounds: self.rounds,
                    };
                }
            }
        }
    }

    /// Let `actor` take its turn. Returns `true` if it acted.
    fn act(&mut self, actor: UnitId) -> bool {
        let capability = match self.field.unit(actor) {
            Some(unit) if unit.is_alive() => match &unit.capability {
                Some(capability) => Arc::clone(capability),
                None => return false,
            },
            _ => return false,
        };

        let target = capability.attack(actor, &mut self.field);

        if let Some(log) = self.log.as_mut() {
            if let Some(unit) = self.field.unit(actor) {
                let target = target.and_then(|id| self.field.unit(id));
                log.record(unit, target);
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridPos;
    use crate::unit::UnitArchetype;

    fn army(attacks: &[u32]) -> Army {
        Army::new(
            attacks
                .iter()
                .enumerate()
                .map(|(i, &attack)| {
                    let arch = UnitArchetype::new(format!("U{i}"), 10, attack, 1, "melee");
                    UnitInstance::from_archetype(&arch, 1, GridPos::new(0, i as i32))
                })
                .collect(),
            attacks.len() as u32,
        )
    }

    #[test]
    fn test_interleave_equal_lengths() {
        assert_eq!(interleave(&[1, 3, 5], &[2, 4, 6]), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_interleave_uneven() {
        assert_eq!(interleave(&[1], &[2, 4, 6]), vec![1, 2, 4, 6]);
        assert_eq!(interleave(&[1, 3, 5], &[2]), vec![1, 2, 3, 5]);
        assert_eq!(interleave::<u8>(&[], &[]), Vec::<u8>::new());
    }

    #[test]
    fn test_sort_is_stable_and_skips_dead() {
        let mut army = army(&[3, 7, 3, 9, 7]);
        if let Some(unit) = army.get_mut(3) {
            unit.alive = false;
        }

        let order: Vec<usize> = sorted_by_attack(&army, Side::Player)
            .iter()
            .map(|id| id.index)
            .collect();
        assert_eq!(order, vec![1, 4, 0, 2]);
    }

    #[test]
    fn test_turn_order_starts_with_computer() {
        let field = Battlefield::new(army(&[5, 1]), army(&[2, 8, 4]));
        let order = build_turn_order(&field);

        let expected = vec![
            UnitId::new(Side::Computer, 1),
            UnitId::new(Side::Player, 0),
            UnitId::new(Side::Computer, 2),
            UnitId::new(Side::Player, 1),
            UnitId::new(Side::Computer, 0),
        ];
        assert_eq!(order, expected);
    }

    #[test]
    fn test_state_transitions() {
        let battle = Battle::new(army(&[1]), army(&[1]));
        assert_eq!(battle.state(), BattleState::Active);

        let battle = Battle::new(army(&[1]), Army::default());
        assert_eq!(battle.state(), BattleState::Finished);
    }

    #[test]
    fn test_units_without_capability_do_not_act() {
        let mut battle = Battle::new(army(&[1, 2]), army(&[3]));
        let outcome = battle.play_round(&AtomicBool::new(false));
        assert_eq!(outcome, RoundOutcome::Completed { actions: 0 });
        assert_eq!(battle.rounds(), 1);
    }

    #[test]
    fn test_raised_flag_cancels_before_first_round() {
        let mut battle = Battle::new(army(&[1]), army(&[1]));
        let outcome = battle.run(&AtomicBool::new(true));
        assert_eq!(outcome, BattleOutcome::Cancelled { rounds: 0 });
        assert!(!outcome.is_finished());
    }
}
