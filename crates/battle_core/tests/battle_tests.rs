//! Battle engine tests driven through scripted capabilities.
//!
//! These exercise the round loop end to end: turn order, early exit when an
//! army is wiped out, log records, and cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use battle_core::battlefield::Battlefield;
use battle_core::simulation::{Battle, BattleOutcome, BattleState, RoundOutcome};
use battle_core::unit::{AttackCapability, Side, UnitId};
use battle_test_utils::fixtures::{army_with, shared, Brawler, Executioner, Pacifist, RecordingLog};

/// Raises a shared flag the first time it acts.
#[derive(Debug)]
struct RaiseFlag(Arc<AtomicBool>);

impl AttackCapability for RaiseFlag {
    fn attack(&self, _actor: UnitId, _field: &mut Battlefield) -> Option<UnitId> {
        self.0.store(true, Ordering::Relaxed);
        None
    }

    fn name(&self) -> &'static str {
        "raise_flag"
    }
}

fn entry(actor: &str, target: Option<&str>) -> (String, Option<String>) {
    (actor.to_string(), target.map(str::to_string))
}

// =============================================================================
// Round flow
// =============================================================================

#[test]
fn test_round_stops_when_army_is_wiped_out() {
    let log = RecordingLog::new();
    let executioner = Some(shared(Executioner));
    let mut battle = Battle::new(
        army_with(&[5, 1], 10, executioner.clone()),
        army_with(&[2, 8, 4], 10, executioner),
    )
    .with_log(Box::new(log.clone()));

    let outcome = battle.run(&AtomicBool::new(false));

    // Order is C1, P0, C2, P1, C0. C1 kills P0, P0 is skipped, C2 kills P1.
    assert_eq!(
        outcome,
        BattleOutcome::Finished {
            rounds: 1,
            winner: Some(Side::Computer)
        }
    );
    assert_eq!(
        log.entries(),
        vec![entry("U1 1", Some("U0 1")), entry("U2 1", Some("U1 1"))]
    );
    assert_eq!(battle.state(), BattleState::Finished);
}

#[test]
fn test_attrition_battle() {
    let brawler = Some(shared(Brawler));
    let mut battle = Battle::new(army_with(&[3], 10, brawler.clone()), army_with(&[2], 10, brawler));
    let stop = AtomicBool::new(false);

    for _ in 0..3 {
        assert_eq!(battle.play_round(&stop), RoundOutcome::Completed { actions: 2 });
    }
    assert_eq!(battle.play_round(&stop), RoundOutcome::Finished);
    assert_eq!(battle.rounds(), 4);

    let (player, computer) = battle.into_armies();
    assert_eq!(player.units()[0].health, 2);
    assert!(!computer.has_living_units());
}

#[test]
fn test_finished_battle_plays_no_more_rounds() {
    let mut battle = Battle::new(
        army_with(&[1], 10, Some(shared(Executioner))),
        army_with(&[1], 10, None),
    );
    let stop = AtomicBool::new(false);

    assert!(battle.run(&stop).is_finished());
    let rounds = battle.rounds();
    assert_eq!(battle.play_round(&stop), RoundOutcome::Finished);
    assert_eq!(battle.rounds(), rounds);
}

#[test]
fn test_log_records_actions_without_target() {
    let log = RecordingLog::new();
    let mut battle = Battle::new(
        army_with(&[1], 10, Some(shared(Pacifist))),
        army_with(&[1], 10, Some(shared(Pacifist))),
    )
    .with_log(Box::new(log.clone()));

    let outcome = battle.play_round(&AtomicBool::new(false));

    assert_eq!(outcome, RoundOutcome::Completed { actions: 2 });
    assert_eq!(log.entries(), vec![entry("U0 1", None), entry("U0 1", None)]);
}

#[test]
fn test_one_sided_battle_is_decided_immediately() {
    let mut battle = Battle::new(army_with(&[4, 4], 10, Some(shared(Brawler))), army_with(&[], 10, None));

    let outcome = battle.run(&AtomicBool::new(false));
    assert_eq!(
        outcome,
        BattleOutcome::Finished {
            rounds: 0,
            winner: Some(Side::Player)
        }
    );
}

// =============================================================================
// Cancellation
// =============================================================================

#[test]
fn test_flag_raised_mid_round_stops_before_next_action() {
    let stop = Arc::new(AtomicBool::new(false));
    let log = RecordingLog::new();
    let mut battle = Battle::new(
        army_with(&[1, 1], 10, Some(shared(RaiseFlag(Arc::clone(&stop))))),
        army_with(&[1], 10, Some(shared(Pacifist))),
    )
    .with_log(Box::new(log.clone()));

    let outcome = battle.run(&stop);

    // C0 then P0 act; P1 never gets its turn.
    assert_eq!(outcome, BattleOutcome::Cancelled { rounds: 1 });
    assert_eq!(log.entries().len(), 2);
}

#[test]
fn test_cancel_from_another_thread() {
    let stop = Arc::new(AtomicBool::new(false));
    let mut battle = Battle::new(
        army_with(&[1, 2, 3], 10, Some(shared(Pacifist))),
        army_with(&[3, 2, 1], 10, Some(shared(Pacifist))),
    );

    let canceller = {
        let stop = Arc::clone(&stop);
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            stop.store(true, Ordering::Relaxed);
        })
    };

    let outcome = battle.run(&stop);
    canceller.join().unwrap();

    assert!(!outcome.is_finished());
    assert!(outcome.rounds() > 0);
    // Nobody was hurt: cancellation leaves the field between actions.
    assert!(battle.field().all_units().all(|u| u.is_alive() && u.health == 10));
}
