//! Test fixtures and helpers.
//!
//! Pre-built archetypes, armies, and scripted capabilities for consistent
//! testing.

use std::sync::{Arc, Mutex};

use battle_core::battlefield::Battlefield;
use battle_core::grid::GridPos;
use battle_core::simulation::BattleLog;
use battle_core::unit::{
    Army, AttackCapability, SharedCapability, UnitArchetype, UnitId, UnitInstance,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Deterministic random source for placement tests.
#[must_use]
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// A melee archetype with no capability.
#[must_use]
pub fn archetype(name: &str, health: u32, base_attack: u32, cost: u32) -> UnitArchetype {
    UnitArchetype::new(name, health, base_attack, cost, "melee")
}

/// A living unit named `"<name> 1"` at `(x, y)`.
#[must_use]
pub fn unit_at(name: &str, x: i32, y: i32) -> UnitInstance {
    UnitInstance::from_archetype(&archetype(name, 10, 1, 1), 1, GridPos::new(x, y))
}

/// An army of units with the given base attacks, all sharing `capability`.
///
/// Units are named `U0 1`, `U1 1`, ... and stacked in column 0.
#[must_use]
pub fn army_with(attacks: &[u32], health: u32, capability: Option<SharedCapability>) -> Army {
    let units = attacks
        .iter()
        .enumerate()
        .map(|(i, &attack)| {
            let mut arch = archetype(&format!("U{i}"), health, attack, 1);
            arch.capability = capability.clone();
            UnitInstance::from_archetype(&arch, 1, GridPos::new(0, i as i32))
        })
        .collect::<Vec<_>>();
    let points = units.len() as u32;
    Army::new(units, points)
}

/// Kills the first living enemy in army order.
#[derive(Debug, Default)]
pub struct Executioner;

impl AttackCapability for Executioner {
    fn attack(&self, actor: UnitId, field: &mut Battlefield) -> Option<UnitId> {
        let (target, _) = field.living(actor.side.opponent()).next()?;
        if let Some(unit) = field.unit_mut(target) {
            unit.alive = false;
            unit.health = 0;
        }
        Some(target)
    }

    fn name(&self) -> &'static str {
        "executioner"
    }
}

/// Deals the actor's base attack to the first living enemy.
#[derive(Debug, Default)]
pub struct Brawler;

impl AttackCapability for Brawler {
    fn attack(&self, actor: UnitId, field: &mut Battlefield) -> Option<UnitId> {
        let damage = field.unit(actor)?.base_attack;
        let (target, _) = field.living(actor.side.opponent()).next()?;
        field.unit_mut(target)?.take_damage(damage);
        Some(target)
    }

    fn name(&self) -> &'static str {
        "brawler"
    }
}

/// Never attacks.
#[derive(Debug, Default)]
pub struct Pacifist;

impl AttackCapability for Pacifist {
    fn attack(&self, _actor: UnitId, _field: &mut Battlefield) -> Option<UnitId> {
        None
    }

    fn name(&self) -> &'static str {
        "pacifist"
    }
}

/// One recorded log entry: actor name and target name.
pub type LogEntry = (String, Option<String>);

/// Log sink that records `(actor, target)` names into shared storage.
#[derive(Debug, Clone, Default)]
pub struct RecordingLog {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl RecordingLog {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    ///
    /// # Panics
    ///
    /// Panics if the storage mutex is poisoned.
    #[must_use]
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().unwrap().clone()
    }
}

impl BattleLog for RecordingLog {
    fn record(&mut self, actor: &UnitInstance, target: Option<&UnitInstance>) {
        self.entries
            .lock()
            .unwrap()
            .push((actor.name.clone(), target.map(|t| t.name.clone())));
    }
}

/// Shorthand for wrapping a capability.
#[must_use]
pub fn shared<C: AttackCapability + 'static>(capability: C) -> SharedCapability {
    Arc::new(capability)
}
