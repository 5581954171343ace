//! Determinism testing utilities.
//!
//! Provides a harness for verifying that army assembly and battles produce
//! identical results given identical seeds.
//!
//! # Testing Strategy
//!
//! Sources of non-determinism include:
//!
//! - **Placement randomness**: the layout grid is shuffled. All shuffles go
//!   through an injected, seeded generator.
//!
//! - **Unstable sorts**: value ranking and turn ordering must keep declared
//!   order on ties.
//!
//! - **HashMap iteration order**: Rust's default hasher is randomized.
//!   Path search keys its maps by cell but breaks ties by insertion order.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use battle_core::battlefield::Battlefield;
use battle_core::unit::{Army, UnitInstance};

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Hashes from each run.
    pub hashes: Vec<u64>,
    /// Number of steps (rounds) run.
    pub steps: u64,
}

impl DeterminismResult {
    /// Get all unique hashes (should be 1 for a deterministic run).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that every run matched, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if the runs produced different hashes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Battle is non-deterministic!\n\
                 Runs: {}\n\
                 Steps: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                self.steps,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Run a setup multiple times and verify determinism.
///
/// # Arguments
///
/// * `runs` - Number of times to run
/// * `steps` - Number of steps per run
/// * `setup` - Function to create initial state
/// * `step` - Function to advance the state by one step
/// * `hash` - Function to compute state hash
pub fn verify_determinism<S, Setup, Step, HashFn>(
    runs: usize,
    steps: u64,
    setup: Setup,
    step: Step,
    hash: HashFn,
) -> DeterminismResult
where
    Setup: Fn() -> S,
    Step: Fn(&mut S),
    HashFn: Fn(&S) -> u64,
{
    let mut hashes = Vec::with_capacity(runs);

    for _ in 0..runs {
        let mut state = setup();

        for _ in 0..steps {
            step(&mut state);
        }

        hashes.push(hash(&state));
    }

    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);

    DeterminismResult {
        is_deterministic,
        hashes,
        steps,
    }
}

fn hash_unit(unit: &UnitInstance, hasher: &mut DefaultHasher) {
    unit.name.hash(hasher);
    unit.health.hash(hasher);
    unit.alive.hash(hasher);
    unit.position.hash(hasher);
}

/// Hash the observable state of an army: names, health, liveness, cells.
#[must_use]
pub fn army_hash(army: &Army) -> u64 {
    let mut hasher = DefaultHasher::new();
    army.points().hash(&mut hasher);
    for unit in army.units() {
        hash_unit(unit, &mut hasher);
    }
    hasher.finish()
}

/// Hash both armies of a battlefield.
#[must_use]
pub fn field_hash(field: &Battlefield) -> u64 {
    let mut hasher = DefaultHasher::new();
    for unit in field.all_units() {
        hash_unit(unit, &mut hasher);
    }
    hasher.finish()
}

/// Proptest strategies for battle inputs.
pub mod strategies {
    use battle_core::grid::{GridPos, FIELD_HEIGHT, FIELD_WIDTH};
    use battle_core::unit::UnitArchetype;
    use proptest::prelude::*;

    /// Generate a cell on the battlefield.
    pub fn arb_field_pos() -> impl Strategy<Value = GridPos> {
        (0..FIELD_WIDTH, 0..FIELD_HEIGHT).prop_map(|(x, y)| GridPos::new(x, y))
    }

    /// Generate a set of obstacle cells.
    pub fn arb_obstacles(max_len: usize) -> impl Strategy<Value = Vec<GridPos>> {
        proptest::collection::vec(arb_field_pos(), 0..max_len)
    }

    /// Generate an archetype with positive cost.
    pub fn arb_archetype() -> impl Strategy<Value = UnitArchetype> {
        (1u32..200, 0u32..50, 1u32..60, "[a-z]{3,8}").prop_map(|(health, attack, cost, name)| {
            UnitArchetype::new(name, health, attack, cost, "melee")
        })
    }

    /// Generate a roster of 0..max_len archetypes.
    pub fn arb_roster(max_len: usize) -> impl Strategy<Value = Vec<UnitArchetype>> {
        proptest::collection::vec(arb_archetype(), 0..max_len)
    }

    /// Generate a point budget.
    pub fn arb_budget() -> impl Strategy<Value = u32> {
        0u32..5000
    }
}
