//! Reference attack capabilities for headless battles.
//!
//! The core engine only schedules turns. These capabilities pick targets,
//! move, and resolve damage on its behalf:
//!
//! - [`MeleeStrike`]: targets the nearest reachable frontline enemy, walks up
//!   to it along an A* path, and strikes.
//! - [`RangedVolley`]: strikes the weakest living enemy from where it stands.

use std::collections::BTreeMap;
use std::sync::Arc;

use battle_core::battlefield::Battlefield;
use battle_core::frontline::{select_frontline, FrontEdge, RowMember};
use battle_core::math::{divide, scale, Fixed};
use battle_core::pathfinding::find_target_path;
use battle_core::unit::{AttackCapability, SharedCapability, Side, UnitId, UnitInstance};

/// Behavior name of [`MeleeStrike`] in roster data.
pub const MELEE_STRIKE: &str = "melee_strike";

/// Behavior name of [`RangedVolley`] in roster data.
pub const RANGED_VOLLEY: &str = "ranged_volley";

/// Look up a capability by its roster name.
#[must_use]
pub fn behavior_by_name(name: &str) -> Option<SharedCapability> {
    match name {
        MELEE_STRIKE => Some(Arc::new(MeleeStrike)),
        RANGED_VOLLEY => Some(Arc::new(RangedVolley)),
        _ => None,
    }
}

/// Damage `attacker` deals to `defender` in one strike.
///
/// Base attack is scaled by the attacker's bonus against the defender's
/// damage category, then divided by the defender's bonus against the
/// attacker's category. Missing entries count as x1. Never less than 1.
#[must_use]
pub fn damage(attacker: &UnitInstance, defender: &UnitInstance) -> u32 {
    let attack_bonus = attacker
        .attack_bonuses
        .get(&defender.attack_type)
        .copied()
        .unwrap_or(Fixed::ONE);
    let defence_bonus = defender
        .defence_bonuses
        .get(&attacker.attack_type)
        .copied()
        .unwrap_or(Fixed::ONE);

    divide(scale(attacker.base_attack, attack_bonus), defence_bonus).max(1)
}

/// Resolve one strike and report the target.
fn strike(field: &mut Battlefield, actor: UnitId, target: UnitId) -> Option<UnitId> {
    let amount = damage(field.unit(actor)?, field.unit(target)?);
    let defender = field.unit_mut(target)?;
    let killed = defender.take_damage(amount);

    tracing::debug!(
        target = %defender.name,
        damage = amount,
        remaining = defender.health,
        killed,
        "Strike"
    );
    Some(target)
}

/// A living enemy standing in a lane.
#[derive(Debug, Clone, Copy)]
struct LaneEntry<'a> {
    id: UnitId,
    unit: &'a UnitInstance,
}

impl RowMember for LaneEntry<'_> {
    fn is_alive(&self) -> bool {
        self.unit.is_alive()
    }

    fn transverse(&self) -> i32 {
        self.unit.y()
    }
}

/// Living units of `side` grouped by column, columns in ascending order.
fn lanes(field: &Battlefield, side: Side) -> Vec<Vec<LaneEntry<'_>>> {
    let mut by_column: BTreeMap<i32, Vec<LaneEntry<'_>>> = BTreeMap::new();
    for (id, unit) in field.living(side) {
        by_column
            .entry(unit.x())
            .or_default()
            .push(LaneEntry { id, unit });
    }
    by_column.into_values().collect()
}

/// Walks to the nearest reachable frontline enemy and strikes it.
#[derive(Debug, Default, Clone, Copy)]
pub struct MeleeStrike;

impl MeleeStrike {
    /// Frontline enemies ordered by distance from `actor`, lane order on ties.
    fn candidates(field: &Battlefield, actor: UnitId) -> Vec<UnitId> {
        let Some(position) = field.unit(actor).map(|unit| unit.position) else {
            return Vec::new();
        };
        let enemy = actor.side.opponent();
        let rows = lanes(field, enemy);
        let edge = FrontEdge::for_target(enemy == Side::Player);

        let mut frontline = select_frontline(&rows, edge);
        frontline.sort_by_key(|entry| position.chebyshev_distance(entry.unit.position));
        frontline.into_iter().map(|entry| entry.id).collect()
    }

    /// Move next to `target` if needed. Returns `false` if it cannot be reached.
    fn close_in(field: &mut Battlefield, actor: UnitId, target: UnitId) -> bool {
        let (Some(from), Some(to)) = (field.unit(actor), field.unit(target)) else {
            return false;
        };
        if from.position.is_adjacent(to.position) {
            return true;
        }

        let path = find_target_path(from, to, field.all_units());
        if path.len() < 2 {
            tracing::debug!(actor = %from.name, target = %to.name, "Target unreachable");
            return false;
        }

        // Last free cell before the target
        let step = path[path.len() - 2];
        tracing::debug!(actor = %from.name, from = %from.position, to = %step, "Advance");
        match field.unit_mut(actor) {
            Some(unit) => {
                unit.position = step;
                true
            }
            None => false,
        }
    }
}

impl AttackCapability for MeleeStrike {
    fn attack(&self, actor: UnitId, field: &mut Battlefield) -> Option<UnitId> {
        let target = Self::candidates(field, actor)
            .into_iter()
            .find(|&target| Self::close_in(field, actor, target))?;
        strike(field, actor, target)
    }

    fn name(&self) -> &'static str {
        MELEE_STRIKE
    }
}

/// Fires at the living enemy with the least health, without moving.
#[derive(Debug, Default, Clone, Copy)]
pub struct RangedVolley;

impl AttackCapability for RangedVolley {
    fn attack(&self, actor: UnitId, field: &mut Battlefield) -> Option<UnitId> {
        let (target, _) = field
            .living(actor.side.opponent())
            .min_by_key(|(_, unit)| unit.health)?;
        strike(field, actor, target)
    }

    fn name(&self) -> &'static str {
        RANGED_VOLLEY
    }
}
