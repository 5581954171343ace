//! Value-ranked greedy allocation of a point budget across archetypes.
//!
//! Archetypes are ranked by combat value per point,
//! `2 * (base_attack / cost) + (health / cost)`, and bought greedily in rank
//! order, at most [`MAX_PER_ARCHETYPE`] of each.

use crate::unit::UnitArchetype;

/// Maximum number of units bought from a single archetype.
pub const MAX_PER_ARCHETYPE: u32 = 11;

/// Ranking score of one archetype.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueMetric {
    /// Position of the archetype in the caller's list.
    pub index: usize,
    /// Combat value per point.
    pub score: f64,
}

/// Quantities bought per archetype.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PurchaseResult {
    /// Quantity per archetype, indexed by the caller's original order.
    pub quantities: Vec<u32>,
    /// Total points spent.
    pub total_spent: u32,
}

impl PurchaseResult {
    /// Total number of units bought.
    #[must_use]
    pub fn total_units(&self) -> u32 {
        self.quantities.iter().sum()
    }
}

/// Combat value per point of an archetype.
///
/// # Panics
///
/// Panics if `archetype.cost` is zero.
#[must_use]
pub fn value_score(archetype: &UnitArchetype) -> f64 {
    assert!(
        archetype.cost > 0,
        "archetype '{}' has zero cost",
        archetype.unit_type
    );
    let cost = f64::from(archetype.cost);
    let attack_value = f64::from(archetype.base_attack) / cost;
    let health_value = f64::from(archetype.health) / cost;
    attack_value * 2.0 + health_value
}

/// Rank archetypes by [`value_score`], best first.
///
/// The sort is stable: archetypes with equal scores keep their declared
/// order.
///
/// # Panics
///
/// Panics if any archetype has zero cost.
#[must_use]
pub fn rank_archetypes(archetypes: &[UnitArchetype]) -> Vec<ValueMetric> {
    let mut metrics: Vec<ValueMetric> = archetypes
        .iter()
        .enumerate()
        .map(|(index, archetype)| ValueMetric {
            index,
            score: value_score(archetype),
        })
        .collect();

    metrics.sort_by(|a, b| b.score.total_cmp(&a.score));
    metrics
}

/// Spend `budget` greedily across archetypes in rank order.
///
/// Each archetype gets `min(remaining / cost, 11)` units. Archetypes that
/// no longer fit are skipped, so cheaper ones further down the ranking can
/// still use the leftover points.
///
/// # Panics
///
/// Panics if any archetype has zero cost. Callers loading archetypes from
/// data should validate them first (see [`crate::data::RosterData`]).
#[must_use]
pub fn allocate(archetypes: &[UnitArchetype], budget: u32) -> PurchaseResult {
    let mut quantities = vec![0; archetypes.len()];
    let mut spent: u32 = 0;

    for metric in rank_archetypes(archetypes) {
        let archetype = &archetypes[metric.index];
        let cost = archetype.cost;

        let affordable = (budget - spent) / cost;
        let to_buy = affordable.min(MAX_PER_ARCHETYPE);

        if to_buy > 0 {
            quantities[metric.index] = to_buy;
            spent += to_buy * cost;
            tracing::debug!(
                unit_type = %archetype.unit_type,
                score = metric.score,
                quantity = to_buy,
                spent,
                "Purchased archetype"
            );
        }
    }

    PurchaseResult {
        quantities,
        total_spent: spent,
    }
}
