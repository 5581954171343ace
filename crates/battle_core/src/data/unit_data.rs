//! Unit archetype data for data-driven rosters.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{BattleError, Result};
use crate::math::{from_percent, to_percent, MAX_PERCENT};
use crate::unit::{BonusTable, SharedCapability, UnitArchetype};

/// Data-driven archetype definition.
///
/// # Example RON
///
/// ```ron
/// ArchetypeData(
///     unit_type: "Knight",
///     health: 30,
///     base_attack: 8,
///     cost: 20,
///     attack_type: "melee",
///     attack_bonuses: { "ranged": 150 },
///     defence_bonuses: { "melee": 120 },
///     behavior: Some("melee_strike"),
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchetypeData {
    /// Unique type name.
    pub unit_type: String,

    /// Starting health.
    pub health: u32,

    /// Base attack power.
    pub base_attack: u32,

    /// Purchase cost. Must be positive.
    pub cost: u32,

    /// Damage category this unit deals.
    pub attack_type: String,

    /// Outgoing damage percentages keyed by the defender's damage category.
    #[serde(default)]
    pub attack_bonuses: BTreeMap<String, u32>,

    /// Incoming damage divisor percentages keyed by the attacker's damage
    /// category.
    #[serde(default)]
    pub defence_bonuses: BTreeMap<String, u32>,

    /// Name of the behavior the host attaches to this archetype.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub behavior: Option<String>,
}

fn to_table(percentages: &BTreeMap<String, u32>) -> BonusTable {
    percentages
        .iter()
        .map(|(category, &percent)| (category.clone(), from_percent(percent)))
        .collect()
}

fn from_table(table: &BonusTable) -> BTreeMap<String, u32> {
    table
        .iter()
        .map(|(category, &multiplier)| (category.clone(), to_percent(multiplier)))
        .collect()
}

impl ArchetypeData {
    /// Check the data preconditions the allocator relies on.
    pub fn validate(&self) -> Result<()> {
        if self.unit_type.trim().is_empty() {
            return Err(BattleError::InvalidArchetype {
                unit_type: self.unit_type.clone(),
                reason: "type name is empty".to_string(),
            });
        }
        if self.cost == 0 {
            return Err(BattleError::InvalidArchetype {
                unit_type: self.unit_type.clone(),
                reason: "cost must be positive".to_string(),
            });
        }
        let bonuses = self.attack_bonuses.iter().chain(&self.defence_bonuses);
        for (category, &percent) in bonuses {
            if percent > MAX_PERCENT {
                return Err(BattleError::InvalidArchetype {
                    unit_type: self.unit_type.clone(),
                    reason: format!("bonus against {category} exceeds {MAX_PERCENT}%"),
                });
            }
        }
        Ok(())
    }

    /// Build an archetype with the given capability attached.
    #[must_use]
    pub fn to_archetype(&self, capability: Option<SharedCapability>) -> UnitArchetype {
        UnitArchetype {
            unit_type: self.unit_type.clone(),
            health: self.health,
            base_attack: self.base_attack,
            cost: self.cost,
            attack_type: self.attack_type.clone(),
            attack_bonuses: to_table(&self.attack_bonuses),
            defence_bonuses: to_table(&self.defence_bonuses),
            capability,
        }
    }

    /// Describe an archetype as data. The behavior name is taken from its
    /// capability, if any.
    #[must_use]
    pub fn from_archetype(archetype: &UnitArchetype) -> Self {
        Self {
            unit_type: archetype.unit_type.clone(),
            health: archetype.health,
            base_attack: archetype.base_attack,
            cost: archetype.cost,
            attack_type: archetype.attack_type.clone(),
            attack_bonuses: from_table(&archetype.attack_bonuses),
            defence_bonuses: from_table(&archetype.defence_bonuses),
            behavior: archetype
                .capability
                .as_ref()
                .map(|capability| capability.name().to_string()),
        }
    }
}
