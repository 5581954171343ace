//! Roster data: the archetypes one side may buy from.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::unit_data::ArchetypeData;
use crate::error::{BattleError, Result};
use crate::unit::{SharedCapability, UnitArchetype};

/// A list of purchasable archetypes in declaration order.
///
/// Declaration order matters: it breaks ties in value ranking and decides
/// the order in which units are created.
///
/// # Example RON
///
/// ```ron
/// RosterData(
///     units: [
///         ArchetypeData(unit_type: "Archer", health: 8, base_attack: 2, cost: 5, attack_type: "ranged"),
///     ],
/// )
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterData {
    /// Archetypes in declaration order.
    pub units: Vec<ArchetypeData>,
}

impl RosterData {
    /// Parse and validate a roster from RON.
    pub fn from_ron_str(ron: &str) -> Result<Self> {
        let roster: RosterData = ron::from_str(ron)?;
        roster.validate()?;
        Ok(roster)
    }

    /// Check every archetype and reject duplicate type names.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for unit in &self.units {
            unit.validate()?;
            if !seen.insert(unit.unit_type.as_str()) {
                return Err(BattleError::DuplicateArchetype(unit.unit_type.clone()));
            }
        }
        Ok(())
    }

    /// Build archetypes, asking `resolve` for each one's capability.
    pub fn archetypes_with<F>(&self, mut resolve: F) -> Vec<UnitArchetype>
    where
        F: FnMut(&ArchetypeData) -> Option<SharedCapability>,
    {
        self.units
            .iter()
            .map(|unit| unit.to_archetype(resolve(unit)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROSTER: &str = r#"
        RosterData(
            units: [
                ArchetypeData(
                    unit_type: "Swordsman",
                    health: 10,
                    base_attack: 5,
                    cost: 10,
                    attack_type: "melee",
                    defence_bonuses: { "ranged": 120 },
                    behavior: Some("melee_strike"),
                ),
                ArchetypeData(
                    unit_type: "Archer",
                    health: 8,
                    base_attack: 2,
                    cost: 5,
                    attack_type: "ranged",
                ),
            ],
        )
    "#;

    #[test]
    fn test_parse_roster() {
        let roster = RosterData::from_ron_str(ROSTER).unwrap();

        assert_eq!(roster.units.len(), 2);
        assert_eq!(roster.units[0].unit_type, "Swordsman");
        assert_eq!(roster.units[0].defence_bonuses.get("ranged"), Some(&120));
        assert_eq!(roster.units[1].behavior, None);
    }

    #[test]
    fn test_archetypes_keep_declaration_order() {
        let roster = RosterData::from_ron_str(ROSTER).unwrap();
        let archetypes = roster.archetypes_with(|_| None);

        let names: Vec<&str> = archetypes.iter().map(|a| a.unit_type.as_str()).collect();
        assert_eq!(names, vec!["Swordsman", "Archer"]);
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let unit = ArchetypeData {
            unit_type: "Archer".to_string(),
            health: 8,
            base_attack: 2,
            cost: 5,
            attack_type: "ranged".to_string(),
            attack_bonuses: Default::default(),
            defence_bonuses: Default::default(),
            behavior: None,
        };
        let roster = RosterData {
            units: vec![unit.clone(), unit],
        };

        assert!(matches!(
            roster.validate(),
            Err(BattleError::DuplicateArchetype(name)) if name == "Archer"
        ));
    }

    #[test]
    fn test_zero_cost_rejected_at_parse() {
        let ron = r#"RosterData(units: [ArchetypeData(unit_type: "Free", health: 1, base_attack: 1, cost: 0, attack_type: "melee")])"#;
        assert!(matches!(
            RosterData::from_ron_str(ron),
            Err(BattleError::InvalidArchetype { .. })
        ));
    }

    #[test]
    fn test_oversized_bonus_rejected_at_parse() {
        let ron = r#"RosterData(units: [ArchetypeData(unit_type: "Giant", health: 1, base_attack: 1, cost: 5, attack_type: "melee", attack_bonuses: { "melee": 3000000000 })])"#;
        assert!(matches!(
            RosterData::from_ron_str(ron),
            Err(BattleError::InvalidArchetype { ref unit_type, .. }) if unit_type == "Giant"
        ));
    }

    #[test]
    fn test_malformed_ron() {
        assert!(matches!(
            RosterData::from_ron_str("RosterData(units: [ oops"),
            Err(BattleError::RosterParse(_))
        ));
    }
}
