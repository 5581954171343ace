//! Roster loading for headless battles.
//!
//! Rosters are RON files describing the archetypes both sides may buy. Each
//! entry's `behavior` names one of the capabilities in [`crate::behaviors`];
//! entries without one fight as [`MeleeStrike`](crate::behaviors::MeleeStrike).

use std::fs;
use std::path::Path;

use battle_core::data::RosterData;
use battle_core::unit::UnitArchetype;

use crate::behaviors::{behavior_by_name, MELEE_STRIKE};
use crate::runner::RunnerError;

/// The roster bundled with the runner.
pub const DEFAULT_ROSTER: &str = include_str!("../data/roster.ron");

/// Behavior used when an entry does not name one.
pub const DEFAULT_BEHAVIOR: &str = MELEE_STRIKE;

/// Attach capabilities to every archetype of a validated roster.
pub fn resolve_roster(data: &RosterData) -> Result<Vec<UnitArchetype>, RunnerError> {
    for unit in &data.units {
        if let Some(behavior) = &unit.behavior {
            if behavior_by_name(behavior).is_none() {
                return Err(RunnerError::UnknownBehavior {
                    unit_type: unit.unit_type.clone(),
                    behavior: behavior.clone(),
                });
            }
        }
    }

    Ok(data.archetypes_with(|unit| {
        behavior_by_name(unit.behavior.as_deref().unwrap_or(DEFAULT_BEHAVIOR))
    }))
}

/// Parse, validate, and resolve a roster from RON text.
pub fn parse_roster(ron: &str) -> Result<Vec<UnitArchetype>, RunnerError> {
    let data = RosterData::from_ron_str(ron)?;
    resolve_roster(&data)
}

/// Load a roster file.
pub fn load_roster(path: &Path) -> Result<Vec<UnitArchetype>, RunnerError> {
    let contents = fs::read_to_string(path)?;
    let roster = parse_roster(&contents)?;
    tracing::info!(path = %path.display(), archetypes = roster.len(), "Loaded roster");
    Ok(roster)
}

/// The bundled roster.
pub fn default_roster() -> Result<Vec<UnitArchetype>, RunnerError> {
    parse_roster(DEFAULT_ROSTER)
}

/// Load `path` if given, otherwise the bundled roster.
pub fn roster_or_default(path: Option<&Path>) -> Result<Vec<UnitArchetype>, RunnerError> {
    match path {
        Some(path) => load_roster(path),
        None => default_roster(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behaviors::RANGED_VOLLEY;

    #[test]
    fn test_default_roster_loads() {
        let roster = default_roster().unwrap();

        assert!(!roster.is_empty());
        assert!(roster.iter().all(|a| a.cost > 0 && a.capability.is_some()));
        let archer = roster.iter().find(|a| a.unit_type == "Archer").unwrap();
        assert_eq!(archer.capability.as_ref().map(|c| c.name()), Some(RANGED_VOLLEY));
    }

    #[test]
    fn test_missing_behavior_defaults_to_melee() {
        let roster = parse_roster(
            r#"RosterData(units: [
                ArchetypeData(unit_type: "Militia", health: 10, base_attack: 2, cost: 5, attack_type: "melee"),
            ])"#,
        )
        .unwrap();

        assert_eq!(roster[0].capability.as_ref().map(|c| c.name()), Some(DEFAULT_BEHAVIOR));
    }

    #[test]
    fn test_unknown_behavior_is_rejected() {
        let result = parse_roster(
            r#"RosterData(units: [
                ArchetypeData(unit_type: "Mage", health: 10, base_attack: 9, cost: 30, attack_type: "magic", behavior: Some("fireball")),
            ])"#,
        );

        assert!(matches!(
            result,
            Err(RunnerError::UnknownBehavior { ref unit_type, ref behavior })
                if unit_type == "Mage" && behavior == "fireball"
        ));
    }

    #[test]
    fn test_invalid_data_is_rejected() {
        let zero_cost = parse_roster(
            r#"RosterData(units: [
                ArchetypeData(unit_type: "Ghost", health: 10, base_attack: 2, cost: 0, attack_type: "melee"),
            ])"#,
        );
        assert!(matches!(zero_cost, Err(RunnerError::Battle(_))));

        assert!(matches!(parse_roster("not ron"), Err(RunnerError::Battle(_))));

        let oversized = parse_roster(
            r#"RosterData(units: [
                ArchetypeData(unit_type: "Giant", health: 10, base_attack: 2, cost: 5, attack_type: "melee", attack_bonuses: { "melee": 3000000000 }),
            ])"#,
        );
        assert!(matches!(oversized, Err(RunnerError::Battle(_))));
    }
}
