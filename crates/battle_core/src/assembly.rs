//! Army assembly: allocation plus placement.

use rand::Rng;

use crate::allocation::{allocate, PurchaseResult};
use crate::placement::PlacementGrid;
use crate::unit::{Army, UnitArchetype, UnitInstance};

/// Build an army from `archetypes` under `budget`.
///
/// Units are created per archetype in declaration order and numbered from 1
/// within their archetype. Each takes the next cell of a shuffled
/// [`PlacementGrid`]; once the 63 layout cells run out no further units are
/// created. The army's points equal the allocator's total spend.
///
/// # Panics
///
/// Panics if any archetype has zero cost.
pub fn assemble_army<R: Rng + ?Sized>(
    archetypes: &[UnitArchetype],
    budget: u32,
    rng: &mut R,
) -> Army {
    let purchase = allocate(archetypes, budget);
    let mut grid = PlacementGrid::shuffled(rng);
    let units = instantiate(archetypes, &purchase, &mut grid);

    tracing::debug!(
        units = units.len(),
        points = purchase.total_spent,
        budget,
        "Assembled army"
    );

    Army::new(units, purchase.total_spent)
}

/// Turn purchased quantities into placed unit instances.
pub fn instantiate(
    archetypes: &[UnitArchetype],
    purchase: &PurchaseResult,
    grid: &mut PlacementGrid,
) -> Vec<UnitInstance> {
    let mut units = Vec::with_capacity(purchase.total_units() as usize);

    for (archetype, &quantity) in archetypes.iter().zip(&purchase.quantities) {
        for instance_number in 1..=quantity {
            let Some(cell) = grid.next_cell() else {
                tracing::warn!(
                    unit_type = %archetype.unit_type,
                    placed = units.len(),
                    purchased = purchase.total_units(),
                    "Layout grid exhausted, dropping remaining units"
                );
                return units;
            };
            units.push(UnitInstance::from_archetype(archetype, instance_number, cell));
        }
    }

    units
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;
    use std::sync::Arc;

    use crate::battlefield::Battlefield;
    use crate::unit::{AttackCapability, UnitId};

    #[derive(Debug)]
    struct Idle;

    impl AttackCapability for Idle {
        fn attack(&self, _actor: UnitId, _field: &mut Battlefield) -> Option<UnitId> {
            None
        }

        fn name(&self) -> &'static str {
            "idle"
        }
    }

    fn roster() -> Vec<UnitArchetype> {
        vec![
            UnitArchetype::new("Swordsman", 10, 5, 10, "melee"),
            UnitArchetype::new("Archer", 8, 2, 5, "ranged"),
        ]
    }

    #[test]
    fn test_names_and_points() {
        let army = assemble_army(&roster(), 100, &mut ChaCha8Rng::seed_from_u64(3));

        assert_eq!(army.points(), 95);
        assert_eq!(army.len(), 15);

        // Declaration order, then instance number
        let names: Vec<&str> = army.units().iter().map(|u| u.name.as_str()).collect();
        assert_eq!(&names[..4], ["Swordsman 1", "Swordsman 2", "Swordsman 3", "Swordsman 4"]);
        assert_eq!(names[4], "Archer 1");
        assert_eq!(names[14], "Archer 11");
        assert!(army.units().iter().all(|u| u.is_alive()));
    }

    #[test]
    fn test_distinct_cells() {
        let army = assemble_army(&roster(), 100, &mut ChaCha8Rng::seed_from_u64(9));
        let cells: HashSet<_> = army.units().iter().map(|u| u.position).collect();
        assert_eq!(cells.len(), army.len());
        assert!(army.units().iter().all(|u| u.position.in_layout()));
    }

    #[test]
    fn test_capability_is_shared() {
        let capability: Arc<dyn AttackCapability> = Arc::new(Idle);
        let archetypes = vec![UnitArchetype::new("Guard", 10, 1, 1, "melee")
            .with_capability(Arc::clone(&capability))];

        let army = assemble_army(&archetypes, 3, &mut ChaCha8Rng::seed_from_u64(0));
        assert_eq!(army.len(), 3);
        for unit in army.units() {
            let shared = unit.capability.as_ref().expect("capability copied");
            assert!(Arc::ptr_eq(shared, &capability));
        }
    }

    #[test]
    fn test_grid_exhaustion_caps_army() {
        // 7 archetypes x 11 = 77 purchases, only 63 cells
        let archetypes: Vec<UnitArchetype> = (0..7)
            .map(|i| UnitArchetype::new(format!("Levy{i}"), 1, 1, 1, "melee"))
            .collect();

        let army = assemble_army(&archetypes, 1000, &mut ChaCha8Rng::seed_from_u64(5));
        assert_eq!(army.points(), 77);
        assert_eq!(army.len(), 63);
        assert_eq!(army.units()[62].name, "Levy5 8");
    }
}
