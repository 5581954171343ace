//! The two armies of one battle, addressable by [`UnitId`].

use crate::unit::{Army, Side, UnitId, UnitInstance};

/// Both armies of a battle.
///
/// Each battle owns its own battlefield; nothing here is shared between
/// concurrently running battles.
#[derive(Debug, Clone, Default)]
pub struct Battlefield {
    player: Army,
    computer: Army,
}

impl Battlefield {
    /// Create a battlefield from the two armies.
    #[must_use]
    pub fn new(player: Army, computer: Army) -> Self {
        Self { player, computer }
    }

    /// The army on `side`.
    #[must_use]
    pub fn army(&self, side: Side) -> &Army {
        match side {
            Side::Player => &self.player,
            Side::Computer => &self.computer,
        }
    }

    /// Mutable army on `side`.
    pub fn army_mut(&mut self, side: Side) -> &mut Army {
        match side {
            Side::Player => &mut self.player,
            Side::Computer => &mut self.computer,
        }
    }

    /// Look up a unit.
    #[must_use]
    pub fn unit(&self, id: UnitId) -> Option<&UnitInstance> {
        self.army(id.side).get(id.index)
    }

    /// Look up a unit mutably.
    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut UnitInstance> {
        self.army_mut(id.side).get_mut(id.index)
    }

    /// True while both armies still field a living unit.
    #[must_use]
    pub fn both_sides_alive(&self) -> bool {
        self.player.has_living_units() && self.computer.has_living_units()
    }

    /// The side still standing, if exactly one is.
    #[must_use]
    pub fn survivor(&self) -> Option<Side> {
        match (self.player.has_living_units(), self.computer.has_living_units()) {
            (true, false) => Some(Side::Player),
            (false, true) => Some(Side::Computer),
            _ => None,
        }
    }

    /// Every unit on the field, player army first.
    pub fn all_units(&self) -> impl Iterator<Item = &UnitInstance> {
        self.player.units().iter().chain(self.computer.units())
    }

    /// Living units of `side` with their handles.
    pub fn living(&self, side: Side) -> impl Iterator<Item = (UnitId, &UnitInstance)> {
        self.army(side)
            .living()
            .map(move |(index, unit)| (UnitId::new(side, index), unit))
    }

    /// Hand both armies back as `(player, computer)`.
    #[must_use]
    pub fn into_armies(self) -> (Army, Army) {
        (self.player, self.computer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridPos;
    use crate::unit::UnitArchetype;

    fn army(count: u32) -> Army {
        let arch = UnitArchetype::new("Pikeman", 10, 3, 5, "melee");
        Army::new(
            (1..=count)
                .map(|n| UnitInstance::from_archetype(&arch, n, GridPos::new(0, n as i32)))
                .collect(),
            count * 5,
        )
    }

    #[test]
    fn test_lookup_by_id() {
        let field = Battlefield::new(army(2), army(3));

        assert_eq!(
            field.unit(UnitId::new(Side::Computer, 2)).map(|u| u.name.as_str()),
            Some("Pikeman 3")
        );
        assert!(field.unit(UnitId::new(Side::Player, 2)).is_none());
        assert_eq!(field.all_units().count(), 5);
    }

    #[test]
    fn test_survivor() {
        let mut field = Battlefield::new(army(1), army(1));
        assert!(field.both_sides_alive());
        assert_eq!(field.survivor(), None);

        if let Some(unit) = field.unit_mut(UnitId::new(Side::Computer, 0)) {
            unit.alive = false;
        }
        assert!(!field.both_sides_alive());
        assert_eq!(field.survivor(), Some(Side::Player));
    }

    #[test]
    fn test_empty_army_counts_as_dead() {
        let field = Battlefield::new(Army::default(), army(1));
        assert!(!field.both_sides_alive());
        assert_eq!(field.survivor(), Some(Side::Computer));
    }
}
