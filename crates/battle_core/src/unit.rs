//! Unit archetypes, unit instances, and armies.
//!
//! An [`UnitArchetype`] is an immutable template that can be bought many
//! times. Each purchase becomes a [`UnitInstance`] owned by an [`Army`].
//! Instances share their archetype's [`AttackCapability`] through an `Arc`.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::battlefield::Battlefield;
use crate::grid::GridPos;
use crate::math::Fixed;

/// Bonus multipliers keyed by damage category.
pub type BonusTable = BTreeMap<String, Fixed>;

/// Which army a unit belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    /// The player's army, deployed on the left edge.
    Player,
    /// The computer's army, deployed on the right edge.
    Computer,
}

impl Side {
    /// The opposing side.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Player => Self::Computer,
            Self::Computer => Self::Player,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Player => f.write_str("player"),
            Self::Computer => f.write_str("computer"),
        }
    }
}

/// Stable handle to a unit: its army and its insertion index in that army.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId {
    /// Owning army.
    pub side: Side,
    /// Index into the army's unit list.
    pub index: usize,
}

impl UnitId {
    /// Create a new unit handle.
    #[must_use]
    pub const fn new(side: Side, index: usize) -> Self {
        Self { side, index }
    }
}

/// Per-archetype behavior invoked when a unit gets to act.
///
/// The engine only decides *when* a unit acts. Choosing a target, moving,
/// and resolving damage all happen inside the capability, which may mutate
/// any unit on the battlefield (health, liveness, position).
pub trait AttackCapability: Send + Sync + fmt::Debug {
    /// Act as `actor` and return the unit that was attacked, or `None` if
    /// the actor could not act this turn.
    fn attack(&self, actor: UnitId, field: &mut Battlefield) -> Option<UnitId>;

    /// Short behavior name for logs.
    fn name(&self) -> &'static str;
}

/// Shared handle to a capability. Instances of one archetype share it.
pub type SharedCapability = Arc<dyn AttackCapability>;

/// Immutable unit template.
#[derive(Debug, Clone)]
pub struct UnitArchetype {
    /// Type name, also the prefix of instance names.
    pub unit_type: String,
    /// Starting health.
    pub health: u32,
    /// Base attack power. Also the turn-order priority.
    pub base_attack: u32,
    /// Purchase cost. Must be positive.
    pub cost: u32,
    /// Damage category this unit deals.
    pub attack_type: String,
    /// Outgoing damage multipliers keyed by the defender's damage category.
    pub attack_bonuses: BonusTable,
    /// Incoming damage divisors keyed by the attacker's damage category.
    pub defence_bonuses: BonusTable,
    /// Behavior shared by every instance of this archetype.
    pub capability: Option<SharedCapability>,
}

impl UnitArchetype {
    /// Create an archetype with empty bonus tables and no capability.
    #[must_use]
    pub fn new(
        unit_type: impl Into<String>,
        health: u32,
        base_attack: u32,
        cost: u32,
        attack_type: impl Into<String>,
    ) -> Self {
        Self {
            unit_type: unit_type.into(),
            health,
            base_attack,
            cost,
            attack_type: attack_type.into(),
            attack_bonuses: BonusTable::new(),
            defence_bonuses: BonusTable::new(),
            capability: None,
        }
    }

    /// Attach a capability.
    #[must_use]
    pub fn with_capability(mut self, capability: SharedCapability) -> Self {
        self.capability = Some(capability);
        self
    }

    /// Set an outgoing damage multiplier against a damage category.
    #[must_use]
    pub fn with_attack_bonus(mut self, category: impl Into<String>, multiplier: Fixed) -> Self {
        self.attack_bonuses.insert(category.into(), multiplier);
        self
    }

    /// Set an incoming damage divisor for a damage category.
    #[must_use]
    pub fn with_defence_bonus(mut self, category: impl Into<String>, multiplier: Fixed) -> Self {
        self.defence_bonuses.insert(category.into(), multiplier);
        self
    }
}

/// A concrete unit on the battlefield.
#[derive(Debug, Clone)]
pub struct UnitInstance {
    /// Instance label, `"<unit_type> <n>"`.
    pub name: String,
    /// Archetype type name.
    pub unit_type: String,
    /// Current health.
    pub health: u32,
    /// Base attack power.
    pub base_attack: u32,
    /// Purchase cost.
    pub cost: u32,
    /// Damage category this unit deals.
    pub attack_type: String,
    /// Outgoing damage multipliers.
    pub attack_bonuses: BonusTable,
    /// Incoming damage divisors.
    pub defence_bonuses: BonusTable,
    /// Living flag. Owned by whoever resolves combat.
    pub alive: bool,
    /// Current cell.
    pub position: GridPos,
    /// Shared behavior handle.
    pub capability: Option<SharedCapability>,
}

impl UnitInstance {
    /// Instantiate an archetype as a living unit at `position`.
    ///
    /// `instance_number` is 1-based and only used for the label.
    #[must_use]
    pub fn from_archetype(archetype: &UnitArchetype, instance_number: u32, position: GridPos) -> Self {
        Self {
            name: format!("{} {}", archetype.unit_type, instance_number),
            unit_type: archetype.unit_type.clone(),
            health: archetype.health,
            base_attack: archetype.base_attack,
            cost: archetype.cost,
            attack_type: archetype.attack_type.clone(),
            attack_bonuses: archetype.attack_bonuses.clone(),
            defence_bonuses: archetype.defence_bonuses.clone(),
            alive: true,
            position,
            capability: archetype.capability.clone(),
        }
    }

    /// Whether the unit is still alive.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.alive
    }

    /// Horizontal coordinate.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.position.x
    }

    /// Transverse coordinate used for frontline selection.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.position.y
    }

    /// Apply damage, killing the unit when health reaches zero.
    ///
    /// Returns `true` if this hit killed the unit.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        if !self.alive {
            return false;
        }
        self.health = self.health.saturating_sub(amount);
        if self.health == 0 {
            self.alive = false;
            return true;
        }
        false
    }
}

/// An ordered roster of units plus the points spent on it.
///
/// Unit order is insertion order and breaks ties in turn ordering.
#[derive(Debug, Clone, Default)]
pub struct Army {
    units: Vec<UnitInstance>,
    points: u32,
}

impl Army {
    /// Create an army from units and the points spent.
    #[must_use]
    pub fn new(units: Vec<UnitInstance>, points: u32) -> Self {
        Self { units, points }
    }

    /// All units, living and dead, in insertion order.
    #[must_use]
    pub fn units(&self) -> &[UnitInstance] {
        &self.units
    }

    /// Mutable access to all units.
    pub fn units_mut(&mut self) -> &mut [UnitInstance] {
        &mut self.units
    }

    /// Unit at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&UnitInstance> {
        self.units.get(index)
    }

    /// Mutable unit at `index`.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut UnitInstance> {
        self.units.get_mut(index)
    }

    /// Points spent assembling this army.
    #[must_use]
    pub const fn points(&self) -> u32 {
        self.points
    }

    /// Number of units, living and dead.
    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// True if the army has no units at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// True if at least one unit is alive.
    #[must_use]
    pub fn has_living_units(&self) -> bool {
        self.units.iter().any(UnitInstance::is_alive)
    }

    /// Number of living units.
    #[must_use]
    pub fn living_count(&self) -> usize {
        self.units.iter().filter(|u| u.is_alive()).count()
    }

    /// Living units with their insertion indices.
    pub fn living(&self) -> impl Iterator<Item = (usize, &UnitInstance)> {
        self.units.iter().enumerate().filter(|(_, u)| u.is_alive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::from_percent;

    fn knight() -> UnitArchetype {
        UnitArchetype::new("Knight", 30, 8, 20, "melee")
            .with_attack_bonus("ranged", from_percent(150))
            .with_defence_bonus("melee", from_percent(120))
    }

    #[test]
    fn test_instance_copies_archetype() {
        let unit = UnitInstance::from_archetype(&knight(), 3, GridPos::new(1, 7));

        assert_eq!(unit.name, "Knight 3");
        assert_eq!(unit.unit_type, "Knight");
        assert_eq!(unit.health, 30);
        assert_eq!(unit.base_attack, 8);
        assert_eq!(unit.cost, 20);
        assert_eq!(unit.attack_type, "melee");
        assert_eq!(unit.attack_bonuses.get("ranged"), Some(&from_percent(150)));
        assert_eq!(unit.defence_bonuses.get("melee"), Some(&from_percent(120)));
        assert!(unit.is_alive());
        assert_eq!((unit.x(), unit.y()), (1, 7));
    }

    #[test]
    fn test_take_damage_kills_at_zero() {
        let mut unit = UnitInstance::from_archetype(&knight(), 1, GridPos::default());

        assert!(!unit.take_damage(10));
        assert_eq!(unit.health, 20);
        assert!(unit.take_damage(25));
        assert_eq!(unit.health, 0);
        assert!(!unit.is_alive());

        // Already dead units ignore further hits
        assert!(!unit.take_damage(5));
    }

    #[test]
    fn test_army_living_queries() {
        let arch = knight();
        let mut army = Army::new(
            (1..=3)
                .map(|n| UnitInstance::from_archetype(&arch, n, GridPos::new(0, n as i32)))
                .collect(),
            60,
        );

        assert_eq!(army.len(), 3);
        assert_eq!(army.points(), 60);
        assert_eq!(army.living_count(), 3);

        if let Some(unit) = army.get_mut(1) {
            unit.alive = false;
        }
        let living: Vec<usize> = army.living().map(|(i, _)| i).collect();
        assert_eq!(living, vec![0, 2]);
        assert!(army.has_living_units());

        for unit in army.units_mut() {
            unit.alive = false;
        }
        assert!(!army.has_living_units());
    }

    #[test]
    fn test_side_opponent() {
        assert_eq!(Side::Player.opponent(), Side::Computer);
        assert_eq!(Side::Computer.opponent(), Side::Player);
    }
}
