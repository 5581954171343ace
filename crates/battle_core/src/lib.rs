//! # Battle Core
//!
//! Decision algorithms for a turn-based tactical battle on a fixed grid.
//!
//! This crate contains **only** battle logic:
//! - No rendering
//! - No IO
//! - No hidden randomness (random sources are passed in by the caller)
//!
//! ## Crate Structure
//!
//! - [`allocation`] - Value-ranked greedy spending of a point budget
//! - [`placement`] - Shuffled deployment cells on the layout grid
//! - [`assembly`] - Army creation from allocation plus placement
//! - [`frontline`] - Frontmost living unit per row
//! - [`pathfinding`] - A* search across the battlefield
//! - [`simulation`] - Round ordering and battle driver
//! - [`grid`] - Board bounds and movement topology
//! - [`unit`] - Archetypes, instances, armies, attack capabilities
//! - [`data`] - RON roster definitions

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod allocation;
pub mod assembly;
pub mod battlefield;
pub mod data;
pub mod error;
pub mod frontline;
pub mod grid;
pub mod math;
pub mod pathfinding;
pub mod placement;
pub mod simulation;
pub mod unit;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::allocation::{allocate, rank_archetypes, PurchaseResult, ValueMetric};
    pub use crate::assembly::assemble_army;
    pub use crate::battlefield::Battlefield;
    pub use crate::data::{ArchetypeData, RosterData};
    pub use crate::error::{BattleError, Result};
    pub use crate::frontline::{select_frontline, suitable_units, FrontEdge, RowMember};
    pub use crate::grid::{Edge, GridPos};
    pub use crate::math::Fixed;
    pub use crate::pathfinding::{find_path, find_target_path, ObstacleMap};
    pub use crate::placement::PlacementGrid;
    pub use crate::simulation::{Battle, BattleLog, BattleOutcome, BattleState, RoundOutcome};
    pub use crate::unit::{
        Army, AttackCapability, SharedCapability, Side, UnitArchetype, UnitId, UnitInstance,
    };
}
