//! Data structures for roster configuration.
//!
//! Rosters are lists of unit archetypes deserialized from RON. Bonus tables
//! are authored as integer percentages (100 = x1.0).
//!
//! **Note:** This module contains no IO - it only parses strings. File
//! loading is handled by `battle_headless`.

mod roster_data;
mod unit_data;

pub use roster_data::RosterData;
pub use unit_data::ArchetypeData;
