//! Error types for roster data and army setup.
//!
//! The battle algorithms themselves degrade instead of failing: an
//! unreachable target yields an empty path, an empty row contributes no
//! frontline unit, and a cancelled battle is a [`BattleOutcome`] variant.
//! Errors only arise at the data boundary.
//!
//! [`BattleOutcome`]: crate::simulation::BattleOutcome

use thiserror::Error;

/// Result type alias using [`BattleError`].
pub type Result<T> = std::result::Result<T, BattleError>;

/// Top-level error type for roster loading and validation.
#[derive(Debug, Error)]
pub enum BattleError {
    /// Roster file could not be parsed.
    #[error("Failed to parse roster data: {0}")]
    RosterParse(#[from] ron::error::SpannedError),

    /// An archetype violates a data precondition.
    #[error("Invalid archetype '{unit_type}': {reason}")]
    InvalidArchetype {
        /// Type name of the offending archetype.
        unit_type: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Two archetypes share a type name.
    #[error("Duplicate archetype type name: {0}")]
    DuplicateArchetype(String),
}
