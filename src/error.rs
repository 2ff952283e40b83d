//! Error types for the abacus engine.
//!
//! Place and rod-count mistakes are programming errors and fail fast here.
//! Untrusted keyboard digits are not errors; the store rejects them as no-ops.

use crate::types::PlaceValue;

/// Errors raised by the abacus engine.
#[derive(Debug, thiserror::Error)]
pub enum AbacusError {
    #[error("place value {place} is out of range (max place {max_place})")]
    PlaceOutOfRange { place: PlaceValue, max_place: PlaceValue },

    #[error("value needs {digits} digits but the abacus only has {rods} rods")]
    ValueTooLarge { digits: usize, rods: usize },

    #[error(
        "no state for place {place}: abacus has {rod_count} rods but only {available} state entries"
    )]
    MissingPlaceState {
        place: PlaceValue,
        rod_count: usize,
        available: usize,
    },

    #[error("layout asked for {rod_count} rods but the state holds {available}; extra places would be dropped")]
    RodCountMismatch { rod_count: usize, available: usize },

    #[error("rod count must be at least 1 (got {0})")]
    InvalidRodCount(usize),

    #[error("earth count {0} is out of range (0-4)")]
    InvalidEarthCount(u8),

    #[error("earth bead position {0} is out of range (0-3)")]
    BeadPositionOutOfRange(u8),

    #[error("invalid bead identifier: {0:?}")]
    InvalidBeadId(String),

    #[error("invalid abacus value: {0:?}")]
    InvalidValue(String),

    #[error("invalid abacus config: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AbacusError>;
