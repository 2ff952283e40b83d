//! Core types for soroban.
//!
//! These types describe a single bead and its place on the abacus. They flow
//! from the state store through layout into whatever renders the beads.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AbacusError;

// =============================================================================
// Constants
// =============================================================================

/// Zero-based decimal digit position (0 = ones, 1 = tens, ...).
pub type PlaceValue = u32;

/// Number of earth beads on every rod.
pub const EARTH_BEADS: u8 = 4;

/// Value of the heaven bead when it rests against the bar.
pub const HEAVEN_BEAD_VALUE: u8 = 5;

// =============================================================================
// Bead Type
// =============================================================================

/// Which side of the reckoning bar a bead lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BeadType {
    /// The single bead above the bar, worth 5.
    Heaven,
    /// One of the four beads below the bar, worth 1 each.
    Earth,
}

impl BeadType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Heaven => "heaven",
            Self::Earth => "earth",
        }
    }
}

impl fmt::Display for BeadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Direction
// =============================================================================

/// Semantic direction of a bead movement.
///
/// `Activate` always means "toward the bar", whichever side the bead is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Activate,
    Deactivate,
}

impl Direction {
    /// The direction that undoes this one.
    pub const fn opposite(self) -> Self {
        match self {
            Self::Activate => Self::Deactivate,
            Self::Deactivate => Self::Activate,
        }
    }
}

// =============================================================================
// Bead Config
// =============================================================================

/// One bead and whether it currently rests against the bar.
///
/// Heaven beads always have position 0. Earth beads occupy fixed slots 0-3,
/// counted from the bar outward; slot `i` is active iff `i < earth_active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BeadConfig {
    pub bead_type: BeadType,
    pub position: u8,
    pub active: bool,
    pub place_value: PlaceValue,
}

impl BeadConfig {
    /// Create the heaven bead for a rod.
    pub const fn heaven(place_value: PlaceValue, active: bool) -> Self {
        Self {
            bead_type: BeadType::Heaven,
            position: 0,
            active,
            place_value,
        }
    }

    /// Create an earth bead for a rod.
    pub const fn earth(place_value: PlaceValue, position: u8, active: bool) -> Self {
        Self {
            bead_type: BeadType::Earth,
            position,
            active,
            place_value,
        }
    }

    /// Stable identifier for this bead.
    pub fn id(&self) -> BeadId {
        match self.bead_type {
            BeadType::Heaven => BeadId::heaven(self.place_value),
            BeadType::Earth => BeadId::earth(self.place_value, self.position),
        }
    }
}

// =============================================================================
// Bead Identifier
// =============================================================================

/// Composite identifier addressing one bead without pixel coordinates.
///
/// Renders as `bead-place-<p>-heaven` or `bead-place-<p>-earth-pos-<n>`, and
/// parses back from the same text so test harnesses can target beads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BeadId {
    pub place_value: PlaceValue,
    pub bead_type: BeadType,
    /// Earth slot. Always `None` for heaven beads.
    pub position: Option<u8>,
}

impl BeadId {
    pub const fn heaven(place_value: PlaceValue) -> Self {
        Self {
            place_value,
            bead_type: BeadType::Heaven,
            position: None,
        }
    }

    pub const fn earth(place_value: PlaceValue, position: u8) -> Self {
        Self {
            place_value,
            bead_type: BeadType::Earth,
            position: Some(position),
        }
    }

    /// Earth slot, or 0 for the heaven bead.
    pub fn slot(&self) -> u8 {
        self.position.unwrap_or(0)
    }
}

impl fmt::Display for BeadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bead-place-{}-{}", self.place_value, self.bead_type)?;
        if let Some(position) = self.position {
            write!(f, "-pos-{}", position)?;
        }
        Ok(())
    }
}

impl FromStr for BeadId {
    type Err = AbacusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AbacusError::InvalidBeadId(s.to_string());

        let rest = s.strip_prefix("bead-place-").ok_or_else(invalid)?;
        let (place, rest) = rest.split_once('-').ok_or_else(invalid)?;
        let place_value: PlaceValue = place.parse().map_err(|_| invalid())?;

        match rest {
            "heaven" => Ok(Self::heaven(place_value)),
            _ => {
                let position = rest.strip_prefix("earth-pos-").ok_or_else(invalid)?;
                let position: u8 = position.parse().map_err(|_| invalid())?;
                if position >= EARTH_BEADS {
                    return Err(invalid());
                }
                Ok(Self::earth(place_value, position))
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
