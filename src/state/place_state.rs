//! Place State - per-rod bead activation and the canonical rod map.
//!
//! A `PlaceState` can only be built in a valid shape: `earth_active` stays in
//! 0-4, so the represented digit always stays in 0-9. Every mutation returns a
//! new value; nothing here is mutated in place.
//!
//! `PlaceStateMap` is copy-on-write. Cloning it is an `Rc` bump, and each
//! mutation produces a fresh map, so callbacks holding an old map keep seeing a
//! consistent snapshot.

use std::collections::BTreeMap;
use std::rc::Rc;

use crate::error::{AbacusError, Result};
use crate::types::{BeadConfig, BeadType, Direction, EARTH_BEADS, HEAVEN_BEAD_VALUE, PlaceValue};

// =============================================================================
// PLACE STATE
// =============================================================================

/// Activation state of a single rod.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlaceState {
    place_value: PlaceValue,
    heaven_active: bool,
    earth_active: u8,
}

impl PlaceState {
    /// A rod showing zero.
    pub const fn zero(place_value: PlaceValue) -> Self {
        Self {
            place_value,
            heaven_active: false,
            earth_active: 0,
        }
    }

    /// Build a rod state, rejecting earth counts above 4.
    pub fn new(place_value: PlaceValue, heaven_active: bool, earth_active: u8) -> Result<Self> {
        if earth_active > EARTH_BEADS {
            return Err(AbacusError::InvalidEarthCount(earth_active));
        }
        Ok(Self {
            place_value,
            heaven_active,
            earth_active,
        })
    }

    /// Build a rod state showing `digit`. Returns `None` for digits above 9.
    pub fn from_digit(place_value: PlaceValue, digit: u8) -> Option<Self> {
        if digit > 9 {
            return None;
        }
        let heaven_active = digit >= HEAVEN_BEAD_VALUE;
        Some(Self {
            place_value,
            heaven_active,
            earth_active: if heaven_active { digit - HEAVEN_BEAD_VALUE } else { digit },
        })
    }

    pub fn place_value(&self) -> PlaceValue {
        self.place_value
    }

    pub fn heaven_active(&self) -> bool {
        self.heaven_active
    }

    pub fn earth_active(&self) -> u8 {
        self.earth_active
    }

    /// The decimal digit this rod represents.
    pub fn digit(&self) -> u8 {
        let heaven = if self.heaven_active { HEAVEN_BEAD_VALUE } else { 0 };
        heaven + self.earth_active
    }

    /// Flip the heaven bead.
    pub fn with_heaven_toggled(self) -> Self {
        Self {
            heaven_active: !self.heaven_active,
            ..self
        }
    }

    /// Toggle an earth bead, cascading so the active block stays contiguous.
    ///
    /// Deactivating slot `p` also drops every slot above it; activating slot
    /// `p` also raises every slot below it.
    pub fn with_earth_toggled(self, position: u8) -> Result<Self> {
        if position >= EARTH_BEADS {
            return Err(AbacusError::BeadPositionOutOfRange(position));
        }
        let earth_active = if position < self.earth_active {
            self.earth_active.min(position)
        } else {
            self.earth_active.max(position + 1)
        };
        Ok(Self { earth_active, ..self })
    }

    /// Move a bead in a semantic direction.
    ///
    /// Unlike the toggles this is idempotent: asking an already active bead to
    /// activate leaves the rod unchanged.
    pub fn with_direction(self, bead_type: BeadType, position: u8, direction: Direction) -> Result<Self> {
        let active = self.is_bead_active(bead_type, position)?;
        let wants_active = direction == Direction::Activate;
        if active == wants_active {
            return Ok(self);
        }
        match bead_type {
            BeadType::Heaven => Ok(self.with_heaven_toggled()),
            BeadType::Earth => self.with_earth_toggled(position),
        }
    }

    /// Whether the given bead rests against the bar.
    pub fn is_bead_active(&self, bead_type: BeadType, position: u8) -> Result<bool> {
        match bead_type {
            BeadType::Heaven => Ok(self.heaven_active),
            BeadType::Earth if position < EARTH_BEADS => Ok(position < self.earth_active),
            BeadType::Earth => Err(AbacusError::BeadPositionOutOfRange(position)),
        }
    }

    /// All five beads of this rod: heaven first, then earth slots 0-3.
    pub fn beads(&self) -> [BeadConfig; 5] {
        let place = self.place_value;
        [
            BeadConfig::heaven(place, self.heaven_active),
            BeadConfig::earth(place, 0, self.earth_active > 0),
            BeadConfig::earth(place, 1, self.earth_active > 1),
            BeadConfig::earth(place, 2, self.earth_active > 2),
            BeadConfig::earth(place, 3, self.earth_active > 3),
        ]
    }
}

// =============================================================================
// PLACE STATE MAP
// =============================================================================

/// Canonical per-rod state: exactly one entry for every place `0..=max_place`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceStateMap {
    states: Rc<BTreeMap<PlaceValue, PlaceState>>,
}

impl PlaceStateMap {
    /// A map of `max_place + 1` rods, all showing zero.
    pub fn zeroed(max_place: PlaceValue) -> Self {
        let states = (0..=max_place).map(|place| (place, PlaceState::zero(place))).collect();
        Self {
            states: Rc::new(states),
        }
    }

    /// Build a map from rod states given in ascending place order.
    ///
    /// Places must start at 0 and have no gaps.
    pub fn from_states(states: impl IntoIterator<Item = PlaceState>) -> Result<Self> {
        let mut map = BTreeMap::new();
        for (expected, state) in states.into_iter().enumerate() {
            let expected = expected as PlaceValue;
            if state.place_value != expected {
                return Err(AbacusError::MissingPlaceState {
                    place: expected,
                    rod_count: map.len() + 1,
                    available: map.len(),
                });
            }
            map.insert(expected, state);
        }
        if map.is_empty() {
            return Err(AbacusError::InvalidRodCount(0));
        }
        Ok(Self { states: Rc::new(map) })
    }

    /// Highest place value held by this map.
    pub fn max_place(&self) -> PlaceValue {
        self.states.keys().next_back().copied().unwrap_or(0)
    }

    /// Number of rods (entries).
    pub fn rod_count(&self) -> usize {
        self.states.len()
    }

    /// State of one rod. Fails fast for places beyond the map.
    pub fn get(&self, place: PlaceValue) -> Result<PlaceState> {
        self.states
            .get(&place)
            .copied()
            .ok_or(AbacusError::PlaceOutOfRange {
                place,
                max_place: self.max_place(),
            })
    }

    /// Rod states in ascending place order (ones first).
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &PlaceState> + '_ {
        self.states.values()
    }

    /// Every bead on the abacus, ones rod first.
    pub fn beads(&self) -> Vec<BeadConfig> {
        self.iter().flat_map(|state| state.beads()).collect()
    }

    /// Replace one rod, returning a new map.
    pub fn with_state(&self, state: PlaceState) -> Result<Self> {
        // Range check before copying.
        self.get(state.place_value)?;
        let mut next = self.clone();
        Rc::make_mut(&mut next.states).insert(state.place_value, state);
        Ok(next)
    }

    /// Change the rod count, keeping every digit that stays in range.
    ///
    /// Places above `max_place` are dropped; new places start at zero.
    pub fn resized(&self, max_place: PlaceValue) -> Self {
        if max_place == self.max_place() {
            return self.clone();
        }
        let states = (0..=max_place)
            .map(|place| {
                let state = self.states.get(&place).copied().unwrap_or(PlaceState::zero(place));
                (place, state)
            })
            .collect();
        Self {
            states: Rc::new(states),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
