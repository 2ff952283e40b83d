//! Disabled Beads - per-rod and per-bead interaction locks.
//!
//! A locked bead ignores clicks, drags and direction intents. Keyboard digit
//! entry targets a whole rod, so it is only blocked when every bead on the rod
//! is locked.

use std::collections::HashMap;

use crate::types::{BeadId, BeadType, PlaceValue};

bitflags::bitflags! {
    /// Locked beads on one rod.
    ///
    /// Combine with bitwise OR: `BeadMask::HEAVEN | BeadMask::EARTH_0`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct BeadMask: u8 {
        const HEAVEN = 1 << 0;
        const EARTH_0 = 1 << 1;
        const EARTH_1 = 1 << 2;
        const EARTH_2 = 1 << 3;
        const EARTH_3 = 1 << 4;
        const EARTH = Self::EARTH_0.bits() | Self::EARTH_1.bits() | Self::EARTH_2.bits() | Self::EARTH_3.bits();
        const ROD = Self::HEAVEN.bits() | Self::EARTH.bits();
    }
}

impl BeadMask {
    /// The single flag for one bead.
    pub fn for_bead(bead_type: BeadType, position: u8) -> Self {
        match bead_type {
            BeadType::Heaven => Self::HEAVEN,
            BeadType::Earth => Self::from_bits_truncate(Self::EARTH_0.bits() << position.min(3)),
        }
    }
}

/// Interaction locks for a whole abacus, keyed by place value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisabledBeads {
    rods: HashMap<PlaceValue, BeadMask>,
}

impl DisabledBeads {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock every bead of a rod.
    pub fn disable_rod(&mut self, place: PlaceValue) {
        self.disable(place, BeadMask::ROD);
    }

    /// Lock a single bead.
    pub fn disable_bead(&mut self, bead: BeadId) {
        self.disable(bead.place_value, BeadMask::for_bead(bead.bead_type, bead.slot()));
    }

    /// Lock the beads in `mask` on a rod.
    pub fn disable(&mut self, place: PlaceValue, mask: BeadMask) {
        *self.rods.entry(place).or_default() |= mask;
    }

    /// Unlock the beads in `mask` on a rod.
    pub fn enable(&mut self, place: PlaceValue, mask: BeadMask) {
        if let Some(locked) = self.rods.get_mut(&place) {
            locked.remove(mask);
            if locked.is_empty() {
                self.rods.remove(&place);
            }
        }
    }

    /// Unlock everything.
    pub fn clear(&mut self) {
        self.rods.clear();
    }

    pub fn is_bead_disabled(&self, bead: BeadId) -> bool {
        self.mask(bead.place_value)
            .contains(BeadMask::for_bead(bead.bead_type, bead.slot()))
    }

    pub fn is_rod_disabled(&self, place: PlaceValue) -> bool {
        self.mask(place).contains(BeadMask::ROD)
    }

    /// Locked beads on a rod (empty when none).
    pub fn mask(&self, place: PlaceValue) -> BeadMask {
        self.rods.get(&place).copied().unwrap_or_default()
    }
}

// =============================================================================
// Tests
// =============================================================================
