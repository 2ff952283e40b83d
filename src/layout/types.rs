//! Layout Types
//!
//! Geometry constants in, bead coordinates out.

use serde::{Deserialize, Serialize};

use crate::types::{BeadConfig, BeadId, PlaceValue};

// =============================================================================
// Config
// =============================================================================

/// Unscaled geometry constants, in pixels at scale factor 1.
///
/// Only the ratios between these matter to the algorithm; hosts may retune
/// the absolute values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Horizontal distance between neighbouring rods.
    pub rod_spacing: f32,
    /// Bead height along the rod.
    pub bead_size: f32,
    /// Bead width relative to its height.
    pub bead_aspect: f32,
    /// Space between two touching beads in the same block.
    pub adjacent_spacing: f32,
    /// Space between the bar and an active bead.
    pub active_gap: f32,
    /// Space separating inactive beads from the bar or the active block.
    pub inactive_gap: f32,
    /// Height of the heaven section above the bar.
    pub heaven_earth_gap: f32,
    pub bar_thickness: f32,
    pub rod_width: f32,
    /// Extra band below the frame for numeral labels.
    pub numeral_band: f32,
    pub bottom_padding: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            rod_spacing: 25.0,
            bead_size: 12.0,
            bead_aspect: 1.4,
            adjacent_spacing: 0.5,
            active_gap: 1.0,
            inactive_gap: 8.0,
            heaven_earth_gap: 30.0,
            bar_thickness: 2.0,
            rod_width: 3.0,
            numeral_band: 30.0,
            bottom_padding: 10.0,
        }
    }
}

/// Display switches that change geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    pub scale_factor: f32,
    pub show_numerals: bool,
    /// Mark inactive beads invisible (they keep their coordinates).
    pub hide_inactive_beads: bool,
    /// Draw rods above the highest non-zero digit. When off, those leading
    /// zero rods keep their coordinates but are invisible and unlabelled.
    pub show_empty_columns: bool,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            scale_factor: 1.0,
            show_numerals: false,
            hide_inactive_beads: false,
            show_empty_columns: true,
        }
    }
}

// =============================================================================
// Dimensions
// =============================================================================

/// Scaled geometry for one (rod count, scale factor, numerals) combination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutDimensions {
    pub rod_count: usize,
    pub rod_spacing: f32,
    pub bead_size: f32,
    pub bead_width: f32,
    pub adjacent_spacing: f32,
    pub active_gap: f32,
    pub inactive_gap: f32,
    /// Y of the top edge of the reckoning bar.
    pub bar_y: f32,
    pub bar_thickness: f32,
    pub rod_width: f32,
    /// Frame height without the numeral band.
    pub base_height: f32,
    pub numeral_band: f32,
    pub width: f32,
    pub height: f32,
}

impl LayoutDimensions {
    /// Distance from one earth bead's top to the next one's in a block.
    pub fn bead_step(&self) -> f32 {
        self.bead_size + self.adjacent_spacing
    }

    /// Y of the top edge of the earth section.
    pub fn earth_top(&self) -> f32 {
        self.bar_y + self.bar_thickness
    }

    /// Centre X of the rod in visual column `column` (0 = leftmost).
    pub fn rod_x(&self, column: usize) -> f32 {
        column as f32 * self.rod_spacing + self.rod_spacing / 2.0
    }
}

// =============================================================================
// Output
// =============================================================================

/// One bead with its centre coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeadPlacement {
    pub bead: BeadConfig,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub visible: bool,
}

impl BeadPlacement {
    pub fn id(&self) -> BeadId {
        self.bead.id()
    }

    /// Whether the point lies on the bead's bounding box.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        let half_w = self.width / 2.0;
        let half_h = self.height / 2.0;
        x >= self.x - half_w && x <= self.x + half_w && y >= self.y - half_h && y <= self.y + half_h
    }
}

/// Digit label drawn under a rod.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumeralLabel {
    pub place_value: PlaceValue,
    pub digit: u8,
    pub x: f32,
    pub y: f32,
}

/// Complete layout result shared by every rendering consumer.
#[derive(Debug, Clone, PartialEq)]
pub struct AbacusLayout {
    pub dimensions: LayoutDimensions,
    /// Beads left to right; per rod heaven first, then earth slots 0-3.
    pub beads: Vec<BeadPlacement>,
    /// One label per rod, empty unless numerals are shown.
    pub numerals: Vec<NumeralLabel>,
}

impl AbacusLayout {
    pub fn width(&self) -> f32 {
        self.dimensions.width
    }

    pub fn height(&self) -> f32 {
        self.dimensions.height
    }

    /// Placement of one bead, if it is on the abacus.
    pub fn bead(&self, id: BeadId) -> Option<&BeadPlacement> {
        self.beads.iter().find(|placement| placement.id() == id)
    }

    /// The visible bead under a point.
    pub fn hit_test(&self, x: f32, y: f32) -> Option<BeadId> {
        self.beads
            .iter()
            .find(|placement| placement.visible && placement.contains(x, y))
            .map(BeadPlacement::id)
    }
}
