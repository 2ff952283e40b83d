//! Bead Styling - pluggable mapping from bead context to visual content.
//!
//! The engine never draws. A `BeadStyler` turns the facts about one bead into
//! whatever descriptor the host renderer understands (a palette slot, an SVG
//! fragment id, a glyph...). `ColorScheme` is the built-in styler and yields a
//! `BeadTone` palette slot; concrete colours stay with the renderer.

use serde::{Deserialize, Serialize};

use crate::highlight::BeadStepStatus;
use crate::types::{BeadConfig, BeadType, PlaceValue};

/// Everything a styler may look at for one bead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeadContext {
    pub bead: BeadConfig,
    /// Visual column, 0 = leftmost rod.
    pub column: usize,
    pub rod_count: usize,
    pub status: BeadStepStatus,
    pub disabled: bool,
}

/// Strategy mapping a bead context to renderer content.
pub trait BeadStyler {
    type Content;

    fn style(&self, context: &BeadContext) -> Self::Content;
}

// =============================================================================
// Built-in colour schemes
// =============================================================================

/// How bead colours are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorScheme {
    /// All beads share one colour.
    #[default]
    Monochrome,
    /// Each place value has its own colour.
    PlaceValue,
    /// Heaven and earth beads differ.
    HeavenEarth,
    /// Neighbouring rods alternate.
    Alternating,
}

/// Palette slot chosen by a colour scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BeadTone {
    Primary,
    /// Place-value palette entry (cycles every 10 places).
    Place(u8),
    Heaven,
    Earth,
    Alternate,
}

impl BeadStyler for ColorScheme {
    type Content = BeadTone;

    fn style(&self, context: &BeadContext) -> BeadTone {
        match self {
            Self::Monochrome => BeadTone::Primary,
            Self::PlaceValue => BeadTone::Place((context.bead.place_value % 10) as u8),
            Self::HeavenEarth => match context.bead.bead_type {
                BeadType::Heaven => BeadTone::Heaven,
                BeadType::Earth => BeadTone::Earth,
            },
            Self::Alternating => {
                if context.column % 2 == 0 {
                    BeadTone::Primary
                } else {
                    BeadTone::Alternate
                }
            }
        }
    }
}

impl ColorScheme {
    /// Tint for the numeral under a rod, or `None` for the renderer's plain ink.
    ///
    /// Only schemes that colour whole rods carry over to numerals.
    pub fn numeral_tone(&self, place_value: PlaceValue, column: usize) -> Option<BeadTone> {
        match self {
            Self::Monochrome | Self::HeavenEarth => None,
            Self::PlaceValue => Some(BeadTone::Place((place_value % 10) as u8)),
            Self::Alternating if column % 2 == 0 => Some(BeadTone::Primary),
            Self::Alternating => Some(BeadTone::Alternate),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
