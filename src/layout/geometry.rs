//! Bead Geometry - deterministic placement of every bead.
//!
//! Pure functions of their inputs. Every renderer calls the same function, so
//! identical state always lands on identical pixels.
//!
//! # Vertical placement
//!
//! ```text
//!   heaven (inactive)  bar_y - inactive_gap - h/2
//!   heaven (active)    bar_y - active_gap   - h/2
//!   ══════════ bar ══════════
//!   earth active block      stacked from the bar, active_gap first
//!   ── inactive_gap ──
//!   earth inactive block    continues the stack
//! ```
//!
//! With no active earth beads the inactive block starts `inactive_gap` below
//! the bar instead.

use super::columns::place_to_column;
use super::types::{
    AbacusLayout, BeadPlacement, LayoutConfig, LayoutDimensions, LayoutOptions, NumeralLabel,
};
use crate::error::Result;
use crate::state::{PlaceStateMap, check_rod_coverage};
use crate::types::{BeadConfig, BeadType};

/// Scale the geometry constants for a rod count, zoom and numeral setting.
pub fn compute_dimensions(
    rod_count: usize,
    scale_factor: f32,
    show_numerals: bool,
    config: &LayoutConfig,
) -> LayoutDimensions {
    let s = scale_factor;
    let rod_spacing = config.rod_spacing * s;
    let bead_size = config.bead_size * s;
    let adjacent_spacing = config.adjacent_spacing * s;
    let active_gap = config.active_gap * s;
    let inactive_gap = config.inactive_gap * s;
    let bar_y = config.heaven_earth_gap * s;
    let bar_thickness = config.bar_thickness * s;
    let bottom_padding = config.bottom_padding * s;

    // Lowest bead edge over every earth configuration: the last slot of the
    // inactive block, pushed furthest down when an active block exists.
    let earth_extent = inactive_gap
        + (active_gap - adjacent_spacing).max(0.0)
        + 3.0 * (bead_size + adjacent_spacing)
        + bead_size;
    let base_height = bar_y + bar_thickness + earth_extent + bottom_padding;
    let numeral_band = if show_numerals { config.numeral_band * s } else { 0.0 };

    LayoutDimensions {
        rod_count,
        rod_spacing,
        bead_size,
        bead_width: bead_size * config.bead_aspect,
        adjacent_spacing,
        active_gap,
        inactive_gap,
        bar_y,
        bar_thickness,
        rod_width: config.rod_width * s,
        base_height,
        numeral_band,
        width: rod_count as f32 * rod_spacing,
        height: base_height + numeral_band,
    }
}

/// Centre Y of the heaven bead.
pub fn heaven_bead_y(dims: &LayoutDimensions, active: bool) -> f32 {
    let gap = if active { dims.active_gap } else { dims.inactive_gap };
    dims.bar_y - gap - dims.bead_size / 2.0
}

/// Centre Y of the earth bead in slot `position` when `earth_active` are raised.
pub fn earth_bead_y(dims: &LayoutDimensions, position: u8, earth_active: u8) -> f32 {
    let step = dims.bead_step();
    let half = dims.bead_size / 2.0;
    let top = dims.earth_top();
    let position_f = f32::from(position);
    let active_f = f32::from(earth_active);

    if position < earth_active {
        top + dims.active_gap + position_f * step + half
    } else if earth_active > 0 {
        let block_end = top + dims.active_gap + active_f * step - dims.adjacent_spacing;
        block_end + dims.inactive_gap + (position_f - active_f) * step + half
    } else {
        top + dims.inactive_gap + position_f * step + half
    }
}

/// Lay out every bead of the `rod_count` rods of `states`.
///
/// Fails with a diagnostic if the map does not hold exactly `rod_count` rods.
pub fn compute_layout(
    states: &PlaceStateMap,
    rod_count: usize,
    options: &LayoutOptions,
    config: &LayoutConfig,
) -> Result<AbacusLayout> {
    check_rod_coverage(states, rod_count)?;

    let dims = compute_dimensions(rod_count, options.scale_factor, options.show_numerals, config);
    let mut beads = Vec::with_capacity(rod_count * 5);
    let mut numerals = Vec::new();

    // The ones rod always counts as occupied.
    let highest_digit = states
        .iter()
        .rev()
        .find(|state| state.digit() != 0)
        .map_or(0, |state| state.place_value());

    // Left to right: highest place first.
    for place in (0..rod_count as u32).rev() {
        let state = states.get(place)?;
        let x = dims.rod_x(place_to_column(place, rod_count)?);
        let rod_visible = options.show_empty_columns || place <= highest_digit;

        for bead in state.beads() {
            beads.push(BeadPlacement {
                bead,
                x,
                y: bead_y(&dims, &bead, state.earth_active()),
                width: dims.bead_width,
                height: dims.bead_size,
                visible: rod_visible && (bead.active || !options.hide_inactive_beads),
            });
        }

        if options.show_numerals && rod_visible {
            numerals.push(NumeralLabel {
                place_value: place,
                digit: state.digit(),
                x,
                y: dims.base_height + dims.numeral_band / 2.0,
            });
        }
    }

    Ok(AbacusLayout {
        dimensions: dims,
        beads,
        numerals,
    })
}

fn bead_y(dims: &LayoutDimensions, bead: &BeadConfig, earth_active: u8) -> f32 {
    match bead.bead_type {
        BeadType::Heaven => heaven_bead_y(dims, bead.active),
        BeadType::Earth => earth_bead_y(dims, bead.position, earth_active),
    }
}

// =============================================================================
// Tests
// =============================================================================
