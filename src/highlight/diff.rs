//! Bead Diff - the bead moves that turn one abacus state into another.
//!
//! Compares two rod maps and emits one `StepHighlight` per bead that has to
//! move. Rods are visited left to right (highest place first); within a rod
//! the heaven bead comes first, then earth beads nearest the bar first.
//!
//! Tutorial generators use this to build steps; animations use it to know
//! which beads to move.

use super::steps::StepHighlight;
use crate::error::Result;
use crate::state::PlaceStateMap;
use crate::types::{BeadType, Direction};

/// Bead moves from `from` to `to`, all tagged with `step_index`.
///
/// `from` is resized to `to`'s rod count first, so new rods start at zero.
pub fn diff_states(
    from: &PlaceStateMap,
    to: &PlaceStateMap,
    step_index: usize,
) -> Result<Vec<StepHighlight>> {
    let from = from.resized(to.max_place());
    let mut moves = Vec::new();

    for target in to.iter().rev() {
        let place = target.place_value();
        let source = from.get(place)?;

        if source.heaven_active() != target.heaven_active() {
            let direction = if target.heaven_active() {
                Direction::Activate
            } else {
                Direction::Deactivate
            };
            moves.push((place, BeadType::Heaven, None, direction));
        }

        let (low, high, direction) = if target.earth_active() > source.earth_active() {
            (source.earth_active(), target.earth_active(), Direction::Activate)
        } else {
            (target.earth_active(), source.earth_active(), Direction::Deactivate)
        };
        for position in low..high {
            moves.push((place, BeadType::Earth, Some(position), direction));
        }
    }

    Ok(moves
        .into_iter()
        .enumerate()
        .map(|(order, (place_value, bead_type, position, direction))| StepHighlight {
            place_value,
            bead_type,
            position,
            step_index,
            direction,
            order: Some(order as u32),
        })
        .collect())
}

// =============================================================================
// Tests
// =============================================================================
