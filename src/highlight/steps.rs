//! Step Highlights - which beads a tutorial step points at.
//!
//! A tutorial is a list of `StepHighlight` entries, each tying one bead to one
//! step and a direction. Several entries may share a step when beads move
//! together. The index answers, for any bead and the current step, whether
//! the bead is done, moving now, still to come, or not involved at all.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{BeadId, BeadType, Direction, PlaceValue};

// =============================================================================
// TYPES
// =============================================================================

/// One bead's part in one tutorial step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepHighlight {
    pub place_value: PlaceValue,
    pub bead_type: BeadType,
    /// Earth slot. Ignored for heaven beads.
    #[serde(default)]
    pub position: Option<u8>,
    pub step_index: usize,
    pub direction: Direction,
    /// Order within the step when beads should move one after another.
    #[serde(default)]
    pub order: Option<u32>,
}

impl StepHighlight {
    /// The bead this entry refers to, or `None` for an earth entry without a slot.
    pub fn bead_id(&self) -> Option<BeadId> {
        match self.bead_type {
            BeadType::Heaven => Some(BeadId::heaven(self.place_value)),
            BeadType::Earth => self.position.map(|p| BeadId::earth(self.place_value, p)),
        }
    }
}

/// How a bead relates to the current step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeadStepStatus {
    /// Not part of the tutorial.
    Uninvolved,
    /// Moved in an earlier step. Static highlight, no arrow.
    Completed { step_index: usize },
    /// Moves in the current step. Draw a direction arrow.
    Current {
        direction: Direction,
        order: Option<u32>,
    },
    /// Moves in a later step. Not highlighted yet.
    Upcoming { step_index: usize },
}

impl BeadStepStatus {
    pub fn is_highlighted(&self) -> bool {
        matches!(self, Self::Completed { .. } | Self::Current { .. })
    }

    /// Direction arrow to draw, if any.
    pub fn direction(&self) -> Option<Direction> {
        match self {
            Self::Current { direction, .. } => Some(*direction),
            _ => None,
        }
    }
}

// =============================================================================
// INDEX
// =============================================================================

/// Lookup from bead to every step that touches it.
#[derive(Debug, Clone, Default)]
pub struct StepHighlightIndex {
    entries: Vec<StepHighlight>,
    by_bead: HashMap<BeadId, Vec<usize>>,
}

impl StepHighlightIndex {
    pub fn new(highlights: &[StepHighlight]) -> Self {
        let mut by_bead: HashMap<BeadId, Vec<usize>> = HashMap::new();
        for (i, highlight) in highlights.iter().enumerate() {
            match highlight.bead_id() {
                Some(id) => by_bead.entry(id).or_default().push(i),
                None => log::warn!(
                    "step {} earth highlight on place {} has no position; skipped",
                    highlight.step_index,
                    highlight.place_value
                ),
            }
        }
        Self {
            entries: highlights.to_vec(),
            by_bead,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of steps (highest step index + 1).
    pub fn step_count(&self) -> usize {
        self.entries.iter().map(|h| h.step_index + 1).max().unwrap_or(0)
    }

    /// Classify one bead against the current step.
    ///
    /// A bead touched by several steps reports the current step first, then
    /// its latest completed step, then its next upcoming step.
    pub fn status(&self, bead: BeadId, current_step: usize) -> BeadStepStatus {
        let Some(indices) = self.by_bead.get(&normalize(bead)) else {
            return BeadStepStatus::Uninvolved;
        };

        let mut completed: Option<usize> = None;
        let mut upcoming: Option<usize> = None;

        for highlight in indices.iter().map(|&i| &self.entries[i]) {
            let step = highlight.step_index;
            if step == current_step {
                return BeadStepStatus::Current {
                    direction: highlight.direction,
                    order: highlight.order,
                };
            }
            if step < current_step {
                completed = Some(completed.map_or(step, |c| c.max(step)));
            } else {
                upcoming = Some(upcoming.map_or(step, |u| u.min(step)));
            }
        }

        match (completed, upcoming) {
            (Some(step_index), _) => BeadStepStatus::Completed { step_index },
            (None, Some(step_index)) => BeadStepStatus::Upcoming { step_index },
            (None, None) => BeadStepStatus::Uninvolved,
        }
    }

    /// Entries of one step, ordered by `order` (unordered entries last).
    pub fn step(&self, step_index: usize) -> Vec<StepHighlight> {
        let mut step: Vec<StepHighlight> = self
            .entries
            .iter()
            .filter(|h| h.step_index == step_index)
            .copied()
            .collect();
        step.sort_by_key(|h| (h.order.is_none(), h.order));
        step
    }
}

/// Heaven beads match on place alone.
fn normalize(bead: BeadId) -> BeadId {
    match bead.bead_type {
        BeadType::Heaven => BeadId::heaven(bead.place_value),
        BeadType::Earth => bead,
    }
}

// =============================================================================
// Tests
// =============================================================================
