//! Gesture State Machine - turns a pointer drag into discrete bead intents.
//!
//! One machine per bead:
//!
//! ```text
//!            start()                 end() after an intent
//!   Idle ─────────────► Dragging ─────────────────────────► Settling
//!    ▲                     │  end() with no intent              │
//!    └─────────────────────┴──────────────── guard elapsed ◄────┘
//! ```
//!
//! While dragging, only movement along the rod counts. Once the pointer has
//! travelled beyond the threshold a direction is defined, and an intent is
//! emitted each time that direction changes. Moves that keep going the same
//! way emit nothing, so coalesced pointer events are harmless.
//!
//! Heaven beads sit above the bar, earth beads below it. Screen Y grows
//! downward, so "toward the bar" is +Y for heaven and -Y for earth.
//!
//! After a drag that emitted intents the machine settles for a short guard
//! interval and swallows the synthetic click hosts fire after pointer-up.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::types::{BeadType, Direction};

// =============================================================================
// CONFIG
// =============================================================================

/// Drag tuning. Thresholds scale with bead size so they hold at any zoom.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GestureConfig {
    /// Minimum travel before a direction is defined, as a fraction of bead size.
    pub threshold_fraction: f32,
    /// How long after a drag a trailing click is ignored, in milliseconds.
    pub click_guard_ms: u64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            threshold_fraction: 0.3,
            click_guard_ms: 100,
        }
    }
}

impl GestureConfig {
    pub fn click_guard(&self) -> Duration {
        Duration::from_millis(self.click_guard_ms)
    }
}

// =============================================================================
// PHASE
// =============================================================================

/// Where a gesture machine currently is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GesturePhase {
    Idle,
    Dragging {
        /// Reference point for the next direction decision.
        anchor: f32,
        /// Last emitted direction during this drag.
        last_direction: Option<Direction>,
    },
    /// A drag just finished; clicks before `until` are swallowed.
    Settling { until: Instant },
}

// =============================================================================
// MACHINE
// =============================================================================

/// Per-bead drag interpreter.
#[derive(Debug, Clone)]
pub struct GestureStateMachine {
    bead_type: BeadType,
    threshold: f32,
    guard: Duration,
    phase: GesturePhase,
}

impl GestureStateMachine {
    /// Create a machine for a bead of `bead_type` drawn `bead_size` pixels tall.
    pub fn new(bead_type: BeadType, bead_size: f32, config: &GestureConfig) -> Self {
        Self {
            bead_type,
            threshold: bead_size * config.threshold_fraction,
            guard: config.click_guard(),
            phase: GesturePhase::Idle,
        }
    }

    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, GesturePhase::Dragging { .. })
    }

    /// Minimum travel in pixels before a direction counts.
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Pointer pressed on the bead at screen Y `y`.
    pub fn start(&mut self, y: f32) {
        log::trace!("{} drag started at {}", self.bead_type, y);
        self.phase = GesturePhase::Dragging {
            anchor: y,
            last_direction: None,
        };
    }

    /// Pointer moved to screen Y `y`. Returns an intent when the direction changes.
    pub fn move_to(&mut self, y: f32) -> Option<Direction> {
        let bead_type = self.bead_type;
        let threshold = self.threshold;
        let GesturePhase::Dragging {
            anchor,
            last_direction,
        } = &mut self.phase
        else {
            return None;
        };

        let delta = y - *anchor;

        // Still heading the same way: follow the pointer so a reversal is
        // measured from the furthest point reached.
        if let Some(last) = *last_direction {
            if delta != 0.0 && direction_for(bead_type, delta) == last {
                *anchor = y;
                return None;
            }
        }

        if delta.abs() <= threshold {
            return None;
        }

        let direction = direction_for(bead_type, delta);
        *anchor = y;
        *last_direction = Some(direction);
        log::trace!("{} drag intent {:?}", bead_type, direction);
        Some(direction)
    }

    /// Pointer released at `now`.
    ///
    /// A drag that emitted intents settles for the guard interval; a drag that
    /// never crossed the threshold returns straight to idle so the following
    /// click still counts.
    pub fn end(&mut self, now: Instant) {
        self.phase = match self.phase {
            GesturePhase::Dragging {
                last_direction: Some(_),
                ..
            } => GesturePhase::Settling {
                until: now + self.guard,
            },
            _ => GesturePhase::Idle,
        };
    }

    /// Drop the gesture immediately (pointer lost, bead removed, ...).
    pub fn cancel(&mut self) {
        self.phase = GesturePhase::Idle;
    }

    /// Whether a click arriving at `now` should toggle the bead.
    ///
    /// A click inside the guard window is consumed and rejected. A click while
    /// dragging is rejected without changing phase.
    pub fn accept_click(&mut self, now: Instant) -> bool {
        match self.phase {
            GesturePhase::Idle => true,
            GesturePhase::Dragging { .. } => false,
            GesturePhase::Settling { until } => {
                self.phase = GesturePhase::Idle;
                now >= until
            }
        }
    }

    /// Expire the guard window if it has passed.
    pub fn settle(&mut self, now: Instant) {
        if let GesturePhase::Settling { until } = self.phase {
            if now >= until {
                self.phase = GesturePhase::Idle;
            }
        }
    }
}

/// Semantic direction of a screen-space movement along the rod.
pub fn direction_for(bead_type: BeadType, delta_y: f32) -> Direction {
    let toward_bar = match bead_type {
        BeadType::Heaven => delta_y > 0.0,
        BeadType::Earth => delta_y < 0.0,
    };
    if toward_bar {
        Direction::Activate
    } else {
        Direction::Deactivate
    }
}

// =============================================================================
// Tests
// =============================================================================
