//! # soroban
//!
//! Numeric state engine for an interactive Japanese abacus.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for
//! fine-grained reactivity: the rod state lives in a signal, and layout and
//! value are deriveds over it.
//!
//! ## Architecture
//!
//! ```text
//! value ─► codec::encode ─► PlaceStateStore ─► layout::compute_layout ─► renderer
//!                                ▲                      │
//!   click / drag ─► GestureStateMachine                 └─► highlight (tutorial steps)
//!                                │
//!                                └─► codec::decode ─► on_value_change
//! ```
//!
//! Nothing here draws. Renderers consume bead coordinates, step status and a
//! styler's content descriptor, and own colours, shapes and animation.
//!
//! ## Modules
//!
//! - [`types`] - Place values, bead types, bead identifiers
//! - [`codec`] - `AbacusValue` and value ↔ rod state conversion
//! - [`state`] - Rod state, reactive store, gestures, disabled beads
//! - [`layout`] - Deterministic bead coordinates
//! - [`highlight`] - Tutorial step status and bead diffs
//! - [`style`] - Bead styling strategies
//! - [`config`] - Serde-backed configuration
//! - [`abacus`] - The facade tying it all together

pub mod abacus;
pub mod codec;
pub mod config;
pub mod error;
pub mod highlight;
pub mod layout;
pub mod state;
pub mod style;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use abacus::{Abacus, RenderedBead, RenderedNumeral, create_layout_derived};

pub use codec::{AbacusValue, NATIVE_PLACE_LIMIT, decode, encode};

pub use config::{AbacusConfig, RodCount};

pub use error::{AbacusError, Result};

pub use highlight::{BeadStepStatus, StepHighlight, StepHighlightIndex, diff_states};

pub use layout::{
    AbacusLayout, BeadPlacement, LayoutConfig, LayoutDimensions, LayoutOptions, NumeralLabel,
    column_to_place, compute_dimensions, compute_layout, place_to_column,
};

pub use state::{
    BeadMask, Cleanup, DisabledBeads, GestureConfig, GesturePhase, GestureStateMachine,
    PlaceState, PlaceStateMap, PlaceStateStore, create_value_derived,
};

pub use style::{BeadContext, BeadStyler, BeadTone, ColorScheme};
