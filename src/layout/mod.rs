//! Layout Module - bead coordinates from rod state.
//!
//! # Architecture
//!
//! Layout is a pure function:
//!
//! ```text
//! (PlaceStateMap, rod count, LayoutOptions, LayoutConfig) → AbacusLayout
//! ```
//!
//! 1. `compute_dimensions` scales the constants once per rod count / zoom
//! 2. Each rod gets one X; each bead gets a Y from the two-segment stacking
//! 3. Optional numeral labels sit in a band under the frame
//!
//! # Reactivity
//!
//! Called from a derived, reading the store's signal creates the dependency,
//! so the layout re-runs whenever a bead moves.
//!
//! # Example
//!
//! ```ignore
//! use soroban::layout::{compute_layout, LayoutConfig, LayoutOptions};
//!
//! let layout = compute_layout(&states, 5, &LayoutOptions::default(), &LayoutConfig::default())?;
//! for bead in &layout.beads {
//!     draw(bead.x, bead.y, bead.bead.active);
//! }
//! ```

mod columns;
mod geometry;
mod types;

pub use columns::*;
pub use geometry::*;
pub use types::*;
