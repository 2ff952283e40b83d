//! Highlight Module - tutorial step annotations
//!
//! - **Steps** - `StepHighlight` entries and the per-bead status lookup
//! - **Diff** - bead moves between two abacus states

mod diff;
mod steps;

pub use diff::*;
pub use steps::*;
