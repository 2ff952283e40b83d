//! State Module - rod state and the systems that mutate it
//!
//! - **PlaceState** - per-rod bead activation and the copy-on-write rod map
//! - **Store** - reactive canonical state, interactive vs. external updates
//! - **Gesture** - per-bead drag state machine
//! - **Disabled** - per-rod / per-bead interaction locks

mod disabled;
mod gesture;
mod place_state;
mod store;

pub use disabled::*;
pub use gesture::*;
pub use place_state::*;
pub use store::*;
