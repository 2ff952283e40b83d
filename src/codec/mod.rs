//! Codec Module - conversion between numbers and bead state
//!
//! - **Value** - `AbacusValue`, a decimal integer that switches to
//!   arbitrary precision when it outgrows native integers
//! - **Digits** - `encode` / `decode` between values and `PlaceStateMap`
//!
//! Round-trip law: `decode(&encode(&v, max_place)?) == v` whenever `v` fits
//! on `max_place + 1` rods.

mod digits;
mod value;

pub use digits::*;
pub use value::*;
