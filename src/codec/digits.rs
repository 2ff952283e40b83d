//! Digit Codec - value ↔ per-rod bead state.
//!
//! `encode` splits a value into decimal digits and gives every rod its heaven
//! and earth beads. `decode` sums the rods back up. Maps with more than
//! [`NATIVE_PLACE_LIMIT`] rods are accumulated with `BigUint` so no digit is
//! ever rounded away.

use num_bigint::BigUint;
use num_traits::Zero;

use super::value::{AbacusValue, NATIVE_PLACE_LIMIT};
use crate::error::{AbacusError, Result};
use crate::state::{PlaceState, PlaceStateMap};
use crate::types::PlaceValue;

/// Encode `value` onto `max_place + 1` rods.
///
/// Fails with [`AbacusError::ValueTooLarge`] if the value has more digits than
/// there are rods.
pub fn encode(value: &AbacusValue, max_place: PlaceValue) -> Result<PlaceStateMap> {
    let digits = value.digits_le();
    let rods = max_place as usize + 1;
    if digits.len() > rods {
        return Err(AbacusError::ValueTooLarge {
            digits: digits.len(),
            rods,
        });
    }

    let states = (0..=max_place).map(|place| {
        let digit = digits.get(place as usize).copied().unwrap_or(0);
        PlaceState::from_digit(place, digit)
            .ok_or_else(|| AbacusError::InvalidValue(value.to_string()))
    });

    PlaceStateMap::from_states(states.collect::<Result<Vec<_>>>()?)
}

/// Decode a rod map back into its value.
pub fn decode(map: &PlaceStateMap) -> AbacusValue {
    if map.rod_count() > NATIVE_PLACE_LIMIT {
        let total = map.iter().rev().fold(BigUint::zero(), |acc, state| {
            acc * 10u32 + u32::from(state.digit())
        });
        AbacusValue::Big(total)
    } else {
        let total = map
            .iter()
            .rev()
            .fold(0u64, |acc, state| acc * 10 + u64::from(state.digit()));
        AbacusValue::Native(total)
    }
}

/// Number of rods needed to show `value` (at least one).
pub fn rods_for(value: &AbacusValue) -> usize {
    value.digit_count()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_42() {
        let map = encode(&AbacusValue::from(42u64), 4).unwrap();

        let tens = map.get(1).unwrap();
        assert!(!tens.heaven_active());
        assert_eq!(tens.earth_active(), 4);

        let ones = map.get(0).unwrap();
        assert!(!ones.heaven_active());
        assert_eq!(ones.earth_active(), 2);

        for place in 2..=4 {
            assert_eq!(map.get(place).unwrap().digit(), 0);
        }
        assert_eq!(decode(&map), AbacusValue::from(42u64));
    }

    #[test]
    fn test_encode_heaven_digits() {
        let map = encode(&AbacusValue::from(97u64), 1).unwrap();
        let tens = map.get(1).unwrap();
        assert!(tens.heaven_active());
        assert_eq!(tens.earth_active(), 4);
        let ones = map.get(0).unwrap();
        assert!(ones.heaven_active());
        assert_eq!(ones.earth_active(), 2);
    }

    #[test]
    fn test_encode_too_many_digits() {
        let result = encode(&AbacusValue::from(1000u64), 2);
        assert!(matches!(
            result,
            Err(AbacusError::ValueTooLarge { digits: 4, rods: 3 })
        ));
    }

    #[test]
    fn test_encode_zero_on_one_rod() {
        let map = encode(&AbacusValue::zero(), 0).unwrap();
        assert_eq!(map.rod_count(), 1);
        assert_eq!(decode(&map), AbacusValue::zero());
    }

    #[test]
    fn test_decode_switches_to_big() {
        let map = PlaceStateMap::zeroed(15);
        assert!(matches!(decode(&map), AbacusValue::Big(_)));

        let map = PlaceStateMap::zeroed(14);
        assert!(matches!(decode(&map), AbacusValue::Native(0)));
    }

    #[test]
    fn test_round_trip_beyond_native_precision() {
        let text = "98765432109876543210987654321";
        let value: AbacusValue = text.parse().unwrap();
        let map = encode(&value, 29).unwrap();
        let decoded = decode(&map);
        assert_eq!(decoded, value);
        assert_eq!(decoded.to_string(), text);
    }

    #[test]
    fn test_round_trip_u64_max() {
        let value = AbacusValue::from(u64::MAX);
        let map = encode(&value, 19).unwrap();
        assert_eq!(decode(&map), value);
    }

    #[test]
    fn test_rods_for() {
        assert_eq!(rods_for(&AbacusValue::zero()), 1);
        assert_eq!(rods_for(&AbacusValue::from(12345u64)), 5);
    }
}
