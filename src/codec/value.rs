//! Abacus Value - a decimal integer that never loses precision.
//!
//! Small values travel as `u64`. Anything that needs more than
//! [`NATIVE_PLACE_LIMIT`] digits, or that arrives as a `BigUint`, is held as an
//! arbitrary-precision integer. Both forms compare by numeric value, so callers
//! never need to care which one they got back.

use std::fmt;
use std::str::FromStr;

use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};

use crate::error::AbacusError;

/// Number of decimal places that can be accumulated natively without risk.
///
/// Fifteen digits stay inside the 53-bit safe-integer range hosts commonly
/// use for plain numbers; longer values switch to `BigUint`.
pub const NATIVE_PLACE_LIMIT: usize = 15;

/// The decimal integer shown on an abacus.
#[derive(Debug, Clone)]
pub enum AbacusValue {
    Native(u64),
    Big(BigUint),
}

impl AbacusValue {
    /// Zero.
    pub const fn zero() -> Self {
        Self::Native(0)
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Self::Native(n) => *n == 0,
            Self::Big(n) => n.is_zero(),
        }
    }

    /// Decimal digits, least significant first. Zero yields `[0]`.
    pub fn digits_le(&self) -> Vec<u8> {
        match self {
            Self::Native(0) => vec![0],
            Self::Native(n) => {
                let mut digits = Vec::with_capacity(20);
                let mut rest = *n;
                while rest > 0 {
                    digits.push((rest % 10) as u8);
                    rest /= 10;
                }
                digits
            }
            Self::Big(n) if n.is_zero() => vec![0],
            Self::Big(n) => n.to_radix_le(10),
        }
    }

    /// Number of decimal digits (at least 1).
    pub fn digit_count(&self) -> usize {
        self.digits_le().len()
    }

    /// Widen to an arbitrary-precision integer.
    pub fn to_biguint(&self) -> BigUint {
        match self {
            Self::Native(n) => BigUint::from(*n),
            Self::Big(n) => n.clone(),
        }
    }

    /// Narrow to `u64` if the value fits.
    pub fn to_u64(&self) -> Option<u64> {
        match self {
            Self::Native(n) => Some(*n),
            Self::Big(n) => n.to_u64(),
        }
    }
}

impl Default for AbacusValue {
    fn default() -> Self {
        Self::zero()
    }
}

impl PartialEq for AbacusValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Native(a), Self::Native(b)) => a == b,
            (Self::Big(a), Self::Big(b)) => a == b,
            (Self::Native(a), Self::Big(b)) | (Self::Big(b), Self::Native(a)) => {
                b.to_u64() == Some(*a)
            }
        }
    }
}

impl Eq for AbacusValue {}

impl From<u64> for AbacusValue {
    fn from(n: u64) -> Self {
        Self::Native(n)
    }
}

impl From<u32> for AbacusValue {
    fn from(n: u32) -> Self {
        Self::Native(n as u64)
    }
}

impl From<BigUint> for AbacusValue {
    fn from(n: BigUint) -> Self {
        Self::Big(n)
    }
}

impl FromStr for AbacusValue {
    type Err = AbacusError;

    /// Parse plain decimal digits. Long inputs parse straight into `BigUint`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AbacusError::InvalidValue(s.to_string()));
        }
        if trimmed.len() <= NATIVE_PLACE_LIMIT {
            trimmed
                .parse::<u64>()
                .map(Self::Native)
                .map_err(|_| AbacusError::InvalidValue(s.to_string()))
        } else {
            trimmed
                .parse::<BigUint>()
                .map(Self::Big)
                .map_err(|_| AbacusError::InvalidValue(s.to_string()))
        }
    }
}

impl fmt::Display for AbacusValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native(n) => write!(f, "{}", n),
            Self::Big(n) => write!(f, "{}", n),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digits_le() {
        assert_eq!(AbacusValue::from(0u64).digits_le(), vec![0]);
        assert_eq!(AbacusValue::from(42u64).digits_le(), vec![2, 4]);
        assert_eq!(AbacusValue::from(BigUint::from(907u32)).digits_le(), vec![7, 0, 9]);
        assert_eq!(AbacusValue::from(BigUint::zero()).digits_le(), vec![0]);
    }

    #[test]
    fn test_digit_count() {
        assert_eq!(AbacusValue::zero().digit_count(), 1);
        assert_eq!(AbacusValue::from(99999u64).digit_count(), 5);
        assert_eq!(AbacusValue::from(u64::MAX).digit_count(), 20);
    }

    #[test]
    fn test_mixed_equality() {
        let native = AbacusValue::from(12345u64);
        let big = AbacusValue::from(BigUint::from(12345u64));
        assert_eq!(native, big);
        assert_eq!(big, native);
        assert_ne!(native, AbacusValue::from(BigUint::from(12346u64)));
    }

    #[test]
    fn test_parse_switches_to_big() {
        let small: AbacusValue = "123456789012345".parse().unwrap();
        assert!(matches!(small, AbacusValue::Native(123456789012345)));

        let text = "12345678901234567890123";
        let big: AbacusValue = text.parse().unwrap();
        assert!(matches!(big, AbacusValue::Big(_)));
        assert_eq!(big.to_string(), text);
        assert_eq!(big.digit_count(), 23);
    }

    #[test]
    fn test_parse_rejects_non_digits() {
        assert!("".parse::<AbacusValue>().is_err());
        assert!("-5".parse::<AbacusValue>().is_err());
        assert!("12a".parse::<AbacusValue>().is_err());
    }

    #[test]
    fn test_to_u64() {
        assert_eq!(AbacusValue::from(7u64).to_u64(), Some(7));
        let huge: AbacusValue = "123456789012345678901234567890".parse().unwrap();
        assert_eq!(huge.to_u64(), None);
    }
}
