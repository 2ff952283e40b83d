//! Column Helpers - visual column index ↔ place value.
//!
//! Everything inside the engine is keyed by place value. Hosts that think in
//! left-to-right columns convert here, at the boundary, and nowhere else.
//! Column 0 is the leftmost rod, which holds the highest place.

use crate::error::{AbacusError, Result};
use crate::types::PlaceValue;

/// Visual column of a place on an abacus with `rod_count` rods.
pub fn place_to_column(place: PlaceValue, rod_count: usize) -> Result<usize> {
    let place_index = place as usize;
    if rod_count == 0 {
        return Err(AbacusError::InvalidRodCount(0));
    }
    if place_index >= rod_count {
        return Err(AbacusError::PlaceOutOfRange {
            place,
            max_place: (rod_count - 1) as PlaceValue,
        });
    }
    Ok(rod_count - 1 - place_index)
}

/// Place value of a visual column on an abacus with `rod_count` rods.
pub fn column_to_place(column: usize, rod_count: usize) -> Result<PlaceValue> {
    if rod_count == 0 {
        return Err(AbacusError::InvalidRodCount(0));
    }
    if column >= rod_count {
        return Err(AbacusError::PlaceOutOfRange {
            place: column as PlaceValue,
            max_place: (rod_count - 1) as PlaceValue,
        });
    }
    Ok((rod_count - 1 - column) as PlaceValue)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_to_column() {
        assert_eq!(place_to_column(0, 5).unwrap(), 4);
        assert_eq!(place_to_column(4, 5).unwrap(), 0);
        assert!(place_to_column(5, 5).is_err());
        assert!(place_to_column(0, 0).is_err());
    }

    #[test]
    fn test_column_to_place() {
        assert_eq!(column_to_place(0, 3).unwrap(), 2);
        assert_eq!(column_to_place(2, 3).unwrap(), 0);
        assert!(column_to_place(3, 3).is_err());
    }

    #[test]
    fn test_columns_invert() {
        for rods in 1..8 {
            for column in 0..rods {
                let place = column_to_place(column, rods).unwrap();
                assert_eq!(place_to_column(place, rods).unwrap(), column);
            }
        }
    }
}
