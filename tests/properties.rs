//! Property tests for the codec, the store invariants, layout and gestures.
//!
//! Run with: cargo test --test properties

use proptest::prelude::*;

use soroban::{
    AbacusValue, BeadConfig, BeadType, Direction, GestureConfig, GestureStateMachine,
    LayoutConfig, LayoutOptions, PlaceStateMap, PlaceStateStore, compute_layout, decode, encode,
};

#[derive(Debug, Clone)]
enum Op {
    ToggleHeaven(u32),
    ToggleEarth(u32, u8),
    SetDigit(u32, u8),
}

const MAX_PLACE: u32 = 3;

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..=MAX_PLACE).prop_map(Op::ToggleHeaven),
        (0..=MAX_PLACE, 0u8..4).prop_map(|(place, position)| Op::ToggleEarth(place, position)),
        (0..=MAX_PLACE, 0u8..12).prop_map(|(place, digit)| Op::SetDigit(place, digit)),
    ]
}

fn apply(store: &PlaceStateStore, op: &Op) {
    match *op {
        Op::ToggleHeaven(place) => {
            store.toggle_heaven(place).unwrap();
        }
        Op::ToggleEarth(place, position) => {
            let active = store.get(place).unwrap().earth_active() > position;
            store.toggle_earth(&BeadConfig::earth(place, position, active)).unwrap();
        }
        Op::SetDigit(place, digit) => {
            store.set_digit(place, digit).unwrap();
        }
    }
}

fn assert_well_formed(map: &PlaceStateMap) {
    for state in map.iter() {
        assert!(state.earth_active() <= 4);
        assert!(state.digit() <= 9);
        for bead in state.beads() {
            if bead.bead_type == BeadType::Earth {
                assert_eq!(bead.active, bead.position < state.earth_active());
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]

    #[test]
    fn round_trip_native(value in any::<u64>(), extra in 0u32..4) {
        let value = AbacusValue::from(value);
        let max_place = value.digit_count() as u32 - 1 + extra;
        let map = encode(&value, max_place).unwrap();
        prop_assert_eq!(decode(&map), value);
    }

    #[test]
    fn round_trip_big(text in "[1-9][0-9]{0,39}", extra in 0u32..3) {
        let value: AbacusValue = text.parse().unwrap();
        let max_place = text.len() as u32 - 1 + extra;
        let decoded = decode(&encode(&value, max_place).unwrap());
        prop_assert_eq!(decoded.to_string(), text);
    }

    #[test]
    fn too_few_rods_rejected(value in 10u64..) {
        let value = AbacusValue::from(value);
        let max_place = value.digit_count() as u32 - 2;
        prop_assert!(encode(&value, max_place).is_err());
    }

    #[test]
    fn mutations_keep_beads_contiguous(ops in prop::collection::vec(op_strategy(), 0..40)) {
        let store = PlaceStateStore::new(MAX_PLACE);
        for op in &ops {
            apply(&store, op);
            assert_well_formed(&store.states());
        }
        prop_assert_eq!(store.value(), decode(&store.states()));
    }

    #[test]
    fn layout_is_deterministic(value in 0u64..1_000_000, scale in 0.5f32..3.0, numerals in any::<bool>()) {
        let map = encode(&AbacusValue::from(value), 5).unwrap();
        let options = LayoutOptions { scale_factor: scale, show_numerals: numerals, ..LayoutOptions::default() };
        let config = LayoutConfig::default();

        let first = compute_layout(&map, 6, &options, &config).unwrap();
        let second = compute_layout(&map, 6, &options, &config).unwrap();
        prop_assert_eq!(&first, &second);

        // Earth beads on a rod never overlap.
        for rod in first.beads.chunks(5) {
            let earth: Vec<f32> = rod.iter().filter(|b| b.bead.bead_type == BeadType::Earth).map(|b| b.y).collect();
            for pair in earth.windows(2) {
                prop_assert!(pair[1] - pair[0] >= first.dimensions.bead_size);
            }
        }
    }

    #[test]
    fn drag_polarity(distance in 4.0f32..50.0, heaven in any::<bool>()) {
        let bead_type = if heaven { BeadType::Heaven } else { BeadType::Earth };
        let toward_bar = if heaven { distance } else { -distance };

        let mut machine = GestureStateMachine::new(bead_type, 12.0, &GestureConfig::default());
        machine.start(100.0);
        prop_assert_eq!(machine.move_to(100.0 + toward_bar), Some(Direction::Activate));
        prop_assert_eq!(machine.move_to(100.0 + toward_bar), None);
        prop_assert_eq!(machine.move_to(100.0), Some(Direction::Deactivate));
    }
}
