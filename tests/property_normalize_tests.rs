use proptest::prelude::*;
use yarn_chart::core::{DEFAULT_NORMALIZE_SCALE, ValueBounds, normalize_array, value_bounds};

const TOLERANCE: f64 = 1e-6;

proptest! {
    #[test]
    fn normalization_maps_extremes_onto_scale(
        raw in proptest::collection::vec(-10_000.0f64..10_000.0, 2..96),
        scale in 0.1f64..2.0
    ) {
        let bounds = value_bounds(&raw).expect("non-empty series");
        prop_assume!(bounds.span() >= 0.01);

        let mut values = raw.clone();
        normalize_array(&mut values, scale, None);

        let normalized = value_bounds(&values).expect("non-empty series");
        prop_assert!((normalized.min + scale).abs() < TOLERANCE);
        prop_assert!((normalized.max - scale).abs() < TOLERANCE);
        for (before, after) in raw.windows(2).zip(values.windows(2)) {
            if before[0] < before[1] {
                prop_assert!(after[0] <= after[1]);
            } else if before[0] > before[1] {
                prop_assert!(after[0] >= after[1]);
            }
        }
    }

    #[test]
    fn explicit_bounds_map_onto_scale_regardless_of_data(
        raw in proptest::collection::vec(-100.0f64..100.0, 1..48),
        min in -500.0f64..-0.01,
        max in 0.01f64..500.0
    ) {
        let mut values = raw.clone();
        values.push(min);
        values.push(max);
        normalize_array(&mut values, DEFAULT_NORMALIZE_SCALE, Some(ValueBounds::new(min, max)));

        let count = values.len();
        prop_assert!((values[count - 2] + DEFAULT_NORMALIZE_SCALE).abs() < TOLERANCE);
        prop_assert!((values[count - 1] - DEFAULT_NORMALIZE_SCALE).abs() < TOLERANCE);
    }
}
