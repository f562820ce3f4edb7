use proptest::prelude::*;
use yarn_chart::core::{
    DEFAULT_NORMALIZE_SCALE, StrokeParams, generate_x_data, normalize_array, remove_redundant,
    segment_count, tessellate_stroke, to_bezier_control_points,
};

proptest! {
    #[test]
    fn tessellated_indices_stay_in_range(
        raw in proptest::collection::vec(-1_000.0f64..1_000.0, 2..64),
        accuracy in 0.05f64..3.0,
        half_width in 0.001f64..0.2
    ) {
        let mut x = generate_x_data(&raw, None);
        let mut y = raw.clone();
        normalize_array(&mut x, DEFAULT_NORMALIZE_SCALE, None);
        normalize_array(&mut y, DEFAULT_NORMALIZE_SCALE, None);
        remove_redundant(&mut x, &mut y);

        let control_points = to_bezier_control_points(&x, &y);
        let params = StrokeParams {
            half_width,
            height_width_ratio: 0.6,
            texture_x_scale: 3.0,
            accuracy,
        };
        let mesh = tessellate_stroke(&control_points, params);
        let total_steps = params.steps_per_segment() * segment_count(&control_points);

        prop_assert_eq!(mesh.vertex_count(), 2 * (1 + total_steps));
        prop_assert_eq!(mesh.triangle_count(), (total_steps - 1) * 2);
        prop_assert_eq!(mesh.tex_coords.len(), mesh.positions.len());
        let vertex_count = mesh.vertex_count() as u32;
        prop_assert!(mesh.indices.iter().all(|&index| index < vertex_count));
        prop_assert!(mesh.validate().is_ok());
    }

    #[test]
    fn redundancy_removal_never_drops_distinct_values(
        raw in proptest::collection::vec(0u8..3, 2..80)
    ) {
        let mut y: Vec<f64> = raw.iter().map(|&v| f64::from(v)).collect();
        let mut x = generate_x_data(&y, None);
        let mut distinct_before: Vec<f64> = y.clone();
        distinct_before.dedup();
        remove_redundant(&mut x, &mut y);

        let mut distinct_after = y.clone();
        distinct_after.dedup();
        prop_assert_eq!(distinct_before, distinct_after);
        prop_assert_eq!(x.len(), y.len());
        prop_assert!(x.windows(2).all(|pair| pair[0] < pair[1]));
    }
}
