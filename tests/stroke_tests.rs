use approx::assert_abs_diff_eq;
use yarn_chart::core::{
    MAX_STEPS_PER_SEGMENT, MeshBuffers, StrokeParams, Vec2, tessellate_stroke,
    to_bezier_control_points,
};

fn params(accuracy: f64) -> StrokeParams {
    StrokeParams {
        half_width: 0.05,
        height_width_ratio: 0.75,
        texture_x_scale: 1.0,
        accuracy,
    }
}

fn chart_mesh(y: &[f64], accuracy: f64) -> MeshBuffers {
    let x: Vec<f64> = (0..y.len()).map(|i| i as f64 / y.len() as f64).collect();
    tessellate_stroke(&to_bezier_control_points(&x, y), params(accuracy))
}

#[test]
fn mesh_counts_follow_trimmed_fan_formula() {
    let mesh = chart_mesh(&[0.0, 0.3, 0.6, 0.3, 0.0], 1.0);
    let (segments, steps) = (4, 10);

    assert_eq!(mesh.vertex_count(), 2 * (1 + steps * segments));
    assert_eq!(mesh.triangle_count(), (steps * segments - 1) * 2);
    assert_eq!(mesh.tex_coords.len(), mesh.positions.len());
    mesh.validate().expect("valid mesh");
}

#[test]
fn accuracy_scales_steps_per_segment() {
    let mesh = chart_mesh(&[0.0, 0.5, 0.0], 2.0);
    assert_eq!(mesh.triangle_count(), (20 * 2 - 1) * 2);

    let coarse = chart_mesh(&[0.0, 0.5, 0.0], 0.01);
    assert_eq!(coarse.triangle_count(), (2 - 1) * 2);
}

#[test]
fn extreme_accuracy_is_capped_per_segment() {
    assert_eq!(params(1e19).steps_per_segment(), MAX_STEPS_PER_SEGMENT);
    assert_eq!(params(f64::INFINITY).steps_per_segment(), MAX_STEPS_PER_SEGMENT);
    assert_eq!(params(f64::NAN).steps_per_segment(), 1);

    let mesh = chart_mesh(&[0.0, 0.5, 0.0], 1e19);
    assert_eq!(mesh.vertex_count(), 2 * (1 + MAX_STEPS_PER_SEGMENT * 2));
    assert_eq!(mesh.triangle_count(), (MAX_STEPS_PER_SEGMENT * 2 - 1) * 2);
    mesh.validate().expect("valid mesh");
}

#[test]
fn indices_follow_fan_pattern_and_stay_in_range() {
    let mesh = chart_mesh(&[0.0, 0.4, -0.2], 1.0);
    assert_eq!(&mesh.indices[..6], &[2, 3, 1, 2, 1, 0]);
    assert_eq!(&mesh.indices[6..12], &[4, 5, 3, 4, 3, 2]);

    let vertex_count = mesh.vertex_count() as u32;
    assert!(mesh.indices.iter().all(|&index| index < vertex_count));
}

#[test]
fn texture_coordinates_track_arc_length() {
    let line = [
        Vec2::new(0.0, 0.0),
        Vec2::new(1.0 / 3.0, 0.0),
        Vec2::new(2.0 / 3.0, 0.0),
        Vec2::new(1.0, 0.0),
    ];
    let mut stroke = params(1.0);
    stroke.texture_x_scale = 2.0;
    let mesh = tessellate_stroke(&line, stroke);

    let mut previous_u = 0.0;
    for vertex in 0..mesh.vertex_count() {
        let (u, v) = mesh.tex_coord(vertex).expect("tex coord");
        assert!(u >= previous_u);
        assert_eq!(v, if vertex % 2 == 0 { 0.0 } else { 1.0 });
        previous_u = u;
    }
    assert_abs_diff_eq!(previous_u, 2.0, epsilon = 1e-5);
}

#[test]
fn ribbon_edges_offset_by_half_width_with_aspect_correction() {
    let vertical = [
        Vec2::new(0.0, 0.0),
        Vec2::new(0.0, 1.0 / 3.0),
        Vec2::new(0.0, 2.0 / 3.0),
        Vec2::new(0.0, 1.0),
    ];
    let mesh = tessellate_stroke(&vertical, params(1.0));
    let (outer_x, outer_y) = mesh.position(0).expect("outer");
    let (inner_x, inner_y) = mesh.position(1).expect("inner");

    // Normal of an upward tangent points left; x is scaled by height/width.
    assert_abs_diff_eq!(outer_x, -0.05 * 0.75, epsilon = 1e-6);
    assert_abs_diff_eq!(inner_x, 0.05 * 0.75, epsilon = 1e-6);
    assert_abs_diff_eq!(outer_y, 0.0, epsilon = 1e-6);
    assert_abs_diff_eq!(inner_y, 0.0, epsilon = 1e-6);
}

#[test]
fn degenerate_curve_produces_finite_geometry() {
    let point = Vec2::new(0.25, -0.5);
    let mesh = tessellate_stroke(&[point; 7], params(1.0));

    assert_eq!(mesh.triangle_count(), (20 - 1) * 2);
    mesh.validate().expect("finite mesh");
    let (_, outer_y) = mesh.position(0).expect("outer");
    assert_abs_diff_eq!(outer_y, -0.45, epsilon = 1e-6);
}

#[test]
fn incomplete_paths_produce_empty_mesh() {
    assert!(tessellate_stroke(&[], params(1.0)).is_empty());
    assert!(tessellate_stroke(&[Vec2::ZERO, Vec2::ZERO], params(1.0)).is_empty());
}

#[test]
fn upload_views_cover_every_buffer() {
    let mesh = chart_mesh(&[0.0, 1.0], 1.0);
    assert_eq!(mesh.position_bytes().len(), mesh.positions.len() * 4);
    assert_eq!(mesh.tex_coord_bytes().len(), mesh.tex_coords.len() * 4);
    assert_eq!(mesh.index_bytes().len(), mesh.indices.len() * 4);
}
