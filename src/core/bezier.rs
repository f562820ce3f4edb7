use crate::core::vector::Vec2;

/// Weight given to the corner-tangent projection when shaping a handle; the
/// remainder keeps the raw chord direction.
pub const TANGENT_BLEND: f64 = 0.9;

/// Handle length as a fraction of the chord between two anchors.
pub const HANDLE_CHORD_RATIO: f64 = 0.7;

/// Builds the cubic control-point sequence through `(x_data[i], y_data[i])`.
///
/// The result has `1 + 3 * (N - 1)` points; indices `0, 3, 6, ...` are the
/// samples themselves and the two points between each pair are handles.
#[must_use]
pub fn to_bezier_control_points(x_data: &[f64], y_data: &[f64]) -> Vec<Vec2> {
    let anchors: Vec<Vec2> = x_data
        .iter()
        .zip(y_data)
        .map(|(&x, &y)| Vec2::new(x, y))
        .collect();
    control_points_for_anchors(&anchors)
}

#[must_use]
pub fn control_points_for_anchors(anchors: &[Vec2]) -> Vec<Vec2> {
    let Some(&last) = anchors.last() else {
        return Vec::new();
    };
    let mut points = Vec::with_capacity(1 + 3 * anchors.len().saturating_sub(1));

    for (i, pair) in anchors.windows(2).enumerate() {
        let (p1, p2) = (pair[0], pair[1]);
        // Missing neighbors at the ends fall back to the nearer anchor.
        let p0 = if i == 0 { p1 } else { anchors[i - 1] };
        let p3 = anchors.get(i + 2).copied().unwrap_or(p2);

        let chord = (p2 - p1).scale(HANDLE_CHORD_RATIO);
        let leading = blend_handle(chord, p1.corner_tangent(p0, p2));
        let trailing = blend_handle(chord, p2.corner_tangent(p1, p3));

        points.push(p1);
        points.push(p1 + leading);
        points.push(p2 - trailing);
    }
    points.push(last);
    points
}

fn blend_handle(chord: Vec2, tangent: Vec2) -> Vec2 {
    chord.lerp(chord.project_onto(tangent), TANGENT_BLEND)
}

/// Point on the cubic at parameter `t` by repeated linear interpolation.
#[must_use]
pub fn cubic_point(t: f64, p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2) -> Vec2 {
    let q0 = p0.lerp(p1, t);
    let q1 = p1.lerp(p2, t);
    let q2 = p2.lerp(p3, t);
    let r0 = q0.lerp(q1, t);
    let r1 = q1.lerp(q2, t);
    r0.lerp(r1, t)
}

/// Number of cubic segments in a control-point sequence.
#[must_use]
pub fn segment_count(control_points: &[Vec2]) -> usize {
    control_points.len().saturating_sub(1) / 3
}
