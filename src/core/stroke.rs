//! Ribbon tessellation of a cubic Bezier path into a textured triangle mesh.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::bezier::{cubic_point, segment_count};
use crate::core::vector::Vec2;
use crate::error::{ChartError, ChartResult};

/// Parameter offset used for the finite-difference tangent.
pub const TANGENT_EPSILON: f64 = 0.001;

/// Samples per cubic segment at `accuracy == 1.0`.
pub const BASE_STEPS_PER_SEGMENT: f64 = 10.0;

/// Upper bound on samples per cubic segment, whatever the accuracy.
pub const MAX_STEPS_PER_SEGMENT: usize = 1_000;

/// Index pattern for one quad between the vertex pairs at step `n` and `n + 1`.
pub const QUAD_TRIANGLE_INDICES: [u32; 6] = [2, 3, 1, 2, 1, 0];

/// Inputs of one tessellation pass, all in clip-space units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeParams {
    pub half_width: f64,
    /// Canvas height over width; scales normal x-components.
    pub height_width_ratio: f64,
    /// Texture-x advance per unit of arc length.
    pub texture_x_scale: f64,
    /// Tessellation density multiplier.
    pub accuracy: f64,
}

impl StrokeParams {
    #[must_use]
    pub fn steps_per_segment(self) -> usize {
        let steps = (BASE_STEPS_PER_SEGMENT * self.accuracy).round();
        if steps.is_nan() || steps < 1.0 {
            1
        } else {
            steps.min(MAX_STEPS_PER_SEGMENT as f64) as usize
        }
    }
}

/// Vertex, texture-coordinate and index buffers ready for upload.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MeshBuffers {
    /// Flat `x, y` pairs, two ribbon-edge vertices per sample.
    pub positions: Vec<f32>,
    /// Flat `u, v` pairs; `u` grows with arc length, `v` alternates 0/1.
    pub tex_coords: Vec<f32>,
    pub indices: Vec<u32>,
}

impl MeshBuffers {
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 2
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    #[must_use]
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    #[must_use]
    pub fn tex_coord_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.tex_coords)
    }

    #[must_use]
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Position of vertex `index` as `(x, y)`.
    #[must_use]
    pub fn position(&self, index: usize) -> Option<(f32, f32)> {
        let x = *self.positions.get(index * 2)?;
        let y = *self.positions.get(index * 2 + 1)?;
        Some((x, y))
    }

    #[must_use]
    pub fn tex_coord(&self, index: usize) -> Option<(f32, f32)> {
        let u = *self.tex_coords.get(index * 2)?;
        let v = *self.tex_coords.get(index * 2 + 1)?;
        Some((u, v))
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.positions.len() % 2 != 0 || self.tex_coords.len() != self.positions.len() {
            return Err(ChartError::InvalidData(
                "mesh positions and texture coordinates must be paired".to_owned(),
            ));
        }
        if self.indices.len() % 3 != 0 {
            return Err(ChartError::InvalidData(
                "mesh index count must be a multiple of 3".to_owned(),
            ));
        }
        let vertex_count = self.vertex_count();
        if let Some(&index) = self
            .indices
            .iter()
            .find(|&&index| index as usize >= vertex_count)
        {
            return Err(ChartError::InvalidData(format!(
                "mesh index {index} out of range for {vertex_count} vertices"
            )));
        }
        if self
            .positions
            .iter()
            .chain(self.tex_coords.iter())
            .any(|value| !value.is_finite())
        {
            return Err(ChartError::InvalidData(
                "mesh coordinates must be finite".to_owned(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
struct CurveSample {
    position: Vec2,
    normal: Vec2,
}

/// Position and unit normal at `t`. The normal is zero on degenerate curves.
fn sample_curve(t: f64, segment: &[Vec2]) -> CurveSample {
    let [p0, p1, p2, p3] = [segment[0], segment[1], segment[2], segment[3]];
    let position = cubic_point(t, p0, p1, p2, p3);
    let tangent = if t + TANGENT_EPSILON <= 1.0 {
        cubic_point(t + TANGENT_EPSILON, p0, p1, p2, p3) - position
    } else {
        position - cubic_point(t - TANGENT_EPSILON, p0, p1, p2, p3)
    };
    CurveSample {
        position,
        normal: tangent.rotate_90_ccw().normalize(1.0),
    }
}

fn sample_segment(segment: &[Vec2], steps: usize) -> Vec<CurveSample> {
    (1..=steps)
        .map(|k| sample_curve(k as f64 / steps as f64, segment))
        .collect()
}

#[cfg(not(feature = "parallel-tessellation"))]
fn sample_segments(control_points: &[Vec2], segments: usize, steps: usize) -> Vec<CurveSample> {
    (0..segments)
        .flat_map(|s| sample_segment(&control_points[s * 3..s * 3 + 4], steps))
        .collect()
}

#[cfg(feature = "parallel-tessellation")]
fn sample_segments(control_points: &[Vec2], segments: usize, steps: usize) -> Vec<CurveSample> {
    use rayon::prelude::*;

    let per_segment: Vec<Vec<CurveSample>> = (0..segments)
        .into_par_iter()
        .map(|s| sample_segment(&control_points[s * 3..s * 3 + 4], steps))
        .collect();
    per_segment.into_iter().flatten().collect()
}

/// Tessellates the control-point sequence into a ribbon mesh.
///
/// Produces `2 * (1 + K * segments)` vertices and `(K * segments - 1) * 2`
/// triangles, the last quad being dropped because the path is open.
#[must_use]
pub fn tessellate_stroke(control_points: &[Vec2], params: StrokeParams) -> MeshBuffers {
    let segments = segment_count(control_points);
    if segments == 0 {
        return MeshBuffers::default();
    }
    let steps = params.steps_per_segment();
    let total_steps = steps.saturating_mul(segments);

    let first = sample_curve(0.0, &control_points[..4]);
    let samples = sample_segments(control_points, segments, steps);
    trace!(segments, steps, "sampled bezier segments");

    let vertex_count = 2 * (1 + total_steps);
    let mut mesh = MeshBuffers {
        positions: Vec::with_capacity(vertex_count * 2),
        tex_coords: Vec::with_capacity(vertex_count * 2),
        indices: Vec::with_capacity((total_steps - 1) * QUAD_TRIANGLE_INDICES.len()),
    };

    // Degenerate tangents reuse the last good normal, starting from "up".
    let mut last_normal = if first.normal == Vec2::ZERO {
        Vec2::new(0.0, 1.0)
    } else {
        first.normal
    };
    let mut previous = first.position;
    let mut texture_x = 0.0;
    push_ribbon_pair(&mut mesh, first.position, last_normal, texture_x, params);

    for sample in &samples {
        if sample.normal != Vec2::ZERO {
            last_normal = sample.normal;
        }
        texture_x += previous.distance(sample.position) * params.texture_x_scale;
        previous = sample.position;
        push_ribbon_pair(&mut mesh, sample.position, last_normal, texture_x, params);
    }

    for step in 0..total_steps - 1 {
        let base = 2 * step as u32;
        mesh.indices
            .extend(QUAD_TRIANGLE_INDICES.iter().map(|index| index + base));
    }

    debug!(
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        texture_length = texture_x,
        "tessellated stroke"
    );
    mesh
}

fn push_ribbon_pair(
    mesh: &mut MeshBuffers,
    position: Vec2,
    unit_normal: Vec2,
    texture_x: f64,
    params: StrokeParams,
) {
    let offset = Vec2::new(
        unit_normal.x * params.half_width * params.height_width_ratio,
        unit_normal.y * params.half_width,
    );
    let outer = position + offset;
    let inner = position - offset;
    mesh.positions.extend_from_slice(&[
        outer.x as f32,
        outer.y as f32,
        inner.x as f32,
        inner.y as f32,
    ]);
    mesh.tex_coords
        .extend_from_slice(&[texture_x as f32, 0.0, texture_x as f32, 1.0]);
}
