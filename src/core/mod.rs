pub mod bezier;
pub mod normalize;
pub mod stroke;
pub mod tangle;
pub mod types;
pub mod vector;

pub use bezier::{control_points_for_anchors, cubic_point, segment_count, to_bezier_control_points};
pub use normalize::{
    DEFAULT_NORMALIZE_SCALE, generate_x_data, normalize_array, remove_redundant, value_bounds,
};
pub use stroke::{MAX_STEPS_PER_SEGMENT, MeshBuffers, StrokeParams, tessellate_stroke};
pub use tangle::{
    Coil, DEFAULT_TANGLE_THRESHOLD, MAX_COIL_LAP_FACTOR, TangleGeometry, generate_tangles,
};
pub use types::{SampleSeries, ValueBounds, Viewport};
pub use vector::Vec2;
