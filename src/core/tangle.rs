//! Replaces runs of high-magnitude samples with spiral "tangle" coils.
//!
//! The generator works on raw data units: samples below the threshold pass
//! through untouched, and each contiguous run at or above it becomes one coil
//! centered on the run's mean x. Coil size grows with both the run length and
//! its peak magnitude.

use std::ops::Range;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::types::ValueBounds;
use crate::core::vector::Vec2;

pub const DEFAULT_TANGLE_THRESHOLD: f64 = 100.0;

/// Peak magnitude per unit of coil amplitude.
pub const AMPLITUDE_DIVISOR: f64 = 100.0;

/// Samples of a run that contribute one lap.
pub const SAMPLES_PER_LAP: usize = 3;

/// Spiral points emitted per lap, not counting the closing point.
pub const STEPS_PER_LAP: usize = 3;

/// Upper bound on the amplitude-driven lap multiplier of one coil.
pub const MAX_COIL_LAP_FACTOR: usize = 16;

pub const COIL_START_ANGLE: f64 = 5.5;
pub const COIL_ANGLE_STEP: f64 = 2.0;

/// Horizontal coil radius per unit of amplitude, in local sample spacings.
pub const COIL_RADIUS_X_FACTOR: f64 = 0.25;

/// Vertical coil radius per unit of amplitude, in threshold units.
pub const COIL_RADIUS_Y_FACTOR: f64 = 0.25;

/// One coil substituted for a run of samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coil {
    /// Input sample range the coil replaces.
    pub samples: Range<usize>,
    /// Output point range holding the spiral.
    pub points: Range<usize>,
    pub center: Vec2,
    pub radius_x: f64,
    pub radius_y: f64,
    pub amplitude: f64,
    pub laps: usize,
}

/// Path anchors with every high-magnitude run replaced by a coil.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TangleGeometry {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub coils: Vec<Coil>,
    /// Value range precomputed from raw magnitudes and full coil radii.
    pub bounds: ValueBounds,
}

impl TangleGeometry {
    #[must_use]
    pub fn into_parts(self) -> (Vec<f64>, Vec<f64>) {
        (self.x, self.y)
    }
}

/// Scans `y_data` for runs at or above `threshold` and builds the tangle path.
///
/// Runs touching either end of the series extrapolate the missing neighbor by
/// mirroring the adjacent sample gap.
#[must_use]
pub fn generate_tangles(x_data: &[f64], y_data: &[f64], threshold: f64) -> TangleGeometry {
    let len = x_data.len().min(y_data.len());
    let mut x = Vec::with_capacity(len);
    let mut y = Vec::with_capacity(len);
    let mut coils = Vec::new();
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    let mut i = 0;
    while i < len {
        if y_data[i] < threshold {
            x.push(x_data[i]);
            y.push(y_data[i]);
            min_y = min_y.min(y_data[i]);
            max_y = max_y.max(y_data[i]);
            i += 1;
            continue;
        }

        let start = i;
        while i < len && y_data[i] >= threshold {
            i += 1;
        }
        let coil = build_coil(x_data, y_data, start..i, threshold, len, &mut x, &mut y);
        min_y = min_y.min(coil.center.y - coil.radius_y);
        max_y = max_y.max(coil.center.y + coil.radius_y);
        coils.push(coil);
    }

    debug!(
        samples = len,
        points = x.len(),
        coils = coils.len(),
        "generated tangle path"
    );
    let bounds = if min_y.is_finite() && max_y.is_finite() {
        ValueBounds::new(min_y, max_y)
    } else {
        ValueBounds::new(0.0, 0.0)
    };
    TangleGeometry {
        x,
        y,
        coils,
        bounds,
    }
}

fn build_coil(
    x_data: &[f64],
    y_data: &[f64],
    run: Range<usize>,
    threshold: f64,
    len: usize,
    x_out: &mut Vec<f64>,
    y_out: &mut Vec<f64>,
) -> Coil {
    let run_len = run.len();
    let first_gap = if len > 1 { x_data[1] - x_data[0] } else { 1.0 };
    let last_gap = if len > 1 {
        x_data[len - 1] - x_data[len - 2]
    } else {
        1.0
    };
    let left = if run.start > 0 {
        x_data[run.start - 1]
    } else {
        x_data[0] - first_gap
    };
    let right = if run.end < len {
        x_data[run.end]
    } else {
        x_data[len - 1] + last_gap
    };
    let spacing = (right - left) / (run_len + 1) as f64;

    // Baseline follows the bordering pass-through samples.
    let neighbors: Vec<f64> = [
        run.start.checked_sub(1).map(|j| y_data[j]),
        (run.end < len).then(|| y_data[run.end]),
    ]
    .into_iter()
    .flatten()
    .collect();
    let baseline = if neighbors.is_empty() {
        0.0
    } else {
        neighbors.iter().sum::<f64>() / neighbors.len() as f64
    };

    let center_x = x_data[run.clone()].iter().sum::<f64>() / run_len as f64;
    let peak = y_data[run.clone()]
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    let amplitude = peak / AMPLITUDE_DIVISOR;
    let lap_factor = amplitude.round().clamp(0.0, MAX_COIL_LAP_FACTOR as f64) as usize;
    let laps = run_len
        .div_ceil(SAMPLES_PER_LAP)
        .saturating_mul(lap_factor)
        .max(1);
    let radius_x = spacing.abs() * amplitude * COIL_RADIUS_X_FACTOR;
    let radius_y = threshold.abs() * amplitude * COIL_RADIUS_Y_FACTOR;
    let center = Vec2::new(center_x, baseline);

    let first_point = x_out.len();
    let steps = STEPS_PER_LAP.saturating_mul(laps);
    // Radius shrinks linearly so the spiral tightens toward the center; the
    // extra step is the closing point.
    for k in 0..=steps {
        let shrink = 1.0 - k as f64 / (steps + 1) as f64;
        let angle = COIL_START_ANGLE + k as f64 * COIL_ANGLE_STEP;
        x_out.push(center.x + radius_x * shrink * angle.cos());
        y_out.push(center.y + radius_y * shrink * angle.sin());
    }

    Coil {
        samples: run,
        points: first_point..x_out.len(),
        center,
        radius_x,
        radius_y,
        amplitude,
        laps,
    }
}
