use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::core::normalize::generate_x_data;
use crate::error::{ChartError, ChartResult};

/// Canvas size in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Height over width, applied to normal x-components so the stroke keeps a
    /// uniform on-screen width on non-square canvases.
    #[must_use]
    pub fn height_width_ratio(self) -> f64 {
        f64::from(self.height) / f64::from(self.width)
    }
}

/// Explicit value range used instead of auto-fitting min/max.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueBounds {
    pub min: f64,
    pub max: f64,
}

impl ValueBounds {
    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn span(self) -> f64 {
        self.max - self.min
    }

    #[must_use]
    pub fn mid(self) -> f64 {
        (self.min + self.max) / 2.0
    }
}

/// Owned copy of one x/y sample series.
///
/// Construction validates the shape; the caller's slices are never touched by
/// later normalization or redundancy removal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSeries {
    x: Vec<f64>,
    y: Vec<f64>,
}

impl SampleSeries {
    pub const MIN_SAMPLES: usize = 2;

    /// Copies `y_data` and `x_data`, defaulting x to `0..N-1` when absent.
    pub fn new(y_data: &[f64], x_data: Option<&[f64]>) -> ChartResult<Self> {
        let x = generate_x_data(y_data, x_data);
        Self::from_parts(x, y_data.to_vec())
    }

    pub fn from_parts(x: Vec<f64>, y: Vec<f64>) -> ChartResult<Self> {
        if x.len() != y.len() {
            return Err(ChartError::MismatchedSeries {
                x_len: x.len(),
                y_len: y.len(),
            });
        }
        if y.len() < Self::MIN_SAMPLES {
            return Err(ChartError::InsufficientSamples { len: y.len() });
        }
        if x.iter().chain(y.iter()).any(|value| !value.is_finite()) {
            return Err(ChartError::InvalidData(
                "sample values must be finite".to_owned(),
            ));
        }
        Ok(Self { x, y })
    }

    /// Builds a series from timestamped decimal samples; x is unix seconds.
    pub fn from_timestamped(samples: &[(DateTime<Utc>, Decimal)]) -> ChartResult<Self> {
        let mut x = Vec::with_capacity(samples.len());
        let mut y = Vec::with_capacity(samples.len());
        for (time, value) in samples {
            x.push(time.timestamp_millis() as f64 / 1000.0);
            y.push(value.to_f64().ok_or_else(|| {
                ChartError::InvalidData(format!("sample value {value} cannot be represented as f64"))
            })?);
        }
        Self::from_parts(x, y)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.y.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    #[must_use]
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    #[must_use]
    pub fn y(&self) -> &[f64] {
        &self.y
    }

    #[must_use]
    pub fn into_parts(self) -> (Vec<f64>, Vec<f64>) {
        (self.x, self.y)
    }
}
