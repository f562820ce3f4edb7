use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// RGBA color with channels in `0..=1`, used for backend clear color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);

    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    pub fn validate(self) -> ChartResult<()> {
        let channels = [self.red, self.green, self.blue, self.alpha];
        if channels
            .iter()
            .all(|value| value.is_finite() && (0.0..=1.0).contains(value))
        {
            Ok(())
        } else {
            Err(ChartError::InvalidData(format!(
                "color channels must be finite and in [0, 1], got {channels:?}"
            )))
        }
    }
}

/// Blend state requested from the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BlendMode {
    /// `src * src_alpha + dst * (1 - src_alpha)`.
    #[default]
    SourceAlphaOver,
    /// Texture replaces the destination.
    Opaque,
}
