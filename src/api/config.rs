use serde::{Deserialize, Serialize};

use crate::core::DEFAULT_TANGLE_THRESHOLD;
use crate::error::{ChartError, ChartResult};
use crate::render::DEFAULT_TEXTURE_URL;

/// Per-chart configuration.
///
/// This type is serializable so host applications can persist/load chart setup
/// without inventing their own ad-hoc format. Every field has a default, so a
/// partial JSON object is accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    #[serde(default = "default_texture_url")]
    pub texture_url: String,
    #[serde(default = "default_line_width")]
    pub line_width: f64,
    /// Replace high-magnitude runs with tangle coils.
    #[serde(default)]
    pub tangle_mode: bool,
    /// Tessellation density multiplier.
    #[serde(default = "default_accuracy")]
    pub accuracy: f64,
    /// Fixed lower y bound; `None` auto-fits.
    #[serde(default)]
    pub y_min: Option<f64>,
    /// Fixed upper y bound; `None` auto-fits.
    #[serde(default)]
    pub y_max: Option<f64>,
    #[serde(default = "default_y_scale")]
    pub y_scale: f64,
    #[serde(default = "default_tangle_threshold")]
    pub tangle_threshold: f64,
    /// Origin of the embedding page, used to decide texture credential policy.
    #[serde(default)]
    pub page_origin: Option<String>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            texture_url: default_texture_url(),
            line_width: default_line_width(),
            tangle_mode: false,
            accuracy: default_accuracy(),
            y_min: None,
            y_max: None,
            y_scale: default_y_scale(),
            tangle_threshold: default_tangle_threshold(),
            page_origin: None,
        }
    }
}

impl ChartConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_texture_url(mut self, url: impl Into<String>) -> Self {
        self.texture_url = url.into();
        self
    }

    #[must_use]
    pub fn with_line_width(mut self, line_width: f64) -> Self {
        self.line_width = line_width;
        self
    }

    #[must_use]
    pub fn with_tangle_mode(mut self, enabled: bool) -> Self {
        self.tangle_mode = enabled;
        self
    }

    #[must_use]
    pub fn with_accuracy(mut self, accuracy: f64) -> Self {
        self.accuracy = accuracy;
        self
    }

    /// Sets fixed y bounds; `None` on either side auto-fits that side.
    #[must_use]
    pub fn with_y_bounds(mut self, y_min: Option<f64>, y_max: Option<f64>) -> Self {
        self.y_min = y_min;
        self.y_max = y_max;
        self
    }

    #[must_use]
    pub fn with_y_scale(mut self, y_scale: f64) -> Self {
        self.y_scale = y_scale;
        self
    }

    #[must_use]
    pub fn with_tangle_threshold(mut self, threshold: f64) -> Self {
        self.tangle_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_page_origin(mut self, origin: impl Into<String>) -> Self {
        self.page_origin = Some(origin.into());
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.texture_url.is_empty() {
            return Err(ChartError::InvalidData(
                "texture url must not be empty".to_owned(),
            ));
        }
        for (name, value) in [
            ("line width", self.line_width),
            ("accuracy", self.accuracy),
            ("y scale", self.y_scale),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "{name} must be finite and > 0"
                )));
            }
        }
        if !self.tangle_threshold.is_finite() {
            return Err(ChartError::InvalidData(
                "tangle threshold must be finite".to_owned(),
            ));
        }
        if self
            .y_min
            .into_iter()
            .chain(self.y_max)
            .any(|bound| !bound.is_finite())
        {
            return Err(ChartError::InvalidData(
                "y bounds must be finite".to_owned(),
            ));
        }
        if let (Some(min), Some(max)) = (self.y_min, self.y_max) {
            if min > max {
                return Err(ChartError::InvalidData(format!(
                    "y_min ({min}) must be <= y_max ({max})"
                )));
            }
        }
        Ok(())
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse chart config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize chart config: {e}"))
        })
    }
}

fn default_texture_url() -> String {
    DEFAULT_TEXTURE_URL.to_owned()
}

fn default_line_width() -> f64 {
    1.0
}

fn default_accuracy() -> f64 {
    1.0
}

fn default_y_scale() -> f64 {
    1.0
}

fn default_tangle_threshold() -> f64 {
    DEFAULT_TANGLE_THRESHOLD
}
