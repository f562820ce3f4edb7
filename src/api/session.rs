use std::sync::Arc;

use tracing::{debug, info};

use crate::api::{CanvasId, ChartConfig};
use crate::core::{
    DEFAULT_NORMALIZE_SCALE, MeshBuffers, SampleSeries, StrokeParams, ValueBounds, Viewport,
    generate_tangles, normalize_array, remove_redundant, tessellate_stroke,
    to_bezier_control_points, value_bounds,
};
use crate::error::{ChartError, ChartResult};
use crate::render::{BlendMode, RenderFrame, Renderer, TextureImage};

/// Stroke width multiplier relative to the texture's share of canvas height.
pub const LINE_WIDTH_TEXTURE_FACTOR: f64 = 1.35;

/// Texture repeats per unit of clip-space arc length, per texture width.
pub const TEXTURE_X_SCALE_FACTOR: f64 = 0.5;

/// Per-canvas render state: backend, loaded texture and configuration.
///
/// Created once per canvas; `update` re-renders new data without reloading
/// the texture or repeating backend setup.
pub struct ChartSession<R: Renderer> {
    canvas: CanvasId,
    renderer: R,
    viewport: Viewport,
    texture: Arc<TextureImage>,
    config: ChartConfig,
    mesh: MeshBuffers,
    render_count: usize,
}

impl<R: Renderer> ChartSession<R> {
    pub fn new(
        canvas: CanvasId,
        mut renderer: R,
        viewport: Viewport,
        texture: Arc<TextureImage>,
        config: ChartConfig,
    ) -> ChartResult<Self> {
        if !viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        config.validate()?;
        renderer.prepare(viewport, &texture, BlendMode::SourceAlphaOver)?;
        info!(
            %canvas,
            width = viewport.width,
            height = viewport.height,
            texture = %config.texture_url,
            "chart session created"
        );

        Ok(Self {
            canvas,
            renderer,
            viewport,
            texture,
            config,
            mesh: MeshBuffers::default(),
            render_count: 0,
        })
    }

    #[must_use]
    pub fn canvas(&self) -> CanvasId {
        self.canvas
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    #[must_use]
    pub fn texture(&self) -> &TextureImage {
        &self.texture
    }

    /// Mesh submitted by the most recent render.
    #[must_use]
    pub fn mesh(&self) -> &MeshBuffers {
        &self.mesh
    }

    #[must_use]
    pub fn render_count(&self) -> usize {
        self.render_count
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }

    pub fn set_config(&mut self, config: ChartConfig) -> ChartResult<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Pins the y range; `None` on either side auto-fits that side.
    pub fn set_y_bounds(&mut self, y_min: Option<f64>, y_max: Option<f64>) -> ChartResult<()> {
        let config = self.config.clone().with_y_bounds(y_min, y_max);
        self.set_config(config)
    }

    pub fn set_accuracy(&mut self, accuracy: f64) -> ChartResult<()> {
        let config = self.config.clone().with_accuracy(accuracy);
        self.set_config(config)
    }

    /// Swaps the strand texture and repeats backend setup for it.
    pub fn set_texture(&mut self, texture: Arc<TextureImage>) -> ChartResult<()> {
        self.renderer
            .prepare(self.viewport, &texture, BlendMode::SourceAlphaOver)?;
        self.texture = texture;
        Ok(())
    }

    /// Re-renders with new samples; `x_data` defaults to `0..N-1`.
    pub fn update(&mut self, y_data: &[f64], x_data: Option<&[f64]>) -> ChartResult<()> {
        let series = SampleSeries::new(y_data, x_data)?;
        self.render_series(&series)
    }

    pub fn render_series(&mut self, series: &SampleSeries) -> ChartResult<()> {
        let mesh = self.build_mesh(series);
        let frame = RenderFrame::new(self.viewport, mesh, Arc::clone(&self.texture));
        self.renderer.render(&frame)?;
        self.mesh = frame.mesh;
        self.render_count += 1;
        Ok(())
    }

    /// Runs normalize, path fitting and tessellation without drawing.
    #[must_use]
    pub fn build_mesh(&self, series: &SampleSeries) -> MeshBuffers {
        let (mut x, mut y, y_bounds) = if self.config.tangle_mode {
            let tangles = generate_tangles(series.x(), series.y(), self.config.tangle_threshold);
            let bounds = self.explicit_y_bounds(&tangles.y).unwrap_or(tangles.bounds);
            let (x, y) = tangles.into_parts();
            (x, y, Some(bounds))
        } else {
            let y = series.y().to_vec();
            let bounds = self.explicit_y_bounds(&y);
            (series.x().to_vec(), y, bounds)
        };

        normalize_array(&mut x, DEFAULT_NORMALIZE_SCALE, None);
        normalize_array(
            &mut y,
            DEFAULT_NORMALIZE_SCALE * self.config.y_scale,
            y_bounds,
        );
        let input_len = x.len();
        remove_redundant(&mut x, &mut y);

        let control_points = to_bezier_control_points(&x, &y);
        let mesh = tessellate_stroke(control_points.as_slice(), self.stroke_params());
        debug!(
            canvas = %self.canvas,
            samples = input_len,
            kept = x.len(),
            vertices = mesh.vertex_count(),
            indices = mesh.indices.len(),
            "built chart mesh"
        );
        mesh
    }

    #[must_use]
    pub fn stroke_params(&self) -> StrokeParams {
        StrokeParams {
            half_width: self.config.line_width
                * LINE_WIDTH_TEXTURE_FACTOR
                * f64::from(self.texture.height)
                / f64::from(self.viewport.height),
            height_width_ratio: self.viewport.height_width_ratio(),
            texture_x_scale: TEXTURE_X_SCALE_FACTOR * f64::from(self.viewport.width)
                / f64::from(self.texture.width),
            accuracy: self.config.accuracy,
        }
    }

    fn explicit_y_bounds(&self, y: &[f64]) -> Option<ValueBounds> {
        match (self.config.y_min, self.config.y_max) {
            (None, None) => None,
            (Some(min), Some(max)) => Some(ValueBounds::new(min, max)),
            (min, max) => {
                let fitted = value_bounds(y)?;
                let min = min.unwrap_or(fitted.min);
                let max = max.unwrap_or(fitted.max);
                Some(ValueBounds::new(min.min(max), max.max(min)))
            }
        }
    }
}
