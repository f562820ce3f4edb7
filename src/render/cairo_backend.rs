use std::fs::File;
use std::path::PathBuf;

use cairo::{Context, Extend, Filter, Format, ImageSurface, Matrix, Operator, SurfacePattern};
use tracing::trace;

use crate::core::Viewport;
use crate::error::{ChartError, ChartResult};
use crate::render::{
    BlendMode, Color, RenderFrame, Renderer, TextureImage, TextureLoader, TextureRequest,
};

/// Triangles whose pixel-space area falls below this are skipped.
const MIN_TRIANGLE_AREA_PX: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CairoRenderStats {
    pub triangles_drawn: usize,
    pub triangles_skipped: usize,
}

/// Optional extension trait for renderers that can draw into an external Cairo
/// context (for example a GTK `DrawingArea` callback).
pub trait CairoContextRenderer {
    fn render_on_cairo_context(
        &mut self,
        context: &Context,
        frame: &RenderFrame,
    ) -> ChartResult<()>;
}

/// Software rasterizer drawing the textured ribbon with Cairo.
///
/// Each triangle is filled with a repeating surface pattern whose matrix maps
/// the triangle's pixel corners onto its texture coordinates.
#[derive(Debug)]
pub struct CairoRenderer {
    surface: ImageSurface,
    clear_color: Color,
    texture: Option<ImageSurface>,
    blend: BlendMode,
    draw_calls: usize,
    last_stats: CairoRenderStats,
}

impl CairoRenderer {
    pub fn new(width: i32, height: i32) -> ChartResult<Self> {
        if width <= 0 || height <= 0 {
            return Err(ChartError::InvalidData(
                "cairo surface size must be > 0".to_owned(),
            ));
        }

        let surface = ImageSurface::create(Format::ARgb32, width, height)
            .map_err(|err| map_backend_error("failed to create cairo surface", err))?;
        Ok(Self {
            surface,
            clear_color: Color::TRANSPARENT,
            texture: None,
            blend: BlendMode::default(),
            draw_calls: 0,
            last_stats: CairoRenderStats::default(),
        })
    }

    #[must_use]
    pub fn surface(&self) -> &ImageSurface {
        &self.surface
    }

    pub fn set_clear_color(&mut self, color: Color) -> ChartResult<()> {
        color.validate()?;
        self.clear_color = color;
        Ok(())
    }

    #[must_use]
    pub fn draw_calls(&self) -> usize {
        self.draw_calls
    }

    #[must_use]
    pub fn last_stats(&self) -> CairoRenderStats {
        self.last_stats
    }

    fn render_with_context(&mut self, context: &Context, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;
        let Some(texture) = self.texture.as_ref() else {
            return Err(ChartError::Backend(
                "cairo renderer used before prepare".to_owned(),
            ));
        };

        context.set_operator(Operator::Source);
        context.set_source_rgba(
            self.clear_color.red,
            self.clear_color.green,
            self.clear_color.blue,
            self.clear_color.alpha,
        );
        context
            .paint()
            .map_err(|err| map_backend_error("failed to clear surface", err))?;
        context.set_operator(match self.blend {
            BlendMode::SourceAlphaOver => Operator::Over,
            BlendMode::Opaque => Operator::Source,
        });

        let pattern = SurfacePattern::create(texture);
        pattern.set_extend(Extend::Repeat);
        pattern.set_filter(Filter::Nearest);

        let texture_size = (f64::from(texture.width()), f64::from(texture.height()));
        let mut stats = CairoRenderStats::default();
        for triangle in frame.mesh.indices.chunks_exact(3) {
            let mut corners = [((0.0, 0.0), (0.0, 0.0)); 3];
            for (corner, &index) in corners.iter_mut().zip(triangle) {
                let index = index as usize;
                let (Some(position), Some(tex)) =
                    (frame.mesh.position(index), frame.mesh.tex_coord(index))
                else {
                    return Err(ChartError::InvalidData(format!(
                        "mesh index {index} out of range"
                    )));
                };
                *corner = (
                    clip_to_pixel(position, frame.viewport),
                    (
                        f64::from(tex.0) * texture_size.0,
                        f64::from(tex.1) * texture_size.1,
                    ),
                );
            }

            let Some(matrix) = triangle_texture_matrix(&corners) else {
                stats.triangles_skipped += 1;
                continue;
            };
            pattern.set_matrix(matrix);
            context
                .set_source(&pattern)
                .map_err(|err| map_backend_error("failed to set texture source", err))?;
            context.move_to(corners[0].0.0, corners[0].0.1);
            context.line_to(corners[1].0.0, corners[1].0.1);
            context.line_to(corners[2].0.0, corners[2].0.1);
            context.close_path();
            context
                .fill()
                .map_err(|err| map_backend_error("failed to fill triangle", err))?;
            stats.triangles_drawn += 1;
        }

        trace!(
            drawn = stats.triangles_drawn,
            skipped = stats.triangles_skipped,
            "cairo draw pass"
        );
        self.draw_calls += 1;
        self.last_stats = stats;
        Ok(())
    }
}

impl Renderer for CairoRenderer {
    fn prepare(
        &mut self,
        viewport: Viewport,
        texture: &TextureImage,
        blend: BlendMode,
    ) -> ChartResult<()> {
        if i64::from(viewport.width) != i64::from(self.surface.width())
            || i64::from(viewport.height) != i64::from(self.surface.height())
        {
            return Err(ChartError::Backend(format!(
                "viewport {}x{} does not match surface {}x{}",
                viewport.width,
                viewport.height,
                self.surface.width(),
                self.surface.height()
            )));
        }
        self.texture = Some(texture_to_surface(texture)?);
        self.blend = blend;
        Ok(())
    }

    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        let context = Context::new(&self.surface)
            .map_err(|err| map_backend_error("failed to create cairo context", err))?;
        self.render_with_context(&context, frame)
    }
}

impl CairoContextRenderer for CairoRenderer {
    fn render_on_cairo_context(
        &mut self,
        context: &Context,
        frame: &RenderFrame,
    ) -> ChartResult<()> {
        self.render_with_context(context, frame)
    }
}

/// Loads PNG textures from disk, resolving URLs against `base_dir`.
#[derive(Debug, Clone, Default)]
pub struct PngTextureLoader {
    base_dir: PathBuf,
}

impl PngTextureLoader {
    #[must_use]
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }
}

impl TextureLoader for PngTextureLoader {
    fn load(&self, request: &TextureRequest) -> ChartResult<TextureImage> {
        let load_error = |reason: String| ChartError::TextureLoad {
            url: request.url.clone(),
            reason,
        };
        let path = self.base_dir.join(&request.url);
        let mut file = File::open(&path).map_err(|err| load_error(err.to_string()))?;
        let surface =
            ImageSurface::create_from_png(&mut file).map_err(|err| load_error(err.to_string()))?;
        surface_to_texture(&surface).map_err(|err| load_error(err.to_string()))
    }
}

fn clip_to_pixel((x, y): (f32, f32), viewport: Viewport) -> (f64, f64) {
    (
        (f64::from(x) + 1.0) * 0.5 * f64::from(viewport.width),
        (1.0 - f64::from(y)) * 0.5 * f64::from(viewport.height),
    )
}

/// Affine map from pixel space onto texture space fixed by three corners.
fn triangle_texture_matrix(corners: &[((f64, f64), (f64, f64)); 3]) -> Option<Matrix> {
    let (p0, t0) = corners[0];
    let (p1, t1) = corners[1];
    let (p2, t2) = corners[2];
    let (dp1, dp2) = ((p1.0 - p0.0, p1.1 - p0.1), (p2.0 - p0.0, p2.1 - p0.1));
    let (dt1, dt2) = ((t1.0 - t0.0, t1.1 - t0.1), (t2.0 - t0.0, t2.1 - t0.1));

    let det = dp1.0 * dp2.1 - dp2.0 * dp1.1;
    if det.abs() < MIN_TRIANGLE_AREA_PX || !det.is_finite() {
        return None;
    }
    let xx = (dt1.0 * dp2.1 - dt2.0 * dp1.1) / det;
    let xy = (dt2.0 * dp1.0 - dt1.0 * dp2.0) / det;
    let yx = (dt1.1 * dp2.1 - dt2.1 * dp1.1) / det;
    let yy = (dt2.1 * dp1.0 - dt1.1 * dp2.0) / det;
    let x0 = t0.0 - xx * p0.0 - xy * p0.1;
    let y0 = t0.1 - yx * p0.0 - yy * p0.1;
    Some(Matrix::new(xx, yx, xy, yy, x0, y0))
}

fn texture_to_surface(texture: &TextureImage) -> ChartResult<ImageSurface> {
    texture.validate()?;
    let width = i32::try_from(texture.width)
        .map_err(|_| ChartError::InvalidData("texture too wide".to_owned()))?;
    let height = i32::try_from(texture.height)
        .map_err(|_| ChartError::InvalidData("texture too tall".to_owned()))?;
    let stride = Format::ARgb32
        .stride_for_width(texture.width)
        .map_err(|err| map_backend_error("invalid texture stride", err))?;

    let row_bytes = texture.width as usize * 4;
    let mut data = vec![0u8; stride as usize * texture.height as usize];
    for (row, source) in texture.rgba.chunks_exact(row_bytes).enumerate() {
        let target = &mut data[row * stride as usize..row * stride as usize + row_bytes];
        for (pixel, rgba) in target.chunks_exact_mut(4).zip(source.chunks_exact(4)) {
            let alpha = u32::from(rgba[3]);
            let premultiply = |channel: u8| (u32::from(channel) * alpha + 127) / 255;
            let argb = (alpha << 24)
                | (premultiply(rgba[0]) << 16)
                | (premultiply(rgba[1]) << 8)
                | premultiply(rgba[2]);
            pixel.copy_from_slice(&argb.to_ne_bytes());
        }
    }

    ImageSurface::create_for_data(data, Format::ARgb32, width, height, stride)
        .map_err(|err| map_backend_error("failed to create texture surface", err))
}

fn surface_to_texture(surface: &ImageSurface) -> ChartResult<TextureImage> {
    let format = surface.format();
    if format != Format::ARgb32 && format != Format::Rgb24 {
        return Err(ChartError::InvalidData(format!(
            "unsupported texture surface format {format:?}"
        )));
    }
    surface.flush();
    let width = u32::try_from(surface.width())
        .map_err(|_| ChartError::InvalidData("negative surface width".to_owned()))?;
    let height = u32::try_from(surface.height())
        .map_err(|_| ChartError::InvalidData("negative surface height".to_owned()))?;
    let stride = surface.stride() as usize;

    let mut rgba = Vec::with_capacity(width as usize * height as usize * 4);
    surface
        .with_data(|data| {
            for row in data.chunks(stride).take(height as usize) {
                for pixel in row.chunks_exact(4).take(width as usize) {
                    let argb = u32::from_ne_bytes([pixel[0], pixel[1], pixel[2], pixel[3]]);
                    let alpha = if format == Format::Rgb24 {
                        255
                    } else {
                        argb >> 24
                    };
                    let unpremultiply = |channel: u32| {
                        if alpha == 0 {
                            0
                        } else {
                            ((channel * 255 + alpha / 2) / alpha).min(255) as u8
                        }
                    };
                    rgba.push(unpremultiply((argb >> 16) & 0xff));
                    rgba.push(unpremultiply((argb >> 8) & 0xff));
                    rgba.push(unpremultiply(argb & 0xff));
                    rgba.push(alpha as u8);
                }
            }
        })
        .map_err(|err| ChartError::Backend(format!("failed to read texture surface: {err}")))?;

    TextureImage::new(width, height, rgba)
}

fn map_backend_error(prefix: &str, err: cairo::Error) -> ChartError {
    ChartError::Backend(format!("{prefix}: {err}"))
}
