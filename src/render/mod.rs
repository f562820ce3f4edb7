mod frame;
mod null_renderer;
mod primitives;
mod texture;

pub use frame::RenderFrame;
pub use null_renderer::NullRenderer;
pub use primitives::{BlendMode, Color};
pub use texture::{
    CrossOrigin, DEFAULT_TEXTURE_URL, MemoryTextureLoader, PendingTexture, TextureImage,
    TextureLoader, TextureRequest, spawn_texture_load,
};

use crate::core::Viewport;
use crate::error::ChartResult;

/// Contract implemented by any rendering backend.
///
/// `prepare` runs once per session (texture upload, blend state); `render`
/// uploads one frame's buffers and issues a single indexed triangle draw.
pub trait Renderer {
    fn prepare(
        &mut self,
        viewport: Viewport,
        texture: &TextureImage,
        blend: BlendMode,
    ) -> ChartResult<()>;

    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()>;
}

#[cfg(feature = "cairo-backend")]
mod cairo_backend;
#[cfg(feature = "cairo-backend")]
pub use cairo_backend::{CairoContextRenderer, CairoRenderStats, CairoRenderer, PngTextureLoader};
