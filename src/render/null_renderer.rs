use crate::core::Viewport;
use crate::error::ChartResult;
use crate::render::{BlendMode, RenderFrame, Renderer, TextureImage};

/// No-op renderer used by tests and headless usage.
///
/// It still validates frames so tests catch invalid geometry without a real
/// backend.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub prepare_calls: usize,
    pub draw_calls: usize,
    pub last_viewport: Option<Viewport>,
    pub last_blend: Option<BlendMode>,
    pub last_vertex_count: usize,
    pub last_index_count: usize,
}

impl Renderer for NullRenderer {
    fn prepare(
        &mut self,
        viewport: Viewport,
        texture: &TextureImage,
        blend: BlendMode,
    ) -> ChartResult<()> {
        texture.validate()?;
        self.prepare_calls += 1;
        self.last_viewport = Some(viewport);
        self.last_blend = Some(blend);
        Ok(())
    }

    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;
        self.draw_calls += 1;
        self.last_viewport = Some(frame.viewport);
        self.last_vertex_count = frame.mesh.vertex_count();
        self.last_index_count = frame.mesh.indices.len();
        Ok(())
    }
}
