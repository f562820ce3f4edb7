use std::sync::Arc;

use crate::core::{MeshBuffers, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::render::{BlendMode, TextureImage};

/// Backend-agnostic payload for one draw pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub viewport: Viewport,
    pub mesh: MeshBuffers,
    pub texture: Arc<TextureImage>,
    pub blend: BlendMode,
}

impl RenderFrame {
    #[must_use]
    pub fn new(viewport: Viewport, mesh: MeshBuffers, texture: Arc<TextureImage>) -> Self {
        Self {
            viewport,
            mesh,
            texture,
            blend: BlendMode::default(),
        }
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }
        self.texture.validate()?;
        self.mesh.validate()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mesh.is_empty()
    }
}
