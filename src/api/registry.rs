use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::{ChartConfig, ChartSession};
use crate::core::{SampleSeries, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::render::{Renderer, TextureImage, TextureLoader, TextureRequest, spawn_texture_load};

/// Caller-chosen identity of one canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CanvasId(pub u64);

impl fmt::Display for CanvasId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "canvas#{}", self.0)
    }
}

/// Canvas-keyed chart sessions with an explicit create/destroy lifecycle.
///
/// Sessions for different canvases are independent; calls against one canvas
/// are expected to be issued sequentially by the caller.
pub struct ChartRegistry<R: Renderer> {
    loader: Arc<dyn TextureLoader>,
    sessions: IndexMap<CanvasId, ChartSession<R>>,
}

impl<R: Renderer> ChartRegistry<R> {
    #[must_use]
    pub fn new(loader: Arc<dyn TextureLoader>) -> Self {
        Self {
            loader,
            sessions: IndexMap::new(),
        }
    }

    /// Renders `y_data` on `canvas`, creating its session on first use.
    ///
    /// First use loads the texture (gating the first draw) and builds the
    /// backend through `create_backend`. Later calls with the same viewport
    /// reuse the session and only reload the texture when `config.texture_url`
    /// changed; a different viewport replaces the session and its backend.
    /// The returned session's `update` re-renders without repeating that setup.
    pub fn render_chart<F>(
        &mut self,
        canvas: CanvasId,
        viewport: Viewport,
        y_data: &[f64],
        x_data: Option<&[f64]>,
        config: ChartConfig,
        create_backend: F,
    ) -> ChartResult<&mut ChartSession<R>>
    where
        F: FnOnce(Viewport) -> ChartResult<R>,
    {
        let series = SampleSeries::new(y_data, x_data)?;
        config.validate()?;
        let loader = Arc::clone(&self.loader);

        if self
            .sessions
            .get(&canvas)
            .is_some_and(|session| session.viewport() != viewport)
        {
            info!(
                %canvas,
                width = viewport.width,
                height = viewport.height,
                "viewport changed, rebuilding chart session"
            );
            self.destroy(canvas);
        }

        if self.sessions.contains_key(&canvas) {
            let session = self.session_mut(canvas)?;
            if session.config().texture_url != config.texture_url {
                session.set_texture(load_texture(loader, &config)?)?;
            }
            session.set_config(config)?;
            session.render_series(&series)?;
            return Ok(session);
        }

        let texture = load_texture(loader, &config)?;
        let renderer = create_backend(viewport)?;
        let mut session = ChartSession::new(canvas, renderer, viewport, texture, config)?;
        session.render_series(&series)?;
        self.sessions.insert(canvas, session);
        self.session_mut(canvas)
    }

    /// Re-renders an existing canvas with new samples.
    pub fn update(
        &mut self,
        canvas: CanvasId,
        y_data: &[f64],
        x_data: Option<&[f64]>,
    ) -> ChartResult<()> {
        self.session_mut(canvas)?.update(y_data, x_data)
    }

    pub fn session(&self, canvas: CanvasId) -> ChartResult<&ChartSession<R>> {
        self.sessions
            .get(&canvas)
            .ok_or(ChartError::UnknownCanvas(canvas))
    }

    pub fn session_mut(&mut self, canvas: CanvasId) -> ChartResult<&mut ChartSession<R>> {
        self.sessions
            .get_mut(&canvas)
            .ok_or(ChartError::UnknownCanvas(canvas))
    }

    /// Removes the session for a discarded canvas, handing it back.
    pub fn destroy(&mut self, canvas: CanvasId) -> Option<ChartSession<R>> {
        let session = self.sessions.shift_remove(&canvas)?;
        info!(%canvas, renders = session.render_count(), "chart session destroyed");
        Some(session)
    }

    #[must_use]
    pub fn contains(&self, canvas: CanvasId) -> bool {
        self.sessions.contains_key(&canvas)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn canvases(&self) -> impl Iterator<Item = CanvasId> + '_ {
        self.sessions.keys().copied()
    }
}

fn load_texture(
    loader: Arc<dyn TextureLoader>,
    config: &ChartConfig,
) -> ChartResult<Arc<TextureImage>> {
    let request = TextureRequest::new(config.texture_url.as_str(), config.page_origin.as_deref());
    spawn_texture_load(loader, request).wait()
}
