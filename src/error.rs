use thiserror::Error;

use crate::api::CanvasId;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("x and y series differ in length: x={x_len}, y={y_len}")]
    MismatchedSeries { x_len: usize, y_len: usize },

    #[error("at least 2 samples are required, got {len}")]
    InsufficientSamples { len: usize },

    #[error("failed to load texture `{url}`: {reason}")]
    TextureLoad { url: String, reason: String },

    #[error("render backend error: {0}")]
    Backend(String),

    #[error("no chart session for canvas {0}")]
    UnknownCanvas(CanvasId),
}
