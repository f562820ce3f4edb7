mod config;
mod registry;
mod session;

pub use config::ChartConfig;
pub use registry::{CanvasId, ChartRegistry};
pub use session::{ChartSession, LINE_WIDTH_TEXTURE_FACTOR, TEXTURE_X_SCALE_FACTOR};
