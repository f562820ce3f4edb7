//! yarn-chart: line charts drawn as a textured yarn strand.
//!
//! The crate turns an x/y sample series into a textured triangle mesh
//! (normalize, fit cubic Bezier handles, extrude a constant-width ribbon with
//! arc-length texture coordinates) and hands it to a pluggable backend. In
//! tangle mode, runs of high-magnitude samples become spiral coils instead of
//! sharp peaks.

pub mod api;
pub mod core;
pub mod error;
pub mod render;
pub mod telemetry;

pub use api::{CanvasId, ChartConfig, ChartRegistry, ChartSession};
pub use error::{ChartError, ChartResult};
