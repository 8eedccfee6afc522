pub mod color;
mod diagnostics;
mod error;
pub mod geometry;
mod gpu;
pub mod palette;
mod render;
mod request;
mod orchestrator;

pub use color::{HslColor, HsvColor, RgbColor};
pub use diagnostics::RenderDiagnostic;
pub use error::RenderingError;
pub use gpu::GpuContext;
pub use orchestrator::{Orchestrator, RenderStats};
pub use palette::{DistanceMetric, NamedColor, Palette};
pub use request::{AxisSlice, HighlightMode, RenderMode, RenderRequest};
