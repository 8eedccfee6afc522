pub mod display;
pub mod field;
pub mod oracle;
pub mod wireframe;

pub use display::{DisplayPipeline, DisplayUniforms};
pub use field::{FieldPipeline, FieldUniforms};
pub use oracle::{padded_bytes_per_row, read_framebuffer, PixelOracle};
pub use wireframe::{WireframePipeline, WireframeUniforms};
