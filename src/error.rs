use thiserror::Error;

/// Every fallible operation in this crate reports through this enum.
#[derive(Error, Debug)]
pub enum RenderingError {
    #[error("coordinate component {value} out of range [0, 1]")]
    InvalidCoordinate { value: f64 },

    #[error("expected {expected} axis values, got {got}")]
    AxisCountMismatch { expected: usize, got: usize },

    #[error("axis value {value} out of range [{min}, {max}] for axis '{axis}'")]
    AxisValueOutOfRange {
        axis: String,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("no suitable GPU adapter found")]
    UnsupportedGpu,

    #[error("failed to request GPU device")]
    RequestDeviceFailed(#[from] wgpu::RequestDeviceError),

    #[error("shader compilation failed: {0}")]
    ShaderCompileError(String),

    #[error("shader program link failed: {0}")]
    ProgramLinkError(String),

    #[error("framebuffer incomplete: {0}")]
    FramebufferIncomplete(String),

    #[error("palette has {0} entries, exceeding the maximum of {max}", max = crate::palette::MAX_PALETTE_COLORS)]
    PaletteTooLarge(usize),

    #[error("timed out waiting for buffer map callback")]
    BufferMapWaitingFailed,

    #[error("buffer map failed")]
    BufferMapFailed(#[from] wgpu::BufferAsyncError),
}
