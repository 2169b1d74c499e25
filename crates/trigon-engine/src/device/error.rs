use std::fmt;

/// High-level response after a surface error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; rendering may resume next frame.
    Reconfigured,
    /// Transient error; skip the current frame.
    SkipFrame,
    /// Fatal error (commonly OOM); terminate gracefully.
    Fatal,
}

/// Failure reported by a [`Backend`](super::Backend) operation.
#[derive(Debug, thiserror::Error)]
pub enum GpuError {
    #[error("shader rejected by backend: {0}")]
    ShaderCompile(String),

    #[error("graphics pipeline rejected: {0}")]
    Pipeline(String),

    #[error("invalid {kind} buffer size {size} (device limit {limit})")]
    BufferSize {
        kind: BufferKind,
        size: u64,
        limit: u64,
    },

    #[error("transfer buffer holds {capacity} bytes, {requested} requested")]
    TransferOverflow { capacity: u64, requested: u64 },

    #[error("nothing to upload")]
    EmptyUpload,

    #[error("couldn't acquire command buffer: {0}")]
    CommandBuffer(String),

    #[error("couldn't acquire swapchain texture: {0}")]
    Surface(#[from] wgpu::SurfaceError),

    /// Error surfaced by a non-wgpu backend.
    #[error("{0}")]
    Backend(String),
}

/// Buffer category, used in error messages.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BufferKind {
    Vertex,
    Transfer,
}

impl fmt::Display for BufferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BufferKind::Vertex => f.write_str("vertex"),
            BufferKind::Transfer => f.write_str("transfer"),
        }
    }
}
