use std::path::PathBuf;

use crate::device::GpuError;

/// Reasons [`ShaderLoader::load`](super::ShaderLoader::load) can fail.
///
/// Messages embed the underlying error, so these are logged and reported as a
/// single line.
#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    #[error("couldn't deduce shader stage from file name: {0}")]
    UnknownStage(String),

    #[error("couldn't find a supported shader format for backend {0}")]
    NoSupportedFormat(String),

    #[error("couldn't load shader file {}: {error}", path.display())]
    Read {
        path: PathBuf,
        error: std::io::Error,
    },

    #[error("couldn't create shader from file {}: {error}", path.display())]
    Create { path: PathBuf, error: GpuError },
}
