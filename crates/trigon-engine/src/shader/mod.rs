//! Shader loading.
//!
//! Shaders are read from `<base>/shaders/<Name><ext>`; the stage comes from the
//! name (`.vert` / `.frag`) and the encoding from what the device accepts.

pub(crate) mod compile;
mod error;
mod format;
mod loader;
mod stage;

pub use error::ShaderError;
pub use format::{ShaderFormat, ShaderFormats, UnknownShaderFormat};
pub use loader::{ResourceCounts, ShaderLoader};
pub use stage::ShaderStage;
