//! Graphics pipeline construction.

mod builder;
mod vertex;

pub use builder::{build_pipeline, PipelineError, PipelineSpec};
pub use vertex::Position;
