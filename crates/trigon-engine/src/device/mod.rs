//! GPU device + surface management.
//!
//! This module is responsible for:
//! - the [`Backend`] trait the chapters are written against
//! - the wgpu implementation ([`Gpu`]): device, swapchain, shaders, buffers
//! - a recording backend for tests (feature `testing`)

mod backend;
mod error;
mod gpu;
mod init;
mod surface;

#[cfg(any(test, feature = "testing"))]
pub mod mock;

pub use backend::{
    Backend, BufferDesc, DrawCall, PipelineDesc, Rasterizer, ShaderDesc, VertexInput,
};
pub use error::{BufferKind, GpuError, SurfaceErrorAction};
pub use gpu::{Gpu, GpuShader, StagingBuffer, SurfaceImage};
pub use init::GpuInit;
