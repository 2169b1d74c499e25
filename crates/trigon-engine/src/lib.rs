//! Trigon engine crate.
//!
//! The window, device and per-frame plumbing shared by the tutorial
//! chapters: a [`Backend`](device::Backend) seam over wgpu, a shader loader
//! backed by naga, pipeline and vertex-buffer helpers, and a lifecycle driver
//! hosted by a winit event loop.

pub mod buffer;
pub mod core;
pub mod device;
pub mod logging;
pub mod pipeline;
pub mod render;
pub mod shader;
pub mod window;
