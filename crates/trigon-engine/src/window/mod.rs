//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and drives a [`Lifecycle`](crate::core::Lifecycle)
//! backed by the wgpu device.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
