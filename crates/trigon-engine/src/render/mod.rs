//! Per-frame rendering.
//!
//! One command buffer per frame, one render pass per acquired image, at most
//! one draw call per pass.

mod frame;

pub use frame::{render_frame, CLEAR_COLOR};
