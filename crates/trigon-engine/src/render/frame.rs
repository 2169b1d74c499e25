use crate::core::AppResult;
use crate::device::{Backend, DrawCall};

/// Background every chapter clears to.
pub const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.4,
    g: 0.6,
    b: 0.9,
    a: 1.0,
};

/// Records and submits one frame.
///
/// Acquires a command buffer, waits for a presentable image and, if one is
/// available, clears it and performs `draw`. The command buffer is submitted
/// whether or not an image was drawn.
///
/// Returns [`AppResult::Failure`] if either acquisition fails and
/// [`AppResult::Continue`] otherwise; a frame never ends the run successfully.
pub fn render_frame<B: Backend>(
    backend: &mut B,
    clear: wgpu::Color,
    draw: Option<DrawCall<'_, B>>,
) -> AppResult {
    let mut cmd = match backend.acquire_command_buffer() {
        Ok(cmd) => cmd,
        Err(e) => {
            log::error!("couldn't acquire GPU command buffer: {e}");
            return AppResult::Failure;
        }
    };

    let image = match backend.acquire_surface_image(&mut cmd) {
        Ok(image) => image,
        Err(e) => {
            log::error!("couldn't acquire swapchain texture: {e}");
            return AppResult::Failure;
        }
    };

    match &image {
        Some(image) => backend.render_pass(&mut cmd, image, clear, draw),
        None => log::trace!("no swapchain image this frame"),
    }

    backend.submit(cmd, image);

    AppResult::Continue
}
