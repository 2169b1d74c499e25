//! Clears the window to a solid color every frame.

use trigon_engine::core::{App, AppResult, InitCtx};
use trigon_engine::device::Backend;
use trigon_engine::render::{render_frame, CLEAR_COLOR};

pub struct ClearScreen;

impl<B: Backend> App<B> for ClearScreen {
    fn init(_ctx: InitCtx<'_, B>) -> anyhow::Result<Self> {
        Ok(Self)
    }

    fn iterate(&mut self, backend: &mut B) -> AppResult {
        render_frame(backend, CLEAR_COLOR, None)
    }
}
