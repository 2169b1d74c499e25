//! An empty window: the lifecycle callbacks and nothing else.

use trigon_engine::core::{App, AppEvent, AppResult, InitCtx};
use trigon_engine::device::Backend;

pub struct HelloWindow;

impl<B: Backend> App<B> for HelloWindow {
    fn init(ctx: InitCtx<'_, B>) -> anyhow::Result<Self> {
        log::info!("init ({})", ctx.backend.driver_name());
        Ok(Self)
    }

    fn event(&mut self, event: &AppEvent) -> AppResult {
        log::debug!("event {event:?}");
        event.outcome()
    }

    fn iterate(&mut self, _backend: &mut B) -> AppResult {
        log::trace!("iterate");
        AppResult::Continue
    }

    fn quit(&mut self, result: AppResult) {
        log::info!("quit ({result:?})");
    }
}
