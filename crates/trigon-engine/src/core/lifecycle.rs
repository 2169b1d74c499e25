use crate::device::Backend;
use crate::shader::ShaderLoader;

use super::{App, AppEvent, AppResult, InitCtx};

enum Phase<B, A> {
    /// `init` has not run yet.
    Pending,
    /// Field order is drop order: the app's resources go before the device.
    Running { app: A, backend: B },
    Finished(AppResult),
}

/// Drives an [`App`] through init, events, frames and shutdown.
///
/// Callbacks are only forwarded while the lifecycle is running. The first
/// terminal result shuts the app down; after that every call returns the
/// stored result without touching the app.
pub struct Lifecycle<B: Backend, A: App<B>> {
    phase: Phase<B, A>,
    shaders: ShaderLoader,
}

impl<B: Backend, A: App<B>> Lifecycle<B, A> {
    pub fn new(shaders: ShaderLoader) -> Self {
        Self {
            phase: Phase::Pending,
            shaders,
        }
    }

    /// Creates the backend with `create_backend`, then the app.
    ///
    /// The app is never initialized if the backend can't be created. On any
    /// failure whatever was created is released and the lifecycle finishes
    /// with [`AppResult::Failure`].
    pub fn init<F>(&mut self, create_backend: F) -> AppResult
    where
        F: FnOnce() -> anyhow::Result<B>,
    {
        if !matches!(self.phase, Phase::Pending) {
            log::warn!("lifecycle already initialized");
            return self.result();
        }

        let backend = match create_backend() {
            Ok(backend) => backend,
            Err(e) => return self.fail_init(e),
        };

        let app = A::init(InitCtx {
            backend: &backend,
            shaders: &self.shaders,
        });

        match app {
            Ok(app) => {
                log::info!("application initialized");
                self.phase = Phase::Running { app, backend };
                AppResult::Continue
            }
            Err(e) => {
                drop(backend);
                self.fail_init(e)
            }
        }
    }

    fn fail_init(&mut self, error: anyhow::Error) -> AppResult {
        log::error!("initialization failed: {error:#}");
        self.shutdown(AppResult::Failure)
    }

    /// Forwards `event` to the app.
    pub fn event(&mut self, event: &AppEvent) -> AppResult {
        let result = match &mut self.phase {
            Phase::Running { app, .. } => app.event(event),
            _ => return self.result(),
        };
        if result.is_terminal() {
            self.shutdown(result);
        }
        result
    }

    /// Runs one frame.
    pub fn iterate(&mut self) -> AppResult {
        let result = match &mut self.phase {
            Phase::Running { app, backend } => app.iterate(backend),
            _ => return self.result(),
        };
        if result.is_terminal() {
            self.shutdown(result);
        }
        result
    }

    /// Quits the app and releases its resources, then the backend.
    ///
    /// Only the first call has any effect; later calls return the result the
    /// lifecycle finished with.
    pub fn shutdown(&mut self, result: AppResult) -> AppResult {
        if let Phase::Finished(done) = self.phase {
            return done;
        }

        let phase = std::mem::replace(&mut self.phase, Phase::Finished(result));

        match result {
            AppResult::Failure => log::error!("application quit with an error"),
            _ => log::info!("application quit successfully"),
        }

        if let Phase::Running { mut app, backend } = phase {
            app.quit(result);
            drop(app);
            drop(backend);
        }

        result
    }

    /// `Continue` while pending or running, the terminal result afterwards.
    pub fn result(&self) -> AppResult {
        match self.phase {
            Phase::Finished(result) => result,
            _ => AppResult::Continue,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Running { .. })
    }

    pub fn backend(&self) -> Option<&B> {
        match &self.phase {
            Phase::Running { backend, .. } => Some(backend),
            _ => None,
        }
    }

    pub fn backend_mut(&mut self) -> Option<&mut B> {
        match &mut self.phase {
            Phase::Running { backend, .. } => Some(backend),
            _ => None,
        }
    }
}

impl<B: Backend, A: App<B>> Drop for Lifecycle<B, A> {
    fn drop(&mut self) {
        if self.is_running() {
            self.shutdown(AppResult::Success);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::mock::{Journal, MockBackend, MockOp, MockResource};
    use crate::device::BufferDesc;
    use anyhow::Context;
    use pretty_assertions::assert_eq;

    /// Holds one buffer and records its callbacks.
    struct Recorder {
        _buffer: MockResource,
        journal: Journal,
        frames_left: Option<u32>,
    }

    impl App<MockBackend> for Recorder {
        fn init(ctx: InitCtx<'_, MockBackend>) -> anyhow::Result<Self> {
            let journal = ctx.backend.journal();
            journal.push("app init");
            let buffer = ctx
                .backend
                .create_buffer(&BufferDesc {
                    label: "app",
                    size: 36,
                })
                .context("couldn't create vertex buffer")?;
            Ok(Self {
                _buffer: buffer,
                journal,
                frames_left: None,
            })
        }

        fn iterate(&mut self, _backend: &mut MockBackend) -> AppResult {
            self.journal.push("app iterate");
            match &mut self.frames_left {
                Some(0) => AppResult::Failure,
                Some(n) => {
                    *n -= 1;
                    AppResult::Continue
                }
                None => AppResult::Continue,
            }
        }

        fn quit(&mut self, result: AppResult) {
            self.journal.push(format!("app quit {result:?}"));
        }
    }

    fn lifecycle() -> Lifecycle<MockBackend, Recorder> {
        Lifecycle::new(ShaderLoader::new("/nonexistent"))
    }

    #[test]
    fn quit_event_releases_in_reverse_creation_order() {
        let backend = MockBackend::new();
        let journal = backend.journal();
        let mut lc = lifecycle();

        assert_eq!(lc.init(|| Ok(backend)), AppResult::Continue);
        assert_eq!(lc.iterate(), AppResult::Continue);
        assert_eq!(lc.event(&AppEvent::Other), AppResult::Continue);
        assert_eq!(lc.event(&AppEvent::Quit), AppResult::Success);

        assert_eq!(
            journal.entries(),
            [
                "app init",
                "create buffer app 36",
                "app iterate",
                "app quit Success",
                "release buffer app",
                "release surface",
                "destroy window",
                "destroy device",
            ]
        );
        assert!(!lc.is_running());
        assert_eq!(lc.result(), AppResult::Success);
    }

    #[test]
    fn nothing_reaches_the_app_after_shutdown() {
        let backend = MockBackend::new();
        let journal = backend.journal();
        let mut lc = lifecycle();

        lc.init(|| Ok(backend));
        lc.event(&AppEvent::Quit);
        let before = journal.entries().len();

        assert_eq!(lc.iterate(), AppResult::Success);
        assert_eq!(lc.event(&AppEvent::Quit), AppResult::Success);
        assert_eq!(lc.shutdown(AppResult::Failure), AppResult::Success);
        drop(lc);

        assert_eq!(journal.entries().len(), before);
    }

    #[test]
    fn failing_frame_shuts_down_with_failure() {
        let backend = MockBackend::new();
        let journal = backend.journal();
        let mut lc = lifecycle();

        lc.init(|| Ok(backend));
        if let Phase::Running { app, .. } = &mut lc.phase {
            app.frames_left = Some(1);
        }

        assert_eq!(lc.iterate(), AppResult::Continue);
        assert_eq!(lc.iterate(), AppResult::Failure);
        assert_eq!(lc.result(), AppResult::Failure);
        assert_eq!(journal.filtered("app quit"), ["app quit Failure"]);
        assert!(journal.contains("destroy device"));
    }

    #[test]
    fn backend_failure_skips_app_init() {
        let mut lc = lifecycle();

        let result = lc.init(|| Err(anyhow::anyhow!("couldn't create window")));

        assert_eq!(result, AppResult::Failure);
        assert_eq!(lc.result(), AppResult::Failure);
        assert!(lc.backend().is_none());
    }

    #[test]
    fn app_init_failure_releases_backend() {
        let backend = MockBackend::new().failing(MockOp::CreateBuffer);
        let journal = backend.journal();
        let mut lc = lifecycle();

        assert_eq!(lc.init(|| Ok(backend)), AppResult::Failure);
        assert_eq!(
            journal.entries(),
            [
                "app init",
                "create buffer app 36",
                "fail CreateBuffer",
                "release surface",
                "destroy window",
                "destroy device",
            ]
        );
        assert_eq!(lc.iterate(), AppResult::Failure);
    }

    #[test]
    fn dropping_a_running_lifecycle_quits_successfully() {
        let backend = MockBackend::new();
        let journal = backend.journal();
        let mut lc = lifecycle();
        lc.init(|| Ok(backend));

        drop(lc);

        assert_eq!(journal.filtered("app quit"), ["app quit Success"]);
        assert_eq!(journal.filtered("destroy"), ["destroy window", "destroy device"]);
    }
}
