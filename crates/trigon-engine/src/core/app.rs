use std::process::ExitCode;

use crate::device::Backend;
use crate::shader::ShaderLoader;

/// Outcome of a lifecycle callback.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppResult {
    Continue,
    Success,
    Failure,
}

impl AppResult {
    /// `true` once the application should stop.
    pub fn is_terminal(self) -> bool {
        !matches!(self, AppResult::Continue)
    }

    pub fn exit_code(self) -> ExitCode {
        match self {
            AppResult::Continue | AppResult::Success => ExitCode::SUCCESS,
            AppResult::Failure => ExitCode::FAILURE,
        }
    }
}

/// Platform event, reduced to what applications care about.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppEvent {
    /// The user asked to close the window.
    Quit,
    /// The drawable area changed; the swapchain has already been reconfigured.
    Resized { width: u32, height: u32 },
    Other,
}

impl AppEvent {
    /// What an application that does not handle events returns.
    pub fn outcome(&self) -> AppResult {
        match self {
            AppEvent::Quit => AppResult::Success,
            _ => AppResult::Continue,
        }
    }
}

/// What `App::init` gets to work with.
pub struct InitCtx<'a, B: Backend> {
    pub backend: &'a B,
    pub shaders: &'a ShaderLoader,
}

/// Application contract implemented by the chapters.
///
/// The app owns every GPU resource it creates; they are released when the
/// app is dropped, which always happens before the backend is dropped.
pub trait App<B: Backend>: Sized {
    /// Creates pipelines and buffers. An error aborts startup.
    fn init(ctx: InitCtx<'_, B>) -> anyhow::Result<Self>;

    /// Called for every platform event.
    fn event(&mut self, event: &AppEvent) -> AppResult {
        event.outcome()
    }

    /// Called once per frame.
    fn iterate(&mut self, backend: &mut B) -> AppResult;

    /// Called once, before the app's resources are released.
    fn quit(&mut self, result: AppResult) {
        let _ = result;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_continue_is_non_terminal() {
        assert!(!AppResult::Continue.is_terminal());
        assert!(AppResult::Success.is_terminal());
        assert!(AppResult::Failure.is_terminal());
    }

    #[test]
    fn only_quit_ends_the_app_by_default() {
        assert_eq!(AppEvent::Quit.outcome(), AppResult::Success);
        assert_eq!(
            AppEvent::Resized {
                width: 0,
                height: 0
            }
            .outcome(),
            AppResult::Continue
        );
        assert_eq!(AppEvent::Other.outcome(), AppResult::Continue);
    }
}
