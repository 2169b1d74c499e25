use std::sync::Arc;

use anyhow::{Context, Result};

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App, AppEvent, AppResult, Lifecycle};
use crate::device::{Gpu, GpuInit};
use crate::shader::ShaderLoader;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    pub resizable: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "Hello, wgpu!".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
            resizable: false,
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens one window, runs `A` in it until it finishes, and returns the
    /// result it finished with.
    ///
    /// The app and the device are always released before this returns.
    pub fn run<A>(
        config: RuntimeConfig,
        gpu_init: GpuInit,
        shaders: ShaderLoader,
    ) -> Result<AppResult>
    where
        A: App<Gpu> + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut host = Host::<A>::new(config, gpu_init, shaders);

        event_loop
            .run_app(&mut host)
            .context("winit event loop terminated with error")?;

        Ok(host.lifecycle.shutdown(AppResult::Success))
    }
}

struct Host<A>
where
    A: App<Gpu>,
{
    config: RuntimeConfig,
    gpu_init: GpuInit,
    lifecycle: Lifecycle<Gpu, A>,
    started: bool,
}

impl<A> Host<A>
where
    A: App<Gpu>,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, shaders: ShaderLoader) -> Self {
        Self {
            config,
            gpu_init,
            lifecycle: Lifecycle::new(shaders),
            started: false,
        }
    }

    fn window(&self) -> Option<&Window> {
        self.lifecycle.backend().map(Gpu::window)
    }

    fn exit_if_finished(&self, event_loop: &ActiveEventLoop) -> bool {
        let finished = self.lifecycle.result().is_terminal();
        if finished {
            event_loop.exit();
        }
        finished
    }
}

impl<A> ApplicationHandler for Host<A>
where
    A: App<Gpu>,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.started {
            return;
        }
        self.started = true;

        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size)
            .with_resizable(self.config.resizable);
        let gpu_init = self.gpu_init.clone();

        self.lifecycle.init(|| {
            let window = event_loop
                .create_window(attrs)
                .context("couldn't create window")?;
            pollster::block_on(Gpu::new(Arc::new(window), gpu_init))
        });

        if self.exit_if_finished(event_loop) {
            return;
        }

        if let Some(window) = self.window() {
            window.request_redraw();
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_if_finished(event_loop) {
            return;
        }

        // Continuous redraw.
        if let Some(window) = self.window() {
            window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_if_finished(event_loop) {
            return;
        }

        match &event {
            WindowEvent::RedrawRequested => {
                self.lifecycle.iterate();
            }

            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = self.lifecycle.backend_mut() {
                    gpu.resize(*new_size);
                }
                self.lifecycle.event(&resized(*new_size));
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                let Some(gpu) = self.lifecycle.backend_mut() else {
                    return;
                };
                let new_size = gpu.window().inner_size();
                gpu.resize(new_size);
                self.lifecycle.event(&resized(new_size));
            }

            other => {
                self.lifecycle.event(&translate_event(other));
            }
        }

        self.exit_if_finished(event_loop);
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        // Release the device while the event loop's display connection is still alive.
        self.lifecycle.shutdown(AppResult::Success);
    }
}

fn resized(size: PhysicalSize<u32>) -> AppEvent {
    AppEvent::Resized {
        width: size.width,
        height: size.height,
    }
}

/// Maps events the runtime doesn't handle itself.
fn translate_event(event: &WindowEvent) -> AppEvent {
    match event {
        WindowEvent::CloseRequested | WindowEvent::Destroyed => AppEvent::Quit,
        WindowEvent::Resized(size) => resized(*size),
        _ => AppEvent::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_request_is_quit() {
        assert_eq!(translate_event(&WindowEvent::CloseRequested), AppEvent::Quit);
    }

    #[test]
    fn resize_carries_physical_size() {
        let event = WindowEvent::Resized(PhysicalSize::new(800, 600));
        assert_eq!(
            translate_event(&event),
            AppEvent::Resized {
                width: 800,
                height: 600
            }
        );
    }

    #[test]
    fn unhandled_events_are_other() {
        assert_eq!(translate_event(&WindowEvent::Focused(true)), AppEvent::Other);
    }

    #[test]
    fn default_window_matches_the_tutorial() {
        let config = RuntimeConfig::default();
        assert_eq!(config.title, "Hello, wgpu!");
        assert_eq!(config.initial_size, LogicalSize::new(1280.0, 720.0));
        assert!(!config.resizable);
    }
}
