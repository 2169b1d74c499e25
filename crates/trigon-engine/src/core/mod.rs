//! Core engine-facing contracts.
//!
//! This module defines the interface between the runtime (platform loop) and
//! the chapters: the four lifecycle callbacks an application implements, and
//! the state machine that decides when each one may run.

mod app;
mod lifecycle;

pub use app::{App, AppEvent, AppResult, InitCtx};
pub use lifecycle::Lifecycle;
