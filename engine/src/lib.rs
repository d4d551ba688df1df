//! Core engine for the FitSyn shell - state machines and orchestration.
//!
//! This crate contains the [`App`] state machine without TUI dependencies.
//! Each ambient concern (session, theme, sound) lives in its own module and
//! owns exactly one piece of state; the app composes them and is the only
//! thing that mutates them.

mod app;
pub mod forms;
pub mod frame;
pub mod header;
pub mod hit;
pub mod home;
pub mod menu;
pub mod notifications;
pub mod router;
pub mod session;
pub mod settings;
pub mod sound;
pub mod splash;
pub mod storage;
pub mod theme;

pub use app::{App, AppParts, Command, NotFoundFocus};

pub use fitsyn_config::{ShellConfig, Timings};
pub use fitsyn_types::{
    AuthErrorKind, AuthFlow, FrameLifecycle, MODULES, MenuAction, MenuItem, MenuView,
    ModuleDescriptor, Route, Session, SessionState, Theme,
};
