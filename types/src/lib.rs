//! Core domain types for the FitSyn shell.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the application: the engine owns
//! state built from these types, the TUI renders them.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory
#![allow(clippy::missing_panics_doc)] // Panics are documented in assertions

mod auth;
mod frame;
pub mod menu;
mod module;
mod route;
mod sanitize;
mod secret;
mod session;
mod theme;
pub mod ui;

pub use auth::{AuthError, AuthErrorKind, AuthFlow};
pub use frame::{Capability, FrameLifecycle, FramePolicy, MODULE_FRAME_POLICY, SandboxFlag};
pub use menu::{MenuAction, MenuItem, MenuView, ProfileCard};
pub use module::{MODULES, ModuleDescriptor};
pub use route::Route;
pub use sanitize::sanitize_terminal_text;
pub use secret::SecretString;
pub use session::{Session, SessionState, UserId};
pub use theme::{Theme, ThemeParseError};
