//! UI state types shared by the engine and the TUI.
//!
//! Pure data types with no IO, no async, no ratatui dependency.

mod animation;
mod options;
mod region;

pub use animation::{AnimPhase, EffectTimer};
pub use options::UiOptions;
pub use region::Region;
