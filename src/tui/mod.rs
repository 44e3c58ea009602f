//! Terminal user interface for the employee grid.
//!
//! The TUI is a rendering collaborator: it consumes the engine's projection
//! and view models, and routes every raw input event back through engine
//! mutators. It never mutates records directly.

mod app;
mod event;
mod input;
mod render;
mod state;
mod style;
mod widgets;

pub use app::App;
pub use state::{AppState, InputMode, PopupState};
