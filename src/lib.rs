//! staffgrid - Employee grid viewer and editor library.
//!
//! The core is the record view-state engine in [`engine`]: a pure
//! filtered → sorted → paginated projection over an in-memory employee
//! collection, plus the mutators (filters, sort, selection, bulk deletion,
//! in-place edits, CSV export) the `staffgrid` TUI routes input through.

pub mod engine;
pub mod export;
pub mod model;
pub mod tui;
pub mod view;
