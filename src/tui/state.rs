//! TUI application state.
//!
//! Engine state (filters, sort, page, selection, edit target) lives in
//! [`GridEngine`]; this module holds only presentation concerns: cursor
//! position, input mode, popups, and the status line.

use std::path::PathBuf;
use std::time::Instant;

use ratatui::layout::Rect;

use crate::engine::GridEngine;
use crate::model::Field;
use crate::view::GRID_COLUMNS;

/// Input mode for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Typing into a column filter.
    Filter,
    /// Typing into the open edit target.
    Edit,
}

/// Active popup. Only one popup can be open at a time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PopupState {
    #[default]
    None,
    Help {
        scroll: usize,
    },
    QuitConfirm,
    /// Expanded detail view for one record.
    Detail {
        id: u64,
        scroll: usize,
    },
}

impl PopupState {
    pub fn is_open(&self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Complete TUI state: the engine plus presentation-only fields.
pub struct AppState {
    pub engine: GridEngine,
    pub input_mode: InputMode,
    pub popup: PopupState,
    /// Row cursor within the current page.
    pub cursor: usize,
    /// Column cursor over [`GRID_COLUMNS`].
    pub cursor_col: usize,
    /// Target column while in filter mode.
    pub filter_field: Field,
    /// Status-line notice or warning.
    pub status: Option<String>,
    /// Where the `x` key writes the CSV export.
    pub export_path: PathBuf,
    /// Table body area from the last render, for mouse hit-testing.
    pub table_area: Option<Rect>,
    /// Last left-click, for double-click detection.
    pub last_click: Option<(Instant, usize, usize)>,
}

impl AppState {
    pub fn new(engine: GridEngine, export_path: PathBuf) -> Self {
        Self {
            engine,
            input_mode: InputMode::default(),
            popup: PopupState::default(),
            cursor: 0,
            cursor_col: 0,
            filter_field: Field::Name,
            status: None,
            export_path,
            table_area: None,
            last_click: None,
        }
    }

    /// Keeps the cursor inside the current page.
    pub fn clamp_cursor(&mut self) {
        let rows = self.engine.compute_view().rows.len();
        if rows == 0 {
            self.cursor = 0;
        } else if self.cursor >= rows {
            self.cursor = rows - 1;
        }
    }

    /// Record id under the cursor, if the page is non-empty.
    pub fn cursor_id(&self) -> Option<u64> {
        self.engine
            .compute_view()
            .rows
            .get(self.cursor)
            .map(|rec| rec.id)
    }

    /// Column under the column cursor.
    pub fn cursor_field(&self) -> Field {
        GRID_COLUMNS
            .get(self.cursor_col)
            .copied()
            .unwrap_or(Field::Name)
    }

    pub fn notify(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }
}
