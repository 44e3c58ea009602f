//! UI-agnostic view models and display hints.
//!
//! These types carry presentation data without depending on a rendering
//! framework. The TUI maps them to ratatui styles; a different frontend
//! would map them to CSS classes. The chip mapping is a pure function of
//! field + value and carries no state.

use crate::engine::{GridEngine, SortDir};
use crate::model::Field;

/// Display-hint classification for a role/department chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChipClass {
    Blue,
    Red,
    Green,
    Yellow,
    Purple,
    Teal,
    Violet,
    Rose,
    #[default]
    Gray,
}

/// Maps a field value to its chip class. Unknown values fall back to gray.
pub fn chip_class(field: Field, value: &str) -> ChipClass {
    match field {
        Field::Role => match value {
            "Product Manager" => ChipClass::Blue,
            "Data Analyst" => ChipClass::Red,
            "Developer" => ChipClass::Green,
            "Designer" => ChipClass::Yellow,
            "QA Engineer" => ChipClass::Purple,
            _ => ChipClass::Gray,
        },
        Field::Department => match value {
            "Engineering" => ChipClass::Blue,
            "Quality" => ChipClass::Rose,
            "Data" => ChipClass::Teal,
            "Product" => ChipClass::Violet,
            "Design" => ChipClass::Yellow,
            _ => ChipClass::Gray,
        },
        _ => ChipClass::Gray,
    }
}

/// A single table cell with an optional chip hint.
#[derive(Debug, Clone, Default)]
pub struct ViewCell {
    pub text: String,
    /// `None` = plain text, no chip.
    pub chip: Option<ChipClass>,
    /// The cell is currently open for editing; `text` is the edit buffer.
    pub editing: bool,
}

impl ViewCell {
    pub fn plain(text: String) -> Self {
        Self {
            text,
            ..Self::default()
        }
    }

    pub fn chip(text: String, class: ChipClass) -> Self {
        Self {
            text,
            chip: Some(class),
            editing: false,
        }
    }
}

/// One grid row keyed by record id.
#[derive(Debug, Clone)]
pub struct ViewRow {
    pub id: u64,
    pub selected: bool,
    pub cells: Vec<ViewCell>,
}

/// Complete grid page ready to be rendered by any frontend.
#[derive(Debug, Clone)]
pub struct GridViewModel {
    pub headers: Vec<String>,
    pub rows: Vec<ViewRow>,
    pub page: usize,
    pub total_pages: usize,
    pub visible_count: usize,
    pub selected_count: usize,
    pub all_on_page_selected: bool,
    pub sort: Option<(Field, SortDir)>,
}

/// Data columns shown in the grid, in order. The selection checkbox column
/// is the renderer's concern.
pub const GRID_COLUMNS: [Field; 6] = [
    Field::Name,
    Field::Email,
    Field::Role,
    Field::Department,
    Field::Location,
    Field::JoinedDate,
];

/// Builds the renderable page from the engine's current projection.
pub fn build_grid_view(engine: &GridEngine) -> GridViewModel {
    let view = engine.compute_view();
    let state = engine.state();

    let headers = GRID_COLUMNS
        .iter()
        .map(|f| f.label().to_string())
        .collect();

    let rows = view
        .rows
        .iter()
        .enumerate()
        .map(|(row_idx, rec)| {
            let cells = GRID_COLUMNS
                .iter()
                .map(|&field| {
                    if let Some(edit) = &state.edit {
                        if edit.id == rec.id && edit.field == field {
                            return ViewCell {
                                text: edit.buffer.clone(),
                                chip: None,
                                editing: true,
                            };
                        }
                    }
                    let text = match field {
                        Field::JoinedDate => rec
                            .joined_day()
                            .map(|d| d.to_string())
                            .unwrap_or_default(),
                        _ => rec.value_of(field).to_string(),
                    };
                    match field {
                        Field::Role | Field::Department => {
                            let class = chip_class(field, &text);
                            ViewCell::chip(text, class)
                        }
                        _ => ViewCell::plain(text),
                    }
                })
                .collect();
            ViewRow {
                id: rec.id,
                selected: engine.is_row_selected(row_idx),
                cells,
            }
        })
        .collect();

    GridViewModel {
        headers,
        rows,
        page: view.page,
        total_pages: view.total_pages,
        visible_count: view.visible_count,
        selected_count: state.selected.len(),
        all_on_page_selected: engine.page_fully_selected(),
        sort: state.sort,
    }
}
