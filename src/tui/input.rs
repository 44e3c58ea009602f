//! Input handling and keybindings.

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::engine::EditTrigger;
use crate::model::Field;

use super::state::{AppState, InputMode, PopupState};
use super::widgets::grid::{CHECKBOX_WIDTH, COLUMN_WIDTHS};

/// Two clicks on the same cell within this window count as a double-click.
const DOUBLE_CLICK_WINDOW: Duration = Duration::from_millis(450);

/// Result of handling an input event.
#[derive(Debug, PartialEq, Eq)]
pub enum KeyAction {
    /// No action, continue.
    None,
    /// Quit the application.
    Quit,
    /// Write the CSV export to the configured path.
    Export,
}

/// Handles key input and updates state.
pub fn handle_key(state: &mut AppState, key: KeyEvent) -> KeyAction {
    match state.popup {
        PopupState::QuitConfirm => return handle_quit_confirm(state, key),
        PopupState::Help { .. } | PopupState::Detail { .. } => {
            return handle_popup_scroll(state, key);
        }
        PopupState::None => {}
    }
    match state.input_mode {
        InputMode::Normal => handle_normal_mode(state, key),
        InputMode::Filter => handle_filter_mode(state, key),
        InputMode::Edit => handle_edit_mode(state, key),
    }
}

fn handle_quit_confirm(state: &mut AppState, key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('Q') => {
            state.popup = PopupState::None;
            KeyAction::Quit
        }
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            state.popup = PopupState::None;
            KeyAction::Quit
        }
        KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
            state.popup = PopupState::None;
            KeyAction::None
        }
        _ => KeyAction::None,
    }
}

fn handle_popup_scroll(state: &mut AppState, key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => scroll_popup(state, false),
        // Clamped against content height during render.
        KeyCode::Down | KeyCode::Char('j') => scroll_popup(state, true),
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => state.popup = PopupState::None,
        _ => {}
    }
    KeyAction::None
}

fn scroll_popup(state: &mut AppState, down: bool) {
    if let PopupState::Help { scroll } | PopupState::Detail { scroll, .. } = &mut state.popup {
        *scroll = if down {
            scroll.saturating_add(1)
        } else {
            scroll.saturating_sub(1)
        };
    }
}

/// Handles keys in normal mode.
fn handle_normal_mode(state: &mut AppState, key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => {
            state.popup = PopupState::QuitConfirm;
            KeyAction::None
        }
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,

        KeyCode::Char('?') | KeyCode::F(1) => {
            state.popup = PopupState::Help { scroll: 0 };
            KeyAction::None
        }

        // Row/column cursor
        KeyCode::Up | KeyCode::Char('k') => {
            state.cursor = state.cursor.saturating_sub(1);
            KeyAction::None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            state.cursor += 1;
            state.clamp_cursor();
            KeyAction::None
        }
        KeyCode::Left | KeyCode::Char('h') => {
            state.cursor_col = state.cursor_col.saturating_sub(1);
            KeyAction::None
        }
        KeyCode::Right | KeyCode::Char('l') => {
            state.cursor_col = (state.cursor_col + 1).min(COLUMN_WIDTHS.len() - 1);
            KeyAction::None
        }

        // Pagination
        KeyCode::PageDown | KeyCode::Char('n') => {
            state.engine.next_page();
            state.cursor = 0;
            KeyAction::None
        }
        KeyCode::PageUp | KeyCode::Char('p') => {
            state.engine.prev_page();
            state.cursor = 0;
            KeyAction::None
        }

        // Selection
        KeyCode::Char(' ') => {
            state.engine.toggle_select_visible(state.cursor);
            KeyAction::None
        }
        KeyCode::Char('a') => {
            state.engine.select_all_visible();
            KeyAction::None
        }
        KeyCode::Char('A') => {
            state.engine.deselect_all_visible();
            KeyAction::None
        }

        // Bulk deletion
        KeyCode::Char('d') => {
            match state.engine.delete_selected() {
                Ok(notice) => state.notify(notice.to_string()),
                Err(err) => state.notify(err.to_string()),
            }
            state.clamp_cursor();
            KeyAction::None
        }

        // Sorting by the column under the cursor
        KeyCode::Char('s') => {
            state.engine.set_sort(state.cursor_field());
            KeyAction::None
        }

        // Filtering
        KeyCode::Char('/') => {
            state.filter_field = state.cursor_field();
            state.input_mode = InputMode::Filter;
            KeyAction::None
        }

        // Editing
        KeyCode::Char('e') => {
            let (row, col) = (state.cursor, state.cursor_col);
            begin_edit_at(state, row, col);
            KeyAction::None
        }

        // Detail popup
        KeyCode::Enter => {
            if let Some(id) = state.cursor_id() {
                state.popup = PopupState::Detail { id, scroll: 0 };
            }
            KeyAction::None
        }

        // CSV export
        KeyCode::Char('x') => KeyAction::Export,

        _ => KeyAction::None,
    }
}

/// Handles keys in filter mode: keystrokes apply the filter live.
fn handle_filter_mode(state: &mut AppState, key: KeyEvent) -> KeyAction {
    let field = state.filter_field;
    let current = state
        .engine
        .state()
        .filters
        .get(&field)
        .cloned()
        .unwrap_or_default();
    match key.code {
        KeyCode::Char(c) => {
            let mut value = current;
            value.push(c);
            state.engine.set_filter(field, &value);
            state.cursor = 0;
        }
        KeyCode::Backspace => {
            let mut value = current;
            value.pop();
            state.engine.set_filter(field, &value);
            state.cursor = 0;
        }
        KeyCode::Tab => {
            state.filter_field = field.next();
        }
        KeyCode::Enter => {
            state.input_mode = InputMode::Normal;
        }
        KeyCode::Esc => {
            // Cancel clears the constraint being typed.
            state.engine.set_filter(field, "");
            state.input_mode = InputMode::Normal;
            state.cursor = 0;
        }
        _ => {}
    }
    KeyAction::None
}

/// Handles keys in edit mode.
fn handle_edit_mode(state: &mut AppState, key: KeyEvent) -> KeyAction {
    let result = match key.code {
        KeyCode::Char(c) => state.engine.edit_input(c),
        KeyCode::Backspace => state.engine.edit_backspace(),
        KeyCode::Enter => {
            let result = state.engine.commit_edit();
            state.input_mode = InputMode::Normal;
            match result {
                Ok(Some(notice)) => {
                    state.notify(notice.to_string());
                    Ok(())
                }
                Ok(None) => Ok(()),
                Err(err) => Err(err),
            }
        }
        KeyCode::Esc => {
            state.engine.cancel_edit();
            state.input_mode = InputMode::Normal;
            Ok(())
        }
        _ => Ok(()),
    };
    if let Err(err) = result {
        state.notify(err.to_string());
        state.input_mode = InputMode::Normal;
    }
    KeyAction::None
}

/// Handles mouse input: row selection via the checkbox column and the
/// configured click-to-edit gesture.
pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent) -> KeyAction {
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) || state.popup.is_open() {
        return KeyAction::None;
    }
    let Some(area) = state.table_area else {
        return KeyAction::None;
    };
    // Data rows start below the top border and the header row.
    let top = area.y + 2;
    if mouse.row < top || mouse.column < area.x + 1 {
        return KeyAction::None;
    }
    let row = (mouse.row - top) as usize;
    if row >= state.engine.compute_view().rows.len() {
        return KeyAction::None;
    }
    let rel_x = mouse.column - area.x - 1;

    match column_at(rel_x) {
        Hit::Checkbox => {
            state.cursor = row;
            state.engine.toggle_select_visible(row);
        }
        Hit::Data(col) => {
            state.cursor = row;
            state.cursor_col = col;
            let now = Instant::now();
            let trigger = state.engine.config().edit_trigger;
            let is_double = state
                .last_click
                .is_some_and(|(when, r, c)| {
                    r == row && c == col && now.duration_since(when) <= DOUBLE_CLICK_WINDOW
                });
            state.last_click = Some((now, row, col));
            match trigger {
                EditTrigger::SingleClick => begin_edit_at(state, row, col),
                EditTrigger::DoubleClick if is_double => begin_edit_at(state, row, col),
                EditTrigger::DoubleClick => {}
            }
        }
        Hit::Outside => {}
    }
    KeyAction::None
}

enum Hit {
    Checkbox,
    Data(usize),
    Outside,
}

/// Resolves an x offset inside the table body to a column, accounting for
/// the one-cell spacing ratatui inserts between columns.
fn column_at(rel_x: u16) -> Hit {
    if rel_x < CHECKBOX_WIDTH {
        return Hit::Checkbox;
    }
    let mut edge = CHECKBOX_WIDTH + 1;
    for (i, width) in COLUMN_WIDTHS.iter().enumerate() {
        if rel_x < edge + width {
            return Hit::Data(i);
        }
        edge += width + 1;
    }
    Hit::Outside
}

fn begin_edit_at(state: &mut AppState, row: usize, col: usize) {
    let Some(id) = state
        .engine
        .compute_view()
        .rows
        .get(row)
        .map(|rec| rec.id)
    else {
        return;
    };
    let field = crate::view::GRID_COLUMNS
        .get(col)
        .copied()
        .unwrap_or(Field::Name);
    match state.engine.begin_edit(id, field) {
        Ok(()) => state.input_mode = InputMode::Edit,
        Err(err) => state.notify(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{GridConfig, GridEngine};
    use crate::model::Employee;
    use crossterm::event::{KeyEventKind, KeyEventState};
    use std::path::PathBuf;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn emp(id: u64, name: &str, role: &str) -> Employee {
        Employee {
            id,
            name: name.to_string(),
            role: role.to_string(),
            ..Employee::default()
        }
    }

    fn app() -> AppState {
        let engine = GridEngine::new(
            vec![
                emp(1, "Alice", "Developer"),
                emp(2, "Bob", "Designer"),
                emp(3, "Ann", "Developer"),
            ],
            GridConfig::default(),
        );
        AppState::new(engine, PathBuf::from("out.csv"))
    }

    #[test]
    fn filter_mode_applies_keystrokes_live() {
        let mut state = app();
        let _ = handle_key(&mut state, key(KeyCode::Char('/')));
        assert_eq!(state.input_mode, InputMode::Filter);

        let _ = handle_key(&mut state, key(KeyCode::Char('a')));
        let _ = handle_key(&mut state, key(KeyCode::Char('n')));
        assert_eq!(
            state.engine.state().filters.get(&Field::Name).map(String::as_str),
            Some("an")
        );
        // Filtering reset the page and cursor.
        assert_eq!(state.engine.state().page, 1);
        assert_eq!(state.cursor, 0);

        // Esc clears the constraint being typed.
        let _ = handle_key(&mut state, key(KeyCode::Esc));
        assert_eq!(state.input_mode, InputMode::Normal);
        assert!(state.engine.state().filters.is_empty());
    }

    #[test]
    fn tab_cycles_the_filter_target() {
        let mut state = app();
        let _ = handle_key(&mut state, key(KeyCode::Char('/')));
        assert_eq!(state.filter_field, Field::Name);
        let _ = handle_key(&mut state, key(KeyCode::Tab));
        assert_eq!(state.filter_field, Field::Email);
    }

    #[test]
    fn sort_key_targets_the_cursor_column_and_toggles() {
        let mut state = app();
        let _ = handle_key(&mut state, key(KeyCode::Char('s')));
        assert_eq!(
            state.engine.state().sort,
            Some((Field::Name, crate::engine::SortDir::Asc))
        );
        let _ = handle_key(&mut state, key(KeyCode::Char('s')));
        assert_eq!(
            state.engine.state().sort,
            Some((Field::Name, crate::engine::SortDir::Desc))
        );
    }

    #[test]
    fn space_toggles_selection_under_the_cursor() {
        let mut state = app();
        let _ = handle_key(&mut state, key(KeyCode::Down));
        let _ = handle_key(&mut state, key(KeyCode::Char(' ')));
        assert!(state.engine.state().selected.contains(&2));

        let _ = handle_key(&mut state, key(KeyCode::Char(' ')));
        assert!(state.engine.state().selected.is_empty());
    }

    #[test]
    fn delete_with_empty_selection_warns_and_keeps_records() {
        let mut state = app();
        let _ = handle_key(&mut state, key(KeyCode::Char('d')));
        assert_eq!(state.engine.records().len(), 3);
        assert_eq!(state.status.as_deref(), Some("No rows selected for deletion"));
    }

    #[test]
    fn edit_flow_commits_on_enter() {
        let mut state = app();
        let _ = handle_key(&mut state, key(KeyCode::Char('e')));
        assert_eq!(state.input_mode, InputMode::Edit);

        let _ = handle_key(&mut state, key(KeyCode::Char('!')));
        let _ = handle_key(&mut state, key(KeyCode::Enter));
        assert_eq!(state.input_mode, InputMode::Normal);
        assert_eq!(state.engine.records()[0].name, "Alice!");
        assert_eq!(state.status.as_deref(), Some("Changes saved"));
    }

    #[test]
    fn edit_flow_discards_on_esc() {
        let mut state = app();
        let _ = handle_key(&mut state, key(KeyCode::Char('e')));
        let _ = handle_key(&mut state, key(KeyCode::Char('!')));
        let _ = handle_key(&mut state, key(KeyCode::Esc));
        assert_eq!(state.input_mode, InputMode::Normal);
        assert_eq!(state.engine.records()[0].name, "Alice");
    }

    #[test]
    fn editing_a_read_only_column_is_rejected() {
        let mut state = app();
        // Move the column cursor onto Joined Date.
        for _ in 0..5 {
            let _ = handle_key(&mut state, key(KeyCode::Right));
        }
        let _ = handle_key(&mut state, key(KeyCode::Char('e')));
        assert_eq!(state.input_mode, InputMode::Normal);
        assert_eq!(
            state.status.as_deref(),
            Some("Field Joined Date is not editable")
        );
    }

    #[test]
    fn quit_requires_confirmation() {
        let mut state = app();
        let action = handle_key(&mut state, key(KeyCode::Char('q')));
        assert_eq!(action, KeyAction::None);
        assert_eq!(state.popup, PopupState::QuitConfirm);

        let action = handle_key(&mut state, key(KeyCode::Char('q')));
        assert_eq!(action, KeyAction::Quit);
        assert_eq!(state.popup, PopupState::None);
    }

    #[test]
    fn enter_opens_the_detail_popup_for_the_cursor_row() {
        let mut state = app();
        let _ = handle_key(&mut state, key(KeyCode::Down));
        let _ = handle_key(&mut state, key(KeyCode::Enter));
        assert_eq!(state.popup, PopupState::Detail { id: 2, scroll: 0 });

        let _ = handle_key(&mut state, key(KeyCode::Esc));
        assert_eq!(state.popup, PopupState::None);
    }

    #[test]
    fn export_key_requests_an_export() {
        let mut state = app();
        assert_eq!(handle_key(&mut state, key(KeyCode::Char('x'))), KeyAction::Export);
    }
}
