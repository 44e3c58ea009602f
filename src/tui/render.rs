//! Main rendering logic for the TUI.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::widgets::Paragraph;

use super::state::{AppState, InputMode, PopupState};
use super::style::Styles;
use super::widgets::{render_detail, render_grid, render_header, render_help, render_quit_confirm};

/// Main render function.
pub fn render(frame: &mut Frame, state: &mut AppState) {
    let area = frame.area();

    let chunks = Layout::vertical([
        Constraint::Length(1), // Header bar
        Constraint::Min(5),    // Grid
        Constraint::Length(1), // Status line
    ])
    .split(area);

    render_header(frame, chunks[0], state);
    render_grid(frame, chunks[1], state);
    render_status(frame, chunks[2], state);

    // Popups overlay everything.
    match state.popup.clone() {
        PopupState::Help { .. } => {
            if let PopupState::Help { scroll } = &mut state.popup {
                render_help(frame, area, scroll);
            }
        }
        PopupState::Detail { id, .. } => render_detail(frame, area, state, id),
        PopupState::QuitConfirm => render_quit_confirm(frame, area),
        PopupState::None => {}
    }
}

fn render_status(frame: &mut Frame, area: Rect, state: &AppState) {
    let (text, style) = match state.input_mode {
        InputMode::Filter => {
            let field = state.filter_field;
            let value = state
                .engine
                .state()
                .filters
                .get(&field)
                .map(String::as_str)
                .unwrap_or("");
            (
                format!(" Filter [{field}]: {value}▏  (Tab column, Enter apply, Esc clear)"),
                Styles::editing(),
            )
        }
        InputMode::Edit => {
            let target = state
                .engine
                .state()
                .edit
                .as_ref()
                .map(|e| e.field.label())
                .unwrap_or("?");
            (
                format!(" Editing {target} — Enter saves, Esc discards"),
                Styles::editing(),
            )
        }
        InputMode::Normal => match &state.status {
            Some(message) => (format!(" {message}"), Styles::warning()),
            None => (
                " ? help  / filter  s sort  Space select  d delete  e edit  x export  q quit"
                    .to_string(),
                Styles::dim(),
            ),
        },
    };
    frame.render_widget(Paragraph::new(text).style(style), area);
}
