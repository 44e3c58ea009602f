//! Top header bar: title, active filters, selection count.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::state::AppState;
use crate::tui::style::Styles;

pub fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
    let filters = &state.engine.state().filters;
    let filter_summary = if filters.is_empty() {
        String::from("no filters")
    } else {
        filters
            .iter()
            .map(|(field, value)| format!("{field}~\"{value}\""))
            .collect::<Vec<_>>()
            .join("  ")
    };
    let selected = state.engine.state().selected.len();

    let line = Line::from(vec![
        Span::styled(" staffgrid ", Styles::header()),
        Span::raw("  "),
        Span::styled(filter_summary, Styles::dim()),
        Span::raw("  "),
        Span::raw(format!("{selected} selected")),
    ]);
    frame.render_widget(Paragraph::new(line).style(Styles::default()), area);
}
