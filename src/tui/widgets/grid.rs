//! The main employee table widget.
//! Thin TUI wrapper over [`crate::view::build_grid_view`].

use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::text::Span;
use ratatui::widgets::{Block, Borders, Paragraph, Row, Table};

use crate::engine::SortDir;
use crate::tui::state::AppState;
use crate::tui::style::Styles;
use crate::view::{GRID_COLUMNS, build_grid_view};

/// Width of the selection checkbox column.
pub const CHECKBOX_WIDTH: u16 = 4;

/// Fixed widths for the data columns, same order as
/// [`crate::view::GRID_COLUMNS`].
pub const COLUMN_WIDTHS: [u16; 6] = [18, 26, 16, 14, 12, 12];

/// Renders the employee grid and records the drawn area for mouse
/// hit-testing.
pub fn render_grid(frame: &mut Frame, area: Rect, state: &mut AppState) {
    state.table_area = Some(area);

    let vm = build_grid_view(&state.engine);
    let title = format!(
        " Employees — page {}/{} ({} visible) ",
        vm.page, vm.total_pages, vm.visible_count
    );
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .style(Styles::default());

    if vm.rows.is_empty() {
        let paragraph = Paragraph::new("No matching records").block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    // Header: select-all checkbox state plus sort indicators.
    let select_all = if vm.all_on_page_selected { "[x]" } else { "[ ]" };
    let mut headers: Vec<Span> = vec![Span::styled(select_all, Styles::table_header())];
    headers.extend(GRID_COLUMNS.iter().enumerate().map(|(i, field)| {
        let indicator = match vm.sort {
            Some((key, SortDir::Asc)) if key == *field => "▲",
            Some((key, SortDir::Desc)) if key == *field => "▼",
            _ => "",
        };
        Span::styled(
            format!("{}{}", vm.headers[i], indicator),
            Styles::table_header(),
        )
    }));
    let header = Row::new(headers).style(Styles::table_header()).height(1);

    let rows: Vec<Row> = vm
        .rows
        .iter()
        .enumerate()
        .map(|(idx, vr)| {
            let mark = if vr.selected {
                Span::styled("[x]", Styles::selected_mark())
            } else {
                Span::raw("[ ]")
            };
            let mut cells = vec![mark];
            cells.extend(vr.cells.iter().map(|cell| {
                if cell.editing {
                    Span::styled(format!("{}▏", cell.text), Styles::editing())
                } else {
                    match cell.chip {
                        Some(class) => Span::styled(cell.text.clone(), Styles::from_chip(class)),
                        None => Span::raw(cell.text.clone()),
                    }
                }
            }));
            let row = Row::new(cells).height(1);
            if idx == state.cursor {
                row.style(Styles::cursor())
            } else {
                row
            }
        })
        .collect();

    let mut widths = vec![Constraint::Length(CHECKBOX_WIDTH)];
    widths.extend(COLUMN_WIDTHS.iter().map(|&w| Constraint::Length(w)));

    let table = Table::new(rows, widths).header(header).block(block);
    frame.render_widget(table, area);
}
