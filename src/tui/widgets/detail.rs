//! Expanded detail popup for one employee record.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::model::Employee;
use crate::tui::state::AppState;
use crate::tui::style::Styles;

use super::centered_rect;

/// Renders the detail popup for the record `id`, or nothing if the record
/// vanished since the popup opened.
pub fn render_detail(frame: &mut Frame, area: Rect, state: &mut AppState, id: u64) {
    let Some(rec) = state.engine.records().iter().find(|r| r.id == id) else {
        // Stale popup target; drop it instead of rendering garbage.
        state.popup = crate::tui::state::PopupState::None;
        return;
    };
    let content = build_content(rec);

    let popup_area = centered_rect(70, 70, area);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(format!(" {} ", rec.name))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .style(Style::default().fg(Color::White).bg(Color::Black));
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let chunks = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(inner);

    // Clamp the scroll offset against the content height.
    let visible_height = chunks[0].height as usize;
    let max_scroll = content.len().saturating_sub(visible_height);
    let scroll = match &mut state.popup {
        crate::tui::state::PopupState::Detail { scroll, .. } => {
            if *scroll > max_scroll {
                *scroll = max_scroll;
            }
            *scroll
        }
        _ => 0,
    };

    let paragraph = Paragraph::new(content)
        .wrap(Wrap { trim: false })
        .scroll((scroll as u16, 0));
    frame.render_widget(paragraph, chunks[0]);

    let footer = Paragraph::new("↑/↓ scroll  Esc close").style(Styles::dim());
    frame.render_widget(footer, chunks[1]);
}

fn field_line(label: &str, value: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label:<18}"), Styles::dim()),
        Span::raw(value.to_string()),
    ])
}

fn build_content(rec: &Employee) -> Vec<Line<'static>> {
    let d = &rec.details;
    let mut lines = vec![
        field_line("Email", &rec.email),
        field_line("Role", &rec.role),
        field_line("Department", &rec.department),
        field_line("Location", &rec.location),
        field_line("Joined", &rec.joined_date),
        Line::default(),
        field_line("Manager", &d.manager),
        field_line("Projects", &d.projects.join("; ")),
        field_line("Skills", &d.skills.join("; ")),
        field_line("Last promotion", &d.last_promotion_date),
    ];
    if !d.performance.is_empty() {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "Performance",
            Styles::table_header(),
        )));
        for (year, score) in &d.performance {
            lines.push(field_line(year, &format!("{score}")));
        }
    }
    lines
}
