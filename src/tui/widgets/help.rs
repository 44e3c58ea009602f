//! Help popup listing keybindings.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use super::centered_rect;

const BINDINGS: &[(&str, &str)] = &[
    ("↑/↓ j/k", "move row cursor"),
    ("←/→ h/l", "move column cursor"),
    ("PgUp/PgDn p/n", "previous / next page"),
    ("/", "filter the cursor column (Tab cycles, Esc clears)"),
    ("s", "sort by the cursor column (toggles direction)"),
    ("Space", "toggle row selection"),
    ("a / A", "select / deselect all rows on this page"),
    ("d", "delete selected rows"),
    ("e", "edit the cursor cell (Enter saves, Esc discards)"),
    ("Enter", "expand row details"),
    ("x", "export filtered rows to CSV"),
    ("?", "this help"),
    ("q", "quit"),
];

pub fn render_help(frame: &mut Frame, area: Rect, scroll: &mut usize) {
    let popup_area = centered_rect(60, 70, area);
    frame.render_widget(Clear, popup_area);

    let lines: Vec<String> = BINDINGS
        .iter()
        .map(|(keys, what)| format!("  {keys:<16} {what}"))
        .collect();

    let visible_height = popup_area.height.saturating_sub(2) as usize;
    let max_scroll = lines.len().saturating_sub(visible_height);
    if *scroll > max_scroll {
        *scroll = max_scroll;
    }

    let paragraph = Paragraph::new(lines.join("\n"))
        .scroll((*scroll as u16, 0))
        .block(
            Block::default()
                .title(" Help ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .style(Style::default().fg(Color::White).bg(Color::Black)),
        );
    frame.render_widget(paragraph, popup_area);
}
