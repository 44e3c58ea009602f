//! Quit confirmation popup.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use super::centered_rect;

pub fn render_quit_confirm(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(36, 18, area);
    frame.render_widget(Clear, popup_area);

    let paragraph = Paragraph::new("\n  Quit? Unsaved edits are lost.\n\n  q/Enter quit   Esc/n stay")
        .block(
            Block::default()
                .title(" Confirm ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .style(Style::default().fg(Color::White).bg(Color::Black)),
        );
    frame.render_widget(paragraph, popup_area);
}
