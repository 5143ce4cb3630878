use crate::theme::Theme;
use crate::tui::widgets::centered_rect;
use ratatui::{
    layout::{Alignment, Rect},
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

pub struct ErrorPopup;

impl ErrorPopup {
    pub fn render(frame: &mut Frame, area: Rect, error_message: &str, theme: &Theme) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(" Error ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.error()))
            .style(Style::default().bg(theme.background()));

        let inner_area = block.inner(popup_area);
        frame.render_widget(block, popup_area);

        let error_text = format!("{}\n\nPress any key to continue", error_message);
        let error_widget = Paragraph::new(error_text)
            .style(Style::default().fg(theme.error()))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });

        frame.render_widget(error_widget, inner_area);
    }
}
