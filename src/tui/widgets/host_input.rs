use crate::theme::Theme;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph},
};

pub struct HostInput;

impl HostInput {
    pub fn render(frame: &mut Frame, area: Rect, input: &str, theme: &Theme) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(area);

        let input_area = chunks[1];
        frame.render_widget(Clear, input_area);

        let input_widget = Paragraph::new(format!("Add host: {}_", input))
            .style(Style::default().fg(theme.highlight()))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Hostname or IP | Enter: add | Esc: cancel ")
                    .border_style(Style::default().fg(theme.border_focused())),
            )
            .alignment(Alignment::Left);

        frame.render_widget(input_widget, input_area);
    }
}
