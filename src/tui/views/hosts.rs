use crate::metrics::registry::HostStatus;
use crate::theme::Theme;
use crate::tui::views::format_latency;
use ratatui::{
    layout::Rect,
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

pub struct HostListView;

impl HostListView {
    pub fn render(frame: &mut Frame, area: Rect, hosts: &[HostStatus], selected: usize, theme: &Theme) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!("Hosts ({})", hosts.len()))
            .border_style(Style::default().fg(theme.border()));

        if hosts.is_empty() {
            let hint = Paragraph::new("No hosts yet.\nPress 'a' to add one.")
                .style(Style::default().fg(theme.text_dim()))
                .block(block);
            frame.render_widget(hint, area);
            return;
        }

        let items: Vec<ListItem> = hosts
            .iter()
            .enumerate()
            .map(|(i, status)| {
                ListItem::new(Line::from(vec![
                    Span::styled("■ ", Style::default().fg(theme.series(i))),
                    Span::raw(Self::label(status)),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(
                Style::default()
                    .fg(theme.highlight())
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        let mut state = ListState::default().with_selected(Some(selected.min(hosts.len() - 1)));
        frame.render_stateful_widget(list, area, &mut state);
    }

    pub fn label(status: &HostStatus) -> String {
        format!("{} ({})", status.host, format_latency(status.last_known_good))
    }
}
