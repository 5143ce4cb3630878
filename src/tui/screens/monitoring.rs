use crate::app::{App, AppMode};
use crate::chart::Projection;
use crate::metrics::registry::HostStatus;
use crate::tui::views::{chart::LatencyChartView, hosts::HostListView};
use crate::tui::widgets::{error_popup::ErrorPopup, help_overlay::HelpOverlay, host_input::HostInput};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

pub struct MonitoringScreen;

impl MonitoringScreen {
    pub fn render(frame: &mut Frame, app: &App, projection: &Projection, hosts: &[HostStatus]) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(area);

        Self::render_header(frame, chunks[0], app, projection);
        Self::render_content(frame, chunks[1], app, projection, hosts);
        Self::render_footer(frame, chunks[2], app);

        match &app.mode {
            AppMode::Help => HelpOverlay::render(frame, area, &app.theme),
            AppMode::AddHost => HostInput::render(frame, area, &app.input, &app.theme),
            AppMode::Error(message) => ErrorPopup::render(frame, area, message, &app.theme),
            AppMode::Normal => {}
        }
    }

    fn render_header(frame: &mut Frame, area: Rect, app: &App, projection: &Projection) {
        let settings = app.registry.settings();
        let mut spans = vec![Span::styled(
            format!(
                "Hosts: {} │ Interval: {} │ Timeout: {} │ Scale: {:.0} ms",
                projection.series.len(),
                humantime::format_duration(settings.interval),
                humantime::format_duration(settings.timeout),
                projection.scale,
            ),
            Style::default()
                .fg(app.theme.primary())
                .add_modifier(Modifier::BOLD),
        )];
        if !app.ping_available {
            spans.push(Span::styled(
                " │ ping not found: all samples will be gaps",
                Style::default().fg(app.theme.warning()),
            ));
        }

        let header = Paragraph::new(Line::from(spans))
            .block(Block::default().borders(Borders::ALL).title("Ping Monitor"));

        frame.render_widget(header, area);
    }

    fn render_content(
        frame: &mut Frame,
        area: Rect,
        app: &App,
        projection: &Projection,
        hosts: &[HostStatus],
    ) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(32), Constraint::Min(0)])
            .split(area);

        HostListView::render(frame, chunks[0], hosts, app.selected, &app.theme);
        LatencyChartView::render(frame, chunks[1], projection, &app.theme);
    }

    fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
        let footer_text = match app.mode {
            AppMode::AddHost => "Enter: Add | Esc: Cancel",
            AppMode::Help => "?/Esc: Close help",
            AppMode::Error(_) => "Any key: Dismiss",
            AppMode::Normal => "a: Add host | d: Remove | j/k: Select | ?: Help | q: Quit",
        };

        let footer = Paragraph::new(footer_text)
            .style(Style::default().fg(Color::Gray))
            .block(Block::default().borders(Borders::ALL).title("Controls"));

        frame.render_widget(footer, area);
    }
}
