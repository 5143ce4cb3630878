use crate::chart::Projection;
use crate::theme::Theme;
use crate::tui::views::format_latency;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    prelude::*,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
};

/// Legend rows shown under the plot before the rest are cut off.
const MAX_LEGEND_ROWS: usize = 8;

pub struct LatencyChartView;

impl LatencyChartView {
    pub fn render(frame: &mut Frame, area: Rect, projection: &Projection, theme: &Theme) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!("Latency (scale {:.0} ms)", projection.scale))
            .border_style(Style::default().fg(theme.border()));

        if projection.series.is_empty() {
            let placeholder = Paragraph::new("Add a host to start pinging...")
                .style(Style::default().fg(theme.text_dim()))
                .block(block);
            frame.render_widget(placeholder, area);
            return;
        }

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let legend_rows = projection.series.len().min(MAX_LEGEND_ROWS) as u16;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(legend_rows)])
            .split(inner);

        Self::render_plot(frame, chunks[0], projection, theme);
        Self::render_legend(frame, chunks[1], projection, theme);
    }

    fn render_plot(frame: &mut Frame, area: Rect, projection: &Projection, theme: &Theme) {
        let lines = Self::lines(projection);
        let datasets: Vec<Dataset> = lines
            .iter()
            .map(|(series, data)| {
                let graph_type = if data.len() > 1 {
                    GraphType::Line
                } else {
                    GraphType::Scatter
                };
                Dataset::default()
                    .marker(symbols::Marker::Braille)
                    .graph_type(graph_type)
                    .style(Style::default().fg(theme.series(*series)))
                    .data(data)
            })
            .collect();

        let last_slot = projection.slots.saturating_sub(1).max(1) as f64;
        let chart = Chart::new(datasets)
            .x_axis(
                Axis::default()
                    .style(Style::default().fg(theme.axis()))
                    .bounds([0.0, last_slot]),
            )
            .y_axis(
                Axis::default()
                    .style(Style::default().fg(theme.axis()))
                    .bounds([0.0, 1.0])
                    .labels(Self::y_labels(projection)),
            );

        frame.render_widget(chart, area);
    }

    fn render_legend(frame: &mut Frame, area: Rect, projection: &Projection, theme: &Theme) {
        let lines: Vec<Line> = projection
            .series
            .iter()
            .enumerate()
            .take(MAX_LEGEND_ROWS)
            .map(|(i, series)| {
                Line::from(vec![
                    Span::styled("■ ", Style::default().fg(theme.series(i))),
                    Span::styled(
                        format!(
                            "{} (last: {})",
                            series.host,
                            format_latency(series.last_known_good)
                        ),
                        Style::default().fg(theme.text()),
                    ),
                ])
            })
            .collect();

        frame.render_widget(Paragraph::new(lines), area);
    }

    /// Drawable polylines as `(series index, points)`, with the y axis
    /// pointing up (`1 - fraction`). Series with fewer than two samples are
    /// left out.
    pub fn lines(projection: &Projection) -> Vec<(usize, Vec<(f64, f64)>)> {
        projection
            .series
            .iter()
            .enumerate()
            .filter(|(_, series)| series.sample_count >= 2)
            .flat_map(|(i, series)| {
                series
                    .segments()
                    .into_iter()
                    .map(move |segment| {
                        let points = segment
                            .iter()
                            .map(|p| (p.slot as f64, 1.0 - p.fraction))
                            .collect();
                        (i, points)
                    })
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    /// Axis labels from the bottom (0 ms) up to the scale.
    pub fn y_labels(projection: &Projection) -> Vec<String> {
        std::iter::once("0 ms".to_string())
            .chain(
                projection
                    .gridlines
                    .iter()
                    .rev()
                    .map(|g| format!("{:.0} ms", g.value_ms)),
            )
            .collect()
    }
}
