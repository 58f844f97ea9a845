//! Chart panel widget - draws one `ChartModel` inside a bordered box

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::cli::report::{format_money, format_number, format_quantity, truncate};
use crate::tui::charts::{ChartKind, ChartModel};
use crate::tui::theme::Theme;

/// Column glyphs from 1/8 to 8/8 of a cell
const EIGHTHS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Width of the label column in bar and share charts
const LABEL_WIDTH: usize = 16;

/// Format a proportional bar
/// Example: value=5, max=10, width=8 → "████░░░░"
pub fn format_bar(value: f64, max: f64, width: usize) -> String {
    if max <= 0.0 || width == 0 {
        return "░".repeat(width);
    }
    let filled = ((value / max) * width as f64).round().max(0.0) as usize;
    let filled = filled.min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Share of `value` in `total` as a percentage, 0 when the total is 0
pub fn percent(value: f64, total: f64) -> f64 {
    if total > 0.0 {
        value / total * 100.0
    } else {
        0.0
    }
}

/// Column heights in eighths of a cell for `values` scaled to `rows` cells
pub fn column_heights(values: &[f64], rows: u16) -> Vec<usize> {
    let max = values.iter().copied().fold(0.0, f64::max);
    let cells = rows as f64 * 8.0;
    values
        .iter()
        .map(|v| {
            if max > 0.0 && *v > 0.0 {
                ((v / max) * cells).round().max(1.0) as usize
            } else {
                0
            }
        })
        .collect()
}

/// Format a chart value the way its kind reads best
pub fn format_value(kind: ChartKind, value: f64) -> String {
    match kind {
        ChartKind::Line | ChartKind::Pie => format_money(value),
        ChartKind::Bar => format_quantity(value),
        ChartKind::Doughnut => format_number(value.max(0.0) as u64),
    }
}

/// Bordered chart panel
pub struct ChartPanel<'a> {
    chart: Option<&'a ChartModel>,
    theme: Theme,
}

impl<'a> ChartPanel<'a> {
    pub fn new(chart: Option<&'a ChartModel>, theme: Theme) -> Self {
        Self { chart, theme }
    }
}

impl Widget for ChartPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = match self.chart {
            Some(chart) => format!(" {} · {} ", chart.title, chart.series),
            None => String::new(),
        };
        let block = Block::default()
            .title(Span::styled(
                title,
                Style::default()
                    .fg(self.theme.text())
                    .add_modifier(Modifier::BOLD),
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.muted()));
        let inner = block.inner(area);
        block.render(area, buf);

        let chart = match self.chart {
            Some(chart) if !chart.is_empty() => chart,
            _ => {
                self.render_no_data(inner, buf);
                return;
            }
        };

        match chart.kind {
            ChartKind::Line => self.render_columns(chart, inner, buf),
            ChartKind::Bar => self.render_bars(chart, inner, buf),
            ChartKind::Doughnut | ChartKind::Pie => self.render_shares(chart, inner, buf),
        }
    }
}

impl ChartPanel<'_> {
    fn render_no_data(&self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        let middle = Rect {
            y: area.y + area.height / 2,
            height: 1,
            ..area
        };
        Paragraph::new(Span::styled(
            "(no data)",
            Style::default().fg(self.theme.muted()),
        ))
        .alignment(Alignment::Center)
        .render(middle, buf);
    }

    /// One column per day; when there are more days than columns the most
    /// recent ones are kept
    fn render_columns(&self, chart: &ChartModel, area: Rect, buf: &mut Buffer) {
        if area.height < 3 || area.width < 4 {
            return;
        }
        let peak = format!("max {}", format_value(chart.kind, chart.max_value()));
        buf.set_string(
            area.x,
            area.y,
            &peak,
            Style::default().fg(self.theme.muted()),
        );

        let plot_rows = area.height - 2; // peak label + axis labels
        let col_width: u16 = if chart.values.len() * 2 <= area.width as usize {
            2
        } else {
            1
        };
        let visible = (area.width / col_width) as usize;
        let skip = chart.values.len().saturating_sub(visible);
        let values = &chart.values[skip..];
        let heights = column_heights(values, plot_rows);

        let bottom = area.y + area.height - 2;
        let style = Style::default().fg(self.theme.bar());
        for (i, eighths) in heights.iter().enumerate() {
            let x = area.x + i as u16 * col_width;
            let full = (*eighths / 8) as u16;
            for row in 0..full {
                buf.set_string(x, bottom - row, "█", style);
            }
            let rest = eighths % 8;
            if rest > 0 && full < plot_rows {
                buf.set_string(x, bottom - full, EIGHTHS[rest - 1].to_string(), style);
            }
        }

        // First and last visible day under the axis
        let axis_y = area.y + area.height - 1;
        let axis_style = Style::default().fg(self.theme.date());
        let labels = &chart.labels[skip..];
        if let Some(first) = labels.first() {
            buf.set_string(area.x, axis_y, first, axis_style);
        }
        if labels.len() > 1 {
            if let Some(last) = labels.last() {
                let x = area.x + area.width.saturating_sub(last.chars().count() as u16);
                buf.set_string(x, axis_y, last, axis_style);
            }
        }
    }

    fn render_bars(&self, chart: &ChartModel, area: Rect, buf: &mut Buffer) {
        let max = chart.max_value();
        let value_width = 10;
        let bar_width = (area.width as usize).saturating_sub(LABEL_WIDTH + value_width + 2);

        for (i, (label, value)) in chart.points().take(area.height as usize).enumerate() {
            let y = area.y + i as u16;
            let label = format!(
                "{:<width$}",
                truncate(label, LABEL_WIDTH - 1),
                width = LABEL_WIDTH
            );
            buf.set_string(
                area.x,
                y,
                &label,
                Style::default().fg(self.theme.accent()),
            );
            buf.set_string(
                area.x + LABEL_WIDTH as u16,
                y,
                format_bar(value, max, bar_width),
                Style::default().fg(self.theme.bar()),
            );
            buf.set_string(
                area.x + (LABEL_WIDTH + bar_width + 1) as u16,
                y,
                format!(
                    "{:>width$}",
                    format_value(chart.kind, value),
                    width = value_width
                ),
                Style::default().fg(self.theme.text()),
            );
        }
    }

    /// Stacked share bar on top, legend with percentages below
    fn render_shares(&self, chart: &ChartModel, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        let total = chart.total();
        let width = area.width as usize;

        let mut x = area.x;
        let mut used = 0usize;
        let slices = chart.values.len();
        for (i, value) in chart.values.iter().enumerate() {
            let cells = if i + 1 == slices && total > 0.0 {
                width - used
            } else {
                ((percent(*value, total) / 100.0) * width as f64).round() as usize
            };
            let cells = cells.min(width - used);
            if cells > 0 {
                buf.set_string(
                    x,
                    area.y,
                    "█".repeat(cells),
                    Style::default().fg(self.theme.slice(i)),
                );
            }
            x += cells as u16;
            used += cells;
        }
        if total <= 0.0 {
            buf.set_string(
                area.x,
                area.y,
                "░".repeat(width),
                Style::default().fg(self.theme.muted()),
            );
        }

        for (i, (label, value)) in chart
            .points()
            .take(area.height.saturating_sub(2) as usize)
            .enumerate()
        {
            let y = area.y + 2 + i as u16;
            buf.set_string(area.x, y, "■ ", Style::default().fg(self.theme.slice(i)));
            let line = format!(
                "{:<width$}{:>12} {:>6.1}%",
                truncate(label, LABEL_WIDTH - 1),
                format_value(chart.kind, value),
                percent(value, total),
                width = LABEL_WIDTH
            );
            buf.set_string(area.x + 2, y, &line, Style::default().fg(self.theme.text()));
        }
    }
}
