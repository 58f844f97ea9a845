//! Dashboard section - KPI cards above a 2x2 chart grid

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Widget},
};

use super::chart::ChartPanel;
use crate::cli::report::{format_money, format_number};
use crate::tui::charts::{ChartRegistry, ChartSlot};
use crate::tui::theme::Theme;
use crate::types::Summary;

/// Card dimensions
const CARD_WIDTH: u16 = 24;
const CARD_HEIGHT: u16 = 5;
const CARD_GAP: u16 = 2;

/// Dashboard section widget
pub struct DashboardView<'a> {
    summary: &'a Summary,
    charts: &'a ChartRegistry,
    theme: Theme,
}

impl<'a> DashboardView<'a> {
    pub fn new(summary: &'a Summary, charts: &'a ChartRegistry, theme: Theme) -> Self {
        Self {
            summary,
            charts,
            theme,
        }
    }

    fn build_cards(&self) -> Vec<KpiCard> {
        vec![
            KpiCard {
                title: "Total Orders",
                value: format_number(self.summary.order_count as u64),
                color: self.theme.accent(),
            },
            KpiCard {
                title: "Paid Orders",
                value: format_number(self.summary.paid_count as u64),
                color: self.theme.stat_blue(),
            },
            KpiCard {
                title: "Revenue",
                value: format_money(self.summary.total_revenue),
                color: self.theme.stat_warm(),
            },
        ]
    }

    fn render_cards(&self, area: Rect, buf: &mut Buffer) {
        let cards = self.build_cards();
        let count = cards.len() as u16;
        let total_width = count * CARD_WIDTH + (count - 1) * CARD_GAP;
        let start_x = area.x + area.width.saturating_sub(total_width) / 2;

        for (i, card) in cards.iter().enumerate() {
            let x = start_x + i as u16 * (CARD_WIDTH + CARD_GAP);
            if x + CARD_WIDTH > area.x + area.width || area.height < CARD_HEIGHT {
                break;
            }
            card.render(
                Rect {
                    x,
                    y: area.y,
                    width: CARD_WIDTH,
                    height: CARD_HEIGHT,
                },
                buf,
            );
        }
    }
}

impl Widget for DashboardView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::vertical([
            Constraint::Length(CARD_HEIGHT), // KPI cards
            Constraint::Length(1),           // Blank
            Constraint::Min(0),              // Chart grid
        ])
        .split(area);

        self.render_cards(chunks[0], buf);

        let rows = Layout::vertical([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)])
            .split(chunks[2]);
        let top = Layout::horizontal([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)])
            .split(rows[0]);
        let bottom = Layout::horizontal([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)])
            .split(rows[1]);

        let cells = [
            (ChartSlot::SalesTrend, top[0]),
            (ChartSlot::TopProducts, top[1]),
            (ChartSlot::OrderStatus, bottom[0]),
            (ChartSlot::RevenueBreakdown, bottom[1]),
        ];
        for (slot, cell) in cells {
            ChartPanel::new(self.charts.get(slot), self.theme).render(cell, buf);
        }
    }
}

/// Internal card representation
struct KpiCard {
    title: &'static str,
    value: String,
    color: Color,
}

impl KpiCard {
    fn render(&self, area: Rect, buf: &mut Buffer) {
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.color))
            .render(area, buf);

        let title_x = area.x + area.width.saturating_sub(self.title.len() as u16) / 2;
        buf.set_string(
            title_x,
            area.y + 1,
            self.title,
            Style::default().fg(self.color),
        );

        let value_width = self.value.chars().count() as u16;
        let value_x = area.x + area.width.saturating_sub(value_width) / 2;
        buf.set_string(
            value_x,
            area.y + 3,
            &self.value,
            Style::default()
                .fg(self.color)
                .add_modifier(Modifier::BOLD),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Dashboard;

    #[test]
    fn test_build_cards_formats_kpis() {
        let summary = Summary {
            order_count: 1200,
            paid_count: 3,
            total_revenue: 1234.5,
        };
        let charts = ChartRegistry::new();
        let view = DashboardView::new(&summary, &charts, Theme::Dark);

        let values: Vec<String> = view.build_cards().into_iter().map(|c| c.value).collect();
        assert_eq!(values, ["1,200", "3", "£1,234.50"]);
    }

    #[test]
    fn test_render_shows_cards_and_chart_titles() {
        let dashboard = Dashboard::default();
        let mut charts = ChartRegistry::new();
        charts.rebuild(&dashboard);

        let area = Rect::new(0, 0, 120, 30);
        let mut buf = Buffer::empty(area);
        DashboardView::new(&dashboard.summary, &charts, Theme::Dark).render(area, &mut buf);

        let text: String = buf.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("Total Orders"));
        assert!(text.contains("£0.00"));
        assert!(text.contains("Sales Trend"));
        assert!(text.contains("Revenue Breakdown"));
    }
}
