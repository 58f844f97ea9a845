//! Orders section - order table with a selection column

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::cli::report::{truncate, OrderRow};
use crate::services::LabelSelection;
use crate::tui::theme::Theme;

/// Table width: Select(5) + Order(13) + Customer(26) + Status(14) + Total(12) = 70
const TABLE_WIDTH: u16 = 70;

/// First row index to draw so that `cursor` stays inside a window of
/// `height` rows
pub fn window_start(cursor: usize, len: usize, height: usize) -> usize {
    if height == 0 || len <= height {
        return 0;
    }
    let max_start = len - height;
    cursor.saturating_sub(height - 1).min(max_start)
}

/// Orders table widget
pub struct OrdersView<'a> {
    rows: &'a [OrderRow],
    selection: &'a LabelSelection,
    cursor: usize,
    theme: Theme,
}

impl<'a> OrdersView<'a> {
    pub fn new(
        rows: &'a [OrderRow],
        selection: &'a LabelSelection,
        cursor: usize,
        theme: Theme,
    ) -> Self {
        Self {
            rows,
            selection,
            cursor,
            theme,
        }
    }

    fn table_area(&self, area: Rect, y: u16) -> Rect {
        let offset = area.width.saturating_sub(TABLE_WIDTH) / 2;
        Rect {
            x: area.x + offset,
            y,
            width: TABLE_WIDTH.min(area.width),
            height: 1,
        }
    }

    fn render_header(&self, area: Rect, buf: &mut Buffer) {
        let bold = Style::default()
            .fg(self.theme.text())
            .add_modifier(Modifier::BOLD);
        let header = Line::from(vec![
            Span::styled(format!("{:<5}", ""), bold),
            Span::styled(format!("{:<13}", "Order"), bold),
            Span::styled(format!("{:<26}", "Customer"), bold),
            Span::styled(format!("{:<14}", "Status"), bold),
            Span::styled(format!("{:>12}", "Total"), bold),
        ]);
        Paragraph::new(header).render(self.table_area(area, area.y), buf);
    }

    fn render_row(&self, index: usize, row: &OrderRow, area: Rect, buf: &mut Buffer) {
        let checked = !row.id.is_empty() && self.selection.contains(&row.id);
        let mark = if checked { "[x]" } else { "[ ]" };

        let is_cursor = index == self.cursor;
        let base = if is_cursor {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };

        let line = Line::from(vec![
            Span::styled(
                format!("{:<5}", mark),
                base.fg(if checked {
                    self.theme.bar()
                } else {
                    self.theme.muted()
                }),
            ),
            Span::styled(
                format!("{:<13}", row.short_id),
                base.fg(self.theme.accent()),
            ),
            Span::styled(
                format!("{:<26}", truncate(&row.customer, 25)),
                base.fg(self.theme.text()),
            ),
            Span::styled(
                format!("{:<14}", truncate(&row.status, 13)),
                base.fg(self.theme.date()),
            ),
            Span::styled(format!("{:>12}", row.total), base.fg(self.theme.money())),
        ]);
        Paragraph::new(line).render(self.table_area(area, area.y), buf);
    }
}

impl Widget for OrdersView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        self.render_header(area, buf);

        if self.rows.is_empty() {
            let y = area.y + (area.height / 2).max(1).min(area.height - 1);
            let message = "No orders yet";
            let x = area.x + area.width.saturating_sub(message.len() as u16) / 2;
            buf.set_string(x, y, message, Style::default().fg(self.theme.muted()));
            return;
        }

        let body_height = (area.height - 1) as usize;
        let start = window_start(self.cursor, self.rows.len(), body_height);
        for (offset, row) in self.rows[start..].iter().take(body_height).enumerate() {
            let row_area = Rect {
                y: area.y + 1 + offset as u16,
                height: 1,
                ..area
            };
            self.render_row(start + offset, row, row_area, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(n: usize) -> Vec<OrderRow> {
        (0..n)
            .map(|i| OrderRow {
                id: format!("order-{i:04}-abcdef"),
                short_id: format!("order-{i:04}..."),
                customer: format!("Customer {i}"),
                status: "PAID".to_string(),
                total: "£10.00".to_string(),
            })
            .collect()
    }

    fn render(rows: &[OrderRow], selection: &LabelSelection, cursor: usize) -> String {
        let area = Rect::new(0, 0, 80, 6);
        let mut buf = Buffer::empty(area);
        OrdersView::new(rows, selection, cursor, Theme::Dark).render(area, &mut buf);
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    // ========== window_start() tests ==========

    #[test]
    fn test_window_start_fits() {
        assert_eq!(window_start(3, 5, 10), 0);
    }

    #[test]
    fn test_window_start_follows_cursor() {
        assert_eq!(window_start(0, 20, 5), 0);
        assert_eq!(window_start(4, 20, 5), 0);
        assert_eq!(window_start(5, 20, 5), 1);
        assert_eq!(window_start(19, 20, 5), 15);
    }

    #[test]
    fn test_window_start_zero_height() {
        assert_eq!(window_start(7, 20, 0), 0);
    }

    // ========== render tests ==========

    #[test]
    fn test_render_marks_selected_rows() {
        let rows = rows(2);
        let mut selection = LabelSelection::new();
        selection.toggle(&rows[1].id, true);

        let text = render(&rows, &selection, 0);
        assert!(text.contains("[ ]  order-0000..."));
        assert!(text.contains("[x]  order-0001..."));
    }

    #[test]
    fn test_render_scrolls_to_cursor() {
        let rows = rows(20);
        let text = render(&rows, &LabelSelection::new(), 12);
        assert!(text.contains("order-0012..."));
        assert!(!text.contains("order-0000..."));
    }

    #[test]
    fn test_render_empty_table() {
        let text = render(&[], &LabelSelection::new(), 0);
        assert!(text.contains("No orders yet"));
    }
}
