//! Shipping labels section - orders queued for batch printing

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::cli::report::{truncate, OrderRow, EMPTY_CELL};
use crate::services::LabelSelection;
use crate::tui::theme::Theme;

/// Selected orders for the batch label widget
pub struct LabelsView<'a> {
    selection: &'a LabelSelection,
    rows: &'a [OrderRow],
    out_dir: &'a str,
    theme: Theme,
}

impl<'a> LabelsView<'a> {
    pub fn new(
        selection: &'a LabelSelection,
        rows: &'a [OrderRow],
        out_dir: &'a str,
        theme: Theme,
    ) -> Self {
        Self {
            selection,
            rows,
            out_dir,
            theme,
        }
    }

    /// Display lines for the selection, in the order ids were ticked.
    /// Ids no longer in the order list still print; their details show as
    /// empty cells.
    fn selected_lines(&self) -> Vec<Line<'static>> {
        self.selection
            .ids()
            .iter()
            .enumerate()
            .map(|(i, id)| {
                let row = self.rows.iter().find(|r| &r.id == id);
                let customer = row.map_or(EMPTY_CELL, |r| r.customer.as_str());
                let total = row.map_or(EMPTY_CELL, |r| r.total.as_str());
                Line::from(vec![
                    Span::styled(
                        format!("{:>3}. ", i + 1),
                        Style::default().fg(self.theme.muted()),
                    ),
                    Span::styled(
                        format!("{:<38}", truncate(id, 37)),
                        Style::default().fg(self.theme.accent()),
                    ),
                    Span::styled(
                        format!("{:<26}", truncate(customer, 25)),
                        Style::default().fg(self.theme.text()),
                    ),
                    Span::styled(
                        format!("{:>12}", total),
                        Style::default().fg(self.theme.money()),
                    ),
                ])
            })
            .collect()
    }
}

impl Widget for LabelsView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let count = self.selection.len();
        let heading = match count {
            0 => "No orders selected".to_string(),
            1 => "1 order selected".to_string(),
            n => format!("{} orders selected", n),
        };

        let mut lines = vec![
            Line::from(Span::styled(
                heading,
                Style::default()
                    .fg(self.theme.text())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!("Labels are saved to {}", self.out_dir),
                Style::default().fg(self.theme.muted()),
            )),
            Line::default(),
        ];

        if count == 0 {
            lines.push(Line::from(Span::styled(
                "Select orders with Space in the Orders section, then press b here",
                Style::default().fg(self.theme.muted()),
            )));
        } else {
            lines.extend(self.selected_lines());
        }

        Paragraph::new(lines)
            .alignment(Alignment::Left)
            .render(area, buf);
    }
}
