//! Help popup widget - displays keyboard shortcuts

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use crate::tui::theme::Theme;

/// Version from Cargo.toml
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Width and height of the help popup
const POPUP_WIDTH: u16 = 46;
const POPUP_HEIGHT: u16 = 20;

const NAVIGATION: &[(&str, &str)] = &[
    ("Tab / Shift+Tab", "Switch section"),
    ("1-3", "Jump to section"),
    ("Up/Down or j/k", "Move (Orders)"),
];

const ACTIONS: &[(&str, &str)] = &[
    ("Space", "Select order for labels"),
    ("p / Enter", "Print label (Orders)"),
    ("b", "Print selected labels"),
    ("c", "Clear selection"),
    ("r", "Refresh data"),
];

const GENERAL: &[(&str, &str)] = &[("q / Esc", "Quit"), ("?", "Toggle help")];

/// Help popup widget showing keyboard shortcuts
pub struct HelpPopup {
    theme: Theme,
}

impl HelpPopup {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    /// Calculate centered popup area
    pub fn centered_area(area: Rect) -> Rect {
        let x = area.x + (area.width.saturating_sub(POPUP_WIDTH)) / 2;
        let y = area.y + (area.height.saturating_sub(POPUP_HEIGHT)) / 2;
        Rect {
            x,
            y,
            width: POPUP_WIDTH.min(area.width),
            height: POPUP_HEIGHT.min(area.height),
        }
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let mut lines = vec![Line::default()];
        for (header, bindings) in [
            ("Navigation", NAVIGATION),
            ("Actions", ACTIONS),
            ("General", GENERAL),
        ] {
            lines.push(Line::from(Span::styled(
                header,
                Style::default()
                    .fg(self.theme.date())
                    .add_modifier(Modifier::BOLD),
            )));
            for (key, desc) in bindings {
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("  {:<18}", key),
                        Style::default().fg(self.theme.accent()),
                    ),
                    Span::styled(*desc, Style::default().fg(self.theme.text())),
                ]));
            }
        }
        lines
    }
}

impl Default for HelpPopup {
    fn default() -> Self {
        Self::new(Theme::default())
    }
}

impl Widget for HelpPopup {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Clear the area first (for overlay effect)
        Clear.render(area, buf);

        let title = format!(" orderdash v{} ", VERSION);
        let block = Block::default()
            .title(title)
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.accent()));

        let inner = block.inner(area);
        block.render(area, buf);

        Paragraph::new(self.lines()).render(inner, buf);

        // Close hint on the last inner row
        if inner.height > 0 {
            let hint_area = Rect {
                y: inner.y + inner.height - 1,
                height: 1,
                ..inner
            };
            Paragraph::new(Span::styled(
                "Press ? to close",
                Style::default().fg(self.theme.muted()),
            ))
            .alignment(Alignment::Center)
            .render(hint_area, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_popup_centered_area() {
        let area = Rect::new(0, 0, 100, 50);
        let popup_area = HelpPopup::centered_area(area);

        assert_eq!(popup_area.width, POPUP_WIDTH);
        assert_eq!(popup_area.height, POPUP_HEIGHT);
        assert_eq!(popup_area.x, (100 - POPUP_WIDTH) / 2);
        assert_eq!(popup_area.y, (50 - POPUP_HEIGHT) / 2);
    }

    #[test]
    fn test_help_popup_small_terminal() {
        let area = Rect::new(0, 0, 30, 10);
        let popup_area = HelpPopup::centered_area(area);

        assert_eq!(popup_area.width, 30);
        assert_eq!(popup_area.height, 10);
    }

    #[test]
    fn test_help_lines_fit_popup() {
        let lines = HelpPopup::default().lines();
        // Border (2) and close hint (1) take the rest
        assert!(lines.len() as u16 <= POPUP_HEIGHT - 3);
    }
}
