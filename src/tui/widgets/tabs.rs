//! Tab bar widget for section navigation

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use crate::tui::theme::Theme;

/// Dashboard sections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Section {
    #[default]
    Dashboard,
    Orders,
    Labels,
}

impl Section {
    /// Get the display label for this section
    pub fn label(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Orders => "Orders",
            Self::Labels => "Shipping Labels",
        }
    }

    /// Get all sections in order
    pub fn all() -> &'static [Section] {
        &[Section::Dashboard, Section::Orders, Section::Labels]
    }

    /// Get the next section (wrapping)
    pub fn next(self) -> Self {
        match self {
            Self::Dashboard => Self::Orders,
            Self::Orders => Self::Labels,
            Self::Labels => Self::Dashboard,
        }
    }

    /// Get the previous section (wrapping)
    pub fn prev(self) -> Self {
        match self {
            Self::Dashboard => Self::Labels,
            Self::Orders => Self::Dashboard,
            Self::Labels => Self::Orders,
        }
    }

    /// Get section from number key (1-3)
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::Dashboard),
            2 => Some(Self::Orders),
            3 => Some(Self::Labels),
            _ => None,
        }
    }

    /// Resolve a navigation label such as "📦 Orders" or "Shipping Labels".
    /// Anything unrecognised lands on the dashboard.
    pub fn from_nav_label(label: &str) -> Self {
        let label = label.trim().to_lowercase();
        if label.contains("dashboard") {
            Self::Dashboard
        } else if label.contains("orders") {
            Self::Orders
        } else if label.contains("shipping") {
            Self::Labels
        } else {
            Self::Dashboard
        }
    }
}

/// Tab bar widget showing available sections
pub struct TabBar {
    selected: Section,
    theme: Theme,
}

impl TabBar {
    pub fn new(selected: Section, theme: Theme) -> Self {
        Self { selected, theme }
    }
}

impl Widget for TabBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        // Total width of all tabs for centering
        let total_width: u16 = Section::all()
            .iter()
            .map(|section| {
                let label = section.label();
                let display_len = if *section == self.selected {
                    label.len() + 2 // "[label]"
                } else {
                    label.len()
                };
                display_len as u16 + 2
            })
            .sum::<u16>()
            .saturating_sub(2);

        let mut x = area.x + (area.width.saturating_sub(total_width)) / 2;

        for section in Section::all() {
            let is_selected = *section == self.selected;
            let display = if is_selected {
                format!("[{}]", section.label())
            } else {
                section.label().to_string()
            };

            let display_len = display.len() as u16;
            if x + display_len > area.x + area.width {
                break;
            }

            let style = if is_selected {
                Style::default()
                    .fg(self.theme.accent())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.theme.muted())
            };

            buf.set_string(x, area.y, &display, style);
            x += display_len + 2;
        }
    }
}
