//! Application state and event loop

use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
    DefaultTerminal, Frame,
};
use tracing::{info, warn};

use crate::cli::report::OrderRow;
use crate::cli::LOAD_FAILED;
use crate::services::{LabelSelection, LabelService, OrderAggregator, OrderSource, OrdersApi};
use crate::types::{Dashboard, Order, OrderdashError};

use super::charts::ChartRegistry;
use super::theme::Theme;
use super::widgets::{
    dashboard::DashboardView,
    help::HelpPopup,
    labels::LabelsView,
    orders::OrdersView,
    spinner::{LoadingStage, Spinner},
    tabs::{Section, TabBar},
};

/// Smallest area the ready layout is drawn in: padding, tabs, two
/// separators, status, keybindings and at least one content row
const MIN_HEIGHT: u16 = 7;
const MIN_WIDTH: u16 = 20;

/// Application state
pub enum AppState {
    /// Loading data with spinner animation
    Loading {
        spinner_frame: usize,
        stage: LoadingStage,
    },
    /// Ready with loaded data
    Ready { data: Box<AppData> },
    /// Load failed; `r` retries
    Error { message: String },
}

/// Loaded application data
#[derive(Debug)]
pub struct AppData {
    pub dashboard: Dashboard,
    pub rows: Vec<OrderRow>,
}

impl AppData {
    pub fn from_orders(orders: &[Order]) -> Self {
        Self {
            dashboard: OrderAggregator::dashboard(orders),
            rows: orders.iter().map(OrderRow::from_order).collect(),
        }
    }
}

/// Work the event loop performs on behalf of a key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Refresh,
    PrintSingle(String),
    PrintBatch,
}

/// Status line message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusMessage {
    Info(String),
    Success(String),
    Error(String),
}

impl StatusMessage {
    pub fn text(&self) -> &str {
        match self {
            Self::Info(s) | Self::Success(s) | Self::Error(s) => s,
        }
    }
}

/// Main application
pub struct App {
    state: AppState,
    should_quit: bool,
    section: Section,
    cursor: usize,
    show_help: bool,
    selection: LabelSelection,
    charts: ChartRegistry,
    status: Option<StatusMessage>,
    label_dir: String,
    theme: Theme,
}

impl App {
    /// Create a new app in loading state
    pub fn new(theme: Theme, section: Section, label_dir: impl Into<String>) -> Self {
        Self {
            state: AppState::Loading {
                spinner_frame: 0,
                stage: LoadingStage::Fetching,
            },
            should_quit: false,
            section,
            cursor: 0,
            show_help: false,
            selection: LabelSelection::new(),
            charts: ChartRegistry::new(),
            status: None,
            label_dir: label_dir.into(),
            theme,
        }
    }

    pub fn section(&self) -> Section {
        self.section
    }

    /// Switch to `section`
    pub fn show_section(&mut self, section: Section) {
        self.section = section;
    }

    pub fn selection(&self) -> &LabelSelection {
        &self.selection
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn set_status(&mut self, status: StatusMessage) {
        self.status = Some(status);
    }

    pub fn charts(&self) -> &ChartRegistry {
        &self.charts
    }

    fn rows(&self) -> &[OrderRow] {
        match &self.state {
            AppState::Ready { data } => &data.rows,
            _ => &[],
        }
    }

    /// Handle keyboard events, returning work for the event loop
    pub fn handle_event(&mut self, event: Event) -> Option<Action> {
        let key = match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => key,
            _ => return None,
        };

        if self.show_help {
            match key.code {
                KeyCode::Char('?') | KeyCode::Esc => self.show_help = false,
                KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
                _ => {}
            }
            return None;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Tab => self.show_section(self.section.next()),
            KeyCode::BackTab => self.show_section(self.section.prev()),
            KeyCode::Char(c @ '1'..='3') => {
                if let Some(section) = Section::from_number(c as u8 - b'0') {
                    self.show_section(section);
                }
            }
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.begin_loading();
                return Some(Action::Refresh);
            }
            KeyCode::Char('b') | KeyCode::Char('B') => {
                return Some(Action::PrintBatch);
            }
            KeyCode::Char('c') | KeyCode::Char('C') => {
                self.selection.clear();
                self.status = Some(StatusMessage::Info("Selection cleared".to_string()));
            }
            _ if self.section == Section::Orders => return self.handle_orders_key(key.code),
            _ => {}
        }
        None
    }

    fn handle_orders_key(&mut self, code: KeyCode) -> Option<Action> {
        let len = self.rows().len();
        match code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.cursor + 1 < len {
                    self.cursor += 1;
                }
            }
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = len.saturating_sub(1),
            KeyCode::Char(' ') => {
                let id = self.cursor_order_id()?;
                self.selection.flip(&id);
            }
            KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Enter => {
                let id = self.cursor_order_id()?;
                return Some(Action::PrintSingle(id));
            }
            _ => {}
        }
        None
    }

    /// Id of the highlighted order. Sets an error status when the order
    /// has none.
    fn cursor_order_id(&mut self) -> Option<String> {
        let id = self.rows().get(self.cursor).map(|row| row.id.clone())?;
        if id.is_empty() {
            self.status = Some(StatusMessage::Error("This order has no id".to_string()));
            return None;
        }
        Some(id)
    }

    /// Show the spinner while a fresh load runs
    pub fn begin_loading(&mut self) {
        self.state = AppState::Loading {
            spinner_frame: 0,
            stage: LoadingStage::Fetching,
        };
    }

    pub fn set_stage(&mut self, stage: LoadingStage) {
        if let AppState::Loading { spinner_frame, .. } = self.state {
            self.state = AppState::Loading {
                spinner_frame,
                stage,
            };
        }
    }

    /// Apply data loading result to app state
    pub fn apply_data_result(&mut self, result: Result<Box<AppData>, String>) {
        match result {
            Ok(data) => {
                self.charts.rebuild(&data.dashboard);
                self.cursor = self.cursor.min(data.rows.len().saturating_sub(1));
                self.state = AppState::Ready { data };
            }
            Err(message) => self.state = AppState::Error { message },
        }
    }

    /// Update spinner animation
    pub fn tick(&mut self) {
        if let AppState::Loading {
            spinner_frame,
            stage,
        } = self.state
        {
            self.state = AppState::Loading {
                spinner_frame: Spinner::next_frame(spinner_frame),
                stage,
            };
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Draw the application
    pub fn draw(&self, frame: &mut Frame) {
        frame.render_widget(self, frame.area());
    }

    fn render_separator(&self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        let line = "─".repeat(area.width as usize);
        buf.set_string(
            area.x,
            area.y,
            &line,
            Style::default().fg(self.theme.muted()),
        );
    }

    fn render_status(&self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        let Some(status) = &self.status else {
            return;
        };
        let color = match status {
            StatusMessage::Info(_) => self.theme.muted(),
            StatusMessage::Success(_) => self.theme.bar(),
            StatusMessage::Error(_) => self.theme.error(),
        };
        Paragraph::new(Span::styled(status.text(), Style::default().fg(color)))
            .alignment(Alignment::Center)
            .render(area, buf);
    }

    fn render_keybindings(&self, area: Rect, buf: &mut Buffer) {
        let mut bindings = vec![("q", "Quit"), ("Tab", "Switch"), ("r", "Refresh")];
        match self.section {
            Section::Dashboard => {}
            Section::Orders => bindings.extend([("Space", "Select"), ("p", "Print label")]),
            Section::Labels => bindings.extend([("b", "Print batch"), ("c", "Clear")]),
        }
        bindings.push(("?", "Help"));

        let mut spans = Vec::new();
        for (i, (key, desc)) in bindings.into_iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("  "));
            }
            spans.push(Span::styled(key, Style::default().fg(self.theme.accent())));
            spans.push(Span::styled(
                format!(": {}", desc),
                Style::default().fg(self.theme.muted()),
            ));
        }
        Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .render(area, buf);
    }

    fn render_too_small(&self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        Paragraph::new(Span::styled(
            "Terminal too small",
            Style::default().fg(self.theme.muted()),
        ))
        .alignment(Alignment::Center)
        .render(
            Rect {
                y: area.y + area.height / 2,
                height: 1,
                ..area
            },
            buf,
        );
    }

    fn render_error(&self, message: &str, area: Rect, buf: &mut Buffer) {
        let lines = vec![
            Line::from(Span::styled(
                message.to_string(),
                Style::default().fg(self.theme.error()),
            )),
            Line::default(),
            Line::from(Span::styled(
                "Press r to retry, q to quit",
                Style::default().fg(self.theme.muted()),
            )),
        ];
        let y = area.y + area.height.saturating_sub(3) / 2;
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(
                Rect {
                    y,
                    height: area.height.min(3),
                    ..area
                },
                buf,
            );
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let data = match &self.state {
            AppState::Loading {
                spinner_frame,
                stage,
            } => {
                Spinner::new(*spinner_frame, *stage, self.theme).render(area, buf);
                return;
            }
            AppState::Error { message } => {
                self.render_error(message, area, buf);
                return;
            }
            AppState::Ready { data } => data,
        };

        if area.height < MIN_HEIGHT || area.width < MIN_WIDTH {
            self.render_too_small(area, buf);
            return;
        }

        let chunks = Layout::vertical([
            Constraint::Length(1), // Top padding
            Constraint::Length(1), // Tabs
            Constraint::Length(1), // Separator
            Constraint::Min(0),    // Section content
            Constraint::Length(1), // Separator
            Constraint::Length(1), // Status line
            Constraint::Length(1), // Keybindings
        ])
        .split(area);

        TabBar::new(self.section, self.theme).render(chunks[1], buf);
        self.render_separator(chunks[2], buf);

        match self.section {
            Section::Dashboard => {
                DashboardView::new(&data.dashboard.summary, &self.charts, self.theme)
                    .render(chunks[3], buf);
            }
            Section::Orders => {
                OrdersView::new(&data.rows, &self.selection, self.cursor, self.theme)
                    .render(chunks[3], buf);
            }
            Section::Labels => {
                LabelsView::new(&self.selection, &data.rows, &self.label_dir, self.theme)
                    .render(chunks[3], buf);
            }
        }

        self.render_separator(chunks[4], buf);
        self.render_status(chunks[5], buf);
        self.render_keybindings(chunks[6], buf);

        if self.show_help {
            let popup_area = HelpPopup::centered_area(area);
            HelpPopup::new(self.theme).render(popup_area, buf);
        }
    }
}

/// Progress reported by the loader thread
enum LoadMessage {
    Stage(LoadingStage),
    Done(Result<Box<AppData>, String>),
}

/// Fetch and aggregate on a background thread. Dropping the returned
/// receiver discards the result.
fn spawn_loader(source: Arc<dyn OrderSource>) -> mpsc::Receiver<LoadMessage> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let result = match source.fetch() {
            Ok(orders) => {
                let _ = tx.send(LoadMessage::Stage(LoadingStage::Aggregating));
                info!(count = orders.len(), "dashboard data loaded");
                Ok(Box::new(AppData::from_orders(&orders)))
            }
            Err(e) => {
                warn!(source = %source.name(), error = %e, "dashboard load failed");
                Err(format!("{} ({})", LOAD_FAILED, e))
            }
        };
        let _ = tx.send(LoadMessage::Done(result));
    });
    rx
}

/// Status line text for a finished label download
fn label_status(result: crate::types::Result<std::path::PathBuf>, failure: &str) -> StatusMessage {
    match result {
        Ok(path) => StatusMessage::Success(format!("Saved {}", path.display())),
        Err(OrderdashError::EmptySelection) => {
            StatusMessage::Error(OrderdashError::EmptySelection.to_string())
        }
        Err(e) => {
            warn!(error = %e, "label download failed");
            StatusMessage::Error(format!("{} ({})", failure, e))
        }
    }
}

/// Run the TUI until the user quits
pub fn run(
    source: Arc<dyn OrderSource>,
    api: Arc<OrdersApi>,
    label_dir: std::path::PathBuf,
    section: Section,
) -> anyhow::Result<()> {
    // Detect before raw mode
    let theme = Theme::detect();
    let app = App::new(theme, section, label_dir.display().to_string());
    let labels = LabelService::new(api, label_dir);

    let mut terminal = ratatui::init();
    let result = run_app(&mut terminal, app, source, &labels);
    ratatui::restore();
    result
}

fn run_app(
    terminal: &mut DefaultTerminal,
    mut app: App,
    source: Arc<dyn OrderSource>,
    labels: &LabelService<Arc<OrdersApi>>,
) -> anyhow::Result<()> {
    let mut loader = spawn_loader(source.clone());

    loop {
        terminal.draw(|frame| app.draw(frame))?;

        if app.should_quit() {
            break;
        }

        while let Ok(message) = loader.try_recv() {
            match message {
                LoadMessage::Stage(stage) => app.set_stage(stage),
                LoadMessage::Done(result) => app.apply_data_result(result),
            }
        }

        // 100ms poll keeps the spinner moving
        if !event::poll(Duration::from_millis(100))? {
            app.tick();
            continue;
        }

        match app.handle_event(event::read()?) {
            Some(Action::Refresh) => {
                // Replacing the receiver drops any in-flight result
                loader = spawn_loader(source.clone());
            }
            Some(Action::PrintSingle(id)) => {
                app.set_status(StatusMessage::Info("Printing label...".to_string()));
                terminal.draw(|frame| app.draw(frame))?;
                let status = label_status(
                    labels.print_single(&id),
                    "Could not print label. Please try again.",
                );
                app.set_status(status);
            }
            Some(Action::PrintBatch) => {
                if !app.selection().is_empty() {
                    app.set_status(StatusMessage::Info(format!(
                        "Generating {} labels...",
                        app.selection().len()
                    )));
                    terminal.draw(|frame| app.draw(frame))?;
                }
                let status = label_status(
                    labels.print_batch(app.selection()),
                    "Could not generate batch labels. Please try again.",
                );
                app.set_status(status);
            }
            None => {}
        }
    }

    Ok(())
}
