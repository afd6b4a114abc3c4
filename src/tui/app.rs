//! Main TUI application logic.

use super::form::{self, Form, FormAction, FormTarget};
use super::{connections, events, logs, strategies, LogBuffer, Theme};
use crate::error::{ErrorClass, Result};
use crate::services::{expandable, Dashboard};
use crate::types::{Section, StrategyKind};
use crossterm::{
    cursor,
    event::{KeyCode, KeyEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame, Terminal,
};
use std::{io, sync::Arc, time::Duration};
use tracing::{debug, info, warn};

/// Main TUI application.
pub struct App {
    desk: Dashboard,
    theme: Theme,
    log_buffer: Arc<LogBuffer>,
    /// Row cursor within the active section.
    selected: usize,
    form: Option<Form>,
    /// Flag sent with close-position requests.
    closing_only: bool,
    should_quit: bool,
}

impl App {
    pub fn new(desk: Dashboard, log_buffer: Arc<LogBuffer>) -> Self {
        Self {
            desk,
            theme: Theme::default(),
            log_buffer,
            selected: 0,
            form: None,
            closing_only: false,
            should_quit: false,
        }
    }

    pub fn desk(&self) -> &Dashboard {
        &self.desk
    }

    pub fn form(&self) -> Option<&Form> {
        self.form.as_ref()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn closing_only(&self) -> bool {
        self.closing_only
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Handle an event.
    pub fn handle_event(&mut self, event: events::Event) {
        match event {
            events::Event::Key(key) => self.handle_key(&key),
            events::Event::Tick | events::Event::Resize(_, _) => {}
        }
    }

    pub fn handle_key(&mut self, key: &KeyEvent) {
        if self.form.is_some() {
            self.handle_form_key(key);
            return;
        }

        if events::is_quit(key) {
            self.should_quit = true;
            return;
        }

        for section in Section::all() {
            if events::is_key(key, KeyCode::Char(section.key())) {
                self.desk.selection.set_section(section);
                self.selected = 0;
                return;
            }
        }

        match key.code {
            KeyCode::Char('b') => {
                self.desk.selection.toggle_sidebar();
            }
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down => {
                if self.selected + 1 < self.row_count() {
                    self.selected += 1;
                }
            }
            _ => match self.active_kind() {
                Some(kind) => self.handle_strategy_key(kind, key),
                None => self.handle_connection_key(key),
            },
        }
    }

    fn handle_strategy_key(&mut self, kind: StrategyKind, key: &KeyEvent) {
        let group = kind.name();
        match key.code {
            KeyCode::Char('a') => {
                self.form = Some(Form::new_strategy(kind, &self.desk.config.brokerages));
                return;
            }
            KeyCode::Char('x') => {
                self.closing_only = !self.closing_only;
                return;
            }
            KeyCode::Char('m') => {
                self.form = Some(Form::allocation(
                    self.desk.allocation.current_allocation(),
                    self.desk.allocation.next_entry_allocation(),
                ));
                return;
            }
            KeyCode::Char('n') => {
                self.desk.request_next_entry_update();
                return;
            }
            _ => {}
        }

        let Some(strategy) = self.selected_strategy(kind) else {
            return;
        };
        let id = strategy.id.clone();
        let is_active = strategy.is_active;

        match key.code {
            KeyCode::Enter if expandable(kind) => {
                self.desk.selection.toggle_expansion(&id);
            }
            KeyCode::Char(' ') => {
                absorb(self.desk.strategies.toggle_strategy_status(group, &id));
            }
            KeyCode::Char('d') if !is_active => {
                if absorb(self.desk.strategies.remove_strategy(group, &id)).is_some() {
                    self.clamp_selection();
                }
            }
            KeyCode::Char('e') => {
                if absorb(self.desk.strategies.begin_edit(group, &id)).is_some() {
                    if let Some(edit) = self.desk.current_edit() {
                        self.form = Some(Form::edit_strategy(
                            kind,
                            &edit.strategy,
                            &self.desk.config.brokerages,
                        ));
                    }
                }
            }
            KeyCode::Char('r') => {
                absorb(self.desk.force_rebalance(group, &id));
            }
            KeyCode::Char('c') => {
                absorb(self.desk.close_position(group, &id, self.closing_only));
            }
            _ => {}
        }
    }

    fn handle_connection_key(&mut self, key: &KeyEvent) {
        match key.code {
            KeyCode::Char('a') => {
                self.form = Some(Form::new_connection(&self.desk.config.brokerages));
            }
            KeyCode::Char('d') => {
                let Some(id) = self
                    .desk
                    .list_connections()
                    .get(self.selected)
                    .map(|c| c.id.clone())
                else {
                    return;
                };
                if absorb(self.desk.connections.remove_connection(&id)).is_some() {
                    self.clamp_selection();
                }
            }
            _ => {}
        }
    }

    fn handle_form_key(&mut self, key: &KeyEvent) {
        let Some(form) = self.form.as_mut() else {
            return;
        };
        match form.handle_key(key) {
            FormAction::None => {}
            FormAction::Changed(field) => {
                if let FormTarget::EditStrategy(_) = form.target {
                    let patch = form.patch_for(field);
                    absorb(self.desk.strategies.update_edit_buffer(&patch));
                }
            }
            FormAction::Cancel => {
                if let FormTarget::EditStrategy(_) = form.target {
                    self.desk.strategies.cancel_edit();
                }
                self.form = None;
            }
            FormAction::Submit => {
                if let Some(form) = self.form.take() {
                    self.submit(form);
                }
            }
        }
    }

    fn submit(&mut self, form: Form) {
        match form.target {
            FormTarget::NewStrategy(kind) => {
                let draft = form.to_draft();
                absorb(self.desk.strategies.add_strategy(kind.name(), &draft));
            }
            FormTarget::EditStrategy(kind) => {
                absorb(self.desk.strategies.commit_edit(kind.name()));
            }
            FormTarget::NewConnection => {
                self.desk.add_connection(form.to_connection_draft());
            }
            FormTarget::Allocation => {
                if let Some(current) = form.value(form::FieldKey::CurrentAllocation) {
                    self.desk.allocation.set_current_allocation(current);
                }
                if let Some(next) = form.value(form::FieldKey::NextEntryAllocation) {
                    self.desk.allocation.set_next_entry_allocation(next);
                }
                info!(
                    "Allocation set: current {}, next entry {}",
                    self.desk.allocation.current_allocation(),
                    self.desk.allocation.next_entry_allocation()
                );
            }
        }
    }

    fn active_kind(&self) -> Option<StrategyKind> {
        self.desk
            .selection
            .active_section()
            .group_kind(self.desk.config.variant)
    }

    fn selected_strategy(&self, kind: StrategyKind) -> Option<&crate::types::Strategy> {
        self.desk.group(kind)?.strategies.get(self.selected)
    }

    fn row_count(&self) -> usize {
        match self.active_kind() {
            Some(kind) => self.desk.group(kind).map_or(0, |g| g.strategies.len()),
            None => self.desk.list_connections().len(),
        }
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.row_count().saturating_sub(1));
    }

    /// Render the TUI.
    pub fn render(&self, frame: &mut Frame) {
        let area = frame.size();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Tabs
                Constraint::Min(0),    // Content
                Constraint::Length(8), // Logs
                Constraint::Length(3), // Status bar
            ])
            .split(area);

        self.render_tabs(frame, chunks[0]);

        let body = if self.desk.selection.sidebar_open() {
            let cols = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Length(30), Constraint::Min(0)])
                .split(chunks[1]);
            self.render_sidebar(frame, cols[0]);
            cols[1]
        } else {
            chunks[1]
        };

        match self.active_kind() {
            Some(kind) => strategies::render(
                frame,
                body,
                &self.desk,
                kind,
                self.selected,
                self.closing_only,
                &self.theme,
            ),
            None => connections::render(frame, body, &self.desk, self.selected, &self.theme),
        }

        logs::render(frame, chunks[2], &self.log_buffer, &self.theme);
        self.render_status_bar(frame, chunks[3]);

        if let Some(form) = &self.form {
            form::render(frame, area, form, &self.theme);
        }
    }

    fn render_tabs(&self, frame: &mut Frame, area: Rect) {
        let variant = self.desk.config.variant;
        let sections = Section::all();
        let titles: Vec<Line> = sections
            .iter()
            .map(|s| {
                Line::from(vec![
                    Span::styled(format!("[{}] ", s.key()), self.theme.muted()),
                    Span::raw(s.title(variant)),
                ])
            })
            .collect();

        let active = self.desk.selection.active_section();
        let selected = sections.iter().position(|s| *s == active).unwrap_or(0);

        let tabs = Tabs::new(titles)
            .block(Block::default().borders(Borders::ALL).title("Strategies"))
            .select(selected)
            .style(self.theme.tab_inactive())
            .highlight_style(self.theme.tab_active());

        frame.render_widget(tabs, area);
    }

    fn render_sidebar(&self, frame: &mut Frame, area: Rect) {
        let mut lines: Vec<Line> = self
            .desk
            .list_groups()
            .iter()
            .map(|group| {
                Line::from(vec![
                    Span::styled(
                        format!("{}/{} ", group.active_count(), group.total_count()),
                        self.theme.active_flag(group.active_count() > 0),
                    ),
                    Span::raw(group.name()),
                ])
            })
            .collect();
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled(
                format!("{} ", self.desk.list_connections().len()),
                self.theme.info(),
            ),
            Span::raw("Connections"),
        ]));
        if let Some(edit) = self.desk.current_edit() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("Editing {} #{}", edit.group, edit.strategy.id),
                self.theme.warning(),
            )));
        }

        let block = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Overview")
                .border_style(self.theme.border()),
        );
        frame.render_widget(block, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let hints = match self.active_kind() {
            Some(_) => "a add | e edit | space toggle | d delete | enter expand | r rebalance | c close",
            None => "a add connection | d remove",
        };
        let text = Line::from(vec![
            Span::styled("stratdesk", self.theme.title()),
            Span::raw(" | "),
            Span::styled(hints, self.theme.muted()),
            Span::raw(" | "),
            Span::styled("1-4", self.theme.muted()),
            Span::raw(" sections | "),
            Span::styled("b", self.theme.muted()),
            Span::raw(" sidebar | "),
            Span::styled("q", self.theme.muted()),
            Span::raw(" quit"),
        ]);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border());

        frame.render_widget(block, area);

        let inner = Rect {
            x: area.x + 2,
            y: area.y + 1,
            width: area.width.saturating_sub(4),
            height: 1,
        };

        frame.render_widget(text, inner);
    }
}

/// Log and swallow a failed dashboard operation.
fn absorb<T>(result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            match e.class() {
                ErrorClass::LookupMiss => debug!("Ignored: {}", e),
                ErrorClass::Guarded | ErrorClass::Parse => warn!("Rejected: {}", e),
            }
            None
        }
    }
}

/// Run the TUI application.
pub async fn run_tui(desk: Dashboard, log_buffer: Arc<LogBuffer>, tick_rate: Duration) -> io::Result<()> {
    enable_raw_mode()?;
    // Restores the terminal on every exit from here on, including `?` and panics
    let _restore = TerminalGuard::new(restore_terminal);
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(desk, log_buffer);
    let mut event_handler = events::EventHandler::new(tick_rate);

    loop {
        terminal.draw(|f| app.render(f))?;

        if let Some(event) = event_handler.next().await {
            app.handle_event(event);
        }

        if app.should_quit() {
            break;
        }
    }

    Ok(())
}

/// Leave raw mode and the alternate screen. Errors are ignored; this runs on
/// the way out, often while another error is already propagating.
fn restore_terminal() {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    let _ = execute!(stdout, LeaveAlternateScreen, cursor::Show);
}

/// Runs its restore hook exactly once, when dropped.
struct TerminalGuard<F: FnMut()> {
    restore: F,
}

impl<F: FnMut()> TerminalGuard<F> {
    fn new(restore: F) -> Self {
        Self { restore }
    }
}

impl<F: FnMut()> Drop for TerminalGuard<F> {
    fn drop(&mut self) {
        (self.restore)();
    }
}
