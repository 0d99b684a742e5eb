use std::{io, path::PathBuf, thread, time::Duration};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use staffboard_core::{
    snapshot::FileStore, AppConfig, ImportResolver, MoveOutcome, Report, ReportGate, Resource,
    Role, StaffingSession,
};
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::{
    export,
    gesture::{DropZone, Held},
};

const TICK_RATE: Duration = Duration::from_millis(250);
const MAX_PATH_LEN: usize = 256;

#[derive(Debug, Clone)]
struct Theme {
    accent: Color,
    muted: Color,
    selection_bg: Color,
    selection_fg: Color,
    success: Color,
    warning: Color,
    danger: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accent: Color::Cyan,
            muted: Color::DarkGray,
            selection_bg: Color::DarkGray,
            selection_fg: Color::White,
            success: Color::Green,
            warning: Color::Yellow,
            danger: Color::Red,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Projects,
    Roster,
    Pool,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::Projects => Focus::Roster,
            Focus::Roster => Focus::Pool,
            Focus::Pool => Focus::Projects,
        }
    }

    fn previous(self) -> Self {
        match self {
            Focus::Projects => Focus::Pool,
            Focus::Roster => Focus::Projects,
            Focus::Pool => Focus::Roster,
        }
    }
}

#[derive(Debug, Clone)]
struct PathPromptModal {
    input: String,
    cursor: usize,
}

impl PathPromptModal {
    fn new(default: String) -> Self {
        let cursor = default.len();
        Self {
            input: default,
            cursor,
        }
    }

    fn move_cursor(&mut self, delta: isize) {
        let len = self.input.len() as isize;
        self.cursor = (self.cursor as isize + delta).clamp(0, len) as usize;
    }

    fn insert(&mut self, ch: char) {
        if self.input.len() >= MAX_PATH_LEN {
            return;
        }
        if ch.is_ascii() && !ch.is_ascii_control() {
            self.input.insert(self.cursor, ch);
            self.cursor += 1;
        }
    }

    fn backspace(&mut self) {
        if self.cursor > 0 && self.cursor <= self.input.len() {
            self.cursor -= 1;
            self.input.remove(self.cursor);
        }
    }

    fn delete(&mut self) {
        if self.cursor < self.input.len() {
            self.input.remove(self.cursor);
        }
    }

    fn value(&self) -> Option<PathBuf> {
        let trimmed = self.input.trim();
        (!trimmed.is_empty()).then(|| PathBuf::from(trimmed))
    }
}

enum AppEvent {
    Input(Event),
    Tick,
}

/// One selectable line in the roster panel. Empty buckets keep a slot so
/// they remain valid drop targets.
#[derive(Debug, Clone)]
struct RosterSlot {
    role: Role,
    resource: Option<Resource>,
}

struct UiState {
    focus: Focus,
    project_cursor: usize,
    roster_cursor: usize,
    pool_role: Role,
    pool_cursor: usize,
    status: String,
    should_quit: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            focus: Focus::Projects,
            project_cursor: 0,
            roster_cursor: 0,
            pool_role: Role::Programmer,
            pool_cursor: 0,
            status: "Ready".to_string(),
            should_quit: false,
        }
    }
}

impl UiState {
    fn set_status(&mut self, message: impl Into<String>) {
        self.status = message.into();
    }

    fn cycle_pool_role(&mut self, delta: isize) {
        let roles = Role::ALL;
        let index = roles
            .iter()
            .position(|role| *role == self.pool_role)
            .unwrap_or(0) as isize;
        let next = (index + delta).rem_euclid(roles.len() as isize) as usize;
        self.pool_role = roles[next];
        self.pool_cursor = 0;
    }
}

fn step(cursor: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    (cursor as isize + delta).clamp(0, len as isize - 1) as usize
}

/// Interactive staffing board.
pub struct StaffboardApp {
    config: AppConfig,
    session: StaffingSession,
    store: FileStore,
    resolver: ImportResolver,
    theme: Theme,
    state: UiState,
    held: Option<Held>,
    prompt: Option<PathPromptModal>,
    pending_report: Option<Report>,
}

impl StaffboardApp {
    pub fn new(config: AppConfig) -> Self {
        let store = FileStore::new(config.store_dir());
        let resolver = ImportResolver::new(config.schema);
        Self {
            config,
            session: StaffingSession::default(),
            store,
            resolver,
            theme: Theme::default(),
            state: UiState::default(),
            held: None,
            prompt: None,
            pending_report: None,
        }
    }

    /// Import `sheet` when given, otherwise restore the last snapshot.
    pub fn bootstrap(&mut self, sheet: Option<PathBuf>) {
        match sheet {
            Some(path) => self.import_sheet(path),
            None => self.restore_snapshot(),
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut stdout = io::stdout();
        enable_raw_mode().context("failed to enter raw mode")?;
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
        terminal.hide_cursor()?;
        terminal.clear()?;

        let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(128);
        spawn_input_thread(event_tx);

        loop {
            terminal.draw(|frame| self.draw(frame))?;
            if self.state.should_quit {
                break;
            }
            match event_rx.recv().await {
                Some(AppEvent::Input(event)) => {
                    if let Err(err) = self.handle_input(event) {
                        self.state.set_status(format!("Error: {err}"));
                    }
                }
                Some(AppEvent::Tick) => {}
                None => break,
            }
        }

        restore_terminal(&mut terminal)?;
        Ok(())
    }

    fn import_sheet(&mut self, path: PathBuf) {
        let delimiter = self.config.delimiter_char();
        match self.session.import_file(&self.resolver, &path, delimiter) {
            Ok(model) => {
                let message = format!(
                    "Imported {} projects and {} people from {}",
                    model.projects().len(),
                    model.resources().len(),
                    path.display()
                );
                self.reset_cursors();
                self.held = None;
                self.state.set_status(message);
                self.autosave();
            }
            Err(err) => {
                error!(?err, "Import failed");
                self.state.set_status(format!("Import failed: {err}"));
            }
        }
    }

    fn restore_snapshot(&mut self) {
        match self.session.restore(&self.store) {
            Ok(true) => {
                self.reset_cursors();
                self.held = None;
                self.state.set_status("Restored saved board");
            }
            Ok(false) => self
                .state
                .set_status("No saved board; press i to import a sheet"),
            Err(err) => {
                error!(?err, "Snapshot restore failed");
                self.state.set_status(format!("Load failed: {err}"));
            }
        }
    }

    fn save_snapshot(&mut self) {
        match self.session.persist(&self.store) {
            Ok(()) => self.state.set_status("Board saved"),
            Err(err) => {
                error!(?err, "Snapshot save failed");
                self.state.set_status(format!("Save failed: {err}"));
            }
        }
    }

    fn autosave(&mut self) {
        if !self.config.autosave {
            return;
        }
        if let Err(err) = self.session.persist(&self.store) {
            error!(?err, "Autosave failed");
            self.state.set_status(format!("Autosave failed: {err}"));
        }
    }

    fn reset_cursors(&mut self) {
        self.state.project_cursor = 0;
        self.state.roster_cursor = 0;
        self.state.pool_cursor = 0;
    }

    fn roster_slots(&self) -> Vec<RosterSlot> {
        let model = self.session.model();
        let Some(project) = model.projects().get(self.state.project_cursor) else {
            return Vec::new();
        };
        let mut slots = Vec::new();
        for role in Role::ALL {
            let members = model.bucket(&project.id, role);
            if members.is_empty() {
                slots.push(RosterSlot {
                    role,
                    resource: None,
                });
            }
            slots.extend(members.into_iter().map(|resource| RosterSlot {
                role,
                resource: Some(resource.clone()),
            }));
        }
        slots
    }

    fn pool_entries(&self) -> &[Resource] {
        self.session.model().pool(self.state.pool_role)
    }

    fn handle_input(&mut self, event: Event) -> Result<()> {
        let Event::Key(key) = event else {
            return Ok(());
        };
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }
        if self.prompt.is_some() {
            return self.handle_prompt_key(key);
        }
        if self.pending_report.is_some() {
            return self.handle_confirm_key(key);
        }
        self.handle_board_key(key)
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) -> Result<()> {
        let Some(prompt) = self.prompt.as_mut() else {
            return Ok(());
        };
        match key.code {
            KeyCode::Esc => {
                self.prompt = None;
                self.state.set_status("Import cancelled");
            }
            KeyCode::Enter => {
                let value = prompt.value();
                self.prompt = None;
                match value {
                    Some(path) => self.import_sheet(path),
                    None => self.state.set_status("Import cancelled"),
                }
            }
            KeyCode::Left => prompt.move_cursor(-1),
            KeyCode::Right => prompt.move_cursor(1),
            KeyCode::Home => prompt.cursor = 0,
            KeyCode::End => prompt.cursor = prompt.input.len(),
            KeyCode::Backspace => prompt.backspace(),
            KeyCode::Delete => prompt.delete(),
            KeyCode::Char(ch) => prompt.insert(ch),
            _ => {}
        }
        Ok(())
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                if let Some(report) = self.pending_report.take() {
                    self.write_report(&report)?;
                }
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.pending_report = None;
                self.state.set_status("Export aborted");
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_board_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.state.should_quit = true;
            }
            KeyCode::Char('q') => self.state.should_quit = true,
            KeyCode::Tab => self.state.focus = self.state.focus.next(),
            KeyCode::BackTab => self.state.focus = self.state.focus.previous(),
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1),
            KeyCode::Left | KeyCode::Char('h') if self.state.focus == Focus::Pool => {
                self.state.cycle_pool_role(-1)
            }
            KeyCode::Right | KeyCode::Char('l') if self.state.focus == Focus::Pool => {
                self.state.cycle_pool_role(1)
            }
            KeyCode::Char(' ') => {
                if self.held.is_some() {
                    self.drop_held();
                } else {
                    self.pick_up();
                }
            }
            KeyCode::Enter => self.drop_held(),
            KeyCode::Esc => {
                if self.held.take().is_some() {
                    self.state.set_status("Move cancelled");
                }
            }
            KeyCode::Char('u') => {
                if self.session.undo() {
                    self.autosave();
                    self.state.set_status("Undid last change");
                } else {
                    self.state.set_status("Nothing to undo");
                }
            }
            KeyCode::Char('y') => {
                if self.session.redo() {
                    self.autosave();
                    self.state.set_status("Redid change");
                } else {
                    self.state.set_status("Nothing to redo");
                }
            }
            KeyCode::Char('s') => self.save_snapshot(),
            KeyCode::Char('o') => self.restore_snapshot(),
            KeyCode::Char('i') => {
                self.prompt = Some(PathPromptModal::new(String::new()));
            }
            KeyCode::Char('e') => self.begin_export()?,
            _ => {}
        }
        Ok(())
    }

    fn move_cursor(&mut self, delta: isize) {
        match self.state.focus {
            Focus::Projects => {
                let len = self.session.model().projects().len();
                self.state.project_cursor = step(self.state.project_cursor, delta, len);
                self.state.roster_cursor = 0;
            }
            Focus::Roster => {
                let len = self.roster_slots().len();
                self.state.roster_cursor = step(self.state.roster_cursor, delta, len);
            }
            Focus::Pool => {
                let len = self.pool_entries().len();
                self.state.pool_cursor = step(self.state.pool_cursor, delta, len);
            }
        }
    }

    fn pick_up(&mut self) {
        let held = match self.state.focus {
            Focus::Roster => {
                let project = self
                    .session
                    .model()
                    .projects()
                    .get(self.state.project_cursor)
                    .map(|project| project.id.clone());
                self.roster_slots()
                    .into_iter()
                    .nth(self.state.roster_cursor)
                    .and_then(|slot| {
                        slot.resource.map(|resource| Held {
                            resource: resource.id,
                            name: resource.name,
                            role: slot.role,
                            source: project,
                        })
                    })
            }
            Focus::Pool => self
                .pool_entries()
                .get(self.state.pool_cursor)
                .map(|resource| Held {
                    resource: resource.id.clone(),
                    name: resource.name.clone(),
                    role: self.state.pool_role,
                    source: None,
                }),
            Focus::Projects => None,
        };
        match held {
            Some(held) => {
                self.state.set_status(format!(
                    "Holding {} ({}); move to a slot and press Enter",
                    held.name,
                    held.role.label()
                ));
                self.held = Some(held);
            }
            None => self.state.set_status("Nothing to pick up here"),
        }
    }

    fn drop_zone(&self) -> Option<DropZone> {
        match self.state.focus {
            Focus::Roster => {
                let project = self
                    .session
                    .model()
                    .projects()
                    .get(self.state.project_cursor)?
                    .id
                    .clone();
                let slot = self.roster_slots().into_iter().nth(self.state.roster_cursor)?;
                Some(DropZone::Project {
                    project,
                    role: slot.role,
                })
            }
            Focus::Pool => Some(DropZone::Pool {
                role: self.state.pool_role,
            }),
            Focus::Projects => None,
        }
    }

    fn drop_held(&mut self) {
        let Some(held) = self.held.as_ref() else {
            return;
        };
        let Some(zone) = self.drop_zone() else {
            self.state.set_status("Not a drop target");
            return;
        };
        let request = held.drop_on(&zone);
        let name = held.name.clone();
        self.held = None;
        match self.session.dispatch(&request) {
            MoveOutcome::Added { role, .. } => {
                self.state
                    .set_status(format!("Assigned {name} as {}", role.label()));
                self.autosave();
            }
            MoveOutcome::Removed { .. } => {
                self.state.set_status(format!("Returned {name} to the pool"));
                self.autosave();
            }
            MoveOutcome::AlreadyAssigned => {
                self.state.set_status(format!("{name} is already there"));
            }
            MoveOutcome::Ignored(reason) => {
                self.state.set_status(format!("Drop rejected: {reason}"));
            }
        }
        let len = self.roster_slots().len();
        self.state.roster_cursor = step(self.state.roster_cursor, 0, len);
    }

    fn begin_export(&mut self) -> Result<()> {
        match self.session.report_gate(self.config.over_utilized_threshold) {
            ReportGate::Ready(report) => self.write_report(&report),
            ReportGate::NeedsConfirmation(report) => {
                self.state.set_status(format!(
                    "{} people are unassigned; export anyway? (y/n)",
                    report.unassigned.len()
                ));
                self.pending_report = Some(report);
                Ok(())
            }
        }
    }

    fn write_report(&mut self, report: &Report) -> Result<()> {
        let path = export::write_report(&self.config.reports_dir(), report)?;
        info!(path = %path.display(), "Report written");
        self.state
            .set_status(format!("Report written to {}", path.display()));
        Ok(())
    }

    fn draw(&mut self, frame: &mut Frame) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(5), Constraint::Length(4)])
            .split(frame.size());
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(25),
                Constraint::Percentage(40),
                Constraint::Percentage(35),
            ])
            .split(rows[0]);

        self.render_projects(frame, columns[0]);
        self.render_roster(frame, columns[1]);
        self.render_pool(frame, columns[2]);
        self.render_status(frame, rows[1]);

        if let Some(prompt) = self.prompt.as_ref() {
            self.render_prompt(frame, prompt);
        }
        if let Some(report) = self.pending_report.as_ref() {
            self.render_confirm(frame, report);
        }
    }

    fn panel(&self, title: String, focus: Focus) -> Block<'static> {
        let style = if self.state.focus == focus {
            Style::default().fg(self.theme.accent)
        } else {
            Style::default().fg(self.theme.muted)
        };
        Block::default()
            .borders(Borders::ALL)
            .border_style(style)
            .title(title)
    }

    fn highlight(&self) -> Style {
        Style::default()
            .bg(self.theme.selection_bg)
            .fg(self.theme.selection_fg)
            .add_modifier(Modifier::BOLD)
    }

    fn render_projects(&self, frame: &mut Frame, area: Rect) {
        let model = self.session.model();
        let items: Vec<ListItem> = model
            .projects()
            .iter()
            .map(|project| {
                let staffed: usize = Role::ALL
                    .iter()
                    .map(|role| model.bucket(&project.id, *role).len())
                    .sum();
                ListItem::new(Line::from(vec![
                    Span::raw(project.name.clone()),
                    Span::styled(
                        format!("  {staffed}"),
                        Style::default().fg(self.theme.muted),
                    ),
                ]))
            })
            .collect();
        let list = List::new(items)
            .block(self.panel(format!("Projects ({})", model.projects().len()), Focus::Projects))
            .highlight_style(self.highlight());
        let mut list_state = ListState::default();
        if !model.projects().is_empty() {
            list_state.select(Some(self.state.project_cursor));
        }
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn render_roster(&self, frame: &mut Frame, area: Rect) {
        let model = self.session.model();
        let title = model
            .projects()
            .get(self.state.project_cursor)
            .map(|project| format!("Roster · {}", project.name))
            .unwrap_or_else(|| "Roster".to_string());
        let items: Vec<ListItem> = self
            .roster_slots()
            .into_iter()
            .map(|slot| {
                let label = Span::styled(
                    format!("{:<16}", slot.role.label()),
                    Style::default().fg(self.theme.accent),
                );
                let name = match slot.resource {
                    Some(resource) => Span::raw(resource.name),
                    None => Span::styled("N/A", Style::default().fg(self.theme.muted)),
                };
                ListItem::new(Line::from(vec![label, name]))
            })
            .collect();
        let has_items = !items.is_empty();
        let list = List::new(items)
            .block(self.panel(title, Focus::Roster))
            .highlight_style(self.highlight());
        let mut list_state = ListState::default();
        if has_items && self.state.focus == Focus::Roster {
            list_state.select(Some(self.state.roster_cursor));
        }
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn render_pool(&self, frame: &mut Frame, area: Rect) {
        let model = self.session.model();
        let counts = model.assignment_counts();
        let threshold = self.config.over_utilized_threshold;
        let items: Vec<ListItem> = self
            .pool_entries()
            .iter()
            .map(|resource| {
                let count = counts.get(&resource.id).copied().unwrap_or(0);
                let style = if count == 0 {
                    Style::default().fg(self.theme.warning)
                } else if count > threshold {
                    Style::default().fg(self.theme.danger)
                } else {
                    Style::default().fg(self.theme.success)
                };
                ListItem::new(Line::from(vec![
                    Span::raw(format!("{:<24}", resource.name)),
                    Span::styled(format!("{count}"), style),
                ]))
            })
            .collect();
        let has_items = !items.is_empty();
        let title = format!("◀ {} ▶", self.state.pool_role.pool_label());
        let list = List::new(items)
            .block(self.panel(title, Focus::Pool))
            .highlight_style(self.highlight());
        let mut list_state = ListState::default();
        if has_items && self.state.focus == Focus::Pool {
            list_state.select(Some(self.state.pool_cursor));
        }
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Status");
        let held = match self.held.as_ref() {
            Some(held) => format!("Holding: {} ({})", held.name, held.role.label()),
            None => {
                "Tab focus · Space pick up/drop · Esc cancel · u/y undo/redo · s save · o load · i import · e export · q quit"
                    .to_string()
            }
        };
        let paragraph = Paragraph::new(vec![
            Line::from(self.state.status.clone()),
            Line::from(Span::styled(held, Style::default().fg(self.theme.muted))),
        ])
        .block(block)
        .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_prompt(&self, frame: &mut Frame, prompt: &PathPromptModal) {
        let area = centered_rect(60, 5, frame.size());
        frame.render_widget(Clear, area);
        let (before, after) = prompt.input.split_at(prompt.cursor.min(prompt.input.len()));
        let paragraph = Paragraph::new(vec![
            Line::from(vec![
                Span::raw(before.to_string()),
                Span::styled("█", Style::default().fg(self.theme.accent)),
                Span::raw(after.to_string()),
            ]),
            Line::from(Span::styled(
                "Enter import · Esc cancel",
                Style::default().fg(self.theme.muted),
            )),
        ])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Import sheet (path)"),
        );
        frame.render_widget(paragraph, area);
    }

    fn render_confirm(&self, frame: &mut Frame, report: &Report) {
        let area = centered_rect(50, 7, frame.size());
        frame.render_widget(Clear, area);
        let names: Vec<&str> = report
            .unassigned
            .iter()
            .take(5)
            .map(|resource| resource.name.as_str())
            .collect();
        let mut listed = names.join(", ");
        if report.unassigned.len() > names.len() {
            listed.push_str(", …");
        }
        let paragraph = Paragraph::new(vec![
            Line::from(format!("{} people are unassigned:", report.unassigned.len())),
            Line::from(Span::styled(listed, Style::default().fg(self.theme.warning))),
            Line::from(""),
            Line::from("Export the report anyway? (y/n)"),
        ])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Confirm export"));
        frame.render_widget(paragraph, area);
    }
}

fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let width = (u32::from(area.width) * u32::from(percent_x.min(100)) / 100) as u16;
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor()?;
    Ok(())
}

fn spawn_input_thread(sender: mpsc::Sender<AppEvent>) {
    thread::spawn(move || loop {
        match event::poll(TICK_RATE) {
            Ok(true) => match event::read() {
                Ok(evt) => {
                    if sender.blocking_send(AppEvent::Input(evt)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            },
            Ok(false) => {
                if sender.blocking_send(AppEvent::Tick).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn app_with_sheet(sheet: &str) -> Result<(StaffboardApp, tempfile::TempDir)> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("sheet.csv");
        std::fs::write(&path, sheet)?;
        let config = AppConfig {
            data_dir: dir.path().join("data"),
            ..AppConfig::default()
        };
        let mut app = StaffboardApp::new(config);
        app.bootstrap(Some(path));
        Ok((app, dir))
    }

    #[test]
    fn pool_pick_up_and_drop_assigns() -> Result<()> {
        let (mut app, _dir) = app_with_sheet("projects,programmers\nApollo,Carol\n,Alice\n")?;

        // Pool: pick Alice (second programmer).
        app.handle_input(key(KeyCode::BackTab))?;
        app.handle_input(key(KeyCode::Down))?;
        app.handle_input(key(KeyCode::Char(' ')))?;
        assert_eq!(app.held.as_ref().map(|held| held.name.as_str()), Some("Alice"));

        // Roster: first slot is the programmer bucket.
        app.handle_input(key(KeyCode::BackTab))?;
        app.handle_input(key(KeyCode::Enter))?;
        assert!(app.held.is_none());

        let model = app.session.model();
        let apollo = &model.projects()[0].id;
        let names: Vec<&str> = model
            .bucket(apollo, Role::Programmer)
            .iter()
            .map(|resource| resource.name.as_str())
            .collect();
        assert_eq!(names, vec!["Carol", "Alice"]);
        assert!(app.config.store_dir().join("staffboard-state.json").exists());
        Ok(())
    }

    #[test]
    fn mismatched_slot_rejects_drop() -> Result<()> {
        let (mut app, _dir) = app_with_sheet("projects,programmers,qa\nApollo,Carol,\n,Alice,\n")?;
        let before = app.session.model().clone();

        app.handle_input(key(KeyCode::BackTab))?;
        app.handle_input(key(KeyCode::Down))?;
        app.handle_input(key(KeyCode::Char(' ')))?;
        // Roster slot 1 is the empty QA bucket.
        app.handle_input(key(KeyCode::BackTab))?;
        app.handle_input(key(KeyCode::Down))?;
        app.handle_input(key(KeyCode::Enter))?;

        assert_eq!(app.session.model(), &before);
        assert!(app.state.status.starts_with("Drop rejected"));
        Ok(())
    }

    #[test]
    fn export_waits_for_confirmation() -> Result<()> {
        let (mut app, _dir) = app_with_sheet("projects,programmers\nApollo,Carol\n,Alice\n")?;
        app.handle_input(key(KeyCode::Char('e')))?;
        assert!(app.pending_report.is_some());

        app.handle_input(key(KeyCode::Char('n')))?;
        assert!(app.pending_report.is_none());
        assert!(!app.config.reports_dir().exists());

        app.handle_input(key(KeyCode::Char('e')))?;
        app.handle_input(key(KeyCode::Char('y')))?;
        assert_eq!(std::fs::read_dir(app.config.reports_dir())?.count(), 1);
        Ok(())
    }

    #[test]
    fn centered_rect_handles_wide_terminals() {
        let rect = centered_rect(60, 5, Rect::new(0, 0, 1200, 40));
        assert_eq!(rect, Rect::new(240, 17, 720, 5));

        let small = centered_rect(50, 10, Rect::new(2, 1, 20, 4));
        assert_eq!(small, Rect::new(7, 1, 10, 4));
    }

    #[test]
    fn failed_import_keeps_board() -> Result<()> {
        let (mut app, dir) = app_with_sheet("projects,qa\nApollo,Bob\n")?;
        let before = app.session.model().clone();
        let empty = dir.path().join("empty.csv");
        std::fs::write(&empty, "")?;

        app.import_sheet(empty);
        assert_eq!(app.session.model(), &before);
        assert!(app.state.status.starts_with("Import failed"));
        Ok(())
    }
}
