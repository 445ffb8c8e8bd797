//! Server manager dialog
//!
//! Lists the registry entries and hosts the add/edit form. Mutations are
//! emitted as `SaveServer`/`DeleteServer` actions; the App applies them to
//! the registry and calls `refresh` so the list reflects the result.

use crate::action::Action;
use crate::component::Component;
use crate::components::centered_popup;
use crate::model::server::ServerEntry;
use crate::services::ServerRegistry;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

/// Whether the dialog shows the entry list or the add/edit form
#[derive(Debug, Clone, PartialEq, Eq)]
enum Mode {
    List,
    /// `original` is the pre-edit name; `None` when adding
    Form { original: Option<String> },
}

/// Input field of the add/edit form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormField {
    Name,
    Url,
    Username,
    Password,
}

impl FormField {
    fn next(self) -> FormField {
        match self {
            FormField::Name => FormField::Url,
            FormField::Url => FormField::Username,
            FormField::Username => FormField::Password,
            FormField::Password => FormField::Name,
        }
    }

    fn prev(self) -> FormField {
        match self {
            FormField::Name => FormField::Password,
            FormField::Url => FormField::Name,
            FormField::Username => FormField::Url,
            FormField::Password => FormField::Username,
        }
    }

    fn label(self) -> &'static str {
        match self {
            FormField::Name => "Name",
            FormField::Url => "URL",
            FormField::Username => "Username",
            FormField::Password => "Password",
        }
    }
}

/// Server manager dialog component
pub struct ServerManagerDialog {
    mode: Mode,
    /// Snapshot of registry entries, refreshed on open and after mutations
    entries: Vec<ServerEntry>,
    pub list_state: ListState,
    field: FormField,
    name: String,
    url: String,
    username: String,
    password: String,
    pub error: Option<String>,
}

impl Default for ServerManagerDialog {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerManagerDialog {
    pub fn new() -> Self {
        Self {
            mode: Mode::List,
            entries: Vec::new(),
            list_state: ListState::default(),
            field: FormField::Name,
            name: String::new(),
            url: String::new(),
            username: String::new(),
            password: String::new(),
            error: None,
        }
    }

    /// Reset to the list view with a fresh registry snapshot
    pub fn open(&mut self, registry: &ServerRegistry) {
        self.mode = Mode::List;
        self.error = None;
        self.refresh(registry);
    }

    /// Re-snapshot the registry after a mutation
    pub fn refresh(&mut self, registry: &ServerRegistry) {
        self.entries = registry.entries().into_iter().cloned().collect();
        if self.entries.is_empty() {
            self.list_state.select(None);
        } else {
            let current = self.list_state.selected().unwrap_or(0);
            self.list_state.select(Some(current.min(self.entries.len() - 1)));
        }
        self.mode = Mode::List;
    }

    /// Surface a registry error without leaving the form
    pub fn set_error(&mut self, message: String) {
        self.error = Some(message);
    }

    fn selected_entry(&self) -> Option<&ServerEntry> {
        self.entries.get(self.list_state.selected()?)
    }

    fn start_add(&mut self) {
        self.mode = Mode::Form { original: None };
        self.field = FormField::Name;
        self.name.clear();
        self.url.clear();
        self.username.clear();
        self.password.clear();
        self.error = None;
    }

    fn start_edit(&mut self) {
        let Some(entry) = self.selected_entry().cloned() else {
            return;
        };
        self.mode = Mode::Form {
            original: Some(entry.name.clone()),
        };
        self.field = FormField::Name;
        self.name = entry.name;
        self.url = entry.url;
        self.username = entry.username;
        self.password = entry.password;
        self.error = None;
    }

    fn active_input(&mut self) -> &mut String {
        match self.field {
            FormField::Name => &mut self.name,
            FormField::Url => &mut self.url,
            FormField::Username => &mut self.username,
            FormField::Password => &mut self.password,
        }
    }

    fn field_value(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Url => &self.url,
            FormField::Username => &self.username,
            FormField::Password => &self.password,
        }
    }

    /// Validate the form, returning the entry to save
    fn validate(&mut self) -> Option<ServerEntry> {
        let name = self.name.trim();
        let url = self.url.trim();

        if name.is_empty() {
            self.error = Some("Server name is required".to_string());
            return None;
        }
        if url.is_empty() {
            self.error = Some("Server URL is required".to_string());
            return None;
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            self.error = Some("URL must start with http:// or https://".to_string());
            return None;
        }

        Some(ServerEntry {
            name: name.to_string(),
            url: url.to_string(),
            username: self.username.trim().to_string(),
            password: self.password.clone(),
        })
    }

    fn handle_list_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => Some(Action::CloseModal),
            KeyCode::Char('j') | KeyCode::Down => {
                if !self.entries.is_empty() {
                    let current = self.list_state.selected().unwrap_or(0);
                    let next = (current + 1).min(self.entries.len() - 1);
                    self.list_state.select(Some(next));
                }
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                if !self.entries.is_empty() {
                    let current = self.list_state.selected().unwrap_or(0);
                    self.list_state.select(Some(current.saturating_sub(1)));
                }
                None
            }
            KeyCode::Char('a') => {
                self.start_add();
                None
            }
            KeyCode::Char('e') => {
                self.start_edit();
                None
            }
            KeyCode::Char('d') => self
                .selected_entry()
                .map(|entry| Action::DeleteServer(entry.name.clone())),
            _ => None,
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Esc => {
                self.mode = Mode::List;
                self.error = None;
                None
            }
            KeyCode::Tab | KeyCode::Down => {
                self.field = self.field.next();
                None
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.field = self.field.prev();
                None
            }
            KeyCode::Backspace => {
                self.active_input().pop();
                self.error = None;
                None
            }
            KeyCode::Enter => {
                let Mode::Form { original } = self.mode.clone() else {
                    return None;
                };
                self.validate()
                    .map(|entry| Action::SaveServer { original, entry })
            }
            // Control chords are not text input
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.active_input().push(c);
                self.error = None;
                None
            }
            _ => None,
        }
    }
}

impl Component for ServerManagerDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match self.mode {
            Mode::List => self.handle_list_key(key),
            Mode::Form { .. } => self.handle_form_key(key),
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let popup_area = centered_popup(area, 70, 20);
        frame.render_widget(Clear, popup_area);

        match self.mode.clone() {
            Mode::List => self.draw_list(frame, popup_area),
            Mode::Form { original } => self.draw_form(frame, popup_area, original.is_some()),
        }
        Ok(())
    }
}

impl ServerManagerDialog {
    fn draw_list(&mut self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(5), Constraint::Length(3)])
            .split(area);

        if self.entries.is_empty() {
            let placeholder = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    "No servers registered yet",
                    Style::default().fg(Color::DarkGray),
                )),
                Line::from(Span::styled(
                    "Press a to add one",
                    Style::default().fg(Color::Yellow),
                )),
            ])
            .alignment(ratatui::layout::Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Manage Servers ")
                    .title_style(
                        Style::default()
                            .fg(Color::Magenta)
                            .add_modifier(Modifier::BOLD),
                    ),
            );
            frame.render_widget(placeholder, chunks[0]);
        } else {
            let items: Vec<ListItem> = self
                .entries
                .iter()
                .map(|entry| {
                    ListItem::new(Line::from(vec![
                        Span::raw(entry.name.clone()),
                        Span::styled(
                            format!("  {}", entry.url),
                            Style::default().fg(Color::DarkGray),
                        ),
                    ]))
                })
                .collect();

            let list = List::new(items)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(" Manage Servers ")
                        .title_style(
                            Style::default()
                                .fg(Color::Magenta)
                                .add_modifier(Modifier::BOLD),
                        ),
                )
                .highlight_style(
                    Style::default()
                        .bg(Color::Blue)
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                )
                .highlight_symbol("▶ ");

            frame.render_stateful_widget(list, chunks[0], &mut self.list_state);
        }

        let help = Paragraph::new(Line::from(vec![
            Span::styled(" a ", Style::default().fg(Color::Green)),
            Span::raw("Add  "),
            Span::styled(" e ", Style::default().fg(Color::Cyan)),
            Span::raw("Edit  "),
            Span::styled(" d ", Style::default().fg(Color::Red)),
            Span::raw("Delete  "),
            Span::styled(" Esc ", Style::default().fg(Color::Yellow)),
            Span::raw("Close"),
        ]))
        .alignment(ratatui::layout::Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[1]);
    }

    fn draw_form(&self, frame: &mut Frame, area: Rect, editing: bool) {
        let title = if editing { " Edit Server " } else { " Add Server " };

        let mut lines = vec![Line::from("")];
        for field in [
            FormField::Name,
            FormField::Url,
            FormField::Username,
            FormField::Password,
        ] {
            let active = field == self.field;
            let cursor = if active { "_" } else { "" };
            let value = if field == FormField::Password {
                "*".repeat(self.field_value(field).len())
            } else {
                self.field_value(field).to_string()
            };
            lines.push(Line::from(vec![
                Span::styled(
                    format!("  {:10}", field.label()),
                    Style::default().fg(if active { Color::Cyan } else { Color::DarkGray }),
                ),
                Span::styled(
                    format!("{value}{cursor}"),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(if active { Modifier::BOLD } else { Modifier::empty() }),
                ),
            ]));
            lines.push(Line::from(""));
        }

        lines.push(Line::from(Span::styled(
            "  Username/password are stored locally and never sent",
            Style::default().fg(Color::DarkGray),
        )));

        if let Some(ref error) = self.error {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("  Error: {error}"),
                Style::default().fg(Color::Red),
            )));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled(" Enter ", Style::default().fg(Color::Green)),
            Span::raw("Save  "),
            Span::styled(" Tab ", Style::default().fg(Color::Cyan)),
            Span::raw("Next field  "),
            Span::styled(" Esc ", Style::default().fg(Color::Yellow)),
            Span::raw("Back"),
        ]));

        let form = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .title_style(
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
        );
        frame.render_widget(form, area);
    }
}
