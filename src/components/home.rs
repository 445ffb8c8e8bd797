//! Home component - Main application screen
//!
//! Server list on the left, layer tree on the right. Owns the cursor state
//! of both panes and translates key presses into Actions.

use crate::action::Action;
use crate::component::Component;
use crate::components::calculate_main_layout;
use crate::model::domain::DomainState;
use crate::model::layer::LayerEntry;
use crate::model::server::ServerEntry;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

/// Which pane has keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Servers,
    Layers,
}

/// Home component for the main application view
pub struct HomeComponent {
    pub pane: Pane,
    pub server_state: ListState,
    pub layer_state: ListState,
}

impl Default for HomeComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl HomeComponent {
    pub fn new() -> Self {
        let mut server_state = ListState::default();
        server_state.select(Some(0));
        Self {
            pane: Pane::Servers,
            server_state,
            layer_state: ListState::default(),
        }
    }

    pub fn switch_pane(&mut self) {
        self.pane = match self.pane {
            Pane::Servers => Pane::Layers,
            Pane::Layers => Pane::Servers,
        };
    }

    fn active_len(&self, domain: &DomainState) -> usize {
        match self.pane {
            Pane::Servers => domain.registry.len(),
            Pane::Layers => domain.layers.len(),
        }
    }

    fn active_state(&mut self) -> &mut ListState {
        match self.pane {
            Pane::Servers => &mut self.server_state,
            Pane::Layers => &mut self.layer_state,
        }
    }

    /// Select next item in the focused pane, wrapping to the top
    pub fn next(&mut self, domain: &DomainState) {
        let len = self.active_len(domain);
        if len == 0 {
            return;
        }
        let state = self.active_state();
        let next = match state.selected() {
            // No cursor yet: land on the first item
            None => 0,
            Some(current) if current + 1 >= len => 0,
            Some(current) => current + 1,
        };
        state.select(Some(next));
    }

    /// Select previous item in the focused pane, wrapping to the bottom
    pub fn previous(&mut self, domain: &DomainState) {
        let len = self.active_len(domain);
        if len == 0 {
            return;
        }
        let state = self.active_state();
        let prev = match state.selected() {
            None => 0,
            Some(0) => len - 1,
            Some(current) => current - 1,
        };
        state.select(Some(prev));
    }

    pub fn select_first(&mut self, domain: &DomainState) {
        if self.active_len(domain) > 0 {
            self.active_state().select(Some(0));
        }
    }

    pub fn select_last(&mut self, domain: &DomainState) {
        let len = self.active_len(domain);
        if len > 0 {
            self.active_state().select(Some(len - 1));
        }
    }

    /// Reset the layer cursor after the tree is rebuilt
    pub fn reset_layer_cursor(&mut self, domain: &DomainState) {
        if domain.layers.is_empty() {
            self.layer_state.select(None);
        } else {
            self.layer_state.select(Some(0));
        }
    }

    /// Keep the server cursor in range after registry mutations
    pub fn clamp_server_cursor(&mut self, domain: &DomainState) {
        let len = domain.registry.len();
        if len == 0 {
            self.server_state.select(None);
        } else {
            let current = self.server_state.selected().unwrap_or(0);
            self.server_state.select(Some(current.min(len - 1)));
        }
    }

    /// Registry entry under the server cursor
    pub fn highlighted_server<'a>(&self, domain: &'a DomainState) -> Option<&'a ServerEntry> {
        let idx = self.server_state.selected()?;
        domain.registry.entries().get(idx).copied()
    }

    /// Layer entry under the layer cursor
    pub fn highlighted_layer<'a>(&self, domain: &'a DomainState) -> Option<&'a LayerEntry> {
        let idx = self.layer_state.selected()?;
        domain.layers.get(idx)
    }
}

impl Component for HomeComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        // Plain-letter shortcuts must not fire on control chords;
        // Ctrl+C is handled app-wide before keys reach this component.
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(None);
        }

        let action = match key.code {
            KeyCode::Char('q') => Some(Action::OpenQuitDialog),
            KeyCode::Char('?') => Some(Action::OpenHelp),
            KeyCode::Char('s') => Some(Action::OpenServerManager),
            KeyCode::Char('c') => Some(Action::FetchCapabilities),
            KeyCode::Char('m') => Some(Action::FetchMap),
            KeyCode::Char('v') => Some(Action::OpenMapView),
            KeyCode::Tab => Some(Action::SwitchPane),
            KeyCode::Char('j') | KeyCode::Down => Some(Action::NextItem),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::PrevItem),
            KeyCode::Char('g') => Some(Action::FirstItem),
            KeyCode::Char('G') => Some(Action::LastItem),
            KeyCode::Enter => match self.pane {
                Pane::Servers => Some(Action::SelectServer),
                Pane::Layers => Some(Action::ToggleLayer),
            },
            KeyCode::Char(' ') if self.pane == Pane::Layers => Some(Action::ToggleLayer),
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        // Rendering needs domain state; see draw_home_screen
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Rendering
// ═══════════════════════════════════════════════════════════════════════════════

/// Read-only context for rendering the home screen
pub struct HomeRenderContext<'a> {
    pub domain: &'a DomainState,
    pub error: Option<&'a str>,
    pub status_message: Option<&'a str>,
}

/// Draw the full home screen
pub fn draw_home_screen(
    frame: &mut Frame,
    area: Rect,
    home: &mut HomeComponent,
    ctx: &HomeRenderContext,
) -> Result<()> {
    let layout = calculate_main_layout(area);

    draw_header(frame, layout.header, ctx);
    draw_server_pane(frame, layout.servers, home, ctx);
    draw_layer_pane(frame, layout.layers, home, ctx);
    draw_status_line(frame, layout.status, ctx);
    draw_help_bar(frame, layout.help);

    Ok(())
}

fn draw_header(frame: &mut Frame, area: Rect, ctx: &HomeRenderContext) {
    let server_span = match &ctx.domain.selection.server {
        Some(server) => Line::from(vec![
            Span::styled("Server: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                server.name.clone(),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  {}", server.url), Style::default().fg(Color::DarkGray)),
        ]),
        None => Line::from(Span::styled(
            "No server selected",
            Style::default().fg(Color::Yellow),
        )),
    };

    let header = Paragraph::new(server_span).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" wms-tui ")
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
    );
    frame.render_widget(header, area);
}

fn pane_border_style(active: bool) -> Style {
    if active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn draw_server_pane(frame: &mut Frame, area: Rect, home: &mut HomeComponent, ctx: &HomeRenderContext) {
    if ctx.domain.registry.is_empty() {
        let placeholder = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "No servers registered",
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(Span::styled(
                "Press s to add one",
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Servers ")
                .border_style(pane_border_style(home.pane == Pane::Servers)),
        );
        frame.render_widget(placeholder, area);
        return;
    }

    let active_name = ctx
        .domain
        .selection
        .server
        .as_ref()
        .map(|s| s.name.as_str());

    let items: Vec<ListItem> = ctx
        .domain
        .registry
        .entries()
        .iter()
        .map(|server| {
            let is_active = Some(server.name.as_str()) == active_name;
            let marker = if is_active { "● " } else { "  " };
            ListItem::new(Line::from(vec![
                Span::styled(
                    marker,
                    Style::default().fg(if is_active { Color::Green } else { Color::DarkGray }),
                ),
                Span::raw(server.name.clone()),
                Span::styled(format!("  {}", server.url), Style::default().fg(Color::DarkGray)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Servers ")
                .border_style(pane_border_style(home.pane == Pane::Servers)),
        )
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    frame.render_stateful_widget(list, area, &mut home.server_state);
}

fn draw_layer_pane(frame: &mut Frame, area: Rect, home: &mut HomeComponent, ctx: &HomeRenderContext) {
    if ctx.domain.layers.is_empty() {
        let placeholder = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "No layers loaded",
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(Span::styled(
                "Select a server and press c to fetch capabilities",
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Layers ")
                .border_style(pane_border_style(home.pane == Pane::Layers)),
        );
        frame.render_widget(placeholder, area);
        return;
    }

    let items: Vec<ListItem> = ctx
        .domain
        .layers
        .iter()
        .map(|layer| {
            let indent = "  ".repeat(layer.depth);
            if let Some(name) = &layer.name {
                let checked = ctx.domain.selection.is_layer_selected(name);
                let checkbox = if checked { "[x] " } else { "[ ] " };
                ListItem::new(Line::from(vec![
                    Span::raw(indent),
                    Span::styled(
                        checkbox,
                        Style::default().fg(if checked { Color::Green } else { Color::DarkGray }),
                    ),
                    Span::raw(name.clone()),
                    Span::styled(
                        layer
                            .title
                            .as_ref()
                            .map(|t| format!("  {t}"))
                            .unwrap_or_default(),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]))
            } else {
                // Group layer: shown for structure, not selectable
                ListItem::new(Line::from(vec![
                    Span::raw(indent),
                    Span::styled(
                        layer.display_label().to_string(),
                        Style::default()
                            .fg(Color::Magenta)
                            .add_modifier(Modifier::ITALIC),
                    ),
                ]))
            }
        })
        .collect();

    let selected_count = ctx.domain.selection.layer_names.len();
    let title = if selected_count > 0 {
        format!(" Layers ({selected_count} selected) ")
    } else {
        " Layers ".to_string()
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(pane_border_style(home.pane == Pane::Layers)),
        )
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    frame.render_stateful_widget(list, area, &mut home.layer_state);
}

fn draw_status_line(frame: &mut Frame, area: Rect, ctx: &HomeRenderContext) {
    let line = if let Some(error) = ctx.error {
        Line::from(Span::styled(
            format!(" {error}"),
            Style::default().fg(Color::Red),
        ))
    } else if let Some(status) = ctx.status_message {
        Line::from(Span::styled(
            format!(" {status}"),
            Style::default().fg(Color::Cyan),
        ))
    } else {
        Line::from("")
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_help_bar(frame: &mut Frame, area: Rect) {
    let spans = vec![
        Span::styled(" Tab ", Style::default().fg(Color::Yellow)),
        Span::raw("Pane  "),
        Span::styled(" Enter ", Style::default().fg(Color::Yellow)),
        Span::raw("Select  "),
        Span::styled(" Space ", Style::default().fg(Color::Yellow)),
        Span::raw("Toggle layer  "),
        Span::styled(" c ", Style::default().fg(Color::Cyan)),
        Span::raw("GetCapabilities  "),
        Span::styled(" m ", Style::default().fg(Color::Cyan)),
        Span::raw("GetMap  "),
        Span::styled(" s ", Style::default().fg(Color::Cyan)),
        Span::raw("Servers  "),
        Span::styled(" ? ", Style::default().fg(Color::DarkGray)),
        Span::raw("Help  "),
        Span::styled(" q ", Style::default().fg(Color::DarkGray)),
        Span::raw("Quit"),
    ];

    let help = Paragraph::new(Line::from(spans))
        .alignment(ratatui::layout::Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(help, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ServerRegistry;
    use tempfile::tempdir;

    fn domain_with_layers(layers: Vec<LayerEntry>) -> (tempfile::TempDir, DomainState) {
        let dir = tempdir().unwrap();
        let registry = ServerRegistry::load(&dir.path().join("ServersList.xml")).unwrap();
        let mut domain = DomainState::new(registry);
        domain.layers = layers;
        (dir, domain)
    }

    fn layer(name: &str) -> LayerEntry {
        LayerEntry {
            name: Some(name.to_string()),
            title: None,
            depth: 0,
        }
    }

    #[test]
    fn test_navigation_wraps() {
        let (_dir, domain) = domain_with_layers(vec![layer("a"), layer("b")]);
        let mut home = HomeComponent::new();
        home.pane = Pane::Layers;
        home.reset_layer_cursor(&domain);

        home.next(&domain);
        assert_eq!(home.layer_state.selected(), Some(1));
        home.next(&domain);
        assert_eq!(home.layer_state.selected(), Some(0));
        home.previous(&domain);
        assert_eq!(home.layer_state.selected(), Some(1));
    }

    #[test]
    fn test_navigation_in_empty_pane_is_noop() {
        let (_dir, domain) = domain_with_layers(vec![]);
        let mut home = HomeComponent::new();
        home.pane = Pane::Layers;
        home.reset_layer_cursor(&domain);

        home.next(&domain);
        assert_eq!(home.layer_state.selected(), None);
    }

    #[test]
    fn test_enter_selects_server_in_server_pane() {
        let mut home = HomeComponent::new();
        let action = home
            .handle_key_event(KeyEvent::from(KeyCode::Enter))
            .unwrap();
        assert_eq!(action, Some(Action::SelectServer));

        home.switch_pane();
        let action = home
            .handle_key_event(KeyEvent::from(KeyCode::Enter))
            .unwrap();
        assert_eq!(action, Some(Action::ToggleLayer));
    }

    #[test]
    fn test_space_only_toggles_in_layer_pane() {
        let mut home = HomeComponent::new();
        let action = home
            .handle_key_event(KeyEvent::from(KeyCode::Char(' ')))
            .unwrap();
        assert_eq!(action, None);
    }

    #[test]
    fn test_control_chords_do_not_fire_letter_shortcuts() {
        let mut home = HomeComponent::new();
        for c in ['c', 'm', 's', 'q'] {
            let action = home
                .handle_key_event(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
                .unwrap();
            assert_eq!(action, None, "Ctrl+{c} must be inert here");
        }
    }

    #[test]
    fn test_first_next_on_unset_cursor_selects_first_item() {
        let (_dir, domain) = domain_with_layers(vec![layer("a"), layer("b"), layer("c")]);
        let mut home = HomeComponent::new();
        home.pane = Pane::Layers;
        assert_eq!(home.layer_state.selected(), None);

        home.next(&domain);
        assert_eq!(home.layer_state.selected(), Some(0));

        home.layer_state.select(None);
        home.previous(&domain);
        assert_eq!(home.layer_state.selected(), Some(0));
    }
}
