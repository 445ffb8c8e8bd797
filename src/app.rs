//! Main application component
//!
//! Owns the domain state, the modal stack, and every child component.
//! Key events are routed to the top modal when one is open, otherwise to
//! the home screen; the resulting Actions all come back here to be applied.

use crate::action::Action;
use crate::component::Component;
use crate::components::{
    draw_home_screen, HelpDialog, HomeComponent, HomeRenderContext, MapViewDialog, QuitDialog,
    ServerManagerDialog,
};
use crate::config::Config;
use crate::model::domain::{DomainState, MapInfo};
use crate::model::modal::{Modal, ModalStack};
use crate::services::{wms, ServerRegistry};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use image::GenericImageView;
use ratatui::{layout::Rect, Frame};

/// Main application component
pub struct App {
    pub domain: DomainState,
    pub modals: ModalStack,
    pub config: Config,
    client: reqwest::blocking::Client,

    pub should_quit: bool,
    /// Last failed operation, shown in red on the status line until the
    /// next action replaces it
    pub error: Option<String>,
    pub status_message: Option<String>,

    pub home: HomeComponent,
    pub server_manager: ServerManagerDialog,
    pub map_view: MapViewDialog,
    pub quit_dialog: QuitDialog,
    pub help_dialog: HelpDialog,
}

impl App {
    pub fn new(config: Config, registry: ServerRegistry) -> Result<App> {
        let client = wms::new_client()?;
        Ok(App {
            domain: DomainState::new(registry),
            modals: ModalStack::new(),
            config,
            client,
            should_quit: false,
            error: None,
            status_message: None,
            home: HomeComponent::new(),
            server_manager: ServerManagerDialog::new(),
            map_view: MapViewDialog,
            quit_dialog: QuitDialog,
            help_dialog: HelpDialog::default(),
        })
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.error = None;
    }

    fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.status_message = None;
    }

    /// Make the server under the cursor the active server
    fn select_server(&mut self) {
        let Some(server) = self.home.highlighted_server(&self.domain).cloned() else {
            return;
        };
        let name = server.name.clone();
        self.domain.selection.server = Some(server);
        self.set_status(format!("Active server: {name}. Press c to fetch capabilities"));
    }

    /// Toggle the layer under the cursor in the GetMap selection.
    /// Group layers have no Name and cannot be requested.
    fn toggle_layer(&mut self) {
        let Some(name) = self
            .home
            .highlighted_layer(&self.domain)
            .filter(|layer| layer.is_requestable())
            .and_then(|layer| layer.name.clone())
        else {
            return;
        };
        self.domain.selection.toggle_layer(&name);
    }

    /// GetCapabilities for the active server, replacing the layer tree
    fn fetch_capabilities(&mut self) {
        let Some(server) = self.domain.selection.server.clone() else {
            self.set_status("No server selected");
            return;
        };

        match wms::fetch_capabilities(&self.client, &server.url) {
            Ok(layers) => {
                let count = layers.len();
                self.domain.layers = layers;
                self.domain.selection.clear_layers();
                self.home.reset_layer_cursor(&self.domain);
                self.set_status(format!("{count} layers loaded from {}", server.name));
            }
            Err(e) => {
                tracing::warn!(server = %server.url, error = %e, "GetCapabilities failed");
                self.set_error(format!("GetCapabilities failed: {e}"));
            }
        }
    }

    /// GetMap for the selected layers, writing the image to the output path
    fn fetch_map(&mut self) {
        let Some(server) = self.domain.selection.server.clone() else {
            self.set_status("No server selected");
            return;
        };
        let layer_csv = self.domain.selection.layer_csv();
        if layer_csv.is_empty() {
            self.set_status("No layers selected");
            return;
        }

        let bytes = match wms::fetch_map(&self.client, &server.url, &layer_csv) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(server = %server.url, error = %e, "GetMap failed");
                self.set_error(format!("GetMap failed: {e}"));
                return;
            }
        };

        let path = self.config.output_path.clone();
        if let Err(e) = wms::write_map_file(&path, &bytes) {
            self.set_error(format!("failed to write {}: {e}", path.display()));
            return;
        }

        let dimensions = image::load_from_memory(&bytes)
            .ok()
            .map(|img| img.dimensions());
        let format = image::guess_format(&bytes).ok().map(|f| format!("{f:?}"));

        self.domain.last_map = Some(MapInfo {
            path: path.clone(),
            byte_len: bytes.len(),
            dimensions,
            format,
            layers: layer_csv,
            fetched_at: chrono::Local::now(),
        });
        self.set_status(format!("Map saved to {}", path.display()));
        self.modals.push(Modal::MapView);
    }

    /// Apply a SaveServer mutation from the server manager form
    fn save_server(&mut self, original: Option<String>, entry: crate::model::server::ServerEntry) {
        let result = match &original {
            None => self.domain.registry.add(entry.clone()),
            Some(name) => self.domain.registry.update(name, entry.clone()),
        };

        match result {
            Ok(()) => {
                // Keep the active selection in step with an edited entry
                let was_active = match (&original, &self.domain.selection.server) {
                    (Some(name), Some(active)) => &active.name == name,
                    _ => false,
                };
                if was_active {
                    self.domain.selection.server =
                        self.domain.registry.get(&entry.name).cloned();
                }
                self.server_manager.refresh(&self.domain.registry);
                self.home.clamp_server_cursor(&self.domain);
                self.set_status(format!("Saved server '{}'", entry.name));
            }
            Err(e) => self.server_manager.set_error(e.to_string()),
        }
    }

    /// Apply a DeleteServer mutation from the server manager list
    fn delete_server(&mut self, name: String) {
        match self.domain.registry.remove(&name) {
            Ok(_) => {
                let was_active = self
                    .domain
                    .selection
                    .server
                    .as_ref()
                    .is_some_and(|s| s.name == name);
                if was_active {
                    self.domain.selection.server = None;
                    self.domain.selection.clear_layers();
                    self.domain.layers.clear();
                    self.home.reset_layer_cursor(&self.domain);
                }
                self.server_manager.refresh(&self.domain.registry);
                self.home.clamp_server_cursor(&self.domain);
                self.set_status(format!("Deleted server '{name}'"));
            }
            Err(e) => self.server_manager.set_error(e.to_string()),
        }
    }
}

impl Component for App {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        // Ctrl+C quits from anywhere, modal or not
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::ForceQuit));
        }

        // Only the top modal receives input
        match self.modals.top() {
            Some(Modal::QuitConfirm) => self.quit_dialog.handle_key_event(key),
            Some(Modal::ServerManager) => self.server_manager.handle_key_event(key),
            Some(Modal::MapView) => self.map_view.handle_key_event(key),
            Some(Modal::Help) => self.help_dialog.handle_key_event(key),
            None => self.home.handle_key_event(key),
        }
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::Tick | Action::Resize(_, _) => {}
            Action::ForceQuit => self.should_quit = true,

            Action::NextItem => self.home.next(&self.domain),
            Action::PrevItem => self.home.previous(&self.domain),
            Action::FirstItem => self.home.select_first(&self.domain),
            Action::LastItem => self.home.select_last(&self.domain),
            Action::SwitchPane => self.home.switch_pane(),

            Action::SelectServer => self.select_server(),
            Action::ToggleLayer => self.toggle_layer(),
            Action::FetchCapabilities => self.fetch_capabilities(),
            Action::FetchMap => self.fetch_map(),

            Action::OpenServerManager => {
                self.server_manager.open(&self.domain.registry);
                self.modals.push(Modal::ServerManager);
            }
            Action::OpenMapView => {
                if self.domain.last_map.is_some() {
                    self.modals.push(Modal::MapView);
                } else {
                    self.set_status("No map downloaded yet");
                }
            }
            Action::OpenHelp => {
                self.help_dialog.scroll_offset = 0;
                self.modals.push(Modal::Help);
            }
            Action::OpenQuitDialog => self.modals.push(Modal::QuitConfirm),
            Action::CloseModal => {
                self.modals.pop();
            }

            Action::SaveServer { original, entry } => self.save_server(original, entry),
            Action::DeleteServer(name) => self.delete_server(name),
        }

        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let ctx = HomeRenderContext {
            domain: &self.domain,
            error: self.error.as_deref(),
            status_message: self.status_message.as_deref(),
        };
        draw_home_screen(frame, area, &mut self.home, &ctx)?;

        match self.modals.top() {
            Some(Modal::QuitConfirm) => self.quit_dialog.draw(frame, area)?,
            Some(Modal::ServerManager) => self.server_manager.draw(frame, area)?,
            Some(Modal::MapView) => {
                if let Some(info) = &self.domain.last_map {
                    self.map_view.draw_with_info(frame, area, info)?;
                }
            }
            Some(Modal::Help) => self.help_dialog.draw(frame, area)?,
            None => {}
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::server::ServerEntry;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn test_app(dir: &tempfile::TempDir) -> App {
        let registry_path = dir.path().join("ServersList.xml");
        let config = Config {
            registry_path: registry_path.clone(),
            output_path: dir.path().join("map.png"),
        };
        let registry = ServerRegistry::load(&registry_path).unwrap();
        App::new(config, registry).unwrap()
    }

    #[test]
    fn test_fetch_capabilities_without_server_sets_status_only() {
        let dir = tempdir().unwrap();
        let mut app = test_app(&dir);

        app.update(Action::FetchCapabilities).unwrap();

        assert_eq!(app.status_message.as_deref(), Some("No server selected"));
        assert!(app.error.is_none());
        assert!(app.domain.layers.is_empty());
    }

    #[test]
    fn test_fetch_map_without_layers_sets_status_only() {
        let dir = tempdir().unwrap();
        let mut app = test_app(&dir);

        app.update(Action::FetchMap).unwrap();
        assert_eq!(app.status_message.as_deref(), Some("No server selected"));

        app.domain.selection.server = Some(ServerEntry::new("topo", "http://example.invalid/wms"));
        app.update(Action::FetchMap).unwrap();
        assert_eq!(app.status_message.as_deref(), Some("No layers selected"));
        assert!(app.domain.last_map.is_none());
    }

    #[test]
    fn test_select_server_activates_highlighted_entry() {
        let dir = tempdir().unwrap();
        let mut app = test_app(&dir);
        app.domain
            .registry
            .add(ServerEntry::new("topo", "http://www.gisnet.lv/cgi-bin/topo"))
            .unwrap();

        app.update(Action::SelectServer).unwrap();

        let active = app.domain.selection.server.as_ref().unwrap();
        assert_eq!(active.name, "topo");
    }

    #[test]
    fn test_save_server_adds_entry_and_refreshes() {
        let dir = tempdir().unwrap();
        let mut app = test_app(&dir);

        app.update(Action::SaveServer {
            original: None,
            entry: ServerEntry::new("topo", "http://example.org/wms"),
        })
        .unwrap();

        assert_eq!(app.domain.registry.len(), 1);
        assert!(app.status_message.as_deref().unwrap().contains("topo"));
    }

    #[test]
    fn test_save_duplicate_reports_error_in_dialog() {
        let dir = tempdir().unwrap();
        let mut app = test_app(&dir);
        app.domain
            .registry
            .add(ServerEntry::new("topo", "http://one.example"))
            .unwrap();

        app.update(Action::SaveServer {
            original: None,
            entry: ServerEntry::new("topo", "http://two.example"),
        })
        .unwrap();

        assert_eq!(app.domain.registry.len(), 1);
        assert!(app.server_manager.error.is_some());
    }

    #[test]
    fn test_editing_active_server_updates_selection() {
        let dir = tempdir().unwrap();
        let mut app = test_app(&dir);
        app.domain
            .registry
            .add(ServerEntry::new("topo", "http://old.example/wms"))
            .unwrap();
        app.update(Action::SelectServer).unwrap();

        app.update(Action::SaveServer {
            original: Some("topo".to_string()),
            entry: ServerEntry::new("topo2", "http://new.example/wms"),
        })
        .unwrap();

        let active = app.domain.selection.server.as_ref().unwrap();
        assert_eq!(active.name, "topo2");
        assert_eq!(active.url, "http://new.example/wms");
    }

    #[test]
    fn test_deleting_active_server_clears_selection_and_layers() {
        let dir = tempdir().unwrap();
        let mut app = test_app(&dir);
        app.domain
            .registry
            .add(ServerEntry::new("topo", "http://example.org/wms"))
            .unwrap();
        app.update(Action::SelectServer).unwrap();
        app.domain.layers = vec![crate::model::layer::LayerEntry {
            name: Some("roads".to_string()),
            title: None,
            depth: 0,
        }];
        app.domain.selection.toggle_layer("roads");

        app.update(Action::DeleteServer("topo".to_string())).unwrap();

        assert!(app.domain.selection.server.is_none());
        assert!(app.domain.layers.is_empty());
        assert!(app.domain.selection.layer_names.is_empty());
        assert!(app.domain.registry.is_empty());
    }

    #[test]
    fn test_quit_flow_via_modal() {
        let dir = tempdir().unwrap();
        let mut app = test_app(&dir);

        app.update(Action::OpenQuitDialog).unwrap();
        assert!(!app.should_quit);

        let action = app
            .handle_key_event(KeyEvent::from(KeyCode::Char('y')))
            .unwrap();
        assert_eq!(action, Some(Action::ForceQuit));

        app.update(Action::ForceQuit).unwrap();
        assert!(app.should_quit);
    }

    #[test]
    fn test_ctrl_c_force_quits_from_anywhere() {
        let dir = tempdir().unwrap();
        let mut app = test_app(&dir);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);

        // Home screen
        let action = app.handle_key_event(ctrl_c).unwrap();
        assert_eq!(action, Some(Action::ForceQuit));

        // With a modal open
        app.update(Action::OpenServerManager).unwrap();
        let action = app.handle_key_event(ctrl_c).unwrap();
        assert_eq!(action, Some(Action::ForceQuit));
    }

    #[test]
    fn test_help_modal_receives_scroll_keys() {
        let dir = tempdir().unwrap();
        let mut app = test_app(&dir);

        app.update(Action::OpenHelp).unwrap();
        assert_eq!(app.modals.top(), Some(&Modal::Help));
        assert_eq!(app.help_dialog.scroll_offset, 0);

        app.handle_key_event(KeyEvent::from(KeyCode::Char('j')))
            .unwrap();
        assert_eq!(app.help_dialog.scroll_offset, 1);
    }

    #[test]
    fn test_open_map_view_without_map_is_refused() {
        let dir = tempdir().unwrap();
        let mut app = test_app(&dir);

        app.update(Action::OpenMapView).unwrap();

        assert!(app.modals.top().is_none());
        assert_eq!(app.status_message.as_deref(), Some("No map downloaded yet"));
    }

    #[test]
    fn test_toggle_layer_ignores_group_layers() {
        let dir = tempdir().unwrap();
        let mut app = test_app(&dir);
        app.domain.layers = vec![crate::model::layer::LayerEntry {
            name: None,
            title: Some("Base layers".to_string()),
            depth: 0,
        }];
        app.home.switch_pane();
        app.home.reset_layer_cursor(&app.domain);

        app.update(Action::ToggleLayer).unwrap();

        assert!(app.domain.selection.layer_names.is_empty());
    }

    #[test]
    fn test_map_info_from_png_bytes() {
        let mut png = Vec::new();
        image::RgbaImage::new(4, 3)
            .write_to(
                &mut std::io::Cursor::new(&mut png),
                image::ImageFormat::Png,
            )
            .unwrap();

        let dims = image::load_from_memory(&png).ok().map(|img| img.dimensions());
        assert_eq!(dims, Some((4, 3)));

        let format = image::guess_format(&png).ok().map(|f| format!("{f:?}"));
        assert_eq!(format.as_deref(), Some("Png"));

        let info = MapInfo {
            path: PathBuf::from("map.png"),
            byte_len: png.len(),
            dimensions: dims,
            format,
            layers: "roads".to_string(),
            fetched_at: chrono::Local::now(),
        };
        assert_eq!(info.byte_len, png.len());
        assert!(!png.is_empty());
    }
}
