//! wms-tui - A terminal client for WMS map servers
//!
//! Browse a registry of WMS servers, fetch and inspect their advertised
//! layers, and download a rendered map image for the selected layers.
//! Built on the ratatui Component Architecture pattern.

mod action;
mod app;
mod component;
mod components;
mod config;
mod model;
mod services;
mod tui;

use crate::action::Action;
use crate::app::App;
use crate::component::Component;
use crate::config::Config;
use crate::services::ServerRegistry;
use crate::tui::Tui;
use anyhow::{Context, Result};
use crossterm::event::Event;
use std::time::Duration;

fn main() -> Result<()> {
    // A malformed config file is fatal; an absent one yields defaults.
    let config = Config::load().context("failed to load configuration")?;

    init_logging()?;

    // A registry that cannot be opened is fatal. An absent file is an
    // empty registry that gets created on the first mutation.
    let registry = ServerRegistry::load(&config.registry_path).with_context(|| {
        format!(
            "failed to open server registry: {}",
            config.registry_path.display()
        )
    })?;

    // Setup terminal
    let mut tui = Tui::new()?.with_tick_rate(Duration::from_millis(100));
    tui.enter()?;

    // Create app state
    let mut app = App::new(config, registry)?;
    app.init()?;

    // Main event loop
    let result = run_app(&mut tui, &mut app);

    // Cleanup terminal
    tui.exit()?;

    // Handle any errors
    if let Err(err) = result {
        eprintln!("Error: {:?}", err);
        std::process::exit(1);
    }

    Ok(())
}

/// Run the main application loop
fn run_app(tui: &mut Tui, app: &mut App) -> Result<()> {
    while !app.should_quit {
        // Draw the UI
        tui.draw(|frame| {
            if let Err(e) = app.draw(frame, frame.area()) {
                tracing::error!("draw error: {e}");
            }
        })?;

        // Poll for events
        if let Some(event) = tui.next_event()? {
            // Convert event to action
            let action = match event {
                Event::Key(key) => app.handle_key_event(key)?,
                Event::Resize(w, h) => Some(Action::Resize(w, h)),
                _ => None,
            };

            // Process the action; an action may produce a follow-up action
            if let Some(action) = action {
                let mut current_action = Some(action);
                while let Some(a) = current_action {
                    current_action = app.update(a)?;
                }
            }
        } else {
            // No event - send a tick for time-based updates
            app.update(Action::Tick)?;
        }
    }

    Ok(())
}

/// Initialize tracing to a log file.
///
/// Stderr would corrupt the alternate screen, so diagnostics go to
/// `~/.wms-tui/wms-tui.log`. The status line remains the user-facing
/// diagnostic channel.
fn init_logging() -> Result<()> {
    let Some(path) = Config::log_path() else {
        return Ok(());
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file: {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(file)
        .with_ansi(false)
        .init();

    Ok(())
}
