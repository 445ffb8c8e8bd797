//! Component trait - Interface for UI components
//!
//! Each component owns its state, event handling, and rendering.
//! Components never mutate each other directly; they emit Actions and the
//! App applies them.

use crate::action::Action;
use anyhow::Result;
use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};

/// Trait for UI components
///
/// The flow is:
/// 1. `handle_key_event` - translate a key press into a semantic Action
/// 2. `update` - apply an Action to component state
/// 3. `draw` - render the component
pub trait Component {
    /// Initialize the component.
    ///
    /// Called once after creation, for setup that depends on runtime state.
    fn init(&mut self) -> Result<()> {
        Ok(())
    }

    /// Translate a key event into an Action.
    ///
    /// State changes belong in `update`; this method only decides what the
    /// key means.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let _ = key;
        Ok(None)
    }

    /// Apply an Action to component state.
    ///
    /// May return a follow-up Action to be processed next.
    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        let _ = action;
        Ok(None)
    }

    /// Render the component into `area`.
    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()>;
}
