//! Action enum - All possible application actions
//!
//! Actions are discrete operations that the application can perform.
//! Components emit Actions in response to events, and the App processes
//! them to update state. Dialogs talk to the main window through these
//! typed actions instead of any publish/subscribe machinery.

use crate::model::server::ServerEntry;
use std::fmt;

/// All possible actions in the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // ─────────────────────────────────────────────────────────────────────────
    // App Lifecycle
    // ─────────────────────────────────────────────────────────────────────────
    /// Regular tick while no input is pending
    Tick,
    /// Terminal was resized
    Resize(u16, u16),
    /// Quit without confirmation
    ForceQuit,

    // ─────────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────────
    /// Move to next item in the focused pane
    NextItem,
    /// Move to previous item in the focused pane
    PrevItem,
    /// Jump to first item
    FirstItem,
    /// Jump to last item
    LastItem,
    /// Toggle focus between the server pane and the layer pane
    SwitchPane,

    // ─────────────────────────────────────────────────────────────────────────
    // Selection
    // ─────────────────────────────────────────────────────────────────────────
    /// Make the highlighted server the active server
    SelectServer,
    /// Toggle the highlighted layer in the GetMap selection
    ToggleLayer,

    // ─────────────────────────────────────────────────────────────────────────
    // WMS Requests
    // ─────────────────────────────────────────────────────────────────────────
    /// Fetch GetCapabilities for the active server and rebuild the layer tree
    FetchCapabilities,
    /// Fetch GetMap for the selected layers and save the image
    FetchMap,

    // ─────────────────────────────────────────────────────────────────────────
    // Modals
    // ─────────────────────────────────────────────────────────────────────────
    /// Open the server manager dialog
    OpenServerManager,
    /// Reopen the viewer for the last downloaded map
    OpenMapView,
    /// Open help dialog showing all keyboard shortcuts
    OpenHelp,
    /// Open quit confirmation dialog
    OpenQuitDialog,
    /// Close the current modal
    CloseModal,

    // ─────────────────────────────────────────────────────────────────────────
    // Registry Mutations (emitted by the server manager dialog)
    // ─────────────────────────────────────────────────────────────────────────
    /// Persist a new or edited server entry.
    /// `original` is the pre-edit name, `None` for a brand new entry.
    SaveServer {
        original: Option<String>,
        entry: ServerEntry,
    },
    /// Remove a server entry by name
    DeleteServer(String),
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Tick => write!(f, "Tick"),
            Action::Resize(w, h) => write!(f, "Resize({}, {})", w, h),
            Action::ForceQuit => write!(f, "ForceQuit"),
            Action::NextItem => write!(f, "NextItem"),
            Action::PrevItem => write!(f, "PrevItem"),
            Action::FirstItem => write!(f, "FirstItem"),
            Action::LastItem => write!(f, "LastItem"),
            Action::SwitchPane => write!(f, "SwitchPane"),
            Action::SelectServer => write!(f, "SelectServer"),
            Action::ToggleLayer => write!(f, "ToggleLayer"),
            Action::FetchCapabilities => write!(f, "FetchCapabilities"),
            Action::FetchMap => write!(f, "FetchMap"),
            Action::OpenServerManager => write!(f, "OpenServerManager"),
            Action::OpenMapView => write!(f, "OpenMapView"),
            Action::OpenHelp => write!(f, "OpenHelp"),
            Action::OpenQuitDialog => write!(f, "OpenQuitDialog"),
            Action::CloseModal => write!(f, "CloseModal"),
            Action::SaveServer { entry, .. } => write!(f, "SaveServer({})", entry.name),
            Action::DeleteServer(name) => write!(f, "DeleteServer({})", name),
        }
    }
}
