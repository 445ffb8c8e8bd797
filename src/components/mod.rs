//! UI Components
//!
//! Each component encapsulates its own state, event handling, and rendering.
//! Components communicate through Actions rather than direct state mutation.

pub mod help_dialog;
pub mod home;
pub mod layout;
pub mod map_view;
pub mod quit_dialog;
pub mod server_manager;

pub use help_dialog::HelpDialog;
pub use home::{draw_home_screen, HomeComponent, HomeRenderContext};
pub use layout::{calculate_main_layout, centered_popup};
pub use map_view::MapViewDialog;
pub use quit_dialog::QuitDialog;
pub use server_manager::ServerManagerDialog;
