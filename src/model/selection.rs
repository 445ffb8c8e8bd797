//! Selection state for the main window
//!
//! One explicit struct for what the user has picked: the active server
//! (or none) and the set of layer names chosen for GetMap, kept in the
//! order they were toggled on.

use super::server::ServerEntry;

/// The active server and chosen layers
#[derive(Debug, Clone, Default)]
pub struct Selection {
    /// Active server, `None` until the user picks one
    pub server: Option<ServerEntry>,
    /// Chosen layer names in selection order
    pub layer_names: Vec<String>,
}

impl Selection {
    /// Toggle a layer name in or out of the selection
    pub fn toggle_layer(&mut self, name: &str) {
        if let Some(pos) = self.layer_names.iter().position(|n| n == name) {
            self.layer_names.remove(pos);
        } else {
            self.layer_names.push(name.to_string());
        }
    }

    pub fn is_layer_selected(&self, name: &str) -> bool {
        self.layer_names.iter().any(|n| n == name)
    }

    /// Comma-joined layer list for the GetMap `layers=` parameter
    pub fn layer_csv(&self) -> String {
        self.layer_names.join(",")
    }

    /// Drop the chosen layers, e.g. after the layer tree is rebuilt
    pub fn clear_layers(&mut self) {
        self.layer_names.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_csv_keeps_selection_order() {
        let mut selection = Selection::default();
        selection.toggle_layer("water");
        selection.toggle_layer("roads");
        selection.toggle_layer("buildings");
        assert_eq!(selection.layer_csv(), "water,roads,buildings");
    }

    #[test]
    fn test_toggle_removes_on_second_press() {
        let mut selection = Selection::default();
        selection.toggle_layer("roads");
        assert!(selection.is_layer_selected("roads"));
        selection.toggle_layer("roads");
        assert!(!selection.is_layer_selected("roads"));
        assert_eq!(selection.layer_csv(), "");
    }

    #[test]
    fn test_no_server_selected_by_default() {
        let selection = Selection::default();
        assert!(selection.server.is_none());
        assert!(selection.layer_names.is_empty());
    }
}
