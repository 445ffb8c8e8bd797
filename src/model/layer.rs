//! Layer tree entries parsed from a GetCapabilities response
//!
//! The nested `<Layer>` structure is flattened into a depth-annotated list,
//! which is what the tree widget renders. A layer without a `<Name>` is a
//! grouping node and cannot be requested in a GetMap.

/// One node of the advertised layer tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerEntry {
    /// Machine name used in GetMap requests; absent for group layers
    pub name: Option<String>,
    /// Human-readable title, when advertised
    pub title: Option<String>,
    /// Nesting depth, 0 for top-level layers
    pub depth: usize,
}

impl LayerEntry {
    /// Whether this layer can appear in a GetMap `layers=` list
    pub fn is_requestable(&self) -> bool {
        self.name.is_some()
    }

    /// Label shown in the tree widget
    pub fn display_label(&self) -> &str {
        match (&self.name, &self.title) {
            (Some(name), _) => name,
            (None, Some(title)) => title,
            (None, None) => "(unnamed layer)",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_layer_is_not_requestable() {
        let group = LayerEntry {
            name: None,
            title: Some("Base maps".to_string()),
            depth: 0,
        };
        assert!(!group.is_requestable());
        assert_eq!(group.display_label(), "Base maps");
    }

    #[test]
    fn test_named_layer_label_prefers_name() {
        let layer = LayerEntry {
            name: Some("roads".to_string()),
            title: Some("Road network".to_string()),
            depth: 1,
        };
        assert!(layer.is_requestable());
        assert_eq!(layer.display_label(), "roads");
    }
}
