//! Domain state - business/data state separate from UI concerns

use super::layer::LayerEntry;
use super::selection::Selection;
use crate::services::ServerRegistry;
use chrono::{DateTime, Local};
use std::path::PathBuf;

/// Metadata about the last downloaded map, shown in the viewer overlay
#[derive(Debug, Clone)]
pub struct MapInfo {
    /// Where the raw response bytes were written
    pub path: PathBuf,
    pub byte_len: usize,
    /// Pixel dimensions, when the bytes decode as an image
    pub dimensions: Option<(u32, u32)>,
    /// Detected image format, when recognizable
    pub format: Option<String>,
    /// The comma-joined layer list the map was requested with
    pub layers: String,
    pub fetched_at: DateTime<Local>,
}

/// Domain state containing all business data
pub struct DomainState {
    /// The server registry, persisted to its XML file on every mutation
    pub registry: ServerRegistry,

    /// Layer tree from the last successful GetCapabilities; transient,
    /// replaced wholesale on refetch
    pub layers: Vec<LayerEntry>,

    /// Active server and chosen layers
    pub selection: Selection,

    /// Last downloaded map, if any
    pub last_map: Option<MapInfo>,
}

impl DomainState {
    pub fn new(registry: ServerRegistry) -> Self {
        Self {
            registry,
            layers: Vec::new(),
            selection: Selection::default(),
            last_map: None,
        }
    }
}
