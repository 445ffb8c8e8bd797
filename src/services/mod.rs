//! External service interactions
//!
//! - Server registry load/persist (local XML file)
//! - WMS GetCapabilities / GetMap requests
//! - Capabilities XML parsing

pub mod capabilities;
pub mod registry;
pub mod wms;

pub use registry::ServerRegistry;
