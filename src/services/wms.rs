//! WMS request building and fetching
//!
//! One blocking GET per user action, no retry. The GetMap bounding box,
//! size, format, and SRS are fixed; only the base URL and layer list vary.

use crate::model::layer::LayerEntry;
use crate::services::capabilities;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

pub const WMS_VERSION: &str = "1.1.1";
pub const MAP_FORMAT: &str = "image/png";
pub const MAP_WIDTH: u32 = 800;
pub const MAP_HEIGHT: u32 = 600;
pub const MAP_SRS: &str = "EPSG:3059";
pub const MAP_BBOX: &str = "584344,397868,585500,398500";

/// Per-request timeout; a dead server must not hang the UI forever.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Failure kinds of a WMS fetch
#[derive(Debug, Error)]
pub enum WmsError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("server returned HTTP {0}")]
    HttpStatus(StatusCode),
    #[error("service exception: {0}")]
    ServiceException(String),
    #[error("not a valid capabilities response: {0}")]
    InvalidCapabilities(String),
}

/// Build a blocking HTTP client with the fetch timeout applied
pub fn new_client() -> Result<Client, WmsError> {
    let client = Client::builder().timeout(FETCH_TIMEOUT).build()?;
    Ok(client)
}

/// GetCapabilities request URL for a base server URL
pub fn capabilities_url(base_url: &str) -> String {
    format!("{base_url}?request=GetCapabilities&service=wms&version={WMS_VERSION}")
}

/// GetMap request URL for a base server URL and comma-joined layer list
pub fn map_url(base_url: &str, layer_csv: &str) -> String {
    format!(
        "{base_url}?service=WMS&request=GetMap&version={WMS_VERSION}&format={MAP_FORMAT}\
         &width={MAP_WIDTH}&height={MAP_HEIGHT}&srs={MAP_SRS}&layers={layer_csv}&bbox={MAP_BBOX}"
    )
}

/// Fetch and parse the layer tree advertised by a server.
///
/// Blocks the calling thread for the duration of the request.
pub fn fetch_capabilities(client: &Client, base_url: &str) -> Result<Vec<LayerEntry>, WmsError> {
    let url = capabilities_url(base_url);
    tracing::info!(%url, "fetching capabilities");

    let response = client.get(&url).send()?;
    let status = response.status();
    if !status.is_success() {
        return Err(WmsError::HttpStatus(status));
    }

    let xml = response.text()?;
    capabilities::parse_capabilities(&xml)
}

/// Fetch the rendered map for the given layers.
///
/// Returns the raw response bytes; callers write them out unmodified.
pub fn fetch_map(client: &Client, base_url: &str, layer_csv: &str) -> Result<Vec<u8>, WmsError> {
    let url = map_url(base_url, layer_csv);
    tracing::info!(%url, "fetching map");

    let response = client.get(&url).send()?;
    let status = response.status();
    if !status.is_success() {
        return Err(WmsError::HttpStatus(status));
    }

    let bytes = response.bytes()?;
    if let Some(message) = capabilities::service_exception_message(&bytes) {
        return Err(WmsError::ServiceException(message));
    }

    Ok(bytes.to_vec())
}

/// Write map bytes verbatim to the output file
pub fn write_map_file(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    std::fs::write(path, bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_capabilities_url_shape() {
        assert_eq!(
            capabilities_url("http://www.gisnet.lv/cgi-bin/topo"),
            "http://www.gisnet.lv/cgi-bin/topo?request=GetCapabilities&service=wms&version=1.1.1"
        );
    }

    #[test]
    fn test_map_url_shape() {
        let url = map_url("http://example.org/wms", "roads,water");
        assert_eq!(
            url,
            "http://example.org/wms?service=WMS&request=GetMap&version=1.1.1&format=image/png\
             &width=800&height=600&srs=EPSG:3059&layers=roads,water\
             &bbox=584344,397868,585500,398500"
        );
    }

    #[test]
    fn test_map_bytes_written_unmodified() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("map.png");
        let bytes: Vec<u8> = (0u16..300).map(|b| (b % 256) as u8).collect();

        write_map_file(&path, &bytes).unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), bytes);
    }
}
