//! GetCapabilities XML parsing
//!
//! Pull-parses the capabilities document into a flat, depth-annotated layer
//! list and recognizes ServiceExceptionReport bodies. Only `<Name>` and
//! `<Title>` elements sitting directly inside a `<Layer>` are consulted, so
//! the service-level `<Name>` and style names are ignored.

use crate::model::layer::LayerEntry;
use crate::services::wms::WmsError;
use quick_xml::events::Event;
use quick_xml::Reader;

const CAPABILITIES_ROOTS: [&[u8]; 2] = [b"WMT_MS_Capabilities", b"WMS_Capabilities"];

/// Parse a capabilities response body into the advertised layer tree.
pub fn parse_capabilities(xml: &str) -> Result<Vec<LayerEntry>, WmsError> {
    if let Some(message) = extract_exception_message(xml) {
        return Err(WmsError::ServiceException(message));
    }

    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut element_stack: Vec<Vec<u8>> = Vec::new();
    let mut layer_stack: Vec<usize> = Vec::new();
    let mut layers: Vec<LayerEntry> = Vec::new();
    let mut root_seen = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = e.name().as_ref().to_vec();
                if !root_seen {
                    root_seen = true;
                    if !CAPABILITIES_ROOTS.contains(&name.as_slice()) {
                        return Err(WmsError::InvalidCapabilities(format!(
                            "unexpected root element <{}>",
                            String::from_utf8_lossy(&name)
                        )));
                    }
                }
                if name == b"Layer" {
                    layers.push(LayerEntry {
                        name: None,
                        title: None,
                        depth: layer_stack.len(),
                    });
                    layer_stack.push(layers.len() - 1);
                }
                element_stack.push(name);
            }
            Ok(Event::Text(t)) => {
                // Only Name/Title directly under a Layer carry tree data
                let inside_layer = element_stack.len() >= 2
                    && element_stack[element_stack.len() - 2] == b"Layer";
                if inside_layer {
                    if let Some(&idx) = layer_stack.last() {
                        let text = t
                            .unescape()
                            .map_err(|e| {
                                WmsError::InvalidCapabilities(format!("bad text content: {e:?}"))
                            })?
                            .into_owned();
                        match element_stack.last().map(|n| n.as_slice()) {
                            Some(b"Name") if layers[idx].name.is_none() => {
                                layers[idx].name = Some(text);
                            }
                            Some(b"Title") if layers[idx].title.is_none() => {
                                layers[idx].title = Some(text);
                            }
                            _ => {}
                        }
                    }
                }
            }
            Ok(Event::End(e)) => {
                if e.name().as_ref() == b"Layer" {
                    layer_stack.pop();
                }
                element_stack.pop();
            }
            Ok(Event::Empty(e)) => {
                // Self-closing <Layer/> is a childless leaf
                if e.name().as_ref() == b"Layer" {
                    layers.push(LayerEntry {
                        name: None,
                        title: None,
                        depth: layer_stack.len(),
                    });
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(WmsError::InvalidCapabilities(format!(
                    "XML parsing error at position {}: {:?}",
                    reader.buffer_position(),
                    e
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    if !root_seen {
        return Err(WmsError::InvalidCapabilities(
            "response contains no XML elements".to_string(),
        ));
    }

    Ok(layers)
}

/// Check a GetMap response body for a service exception.
///
/// Image bytes fail the cheap leading-`<` check and are never parsed.
pub fn service_exception_message(body: &[u8]) -> Option<String> {
    let text = std::str::from_utf8(body).ok()?;
    if !text.trim_start().starts_with('<') {
        return None;
    }
    extract_exception_message(text)
}

/// Returns the exception text when the document root is a
/// ServiceExceptionReport, `None` for any other (or unparseable) body.
fn extract_exception_message(xml: &str) -> Option<String> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut is_report = false;
    let mut in_exception = false;
    let mut message = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"ServiceExceptionReport" if !is_report => is_report = true,
                _ if !is_report => return None,
                b"ServiceException" => in_exception = true,
                _ => {}
            },
            Ok(Event::Text(t)) if in_exception => {
                if let Ok(text) = t.unescape() {
                    if !message.is_empty() {
                        message.push_str("; ");
                    }
                    message.push_str(text.trim());
                }
            }
            Ok(Event::End(e)) => {
                if e.name().as_ref() == b"ServiceException" {
                    in_exception = false;
                }
            }
            Ok(Event::Eof) => break,
            Err(_) => return None,
            _ => {}
        }
        buf.clear();
    }

    if is_report {
        if message.is_empty() {
            message.push_str("unspecified service exception");
        }
        Some(message)
    } else {
        None
    }
}
