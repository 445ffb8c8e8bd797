//! Server registry entries and their XML file shape
//!
//! The registry file is a small XML document:
//!
//! ```xml
//! <ServerList>
//!   <Server>
//!     <Name>topo</Name>
//!     <Url>http://www.gisnet.lv/cgi-bin/topo</Url>
//!   </Server>
//! </ServerList>
//! ```
//!
//! Optional `<Username>`/`<Password>` children are persisted for an entry
//! but never transmitted in any request.

use serde::{Deserialize, Serialize};

/// A single (name, URL) registry entry. Names are unique in the registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerEntry {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Url")]
    pub url: String,
    /// Stored but never sent; credential handling is an unfinished stub.
    #[serde(rename = "Username", default, skip_serializing_if = "String::is_empty")]
    pub username: String,
    #[serde(rename = "Password", default, skip_serializing_if = "String::is_empty")]
    pub password: String,
}

impl ServerEntry {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            username: String::new(),
            password: String::new(),
        }
    }
}

/// Document root of the registry file
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename = "ServerList")]
pub struct ServerList {
    #[serde(rename = "Server", default)]
    pub servers: Vec<ServerEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_xml_round_trip() {
        let list = ServerList {
            servers: vec![
                ServerEntry::new("topo", "http://www.gisnet.lv/cgi-bin/topo"),
                ServerEntry::new("local", "http://localhost:8080/wms"),
            ],
        };

        let xml = quick_xml::se::to_string(&list).unwrap();
        let parsed: ServerList = quick_xml::de::from_str(&xml).unwrap();

        assert_eq!(parsed.servers.len(), 2);
        assert_eq!(parsed.servers[0].name, "topo");
        assert_eq!(parsed.servers[1].url, "http://localhost:8080/wms");
    }

    #[test]
    fn test_empty_list_parses() {
        let parsed: ServerList = quick_xml::de::from_str("<ServerList/>").unwrap();
        assert!(parsed.servers.is_empty());
    }

    #[test]
    fn test_credentials_omitted_when_empty() {
        let list = ServerList {
            servers: vec![ServerEntry::new("topo", "http://example.org/wms")],
        };
        let xml = quick_xml::se::to_string(&list).unwrap();
        assert!(!xml.contains("Username"));
        assert!(!xml.contains("Password"));
    }
}
