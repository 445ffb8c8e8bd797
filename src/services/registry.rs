//! Server registry service
//!
//! A name-keyed table of WMS servers backed by a small local XML file.
//! Every mutation writes the file back immediately; there is no separate
//! save step to forget.

use crate::model::server::{ServerEntry, ServerList};
use anyhow::{bail, Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Name-keyed server registry, persisted on every mutation
pub struct ServerRegistry {
    path: PathBuf,
    entries: BTreeMap<String, ServerEntry>,
}

impl ServerRegistry {
    /// Load the registry from `path`.
    ///
    /// An absent file yields an empty registry; the file is created on the
    /// first mutation. A file that exists but does not parse is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let mut entries = BTreeMap::new();

        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let list: ServerList = quick_xml::de::from_str(&contents)
                .with_context(|| format!("malformed server registry: {}", path.display()))?;
            for server in list.servers {
                entries.insert(server.name.clone(), server);
            }
        }

        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    /// All entries, sorted by name
    pub fn entries(&self) -> Vec<&ServerEntry> {
        self.entries.values().collect()
    }

    pub fn get(&self, name: &str) -> Option<&ServerEntry> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add a new entry; the name must not already be registered.
    pub fn add(&mut self, entry: ServerEntry) -> Result<()> {
        if self.entries.contains_key(&entry.name) {
            bail!("a server named '{}' already exists", entry.name);
        }
        self.entries.insert(entry.name.clone(), entry);
        self.persist()
    }

    /// Replace the entry registered under `original_name`, which may also
    /// rename it.
    pub fn update(&mut self, original_name: &str, entry: ServerEntry) -> Result<()> {
        if !self.entries.contains_key(original_name) {
            bail!("no server named '{}'", original_name);
        }
        if entry.name != original_name && self.entries.contains_key(&entry.name) {
            bail!("a server named '{}' already exists", entry.name);
        }
        self.entries.remove(original_name);
        self.entries.insert(entry.name.clone(), entry);
        self.persist()
    }

    /// Remove an entry by name
    pub fn remove(&mut self, name: &str) -> Result<ServerEntry> {
        let Some(removed) = self.entries.remove(name) else {
            bail!("no server named '{}'", name);
        };
        self.persist()?;
        Ok(removed)
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
        }

        let list = ServerList {
            servers: self.entries.values().cloned().collect(),
        };
        let body = quick_xml::se::to_string(&list).context("failed to serialize server registry")?;
        fs::write(&self.path, format!("{XML_DECL}\n{body}"))
            .with_context(|| format!("failed to write {}", self.path.display()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn registry_in(dir: &tempfile::TempDir) -> ServerRegistry {
        ServerRegistry::load(&dir.path().join("ServersList.xml")).unwrap()
    }

    #[test]
    fn test_absent_file_is_empty_registry() {
        let dir = tempdir().unwrap();
        let registry = registry_in(&dir);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_add_then_list_round_trips() {
        let dir = tempdir().unwrap();
        let mut registry = registry_in(&dir);

        registry
            .add(ServerEntry::new("topo", "http://www.gisnet.lv/cgi-bin/topo"))
            .unwrap();

        let entries = registry.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "topo");
        assert_eq!(entries[0].url, "http://www.gisnet.lv/cgi-bin/topo");
    }

    #[test]
    fn test_mutations_persist_across_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ServersList.xml");

        let mut registry = ServerRegistry::load(&path).unwrap();
        registry.add(ServerEntry::new("b", "http://b.example/wms")).unwrap();
        registry.add(ServerEntry::new("a", "http://a.example/wms")).unwrap();
        registry.add(ServerEntry::new("c", "http://c.example/wms")).unwrap();
        registry.remove("b").unwrap();

        let reloaded = ServerRegistry::load(&path).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.get("a").unwrap().url, "http://a.example/wms");
        assert!(reloaded.get("b").is_none());
        assert!(reloaded.get("c").is_some());
    }

    #[test]
    fn test_duplicate_add_fails() {
        let dir = tempdir().unwrap();
        let mut registry = registry_in(&dir);

        registry.add(ServerEntry::new("topo", "http://one.example")).unwrap();
        let err = registry.add(ServerEntry::new("topo", "http://two.example"));
        assert!(err.is_err());
        assert_eq!(registry.get("topo").unwrap().url, "http://one.example");
    }

    #[test]
    fn test_update_can_rename() {
        let dir = tempdir().unwrap();
        let mut registry = registry_in(&dir);

        registry.add(ServerEntry::new("old", "http://old.example")).unwrap();
        registry
            .update("old", ServerEntry::new("new", "http://new.example"))
            .unwrap();

        assert!(registry.get("old").is_none());
        assert_eq!(registry.get("new").unwrap().url, "http://new.example");
    }

    #[test]
    fn test_update_and_remove_of_missing_names_fail() {
        let dir = tempdir().unwrap();
        let mut registry = registry_in(&dir);

        assert!(registry.update("ghost", ServerEntry::new("x", "http://x")).is_err());
        assert!(registry.remove("ghost").is_err());
    }

    #[test]
    fn test_malformed_file_is_a_load_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ServersList.xml");
        fs::write(&path, "<ServerList><Server>").unwrap();

        assert!(ServerRegistry::load(&path).is_err());
    }

    #[test]
    fn test_n_entries_load_as_n_pairs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ServersList.xml");
        fs::write(
            &path,
            r#"<?xml version="1.0" encoding="UTF-8"?>
<ServerList>
  <Server><Name>one</Name><Url>http://one.example/wms</Url></Server>
  <Server><Name>two</Name><Url>http://two.example/wms</Url></Server>
  <Server><Name>three</Name><Url>http://three.example/wms</Url></Server>
</ServerList>"#,
        )
        .unwrap();

        let registry = ServerRegistry::load(&path).unwrap();
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.get("two").unwrap().url, "http://two.example/wms");
    }
}
