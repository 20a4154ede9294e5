//! Flat key-value stores
//!
//! The key-value backend only needs string get/set/delete. `MemoryStore`
//! keeps entries in process (clones share them); `TomlStore` keeps a flat
//! string table in one TOML file.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use hashbrown::HashMap;

use super::error::PersistenceError;
use super::file::write_atomic;

pub trait KeyValueStore {
    fn get_string(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    fn set_string(&mut self, key: &str, value: &str) -> Result<(), PersistenceError>;

    /// Returns whether the key existed.
    fn delete_key(&mut self, key: &str) -> Result<bool, PersistenceError>;

    fn has_key(&self, key: &str) -> Result<bool, PersistenceError> {
        Ok(self.get_string(key)?.is_some())
    }

    /// Make previous writes durable.
    fn flush(&mut self) -> Result<(), PersistenceError> {
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// In-memory store
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_string(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set_string(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete_key(&mut self, key: &str) -> Result<bool, PersistenceError> {
        Ok(self.entries.borrow_mut().remove(key).is_some())
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// TOML file store
// ═══════════════════════════════════════════════════════════════════════════

/// Flat `key = "value"` table in one TOML file.
///
/// Every operation reads the file; writes replace it atomically. A
/// malformed file is reported, never silently overwritten.
#[derive(Debug, Clone)]
pub struct TomlStore {
    path: PathBuf,
}

impl TomlStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_table(&self) -> Result<BTreeMap<String, String>, PersistenceError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(PersistenceError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        toml::from_str(&content).map_err(|source| PersistenceError::StoreFormat {
            path: self.path.clone(),
            source,
        })
    }

    fn write_table(&self, table: &BTreeMap<String, String>) -> Result<(), PersistenceError> {
        let content = toml::to_string_pretty(table).map_err(PersistenceError::StoreSerialize)?;
        write_atomic(&self.path, &content)
    }
}

impl KeyValueStore for TomlStore {
    fn get_string(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.read_table()?.remove(key))
    }

    fn set_string(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        let mut table = self.read_table()?;
        table.insert(key.to_string(), value.to_string());
        self.write_table(&table)
    }

    fn delete_key(&mut self, key: &str) -> Result<bool, PersistenceError> {
        let mut table = self.read_table()?;
        if table.remove(key).is_none() {
            return Ok(false);
        }
        self.write_table(&table)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_clones_share_entries() {
        let mut store = MemoryStore::new();
        let view = store.clone();
        store.set_string("a", "1").unwrap();

        assert_eq!(view.get_string("a").unwrap().as_deref(), Some("1"));
        assert!(store.delete_key("a").unwrap());
        assert!(!store.delete_key("a").unwrap());
        assert!(view.is_empty());
    }

    #[test]
    fn toml_store_keeps_unrelated_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = TomlStore::new(dir.path().join("store.toml"));

        assert!(!store.has_key("volume").unwrap());
        store.set_string("volume", "0.8").unwrap();
        store.set_string("hourglass.countdown_timers", "{\n  \"timers\": []\n}").unwrap();
        assert!(store.delete_key("hourglass.countdown_timers").unwrap());

        let reopened = TomlStore::new(dir.path().join("store.toml"));
        assert_eq!(reopened.get_string("volume").unwrap().as_deref(), Some("0.8"));
        assert!(!reopened.has_key("hourglass.countdown_timers").unwrap());
    }

    #[test]
    fn toml_store_refuses_to_overwrite_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.toml");
        std::fs::write(&path, "this is = = not toml").unwrap();

        let mut store = TomlStore::new(&path);
        assert!(matches!(
            store.set_string("k", "v"),
            Err(PersistenceError::StoreFormat { .. })
        ));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "this is = = not toml");
    }
}
