use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{LocationRecord, ScopeKey, StoreError};

const SPAWN_FILE_VERSION: u32 = 1;

/// A stored spawn location and whether it is in use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnEntry {
    pub enabled: bool,
    pub location: LocationRecord,
}

impl SpawnEntry {
    pub fn enabled(location: LocationRecord) -> Self {
        Self {
            enabled: true,
            location,
        }
    }
}

/// Persistent key/value storage for spawn entries.
///
/// `put` either fully succeeds, durably, or leaves the previous entry in
/// place.
pub trait ConfigStore: Send + Sync {
    fn get(&self, key: &ScopeKey) -> Option<SpawnEntry>;

    fn put(&self, key: ScopeKey, entry: SpawnEntry) -> Result<(), StoreError>;

    /// Group names with at least one stored entry, in first-seen order.
    fn groups(&self) -> Vec<String>;

    /// All entries in storage order.
    fn entries(&self) -> Vec<(ScopeKey, SpawnEntry)>;

    /// Re-read the backing storage.
    fn reload(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredSpawn {
    key: ScopeKey,
    entry: SpawnEntry,
}

#[derive(Debug, Serialize, Deserialize)]
struct SpawnFile {
    version: u32,
    entries: Vec<StoredSpawn>,
}

#[derive(Debug, Default, Clone)]
struct SpawnData {
    entries: Vec<StoredSpawn>,
    index: HashMap<ScopeKey, usize>,
}

impl SpawnData {
    fn from_entries(stored: Vec<StoredSpawn>) -> Self {
        let mut data = Self::default();
        for spawn in stored {
            if data.index.contains_key(&spawn.key) {
                warn!("duplicate spawn entry for {}, keeping the later one", spawn.key);
            }
            data.upsert(spawn.key, spawn.entry);
        }
        data
    }

    fn get(&self, key: &ScopeKey) -> Option<&SpawnEntry> {
        self.index.get(key).map(|&i| &self.entries[i].entry)
    }

    fn upsert(&mut self, key: ScopeKey, entry: SpawnEntry) {
        match self.index.get(&key) {
            Some(&i) => self.entries[i].entry = entry,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push(StoredSpawn { key, entry });
            }
        }
    }

    fn groups(&self) -> Vec<String> {
        let mut groups: Vec<String> = Vec::new();
        for spawn in &self.entries {
            if let Some(name) = spawn.key.group_name() {
                if !groups.iter().any(|g| g == name) {
                    groups.push(name.to_string());
                }
            }
        }
        groups
    }
}

fn read_spawn_file(path: &Path) -> Result<SpawnData, StoreError> {
    if !path.exists() {
        return Ok(SpawnData::default());
    }
    let content = fs::read_to_string(path).map_err(StoreError::Read)?;
    if content.trim().is_empty() {
        return Ok(SpawnData::default());
    }
    let file: SpawnFile = ron::from_str(&content)?;
    if file.version != SPAWN_FILE_VERSION {
        return Err(StoreError::UnsupportedVersion(file.version));
    }
    Ok(SpawnData::from_entries(file.entries))
}

/// Builder for [`SpawnStore`].
#[derive(Default)]
pub struct SpawnStoreBuilder {
    spawn_file: Option<PathBuf>,
}

impl SpawnStoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_spawn_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.spawn_file = Some(path.into());
        self
    }

    pub fn build(self) -> Result<SpawnStore, StoreError> {
        let data = match &self.spawn_file {
            Some(path) => {
                if let Some(dir) = path.parent() {
                    if !dir.as_os_str().is_empty() && !dir.exists() {
                        fs::create_dir_all(dir)?;
                    }
                }
                let data = read_spawn_file(path)?;
                debug!(
                    "loaded {} spawn entries from {}",
                    data.entries.len(),
                    path.display()
                );
                data
            }
            None => SpawnData::default(),
        };

        Ok(SpawnStore {
            file_path: self.spawn_file,
            data: RwLock::new(data),
        })
    }
}

/// RON-file backed [`ConfigStore`].
///
/// Writes go to a temporary file that is renamed over the spawn file, so a
/// crash mid-write leaves the previous contents intact.
pub struct SpawnStore {
    file_path: Option<PathBuf>,
    data: RwLock<SpawnData>,
}

impl SpawnStore {
    pub fn builder() -> SpawnStoreBuilder {
        SpawnStoreBuilder::new()
    }

    pub fn in_memory() -> Self {
        Self {
            file_path: None,
            data: RwLock::new(SpawnData::default()),
        }
    }

    pub fn len(&self) -> usize {
        self.data.read().unwrap().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn persist(&self, data: &SpawnData) -> Result<(), StoreError> {
        let Some(path) = &self.file_path else {
            return Ok(());
        };
        let file = SpawnFile {
            version: SPAWN_FILE_VERSION,
            entries: data.entries.clone(),
        };
        let text = ron::ser::to_string_pretty(&file, ron::ser::PrettyConfig::default())?;
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, text)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

impl ConfigStore for SpawnStore {
    fn get(&self, key: &ScopeKey) -> Option<SpawnEntry> {
        self.data.read().unwrap().get(key).cloned()
    }

    fn put(&self, key: ScopeKey, entry: SpawnEntry) -> Result<(), StoreError> {
        let mut data = self.data.write().unwrap();
        let mut next = data.clone();
        let label = key.to_string();
        next.upsert(key, entry);
        self.persist(&next)?;
        *data = next;
        info!("stored spawn {}", label);
        Ok(())
    }

    fn groups(&self) -> Vec<String> {
        self.data.read().unwrap().groups()
    }

    fn entries(&self) -> Vec<(ScopeKey, SpawnEntry)> {
        self.data
            .read()
            .unwrap()
            .entries
            .iter()
            .map(|s| (s.key.clone(), s.entry.clone()))
            .collect()
    }

    fn reload(&self) -> Result<(), StoreError> {
        let Some(path) = &self.file_path else {
            return Ok(());
        };
        let fresh = read_spawn_file(path)?;
        let count = fresh.entries.len();
        *self.data.write().unwrap() = fresh;
        info!("reloaded {} spawn entries from {}", count, path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Breadth;
    use pretty_assertions::assert_eq;

    fn entry(space: &str, x: f64) -> SpawnEntry {
        SpawnEntry::enabled(LocationRecord::at(space, x, 64.0, 0.0))
    }

    #[test]
    fn put_replaces_in_place() {
        let store = SpawnStore::in_memory();
        let key = ScopeKey::default_spawn(Breadth::Server);

        store.put(key.clone(), entry("world", 1.0)).unwrap();
        store.put(ScopeKey::new_player(), entry("world", 2.0)).unwrap();
        store.put(key.clone(), entry("world", 3.0)).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.get(&key), Some(entry("world", 3.0)));
        assert_eq!(store.entries()[0].0, key);
    }

    #[test]
    fn groups_keep_first_seen_order() {
        let store = SpawnStore::in_memory();
        store
            .put(ScopeKey::group("vip", Breadth::Server), entry("world", 0.0))
            .unwrap();
        store
            .put(ScopeKey::group("admin", Breadth::world("world")), entry("world", 0.0))
            .unwrap();
        store
            .put(ScopeKey::group("vip", Breadth::world("world")), entry("world", 0.0))
            .unwrap();
        store
            .put(ScopeKey::default_spawn(Breadth::Server), entry("world", 0.0))
            .unwrap();

        assert_eq!(store.groups(), vec!["vip".to_string(), "admin".to_string()]);
    }

    #[test]
    fn duplicate_keys_in_file_keep_the_later_entry() {
        let key = ScopeKey::default_spawn(Breadth::Server);
        let data = SpawnData::from_entries(vec![
            StoredSpawn {
                key: key.clone(),
                entry: entry("world", 1.0),
            },
            StoredSpawn {
                key: key.clone(),
                entry: entry("world", 2.0),
            },
        ]);
        assert_eq!(data.entries.len(), 1);
        assert_eq!(data.get(&key), Some(&entry("world", 2.0)));
    }
}
