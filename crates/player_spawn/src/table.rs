use std::sync::Arc;

use tracing::debug;

use crate::{ConfigStore, HostEnvironment, LocationRecord, ScopeKey, SpawnEntry, StoreError};

/// Validated view over the spawn store.
///
/// A read only yields entries that are enabled and point at a loaded space;
/// anything else reads as absent so the resolution cascade falls through.
#[derive(Clone)]
pub struct ScopeTable {
    store: Arc<dyn ConfigStore>,
    host: Arc<dyn HostEnvironment>,
}

impl ScopeTable {
    pub fn new(store: Arc<dyn ConfigStore>, host: Arc<dyn HostEnvironment>) -> Self {
        Self { store, host }
    }

    pub fn store(&self) -> &Arc<dyn ConfigStore> {
        &self.store
    }

    pub fn read(&self, key: &ScopeKey) -> Option<SpawnEntry> {
        let entry = self.store.get(key)?;
        if !entry.enabled {
            return None;
        }
        if !self.host.is_space_loaded(entry.location.space_id()) {
            debug!(
                "spawn {} points at unloaded world '{}', skipping it",
                key,
                entry.location.space_id()
            );
            return None;
        }
        Some(entry)
    }

    pub fn location(&self, key: &ScopeKey) -> Option<LocationRecord> {
        self.read(key).map(|entry| entry.location)
    }

    /// Store `location` as an enabled entry.
    pub fn write(&self, key: ScopeKey, location: LocationRecord) -> Result<(), StoreError> {
        if !location.is_finite() {
            return Err(StoreError::MalformedCoordinate(location.to_string()));
        }
        self.store.put(key, SpawnEntry::enabled(location))
    }

    /// Keep the entry but stop using it. Returns whether an enabled entry existed.
    pub fn disable(&self, key: ScopeKey) -> Result<bool, StoreError> {
        match self.store.get(&key) {
            Some(mut entry) if entry.enabled => {
                entry.enabled = false;
                self.store.put(key, entry)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    pub fn configured_groups(&self) -> Vec<String> {
        self.store.groups()
    }
}
