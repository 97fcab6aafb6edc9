use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use ron::value::{Map as RonMap, Value as RonValue};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{debug, info, warn};

use crate::{Settings, SettingsError};

/// Serialize a section into a `ron::Value` by way of its text form.
fn to_ron_value<T: Serialize>(value: &T) -> Result<RonValue, SettingsError> {
    let text = ron::to_string(value)?;
    Ok(ron::from_str(&text)?)
}

fn from_ron_value<T: DeserializeOwned>(value: &RonValue) -> Result<T, SettingsError> {
    Ok(T::deserialize(value.clone())?)
}

/// Overlay `delta` on top of `base`. Nested maps are merged key by key, any
/// other value in `delta` replaces the one in `base`.
fn overlay(base: &RonMap, delta: &RonMap) -> RonMap {
    let mut out = base.clone();
    for (key, patch) in delta.iter() {
        let merged = match (out.get(key), patch) {
            (Some(RonValue::Map(inner)), RonValue::Map(inner_patch)) => {
                RonValue::Map(overlay(inner, inner_patch))
            }
            _ => patch.clone(),
        };
        out.insert(key.clone(), merged);
    }
    out
}

/// Keys of `current` whose values differ from `defaults`, recursively.
fn changes(current: &RonMap, defaults: &RonMap) -> RonMap {
    let mut out = RonMap::new();
    for (key, value) in current.iter() {
        match (defaults.get(key), value) {
            (Some(RonValue::Map(default_inner)), RonValue::Map(inner)) => {
                let nested = changes(inner, default_inner);
                if !nested.is_empty() {
                    out.insert(key.clone(), RonValue::Map(nested));
                }
            }
            (Some(default), _) if default == value => {}
            _ => {
                out.insert(key.clone(), value.clone());
            }
        }
    }
    out
}

fn effective_value(defaults: &RonMap, delta: Option<&RonValue>) -> RonValue {
    match delta {
        Some(RonValue::Map(patch)) => RonValue::Map(overlay(defaults, patch)),
        Some(other) => {
            warn!("settings delta is not a map, ignoring it: {:?}", other);
            RonValue::Map(defaults.clone())
        }
        None => RonValue::Map(defaults.clone()),
    }
}

fn read_deltas(path: &Path) -> Result<HashMap<String, RonValue>, SettingsError> {
    if !path.exists() {
        return Ok(HashMap::new());
    }
    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(HashMap::new());
    }
    Ok(ron::from_str(&content)?)
}

/// Builder for [`SettingsStore`].
#[derive(Default)]
pub struct SettingsStoreBuilder {
    settings_file: Option<PathBuf>,
}

impl SettingsStoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.settings_file = Some(path.into());
        self
    }

    /// Build the store. Without a settings file the store lives purely in memory
    /// and `update` never touches the disk.
    pub fn build(self) -> Result<SettingsStore, SettingsError> {
        let deltas = match &self.settings_file {
            Some(path) => {
                if let Some(dir) = path.parent() {
                    if !dir.as_os_str().is_empty() && !dir.exists() {
                        fs::create_dir_all(dir)?;
                    }
                }
                let deltas = read_deltas(path)?;
                debug!(
                    "loaded {} settings section delta(s) from {}",
                    deltas.len(),
                    path.display()
                );
                deltas
            }
            None => HashMap::new(),
        };

        Ok(SettingsStore {
            file_path: self.settings_file,
            deltas: RwLock::new(deltas),
            sections: RwLock::new(HashMap::new()),
        })
    }
}

struct Section {
    defaults: RonMap,
    value: RonValue,
}

/// Thread-safe store of registered settings sections.
///
/// Readers get a deserialized snapshot (`Arc<T>`); writers go through
/// [`SettingsStore::update`], which persists the recursive diff against the
/// section defaults.
pub struct SettingsStore {
    file_path: Option<PathBuf>,
    deltas: RwLock<HashMap<String, RonValue>>,
    sections: RwLock<HashMap<&'static str, Section>>,
}

impl SettingsStore {
    pub fn builder() -> SettingsStoreBuilder {
        SettingsStoreBuilder::new()
    }

    /// A store with no backing file.
    pub fn in_memory() -> Self {
        Self {
            file_path: None,
            deltas: RwLock::new(HashMap::new()),
            sections: RwLock::new(HashMap::new()),
        }
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn is_registered<T: Settings>(&self) -> bool {
        self.sections.read().unwrap().contains_key(T::name())
    }

    /// Register a section. Its defaults come from `T::default()`; a delta
    /// already present in the settings file is applied on top.
    pub fn register<T>(&self) -> Result<(), SettingsError>
    where
        T: Settings + Default + Serialize + DeserializeOwned,
    {
        let section = T::name();
        if self.is_registered::<T>() {
            return Err(SettingsError::Invalid("section already registered"));
        }

        let defaults = match to_ron_value(&T::default())? {
            RonValue::Map(map) => map,
            _ => return Err(SettingsError::Invalid("section default must be a struct")),
        };
        let value = effective_value(&defaults, self.deltas.read().unwrap().get(section));

        // Reject a delta that no longer fits the section type up front.
        from_ron_value::<T>(&value)?;

        self.sections
            .write()
            .unwrap()
            .insert(section, Section { defaults, value });
        debug!("registered settings section '{}'", section);
        Ok(())
    }

    /// Snapshot of a section.
    pub fn get<T>(&self) -> Result<Arc<T>, SettingsError>
    where
        T: Settings + DeserializeOwned,
    {
        let sections = self.sections.read().unwrap();
        let section = sections
            .get(T::name())
            .ok_or(SettingsError::NotRegistered(T::name()))?;
        Ok(Arc::new(from_ron_value(&section.value)?))
    }

    /// Snapshot of a section, falling back to its defaults when it cannot be read.
    pub fn get_or_default<T>(&self) -> T
    where
        T: Settings + Default + Clone + DeserializeOwned,
    {
        match self.get::<T>() {
            Ok(value) => value.as_ref().clone(),
            Err(e) => {
                warn!("using defaults for settings section '{}': {}", T::name(), e);
                T::default()
            }
        }
    }

    /// Mutate a section and persist the resulting delta.
    pub fn update<T, F>(&self, mutator: F) -> Result<(), SettingsError>
    where
        T: Settings + Default + Serialize + DeserializeOwned,
        F: FnOnce(&mut T),
    {
        let name = T::name();
        let mut sections = self.sections.write().unwrap();
        let section = sections
            .get_mut(name)
            .ok_or(SettingsError::NotRegistered(name))?;

        let mut current: T = from_ron_value(&section.value)?;
        mutator(&mut current);

        let updated = match to_ron_value(&current)? {
            RonValue::Map(map) => map,
            _ => return Err(SettingsError::Invalid("section must serialize to a struct")),
        };
        let diff = changes(&updated, &section.defaults);

        let mut deltas = self.deltas.write().unwrap();
        let mut next = deltas.clone();
        if diff.is_empty() {
            next.remove(name);
        } else {
            next.insert(name.to_string(), RonValue::Map(diff));
        }
        self.persist(&next)?;

        *deltas = next;
        section.value = RonValue::Map(updated);
        info!("updated settings section '{}'", name);
        Ok(())
    }

    /// Re-read the settings file and re-apply it to every registered section.
    pub fn reload(&self) -> Result<(), SettingsError> {
        let Some(path) = &self.file_path else {
            return Ok(());
        };
        let fresh = read_deltas(path)?;

        let mut sections = self.sections.write().unwrap();
        for (name, section) in sections.iter_mut() {
            section.value = effective_value(&section.defaults, fresh.get(*name));
        }
        *self.deltas.write().unwrap() = fresh;
        info!("reloaded settings from {}", path.display());
        Ok(())
    }

    fn persist(&self, deltas: &HashMap<String, RonValue>) -> Result<(), SettingsError> {
        let Some(path) = &self.file_path else {
            return Ok(());
        };
        let text = ron::ser::to_string_pretty(deltas, ron::ser::PrettyConfig::default())?;
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, text)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&str, RonValue)]) -> RonMap {
        let mut m = RonMap::new();
        for (k, v) in entries {
            m.insert(RonValue::String((*k).to_string()), v.clone());
        }
        m
    }

    #[test]
    fn overlay_merges_nested_maps() {
        let base = map(&[
            ("a", RonValue::Bool(false)),
            ("inner", RonValue::Map(map(&[("x", RonValue::Bool(false)), ("y", RonValue::Bool(true))]))),
        ]);
        let delta = map(&[("inner", RonValue::Map(map(&[("x", RonValue::Bool(true))])))]);

        let merged = overlay(&base, &delta);
        let Some(RonValue::Map(inner)) = merged.get(&RonValue::String("inner".into())) else {
            panic!("inner should stay a map");
        };
        assert_eq!(inner.get(&RonValue::String("x".into())), Some(&RonValue::Bool(true)));
        assert_eq!(inner.get(&RonValue::String("y".into())), Some(&RonValue::Bool(true)));
        assert_eq!(merged.get(&RonValue::String("a".into())), Some(&RonValue::Bool(false)));
    }

    #[test]
    fn changes_drops_unchanged_keys() {
        let defaults = map(&[("a", RonValue::Bool(false)), ("b", RonValue::Bool(true))]);
        let current = map(&[("a", RonValue::Bool(true)), ("b", RonValue::Bool(true))]);

        let diff = changes(&current, &defaults);
        assert_eq!(diff.len(), 1);
        assert_eq!(diff.get(&RonValue::String("a".into())), Some(&RonValue::Bool(true)));
    }
}
