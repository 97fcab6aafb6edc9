//! Integration tests for the SettingsStore:
//! - only changed (delta) fields reach the file
//! - reloading after an external edit
//! - in-memory stores never touch the disk

use std::collections::HashMap;
use std::fs;

use serde::{Deserialize, Serialize};
use settings::{Settings, SettingsError, SettingsStore};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct Respawn {
    enabled: bool,
    use_player_spawn: bool,
    nested: Nested,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct Nested {
    delay_ticks: u32,
    label: Option<String>,
}

impl Default for Respawn {
    fn default() -> Self {
        Self {
            enabled: false,
            use_player_spawn: true,
            nested: Nested {
                delay_ticks: 5,
                label: None,
            },
        }
    }
}

impl Settings for Respawn {
    const SECTION: &'static str = "respawn";
}

fn section_keys(content: &str, section: &str) -> Vec<String> {
    let root: HashMap<String, ron::Value> = ron::from_str(content).expect("parse delta RON");
    let ron::Value::Map(entries) = root.get(section).expect("section present") else {
        panic!("section should be a map");
    };
    entries
        .iter()
        .filter_map(|(k, _)| match k {
            ron::Value::String(s) => Some(s.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn update_persists_only_changed_fields() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.ron");

    let store = SettingsStore::builder()
        .with_settings_file(&path)
        .build()
        .expect("build store");
    store.register::<Respawn>().expect("register");

    // Nothing written until the first change.
    assert!(!path.exists());

    let initial = store.get::<Respawn>().expect("get");
    assert_eq!(*initial, Respawn::default());

    store
        .update::<Respawn, _>(|r| r.enabled = true)
        .expect("update enabled");

    let content = fs::read_to_string(&path).expect("read delta");
    let keys = section_keys(&content, "respawn");
    assert_eq!(keys, vec!["enabled".to_string()]);

    store
        .update::<Respawn, _>(|r| r.nested.label = Some("arena".into()))
        .expect("update nested");
    let content = fs::read_to_string(&path).expect("read delta");
    let mut keys = section_keys(&content, "respawn");
    keys.sort();
    assert_eq!(keys, vec!["enabled".to_string(), "nested".to_string()]);

    let current = store.get::<Respawn>().expect("get after update");
    assert!(current.enabled);
    assert!(current.use_player_spawn);
    assert_eq!(current.nested.delay_ticks, 5);
    assert_eq!(current.nested.label.as_deref(), Some("arena"));
}

#[test]
fn reverting_to_defaults_removes_the_section() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.ron");

    let store = SettingsStore::builder()
        .with_settings_file(&path)
        .build()
        .expect("build store");
    store.register::<Respawn>().expect("register");

    store.update::<Respawn, _>(|r| r.enabled = true).expect("on");
    store.update::<Respawn, _>(|r| r.enabled = false).expect("off");

    let root: HashMap<String, ron::Value> =
        ron::from_str(&fs::read_to_string(&path).expect("read")).expect("parse");
    assert!(!root.contains_key("respawn"));
}

#[test]
fn existing_file_is_applied_on_register_and_reload() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.ron");
    fs::write(&path, r#"{ "respawn": { "enabled": true } }"#).expect("seed file");

    let store = SettingsStore::builder()
        .with_settings_file(&path)
        .build()
        .expect("build store");
    store.register::<Respawn>().expect("register");
    assert!(store.get::<Respawn>().expect("get").enabled);

    fs::write(
        &path,
        r#"{ "respawn": { "use_player_spawn": false, "nested": { "delay_ticks": 20 } } }"#,
    )
    .expect("external edit");
    store.reload().expect("reload");

    let current = store.get::<Respawn>().expect("get after reload");
    assert!(!current.enabled, "enabled was dropped from the file");
    assert!(!current.use_player_spawn);
    assert_eq!(current.nested.delay_ticks, 20);
    assert_eq!(current.nested.label, None);
}

#[test]
fn in_memory_store_never_writes() {
    let store = SettingsStore::in_memory();
    store.register::<Respawn>().expect("register");
    store.update::<Respawn, _>(|r| r.enabled = true).expect("update");

    assert!(store.file_path().is_none());
    assert!(store.get::<Respawn>().expect("get").enabled);
    store.reload().expect("reload is a no-op");
    assert!(store.get::<Respawn>().expect("get").enabled);
}

#[test]
fn unregistered_and_duplicate_sections_are_errors() {
    let store = SettingsStore::in_memory();
    assert!(matches!(
        store.get::<Respawn>(),
        Err(SettingsError::NotRegistered("respawn"))
    ));
    assert_eq!(store.get_or_default::<Respawn>(), Respawn::default());

    store.register::<Respawn>().expect("register");
    assert!(matches!(
        store.register::<Respawn>(),
        Err(SettingsError::Invalid(_))
    ));
}
