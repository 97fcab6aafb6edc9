use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use crate::ActorId;

/// What the engine needs to know about the hosting server.
pub trait HostEnvironment: Send + Sync {
    /// Whether a space (world) with this name is currently loaded.
    fn is_space_loaded(&self, space_id: &str) -> bool;

    /// Whether an optional integration, e.g. the platform layer, is running.
    fn is_extension_enabled(&self, name: &str) -> bool;

    /// Look up an online player by name.
    fn find_player(&self, name: &str) -> Option<ActorId>;
}

/// Host state kept in memory. Used by the replay binary and tests.
#[derive(Debug, Default)]
pub struct MemoryHost {
    spaces: RwLock<HashSet<String>>,
    extensions: RwLock<HashSet<String>>,
    // keyed by lower-cased name
    players: RwLock<HashMap<String, ActorId>>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_spaces<I, S>(self, spaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for space in spaces {
            self.load_space(space);
        }
        self
    }

    pub fn with_extension(self, name: impl Into<String>) -> Self {
        self.enable_extension(name);
        self
    }

    pub fn load_space(&self, space_id: impl Into<String>) {
        self.spaces.write().unwrap().insert(space_id.into());
    }

    pub fn unload_space(&self, space_id: &str) -> bool {
        self.spaces.write().unwrap().remove(space_id)
    }

    pub fn enable_extension(&self, name: impl Into<String>) {
        self.extensions.write().unwrap().insert(name.into());
    }

    pub fn disable_extension(&self, name: &str) -> bool {
        self.extensions.write().unwrap().remove(name)
    }

    pub fn player_online(&self, name: &str, id: ActorId) {
        self.players
            .write()
            .unwrap()
            .insert(name.to_lowercase(), id);
    }

    pub fn player_offline(&self, name: &str) -> Option<ActorId> {
        self.players.write().unwrap().remove(&name.to_lowercase())
    }
}

impl HostEnvironment for MemoryHost {
    fn is_space_loaded(&self, space_id: &str) -> bool {
        self.spaces.read().unwrap().contains(space_id)
    }

    fn is_extension_enabled(&self, name: &str) -> bool {
        self.extensions.read().unwrap().contains(name)
    }

    fn find_player(&self, name: &str) -> Option<ActorId> {
        self.players
            .read()
            .unwrap()
            .get(&name.to_lowercase())
            .copied()
    }
}
