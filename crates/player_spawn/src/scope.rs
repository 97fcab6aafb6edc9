//! Addressing of stored spawn entries.
//!
//! A [`ScopeKey`] names one slot in the spawn table: what the location is used
//! for ([`Purpose`]), who it applies to ([`Scope`]) and whether it is bound to a
//! single world or serves the whole server ([`Breadth`]).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ActorId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Purpose {
    /// Join and rejoin teleports.
    Spawn,
    /// First join only.
    NewPlayer,
    /// After death.
    Respawn,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scope {
    Player(ActorId),
    Group(String),
    /// Actors admitted through the platform layer.
    Platform,
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Breadth {
    Server,
    World(String),
}

impl Breadth {
    pub fn world(name: impl Into<String>) -> Self {
        Breadth::World(name.into())
    }

    pub fn world_name(&self) -> Option<&str> {
        match self {
            Breadth::Server => None,
            Breadth::World(name) => Some(name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScopeKey {
    pub purpose: Purpose,
    pub scope: Scope,
    pub breadth: Breadth,
}

impl ScopeKey {
    pub fn new(purpose: Purpose, scope: Scope, breadth: Breadth) -> Self {
        Self {
            purpose,
            scope,
            breadth,
        }
    }

    pub fn player(id: ActorId, breadth: Breadth) -> Self {
        Self::new(Purpose::Spawn, Scope::Player(id), breadth)
    }

    pub fn group(name: impl Into<String>, breadth: Breadth) -> Self {
        Self::new(Purpose::Spawn, Scope::Group(name.into()), breadth)
    }

    pub fn platform(breadth: Breadth) -> Self {
        Self::new(Purpose::Spawn, Scope::Platform, breadth)
    }

    pub fn default_spawn(breadth: Breadth) -> Self {
        Self::new(Purpose::Spawn, Scope::Default, breadth)
    }

    pub fn new_player() -> Self {
        Self::new(Purpose::NewPlayer, Scope::Default, Breadth::Server)
    }

    pub fn platform_new_player() -> Self {
        Self::new(Purpose::NewPlayer, Scope::Platform, Breadth::Server)
    }

    pub fn respawn(breadth: Breadth) -> Self {
        Self::new(Purpose::Respawn, Scope::Default, breadth)
    }

    pub fn platform_respawn(breadth: Breadth) -> Self {
        Self::new(Purpose::Respawn, Scope::Platform, breadth)
    }

    pub fn group_name(&self) -> Option<&str> {
        match &self.scope {
            Scope::Group(name) => Some(name),
            _ => None,
        }
    }
}

/// Dotted path used in logs and listings, e.g. `players.<id>.worlds.world_nether`
/// or `floodgate.respawn.server`.
impl fmt::Display for ScopeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match (&self.scope, self.purpose) {
            (Scope::Player(id), _) => Some(format!("players.{id}")),
            (Scope::Group(name), _) => Some(format!("groups.{name}")),
            (Scope::Platform, _) => Some("floodgate".to_string()),
            (Scope::Default, Purpose::Spawn) => Some("default".to_string()),
            (Scope::Default, _) => None,
        };
        let purpose = match self.purpose {
            Purpose::Spawn => None,
            Purpose::NewPlayer => Some("new_player".to_string()),
            Purpose::Respawn => Some("respawn".to_string()),
        };
        let breadth = match (&self.breadth, self.purpose) {
            (Breadth::Server, Purpose::NewPlayer) => None,
            (Breadth::Server, _) => Some("server".to_string()),
            (Breadth::World(name), _) => Some(format!("worlds.{name}")),
        };

        let path: Vec<String> = [prefix, purpose, breadth].into_iter().flatten().collect();
        f.write_str(&path.join("."))
    }
}
