use std::collections::HashSet;

use uuid::Uuid;

use crate::LocationRecord;

/// Stable actor identity across sessions.
pub type ActorId = Uuid;

/// Capability names checked by the admin surface and group membership.
pub mod capability {
    pub const SET: &str = "playerspawn.set";
    pub const GROUP: &str = "playerspawn.group";
    pub const PLATFORM: &str = "playerspawn.floodgate";
    pub const DEFAULT: &str = "playerspawn.default";
    pub const RELOAD: &str = "playerspawn.reload";

    /// Capability granting membership in a named spawn group.
    pub fn group_member(group: &str) -> String {
        format!("playerspawn.group.{group}")
    }
}

/// Anything that can join, respawn or issue commands.
pub trait Actor {
    /// `None` for non-player senders such as the console.
    fn id(&self) -> Option<ActorId>;

    fn name(&self) -> &str;

    /// Current position, `None` when the actor has no body in any space.
    fn location(&self) -> Option<LocationRecord>;

    fn has_capability(&self, capability: &str) -> bool;
}

/// In-memory player used by the replay host and tests.
#[derive(Debug, Clone)]
pub struct Player {
    id: ActorId,
    name: String,
    location: Option<LocationRecord>,
    capabilities: HashSet<String>,
}

impl Player {
    pub fn new(id: ActorId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            location: None,
            capabilities: HashSet::new(),
        }
    }

    pub fn with_location(mut self, location: LocationRecord) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_capability(mut self, capability: impl Into<String>) -> Self {
        self.capabilities.insert(capability.into());
        self
    }

    pub fn set_location(&mut self, location: LocationRecord) {
        self.location = Some(location);
    }

    pub fn grant(&mut self, capability: impl Into<String>) {
        self.capabilities.insert(capability.into());
    }

    pub fn player_id(&self) -> ActorId {
        self.id
    }
}

impl Actor for Player {
    fn id(&self) -> Option<ActorId> {
        Some(self.id)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn location(&self) -> Option<LocationRecord> {
        self.location.clone()
    }

    fn has_capability(&self, capability: &str) -> bool {
        self.capabilities.contains(capability)
    }
}

/// The server console: every capability, no identity, no location.
#[derive(Debug, Clone, Copy, Default)]
pub struct Console;

impl Actor for Console {
    fn id(&self) -> Option<ActorId> {
        None
    }

    fn name(&self) -> &str {
        "console"
    }

    fn location(&self) -> Option<LocationRecord> {
        None
    }

    fn has_capability(&self, _capability: &str) -> bool {
        true
    }
}
