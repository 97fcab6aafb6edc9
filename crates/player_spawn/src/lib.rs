//! Spawn resolution for a multiplayer server.
//!
//! Spawn points are stored per purpose (spawn, new player, respawn), per scope
//! (player, group, platform, default) and per breadth (one world or the whole
//! server). [`SpawnResolver`] walks those scopes from the most specific to the
//! least specific and returns the first enabled entry in a loaded world.

pub mod actor;
pub mod admin;
mod error;
mod groups;
mod host;
mod listener;
mod location;
pub mod platform;
pub mod policy;
mod resolver;
mod scope;
mod service;
mod store;
mod table;

pub use actor::{Actor, ActorId, Console, Player};
pub use admin::{CommandOutcome, SpawnAdmin};
pub use error::{CommandError, ServiceError, StoreError};
pub use groups::GroupMembership;
pub use host::{HostEnvironment, MemoryHost};
pub use listener::{LogoutLocations, PendingTeleport, SpawnListener};
pub use location::LocationRecord;
pub use platform::PlatformClassifier;
pub use policy::{RejoinBehavior, SpawnPolicy};
pub use resolver::SpawnResolver;
pub use scope::{Breadth, Purpose, Scope, ScopeKey};
pub use service::SpawnService;
pub use store::{ConfigStore, SpawnEntry, SpawnStore, SpawnStoreBuilder};
pub use table::ScopeTable;
