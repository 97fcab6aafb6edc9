use std::sync::Arc;

use settings::SettingsStore;
use tracing::debug;

use crate::{
    Actor, Breadth, GroupMembership, LocationRecord, PlatformClassifier, Purpose, Scope, ScopeKey,
    ScopeTable, SpawnPolicy,
};

/// Picks the spawn location for an actor from the most specific enabled entry.
///
/// Every lookup goes through [`ScopeTable`], so disabled entries and entries
/// pointing at unloaded worlds are skipped. Policy is read from the settings
/// store on every call, so a reload takes effect on the next resolution.
pub struct SpawnResolver {
    table: ScopeTable,
    groups: GroupMembership,
    platform: PlatformClassifier,
    settings: Arc<SettingsStore>,
}

impl SpawnResolver {
    pub fn new(
        table: ScopeTable,
        groups: GroupMembership,
        platform: PlatformClassifier,
        settings: Arc<SettingsStore>,
    ) -> Self {
        Self {
            table,
            groups,
            platform,
            settings,
        }
    }

    pub fn table(&self) -> &ScopeTable {
        &self.table
    }

    pub fn policy(&self) -> SpawnPolicy {
        SpawnPolicy::load(&self.settings)
    }

    /// Location for an actor joining for the first time.
    pub fn resolve_new_player_spawn(&self, actor: &dyn Actor) -> Option<LocationRecord> {
        let policy = self.policy();

        if self.platform.is_platform_member(actor) {
            if let Some(location) = self.lookup(&ScopeKey::platform_new_player()) {
                return Some(location);
            }
        }
        if let Some(location) = self.lookup(&ScopeKey::new_player()) {
            return Some(location);
        }
        if policy.new_player_use_default {
            return self.lookup(&ScopeKey::default_spawn(Breadth::Server));
        }
        debug!("no new-player spawn for {}", actor.name());
        None
    }

    /// Spawn location for an actor currently in `world`.
    ///
    /// Order: player, groups in configured order, platform, default. Within
    /// each scope the world entry wins over the server entry.
    pub fn resolve_spawn(&self, actor: &dyn Actor, world: Option<&str>) -> Option<LocationRecord> {
        if let Some(id) = actor.id() {
            if let Some(location) = self.lookup_scope(Purpose::Spawn, Scope::Player(id), world) {
                return Some(location);
            }
        }
        for group in self.groups.groups_for(actor) {
            if let Some(location) = self.lookup_scope(Purpose::Spawn, Scope::Group(group), world) {
                return Some(location);
            }
        }
        if self.platform.is_platform_member(actor) {
            if let Some(location) = self.lookup_scope(Purpose::Spawn, Scope::Platform, world) {
                return Some(location);
            }
        }
        let location = self.lookup_scope(Purpose::Spawn, Scope::Default, world);
        if location.is_none() {
            debug!("no spawn configured for {}", actor.name());
        }
        location
    }

    /// Location after death, `None` to keep the host's own respawn point.
    pub fn resolve_respawn(&self, actor: &dyn Actor, world: Option<&str>) -> Option<LocationRecord> {
        let policy = self.policy();
        if !policy.respawn_enabled {
            return None;
        }

        if policy.use_player_spawn_for_respawn {
            if let Some(location) = self.resolve_spawn(actor, world) {
                return Some(location);
            }
        }
        if self.platform.is_platform_member(actor) {
            if let Some(location) = self.lookup_scope(Purpose::Respawn, Scope::Platform, world) {
                return Some(location);
            }
        }
        if let Some(location) = self.lookup_scope(Purpose::Respawn, Scope::Default, world) {
            return Some(location);
        }
        if policy.respawn_use_default {
            return self.lookup(&ScopeKey::default_spawn(Breadth::Server));
        }
        None
    }

    /// World entry first, then the server entry.
    fn lookup_scope(
        &self,
        purpose: Purpose,
        scope: Scope,
        world: Option<&str>,
    ) -> Option<LocationRecord> {
        if let Some(world) = world {
            let key = ScopeKey::new(purpose, scope.clone(), Breadth::world(world));
            if let Some(location) = self.lookup(&key) {
                return Some(location);
            }
        }
        self.lookup(&ScopeKey::new(purpose, scope, Breadth::Server))
    }

    fn lookup(&self, key: &ScopeKey) -> Option<LocationRecord> {
        let location = self.table.location(key)?;
        debug!("resolved spawn {} -> {}", key, location);
        Some(location)
    }
}
