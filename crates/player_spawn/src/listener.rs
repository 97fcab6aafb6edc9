use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::{debug, info};

use crate::{
    Actor, ActorId, HostEnvironment, LocationRecord, RejoinBehavior, SpawnResolver,
};

/// A teleport the host should perform after `delay_ticks` server ticks.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingTeleport {
    pub location: LocationRecord,
    pub delay_ticks: u32,
}

/// Where players were when they last left.
#[derive(Debug, Default)]
pub struct LogoutLocations {
    inner: RwLock<HashMap<ActorId, LocationRecord>>,
}

impl LogoutLocations {
    pub fn record(&self, id: ActorId, location: LocationRecord) {
        self.inner.write().unwrap().insert(id, location);
    }

    /// Remove and return the stored location.
    pub fn take(&self, id: &ActorId) -> Option<LocationRecord> {
        self.inner.write().unwrap().remove(id)
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Turns join, quit and respawn events into spawn decisions.
pub struct SpawnListener {
    resolver: Arc<SpawnResolver>,
    host: Arc<dyn HostEnvironment>,
    logout_locations: LogoutLocations,
}

impl SpawnListener {
    pub fn new(resolver: Arc<SpawnResolver>, host: Arc<dyn HostEnvironment>) -> Self {
        Self {
            resolver,
            host,
            logout_locations: LogoutLocations::default(),
        }
    }

    pub fn logout_locations(&self) -> &LogoutLocations {
        &self.logout_locations
    }

    pub fn on_join(&self, actor: &dyn Actor, first_join: bool) -> Option<PendingTeleport> {
        let policy = self.resolver.policy();

        let resolved = if first_join {
            self.resolver.resolve_new_player_spawn(actor)
        } else {
            match policy.effective_rejoin() {
                RejoinBehavior::Nothing => None,
                RejoinBehavior::LastLocation => self.last_location(actor),
                RejoinBehavior::Spawn => {
                    let current = actor.location();
                    self.resolver
                        .resolve_spawn(actor, current.as_ref().map(|l| l.space_id()))
                }
            }
        };
        let location = resolved?;

        info!("teleporting {} to {}", actor.name(), location);
        Some(PendingTeleport {
            location,
            delay_ticks: policy.teleport_delay_ticks,
        })
    }

    pub fn on_quit(&self, actor: &dyn Actor) {
        if !self.resolver.policy().save_logout_location {
            return;
        }
        if let (Some(id), Some(location)) = (actor.id(), actor.location()) {
            debug!("saved logout location of {}: {}", actor.name(), location);
            self.logout_locations.record(id, location);
        }
    }

    /// `world` is where the actor died. `None` keeps the host's own respawn
    /// location.
    pub fn on_respawn(
        &self,
        actor: &dyn Actor,
        world: &str,
        has_native_respawn_point: bool,
    ) -> Option<LocationRecord> {
        let policy = self.resolver.policy();
        if has_native_respawn_point && policy.respect_native_bed_and_anchor {
            debug!("{} respawns at their bed or anchor", actor.name());
            return None;
        }
        self.resolver.resolve_respawn(actor, Some(world))
    }

    fn last_location(&self, actor: &dyn Actor) -> Option<LocationRecord> {
        let location = self.logout_locations.take(&actor.id()?)?;
        if !self.host.is_space_loaded(location.space_id()) {
            debug!(
                "logout location of {} is in unloaded world '{}', dropping it",
                actor.name(),
                location.space_id()
            );
            return None;
        }
        Some(location)
    }
}
