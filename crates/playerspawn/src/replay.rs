use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use color_eyre::eyre::{Result, eyre};
use player_spawn::{
    Actor, ActorId, CommandOutcome, Console, LocationRecord, MemoryHost, PendingTeleport, Player,
    SpawnService,
};
use tracing::{debug, info};

use crate::script::{Script, ScriptEvent};

/// What happened for one script event.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplayStep {
    Joined {
        player: String,
        first_join: bool,
        teleport: Option<PendingTeleport>,
    },
    Quit {
        player: String,
    },
    Respawned {
        player: String,
        location: Option<LocationRecord>,
    },
    Moved {
        player: String,
        to: LocationRecord,
    },
    Command {
        sender: String,
        result: Result<CommandOutcome, String>,
    },
    SpaceLoaded(String),
    SpaceUnloaded(String),
}

impl fmt::Display for ReplayStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplayStep::Joined {
                player,
                first_join,
                teleport,
            } => {
                let kind = if *first_join { "joined for the first time" } else { "rejoined" };
                match teleport {
                    Some(t) => write!(
                        f,
                        "{player} {kind}, teleport to {} in {} ticks",
                        t.location, t.delay_ticks
                    ),
                    None => write!(f, "{player} {kind}, stays where they are"),
                }
            }
            ReplayStep::Quit { player } => write!(f, "{player} quit"),
            ReplayStep::Respawned {
                player,
                location: Some(location),
            } => write!(f, "{player} respawns at {location}"),
            ReplayStep::Respawned {
                player,
                location: None,
            } => write!(f, "{player} respawns at the server's own respawn point"),
            ReplayStep::Moved { player, to } => write!(f, "{player} moved to {to}"),
            ReplayStep::Command {
                sender,
                result: Ok(outcome),
            } => write!(f, "[{sender}] {outcome}"),
            ReplayStep::Command {
                sender,
                result: Err(message),
            } => write!(f, "[{sender}] error: {message}"),
            ReplayStep::SpaceLoaded(space) => write!(f, "world {space} loaded"),
            ReplayStep::SpaceUnloaded(space) => write!(f, "world {space} unloaded"),
        }
    }
}

/// A simulated server: host state, players and the spawn engine.
pub struct Session {
    host: Arc<MemoryHost>,
    service: SpawnService,
    players: HashMap<String, Player>,
    seen: HashSet<ActorId>,
}

impl Session {
    pub fn new(host: Arc<MemoryHost>, service: SpawnService) -> Self {
        Self {
            host,
            service,
            players: HashMap::new(),
            seen: HashSet::new(),
        }
    }

    pub fn service(&self) -> &SpawnService {
        &self.service
    }

    pub fn player(&self, name: &str) -> Option<&Player> {
        self.players.get(name)
    }

    /// Apply the script's initial host state, then run its events in order.
    pub fn run(&mut self, script: &Script) -> Result<Vec<ReplayStep>> {
        for space in &script.spaces {
            self.host.load_space(space.clone());
        }
        for extension in &script.extensions {
            self.host.enable_extension(extension.clone());
        }
        for declared in &script.players {
            let mut player = Player::new(declared.id, declared.name.clone());
            if let Some(location) = &declared.location {
                player.set_location(location.clone());
            }
            for capability in &declared.capabilities {
                player.grant(capability.clone());
            }
            if declared.played_before {
                self.seen.insert(declared.id);
            }
            self.players.insert(declared.name.clone(), player);
        }
        debug!(
            "replaying {} events with {} players",
            script.events.len(),
            self.players.len()
        );

        script.events.iter().map(|event| self.step(event)).collect()
    }

    pub fn step(&mut self, event: &ScriptEvent) -> Result<ReplayStep> {
        let step = match event {
            ScriptEvent::Join { player } => {
                let actor = self.player_mut(player)?;
                let id = actor.player_id();
                self.host.player_online(player, id);
                let first_join = self.seen.insert(id);

                let actor = self.player_ref(player)?;
                let teleport = self.service.listener.on_join(actor, first_join);
                if let Some(t) = &teleport {
                    self.player_mut(player)?.set_location(t.location.clone());
                }
                ReplayStep::Joined {
                    player: player.clone(),
                    first_join,
                    teleport,
                }
            }
            ScriptEvent::Quit { player } => {
                self.service.listener.on_quit(self.player_ref(player)?);
                self.host.player_offline(player);
                ReplayStep::Quit {
                    player: player.clone(),
                }
            }
            ScriptEvent::Respawn {
                player,
                world,
                bed_or_anchor,
            } => {
                let location =
                    self.service
                        .listener
                        .on_respawn(self.player_ref(player)?, world, *bed_or_anchor);
                if let Some(location) = &location {
                    self.player_mut(player)?.set_location(location.clone());
                }
                ReplayStep::Respawned {
                    player: player.clone(),
                    location,
                }
            }
            ScriptEvent::Move { player, to } => {
                self.player_mut(player)?.set_location(to.clone());
                ReplayStep::Moved {
                    player: player.clone(),
                    to: to.clone(),
                }
            }
            ScriptEvent::Command { sender, line } => {
                let (name, result) = match sender {
                    Some(name) => {
                        let actor = self.player_ref(name)?;
                        (name.clone(), self.service.admin.execute_line(actor, line))
                    }
                    None => (
                        Console.name().to_string(),
                        self.service.admin.execute_line(&Console, line),
                    ),
                };
                ReplayStep::Command {
                    sender: name,
                    result: result.map_err(|e| e.to_string()),
                }
            }
            ScriptEvent::LoadSpace(space) => {
                self.host.load_space(space.clone());
                ReplayStep::SpaceLoaded(space.clone())
            }
            ScriptEvent::UnloadSpace(space) => {
                self.host.unload_space(space);
                ReplayStep::SpaceUnloaded(space.clone())
            }
        };
        info!("{}", step);
        Ok(step)
    }

    fn player_ref(&self, name: &str) -> Result<&Player> {
        self.players
            .get(name)
            .ok_or_else(|| eyre!("script refers to undeclared player '{name}'"))
    }

    fn player_mut(&mut self, name: &str) -> Result<&mut Player> {
        self.players
            .get_mut(name)
            .ok_or_else(|| eyre!("script refers to undeclared player '{name}'"))
    }
}
