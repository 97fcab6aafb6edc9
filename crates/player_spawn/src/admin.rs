//! The `/ps` command surface.
//!
//! ```text
//! /ps set [~ | <x> <y> <z>] [player] [server | <world>]
//! /ps group <name> set [~ | <x> <y> <z>] [player] [server | <world>]
//! /ps floodgate <newplayer | respawn> set [~ | <x> <y> <z>] [server | <world>]
//! /ps default set ...        /ps newplayer set ...        /ps respawn set ...
//! /ps disable <target> [player] [server | <world>]
//! /ps reload
//! ```

use std::fmt;
use std::sync::Arc;

use settings::SettingsStore;
use tracing::info;

use crate::actor::capability;
use crate::{
    Actor, Breadth, CommandError, HostEnvironment, LocationRecord, Purpose, Scope, ScopeKey,
    ScopeTable,
};

pub const USAGE_SET: &str = "/ps set [~ | <x> <y> <z>] [player] [server | <world>]";
pub const USAGE_GROUP: &str = "/ps group <name> set [~ | <x> <y> <z>] [player] [server | <world>]";
pub const USAGE_FLOODGATE: &str =
    "/ps floodgate <newplayer | respawn> set [~ | <x> <y> <z>] [server | <world>]";
pub const USAGE_DEFAULT: &str = "/ps default set [~ | <x> <y> <z>] [server | <world>]";
pub const USAGE_NEW_PLAYER: &str = "/ps newplayer set [~ | <x> <y> <z> [world]]";
pub const USAGE_RESPAWN: &str = "/ps respawn set [~ | <x> <y> <z>] [server | <world>]";
pub const USAGE_DISABLE: &str = "/ps disable <target> [player] [server | <world>]";
pub const USAGE_RELOAD: &str = "/ps reload";

/// Usage lines shown by `/ps help`.
pub fn help_lines(show_platform: bool) -> Vec<&'static str> {
    let mut lines = vec![USAGE_SET, USAGE_GROUP];
    if show_platform {
        lines.push(USAGE_FLOODGATE);
    }
    lines.extend([
        USAGE_DEFAULT,
        USAGE_NEW_PLAYER,
        USAGE_RESPAWN,
        USAGE_DISABLE,
        USAGE_RELOAD,
    ]);
    lines
}

/// Successful result of a command. Rendering is left to the host.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    Help { show_platform: bool },
    SpawnSet { key: ScopeKey, location: LocationRecord },
    SpawnDisabled { key: ScopeKey, was_enabled: bool },
    Reloaded,
}

impl fmt::Display for CommandOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandOutcome::Help { show_platform } => {
                f.write_str(&help_lines(*show_platform).join("\n"))
            }
            CommandOutcome::SpawnSet { key, location } => {
                write!(f, "spawn {} set to {}", key, location)
            }
            CommandOutcome::SpawnDisabled {
                key,
                was_enabled: true,
            } => write!(f, "spawn {} disabled", key),
            CommandOutcome::SpawnDisabled {
                key,
                was_enabled: false,
            } => write!(f, "spawn {} was not set", key),
            CommandOutcome::Reloaded => f.write_str("configuration reloaded"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Target {
    Player,
    Group(String),
    PlatformNewPlayer,
    PlatformRespawn,
    Default,
    NewPlayer,
    Respawn,
}

impl Target {
    fn permission(&self) -> &'static str {
        match self {
            Target::Player => capability::SET,
            Target::Group(_) => capability::GROUP,
            Target::PlatformNewPlayer | Target::PlatformRespawn => capability::PLATFORM,
            Target::Default | Target::NewPlayer | Target::Respawn => capability::DEFAULT,
        }
    }

    fn usage(&self) -> &'static str {
        match self {
            Target::Player => USAGE_SET,
            Target::Group(_) => USAGE_GROUP,
            Target::PlatformNewPlayer | Target::PlatformRespawn => USAGE_FLOODGATE,
            Target::Default => USAGE_DEFAULT,
            Target::NewPlayer => USAGE_NEW_PLAYER,
            Target::Respawn => USAGE_RESPAWN,
        }
    }

    /// New-player entries are server-wide only.
    fn accepts_world(&self) -> bool {
        !matches!(self, Target::NewPlayer | Target::PlatformNewPlayer)
    }
}

enum Position {
    Sender,
    Coordinates(f64, f64, f64),
}

struct Args<'a> {
    tokens: &'a [&'a str],
    pos: usize,
}

impl<'a> Args<'a> {
    fn new(tokens: &'a [&'a str]) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&'a str> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<&'a str> {
        let token = self.peek()?;
        self.pos += 1;
        Some(token)
    }

    fn remaining(&self) -> usize {
        self.tokens.len().saturating_sub(self.pos)
    }
}

fn require(sender: &dyn Actor, permission: &'static str) -> Result<(), CommandError> {
    if sender.has_capability(permission) {
        Ok(())
    } else {
        Err(CommandError::NoPermission(permission))
    }
}

fn parse_coordinate(token: &str) -> Result<f64, CommandError> {
    token
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| CommandError::MalformedCoordinate(token.to_string()))
}

/// `~` or three coordinates. Three or more remaining tokens are always read
/// as coordinates.
fn parse_position(args: &mut Args<'_>) -> Result<Position, CommandError> {
    match args.peek() {
        Some("~") => {
            args.next();
            Ok(Position::Sender)
        }
        Some(_) if args.remaining() >= 3 => {
            let mut coordinates = [0.0; 3];
            for slot in coordinates.iter_mut() {
                let token = args.next().ok_or(CommandError::InvalidSyntax(USAGE_SET))?;
                *slot = parse_coordinate(token)?;
            }
            let [x, y, z] = coordinates;
            Ok(Position::Coordinates(x, y, z))
        }
        _ => Ok(Position::Sender),
    }
}

/// Reads the target selector. With `with_set` the `set` keyword must follow it.
fn parse_target(args: &mut Args<'_>, with_set: bool) -> Result<Target, CommandError> {
    let head = args.peek().map(str::to_ascii_lowercase);
    let target = match head.as_deref() {
        Some("group") => {
            args.next();
            let name = args.next().ok_or(CommandError::InvalidSyntax(USAGE_GROUP))?;
            Target::Group(name.to_string())
        }
        Some("floodgate") => {
            args.next();
            match args.next().map(str::to_ascii_lowercase).as_deref() {
                Some("newplayer") => Target::PlatformNewPlayer,
                Some("respawn") => Target::PlatformRespawn,
                _ => return Err(CommandError::InvalidSyntax(USAGE_FLOODGATE)),
            }
        }
        Some("default") => {
            args.next();
            Target::Default
        }
        Some("newplayer") => {
            args.next();
            Target::NewPlayer
        }
        Some("respawn") => {
            args.next();
            Target::Respawn
        }
        _ => Target::Player,
    };

    if with_set {
        match args.next() {
            Some(token) if token.eq_ignore_ascii_case("set") => {}
            _ => return Err(CommandError::InvalidSyntax(target.usage())),
        }
    }
    Ok(target)
}

/// Executes `/ps` commands against the spawn table and settings.
pub struct SpawnAdmin {
    table: ScopeTable,
    settings: Arc<SettingsStore>,
    host: Arc<dyn HostEnvironment>,
}

impl SpawnAdmin {
    pub fn new(
        table: ScopeTable,
        settings: Arc<SettingsStore>,
        host: Arc<dyn HostEnvironment>,
    ) -> Self {
        Self {
            table,
            settings,
            host,
        }
    }

    /// Split `line` on whitespace and execute it.
    pub fn execute_line(
        &self,
        sender: &dyn Actor,
        line: &str,
    ) -> Result<CommandOutcome, CommandError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        self.execute(sender, &tokens)
    }

    pub fn execute(
        &self,
        sender: &dyn Actor,
        tokens: &[&str],
    ) -> Result<CommandOutcome, CommandError> {
        let mut args = Args::new(tokens);
        let head = args.peek().map(str::to_ascii_lowercase);

        match head.as_deref() {
            Some("reload") => {
                require(sender, capability::RELOAD)?;
                self.reload()?;
                info!("{} reloaded the configuration", sender.name());
                Ok(CommandOutcome::Reloaded)
            }
            Some("disable") => {
                args.next();
                self.disable(sender, &mut args)
            }
            Some("set" | "group" | "floodgate" | "default" | "newplayer" | "respawn") => {
                self.set(sender, &mut args)
            }
            _ => Ok(CommandOutcome::Help {
                show_platform: sender.has_capability(capability::PLATFORM),
            }),
        }
    }

    /// Reload settings and spawn entries from disk.
    pub fn reload(&self) -> Result<(), CommandError> {
        self.settings.reload()?;
        self.table.store().reload()?;
        Ok(())
    }

    fn set(&self, sender: &dyn Actor, args: &mut Args<'_>) -> Result<CommandOutcome, CommandError> {
        let target = parse_target(args, true)?;
        require(sender, target.permission())?;

        let position = parse_position(args)?;
        let (key, named) = self.scope_key(&target, sender, args)?;
        let location = match position {
            Position::Sender => sender.location().ok_or(CommandError::PlayerOnly)?,
            Position::Coordinates(x, y, z) => {
                let space = sender
                    .location()
                    .map(|l| l.space_id().to_string())
                    .or_else(|| named.world_name().map(str::to_string))
                    .ok_or(CommandError::WorldRequired)?;
                LocationRecord::at(space, x, y, z)
            }
        };

        self.table.write(key.clone(), location.clone())?;
        info!("{} set spawn {} to {}", sender.name(), key, location);
        Ok(CommandOutcome::SpawnSet { key, location })
    }

    fn disable(
        &self,
        sender: &dyn Actor,
        args: &mut Args<'_>,
    ) -> Result<CommandOutcome, CommandError> {
        let target = parse_target(args, false)?;
        require(sender, target.permission())?;

        let (key, _) = self.scope_key(&target, sender, args)?;
        let was_enabled = self.table.disable(key.clone())?;
        if was_enabled {
            info!("{} disabled spawn {}", sender.name(), key);
        }
        Ok(CommandOutcome::SpawnDisabled { key, was_enabled })
    }

    /// Reads the optional player and world tokens following the position.
    /// Returns the key and the breadth as named on the command line; the two
    /// differ for server-wide targets, where a world only places coordinates.
    fn scope_key(
        &self,
        target: &Target,
        sender: &dyn Actor,
        args: &mut Args<'_>,
    ) -> Result<(ScopeKey, Breadth), CommandError> {
        let (purpose, scope) = match target {
            Target::Player => {
                let id = match args.next() {
                    Some(name) => self
                        .host
                        .find_player(name)
                        .ok_or_else(|| CommandError::PlayerNotFound(name.to_string()))?,
                    None => sender.id().ok_or(CommandError::PlayerOnly)?,
                };
                (Purpose::Spawn, Scope::Player(id))
            }
            Target::Group(name) => {
                // An online player's name may precede the world; it has no effect.
                if let Some(token) = args.peek() {
                    if self.host.find_player(token).is_some() {
                        args.next();
                    }
                }
                (Purpose::Spawn, Scope::Group(name.clone()))
            }
            Target::PlatformNewPlayer => (Purpose::NewPlayer, Scope::Platform),
            Target::PlatformRespawn => (Purpose::Respawn, Scope::Platform),
            Target::Default => (Purpose::Spawn, Scope::Default),
            Target::NewPlayer => (Purpose::NewPlayer, Scope::Default),
            Target::Respawn => (Purpose::Respawn, Scope::Default),
        };

        let named = self.parse_breadth(args)?;
        let breadth = if target.accepts_world() {
            named.clone()
        } else {
            Breadth::Server
        };
        Ok((ScopeKey::new(purpose, scope, breadth), named))
    }

    fn parse_breadth(&self, args: &mut Args<'_>) -> Result<Breadth, CommandError> {
        match args.next() {
            None => Ok(Breadth::Server),
            Some(token) if token.eq_ignore_ascii_case("server") => Ok(Breadth::Server),
            Some(world) if self.host.is_space_loaded(world) => Ok(Breadth::world(world)),
            Some(world) => Err(CommandError::WorldNotFound(world.to_string())),
        }
    }
}
