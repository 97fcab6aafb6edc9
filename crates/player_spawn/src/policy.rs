//! Behaviour switches, stored as settings sections.

use serde::{Deserialize, Serialize};
use settings::{Settings, SettingsError, SettingsStore};
use strum::{Display, EnumString};
use tracing::warn;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewPlayerSettings {
    /// Fall back to the default server spawn when no new-player spawn is set.
    pub use_default_if_not_specified: bool,
}

impl Default for NewPlayerSettings {
    fn default() -> Self {
        Self {
            use_default_if_not_specified: true,
        }
    }
}

impl Settings for NewPlayerSettings {
    const SECTION: &'static str = "new_player";
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RespawnSettings {
    pub enabled: bool,
    /// Try the regular spawn cascade before the respawn entries.
    pub use_player_spawn: bool,
    pub use_default_if_not_specified: bool,
}

impl Default for RespawnSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            use_player_spawn: true,
            use_default_if_not_specified: true,
        }
    }
}

impl Settings for RespawnSettings {
    const SECTION: &'static str = "respawn";
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RejoinSettings {
    /// `nothing`, `last_location` or `spawn`. Overrides `join.teleport_on_join`.
    pub behavior: Option<String>,
    pub save_logout_location: bool,
}

impl Default for RejoinSettings {
    fn default() -> Self {
        Self {
            behavior: None,
            save_logout_location: true,
        }
    }
}

impl Settings for RejoinSettings {
    const SECTION: &'static str = "on_rejoin";
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JoinSettings {
    /// Legacy switch, used only when `on_rejoin.behavior` is unset.
    pub teleport_on_join: bool,
    pub teleport_delay_ticks: u32,
}

impl Default for JoinSettings {
    fn default() -> Self {
        Self {
            teleport_on_join: false,
            teleport_delay_ticks: 5,
        }
    }
}

impl Settings for JoinSettings {
    const SECTION: &'static str = "join";
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VanillaMechanicsSettings {
    pub respect_bed_and_anchor: bool,
}

impl Default for VanillaMechanicsSettings {
    fn default() -> Self {
        Self {
            respect_bed_and_anchor: true,
        }
    }
}

impl Settings for VanillaMechanicsSettings {
    const SECTION: &'static str = "vanilla_mechanics";
}

/// What to do with a returning player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum RejoinBehavior {
    Nothing,
    LastLocation,
    Spawn,
}

/// Register every policy section that is not registered yet.
pub fn register_sections(store: &SettingsStore) -> Result<(), SettingsError> {
    if !store.is_registered::<NewPlayerSettings>() {
        store.register::<NewPlayerSettings>()?;
    }
    if !store.is_registered::<RespawnSettings>() {
        store.register::<RespawnSettings>()?;
    }
    if !store.is_registered::<RejoinSettings>() {
        store.register::<RejoinSettings>()?;
    }
    if !store.is_registered::<JoinSettings>() {
        store.register::<JoinSettings>()?;
    }
    if !store.is_registered::<VanillaMechanicsSettings>() {
        store.register::<VanillaMechanicsSettings>()?;
    }
    Ok(())
}

/// Flat snapshot of the policy sections, taken once per resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnPolicy {
    pub new_player_use_default: bool,
    pub respawn_enabled: bool,
    pub use_player_spawn_for_respawn: bool,
    pub respawn_use_default: bool,
    pub rejoin_behavior: Option<RejoinBehavior>,
    pub save_logout_location: bool,
    pub teleport_on_join: bool,
    pub teleport_delay_ticks: u32,
    pub respect_native_bed_and_anchor: bool,
}

impl Default for SpawnPolicy {
    fn default() -> Self {
        Self::from_sections(
            NewPlayerSettings::default(),
            RespawnSettings::default(),
            RejoinSettings::default(),
            JoinSettings::default(),
            VanillaMechanicsSettings::default(),
        )
    }
}

impl SpawnPolicy {
    pub fn load(store: &SettingsStore) -> Self {
        Self::from_sections(
            store.get_or_default(),
            store.get_or_default(),
            store.get_or_default(),
            store.get_or_default(),
            store.get_or_default(),
        )
    }

    fn from_sections(
        new_player: NewPlayerSettings,
        respawn: RespawnSettings,
        rejoin: RejoinSettings,
        join: JoinSettings,
        vanilla: VanillaMechanicsSettings,
    ) -> Self {
        let rejoin_behavior = rejoin.behavior.as_deref().and_then(|raw| {
            raw.trim()
                .parse::<RejoinBehavior>()
                .inspect_err(|_| warn!("unknown on_rejoin.behavior '{}', ignoring it", raw))
                .ok()
        });

        Self {
            new_player_use_default: new_player.use_default_if_not_specified,
            respawn_enabled: respawn.enabled,
            use_player_spawn_for_respawn: respawn.use_player_spawn,
            respawn_use_default: respawn.use_default_if_not_specified,
            rejoin_behavior,
            save_logout_location: rejoin.save_logout_location,
            teleport_on_join: join.teleport_on_join,
            teleport_delay_ticks: join.teleport_delay_ticks,
            respect_native_bed_and_anchor: vanilla.respect_bed_and_anchor,
        }
    }

    /// The rejoin behaviour after applying the legacy join switch.
    pub fn effective_rejoin(&self) -> RejoinBehavior {
        match self.rejoin_behavior {
            Some(behavior) => behavior,
            None if self.teleport_on_join => RejoinBehavior::Spawn,
            None => RejoinBehavior::Nothing,
        }
    }
}
