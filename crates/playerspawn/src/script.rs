//! RON description of a simulated host session.
//!
//! ```ron
//! (
//!     spaces: ["world", "world_nether"],
//!     extensions: ["floodgate"],
//!     players: [
//!         (name: "Op", id: "069a79f4-44e9-4726-a5be-fca90e38aaf5",
//!          location: Some((space_id: "world", x: 0.5, y: 64.0, z: 0.5, yaw: 0.0, pitch: 0.0)),
//!          capabilities: ["playerspawn.default"]),
//!     ],
//!     events: [
//!         Join(player: "Op"),
//!         Command(sender: Some("Op"), line: "default set"),
//!         Quit(player: "Op"),
//!     ],
//! )
//! ```

use player_spawn::LocationRecord;
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Script {
    pub spaces: Vec<String>,
    pub extensions: Vec<String>,
    pub players: Vec<ScriptPlayer>,
    pub events: Vec<ScriptEvent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScriptPlayer {
    pub name: String,
    pub id: Uuid,
    #[serde(default)]
    pub location: Option<LocationRecord>,
    #[serde(default)]
    pub capabilities: Vec<String>,
    /// Treat the first join in the script as a rejoin.
    ///
    /// Whether a player has joined before is only tracked for the length of
    /// one replay, so a script replayed against an existing data folder must
    /// set this for players that joined in an earlier run.
    #[serde(default)]
    pub played_before: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub enum ScriptEvent {
    Join {
        player: String,
    },
    Quit {
        player: String,
    },
    Respawn {
        player: String,
        world: String,
        #[serde(default)]
        bed_or_anchor: bool,
    },
    Move {
        player: String,
        to: LocationRecord,
    },
    /// `sender: None` runs the command from the console.
    Command {
        #[serde(default)]
        sender: Option<String>,
        line: String,
    },
    LoadSpace(String),
    UnloadSpace(String),
}
