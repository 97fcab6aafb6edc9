use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "playerspawn", version, about = "Spawn point resolution for multiplayer servers")]
pub struct Cli {
    /// Base directory for settings, spawn data and logs
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand)]
pub enum Cmd {
    /// Replay a RON session script against the stored spawns
    Replay {
        script: PathBuf,
    },
    /// List stored spawn entries
    List,
}
