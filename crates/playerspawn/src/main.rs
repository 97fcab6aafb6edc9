mod cli;

use std::fs;
use std::sync::Arc;

use app::{AppBuilder, AppContext, Application};
use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::{WrapErr, eyre};
use player_spawn::{ConfigStore, MemoryHost, SpawnService};
use playerspawn::{Script, Session};

use crate::cli::{Cli, Cmd};

struct PlayerSpawn;

impl Application for PlayerSpawn {
    const APP_ID: &'static str = "playerspawn";
}

fn open_service(ctx: &AppContext, host: Arc<MemoryHost>) -> Result<SpawnService> {
    let paths = ctx.path_context();
    let service = SpawnService::open(&paths.config_file(), &paths.spawns_file(), host)?;
    Ok(service)
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Cli::parse();

    let mut builder = AppBuilder::<PlayerSpawn>::new(env!("CARGO_PKG_VERSION"));
    if let Some(dir) = &args.data_dir {
        builder = builder.with_base_path(dir.clone());
    }
    let ctx = builder
        .build()
        .map_err(|e| eyre!("failed to initialise {}: {e}", PlayerSpawn::APP_ID))?;

    match args.cmd {
        Cmd::Replay { script } => {
            let text = fs::read_to_string(&script)
                .wrap_err_with(|| format!("failed to read {}", script.display()))?;
            let script: Script = ron::from_str(&text)
                .wrap_err_with(|| format!("failed to parse {}", script.display()))?;

            let host = Arc::new(MemoryHost::new());
            let mut session = Session::new(host.clone(), open_service(&ctx, host)?);
            for step in session.run(&script)? {
                println!("{step}");
            }
        }
        Cmd::List => {
            let service = open_service(&ctx, Arc::new(MemoryHost::new()))?;
            let entries = service.store.entries();
            if entries.is_empty() {
                println!("no spawns stored in {}", ctx.path_context().spawns_file().display());
            }
            for (key, entry) in entries {
                let state = if entry.enabled { "on " } else { "off" };
                println!("{state} {key} -> {}", entry.location);
            }
        }
    }

    Ok(())
}
