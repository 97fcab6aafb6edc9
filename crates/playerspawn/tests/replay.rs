use std::sync::Arc;

use player_spawn::{CommandOutcome, LocationRecord, MemoryHost, SpawnService};
use playerspawn::{ReplayStep, Script, Session};
use pretty_assertions::assert_eq;

const SCRIPT: &str = r#"(
    spaces: ["world", "world_nether"],
    extensions: ["floodgate"],
    players: [
        (
            name: "Op",
            id: "069a79f4-44e9-4726-a5be-fca90e38aaf5",
            location: Some((space_id: "world", x: 0.5, y: 64.0, z: 0.5, yaw: 0.0, pitch: 0.0)),
            capabilities: ["playerspawn.default", "playerspawn.floodgate"],
            played_before: true,
        ),
        (
            name: "Steve",
            id: "00000000-0000-0000-0009-01f64f65c7c3",
            location: Some((space_id: "world", x: 40.0, y: 70.0, z: 40.0, yaw: 0.0, pitch: 0.0)),
        ),
    ],
    events: [
        Join(player: "Op"),
        Command(sender: Some("Op"), line: "default set"),
        Command(sender: None, line: "floodgate newplayer set 8 65 8 world"),
        Command(sender: Some("Steve"), line: "default set"),
        Join(player: "Steve"),
        Move(player: "Steve", to: (space_id: "world_nether", x: 1.0, y: 40.0, z: 1.0, yaw: 0.0, pitch: 0.0)),
        Respawn(player: "Steve", world: "world_nether"),
    ],
)"#;

fn session(dir: &std::path::Path) -> Session {
    let host = Arc::new(MemoryHost::new());
    let service = SpawnService::open(
        &dir.join("config.ron"),
        &dir.join("spawns.ron"),
        host.clone(),
    )
    .unwrap();
    Session::new(host, service)
}

#[test]
fn replays_a_session() {
    let dir = tempfile::tempdir().unwrap();
    let script: Script = ron::from_str(SCRIPT).unwrap();
    let mut session = session(dir.path());

    let steps = session.run(&script).unwrap();
    assert_eq!(steps.len(), 7);

    assert_eq!(
        steps[0],
        ReplayStep::Joined {
            player: "Op".into(),
            first_join: false,
            teleport: None,
        }
    );
    assert!(matches!(
        &steps[1],
        ReplayStep::Command { result: Ok(CommandOutcome::SpawnSet { .. }), .. }
    ));
    assert!(matches!(
        &steps[2],
        ReplayStep::Command { result: Ok(CommandOutcome::SpawnSet { .. }), .. }
    ));
    assert!(matches!(
        &steps[3],
        ReplayStep::Command { result: Err(message), .. } if message.contains("permission")
    ));

    // platform player on first join gets the platform new-player spawn
    let ReplayStep::Joined { teleport: Some(teleport), first_join: true, .. } = &steps[4] else {
        panic!("expected a first-join teleport, got {:?}", steps[4]);
    };
    assert_eq!(teleport.location, LocationRecord::at("world", 8.0, 65.0, 8.0));
    assert_eq!(teleport.delay_ticks, 5);

    // respawn handling is off unless enabled
    assert_eq!(
        steps[6],
        ReplayStep::Respawned {
            player: "Steve".into(),
            location: None,
        }
    );
    assert_eq!(
        session.player("Steve").and_then(|p| {
            use player_spawn::Actor;
            p.location()
        }),
        Some(LocationRecord::at("world_nether", 1.0, 40.0, 1.0))
    );
}

#[test]
fn spawns_outlive_the_session() {
    let dir = tempfile::tempdir().unwrap();
    let script: Script = ron::from_str(SCRIPT).unwrap();
    session(dir.path()).run(&script).unwrap();

    let restarted = session(dir.path());
    let keys: Vec<String> = {
        use player_spawn::ConfigStore;
        restarted
            .service()
            .store
            .entries()
            .into_iter()
            .map(|(key, _)| key.to_string())
            .collect()
    };
    assert_eq!(keys, vec!["default.server", "floodgate.new_player"]);
}

#[test]
fn undeclared_players_are_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let script: Script = ron::from_str(r#"(events: [Quit(player: "Nobody")])"#).unwrap();

    let err = session(dir.path()).run(&script).unwrap_err();
    assert!(err.to_string().contains("Nobody"));
}

#[test]
fn played_before_marks_players_from_an_earlier_run() {
    let dir = tempfile::tempdir().unwrap();
    let script: Script = ron::from_str(SCRIPT).unwrap();
    session(dir.path()).run(&script).unwrap();

    let rerun: Script = ron::from_str(
        r#"(
            spaces: ["world"],
            extensions: ["floodgate"],
            players: [(
                name: "Steve",
                id: "00000000-0000-0000-0009-01f64f65c7c3",
                played_before: true,
            )],
            events: [Join(player: "Steve")],
        )"#,
    )
    .unwrap();
    let steps = session(dir.path()).run(&rerun).unwrap();

    assert_eq!(
        steps,
        vec![ReplayStep::Joined {
            player: "Steve".into(),
            first_join: false,
            teleport: None,
        }]
    );
}
