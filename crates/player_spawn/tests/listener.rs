use std::sync::Arc;

use player_spawn::policy::{
    JoinSettings, RejoinSettings, RespawnSettings, VanillaMechanicsSettings,
};
use player_spawn::{
    Breadth, LocationRecord, MemoryHost, PendingTeleport, Player, ScopeKey, SpawnService,
};
use pretty_assertions::assert_eq;
use uuid::Uuid;

fn setup() -> (SpawnService, Arc<MemoryHost>) {
    let host = Arc::new(MemoryHost::new().with_spaces(["world", "world_nether"]));
    let service = SpawnService::in_memory(host.clone()).unwrap();
    service
        .resolver
        .table()
        .write(
            ScopeKey::default_spawn(Breadth::Server),
            LocationRecord::at("world", 0.0, 64.0, 0.0),
        )
        .unwrap();
    (service, host)
}

fn alex_at(location: LocationRecord) -> Player {
    Player::new(Uuid::from_u128(0x4a1e_0000_0000_0000_0000_0000_0000_0001), "Alex")
        .with_location(location)
}

fn set_behavior(service: &SpawnService, behavior: &str) {
    service
        .settings
        .update::<RejoinSettings, _>(|s| s.behavior = Some(behavior.to_string()))
        .unwrap();
}

#[test]
fn first_join_uses_new_player_spawn() {
    let (service, _) = setup();
    let alex = alex_at(LocationRecord::at("world", 100.0, 70.0, 100.0));

    assert_eq!(
        service.listener.on_join(&alex, true),
        Some(PendingTeleport {
            location: LocationRecord::at("world", 0.0, 64.0, 0.0),
            delay_ticks: 5,
        })
    );
}

#[test]
fn rejoin_does_nothing_by_default() {
    let (service, _) = setup();
    let alex = alex_at(LocationRecord::at("world", 100.0, 70.0, 100.0));

    assert_eq!(service.listener.on_join(&alex, false), None);
}

#[test]
fn legacy_teleport_on_join_applies_only_without_behavior() {
    let (service, _) = setup();
    let alex = alex_at(LocationRecord::at("world", 100.0, 70.0, 100.0));
    service
        .settings
        .update::<JoinSettings, _>(|s| {
            s.teleport_on_join = true;
            s.teleport_delay_ticks = 20;
        })
        .unwrap();

    assert_eq!(
        service.listener.on_join(&alex, false),
        Some(PendingTeleport {
            location: LocationRecord::at("world", 0.0, 64.0, 0.0),
            delay_ticks: 20,
        })
    );

    set_behavior(&service, "NOTHING");
    assert_eq!(service.listener.on_join(&alex, false), None);
}

#[test]
fn last_location_is_consumed_once() {
    let (service, _) = setup();
    set_behavior(&service, "last_location");
    let logout = LocationRecord::new("world_nether", -12.25, 40.0, 8.5, 180.0, -15.0);
    let alex = alex_at(logout.clone());

    service.listener.on_quit(&alex);
    assert_eq!(service.listener.logout_locations().len(), 1);

    let teleport = service.listener.on_join(&alex, false).unwrap();
    assert_eq!(teleport.location, logout);
    assert_eq!(service.listener.on_join(&alex, false), None);
    assert!(service.listener.logout_locations().is_empty());
}

#[test]
fn last_location_in_unloaded_world_is_dropped() {
    let (service, host) = setup();
    set_behavior(&service, "last_location");
    let alex = alex_at(LocationRecord::at("world_nether", 1.0, 40.0, 1.0));

    service.listener.on_quit(&alex);
    host.unload_space("world_nether");

    assert_eq!(service.listener.on_join(&alex, false), None);
    assert!(service.listener.logout_locations().is_empty());
}

#[test]
fn logout_location_is_not_saved_when_switched_off() {
    let (service, _) = setup();
    service
        .settings
        .update::<RejoinSettings, _>(|s| s.save_logout_location = false)
        .unwrap();

    service
        .listener
        .on_quit(&alex_at(LocationRecord::at("world", 1.0, 64.0, 1.0)));
    assert!(service.listener.logout_locations().is_empty());
}

#[test]
fn rejoin_spawn_uses_the_current_world() {
    let (service, _) = setup();
    set_behavior(&service, "spawn");
    service
        .resolver
        .table()
        .write(
            ScopeKey::default_spawn(Breadth::world("world_nether")),
            LocationRecord::at("world_nether", 5.0, 32.0, 5.0),
        )
        .unwrap();
    let alex = alex_at(LocationRecord::at("world_nether", 100.0, 70.0, 100.0));

    let teleport = service.listener.on_join(&alex, false).unwrap();
    assert_eq!(teleport.location, LocationRecord::at("world_nether", 5.0, 32.0, 5.0));
}

#[test]
fn bed_or_anchor_wins_when_respected() {
    let (service, _) = setup();
    service
        .settings
        .update::<RespawnSettings, _>(|s| s.enabled = true)
        .unwrap();
    let alex = alex_at(LocationRecord::at("world", 100.0, 70.0, 100.0));

    assert_eq!(service.listener.on_respawn(&alex, "world", true), None);
    assert_eq!(
        service.listener.on_respawn(&alex, "world", false),
        Some(LocationRecord::at("world", 0.0, 64.0, 0.0))
    );

    service
        .settings
        .update::<VanillaMechanicsSettings, _>(|s| s.respect_bed_and_anchor = false)
        .unwrap();
    assert_eq!(
        service.listener.on_respawn(&alex, "world", true),
        Some(LocationRecord::at("world", 0.0, 64.0, 0.0))
    );
}
