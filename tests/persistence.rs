mod common;

use std::fs;

use bgs_tally::{ActivityManager, CzSize, MissionLog, Tally, TallyConfig};
use common::{HIP, SOWIIO, fixture, tick, ts};
use serde_json::json;

fn config_for(dir: &std::path::Path) -> TallyConfig {
    TallyConfig {
        data_dir: dir.to_path_buf(),
        ..TallyConfig::default()
    }
}

#[test]
fn saved_activity_survives_a_restart() {
    let mut f = fixture();
    f.arrive("Sowiio", SOWIIO, &[("Sowiio Front", "None")]);
    f.dock("Sowiio", SOWIIO, "Hub", "Sowiio Front", "Coriolis");
    f.event(json!({"timestamp": ts(12, 5, 0), "event": "SellExplorationData", "TotalEarnings": 1200}));
    f.tally.save().unwrap();
    assert!(!f.current().dirty);
    // Nothing changed since the last save.
    assert_eq!(f.tally.activity.save().unwrap(), 0);

    let reloaded = Tally::new(config_for(f.dir.path()), &tick(0), None);
    let activity = reloaded.activity.current();
    assert_eq!(activity.tick_id, "tick-00");
    assert_eq!(activity.systems[&SOWIIO.to_string()].factions["Sowiio Front"].cart_data, 1200);
    assert!(!activity.systems[&SOWIIO.to_string()].zero_activity);
}

#[test]
fn rollover_keeps_only_systems_still_in_play() {
    let mut f = fixture();
    f.arrive("Sowiio", SOWIIO, &[("Sowiio Front", "None")]);
    f.accept_mission(1, "Mission_Courier_name", "Sowiio Front", json!({}));
    f.event(json!({"timestamp": ts(12, 3, 0), "event": "CollectCargo", "Type": "DamagedEscapePod"}));

    f.arrive("HIP 22460", HIP, &[("Aegis", "None")]);
    f.arrive("Quiet", 5, &[("Nobody Home", "None")]);
    f.arrive("Current", 6, &[("Locals", "Boom")]);

    assert!(f.tally.new_tick(&tick(1)));
    assert!(!f.tally.new_tick(&tick(1)));

    let ids: Vec<&str> = f.tally.activity.activities().iter().map(|a| a.tick_id.as_str()).collect();
    assert_eq!(ids, vec!["tick-01", "tick-00"]);

    let current = f.current();
    let kept: Vec<String> = current.systems.keys().cloned().collect();
    // Sowiio holds the mission and the scooped pod; 6 is where the player is.
    assert_eq!(kept, vec![SOWIIO.to_string(), "6".to_string()]);
    let sowiio = &current.systems[&SOWIIO.to_string()];
    assert_eq!(sowiio.total_sandr_scooped(), 1);
    assert!(sowiio.factions["Sowiio Front"].is_zero());
    assert!(current.dirty);

    // The previous tick is untouched.
    let previous = f.tally.activity.get("tick-00").unwrap();
    assert_eq!(previous.systems.len(), 4);
}

#[test]
fn legacy_files_are_imported_when_no_ledgers_exist() {
    let dir = tempfile::tempdir().unwrap();
    let today = json!({
        "1": [{
            "System": "Sowiio",
            "SystemAddress": SOWIIO,
            "Factions": [
                {"Faction": "Sowiio Front", "FactionState": "Boom", "MissionPoints": 4, "Bounties": 1000.0},
                {"Faction": "Union of Sowiio", "FactionState": "None", "CombatBonds": "250"}
            ]
        }]
    });
    let yesterday = json!({
        "1": [{
            "System": "HIP 22460",
            "SystemAddress": HIP.to_string(),
            "Factions": [{"Faction": "Aegis", "FactionState": "None", "CartData": 10}]
        }]
    });
    fs::write(dir.path().join("Today Data.txt"), today.to_string()).unwrap();
    fs::write(dir.path().join("Yesterday Data.txt"), yesterday.to_string()).unwrap();

    let mut tally = Tally::new(config_for(dir.path()), &tick(6), None);
    let ids: Vec<&str> = tally.activity.activities().iter().map(|a| a.tick_id.as_str()).collect();
    assert_eq!(ids, vec!["tick-06", "tick-06-previous"]);

    let sowiio = &tally.activity.current().systems[&SOWIIO.to_string()];
    assert_eq!(sowiio.factions["Sowiio Front"].mission_points, 4);
    assert_eq!(sowiio.factions["Sowiio Front"].bounties, 1000);
    assert_eq!(sowiio.factions["Union of Sowiio"].combat_bonds, 250);
    assert!(!sowiio.zero_activity);

    // Imported ledgers are written out in the current layout.
    tally.save().unwrap();
    let activity_dir = dir.path().join("activitydata");
    assert!(activity_dir.join("tick-06.json").exists());
    assert!(activity_dir.join("tick-06-previous.json").exists());
}

#[test]
fn older_activity_files_are_upgraded_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let activity_dir = dir.path().join("activitydata");
    fs::create_dir_all(&activity_dir).unwrap();
    let old = json!({
        "tickid": "old-tick",
        "ticktime": "2023-05-16T14:00:00.000000Z",
        "systems": {
            (HIP.to_string()): {
                "System": "HIP 22460",
                "SystemAddress": HIP,
                "Factions": {
                    "Aegis": {
                        "Faction": "Aegis",
                        "FactionState": "None",
                        "GroundCZ": {"l": "2", "m": 1.0, "h": 0},
                        "TWStations": {
                            "Hub": {"name": "Hub", "passengers": 30, "escapepods": 8, "cargo": 100, "massacre": 0, "missions": 3}
                        }
                    }
                }
            }
        }
    });
    fs::write(activity_dir.join("old-tick.json"), old.to_string()).unwrap();

    let manager = ActivityManager::load(&activity_dir, dir.path(), &tick(0));
    let activity = manager.get("old-tick").unwrap();
    let aegis = &activity.systems[&HIP.to_string()].factions["Aegis"];
    assert_eq!(*aegis.ground_cz.get(CzSize::Low), 2);
    assert_eq!(*aegis.ground_cz.get(CzSize::Medium), 1);

    let station = &aegis.tw_stations["Hub"];
    assert_eq!(station.passengers.medium.sum, 30);
    assert_eq!(station.escapepods.medium.count, 3);
    assert_eq!(station.escapepods.medium.sum, 8);
    assert_eq!(station.cargo.sum, 100);
    assert_eq!(station.massacre.hydra.count, 0);
    assert!(!activity.dirty);

    // Ledgers on disk are never replaced by the tick passed to `load`.
    assert_eq!(manager.activities().len(), 1);
    assert_eq!(manager.current().tick_id, "old-tick");
}

#[test]
fn pending_missions_survive_a_restart() {
    let mut f = fixture();
    f.arrive("Sowiio", SOWIIO, &[("Sowiio Front", "None")]);
    f.accept_mission(11, "Mission_Courier_name", "Sowiio Front", json!({}));
    f.tally.save().unwrap();

    let mut reloaded = Tally::new(config_for(f.dir.path()), &tick(0), None);
    assert!(reloaded.missions.get_mission(11).is_some());
    // The mission still holds its system across the tick boundary.
    reloaded.session.current_system_id = None;
    assert!(reloaded.new_tick(&tick(1)));
    assert!(reloaded.activity.current().systems.contains_key(&SOWIIO.to_string()));
}
