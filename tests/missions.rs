mod common;

use bgs_tally::MissionLog;
use bgs_tally::model::MissionTally;
use common::{HIP, SOWIIO, fixture, ts};
use serde_json::{Value, json};

fn complete(f: &mut common::Fixture, id: u64, name: &str, faction: &str, effects: Value, extra: Value) {
    let mut entry = json!({
        "timestamp": ts(13, 0, 0),
        "event": "MissionCompleted",
        "MissionID": id,
        "Name": name,
        "Faction": faction,
        "FactionEffects": effects,
    });
    if let (Some(entry), Value::Object(extra)) = (entry.as_object_mut(), extra) {
        entry.extend(extra);
    }
    f.event(entry);
}

fn war_in_sowiio(f: &mut common::Fixture) {
    f.arrive_with_conflicts(
        "Sowiio",
        SOWIIO,
        &[("A Corp", "War"), ("B Corp", "War"), ("C Corp", "None")],
        json!([{"WarType": "war", "Status": "active", "Faction1": {"Name": "A Corp"}, "Faction2": {"Name": "B Corp"}}]),
    );
}

#[test]
fn explicit_influence_splits_primary_and_secondary() {
    let mut f = fixture();
    f.arrive("Sowiio", SOWIIO, &[("Sowiio Front", "None"), ("Union of Sowiio", "None")]);
    f.accept_mission(1, "Mission_Courier_name", "Sowiio Front", json!({}));

    complete(
        &mut f,
        1,
        "Mission_Courier_name",
        "Sowiio Front",
        json!([
            {"Faction": "Sowiio Front", "Influence": [{"SystemAddress": SOWIIO, "Trend": "UpGood", "Influence": "+++"}]},
            {"Faction": "Union of Sowiio", "Influence": [{"SystemAddress": SOWIIO, "Trend": "DownBad", "Influence": "+"}]},
            {"Faction": "Not Tracked", "Influence": [{"SystemAddress": SOWIIO, "Trend": "UpGood", "Influence": "++"}]}
        ]),
        json!({}),
    );

    assert_eq!(f.faction(SOWIIO, "Sowiio Front").mission_points, 3);
    assert_eq!(f.faction(SOWIIO, "Union of Sowiio").mission_points_secondary, -1);
    assert!(f.tally.missions.get_mission(1).is_none());
    assert!(f.indicated());
}

#[test]
fn war_mission_without_influence_counts_one_for_the_giver() {
    let mut f = fixture();
    war_in_sowiio(&mut f);
    f.accept_mission(7, "Mission_Massacre_Conflict_War_name", "A Corp", json!({"KillCount": 12}));

    complete(
        &mut f,
        7,
        "Mission_Massacre_Conflict_War_name",
        "A Corp",
        json!([
            {"Faction": "A Corp", "Influence": []},
            {"Faction": "B Corp", "Influence": []}
        ]),
        json!({}),
    );

    assert_eq!(f.faction(SOWIIO, "A Corp").mission_points, 1);
    assert_eq!(f.faction(SOWIIO, "B Corp").mission_points, 0);
    assert!(!f.current().systems[&SOWIIO.to_string()].zero_activity);
}

#[test]
fn implicit_credit_needs_matching_state_and_template() {
    let mut f = fixture();
    war_in_sowiio(&mut f);
    f.accept_mission(8, "Mission_Delivery_name", "A Corp", json!({"Count": 10}));
    f.accept_mission(9, "Mission_Massacre_Conflict_War_name", "C Corp", json!({}));

    // An election template does not count during a war.
    complete(&mut f, 8, "Mission_Delivery_name", "A Corp", json!([{"Faction": "A Corp", "Influence": []}]), json!({}));
    // A war template does not count for a faction not at war.
    complete(
        &mut f,
        9,
        "Mission_Massacre_Conflict_War_name",
        "C Corp",
        json!([{"Faction": "C Corp", "Influence": []}]),
        json!({}),
    );

    assert_eq!(f.faction(SOWIIO, "A Corp").mission_points, 0);
    assert_eq!(f.faction(SOWIIO, "C Corp").mission_points, 0);
    assert!(f.tally.missions.is_empty());
}

#[test]
fn unknown_mission_without_influence_changes_nothing() {
    let mut f = fixture();
    war_in_sowiio(&mut f);
    complete(
        &mut f,
        99,
        "Mission_Massacre_Conflict_War_name",
        "A Corp",
        json!([{"Faction": "A Corp", "Influence": []}]),
        json!({}),
    );
    assert_eq!(f.faction(SOWIIO, "A Corp").mission_points, 0);
}

#[test]
fn thargoid_war_missions_are_broken_down_by_station() {
    let mut f = fixture();
    f.arrive("HIP 22460", HIP, &[("Aegis", "None")]);
    f.dock("HIP 22460", HIP, "Hub", "Aegis", "Coriolis");

    f.accept_mission(20, "Mission_TW_PassengerEvacuation_Burning_name", "Aegis", json!({"PassengerCount": 12}));
    f.accept_mission(21, "Mission_TW_Rescue_UnderAttack_name", "Aegis", json!({"Count": 5}));
    f.accept_mission(22, "Mission_TW_Collect_Alert_name", "Aegis", json!({"Count": 40}));
    f.accept_mission(23, "Mission_TW_Massacre_Hydra_Plural_name", "Aegis", json!({"KillCount": 3}));

    complete(&mut f, 20, "Mission_TW_PassengerEvacuation_Burning_name", "Aegis", json!([]), json!({}));
    complete(
        &mut f,
        21,
        "Mission_TW_Rescue_UnderAttack_name",
        "Aegis",
        json!([]),
        json!({"Commodity": "$OccupiedCryoPod_Name;"}),
    );
    complete(&mut f, 22, "Mission_TW_Collect_Alert_name", "Aegis", json!([]), json!({"Commodity": "$Tea_Name;"}));
    complete(
        &mut f,
        23,
        "Mission_TW_Massacre_Hydra_Plural_name",
        "Aegis",
        json!([]),
        json!({"TargetType": "$MissionUtil_FactionTag_Hydra;"}),
    );

    let station = &f.faction(HIP, "Aegis").tw_stations["Hub"];
    assert_eq!(station.name, "Hub");
    assert_eq!(station.passengers.high, MissionTally { count: 1, sum: 12 });
    assert_eq!(station.passengers.low, MissionTally::default());
    assert_eq!(station.escapepods.medium, MissionTally { count: 1, sum: 5 });
    assert_eq!(station.cargo, MissionTally { count: 1, sum: 40 });
    assert_eq!(station.massacre.hydra, MissionTally { count: 1, sum: 3 });
    assert!(f.tally.missions.is_empty());
}

#[test]
fn failed_and_abandoned_missions_count_against_the_giver() {
    let mut f = fixture();
    f.arrive("Sowiio", SOWIIO, &[("Sowiio Front", "None")]);
    f.accept_mission(30, "Mission_Courier_name", "Sowiio Front", json!({}));
    f.accept_mission(31, "Mission_Delivery_name", "Sowiio Front", json!({"Count": 4}));

    f.event(json!({"timestamp": ts(13, 0, 0), "event": "MissionFailed", "MissionID": 30}));
    f.event(json!({"timestamp": ts(13, 1, 0), "event": "MissionAbandoned", "MissionID": 31}));
    f.event(json!({"timestamp": ts(13, 2, 0), "event": "MissionFailed", "MissionID": 30}));

    assert_eq!(f.faction(SOWIIO, "Sowiio Front").mission_failed, 2);
    assert!(f.tally.missions.is_empty());
}
