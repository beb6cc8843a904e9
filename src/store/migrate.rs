//! Structural upgrades applied to raw activity JSON before it is typed.
//!
//! Only shapes that serde defaults cannot absorb are handled here. Missing
//! fields are filled by `#[serde(default)]` on the model types.

use serde_json::{Map, Value, json};

/// Faction counters older versions could write as floats (bounty halving) or
/// numeric strings.
const FACTION_SIGNED_FIELDS: &[&str] = &[
    "MissionPoints",
    "MissionPointsSecondary",
    "TradeProfit",
    "TradePurchase",
    "BlackMarketProfit",
    "Bounties",
    "CartData",
    "ExoData",
    "CombatBonds",
];

const FACTION_COUNT_FIELDS: &[&str] = &["MissionFailed", "Murdered", "GroundMurdered", "Scenarios"];

const CZ_FIELDS: &[&str] = &["SpaceCZ", "GroundCZ"];

/// Upgrade a whole activity document in place.
pub fn upgrade_activity(doc: &mut Value) {
    let Some(systems) = doc.get_mut("systems").and_then(Value::as_object_mut) else {
        return;
    };
    for system in systems.values_mut() {
        upgrade_system(system);
    }
}

pub fn upgrade_system(system: &mut Value) {
    let Some(factions) = system.get_mut("Factions").and_then(Value::as_object_mut) else {
        return;
    };
    for faction in factions.values_mut() {
        if let Some(faction) = faction.as_object_mut() {
            upgrade_faction(faction);
        }
    }
}

fn upgrade_faction(faction: &mut Map<String, Value>) {
    for field in FACTION_SIGNED_FIELDS {
        if let Some(value) = faction.get_mut(*field) {
            coerce_integer(value, i64::MIN);
        }
    }
    for field in FACTION_COUNT_FIELDS {
        if let Some(value) = faction.get_mut(*field) {
            coerce_integer(value, 0);
        }
    }

    for field in CZ_FIELDS {
        if let Some(counts) = faction.get_mut(*field).and_then(Value::as_object_mut) {
            for value in counts.values_mut() {
                coerce_integer(value, 0);
            }
        }
    }

    if let Some(stations) = faction.get_mut("TWStations").and_then(Value::as_object_mut) {
        for station in stations.values_mut() {
            if let Some(station) = station.as_object_mut() {
                upgrade_tw_station(station);
            }
        }
    }
}

/// Early Thargoid war builds stored one integer per station field, and a
/// single mission count across all of them. The totals go in the medium
/// severity bucket and the mission count goes with the escape pods.
fn upgrade_tw_station(station: &mut Map<String, Value>) {
    let missions = station.get("missions").and_then(Value::as_u64).unwrap_or(0);

    if let Some(passengers) = flat_total(station.get("passengers")) {
        station.insert("passengers".into(), per_size_medium(0, passengers));
    }
    if let Some(escapepods) = flat_total(station.get("escapepods")) {
        station.insert("escapepods".into(), per_size_medium(missions, escapepods));
    }
    if let Some(cargo) = flat_total(station.get("cargo")) {
        station.insert("cargo".into(), json!({"count": 0, "sum": cargo}));
    }
    if station.get("massacre").is_some_and(|v| !v.is_object()) {
        station.remove("massacre");
    }
    station.remove("missions");
}

fn flat_total(value: Option<&Value>) -> Option<u64> {
    match value? {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().map(|f| f.max(0.0) as u64)),
        _ => None,
    }
}

fn per_size_medium(count: u64, sum: u64) -> Value {
    json!({
        "l": {"count": 0, "sum": 0},
        "m": {"count": count, "sum": sum},
        "h": {"count": 0, "sum": 0},
    })
}

/// Rewrite floats and strings as integers no lower than `floor`. Strings
/// that are not numbers (blank text-entry cells) count as 0.
fn coerce_integer(value: &mut Value, floor: i64) {
    let coerced = match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .unwrap_or(i64::MAX),
        Value::String(s) => s.trim().parse::<f64>().map_or(0, |f| f.trunc() as i64),
        _ => return,
    };
    *value = Value::from(coerced.max(floor));
}
