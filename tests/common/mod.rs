#![allow(dead_code)]

use bgs_tally::{Activity, FactionActivity, JournalEvent, Tally, TallyConfig, Tick};
use chrono::{TimeZone, Utc};
use serde_json::{Value, json};
use tempfile::TempDir;

pub const SOWIIO: u64 = 1458376217306;
pub const HIP: u64 = 2871051298217;

pub fn tick(hour: u32) -> Tick {
    Tick::new(
        format!("tick-{hour:02}"),
        Utc.with_ymd_and_hms(2023, 5, 17, hour, 0, 0).unwrap(),
    )
}

/// Journal timestamp on the test day.
pub fn ts(hour: u32, minute: u32, second: u32) -> String {
    format!("2023-05-17T{hour:02}:{minute:02}:{second:02}Z")
}

/// A tally over a scratch data directory, with lookups disabled.
pub struct Fixture {
    pub dir: TempDir,
    pub tally: Tally,
}

pub fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let config = TallyConfig {
        data_dir: dir.path().to_path_buf(),
        ..TallyConfig::default()
    };
    let tally = Tally::new(config, &tick(0), None);
    Fixture { dir, tally }
}

impl Fixture {
    pub fn event(&mut self, value: Value) {
        let event: JournalEvent = serde_json::from_value(value).unwrap();
        self.tally.journal_entry(&event);
    }

    pub fn current(&self) -> &Activity {
        self.tally.activity.current()
    }

    pub fn faction(&self, address: u64, name: &str) -> &FactionActivity {
        &self.current().systems[&address.to_string()].factions[name]
    }

    /// Jump into `system` with the given `(name, state)` factions.
    pub fn arrive(&mut self, system: &str, address: u64, factions: &[(&str, &str)]) {
        self.arrive_with_conflicts(system, address, factions, json!([]));
    }

    pub fn arrive_with_conflicts(
        &mut self,
        system: &str,
        address: u64,
        factions: &[(&str, &str)],
        conflicts: Value,
    ) {
        let factions: Vec<Value> = factions
            .iter()
            .map(|(name, state)| json!({"Name": name, "FactionState": state, "Influence": 0.2}))
            .collect();
        self.event(json!({
            "timestamp": ts(12, 0, 0),
            "event": "FSDJump",
            "StarSystem": system,
            "SystemAddress": address,
            "Factions": factions,
            "Conflicts": conflicts,
        }));
    }

    pub fn dock(&mut self, system: &str, address: u64, station: &str, faction: &str, station_type: &str) {
        self.event(json!({
            "timestamp": ts(12, 1, 0),
            "event": "Docked",
            "StationName": station,
            "StationType": station_type,
            "StationFaction": {"Name": faction},
            "StarSystem": system,
            "SystemAddress": address,
            "MarketID": 3228000000u64,
        }));
    }

    pub fn accept_mission(&mut self, id: u64, name: &str, faction: &str, extra: Value) {
        let mut entry = json!({
            "timestamp": ts(12, 2, 0),
            "event": "MissionAccepted",
            "MissionID": id,
            "Name": name,
            "Faction": faction,
        });
        if let (Some(entry), Value::Object(extra)) = (entry.as_object_mut(), extra) {
            entry.extend(extra);
        }
        self.event(entry);
    }

    pub fn indicated(&mut self) -> bool {
        self.tally.indicator.take()
    }
}
