use std::collections::HashSet;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::journal::MissionAccepted;
use crate::session::SessionState;
use crate::store::{StoreError, read_json, write_json};

/// A mission the player has accepted but not yet resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Mission {
    #[serde(rename = "MissionID")]
    pub mission_id: u64,
    pub name: String,
    pub faction: String,
    /// Name of the system the mission was accepted in.
    pub system: String,
    #[serde(default)]
    pub station: String,
    pub expiry: Option<DateTime<Utc>>,
    pub passenger_count: Option<u32>,
    pub commodity_count: Option<u32>,
    pub kill_count: Option<u32>,
}

/// Lookup of pending missions, consumed by the activity handlers.
pub trait MissionLog {
    fn get_mission(&self, mission_id: u64) -> Option<&Mission>;

    /// Names (not addresses) of every system holding an active mission.
    fn active_systems(&self) -> HashSet<String>;

    fn delete_mission_by_id(&mut self, mission_id: u64);
}

/// In-memory mission log fed by `MissionAccepted` events.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PendingMissions {
    missions: Vec<Mission>,
}

impl PendingMissions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the log at `path`. A missing or unreadable file starts an empty log.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::new();
        }
        read_json(path).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "unable to load mission log");
            Self::new()
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        write_json(path, self)
    }

    pub fn add(&mut self, mission: Mission) {
        self.delete_mission_by_id(mission.mission_id);
        self.missions.push(mission);
    }

    /// Record an accepted mission against the system and station the player is at.
    pub fn mission_accepted(&mut self, entry: &MissionAccepted, session: &SessionState) {
        let Some(system) = session.current_system_name.clone() else {
            tracing::debug!(mission_id = entry.mission_id, "mission accepted outside a known system");
            return;
        };
        self.add(Mission {
            mission_id: entry.mission_id,
            name: entry.name.clone(),
            faction: entry.faction.clone(),
            system,
            station: session.station_name.clone().unwrap_or_default(),
            expiry: entry.expiry,
            passenger_count: entry.passenger_count,
            commodity_count: entry.count,
            kill_count: entry.kill_count,
        });
    }

    /// Drop missions whose expiry has passed.
    pub fn expire(&mut self, now: DateTime<Utc>) {
        self.missions
            .retain(|m| m.expiry.is_none_or(|expiry| expiry > now));
    }

    pub fn len(&self) -> usize {
        self.missions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.missions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Mission> {
        self.missions.iter()
    }
}

impl MissionLog for PendingMissions {
    fn get_mission(&self, mission_id: u64) -> Option<&Mission> {
        self.missions.iter().find(|m| m.mission_id == mission_id)
    }

    fn active_systems(&self) -> HashSet<String> {
        self.missions.iter().map(|m| m.system.clone()).collect()
    }

    fn delete_mission_by_id(&mut self, mission_id: u64) {
        self.missions.retain(|m| m.mission_id != mission_id);
    }
}
