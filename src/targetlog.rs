//! Log of other commanders the player has scanned or received friend requests
//! from, enriched with their public Inara profile when one can be fetched.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::{DateTime, Duration, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::config::TallyConfig;
use crate::journal::{Friends, ShipTargeted};
use crate::requests::RequestError;
use crate::store::{StoreError, read_json, write_json};

/// Player pilots are reported as `$cmdr_decorate:#name=<name>;`.
static CMDR_NAME_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^\$cmdr_decorate:#name=([^\]]*);").ok());

/// Ship scans below this stage do not reveal the pilot.
const MIN_SCAN_STAGE: u32 = 3;

const UNKNOWN: &str = "----";

const INARA_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// One sighting of a commander.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetEntry {
    #[serde(rename = "TargetName")]
    pub target_name: String,
    #[serde(rename = "System")]
    pub system: String,
    #[serde(rename = "SquadronID")]
    pub squadron_id: String,
    #[serde(rename = "Ship")]
    pub ship: String,
    #[serde(rename = "ShipLocalised")]
    pub ship_localised: String,
    #[serde(rename = "LegalStatus")]
    pub legal_status: String,
    #[serde(rename = "Timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ranks: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub squadron: Option<Value>,
    #[serde(rename = "inaraURL", default, skip_serializing_if = "Option::is_none")]
    pub inara_url: Option<String>,
}

impl TargetEntry {
    /// Same place, squadron, ship and legal status.
    fn same_sighting(&self, other: &TargetEntry) -> bool {
        self.system == other.system
            && self.squadron_id == other.squadron_id
            && self.ship == other.ship
            && self.legal_status == other.legal_status
    }
}

/// A commander profile the host should fetch in the background. Feed the
/// outcome back through [`TargetLog::profile_received`].
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileLookup {
    pub entry: TargetEntry,
}

impl ProfileLookup {
    /// `getCommanderProfile` request body.
    pub fn payload(&self, config: &TallyConfig, now: DateTime<Utc>) -> Value {
        json!({
            "header": {
                "appName": config.app_name,
                "appVersion": config.app_version,
                "isBeingDeveloped": "false",
                "APIkey": config.inara_api_key.clone().unwrap_or_default(),
            },
            "events": [{
                "eventName": "getCommanderProfile",
                "eventTimestamp": now.format(INARA_TIME_FORMAT).to_string(),
                "eventData": {"searchName": self.entry.target_name},
            }],
        })
    }
}

#[derive(Debug, Default)]
pub struct TargetLog {
    path: Option<PathBuf>,
    entries: Vec<TargetEntry>,
    /// Latest known data per commander for this session.
    cache: HashMap<String, TargetEntry>,
}

impl TargetLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the log at `path`, dropping entries older than `expiry_days`.
    /// A missing or unreadable file starts an empty log.
    pub fn load(path: &Path, expiry_days: i64, now: DateTime<Utc>) -> Self {
        let entries = if path.exists() {
            match read_json::<Vec<TargetEntry>>(path) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::info!(path = %path.display(), error = %e, "unable to load target log");
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };
        let mut log = Self {
            path: Some(path.to_path_buf()),
            entries,
            cache: HashMap::new(),
        };
        log.expire(now - Duration::days(expiry_days));
        log
    }

    pub fn save(&self) -> Result<(), StoreError> {
        match &self.path {
            Some(path) => write_json(path, &self.entries),
            None => Ok(()),
        }
    }

    pub fn entries(&self) -> &[TargetEntry] {
        &self.entries
    }

    /// The most recent sighting of `name`.
    pub fn get_target_info(&self, name: &str) -> Option<&TargetEntry> {
        self.entries.iter().rev().find(|e| e.target_name == name)
    }

    pub fn expire(&mut self, cutoff: DateTime<Utc>) {
        self.entries.retain(|e| e.timestamp >= cutoff);
    }

    /// A ship was scanned. Only fully scanned player ships are logged.
    pub fn ship_targeted(&mut self, entry: &ShipTargeted, system: &str) -> Option<ProfileLookup> {
        if entry.scan_stage.is_none_or(|stage| stage < MIN_SCAN_STAGE) {
            return None;
        }
        let name = cmdr_name(entry.pilot_name.as_deref()?)?;
        let ship = entry.ship.clone().unwrap_or_else(|| UNKNOWN.to_string());
        let sighting = TargetEntry {
            target_name: name,
            system: system.to_string(),
            squadron_id: entry.squadron_id.clone().unwrap_or_else(|| UNKNOWN.to_string()),
            ship_localised: entry.ship_localised.clone().unwrap_or_else(|| ship.clone()),
            ship,
            legal_status: entry.legal_status.clone().unwrap_or_else(|| UNKNOWN.to_string()),
            timestamp: entry.timestamp,
            ranks: None,
            squadron: None,
            inara_url: None,
        };
        self.sighted(sighting)
    }

    pub fn friend_request(&mut self, entry: &Friends, system: &str) -> Option<ProfileLookup> {
        let sighting = TargetEntry {
            target_name: entry.name.clone(),
            system: system.to_string(),
            squadron_id: UNKNOWN.to_string(),
            ship: UNKNOWN.to_string(),
            ship_localised: UNKNOWN.to_string(),
            legal_status: UNKNOWN.to_string(),
            timestamp: entry.timestamp,
            ranks: None,
            squadron: None,
            inara_url: None,
        };
        self.sighted(sighting)
    }

    /// Profile data is assumed stable for a session, so a repeat sighting
    /// reuses the cached profile and only a first sighting asks for a lookup.
    fn sighted(&mut self, sighting: TargetEntry) -> Option<ProfileLookup> {
        let Some(cached) = self.cache.get_mut(&sighting.target_name) else {
            return Some(ProfileLookup { entry: sighting });
        };
        if cached.same_sighting(&sighting) {
            return None;
        }
        cached.system = sighting.system;
        cached.ship = sighting.ship;
        cached.ship_localised = sighting.ship_localised;
        cached.legal_status = sighting.legal_status;
        cached.timestamp = sighting.timestamp;
        self.entries.push(cached.clone());
        None
    }

    /// Complete a lookup. The sighting is cached and logged even when the
    /// lookup failed.
    pub fn profile_received(&mut self, lookup: ProfileLookup, result: Result<Value, RequestError>) {
        let mut entry = lookup.entry;
        if let Ok(response) = result {
            if let Some(data) = response.pointer("/events/0/eventData") {
                entry.ranks = data.get("commanderRanksPilot").cloned();
                entry.squadron = data.get("commanderSquadron").cloned();
                entry.inara_url = data
                    .get("inaraURL")
                    .and_then(Value::as_str)
                    .map(str::to_string);
            }
        }
        self.cache.insert(entry.target_name.clone(), entry.clone());
        self.entries.push(entry);
    }
}

fn cmdr_name(pilot_name: &str) -> Option<String> {
    let pattern = CMDR_NAME_PATTERN.as_ref()?;
    let captures = pattern.captures(pilot_name)?;
    Some(captures.get(1)?.as_str().to_string())
}
