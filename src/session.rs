use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::journal::{Docked, SystemArrival};
use crate::model::CzSize;

/// Station type reported when docked at a player fleet carrier.
pub const STATION_TYPE_FLEET_CARRIER: &str = "FleetCarrier";

/// The last ship the player scanned far enough to see its faction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetedShip {
    pub faction: String,
    pub pilot_name_localised: String,
}

/// The settlement the player most recently approached, used to attribute
/// on-foot combat bonds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementApproach {
    pub timestamp: DateTime<Utc>,
    pub name: String,
    /// Size counted for this visit so far; `None` until the first bond.
    pub size: Option<CzSize>,
}

/// Per-play-session state threaded through every event handler.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionState {
    pub current_system_id: Option<String>,
    pub current_system_name: Option<String>,
    pub station_name: Option<String>,
    pub station_faction: Option<String>,
    pub station_type: Option<String>,
    pub market_id: Option<u64>,
    pub last_ship_targeted: Option<TargetedShip>,
    pub last_settlement_approached: Option<SettlementApproach>,
    /// Thargoid war telemetry for the current system, passed through to reports.
    pub system_tw_status: Option<serde_json::Value>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Docked at a station: its controlling faction is the one trade and data
    /// sales are credited to.
    pub fn docked(&mut self, entry: &Docked) {
        self.station_name = Some(entry.station_name.clone());
        self.station_faction = Some(entry.station_faction.name.clone());
        self.station_type = Some(entry.station_type.clone());
        self.market_id = Some(entry.market_id);
        self.current_system_name = Some(entry.star_system.clone());
    }

    pub fn undocked(&mut self) {
        self.station_name = None;
        self.station_faction = None;
        self.station_type = None;
        self.market_id = None;
    }

    /// Location style events also report docking when the game starts at a station.
    pub fn arrived(&mut self, entry: &SystemArrival) {
        self.current_system_name = Some(entry.star_system.clone());
        if entry.docked {
            self.station_name = entry.station_name.clone();
            self.station_faction = entry.station_faction.as_ref().map(|f| f.name.clone());
            self.station_type = entry.station_type.clone();
            self.market_id = entry.market_id;
        } else {
            self.undocked();
        }
    }

    pub fn at_fleet_carrier(&self) -> bool {
        self.station_type.as_deref() == Some(STATION_TYPE_FLEET_CARRIER)
    }
}
