//! Typed journal events.
//!
//! Only the fields the ledger, session and target log read are modelled;
//! everything else in a journal line is ignored. Events that are not listed
//! deserialize to [`JournalEvent::Other`].

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::model::FactionState;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event")]
pub enum JournalEvent {
    Location(SystemArrival),
    #[serde(rename = "FSDJump")]
    FsdJump(SystemArrival),
    CarrierJump(SystemArrival),
    Docked(Docked),
    Undocked(Stamp),
    MissionAccepted(MissionAccepted),
    MissionCompleted(MissionCompleted),
    MissionFailed(MissionRef),
    MissionAbandoned(MissionRef),
    SellExplorationData(ExplorationSale),
    MultiSellExplorationData(ExplorationSale),
    SellOrganicData(OrganicSale),
    RedeemVoucher(RedeemVoucher),
    MarketBuy(MarketBuy),
    MarketSell(MarketSell),
    ShipTargeted(ShipTargeted),
    CommitCrime(CommitCrime),
    ApproachSettlement(ApproachSettlement),
    FactionKillBond(FactionKillBond),
    CollectCargo(CollectCargo),
    SearchAndRescue(SearchAndRescue),
    Friends(Friends),
    Resurrect(Stamp),
    Died(Stamp),
    #[serde(other)]
    Other,
}

impl JournalEvent {
    /// Parse one journal line.
    pub fn from_line(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Stamp {
    pub timestamp: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Arrival and docking
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SystemArrival {
    pub star_system: String,
    pub system_address: u64,
    /// Absent in unpopulated systems; such arrivals are not tracked.
    pub factions: Option<Vec<FactionPresence>>,
    #[serde(default)]
    pub conflicts: Vec<Conflict>,
    pub thargoid_war: Option<serde_json::Value>,
    #[serde(default)]
    pub docked: bool,
    pub station_name: Option<String>,
    pub station_faction: Option<StationFaction>,
    pub station_type: Option<String>,
    #[serde(rename = "MarketID")]
    pub market_id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FactionPresence {
    pub name: String,
    #[serde(default)]
    pub faction_state: FactionState,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Conflict {
    pub war_type: String,
    pub status: String,
    pub faction1: ConflictSide,
    pub faction2: ConflictSide,
}

impl Conflict {
    pub fn is_active(&self) -> bool {
        self.status == "active"
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConflictSide {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StationFaction {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Docked {
    pub station_name: String,
    pub station_type: String,
    pub station_faction: StationFaction,
    pub star_system: String,
    pub system_address: u64,
    #[serde(rename = "MarketID")]
    pub market_id: u64,
}

// ---------------------------------------------------------------------------
// Missions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MissionAccepted {
    #[serde(rename = "MissionID")]
    pub mission_id: u64,
    pub name: String,
    pub faction: String,
    pub expiry: Option<DateTime<Utc>>,
    pub passenger_count: Option<u32>,
    /// Commodity count for delivery style missions.
    pub count: Option<u32>,
    pub kill_count: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MissionCompleted {
    #[serde(rename = "MissionID")]
    pub mission_id: u64,
    pub name: String,
    pub faction: String,
    #[serde(default)]
    pub faction_effects: Vec<FactionEffect>,
    pub commodity: Option<String>,
    pub target_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FactionEffect {
    pub faction: String,
    #[serde(default)]
    pub influence: Vec<InfluenceEffect>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InfluenceEffect {
    pub system_address: u64,
    pub trend: String,
    /// Magnitude as a run of `+` characters.
    pub influence: String,
}

impl InfluenceEffect {
    /// Signed influence: the two "good" trends add, everything else subtracts.
    pub fn signed_delta(&self) -> i64 {
        let magnitude = self.influence.chars().count() as i64;
        match self.trend.as_str() {
            "UpGood" | "DownGood" => magnitude,
            _ => -magnitude,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MissionRef {
    #[serde(rename = "MissionID")]
    pub mission_id: u64,
}

// ---------------------------------------------------------------------------
// Data, vouchers and trade
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExplorationSale {
    pub total_earnings: i64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OrganicSale {
    pub bio_data: Vec<BioSale>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BioSale {
    pub value: i64,
    #[serde(default)]
    pub bonus: i64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RedeemVoucher {
    #[serde(rename = "Type")]
    pub voucher_type: String,
    pub amount: i64,
    pub faction: Option<String>,
    #[serde(default)]
    pub factions: Vec<VoucherFaction>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VoucherFaction {
    pub faction: String,
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MarketBuy {
    #[serde(rename = "MarketID")]
    pub market_id: u64,
    #[serde(rename = "Type")]
    pub commodity: String,
    pub count: u64,
    pub total_cost: i64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MarketSell {
    #[serde(rename = "MarketID")]
    pub market_id: u64,
    #[serde(rename = "Type")]
    pub commodity: String,
    pub count: u64,
    pub total_sale: i64,
    pub avg_price_paid: i64,
    #[serde(default)]
    pub black_market: bool,
}

// ---------------------------------------------------------------------------
// Combat and crime
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ShipTargeted {
    #[serde(rename = "timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub target_locked: bool,
    pub scan_stage: Option<u32>,
    pub pilot_name: Option<String>,
    #[serde(rename = "PilotName_Localised")]
    pub pilot_name_localised: Option<String>,
    pub faction: Option<String>,
    pub ship: Option<String>,
    #[serde(rename = "Ship_Localised")]
    pub ship_localised: Option<String>,
    #[serde(rename = "SquadronID")]
    pub squadron_id: Option<String>,
    pub legal_status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CommitCrime {
    pub crime_type: String,
    pub faction: String,
    pub victim: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApproachSettlement {
    #[serde(rename = "timestamp")]
    pub timestamp: DateTime<Utc>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FactionKillBond {
    #[serde(rename = "timestamp")]
    pub timestamp: DateTime<Utc>,
    pub reward: i64,
    pub awarding_faction: String,
    pub victim_faction: String,
}

// ---------------------------------------------------------------------------
// Search and rescue
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CollectCargo {
    #[serde(rename = "Type")]
    pub commodity: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SearchAndRescue {
    pub name: String,
    #[serde(default)]
    pub count: u32,
}

// ---------------------------------------------------------------------------
// Social
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Friends {
    #[serde(rename = "timestamp")]
    pub timestamp: DateTime<Utc>,
    pub status: String,
    pub name: String,
}
