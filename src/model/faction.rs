use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::tags::{CheckState, CzSize, FactionState, PerClass, PerSize};

/// Number of market supply/demand brackets the game reports (0–3).
pub const MARKET_BRACKETS: usize = 4;

/// Purchases made in one stock bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuyBracket {
    pub items: u64,
    pub value: i64,
}

/// Sales made in one demand bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SellBracket {
    pub items: u64,
    pub value: i64,
    pub profit: i64,
}

/// Missions counted and the total quantity they carried (passengers, pods, kills).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MissionTally {
    pub count: u32,
    pub sum: u64,
}

impl MissionTally {
    pub fn record(&mut self, quantity: u64) {
        self.count += 1;
        self.sum += quantity;
    }
}

/// A ground settlement where this faction earned combat bonds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementActivity {
    pub count: u32,
    #[serde(default)]
    pub enabled: CheckState,
    /// Inferred conflict zone size. Only ever escalates within a tick.
    #[serde(rename = "type")]
    pub size: CzSize,
}

impl SettlementActivity {
    pub fn new(size: CzSize) -> Self {
        Self {
            count: 0,
            enabled: CheckState::On,
            size,
        }
    }
}

/// Thargoid war mission breakdown for one station.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TwStation {
    pub name: String,
    pub enabled: CheckState,
    pub passengers: PerSize<MissionTally>,
    pub escapepods: PerSize<MissionTally>,
    pub cargo: MissionTally,
    pub massacre: PerClass<MissionTally>,
}

impl TwStation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Everything a player did for one faction in one system during a tick.
///
/// Every field added after the first persisted format carries a serde default
/// so older files load without per-field presence checks.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FactionActivity {
    #[serde(rename = "Faction")]
    pub name: String,
    #[serde(rename = "FactionState")]
    pub state: FactionState,
    #[serde(rename = "Enabled")]
    pub enabled: CheckState,

    #[serde(rename = "MissionPoints")]
    pub mission_points: i64,
    #[serde(rename = "MissionPointsSecondary")]
    pub mission_points_secondary: i64,

    // Pre-bracket trade totals, kept so old files still report activity.
    #[serde(rename = "TradeProfit")]
    pub trade_profit: i64,
    #[serde(rename = "TradePurchase")]
    pub trade_purchase: i64,
    #[serde(rename = "TradeBuy")]
    pub trade_buy: [BuyBracket; MARKET_BRACKETS],
    #[serde(rename = "TradeSell")]
    pub trade_sell: [SellBracket; MARKET_BRACKETS],
    #[serde(rename = "BlackMarketProfit")]
    pub black_market_profit: i64,

    #[serde(rename = "Bounties")]
    pub bounties: i64,
    #[serde(rename = "CartData")]
    pub cart_data: i64,
    #[serde(rename = "ExoData")]
    pub exo_data: i64,
    #[serde(rename = "CombatBonds")]
    pub combat_bonds: i64,
    #[serde(rename = "MissionFailed")]
    pub mission_failed: u32,
    #[serde(rename = "Murdered")]
    pub murdered: u32,
    #[serde(rename = "GroundMurdered")]
    pub ground_murdered: u32,

    #[serde(rename = "SpaceCZ")]
    pub space_cz: PerSize<u32>,
    #[serde(rename = "GroundCZ")]
    pub ground_cz: PerSize<u32>,
    #[serde(rename = "GroundCZSettlements")]
    pub ground_cz_settlements: BTreeMap<String, SettlementActivity>,
    #[serde(rename = "Scenarios")]
    pub scenarios: u32,

    #[serde(rename = "TWStations")]
    pub tw_stations: BTreeMap<String, TwStation>,
}

impl FactionActivity {
    pub fn new(name: impl Into<String>, state: FactionState) -> Self {
        Self {
            name: name.into(),
            state,
            ..Self::default()
        }
    }

    /// A fresh entry for the same faction, keeping only identity and state.
    pub fn reset(&self) -> Self {
        Self::new(self.name.clone(), self.state.clone())
    }

    /// True when no counter holds any activity.
    pub fn is_zero(&self) -> bool {
        self.mission_points == 0
            && self.mission_points_secondary == 0
            && self.trade_profit == 0
            && self.trade_purchase == 0
            && self.black_market_profit == 0
            && self.trade_buy.iter().map(|b| b.value).sum::<i64>() == 0
            && self.trade_sell.iter().map(|b| b.value).sum::<i64>() == 0
            && self.bounties == 0
            && self.cart_data == 0
            && self.exo_data == 0
            && self.combat_bonds == 0
            && self.mission_failed == 0
            && self.murdered == 0
            && self.ground_murdered == 0
            && self.space_cz.values().iter().all(|&&n| n == 0)
            && self.ground_cz.values().iter().all(|&&n| n == 0)
            && self.ground_cz_settlements.is_empty()
            && self.scenarios == 0
            && self.tw_stations.is_empty()
    }

    pub fn tw_station_mut(&mut self, station: &str) -> &mut TwStation {
        self.tw_stations
            .entry(station.to_string())
            .or_insert_with(|| TwStation::new(station))
    }
}
