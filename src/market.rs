use std::collections::HashMap;

use serde::Deserialize;

/// Highest supply/demand bracket the game reports.
pub const MAX_BRACKET: u8 = 3;

/// Supply and demand brackets for one commodity at the current market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommodityBrackets {
    pub demand_bracket: u8,
    pub stock_bracket: u8,
}

/// Market data for the station the player is docked at.
pub trait MarketData {
    /// Whether data is loaded for this market.
    fn available(&self, market_id: u64) -> bool;

    /// Brackets for a commodity by its journal `Type` name.
    fn commodity(&self, commodity: &str) -> Option<CommodityBrackets>;
}

/// Market data provider that never has data; every trade falls into bracket 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMarket;

impl MarketData for NoMarket {
    fn available(&self, _market_id: u64) -> bool {
        false
    }

    fn commodity(&self, _commodity: &str) -> Option<CommodityBrackets> {
        None
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct MarketFile {
    #[serde(rename = "MarketID")]
    market_id: u64,
    #[serde(default)]
    items: Vec<MarketItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct MarketItem {
    name: String,
    #[serde(default)]
    demand_bracket: u8,
    #[serde(default)]
    stock_bracket: u8,
}

/// Snapshot of the game's `Market.json` for a single station.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarketSnapshot {
    market_id: Option<u64>,
    commodities: HashMap<String, CommodityBrackets>,
}

impl MarketSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the contents of `Market.json`.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let file: MarketFile = serde_json::from_str(raw)?;
        let commodities = file
            .items
            .into_iter()
            .map(|item| {
                (
                    normalize_commodity(&item.name),
                    CommodityBrackets {
                        demand_bracket: item.demand_bracket.min(MAX_BRACKET),
                        stock_bracket: item.stock_bracket.min(MAX_BRACKET),
                    },
                )
            })
            .collect();
        Ok(Self {
            market_id: Some(file.market_id),
            commodities,
        })
    }
}

impl MarketData for MarketSnapshot {
    fn available(&self, market_id: u64) -> bool {
        self.market_id == Some(market_id)
    }

    fn commodity(&self, commodity: &str) -> Option<CommodityBrackets> {
        self.commodities.get(&normalize_commodity(commodity)).copied()
    }
}

/// `Market.json` uses `$gold_name;` while trade events use `gold`.
fn normalize_commodity(name: &str) -> String {
    let lower = name.to_lowercase();
    let trimmed = lower.strip_prefix('$').unwrap_or(&lower);
    trimmed.strip_suffix("_name;").unwrap_or(trimmed).to_string()
}
