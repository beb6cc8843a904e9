mod common;

use common::{SOWIIO, fixture, ts};
use serde_json::json;

const MARKET: &str = r#"{"timestamp": "2023-05-17T12:01:05Z", "event": "Market", "MarketID": 3228000000,
    "Items": [
        {"Name": "$gold_name;", "DemandBracket": 3, "StockBracket": 0},
        {"Name": "$tea_name;", "DemandBracket": 0, "StockBracket": 2}
    ]}"#;

fn docked_in_sowiio(station_type: &str) -> common::Fixture {
    let mut f = fixture();
    f.arrive("Sowiio", SOWIIO, &[("Sowiio Front", "None"), ("Union of Sowiio", "None")]);
    f.dock("Sowiio", SOWIIO, "Hub", "Sowiio Front", station_type);
    f
}

#[test]
fn purchases_use_stock_bracket_and_sales_demand_bracket() {
    let mut f = docked_in_sowiio("Coriolis");
    f.tally.market_updated(MARKET);

    f.event(json!({
        "timestamp": ts(12, 5, 0), "event": "MarketBuy", "MarketID": 3228000000u64,
        "Type": "tea", "Count": 100, "BuyPrice": 1500, "TotalCost": 150000
    }));
    f.event(json!({
        "timestamp": ts(12, 6, 0), "event": "MarketSell", "MarketID": 3228000000u64,
        "Type": "gold", "Count": 10, "SellPrice": 60000, "TotalSale": 600000, "AvgPricePaid": 45000
    }));

    let faction = f.faction(SOWIIO, "Sowiio Front");
    assert_eq!(faction.trade_buy[2].items, 100);
    assert_eq!(faction.trade_buy[2].value, 150000);
    assert_eq!(faction.trade_sell[3].items, 10);
    assert_eq!(faction.trade_sell[3].value, 600000);
    assert_eq!(faction.trade_sell[3].profit, 150000);
}

#[test]
fn trades_without_market_data_fall_into_bracket_zero() {
    let mut f = docked_in_sowiio("Coriolis");
    f.event(json!({
        "timestamp": ts(12, 5, 0), "event": "MarketBuy", "MarketID": 3228000000u64,
        "Type": "tea", "Count": 5, "TotalCost": 7500
    }));
    assert_eq!(f.faction(SOWIIO, "Sowiio Front").trade_buy[0].value, 7500);
}

#[test]
fn black_market_sales_only_record_profit() {
    let mut f = docked_in_sowiio("Outpost");
    f.event(json!({
        "timestamp": ts(12, 5, 0), "event": "MarketSell", "MarketID": 3228000000u64,
        "Type": "slaves", "Count": 4, "TotalSale": 40000, "AvgPricePaid": 8000, "BlackMarket": true
    }));
    let faction = f.faction(SOWIIO, "Sowiio Front");
    assert_eq!(faction.black_market_profit, 8000);
    assert!(faction.trade_sell.iter().all(|b| b.items == 0));
}

#[test]
fn bounties_are_halved_at_fleet_carriers() {
    let mut f = docked_in_sowiio("FleetCarrier");
    f.event(json!({
        "timestamp": ts(12, 5, 0), "event": "RedeemVoucher", "Type": "bounty", "Amount": 300000,
        "Factions": [
            {"Faction": "Sowiio Front", "Amount": 200000},
            {"Faction": "Union of Sowiio", "Amount": 100000}
        ]
    }));
    assert_eq!(f.faction(SOWIIO, "Sowiio Front").bounties, 100000);
    assert_eq!(f.faction(SOWIIO, "Union of Sowiio").bounties, 50000);
}

#[test]
fn combat_bonds_and_data_sales_credit_factions() {
    let mut f = docked_in_sowiio("Coriolis");
    f.event(json!({
        "timestamp": ts(12, 5, 0), "event": "RedeemVoucher", "Type": "CombatBond",
        "Amount": 450000, "Faction": "Union of Sowiio"
    }));
    f.event(json!({
        "timestamp": ts(12, 6, 0), "event": "MultiSellExplorationData",
        "Discovered": [], "BaseValue": 1000, "Bonus": 0, "TotalEarnings": 1500
    }));
    f.event(json!({
        "timestamp": ts(12, 7, 0), "event": "SellOrganicData", "MarketID": 3228000000u64,
        "BioData": [
            {"Genus": "$Codex_Ent_Bacterial_Genus_Name;", "Value": 1000, "Bonus": 4000},
            {"Genus": "$Codex_Ent_Fungoids_Genus_Name;", "Value": 2000, "Bonus": 0}
        ]
    }));

    assert_eq!(f.faction(SOWIIO, "Union of Sowiio").combat_bonds, 450000);
    let station = f.faction(SOWIIO, "Sowiio Front");
    assert_eq!(station.cart_data, 1500);
    assert_eq!(station.exo_data, 7000);
}

#[test]
fn ship_murder_is_charged_to_the_scanned_ship_faction() {
    let mut f = docked_in_sowiio("Coriolis");
    f.event(json!({
        "timestamp": ts(12, 10, 0), "event": "ShipTargeted", "TargetLocked": true, "Ship": "viper",
        "ScanStage": 3, "PilotName": "$npc_name_decorate:#name=Jo Bloggs;", "PilotName_Localised": "Jo Bloggs",
        "Faction": "Union of Sowiio", "LegalStatus": "Clean"
    }));
    f.event(json!({
        "timestamp": ts(12, 11, 0), "event": "CommitCrime", "CrimeType": "murder",
        "Faction": "Sowiio Front", "Victim": "Jo Bloggs", "Bounty": 20000
    }));
    // A victim that was not the last scan is not attributed.
    f.event(json!({
        "timestamp": ts(12, 12, 0), "event": "CommitCrime", "CrimeType": "murder",
        "Faction": "Sowiio Front", "Victim": "Someone Else"
    }));
    f.event(json!({
        "timestamp": ts(12, 13, 0), "event": "CommitCrime", "CrimeType": "onFoot_murder",
        "Faction": "Sowiio Front", "Victim": "Guard"
    }));

    assert_eq!(f.faction(SOWIIO, "Union of Sowiio").murdered, 1);
    assert_eq!(f.faction(SOWIIO, "Sowiio Front").murdered, 0);
    assert_eq!(f.faction(SOWIIO, "Sowiio Front").ground_murdered, 1);
    // NPC scans never reach the target log.
    assert!(f.tally.target_log.lock().unwrap().entries().is_empty());
}

#[test]
fn uncredited_events_leave_the_ledger_clean() {
    let mut f = docked_in_sowiio("Coriolis");
    f.tally.save().unwrap();
    f.indicated();

    f.event(json!({
        "timestamp": ts(12, 5, 0), "event": "RedeemVoucher", "Type": "bounty", "Amount": 1000,
        "Factions": [{"Faction": "Nobody We Know", "Amount": 1000}]
    }));
    f.event(json!({
        "timestamp": ts(12, 6, 0), "event": "RedeemVoucher", "Type": "CombatBond",
        "Amount": 5000, "Faction": "Elsewhere Inc"
    }));
    // No ship was scanned, so the victim cannot be attributed.
    f.event(json!({
        "timestamp": ts(12, 7, 0), "event": "CommitCrime", "CrimeType": "murder",
        "Faction": "Sowiio Front", "Victim": "Jo Bloggs"
    }));
    f.event(json!({
        "timestamp": ts(12, 8, 0), "event": "CommitCrime", "CrimeType": "onFoot_murder",
        "Faction": "Elsewhere Inc", "Victim": "Guard"
    }));

    assert!(!f.current().dirty);
    assert!(!f.indicated());
    assert!(f.faction(SOWIIO, "Sowiio Front").is_zero());
}

#[test]
fn player_scans_are_logged_without_lookups() {
    let mut f = docked_in_sowiio("Coriolis");
    f.event(json!({
        "timestamp": ts(12, 10, 0), "event": "ShipTargeted", "TargetLocked": true, "Ship": "cutter",
        "Ship_Localised": "Imperial Cutter", "ScanStage": 3, "PilotName": "$cmdr_decorate:#name=Jameson;",
        "PilotName_Localised": "CMDR Jameson", "SquadronID": "TSPA", "LegalStatus": "Wanted"
    }));

    let log = f.tally.target_log.lock().unwrap();
    let entry = log.get_target_info("Jameson").unwrap();
    assert_eq!(entry.system, "Sowiio");
    assert_eq!(entry.ship_localised, "Imperial Cutter");
    assert!(entry.inara_url.is_none());
}

#[test]
fn unparseable_lines_are_skipped() {
    let mut f = docked_in_sowiio("Coriolis");
    f.tally.journal_line("{not json");
    f.tally.journal_line(r#"{"timestamp": "2023-05-17T12:00:00Z", "event": "MarketSell", "Type": "gold"}"#);
    assert!(f.faction(SOWIIO, "Sowiio Front").is_zero());
}
