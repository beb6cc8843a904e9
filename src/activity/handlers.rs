//! Arrival, data sale, voucher, trade and crime handlers.

use super::{Activity, EventContext};
use crate::journal::{
    ApproachSettlement, CommitCrime, ExplorationSale, MarketBuy, MarketSell, OrganicSale,
    RedeemVoucher, ShipTargeted, SystemArrival,
};
use crate::market::MAX_BRACKET;
use crate::model::{FactionState, SandrCargo};
use crate::session::{SettlementApproach, TargetedShip};

/// Present in every populated system; never a participant in the BGS.
const FACTION_PILOTS_FEDERATION: &str = "Pilots' Federation Local Branch";

const CRIME_MURDER: &str = "murder";
const CRIME_ON_FOOT_MURDER: &str = "onFoot_murder";

impl Activity {
    /// The player arrived in a system. Refresh its factions and their states
    /// and make it the current system.
    pub fn system_entered(&mut self, entry: &SystemArrival, ctx: &mut EventContext<'_>) {
        let Some(factions) = &entry.factions else {
            return;
        };
        self.dirty = true;
        let address = entry.system_address.to_string();
        let system = self.get_or_create_system(&address, &entry.star_system);

        for presence in factions {
            if presence.name == FACTION_PILOTS_FEDERATION {
                continue;
            }
            // Snapshot conflict states are unreliable on their own; only
            // paired conflicts below may set them.
            let state = if presence.faction_state.is_conflict() {
                FactionState::None
            } else {
                presence.faction_state.clone()
            };
            system.get_or_create_faction(&presence.name, Some(state));
        }

        for conflict in entry.conflicts.iter().filter(|c| c.is_active()) {
            let first = &conflict.faction1.name;
            let second = &conflict.faction2.name;
            if !(system.factions.contains_key(first) && system.factions.contains_key(second)) {
                continue;
            }
            let state = FactionState::from_war_type(&conflict.war_type);
            for name in [first, second] {
                if let Some(faction) = system.factions.get_mut(name) {
                    faction.state = state.clone();
                }
            }
        }

        self.recalculate_zero_activity();
        ctx.session.current_system_id = Some(address);
        ctx.session.system_tw_status = entry.thargoid_war.clone();
    }

    // -----------------------------------------------------------------------
    // Data and vouchers
    // -----------------------------------------------------------------------

    pub fn exploration_data_sold(&mut self, entry: &ExplorationSale, ctx: &mut EventContext<'_>) {
        let Some(faction) = self.station_faction_mut(ctx.session) else {
            return;
        };
        faction.cart_data += entry.total_earnings;
        self.credited(ctx);
    }

    pub fn organic_data_sold(&mut self, entry: &OrganicSale, ctx: &mut EventContext<'_>) {
        let Some(faction) = self.station_faction_mut(ctx.session) else {
            return;
        };
        faction.exo_data += entry
            .bio_data
            .iter()
            .map(|sale| sale.value + sale.bonus)
            .sum::<i64>();
        self.credited(ctx);
    }

    /// Bounty vouchers. Fleet carriers pay out half.
    pub fn bv_redeemed(&mut self, entry: &RedeemVoucher, ctx: &mut EventContext<'_>) {
        let at_fleet_carrier = ctx.session.at_fleet_carrier();
        let Some(system) = self.current_system_mut(ctx.session) else {
            return;
        };
        let mut credited = false;
        for voucher in &entry.factions {
            if let Some(faction) = system.factions.get_mut(&voucher.faction) {
                faction.bounties += if at_fleet_carrier {
                    voucher.amount / 2
                } else {
                    voucher.amount
                };
                credited = true;
            }
        }
        if credited {
            self.credited(ctx);
        }
    }

    pub fn cb_redeemed(&mut self, entry: &RedeemVoucher, ctx: &mut EventContext<'_>) {
        let Some(system) = self.current_system_mut(ctx.session) else {
            return;
        };
        let Some(name) = entry.faction.as_deref() else {
            tracing::debug!("combat bond voucher without a faction");
            return;
        };
        let Some(faction) = system.factions.get_mut(name) else {
            tracing::debug!(faction = name, "combat bond faction not in the current system");
            return;
        };
        faction.combat_bonds += entry.amount;
        self.credited(ctx);
    }

    // -----------------------------------------------------------------------
    // Trade
    // -----------------------------------------------------------------------

    pub fn trade_purchased(&mut self, entry: &MarketBuy, ctx: &mut EventContext<'_>) {
        let bracket = market_bracket(ctx, entry.market_id, &entry.commodity, |b| b.stock_bracket);
        let Some(faction) = self.station_faction_mut(ctx.session) else {
            tracing::debug!(commodity = %entry.commodity, "purchase outside a tracked station");
            return;
        };
        let slot = &mut faction.trade_buy[bracket];
        slot.value += entry.total_cost;
        slot.items += entry.count;
        self.credited(ctx);
    }

    /// Sales credit the station faction. Thargoid tissue samples are also a
    /// search and rescue hand-in and are reconciled before the trade is counted.
    pub fn trade_sold(&mut self, entry: &MarketSell, ctx: &mut EventContext<'_>) {
        if self.current_system_mut(ctx.session).is_none() {
            return;
        }
        if SandrCargo::from_collected(&entry.commodity) == Some(SandrCargo::TissueSample) {
            let count = u32::try_from(entry.count).unwrap_or(u32::MAX);
            self.search_and_rescue_handin(SandrCargo::TissueSample, count, ctx.indicator);
        }

        let bracket = market_bracket(ctx, entry.market_id, &entry.commodity, |b| b.demand_bracket);
        let Some(faction) = self.station_faction_mut(ctx.session) else {
            return;
        };
        let cost = entry.count as i64 * entry.avg_price_paid;
        let profit = entry.total_sale - cost;

        if entry.black_market {
            faction.black_market_profit += profit;
        } else {
            let slot = &mut faction.trade_sell[bracket];
            slot.profit += profit;
            slot.value += entry.total_sale;
            slot.items += entry.count;
        }
        self.credited(ctx);
    }

    // -----------------------------------------------------------------------
    // Combat context and crime
    // -----------------------------------------------------------------------

    /// Remember the faction of a scanned ship so a later murder can be
    /// charged to it; `CommitCrime` only names the system authority.
    pub fn ship_targeted(&mut self, entry: &ShipTargeted, ctx: &mut EventContext<'_>) {
        let (Some(faction), Some(pilot)) = (&entry.faction, &entry.pilot_name_localised) else {
            return;
        };
        ctx.session.last_ship_targeted = Some(TargetedShip {
            faction: faction.clone(),
            pilot_name_localised: pilot.clone(),
        });
    }

    pub fn crime_committed(&mut self, entry: &CommitCrime, ctx: &mut EventContext<'_>) {
        if self.current_system_mut(ctx.session).is_none() {
            return;
        }

        let (faction_name, on_foot) = match entry.crime_type.as_str() {
            CRIME_MURDER => {
                let Some(target) = &ctx.session.last_ship_targeted else {
                    return;
                };
                if entry.victim.as_deref() != Some(target.pilot_name_localised.as_str()) {
                    tracing::debug!(victim = ?entry.victim, "murder victim was not the last scanned ship");
                    return;
                }
                (target.faction.clone(), false)
            }
            CRIME_ON_FOOT_MURDER => (entry.faction.clone(), true),
            _ => return,
        };

        let mut credited = false;
        if let Some(system) = self.current_system_mut(ctx.session) {
            if let Some(faction) = system.factions.get_mut(&faction_name) {
                if on_foot {
                    faction.ground_murdered += 1;
                } else {
                    faction.murdered += 1;
                }
                credited = true;
            }
        }

        if credited {
            self.credited(ctx);
        }
    }

    /// Start a new ground combat context for the approached settlement.
    pub fn settlement_approached(&mut self, entry: &ApproachSettlement, ctx: &mut EventContext<'_>) {
        ctx.session.last_settlement_approached = Some(SettlementApproach {
            timestamp: entry.timestamp,
            name: entry.name.clone(),
            size: None,
        });
    }

    /// Something was recorded: mark for saving and signal the host.
    fn credited(&mut self, ctx: &mut EventContext<'_>) {
        self.dirty = true;
        ctx.indicator.indicate();
        self.recalculate_zero_activity();
    }
}

/// Bracket for a trade at `market_id`, or 0 when no market data is loaded.
fn market_bracket(
    ctx: &EventContext<'_>,
    market_id: u64,
    commodity: &str,
    pick: impl Fn(&crate::market::CommodityBrackets) -> u8,
) -> usize {
    if !ctx.market.available(market_id) {
        return 0;
    }
    ctx.market
        .commodity(commodity)
        .map(|brackets| pick(&brackets).min(MAX_BRACKET) as usize)
        .unwrap_or(0)
}
