use chrono::Duration;

use super::{Activity, EventContext};
use crate::journal::FactionKillBond;
use crate::model::{CzSize, SettlementActivity, ThargoidClass};

/// Bonds are attributed to the last approached settlement only while each
/// arrives within this long of the previous one.
pub const SETTLEMENT_WINDOW_MINUTES: i64 = 5;

const VICTIM_FACTION_THARGOID: &str = "$faction_Thargoid;";

impl Activity {
    /// A combat bond was awarded for a kill.
    ///
    /// Thargoid kills are counted per class. Any other bond counts towards a
    /// ground conflict zone at the settlement approached within the window.
    /// Team kills split the reward, so the zone size is reassessed on every
    /// bond and only ever escalates.
    pub fn cb_received(&mut self, entry: &FactionKillBond, ctx: &mut EventContext<'_>) {
        let Some(address) = ctx.session.current_system_id.as_deref() else {
            return;
        };
        let Some(system) = self.systems.get_mut(address) else {
            return;
        };

        if entry.victim_faction == VICTIM_FACTION_THARGOID {
            match ThargoidClass::from_bond_reward(entry.reward) {
                Some(class) => *system.tw_kills.get_mut(class) += 1,
                None => tracing::debug!(reward = entry.reward, "unrecognised thargoid bond"),
            }
            self.dirty = true;
            ctx.indicator.indicate();
            self.recalculate_zero_activity();
            return;
        }

        let Some(approach) = ctx.session.last_settlement_approached.as_mut() else {
            return;
        };
        self.dirty = true;
        ctx.indicator.indicate();

        if entry.timestamp - approach.timestamp > Duration::minutes(SETTLEMENT_WINDOW_MINUTES) {
            ctx.session.last_settlement_approached = None;
            return;
        }
        approach.timestamp = entry.timestamp;

        let Some(faction) = system.factions.get_mut(&entry.awarding_faction) else {
            return;
        };
        let settlement = faction
            .ground_cz_settlements
            .entry(approach.name.clone())
            .or_insert_with(|| SettlementActivity::new(CzSize::Low));

        let previous = approach.size;
        if previous.is_none() {
            settlement.count += 1;
        }

        let size = CzSize::from_ground_reward(entry.reward);
        if previous.is_none_or(|counted| size > counted) {
            *faction.ground_cz.get_mut(size) += 1;
            if let Some(counted) = previous {
                let old = faction.ground_cz.get_mut(counted);
                *old = old.saturating_sub(1);
            }
            settlement.size = size;
            approach.size = Some(size);
        }

        self.recalculate_zero_activity();
    }
}
