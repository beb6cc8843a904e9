use super::{Activity, ActivityIndicator, EventContext};
use crate::journal::{CollectCargo, SearchAndRescue};
use crate::model::{PerCargo, SandrCargo};

impl Activity {
    /// Stage scooped search and rescue cargo against the current system.
    pub fn collect_cargo(&mut self, entry: &CollectCargo, ctx: &mut EventContext<'_>) {
        let Some(cargo) = SandrCargo::from_collected(&entry.commodity) else {
            return;
        };
        let Some(system) = self.current_system_mut(ctx.session) else {
            return;
        };
        system.search_and_rescue.get_mut(cargo).scooped += 1;
        self.dirty = true;
    }

    pub fn search_and_rescue(&mut self, entry: &SearchAndRescue, ctx: &mut EventContext<'_>) {
        let Some(cargo) = SandrCargo::from_handed_in(&entry.name) else {
            return;
        };
        if entry.count == 0 {
            return;
        }
        self.search_and_rescue_handin(cargo, entry.count, ctx.indicator);
    }

    /// Deliver `count` units of `cargo`.
    ///
    /// A hand-in does not say where the cargo was scooped, so staged units are
    /// drained greedily from every system until the count is used up. Units
    /// beyond what was ever staged are dropped.
    pub fn search_and_rescue_handin(
        &mut self,
        cargo: SandrCargo,
        mut count: u32,
        indicator: &mut dyn ActivityIndicator,
    ) {
        for system in self.systems.values_mut() {
            if count == 0 {
                break;
            }
            let tally = system.search_and_rescue.get_mut(cargo);
            let allocated = count.min(tally.scooped);
            if allocated == 0 {
                continue;
            }
            tally.scooped -= allocated;
            tally.delivered += allocated;
            count -= allocated;
            self.dirty = true;
            indicator.indicate();
        }
        if count > 0 {
            tracing::debug!(cargo = %cargo, unmatched = count, "hand-in exceeds staged cargo");
        }
        self.recalculate_zero_activity();
    }

    /// Scooped cargo is lost on death.
    pub fn player_resurrected(&mut self) {
        for system in self.systems.values_mut() {
            system.search_and_rescue = PerCargo::default();
        }
        self.dirty = true;
        self.recalculate_zero_activity();
    }
}
