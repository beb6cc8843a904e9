//! The per-tick activity ledger.
//!
//! One [`Activity`] covers one tick. Journal events are fed to its handler
//! methods (split across the submodules by event family) together with an
//! [`EventContext`]; each handler mutates the ledger and marks it dirty.

mod context;
mod ground_cz;
mod handlers;
mod missions;
mod sandr;

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::missions::MissionLog;
use crate::model::tick::tick_time;
use crate::model::{FactionActivity, FactionState, SystemActivity, Tick};
use crate::session::SessionState;

pub use context::{ActivityIndicator, EventContext, IndicatorFlag};
pub use missions::MissionTemplate;

/// Activity for a single tick, keyed by system address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    #[serde(rename = "tickid")]
    pub tick_id: String,
    #[serde(rename = "ticktime", with = "tick_time")]
    pub tick_time: DateTime<Utc>,
    #[serde(rename = "discordmessageid", default)]
    pub discord_bgs_message_id: Option<String>,
    #[serde(rename = "discordtwmessageid", default)]
    pub discord_tw_message_id: Option<String>,
    #[serde(rename = "discordnotes", default)]
    pub discord_notes: Option<String>,
    #[serde(default)]
    pub systems: BTreeMap<String, SystemActivity>,
    /// Set by every mutation, cleared by a successful save.
    #[serde(skip)]
    pub dirty: bool,
}

impl Activity {
    pub fn new(tick: &Tick) -> Self {
        Self {
            tick_id: tick.id.clone(),
            tick_time: tick.time,
            discord_bgs_message_id: None,
            discord_tw_message_id: None,
            discord_notes: None,
            systems: BTreeMap::new(),
            dirty: false,
        }
    }

    pub fn tick(&self) -> Tick {
        Tick::new(self.tick_id.clone(), self.tick_time)
    }

    /// Ledgers are ordered by tick time alone.
    pub fn cmp_tick(&self, other: &Activity) -> Ordering {
        self.tick_time.cmp(&other.tick_time)
    }

    // -----------------------------------------------------------------------
    // System and faction resolution
    // -----------------------------------------------------------------------

    /// The entry for `address`, inserting an empty one named `name` if absent.
    pub fn get_or_create_system(&mut self, address: &str, name: &str) -> &mut SystemActivity {
        self.systems
            .entry(address.to_string())
            .or_insert_with(|| SystemActivity::new(name, address))
    }

    pub fn get_or_create_faction(
        &mut self,
        address: &str,
        system_name: &str,
        faction_name: &str,
        state: Option<FactionState>,
    ) -> &mut FactionActivity {
        self.get_or_create_system(address, system_name)
            .get_or_create_faction(faction_name, state)
    }

    pub fn get_current_system(&self, session: &SessionState) -> Option<&SystemActivity> {
        session
            .current_system_id
            .as_deref()
            .and_then(|id| self.systems.get(id))
    }

    /// System addresses ordered for display: the current system first, then
    /// systems with activity, then the rest, each group by name.
    pub fn get_ordered_systems(&self, session: &SessionState) -> Vec<&str> {
        let current = session.current_system_id.as_deref();
        let mut ordered: Vec<(&String, &SystemActivity)> = self.systems.iter().collect();
        ordered.sort_by(|(a_addr, a), (b_addr, b)| {
            let a_key = (Some(a_addr.as_str()) != current, a.zero_activity, &a.name);
            let b_key = (Some(b_addr.as_str()) != current, b.zero_activity, &b.name);
            a_key.cmp(&b_key)
        });
        ordered.into_iter().map(|(addr, _)| addr.as_str()).collect()
    }

    // -----------------------------------------------------------------------
    // Zero activity and migration
    // -----------------------------------------------------------------------

    /// Bring every entry up to the current layout and refresh the cached
    /// `zero_activity` flags. Idempotent.
    pub fn recalculate_zero_activity(&mut self) {
        for (address, system) in self.systems.iter_mut() {
            apply_migration_defaults(address, system);
            system.recalculate_zero_activity();
        }
    }

    // -----------------------------------------------------------------------
    // Tick rollover
    // -----------------------------------------------------------------------

    /// Clear all activity at a tick boundary.
    ///
    /// A system is kept (with every faction reset and war kills zeroed) when
    /// it holds an active mission, is the player's current system, or still
    /// has scooped search and rescue cargo waiting for hand-in; that cargo is
    /// carried forward. Every other system is removed.
    ///
    /// Missions are matched by system *name* because that is all the mission
    /// log records. Two systems sharing a name will both be retained.
    pub fn clear_activity(&mut self, missions: &dyn MissionLog, session: &SessionState) {
        self.dirty = true;
        let mission_systems = missions.active_systems();
        let current = session.current_system_id.as_deref();

        self.systems.retain(|address, system| {
            mission_systems.contains(&system.name)
                || current == Some(address.as_str())
                || system.total_sandr_scooped() > 0
        });

        for system in self.systems.values_mut() {
            for faction in system.factions.values_mut() {
                *faction = faction.reset();
            }
            system.tw_kills = Default::default();
        }
        self.recalculate_zero_activity();
    }

    /// A new ledger for `tick` that starts from this one, cleared.
    pub fn rollover(&self, tick: &Tick, missions: &dyn MissionLog, session: &SessionState) -> Self {
        let mut next = Self {
            systems: self.systems.clone(),
            ..Self::new(tick)
        };
        next.clear_activity(missions, session);
        tracing::info!(
            from = %self.tick_id,
            to = %next.tick_id,
            retained = next.systems.len(),
            "tick rollover"
        );
        next
    }

    fn current_system_mut(&mut self, session: &SessionState) -> Option<&mut SystemActivity> {
        let id = session.current_system_id.as_deref()?;
        self.systems.get_mut(id)
    }

    /// The docked station's controlling faction in the current system.
    fn station_faction_mut(&mut self, session: &SessionState) -> Option<&mut FactionActivity> {
        let faction = session.station_faction.as_deref()?;
        self.current_system_mut(session)?.factions.get_mut(faction)
    }
}

/// Fill identity fields older files left blank. Everything else is defaulted
/// by serde when the record is read.
fn apply_migration_defaults(address: &str, system: &mut SystemActivity) {
    if system.address.is_empty() {
        system.address = address.to_string();
    }
    for (name, faction) in system.factions.iter_mut() {
        if faction.name != *name {
            faction.name = name.clone();
        }
        for (station_name, station) in faction.tw_stations.iter_mut() {
            if station.name.is_empty() {
                station.name = station_name.clone();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::TimeZone;

    use super::*;
    use crate::missions::Mission;
    use crate::model::{SandrCargo, ThargoidClass};

    struct FixedMissions(HashSet<String>);

    impl MissionLog for FixedMissions {
        fn get_mission(&self, _mission_id: u64) -> Option<&Mission> {
            None
        }

        fn active_systems(&self) -> HashSet<String> {
            self.0.clone()
        }

        fn delete_mission_by_id(&mut self, _mission_id: u64) {}
    }

    fn tick(hour: u32) -> Tick {
        Tick::new(
            format!("tick-{hour}"),
            Utc.with_ymd_and_hms(2023, 5, 17, hour, 0, 0).unwrap(),
        )
    }

    fn busy_system(activity: &mut Activity, address: &str, name: &str) {
        let faction = activity.get_or_create_faction(address, name, "Sirius Corp", Some(FactionState::War));
        faction.bounties = 1000;
        *activity.systems.get_mut(address).unwrap().tw_kills.get_mut(ThargoidClass::Scout) += 2;
    }

    #[test]
    fn get_or_create_system_is_idempotent() {
        let mut activity = Activity::new(&tick(1));
        activity.get_or_create_system("1", "Sol").factions.clear();
        activity.get_or_create_system("1", "Renamed");
        assert_eq!(activity.systems.len(), 1);
        assert_eq!(activity.systems["1"].name, "Sol");
    }

    #[test]
    fn ledgers_order_by_tick_time() {
        let earlier = Activity::new(&tick(1));
        let later = Activity::new(&tick(2));
        assert_eq!(earlier.cmp_tick(&later), Ordering::Less);
        assert_eq!(later.cmp_tick(&earlier), Ordering::Greater);
    }

    #[test]
    fn recalculation_is_idempotent() {
        let mut activity = Activity::new(&tick(1));
        busy_system(&mut activity, "1", "Sol");
        activity.get_or_create_system("2", "Achenar");
        activity.recalculate_zero_activity();
        let once = activity.clone();
        activity.recalculate_zero_activity();
        assert_eq!(activity, once);
        assert!(!activity.systems["1"].zero_activity);
        assert!(activity.systems["2"].zero_activity);
    }

    #[test]
    fn recalculation_repairs_faction_names() {
        let mut activity = Activity::new(&tick(1));
        let faction = activity.get_or_create_faction("1", "Sol", "Mother Gaia", None);
        faction.name.clear();
        activity.recalculate_zero_activity();
        assert_eq!(activity.systems["1"].factions["Mother Gaia"].name, "Mother Gaia");
    }

    #[test]
    fn ordered_systems_put_current_then_active_first() {
        let mut activity = Activity::new(&tick(1));
        activity.get_or_create_system("1", "Alpha");
        busy_system(&mut activity, "2", "Zeta");
        activity.get_or_create_system("3", "Beta");
        activity.recalculate_zero_activity();

        let session = SessionState {
            current_system_id: Some("3".into()),
            ..SessionState::default()
        };
        assert_eq!(activity.get_ordered_systems(&session), vec!["3", "2", "1"]);
    }

    #[test]
    fn clear_removes_idle_systems_and_resets_retained_ones() {
        let mut activity = Activity::new(&tick(1));
        busy_system(&mut activity, "1", "Idle");
        busy_system(&mut activity, "2", "Mission Target");
        busy_system(&mut activity, "3", "Current");
        busy_system(&mut activity, "4", "Rescue Site");
        activity
            .systems
            .get_mut("4")
            .unwrap()
            .search_and_rescue
            .get_mut(SandrCargo::BlackBox)
            .scooped = 2;

        let missions = FixedMissions(HashSet::from(["Mission Target".to_string()]));
        let session = SessionState {
            current_system_id: Some("3".into()),
            ..SessionState::default()
        };
        activity.clear_activity(&missions, &session);

        assert!(!activity.systems.contains_key("1"));
        for address in ["2", "3", "4"] {
            let system = &activity.systems[address];
            let faction = &system.factions["Sirius Corp"];
            assert!(faction.is_zero());
            assert_eq!(faction.state, FactionState::War);
            assert_eq!(system.total_tw_kills(), 0);
            assert!(system.zero_activity);
        }
        assert_eq!(activity.systems["4"].search_and_rescue.bb.scooped, 2);
        assert!(activity.dirty);
    }

    #[test]
    fn rollover_copies_and_clears_without_touching_source() {
        let mut activity = Activity::new(&tick(1));
        activity.discord_bgs_message_id = Some("123".into());
        busy_system(&mut activity, "3", "Current");
        let session = SessionState {
            current_system_id: Some("3".into()),
            ..SessionState::default()
        };
        let missions = FixedMissions(HashSet::new());

        let next = activity.rollover(&tick(2), &missions, &session);
        assert_eq!(next.tick_id, "tick-2");
        assert!(next.discord_bgs_message_id.is_none());
        assert!(next.systems["3"].factions["Sirius Corp"].is_zero());
        assert_eq!(activity.systems["3"].factions["Sirius Corp"].bounties, 1000);
    }
}
