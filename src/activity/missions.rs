use super::{Activity, EventContext};
use crate::journal::{MissionCompleted, MissionRef};
use crate::model::{CzSize, FactionState, ThargoidClass};

/// Escape pod commodity delivered by Thargoid war rescue missions.
const COMMODITY_OCCUPIED_CRYO_POD: &str = "$OccupiedCryoPod_Name;";

// Missions worth +1 influence in an election even when the journal reports none.
const MISSIONS_ELECTION: &[&str] = &[
    "Mission_AltruismCredits_name",
    "Mission_Collect_name",
    "Mission_Collect_Industrial_name",
    "Mission_Courier_name",
    "Mission_Courier_Boom_name",
    "Mission_Courier_Democracy_name",
    "Mission_Courier_Elections_name",
    "Mission_Courier_Expansion_name",
    "Mission_Delivery_name",
    "Mission_Delivery_Agriculture_name",
    "Mission_Delivery_Boom_name",
    "Mission_Delivery_Confederacy_name",
    "Mission_Delivery_Democracy_name",
    "Mission_Mining_name",
    "Mission_Mining_Boom_name",
    "Mission_Mining_Expansion_name",
    "Mission_OnFoot_Collect_MB_name",
    "Mission_OnFoot_Salvage_MB_name",
    "Mission_OnFoot_Salvage_BS_MB_name",
    "Mission_PassengerBulk_name",
    "Mission_PassengerBulk_AIDWORKER_ARRIVING_name",
    "Mission_PassengerBulk_BUSINESS_ARRIVING_name",
    "Mission_PassengerBulk_POLITICIAN_ARRIVING_name",
    "Mission_PassengerBulk_SECURITY_ARRIVING_name",
    "Mission_PassengerVIP_name",
    "Mission_PassengerVIP_CEO_BOOM_name",
    "Mission_PassengerVIP_CEO_EXPANSION_name",
    "Mission_PassengerVIP_Explorer_EXPANSION_name",
    "Mission_PassengerVIP_Tourist_ELECTION_name",
    "Mission_PassengerVIP_Tourist_BOOM_name",
    "Mission_Rescue_Elections_name",
    "Mission_Salvage_name",
    "Mission_Salvage_Planet_name",
    "MISSION_Salvage_Refinery_name",
    "MISSION_Scan_name",
    "Mission_Sightseeing_name",
    "Mission_Sightseeing_Celebrity_ELECTION_name",
    "Mission_Sightseeing_Tourist_BOOM_name",
    "Chain_HelpFinishTheOrder_name",
];

// Missions worth +1 influence in a war or civil war even when the journal reports none.
const MISSIONS_WAR: &[&str] = &[
    "Mission_Assassinate_Legal_CivilWar_name",
    "Mission_Assassinate_Legal_War_name",
    "Mission_Massacre_Conflict_CivilWar_name",
    "Mission_Massacre_Conflict_War_name",
    "Mission_OnFoot_Assassination_Covert_MB_name",
    "Mission_OnFoot_Onslaught_Offline_MB_name",
];

const MISSIONS_TW_COLLECT: &[&str] = &[
    "Mission_TW_Collect_Alert_name",
    "Mission_TW_CollectWing_Alert_name",
    "Mission_TW_Collect_Repairing_name",
    "Mission_TW_CollectWing_Repairing_name",
    "Mission_TW_Collect_Recovery_name",
    "Mission_TW_CollectWing_Recovery_name",
    "Mission_TW_Collect_UnderAttack_name",
    "Mission_TW_CollectWing_UnderAttack_name",
];

// Evacuations, by severity of the station's situation. Each pair is the
// cargo ("Rescue") and passenger variant.
const MISSIONS_TW_EVAC_LOW: &[&str] = &[
    "Mission_TW_Rescue_Alert_name",
    "Mission_TW_PassengerEvacuation_Alert_name",
];
const MISSIONS_TW_EVAC_MED: &[&str] = &[
    "Mission_TW_Rescue_UnderAttack_name",
    "Mission_TW_PassengerEvacuation_UnderAttack_name",
];
const MISSIONS_TW_EVAC_HIGH: &[&str] = &[
    "Mission_TW_Rescue_Burning_name",
    "Mission_TW_PassengerEvacuation_Burning_name",
];

const MISSIONS_TW_MASSACRE: &[&str] = &[
    "Mission_TW_Massacre_Scout_Singular_name",
    "Mission_TW_Massacre_Scout_Plural_name",
    "Mission_TW_Massacre_Cyclops_Singular_name",
    "Mission_TW_Massacre_Cyclops_Plural_name",
    "Mission_TW_Massacre_Basilisk_Singular_name",
    "Mission_TW_Massacre_Basilisk_Plural_name",
    "Mission_TW_Massacre_Medusa_Singular_name",
    "Mission_TW_Massacre_Medusa_Plural_name",
    "Mission_TW_Massacre_Hydra_Singular_name",
    "Mission_TW_Massacre_Hydra_Plural_name",
    "Mission_TW_Massacre_Orthrus_Singular_name",
    "Mission_TW_Massacre_Orthrus_Plural_name",
];

/// How a mission template is accounted for beyond its reported influence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissionTemplate {
    /// Implicit +1 for the giver during an election.
    Election,
    /// Implicit +1 for the giver during a war or civil war.
    War,
    ThargoidCollect,
    ThargoidEvacuation(CzSize),
    ThargoidMassacre,
    Other,
}

impl MissionTemplate {
    pub fn classify(name: &str) -> Self {
        if MISSIONS_ELECTION.contains(&name) {
            MissionTemplate::Election
        } else if MISSIONS_WAR.contains(&name) {
            MissionTemplate::War
        } else if MISSIONS_TW_COLLECT.contains(&name) {
            MissionTemplate::ThargoidCollect
        } else if MISSIONS_TW_EVAC_LOW.contains(&name) {
            MissionTemplate::ThargoidEvacuation(CzSize::Low)
        } else if MISSIONS_TW_EVAC_MED.contains(&name) {
            MissionTemplate::ThargoidEvacuation(CzSize::Medium)
        } else if MISSIONS_TW_EVAC_HIGH.contains(&name) {
            MissionTemplate::ThargoidEvacuation(CzSize::High)
        } else if MISSIONS_TW_MASSACRE.contains(&name) {
            MissionTemplate::ThargoidMassacre
        } else {
            MissionTemplate::Other
        }
    }

    /// Whether completing this mission counts +1 for a giver in `state` when
    /// the journal reports no influence.
    pub fn implicit_credit(self, state: &FactionState) -> bool {
        match self {
            MissionTemplate::Election => state.is_election(),
            MissionTemplate::War => state.is_war(),
            MissionTemplate::ThargoidCollect
            | MissionTemplate::ThargoidEvacuation(_)
            | MissionTemplate::ThargoidMassacre
            | MissionTemplate::Other => false,
        }
    }

    pub fn is_thargoid_war(self) -> bool {
        matches!(
            self,
            MissionTemplate::ThargoidCollect
                | MissionTemplate::ThargoidEvacuation(_)
                | MissionTemplate::ThargoidMassacre
        )
    }

    fn severity(self) -> Option<CzSize> {
        match self {
            MissionTemplate::ThargoidEvacuation(size) => Some(size),
            _ => None,
        }
    }
}

impl Activity {
    /// Credit a completed mission's influence, then the Thargoid war
    /// breakdown, and remove the mission from the log.
    pub fn mission_completed(&mut self, entry: &MissionCompleted, ctx: &mut EventContext<'_>) {
        self.dirty = true;
        let mission = ctx.missions.get_mission(entry.mission_id).cloned();
        let template = MissionTemplate::classify(&entry.name);

        for effect in &entry.faction_effects {
            let is_giver = effect.faction == entry.faction;

            if !effect.influence.is_empty() {
                for influence in &effect.influence {
                    let address = influence.system_address.to_string();
                    let Some(faction) = self
                        .systems
                        .get_mut(&address)
                        .and_then(|system| system.factions.get_mut(&effect.faction))
                    else {
                        continue;
                    };
                    ctx.indicator.indicate();
                    if is_giver {
                        faction.mission_points += influence.signed_delta();
                    } else {
                        faction.mission_points_secondary += influence.signed_delta();
                    }
                }
            } else if let Some(mission) = &mission {
                if !is_giver {
                    continue;
                }
                for system in self.systems.values_mut().filter(|s| s.name == mission.system) {
                    let Some(faction) = system.factions.get_mut(&effect.faction) else {
                        continue;
                    };
                    if template.implicit_credit(&faction.state) {
                        faction.mission_points += 1;
                        ctx.indicator.indicate();
                    }
                }
            }
        }

        if template.is_thargoid_war() {
            self.thargoid_mission_completed(entry, template, ctx);
        }

        self.recalculate_zero_activity();
        ctx.missions.delete_mission_by_id(entry.mission_id);
    }

    fn thargoid_mission_completed(
        &mut self,
        entry: &MissionCompleted,
        template: MissionTemplate,
        ctx: &mut EventContext<'_>,
    ) {
        let Some(mission) = ctx.missions.get_mission(entry.mission_id) else {
            tracing::debug!(mission_id = entry.mission_id, "thargoid war mission not in log");
            return;
        };
        if mission.station.is_empty() {
            return;
        }

        for system in self.systems.values_mut().filter(|s| s.name == mission.system) {
            let Some(faction) = system.factions.get_mut(&entry.faction) else {
                continue;
            };
            let station = faction.tw_station_mut(&mission.station);

            if let Some(passengers) = mission.passenger_count {
                ctx.indicator.indicate();
                if let Some(severity) = template.severity() {
                    station.passengers.get_mut(severity).record(passengers.into());
                }
            } else if let Some(commodities) = mission.commodity_count {
                ctx.indicator.indicate();
                if entry.commodity.as_deref() == Some(COMMODITY_OCCUPIED_CRYO_POD) {
                    if let Some(severity) = template.severity() {
                        station.escapepods.get_mut(severity).record(commodities.into());
                    }
                } else {
                    station.cargo.record(commodities.into());
                }
            } else if let Some(kills) = mission.kill_count {
                ctx.indicator.indicate();
                if let Some(class) = entry
                    .target_type
                    .as_deref()
                    .and_then(ThargoidClass::from_target_type)
                {
                    station.massacre.get_mut(class).record(kills.into());
                }
            }
        }
    }

    /// Count a failed mission against its giver and drop it from the log.
    pub fn mission_failed(&mut self, entry: &MissionRef, ctx: &mut EventContext<'_>) {
        let Some(mission) = ctx.missions.get_mission(entry.mission_id).cloned() else {
            return;
        };
        self.dirty = true;
        ctx.indicator.indicate();

        if let Some(system) = self.systems.values_mut().find(|s| s.name == mission.system) {
            if let Some(faction) = system.factions.get_mut(&mission.faction) {
                faction.mission_failed += 1;
            }
        }
        ctx.missions.delete_mission_by_id(mission.mission_id);
        self.recalculate_zero_activity();
    }
}
