use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use super::faction::FactionActivity;
use super::tags::{FactionState, PerCargo, PerClass, SandrCargo, ThargoidClass};

/// Search and rescue cargo of one kind: staged when scooped, moved to
/// `delivered` when handed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SandrTally {
    pub scooped: u32,
    pub delivered: u32,
}

/// Activity in one star system during a tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemActivity {
    #[serde(rename = "System")]
    pub name: String,
    #[serde(rename = "SystemAddress", default, deserialize_with = "address_string")]
    pub address: String,
    /// Cached; only trust it after `Activity::recalculate_zero_activity`.
    #[serde(rename = "zero_system_activity", default = "default_true")]
    pub zero_activity: bool,
    #[serde(rename = "Factions", default)]
    pub factions: BTreeMap<String, FactionActivity>,
    #[serde(rename = "TWKills", default)]
    pub tw_kills: PerClass<u32>,
    #[serde(rename = "TWSandR", default)]
    pub search_and_rescue: PerCargo<SandrTally>,
}

impl SystemActivity {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            zero_activity: true,
            factions: BTreeMap::new(),
            tw_kills: PerClass::default(),
            search_and_rescue: PerCargo::default(),
        }
    }

    /// Look up a faction, creating a clean entry if it is not tracked yet.
    /// An existing faction's state is refreshed only when `state` is given;
    /// its counters are never touched.
    pub fn get_or_create_faction(
        &mut self,
        name: &str,
        state: Option<FactionState>,
    ) -> &mut FactionActivity {
        let faction = self
            .factions
            .entry(name.to_string())
            .or_insert_with(|| FactionActivity::new(name, FactionState::None));
        if let Some(state) = state {
            faction.state = state;
        }
        faction
    }

    pub fn total_tw_kills(&self) -> u32 {
        ThargoidClass::ALL
            .iter()
            .map(|&class| *self.tw_kills.get(class))
            .sum()
    }

    pub fn total_sandr_scooped(&self) -> u32 {
        SandrCargo::ALL
            .iter()
            .map(|&cargo| self.search_and_rescue.get(cargo).scooped)
            .sum()
    }

    pub fn total_sandr_delivered(&self) -> u32 {
        SandrCargo::ALL
            .iter()
            .map(|&cargo| self.search_and_rescue.get(cargo).delivered)
            .sum()
    }

    /// Recompute and store the cached `zero_activity` flag.
    pub fn recalculate_zero_activity(&mut self) -> bool {
        self.zero_activity = self.factions.values().all(FactionActivity::is_zero)
            && self.total_tw_kills() == 0
            && self.total_sandr_delivered() == 0;
        self.zero_activity
    }
}

fn default_true() -> bool {
    true
}

/// System addresses were written both as JSON numbers and as strings over the
/// life of the file format. Accept either and normalize to a string.
fn address_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum AddressInput {
        String(String),
        Number(u64),
    }

    Ok(match AddressInput::deserialize(deserializer)? {
        AddressInput::String(raw) => raw,
        AddressInput::Number(value) => value.to_string(),
    })
}
