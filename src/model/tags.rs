use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Conflict zone size
// ---------------------------------------------------------------------------

/// Combat bonds below this reward are a low intensity ground conflict zone.
pub const CZ_GROUND_LOW_CB_MAX: i64 = 5_000;
/// Combat bonds below this reward (and not low) are medium intensity.
pub const CZ_GROUND_MED_CB_MAX: i64 = 38_000;

/// Intensity of a conflict zone. Ordered so that `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum CzSize {
    Low,
    Medium,
    High,
}

tag_enum!(CzSize {
    Low => "l",
    Medium => "m",
    High => "h",
});

impl CzSize {
    /// Classify an on-foot combat bond reward.
    pub fn from_ground_reward(reward: i64) -> Self {
        if reward < CZ_GROUND_LOW_CB_MAX {
            CzSize::Low
        } else if reward < CZ_GROUND_MED_CB_MAX {
            CzSize::Medium
        } else {
            CzSize::High
        }
    }
}

// ---------------------------------------------------------------------------
// Thargoid ship classes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ThargoidClass {
    Scout,
    Cyclops,
    Basilisk,
    Medusa,
    Hydra,
    Orthrus,
}

tag_enum!(ThargoidClass {
    Scout => "s",
    Cyclops => "c",
    Basilisk => "b",
    Medusa => "m",
    Hydra => "h",
    Orthrus => "o",
});

impl ThargoidClass {
    /// Identify the ship from the combat bond paid for killing it.
    pub fn from_bond_reward(reward: i64) -> Option<Self> {
        match reward {
            65_000 | 75_000 => Some(ThargoidClass::Scout),
            6_500_000 => Some(ThargoidClass::Cyclops),
            20_000_000 => Some(ThargoidClass::Basilisk),
            25_000_000 => Some(ThargoidClass::Orthrus),
            34_000_000 => Some(ThargoidClass::Medusa),
            50_000_000 => Some(ThargoidClass::Hydra),
            _ => None,
        }
    }

    /// Identify the ship from a massacre mission's `TargetType` tag.
    pub fn from_target_type(target_type: &str) -> Option<Self> {
        match target_type {
            "$MissionUtil_FactionTag_Scout;" => Some(ThargoidClass::Scout),
            "$MissionUtil_FactionTag_Cyclops;" => Some(ThargoidClass::Cyclops),
            "$MissionUtil_FactionTag_Basilisk;" => Some(ThargoidClass::Basilisk),
            "$MissionUtil_FactionTag_Medusa;" => Some(ThargoidClass::Medusa),
            "$MissionUtil_FactionTag_Hydra;" => Some(ThargoidClass::Hydra),
            "$MissionUtil_FactionTag_Orthrus;" => Some(ThargoidClass::Orthrus),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Search and rescue cargo
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum SandrCargo {
    DamagedEscapePod,
    OccupiedCryoPod,
    BlackBox,
    TissueSample,
}

tag_enum!(SandrCargo {
    DamagedEscapePod => "dp",
    OccupiedCryoPod => "op",
    BlackBox => "bb",
    TissueSample => "t",
});

impl SandrCargo {
    /// Classify a collected commodity (`CollectCargo.Type`). Any tissue sample
    /// variant counts as [`SandrCargo::TissueSample`].
    pub fn from_collected(commodity: &str) -> Option<Self> {
        let commodity = commodity.to_lowercase();
        match commodity.as_str() {
            "damagedescapepod" => Some(SandrCargo::DamagedEscapePod),
            "occupiedcryopod" => Some(SandrCargo::OccupiedCryoPod),
            "usscargoblackbox" => Some(SandrCargo::BlackBox),
            other if is_tissue_sample(other) => Some(SandrCargo::TissueSample),
            _ => None,
        }
    }

    /// Classify a search and rescue hand-in (`SearchAndRescue.Name`). Tissue
    /// samples are sold as commodities instead, so they never match here.
    pub fn from_handed_in(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "damagedescapepod" => Some(SandrCargo::DamagedEscapePod),
            "occupiedcryopod" => Some(SandrCargo::OccupiedCryoPod),
            "usscargoblackbox" => Some(SandrCargo::BlackBox),
            _ => None,
        }
    }
}

pub fn is_tissue_sample(commodity: &str) -> bool {
    commodity.to_lowercase().contains("thargoidtissuesample")
}

// ---------------------------------------------------------------------------
// Faction state
// ---------------------------------------------------------------------------

/// Political state of a faction. Only the conflict states drive accounting;
/// everything else the game reports (Boom, Expansion, ...) is carried as
/// `Custom`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum FactionState {
    #[default]
    None,
    War,
    CivilWar,
    Election,
    Custom(String),
}

open_tag_enum!(FactionState {
    None => "None",
    War => "War",
    CivilWar => "CivilWar",
    Election => "Election",
});

impl FactionState {
    pub fn is_war(&self) -> bool {
        matches!(self, FactionState::War | FactionState::CivilWar)
    }

    pub fn is_election(&self) -> bool {
        matches!(self, FactionState::Election)
    }

    pub fn is_conflict(&self) -> bool {
        self.is_war() || self.is_election()
    }

    /// State for a conflict's `WarType` tag.
    pub fn from_war_type(war_type: &str) -> Self {
        match war_type {
            "war" => FactionState::War,
            "civilwar" => FactionState::CivilWar,
            "election" => FactionState::Election,
            _ => FactionState::None,
        }
    }
}

// ---------------------------------------------------------------------------
// Report inclusion flag
// ---------------------------------------------------------------------------

/// User toggle controlling whether an entry appears in reports. Never affects
/// accumulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum CheckState {
    #[default]
    On,
    Off,
    Partial,
}

tag_enum!(CheckState {
    On => "Yes",
    Off => "No",
    Partial => "Partial",
});

// ---------------------------------------------------------------------------
// Tag-keyed counter groups
// ---------------------------------------------------------------------------

/// One value per [`CzSize`], persisted as `{"l": .., "m": .., "h": ..}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PerSize<T> {
    #[serde(rename = "l")]
    pub low: T,
    #[serde(rename = "m")]
    pub medium: T,
    #[serde(rename = "h")]
    pub high: T,
}

impl<T> PerSize<T> {
    pub fn get(&self, size: CzSize) -> &T {
        match size {
            CzSize::Low => &self.low,
            CzSize::Medium => &self.medium,
            CzSize::High => &self.high,
        }
    }

    pub fn get_mut(&mut self, size: CzSize) -> &mut T {
        match size {
            CzSize::Low => &mut self.low,
            CzSize::Medium => &mut self.medium,
            CzSize::High => &mut self.high,
        }
    }

    pub fn values(&self) -> [&T; 3] {
        [&self.low, &self.medium, &self.high]
    }
}

/// One value per [`ThargoidClass`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PerClass<T> {
    #[serde(rename = "s")]
    pub scout: T,
    #[serde(rename = "c")]
    pub cyclops: T,
    #[serde(rename = "b")]
    pub basilisk: T,
    #[serde(rename = "m")]
    pub medusa: T,
    #[serde(rename = "h")]
    pub hydra: T,
    #[serde(rename = "o")]
    pub orthrus: T,
}

impl<T> PerClass<T> {
    pub fn get(&self, class: ThargoidClass) -> &T {
        match class {
            ThargoidClass::Scout => &self.scout,
            ThargoidClass::Cyclops => &self.cyclops,
            ThargoidClass::Basilisk => &self.basilisk,
            ThargoidClass::Medusa => &self.medusa,
            ThargoidClass::Hydra => &self.hydra,
            ThargoidClass::Orthrus => &self.orthrus,
        }
    }

    pub fn get_mut(&mut self, class: ThargoidClass) -> &mut T {
        match class {
            ThargoidClass::Scout => &mut self.scout,
            ThargoidClass::Cyclops => &mut self.cyclops,
            ThargoidClass::Basilisk => &mut self.basilisk,
            ThargoidClass::Medusa => &mut self.medusa,
            ThargoidClass::Hydra => &mut self.hydra,
            ThargoidClass::Orthrus => &mut self.orthrus,
        }
    }
}

/// One value per [`SandrCargo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PerCargo<T> {
    pub dp: T,
    pub op: T,
    pub bb: T,
    pub t: T,
}

impl<T> PerCargo<T> {
    pub fn get(&self, cargo: SandrCargo) -> &T {
        match cargo {
            SandrCargo::DamagedEscapePod => &self.dp,
            SandrCargo::OccupiedCryoPod => &self.op,
            SandrCargo::BlackBox => &self.bb,
            SandrCargo::TissueSample => &self.t,
        }
    }

    pub fn get_mut(&mut self, cargo: SandrCargo) -> &mut T {
        match cargo {
            SandrCargo::DamagedEscapePod => &mut self.dp,
            SandrCargo::OccupiedCryoPod => &mut self.op,
            SandrCargo::BlackBox => &mut self.bb,
            SandrCargo::TissueSample => &mut self.t,
        }
    }
}
