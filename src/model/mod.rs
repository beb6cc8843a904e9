#[macro_use]
mod macros;

pub mod faction;
pub mod system;
pub mod tags;
pub mod tick;

pub use faction::{
    BuyBracket, FactionActivity, MARKET_BRACKETS, MissionTally, SellBracket, SettlementActivity,
    TwStation,
};
pub use system::{SandrTally, SystemActivity};
pub use tags::{
    CheckState, CzSize, FactionState, PerCargo, PerClass, PerSize, SandrCargo, ThargoidClass,
};
pub use tick::Tick;
