pub mod activity;
pub mod config;
pub mod journal;
pub mod manager;
pub mod market;
pub mod missions;
pub mod model;
pub mod requests;
pub mod session;
pub mod store;
pub mod tally;
pub mod targetlog;

pub use activity::{Activity, ActivityIndicator, EventContext, IndicatorFlag, MissionTemplate};
pub use config::{ConfigError, TallyConfig};
pub use journal::JournalEvent;
pub use manager::ActivityManager;
pub use market::{MarketData, MarketSnapshot, NoMarket};
pub use missions::{Mission, MissionLog, PendingMissions};
pub use model::{
    CheckState, CzSize, FactionActivity, FactionState, SandrCargo, SystemActivity, ThargoidClass,
    Tick,
};
pub use requests::{RequestError, RequestManager, Transport, UreqTransport};
pub use session::SessionState;
pub use store::{ActivityStore, StoreError};
pub use tally::Tally;
pub use targetlog::{ProfileLookup, TargetLog};
