//! Host-side wiring: owns the ledgers and their collaborators and routes
//! journal events to the right handler.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;

use crate::activity::{EventContext, IndicatorFlag};
use crate::config::TallyConfig;
use crate::journal::{JournalEvent, RedeemVoucher};
use crate::manager::ActivityManager;
use crate::market::MarketSnapshot;
use crate::missions::PendingMissions;
use crate::model::Tick;
use crate::requests::{Request, RequestError, RequestManager};
use crate::session::SessionState;
use crate::store::StoreError;
use crate::targetlog::{ProfileLookup, TargetLog};

const VOUCHER_BOUNTY: &str = "bounty";
const VOUCHER_COMBAT_BOND: &str = "CombatBond";

pub struct Tally {
    pub config: TallyConfig,
    pub activity: ActivityManager,
    pub session: SessionState,
    pub missions: PendingMissions,
    pub market: MarketSnapshot,
    pub target_log: Arc<Mutex<TargetLog>>,
    pub indicator: IndicatorFlag,
    requests: Option<RequestManager>,
}

impl Tally {
    /// Load persisted state from `config.data_dir`. Pass `None` for
    /// `requests` to disable profile lookups.
    pub fn new(config: TallyConfig, current_tick: &Tick, requests: Option<RequestManager>) -> Self {
        let activity = ActivityManager::load(&config.activity_dir(), &config.data_dir, current_tick);
        let mut missions = PendingMissions::load(&config.mission_log_path());
        missions.expire(Utc::now());
        let target_log = TargetLog::load(
            &config.target_log_path(),
            config.target_log_expiry_days,
            Utc::now(),
        );
        Self {
            config,
            activity,
            session: SessionState::new(),
            missions,
            market: MarketSnapshot::new(),
            target_log: Arc::new(Mutex::new(target_log)),
            indicator: IndicatorFlag::new(),
            requests,
        }
    }

    /// Apply one parsed journal event to the current ledger.
    pub fn journal_entry(&mut self, event: &JournalEvent) {
        match event {
            JournalEvent::Location(entry)
            | JournalEvent::FsdJump(entry)
            | JournalEvent::CarrierJump(entry) => self.session.arrived(entry),
            JournalEvent::MissionAccepted(entry) => {
                self.missions.mission_accepted(entry, &self.session)
            }
            _ => {}
        }

        let lookup = self.target_event(event);

        let activity = self.activity.current_mut();
        let mut ctx = EventContext {
            session: &mut self.session,
            missions: &mut self.missions,
            market: &self.market,
            indicator: &mut self.indicator,
        };

        match event {
            JournalEvent::Location(entry)
            | JournalEvent::FsdJump(entry)
            | JournalEvent::CarrierJump(entry) => activity.system_entered(entry, &mut ctx),
            JournalEvent::Docked(entry) => ctx.session.docked(entry),
            JournalEvent::Undocked(_) => ctx.session.undocked(),
            JournalEvent::MissionCompleted(entry) => activity.mission_completed(entry, &mut ctx),
            JournalEvent::MissionFailed(entry) | JournalEvent::MissionAbandoned(entry) => {
                activity.mission_failed(entry, &mut ctx)
            }
            JournalEvent::SellExplorationData(entry) | JournalEvent::MultiSellExplorationData(entry) => {
                activity.exploration_data_sold(entry, &mut ctx)
            }
            JournalEvent::SellOrganicData(entry) => activity.organic_data_sold(entry, &mut ctx),
            JournalEvent::RedeemVoucher(entry) => redeem_voucher(activity, entry, &mut ctx),
            JournalEvent::MarketBuy(entry) => activity.trade_purchased(entry, &mut ctx),
            JournalEvent::MarketSell(entry) => activity.trade_sold(entry, &mut ctx),
            JournalEvent::ShipTargeted(entry) => activity.ship_targeted(entry, &mut ctx),
            JournalEvent::CommitCrime(entry) => activity.crime_committed(entry, &mut ctx),
            JournalEvent::ApproachSettlement(entry) => activity.settlement_approached(entry, &mut ctx),
            JournalEvent::FactionKillBond(entry) => activity.cb_received(entry, &mut ctx),
            JournalEvent::CollectCargo(entry) => activity.collect_cargo(entry, &mut ctx),
            JournalEvent::SearchAndRescue(entry) => activity.search_and_rescue(entry, &mut ctx),
            JournalEvent::Resurrect(_) | JournalEvent::Died(_) => activity.player_resurrected(),
            JournalEvent::MissionAccepted(_) | JournalEvent::Friends(_) | JournalEvent::Other => {}
        }

        if let Some(lookup) = lookup {
            self.queue_profile_lookup(lookup);
        }
    }

    /// Parse and apply one raw journal line. Lines that do not parse are
    /// skipped.
    pub fn journal_line(&mut self, line: &str) {
        match JournalEvent::from_line(line) {
            Ok(event) => self.journal_entry(&event),
            Err(e) => tracing::debug!(error = %e, "skipping unparseable journal line"),
        }
    }

    /// Load a fresh `Market.json` snapshot.
    pub fn market_updated(&mut self, raw: &str) {
        match MarketSnapshot::from_json(raw) {
            Ok(market) => self.market = market,
            Err(e) => tracing::debug!(error = %e, "ignoring unreadable market data"),
        }
    }

    /// Roll over to `tick` if it is new.
    pub fn new_tick(&mut self, tick: &Tick) -> bool {
        self.activity.new_tick(tick, &self.missions, &self.session)
    }

    pub fn save(&mut self) -> Result<(), StoreError> {
        self.activity.save()?;
        self.missions.save(&self.config.mission_log_path())?;
        self.target_lock().save()
    }

    fn target_event(&self, event: &JournalEvent) -> Option<ProfileLookup> {
        let system = self.session.current_system_name.clone().unwrap_or_default();
        match event {
            JournalEvent::ShipTargeted(entry) => self.target_lock().ship_targeted(entry, &system),
            JournalEvent::Friends(entry) if entry.status == "Requested" => {
                self.target_lock().friend_request(entry, &system)
            }
            _ => None,
        }
    }

    fn queue_profile_lookup(&self, lookup: ProfileLookup) {
        let requests = match (&self.requests, &self.config.inara_api_key) {
            (Some(requests), Some(_)) => requests,
            (None, _) => return self.lookup_unavailable(lookup, "lookups disabled"),
            (Some(_), None) => return self.lookup_unavailable(lookup, "no inara api key"),
        };

        let payload = lookup.payload(&self.config, Utc::now());
        let target_log = Arc::clone(&self.target_log);
        requests.queue_request(Request::post(
            self.config.inara_endpoint.clone(),
            payload,
            move |result| {
                target_log
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .profile_received(lookup, result);
            },
        ));
    }

    /// Log the sighting without profile data.
    fn lookup_unavailable(&self, lookup: ProfileLookup, reason: &str) {
        self.target_lock()
            .profile_received(lookup, Err(RequestError::Transport(reason.to_string())));
    }

    fn target_lock(&self) -> MutexGuard<'_, TargetLog> {
        self.target_log.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn redeem_voucher(
    activity: &mut crate::activity::Activity,
    entry: &RedeemVoucher,
    ctx: &mut EventContext<'_>,
) {
    match entry.voucher_type.as_str() {
        VOUCHER_BOUNTY => activity.bv_redeemed(entry, ctx),
        VOUCHER_COMBAT_BOND => activity.cb_redeemed(entry, ctx),
        other => tracing::debug!(voucher = other, "voucher type not tracked"),
    }
}
