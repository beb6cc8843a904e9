use crate::market::MarketData;
use crate::missions::MissionLog;
use crate::session::SessionState;

/// Notified whenever a handler credits activity. Presentation only; the
/// ledger never reads anything back.
pub trait ActivityIndicator {
    fn indicate(&mut self);
}

impl<F: FnMut()> ActivityIndicator for F {
    fn indicate(&mut self) {
        self()
    }
}

/// Indicator that latches until the host takes it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndicatorFlag {
    active: bool,
}

impl IndicatorFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Read and clear the flag.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.active)
    }
}

impl ActivityIndicator for IndicatorFlag {
    fn indicate(&mut self) {
        self.active = true;
    }
}

/// Everything outside the ledger that an event handler may read or update.
///
/// Bundled so handlers share one signature and collaborators can be added
/// without touching every call site.
pub struct EventContext<'a> {
    pub session: &'a mut SessionState,
    pub missions: &'a mut dyn MissionLog,
    pub market: &'a dyn MarketData,
    pub indicator: &'a mut dyn ActivityIndicator,
}
