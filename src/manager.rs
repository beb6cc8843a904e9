use std::path::{Path, PathBuf};

use crate::activity::Activity;
use crate::missions::MissionLog;
use crate::model::Tick;
use crate::session::SessionState;
use crate::store::legacy::{LEGACY_TODAY_FILE, LEGACY_YESTERDAY_FILE};
use crate::store::{ActivityStore, StoreError};

/// All known ledgers, newest first. Never empty: the first entry is the
/// ledger journal events are applied to.
#[derive(Debug)]
pub struct ActivityManager {
    store: ActivityStore,
    activities: Vec<Activity>,
}

impl ActivityManager {
    /// Load every ledger in `activity_dir`. With no ledgers on disk, legacy
    /// files in `legacy_dir` are imported; failing that, an empty ledger for
    /// `current_tick` is started.
    ///
    /// Files that cannot be read are skipped with a warning.
    pub fn load(activity_dir: &Path, legacy_dir: &Path, current_tick: &Tick) -> Self {
        let store = ActivityStore::new(activity_dir);
        let paths = store.list().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "unable to list activity files");
            Vec::new()
        });

        let mut activities: Vec<Activity> = paths
            .iter()
            .filter_map(|path| match store.load(path) {
                Ok(activity) => Some(activity),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping unreadable activity file");
                    None
                }
            })
            .collect();

        if activities.is_empty() {
            activities = import_legacy(&store, legacy_dir, current_tick);
        }
        if activities.is_empty() {
            activities.push(Activity::new(current_tick));
        }

        let mut manager = Self { store, activities };
        manager.sort();
        tracing::info!(
            ledgers = manager.activities.len(),
            current = %manager.current().tick_id,
            "activity loaded"
        );
        manager
    }

    pub fn store(&self) -> &ActivityStore {
        &self.store
    }

    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    pub fn current(&self) -> &Activity {
        &self.activities[0]
    }

    pub fn current_mut(&mut self) -> &mut Activity {
        &mut self.activities[0]
    }

    pub fn get(&self, tick_id: &str) -> Option<&Activity> {
        self.activities.iter().find(|a| a.tick_id == tick_id)
    }

    /// Start the ledger for a new tick from the current one. Returns `false`
    /// when `tick` is already current.
    pub fn new_tick(&mut self, tick: &Tick, missions: &dyn MissionLog, session: &SessionState) -> bool {
        if self.current().tick_id == tick.id {
            return false;
        }
        let next = self.current().rollover(tick, missions, session);
        self.activities.push(next);
        self.sort();
        true
    }

    /// Write every ledger with unsaved changes. Stops at the first failure;
    /// unsaved ledgers stay dirty.
    pub fn save(&mut self) -> Result<usize, StoreError> {
        let mut written = 0;
        for activity in &mut self.activities {
            if self.store.save(activity)? {
                written += 1;
            }
        }
        Ok(written)
    }

    fn sort(&mut self) {
        self.activities.sort_by(|a, b| b.cmp_tick(a));
    }
}

/// Today's legacy file becomes the current tick, yesterday's a tick one
/// second earlier so it sorts behind.
fn import_legacy(store: &ActivityStore, legacy_dir: &Path, current_tick: &Tick) -> Vec<Activity> {
    let yesterday_tick = Tick::new(
        format!("{}-previous", current_tick.id),
        current_tick.time - chrono::Duration::seconds(1),
    );
    let candidates: [(PathBuf, &Tick); 2] = [
        (legacy_dir.join(LEGACY_TODAY_FILE), current_tick),
        (legacy_dir.join(LEGACY_YESTERDAY_FILE), &yesterday_tick),
    ];

    candidates
        .iter()
        .filter(|(path, _)| path.exists())
        .filter_map(|(path, tick)| match store.load_legacy(path, tick) {
            Ok(activity) => Some(activity),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "unable to import legacy activity");
                None
            }
        })
        .collect()
}
