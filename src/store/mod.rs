//! On-disk persistence for activity ledgers.
//!
//! One JSON document per tick, named `<tick id>.json`. Documents written by
//! any earlier version are upgraded once, on load.

pub mod legacy;
pub mod migrate;

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::activity::Activity;
use crate::model::Tick;

pub const ACTIVITY_FILE_EXTENSION: &str = "json";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid json in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("unrecognised legacy layout in {path}: {reason}")]
    LegacyLayout { path: PathBuf, reason: String },
}

impl StoreError {
    fn io(path: &Path, source: io::Error) -> Self {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn json(path: &Path, source: serde_json::Error) -> Self {
        StoreError::Json {
            path: path.to_path_buf(),
            source,
        }
    }
}

// ---------------------------------------------------------------------------
// JSON helpers
// ---------------------------------------------------------------------------

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let file = File::open(path).map_err(|e| StoreError::io(path, e))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| StoreError::json(path, e))
}

/// Write `value` to a sibling temp file and rename it over `path`, so a crash
/// mid-write never leaves a truncated document.
pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
    }
    let tmp = path.with_extension("tmp");
    {
        let file = File::create(&tmp).map_err(|e| StoreError::io(&tmp, e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, value).map_err(|e| StoreError::json(&tmp, e))?;
        writer.flush().map_err(|e| StoreError::io(&tmp, e))?;
    }
    fs::rename(&tmp, path).map_err(|e| StoreError::io(path, e))
}

// ---------------------------------------------------------------------------
// Activity store
// ---------------------------------------------------------------------------

/// A directory of per-tick activity files.
#[derive(Debug, Clone)]
pub struct ActivityStore {
    dir: PathBuf,
}

impl ActivityStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, tick_id: &str) -> PathBuf {
        self.dir.join(format!("{tick_id}.{ACTIVITY_FILE_EXTENSION}"))
    }

    /// Every activity file in the store, in no particular order. A missing
    /// directory is an empty store.
    pub fn list(&self) -> Result<Vec<PathBuf>, StoreError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(&self.dir, e)),
        };
        let mut paths = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| StoreError::io(&self.dir, e))?.path();
            if path.extension().is_some_and(|ext| ext == ACTIVITY_FILE_EXTENSION) {
                paths.push(path);
            }
        }
        Ok(paths)
    }

    /// Write `activity` if it has unsaved changes. Returns whether a write
    /// happened; `dirty` is cleared only on success.
    pub fn save(&self, activity: &mut Activity) -> Result<bool, StoreError> {
        if !activity.dirty {
            return Ok(false);
        }
        let path = self.path_for(&activity.tick_id);
        write_json(&path, activity)?;
        activity.dirty = false;
        tracing::debug!(tick = %activity.tick_id, path = %path.display(), "saved activity");
        Ok(true)
    }

    /// Read and upgrade one activity file.
    pub fn load(&self, path: &Path) -> Result<Activity, StoreError> {
        load_activity(path)
    }

    /// Import a pre-tick-file (`Today Data.txt` style) document as the
    /// activity for `tick`.
    pub fn load_legacy(&self, path: &Path, tick: &Tick) -> Result<Activity, StoreError> {
        legacy::load_legacy(path, tick)
    }
}

pub fn load_activity(path: &Path) -> Result<Activity, StoreError> {
    let mut doc: serde_json::Value = read_json(path)?;
    migrate::upgrade_activity(&mut doc);
    let mut activity: Activity =
        serde_json::from_value(doc).map_err(|e| StoreError::json(path, e))?;
    activity.recalculate_zero_activity();
    Ok(activity)
}
