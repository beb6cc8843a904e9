//! Import of the first-generation activity files (`Today Data.txt`,
//! `Yesterday Data.txt`).
//!
//! Those files hold `{"1": [{System, SystemAddress, Factions: [...]}], ...}`:
//! arbitrary keys, each a one-element list, with factions as a list rather
//! than a map.

use std::path::Path;

use serde_json::Value;

use super::{StoreError, migrate, read_json};
use crate::activity::Activity;
use crate::model::{SystemActivity, Tick};

pub const LEGACY_TODAY_FILE: &str = "Today Data.txt";
pub const LEGACY_YESTERDAY_FILE: &str = "Yesterday Data.txt";

pub fn load_legacy(path: &Path, tick: &Tick) -> Result<Activity, StoreError> {
    let doc: Value = read_json(path)?;
    let Value::Object(entries) = doc else {
        return Err(StoreError::LegacyLayout {
            path: path.to_path_buf(),
            reason: "top level is not an object".into(),
        });
    };

    let mut activity = Activity::new(tick);
    for entry in entries.into_values() {
        let Some(mut system) = entry.as_array().and_then(|list| list.first()).cloned() else {
            continue;
        };
        let Some(address) = system.get("SystemAddress").and_then(address_key) else {
            continue;
        };

        let factions = keyed_factions(&mut system);
        if let Some(object) = system.as_object_mut() {
            object.insert("Factions".into(), Value::Object(factions));
            object.insert("SystemAddress".into(), Value::String(address.clone()));
        }
        migrate::upgrade_system(&mut system);

        let parsed: SystemActivity = serde_json::from_value(system)
            .map_err(|e| StoreError::Json { path: path.to_path_buf(), source: e })?;
        activity.systems.insert(address, rebuild(parsed));
    }

    activity.dirty = true;
    activity.recalculate_zero_activity();
    tracing::info!(path = %path.display(), systems = activity.systems.len(), "imported legacy activity");
    Ok(activity)
}

fn address_key(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// Turn the `Factions` list into a map keyed by each entry's `Faction`.
fn keyed_factions(system: &mut Value) -> serde_json::Map<String, Value> {
    let list = system
        .get_mut("Factions")
        .map(Value::take)
        .and_then(|v| match v {
            Value::Array(list) => Some(list),
            _ => None,
        })
        .unwrap_or_default();

    list.into_iter()
        .filter_map(|faction| {
            let name = faction.get("Faction")?.as_str()?.to_string();
            Some((name, faction))
        })
        .collect()
}

/// Legacy systems never carried Thargoid war or rescue data; start those clean.
fn rebuild(parsed: SystemActivity) -> SystemActivity {
    SystemActivity {
        factions: parsed.factions,
        ..SystemActivity::new(parsed.name, parsed.address)
    }
}
