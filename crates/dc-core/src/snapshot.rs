//! JSON export format for counters, history and milestones.
//!
//! The export uses camelCase field names and day keys as `YYYY-MM-DD`
//! strings. Only the major part of `version` is checked on import.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::MAX_HISTORY_ENTRIES;
use crate::counter::{Counter, CounterError, HistoryEntry};
use crate::streak::MilestoneState;
use crate::time::now_iso8601;

pub const CURRENT_VERSION: &str = "1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub version: String,
    #[serde(default)]
    pub exported_at: String,
    pub counters: Vec<Counter>,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    #[serde(default)]
    pub milestones: BTreeMap<Uuid, Vec<MilestoneState>>,
}

impl Snapshot {
    pub fn new(
        counters: Vec<Counter>,
        history: Vec<HistoryEntry>,
        milestones: BTreeMap<Uuid, Vec<MilestoneState>>,
    ) -> Self {
        Self {
            version: CURRENT_VERSION.to_string(),
            exported_at: now_iso8601(),
            counters,
            history,
            milestones,
        }
    }
}

#[derive(Debug)]
pub enum SnapshotError {
    Json(serde_json::Error),
    Version(String),
    Counter { name: String, source: CounterError },
    UnknownCounter(Uuid),
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotError::Json(e) => write!(f, "invalid JSON: {e}"),
            SnapshotError::Version(v) => {
                write!(f, "unsupported export version '{v}' (expected {CURRENT_VERSION}.x)")
            }
            SnapshotError::Counter { name, source } => write!(f, "counter '{name}': {source}"),
            SnapshotError::UnknownCounter(id) => {
                write!(f, "export references unknown counter {id}")
            }
        }
    }
}

impl std::error::Error for SnapshotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SnapshotError::Json(e) => Some(e),
            SnapshotError::Counter { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(e: serde_json::Error) -> Self {
        SnapshotError::Json(e)
    }
}

pub fn export_json(snapshot: &Snapshot) -> serde_json::Result<String> {
    serde_json::to_string_pretty(snapshot)
}

/// Parse and validate an export.
///
/// History is trimmed to the newest `MAX_HISTORY_ENTRIES` per counter.
pub fn import_json(json: &str) -> Result<Snapshot, SnapshotError> {
    let mut snapshot: Snapshot = serde_json::from_str(json)?;

    let major = snapshot.version.split('.').next().unwrap_or_default();
    if major != CURRENT_VERSION {
        return Err(SnapshotError::Version(snapshot.version));
    }

    for counter in &snapshot.counters {
        counter
            .config
            .validate()
            .map_err(|source| SnapshotError::Counter {
                name: counter.config.name.clone(),
                source,
            })?;
    }

    let known = |id: &Uuid| snapshot.counters.iter().any(|c| c.id == *id);
    if let Some(entry) = snapshot.history.iter().find(|e| !known(&e.counter_id)) {
        return Err(SnapshotError::UnknownCounter(entry.counter_id));
    }
    if let Some(id) = snapshot.milestones.keys().find(|id| !known(id)) {
        return Err(SnapshotError::UnknownCounter(*id));
    }

    snapshot.history = cap_history(std::mem::take(&mut snapshot.history));
    Ok(snapshot)
}

/// Keep the newest `MAX_HISTORY_ENTRIES` per counter, newest first.
pub fn cap_history(mut history: Vec<HistoryEntry>) -> Vec<HistoryEntry> {
    history.sort_by(|a, b| b.day.cmp(&a.day));
    let mut per_counter: BTreeMap<Uuid, usize> = BTreeMap::new();
    history.retain(|e| {
        let seen = per_counter.entry(e.counter_id).or_default();
        *seen += 1;
        *seen <= MAX_HISTORY_ENTRIES
    });
    history
}
