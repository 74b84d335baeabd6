//! Persistence gateway: save, load, and offline catch-up.
//!
//! RULE: `load` never fails. A missing, unreadable or malformed snapshot
//! yields the default state and a warning in the log. `save` does return
//! errors; callers inside the tick loop log them and carry on.

use crate::{
    accrual::{passive_gain, tick_boost},
    config::GameConfig,
    error::{GameError, GameResult},
    snapshot::SaveSnapshot,
    state::GameState,
    types::{EpochMillis, MS_PER_SEC},
};
use std::collections::HashMap;

/// Key/value storage for serialized snapshots.
pub trait SaveStorage {
    fn read(&self, key: &str) -> GameResult<Option<String>>;
    fn write(&mut self, key: &str, payload: &str) -> GameResult<()>;
    fn remove(&mut self, key: &str) -> GameResult<()>;
}

/// In-process storage with an optional byte quota, like a browser's
/// local storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slots: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota_bytes: usize) -> Self {
        Self { slots: HashMap::new(), quota: Some(quota_bytes) }
    }

    /// Seed a slot directly, bypassing the quota.
    pub fn insert_raw(&mut self, key: &str, payload: &str) {
        self.slots.insert(key.to_string(), payload.to_string());
    }

    pub fn get_raw(&self, key: &str) -> Option<&str> {
        self.slots.get(key).map(String::as_str)
    }
}

impl SaveStorage for MemoryStorage {
    fn read(&self, key: &str) -> GameResult<Option<String>> {
        Ok(self.slots.get(key).cloned())
    }

    fn write(&mut self, key: &str, payload: &str) -> GameResult<()> {
        if let Some(quota) = self.quota {
            let others: usize = self
                .slots
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            if others + key.len() + payload.len() > quota {
                return Err(GameError::StorageUnavailable {
                    reason: format!("quota of {quota} bytes exceeded"),
                });
            }
        }
        self.slots.insert(key.to_string(), payload.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> GameResult<()> {
        self.slots.remove(key);
        Ok(())
    }
}

/// Offline progress applied on load.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OfflineReport {
    /// Span actually replayed, after the cap.
    pub elapsed_ms: EpochMillis,
    pub capped:     bool,
    pub rate:       f64,
    pub gained:     f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadSource {
    /// No snapshot under the key.
    Fresh,
    Restored,
    /// A snapshot existed but could not be used.
    Recovered { reason: String },
}

#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub state:   GameState,
    pub source:  LoadSource,
    pub offline: Option<OfflineReport>,
}

/// Write `state` under the configured key, stamped with `now`.
/// `state.last_saved` is only updated once the write succeeded.
pub fn save<S: SaveStorage + ?Sized>(
    state: &mut GameState,
    storage: &mut S,
    key: &str,
    now: EpochMillis,
) -> GameResult<()> {
    let mut snapshot = SaveSnapshot::capture(state);
    snapshot.state.last_saved = Some(now);
    let json = snapshot.to_json()?;
    storage.write(key, &json)?;
    state.last_saved = Some(now);
    log::debug!("Saved {} bytes under '{key}'", json.len());
    Ok(())
}

/// Read the snapshot for `config.storage_key` and replay time spent away.
pub fn load<S: SaveStorage + ?Sized>(
    storage: &S,
    config: &GameConfig,
    now: EpochMillis,
) -> LoadOutcome {
    let recovered = |reason: String| {
        log::warn!("Failed to load state: {reason}; starting from defaults");
        LoadOutcome {
            state:   GameState::default(),
            source:  LoadSource::Recovered { reason },
            offline: None,
        }
    };

    let payload = match storage.read(&config.storage_key) {
        Ok(Some(payload)) => payload,
        Ok(None) => {
            return LoadOutcome {
                state:   GameState::default(),
                source:  LoadSource::Fresh,
                offline: None,
            }
        }
        Err(e) => return recovered(e.to_string()),
    };

    let snapshot = match SaveSnapshot::from_json_merged(&payload) {
        Ok(s) => s,
        Err(e) => return recovered(e.to_string()),
    };

    let mut state = snapshot.state;
    let offline = state
        .last_saved
        .map(|last| offline_catch_up(&mut state, config, now - last));

    if let Some(report) = &offline {
        log::info!(
            "Offline for {:.1}s{}: +{:.2} at {:.2}/s",
            report.elapsed_ms as f64 / MS_PER_SEC,
            if report.capped { " (capped)" } else { "" },
            report.gained,
            report.rate
        );
    }

    LoadOutcome { state, source: LoadSource::Restored, offline }
}

/// Credit one lump of passive income for `elapsed_ms` away, clamped to
/// `[0, offline_cap_ms]`. Pays exactly what ticking through the span would,
/// boost expiry included. Experience accrues at the offline weight.
pub fn offline_catch_up(
    state: &mut GameState,
    config: &GameConfig,
    elapsed_ms: EpochMillis,
) -> OfflineReport {
    let cap = config.timing.offline_cap_ms.max(0);
    let raw = elapsed_ms.max(0);
    let elapsed = raw.min(cap);

    let secs = elapsed as f64 / MS_PER_SEC;
    let (gained, rate) = passive_gain(state, config, secs);
    state.resources.currency.earn(gained);
    state
        .resources
        .experience
        .earn(gained * config.economy.progression.offline_weight);
    tick_boost(state, secs);

    OfflineReport { elapsed_ms: elapsed, capped: raw > cap, rate, gained }
}
