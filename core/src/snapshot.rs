//! Save snapshot serialization: full game state to and from JSON.
//!
//! ## Versioning
//!
//! - `SAVE_VERSION`: current format. Bump when fields are added.
//! - `MIN_COMPATIBLE_VERSION`: oldest format that can still be merged.
//!   Only bump it when a field changes meaning or is removed.
//!
//! Loading never trusts the snapshot to be complete: the stored JSON is
//! merged key by key onto the JSON of a default snapshot, so any field an
//! older build did not write keeps its default value.

use crate::{
    error::{GameError, GameResult},
    state::GameState,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const SAVE_VERSION: u32 = 1;
pub const MIN_COMPATIBLE_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SaveSnapshot {
    pub version: u32,
    pub state:   GameState,
}

impl Default for SaveSnapshot {
    fn default() -> Self {
        Self { version: SAVE_VERSION, state: GameState::default() }
    }
}

impl SaveSnapshot {
    pub fn capture(state: &GameState) -> Self {
        Self { version: SAVE_VERSION, state: state.clone() }
    }

    pub fn to_json(&self) -> GameResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a stored payload, back-filling anything it lacks.
    /// A payload without a version is treated as the oldest compatible one.
    pub fn from_json_merged(payload: &str) -> GameResult<Self> {
        let stored: Value = serde_json::from_str(payload)?;
        if !stored.is_object() {
            return Err(GameError::Other(anyhow::anyhow!(
                "snapshot root is not an object"
            )));
        }

        let version = stored
            .get("version")
            .and_then(Value::as_u64)
            .unwrap_or(MIN_COMPATIBLE_VERSION as u64);
        if version < MIN_COMPATIBLE_VERSION as u64 {
            return Err(GameError::IncompatibleSnapshot { version });
        }
        if version > SAVE_VERSION as u64 {
            log::warn!("Snapshot version {version} is newer than {SAVE_VERSION}; loading known fields");
        }

        let mut merged = serde_json::to_value(SaveSnapshot::default())?;
        merge_json(&mut merged, stored);
        let mut snapshot: SaveSnapshot = serde_json::from_value(merged)?;
        snapshot.version = SAVE_VERSION;
        Ok(snapshot)
    }
}

/// Merge `overlay` onto `base`: objects key by key (recursively), any other
/// value replaces the base value outright.
pub fn merge_json(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(slot) => merge_json(slot, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}
