//! Everything the engine reports back to its host.
//!
//! Hosts (a UI, the headless runner, tests) read these to refresh displays;
//! nothing inside the engine consumes them.

use crate::{
    state::ResourceKind,
    types::{CatalogId, EpochMillis},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    // ── Lifecycle ──────────────────────────────────
    Loaded {
        restored: bool,
    },
    StateRecovered {
        reason: String,
    },
    OfflineProgress {
        elapsed_ms: EpochMillis,
        capped: bool,
        gained: f64,
    },
    Saved {
        at: EpochMillis,
    },
    SaveFailed {
        reason: String,
    },

    // ── Tick ───────────────────────────────────────
    Accrued {
        dt_secs: f64,
        rate: f64,
        gained: f64,
    },
    BoostExpired,

    // ── Player actions ─────────────────────────────
    Clicked {
        gained: f64,
    },
    BoostStarted {
        duration_secs: f64,
    },
    Purchased {
        upgrade_id: CatalogId,
        level: u32,
        cost: f64,
    },
    PurchaseRejected {
        upgrade_id: CatalogId,
        reason: String,
    },
    Granted {
        resource: ResourceKind,
        amount: f64,
    },
    Prestiged {
        wisdom_gained: u64,
        prestige_count: u32,
    },
    SettingsChanged,

    // ── Progression ────────────────────────────────
    AchievementUnlocked {
        achievement_id: CatalogId,
    },
}

impl GameEvent {
    /// Stable snake_case name of the variant.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Loaded { .. }              => "loaded",
            Self::StateRecovered { .. }      => "state_recovered",
            Self::OfflineProgress { .. }     => "offline_progress",
            Self::Saved { .. }               => "saved",
            Self::SaveFailed { .. }          => "save_failed",
            Self::Accrued { .. }             => "accrued",
            Self::BoostExpired               => "boost_expired",
            Self::Clicked { .. }             => "clicked",
            Self::BoostStarted { .. }        => "boost_started",
            Self::Purchased { .. }           => "purchased",
            Self::PurchaseRejected { .. }    => "purchase_rejected",
            Self::Granted { .. }             => "granted",
            Self::Prestiged { .. }           => "prestiged",
            Self::SettingsChanged            => "settings_changed",
            Self::AchievementUnlocked { .. } => "achievement_unlocked",
        }
    }
}
