//! The in-memory game state container.
//!
//! RULE: GameState is plain data. Every mutation goes through the
//! update functions in accrual.rs, actions.rs, purchase.rs and
//! persistence.rs; rendering and saving only read it.
//!
//! Every struct here is `#[serde(default)]` so that a snapshot written by
//! an older build deserializes with the missing fields back-filled.

use crate::types::{CatalogId, EpochMillis};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// Main spendable currency (ink).
    Currency,
    /// Prestige currency, earned only by resetting.
    Wisdom,
    /// Secondary meta-progression score.
    Experience,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Resource {
    pub amount:   f64,
    /// Total ever earned. Never decreases, not even on prestige.
    pub lifetime: f64,
}

impl Resource {
    /// Credit earned value to both the spendable amount and the lifetime total.
    /// Non-positive and non-finite values are ignored.
    pub fn earn(&mut self, value: f64) {
        if !value.is_finite() || value <= 0.0 {
            return;
        }
        self.amount += value;
        self.lifetime += value;
    }

    /// Deduct `cost` if affordable. Leaves the resource untouched otherwise.
    pub fn spend(&mut self, cost: f64) -> bool {
        if self.amount < cost {
            return false;
        }
        self.amount -= cost;
        true
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Resources {
    pub currency:   Resource,
    pub wisdom:     Resource,
    pub experience: Resource,
}

impl Resources {
    pub fn get(&self, kind: ResourceKind) -> &Resource {
        match kind {
            ResourceKind::Currency   => &self.currency,
            ResourceKind::Wisdom     => &self.wisdom,
            ResourceKind::Experience => &self.experience,
        }
    }

    pub fn get_mut(&mut self, kind: ResourceKind) -> &mut Resource {
        match kind {
            ResourceKind::Currency   => &mut self.currency,
            ResourceKind::Wisdom     => &mut self.wisdom,
            ResourceKind::Experience => &mut self.experience,
        }
    }
}

/// Time-limited rate boost ("study boon").
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BoostState {
    pub active:         bool,
    pub remaining_secs: f64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
    Dawn,
    Day,
    #[default]
    Dusk,
    Night,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub sound:       bool,
    pub particles:   bool,
    pub time_of_day: TimeOfDay,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound:       true,
            particles:   true,
            time_of_day: TimeOfDay::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameState {
    pub resources:      Resources,
    /// Purchased level per upgrade id. A missing id means level 0.
    pub levels:         BTreeMap<CatalogId, u32>,
    /// Unlocked flag per achievement id.
    pub achievements:   BTreeMap<CatalogId, bool>,
    pub boost:          BoostState,
    pub settings:       Settings,
    pub total_clicks:   u64,
    pub prestige_count: u32,
    pub last_saved:     Option<EpochMillis>,
}

impl GameState {
    pub fn level(&self, upgrade_id: &str) -> u32 {
        self.levels.get(upgrade_id).copied().unwrap_or(0)
    }

    pub fn is_unlocked(&self, achievement_id: &str) -> bool {
        self.achievements.get(achievement_id).copied().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spend_exact_amount_leaves_zero() {
        let mut r = Resource { amount: 15.0, lifetime: 15.0 };
        assert!(r.spend(15.0));
        assert_eq!(r.amount, 0.0);
        assert_eq!(r.lifetime, 15.0);
    }

    #[test]
    fn earn_ignores_negative_and_nan() {
        let mut r = Resource::default();
        r.earn(-3.0);
        r.earn(f64::NAN);
        assert_eq!(r, Resource::default());
    }

    #[test]
    fn missing_level_reads_as_zero() {
        let state = GameState::default();
        assert_eq!(state.level("candlelight"), 0);
        assert!(!state.is_unlocked("first_drop"));
    }
}
