//! Upgrade effects as data.
//!
//! Catalog entries carry an `Effect` value instead of a callback, so the
//! catalog stays serializable and `apply_effect` is the only place where a
//! purchase changes state beyond its level.

use crate::state::{GameState, ResourceKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Effect {
    /// Adds `per_level` units/sec to the base rate for every level owned.
    IncreaseRate { per_level: f64 },
    /// Adds `per_level` to the click power for every level owned.
    IncreaseClickPower { per_level: f64 },
    /// One-time experience grant per purchase.
    IncreaseScore { amount: f64 },
    /// One-time grant of any resource per purchase.
    GrantResource { resource: ResourceKind, amount: f64 },
}

/// What applying an effect did to the state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EffectOutcome {
    /// The effect is level-driven; the rate aggregator picks it up.
    RateChanged,
    ClickPowerChanged,
    Granted { resource: ResourceKind, amount: f64 },
}

impl Effect {
    /// Rate contribution of this effect at `level`. Zero for non-rate effects.
    pub fn rate_at(&self, level: u32) -> f64 {
        match self {
            Self::IncreaseRate { per_level } => per_level * level as f64,
            _ => 0.0,
        }
    }

    pub fn click_power_at(&self, level: u32) -> f64 {
        match self {
            Self::IncreaseClickPower { per_level } => per_level * level as f64,
            _ => 0.0,
        }
    }
}

/// Apply the one-off part of an effect after its level has been incremented.
pub fn apply_effect(state: &mut GameState, effect: &Effect) -> EffectOutcome {
    match *effect {
        Effect::IncreaseRate { .. } => EffectOutcome::RateChanged,
        Effect::IncreaseClickPower { .. } => EffectOutcome::ClickPowerChanged,
        Effect::IncreaseScore { amount } => {
            state.resources.experience.earn(amount);
            EffectOutcome::Granted { resource: ResourceKind::Experience, amount }
        }
        Effect::GrantResource { resource, amount } => {
            state.resources.get_mut(resource).earn(amount);
            EffectOutcome::Granted { resource, amount }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grant_resource_credits_amount_and_lifetime() {
        let mut state = GameState::default();
        let effect = Effect::GrantResource { resource: ResourceKind::Currency, amount: 250.0 };
        let outcome = apply_effect(&mut state, &effect);
        assert_eq!(outcome, EffectOutcome::Granted { resource: ResourceKind::Currency, amount: 250.0 });
        assert_eq!(state.resources.currency.amount, 250.0);
        assert_eq!(state.resources.currency.lifetime, 250.0);
    }

    #[test]
    fn rate_effect_does_not_touch_state() {
        let mut state = GameState::default();
        let before = state.clone();
        let outcome = apply_effect(&mut state, &Effect::IncreaseRate { per_level: 2.0 });
        assert_eq!(outcome, EffectOutcome::RateChanged);
        assert_eq!(state, before);
    }

    #[test]
    fn effect_json_is_tagged() {
        let json = serde_json::to_string(&Effect::IncreaseScore { amount: 10.0 }).unwrap();
        assert_eq!(json, r#"{"kind":"increase_score","amount":10.0}"#);
    }
}
