//! Rate aggregation.
//!
//! RULE: everything here is a pure function of (state, config). The tick,
//! the offline catch-up and the UI all call these freely; calling them
//! twice without a mutation in between must give the same answer.

use crate::{config::GameConfig, state::GameState};

/// Base rate plus every production source, before multipliers.
pub fn raw_rate(state: &GameState, config: &GameConfig) -> f64 {
    let sources: f64 = config
        .upgrades
        .iter()
        .map(|u| u.effect.rate_at(state.level(&u.id)))
        .sum();
    (config.economy.base_rate + sources).max(0.0)
}

/// Multiplier from the experience score: +bonus_per_level per full level.
pub fn meta_multiplier(state: &GameState, config: &GameConfig) -> f64 {
    let p = &config.economy.progression;
    let level = (state.resources.experience.lifetime / p.xp_per_level).floor().max(0.0);
    1.0 + level * p.bonus_per_level
}

/// Product of every unlocked achievement's multiplier.
pub fn achievement_multiplier(state: &GameState, config: &GameConfig) -> f64 {
    config
        .achievements
        .iter()
        .filter(|a| state.is_unlocked(&a.id))
        .map(|a| a.rate_multiplier)
        .product()
}

pub fn wisdom_multiplier(state: &GameState, config: &GameConfig) -> f64 {
    1.0 + state.resources.wisdom.amount.max(0.0) * config.economy.wisdom_rate_bonus
}

/// Current passive income in currency units per second.
pub fn current_rate(state: &GameState, config: &GameConfig) -> f64 {
    rate_with_boost(state, config, state.boost.active)
}

/// The rate as it would be with the boost forced on or off.
pub fn rate_with_boost(state: &GameState, config: &GameConfig, boosted: bool) -> f64 {
    let mut rate = raw_rate(state, config);
    if boosted {
        rate *= config.economy.boost.multiplier;
    }
    rate *= wisdom_multiplier(state, config);
    rate *= meta_multiplier(state, config);
    rate *= achievement_multiplier(state, config);
    if rate.is_finite() {
        rate.max(0.0)
    } else {
        0.0
    }
}

/// Currency gained per click.
pub fn click_power(state: &GameState, config: &GameConfig) -> f64 {
    let upgrades: f64 = config
        .upgrades
        .iter()
        .map(|u| u.effect.click_power_at(state.level(&u.id)))
        .sum();
    let wisdom_bonus =
        1.0 + state.resources.wisdom.amount.max(0.0) * config.economy.wisdom_click_bonus;
    ((config.economy.base_click_power + upgrades) * wisdom_bonus).max(0.0)
}
