//! Direct player actions other than purchases: click, boost, prestige.

use crate::{config::GameConfig, rate::click_power, state::GameState};

/// Credit one click. Returns the currency gained.
pub fn click(state: &mut GameState, config: &GameConfig) -> f64 {
    let gained = click_power(state, config);
    state.resources.currency.earn(gained);
    state
        .resources
        .experience
        .earn(gained * config.economy.progression.active_weight);
    state.total_clicks += 1;
    gained
}

/// Start the timed boost. No-op (returns false) while one is running.
pub fn start_boost(state: &mut GameState, config: &GameConfig) -> bool {
    if state.boost.active {
        return false;
    }
    let duration = config.economy.boost.duration_secs;
    if duration <= 0.0 {
        return false;
    }
    state.boost.active = true;
    state.boost.remaining_secs = duration;
    true
}

/// Wisdom a prestige would grant right now.
pub fn prestige_preview(state: &GameState, config: &GameConfig) -> u64 {
    let ratio = state.resources.currency.amount.max(0.0) / config.economy.prestige_divisor;
    ratio.sqrt().floor() as u64
}

/// Reset the run for wisdom.
///
/// Clears currency, passive and click upgrades, and the boost. Producers,
/// relics, lifetime totals, achievements and settings carry over.
/// Returns None without touching anything if the gain would be zero.
pub fn prestige(state: &mut GameState, config: &GameConfig) -> Option<u64> {
    let gain = prestige_preview(state, config);
    if gain == 0 {
        return None;
    }

    state.resources.wisdom.earn(gain as f64);
    state.resources.currency.amount = 0.0;
    state.levels.retain(|id, _| {
        config
            .upgrade(id)
            .map_or(true, |u| u.kind.survives_prestige())
    });
    state.boost = Default::default();
    state.prestige_count += 1;

    log::info!(
        "Prestige #{}: +{gain} wisdom (total {})",
        state.prestige_count,
        state.resources.wisdom.amount
    );
    Some(gain)
}
