//! Passive accrual for one tick of wall-clock time.
//!
//! The caller measures `dt_secs` from real timestamps (see scheduler.rs);
//! nothing here assumes the tick interval was honoured.

use crate::{
    config::GameConfig,
    rate::{current_rate, rate_with_boost},
    state::GameState,
};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AccrualReport {
    pub dt_secs:       f64,
    /// Rate in effect for this span, units/sec.
    pub rate:          f64,
    pub gained:        f64,
    pub boost_expired: bool,
}

/// Advance `state` by `dt_secs` of passive income.
///
/// The rate is sampled at the start of the span. A boost that runs out
/// partway only pays for the seconds it had left.
pub fn accrue(state: &mut GameState, config: &GameConfig, dt_secs: f64) -> AccrualReport {
    if !dt_secs.is_finite() || dt_secs <= 0.0 {
        return AccrualReport::default();
    }

    let (gained, rate) = passive_gain(state, config, dt_secs);
    state.resources.currency.earn(gained);
    state
        .resources
        .experience
        .earn(gained * config.economy.progression.passive_weight);

    let boost_expired = tick_boost(state, dt_secs);
    AccrualReport { dt_secs, rate, gained, boost_expired }
}

/// Passive income over `dt_secs`, split at the moment the boost expires.
/// Returns the gain and the rate at the start of the span.
pub fn passive_gain(state: &GameState, config: &GameConfig, dt_secs: f64) -> (f64, f64) {
    let rate = current_rate(state, config);
    let dt_secs = dt_secs.max(0.0);
    if !state.boost.active || state.boost.remaining_secs >= dt_secs {
        return (rate * dt_secs, rate);
    }
    let boosted_secs = state.boost.remaining_secs.max(0.0);
    let unboosted = rate_with_boost(state, config, false);
    (rate * boosted_secs + unboosted * (dt_secs - boosted_secs), rate)
}

/// Count the boost down by `dt_secs`. Returns true when it expired now.
pub fn tick_boost(state: &mut GameState, dt_secs: f64) -> bool {
    if !state.boost.active {
        return false;
    }
    state.boost.remaining_secs = (state.boost.remaining_secs - dt_secs.max(0.0)).max(0.0);
    if state.boost.remaining_secs == 0.0 {
        state.boost.active = false;
        return true;
    }
    false
}
