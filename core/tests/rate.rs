//! Rate aggregator tests.

use idle_core::{
    config::GameConfig,
    rate::{click_power, current_rate, meta_multiplier, raw_rate},
    state::GameState,
};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn owning(levels: &[(&str, u32)]) -> GameState {
    let mut state = GameState::default();
    for (id, level) in levels {
        state.levels.insert(id.to_string(), *level);
    }
    state
}

#[test]
fn fresh_state_earns_base_rate() {
    let config = GameConfig::study_wizard();
    let state = GameState::default();
    assert!(approx(current_rate(&state, &config), 0.2));
}

/// 0.2 base + 3 candles × 0.2 + 2 apprentices × 0.5 = 1.8
#[test]
fn sources_sum_by_level() {
    let config = GameConfig::study_wizard();
    let state = owning(&[("candlelight", 3), ("apprentice", 2)]);
    assert!(approx(raw_rate(&state, &config), 1.8));
    assert!(approx(current_rate(&state, &config), 1.8));
}

#[test]
fn click_upgrades_do_not_add_rate() {
    let config = GameConfig::study_wizard();
    let state = owning(&[("quill", 5), ("staff", 2)]);
    assert!(approx(current_rate(&state, &config), 0.2));
}

#[test]
fn boost_and_wisdom_multiply() {
    let config = GameConfig::study_wizard();
    let mut state = owning(&[("scrolls", 4)]); // 0.2 + 2.0 = 2.2
    state.boost.active = true;
    state.boost.remaining_secs = 60.0;
    state.resources.wisdom.amount = 10.0; // ×1.5
    let expected = 2.2 * 1.5 * 1.5;
    assert!(approx(current_rate(&state, &config), expected));
}

#[test]
fn unlocked_achievements_multiply() {
    let config = GameConfig::study_wizard();
    let mut state = GameState::default();
    state.achievements.insert("first_drop".into(), true);
    state.achievements.insert("archive_restored".into(), true);
    state.achievements.insert("ink_stained".into(), false);
    let expected = 0.2 * 1.02 * 1.10;
    assert!(approx(current_rate(&state, &config), expected));
}

#[test]
fn experience_levels_raise_meta_multiplier() {
    let config = GameConfig::study_wizard();
    let mut state = GameState::default();
    state.resources.experience.lifetime = 2_999.0;
    assert!(approx(meta_multiplier(&state, &config), 1.02));
    state.resources.experience.lifetime = 3_000.0;
    assert!(approx(meta_multiplier(&state, &config), 1.03));
}

#[test]
fn rate_is_never_negative() {
    let config = GameConfig::study_wizard();
    let mut states = vec![GameState::default()];

    let mut broke = GameState::default();
    broke.resources.wisdom.amount = -50.0; // corrupted snapshot
    states.push(broke);

    let mut rich = owning(&[("time_lord", 40), ("tome", 12), ("eternal_inkwell", 3)]);
    rich.boost.active = true;
    rich.resources.wisdom.amount = 1e6;
    rich.resources.experience.lifetime = 1e9;
    states.push(rich);

    for state in &states {
        let rate = current_rate(state, &config);
        assert!(rate >= 0.0 && rate.is_finite(), "rate {rate}");
        assert!(click_power(state, &config) >= 0.0);
    }
}

#[test]
fn rate_is_idempotent() {
    let config = GameConfig::study_wizard();
    let mut state = owning(&[("mage", 3), ("desk", 7)]);
    state.boost.active = true;
    state.resources.wisdom.amount = 4.0;
    state.achievements.insert("full_faculty".into(), true);

    let first = current_rate(&state, &config);
    let second = current_rate(&state, &config);
    assert_eq!(first.to_bits(), second.to_bits());
}

/// (1 base + 2 quills × 1 + 1 silver × 3) × (1 + 5 wisdom × 0.02) = 6.6
#[test]
fn click_power_sums_upgrades_and_wisdom() {
    let config = GameConfig::study_wizard();
    let mut state = owning(&[("quill", 2), ("silver", 1)]);
    state.resources.wisdom.amount = 5.0;
    assert!(approx(click_power(&state, &config), 6.6));
}
