//! Achievement unlocks. Unlocks are permanent and survive prestige.

use crate::{
    config::{AchievementCondition, GameConfig, UpgradeKind},
    state::GameState,
    types::CatalogId,
};

/// Total producer levels owned across the catalog.
pub fn producers_owned(state: &GameState, config: &GameConfig) -> u32 {
    config
        .upgrades_of(UpgradeKind::Producer)
        .map(|u| state.level(&u.id))
        .sum()
}

pub fn condition_met(
    state: &GameState,
    config: &GameConfig,
    condition: &AchievementCondition,
) -> bool {
    match *condition {
        AchievementCondition::LifetimeEarned { resource, amount } => {
            state.resources.get(resource).lifetime >= amount
        }
        AchievementCondition::ProducersOwned { count } => producers_owned(state, config) >= count,
        AchievementCondition::Clicks { count } => state.total_clicks >= count,
        AchievementCondition::Prestiges { count } => state.prestige_count >= count,
    }
}

/// Unlock every achievement whose condition now holds.
/// Returns the ids unlocked by this call, in catalog order.
pub fn evaluate_achievements(state: &mut GameState, config: &GameConfig) -> Vec<CatalogId> {
    let newly: Vec<CatalogId> = config
        .achievements
        .iter()
        .filter(|a| !state.is_unlocked(&a.id) && condition_met(state, config, &a.condition))
        .map(|a| a.id.clone())
        .collect();

    for id in &newly {
        state.achievements.insert(id.clone(), true);
        log::info!("Achievement unlocked: {id}");
    }
    newly
}
