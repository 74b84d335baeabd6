//! Purchase handling and shop affordability.
//!
//! An unaffordable purchase is not an error: it returns
//! `InsufficientFunds` and leaves the state exactly as it was.

use crate::{
    config::{GameConfig, UpgradeDef, UpgradeKind},
    effect::{apply_effect, EffectOutcome},
    state::{GameState, ResourceKind},
    types::CatalogId,
};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq)]
pub enum PurchaseOutcome {
    Purchased {
        cost:   f64,
        /// Level after the purchase.
        level:  u32,
        effect: EffectOutcome,
    },
    InsufficientFunds {
        cost:      f64,
        available: f64,
    },
    UnknownUpgrade,
}

impl PurchaseOutcome {
    pub fn is_purchased(&self) -> bool {
        matches!(self, Self::Purchased { .. })
    }
}

pub fn next_cost(state: &GameState, def: &UpgradeDef) -> f64 {
    def.cost_at(state.level(&def.id))
}

pub fn can_afford(state: &GameState, def: &UpgradeDef) -> bool {
    state.resources.get(def.currency).amount >= next_cost(state, def)
}

pub fn purchase(state: &mut GameState, config: &GameConfig, upgrade_id: &str) -> PurchaseOutcome {
    let Some(def) = config.upgrade(upgrade_id) else {
        return PurchaseOutcome::UnknownUpgrade;
    };

    let cost = next_cost(state, def);
    let wallet = state.resources.get_mut(def.currency);
    let available = wallet.amount;
    if !wallet.spend(cost) {
        return PurchaseOutcome::InsufficientFunds { cost, available };
    }

    let level = state.level(&def.id) + 1;
    state.levels.insert(def.id.clone(), level);
    let effect = apply_effect(state, &def.effect);

    log::debug!("Purchased {} -> level {level} for {cost}", def.id);
    PurchaseOutcome::Purchased { cost, level, effect }
}

/// One shop row, everything a UI needs to draw a buy button.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ShopEntry {
    pub id:         CatalogId,
    pub name:       String,
    pub kind:       UpgradeKind,
    pub currency:   ResourceKind,
    pub level:      u32,
    pub cost:       f64,
    pub affordable: bool,
}

pub fn shop(state: &GameState, config: &GameConfig) -> Vec<ShopEntry> {
    config
        .upgrades
        .iter()
        .map(|u| ShopEntry {
            id:         u.id.clone(),
            name:       u.name.clone(),
            kind:       u.kind,
            currency:   u.currency,
            level:      state.level(&u.id),
            cost:       next_cost(state, u),
            affordable: can_afford(state, u),
        })
        .collect()
}
