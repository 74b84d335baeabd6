use crate::{
    cost,
    effect::Effect,
    error::{GameError, GameResult},
    state::ResourceKind,
    types::{CatalogId, EpochMillis},
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// ── Catalog ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UpgradeKind {
    /// Passive rate upgrade. Cleared on prestige.
    Passive,
    /// Click power upgrade. Cleared on prestige.
    Click,
    /// Hired producer ("character"). Survives prestige.
    Producer,
    /// Bought with wisdom. Survives prestige.
    Relic,
}

impl UpgradeKind {
    pub fn survives_prestige(&self) -> bool {
        matches!(self, Self::Producer | Self::Relic)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpgradeDef {
    pub id: CatalogId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub kind: UpgradeKind,
    pub base_cost: f64,
    #[serde(default = "default_growth")]
    pub growth: f64,
    #[serde(default = "default_currency")]
    pub currency: ResourceKind,
    pub effect: Effect,
}

fn default_growth() -> f64 {
    cost::DEFAULT_GROWTH
}

fn default_currency() -> ResourceKind {
    ResourceKind::Currency
}

impl UpgradeDef {
    /// Price of the next level when `level` levels are owned.
    pub fn cost_at(&self, level: u32) -> f64 {
        cost::cost(self.base_cost, self.growth, level)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AchievementCondition {
    LifetimeEarned { resource: ResourceKind, amount: f64 },
    ProducersOwned { count: u32 },
    Clicks { count: u64 },
    Prestiges { count: u32 },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AchievementDef {
    pub id: CatalogId,
    pub name: String,
    pub condition: AchievementCondition,
    /// Rate multiplier granted permanently once unlocked.
    pub rate_multiplier: f64,
}

// ── Tuning ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TimingConfig {
    pub tick_interval_ms:     EpochMillis,
    pub autosave_interval_ms: EpochMillis,
    /// Upper bound on replayed offline time.
    pub offline_cap_ms:       EpochMillis,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms:     100,
            autosave_interval_ms: 5_000,
            offline_cap_ms:       12 * 60 * 60 * 1_000,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BoostConfig {
    pub multiplier:    f64,
    pub duration_secs: f64,
}

impl Default for BoostConfig {
    fn default() -> Self {
        Self { multiplier: 1.5, duration_secs: 25.0 * 60.0 }
    }
}

/// Experience weights per gain source, and how experience turns into a
/// rate multiplier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProgressionConfig {
    pub active_weight:   f64,
    pub passive_weight:  f64,
    pub offline_weight:  f64,
    pub xp_per_level:    f64,
    pub bonus_per_level: f64,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            active_weight:   1.0,
            passive_weight:  0.5,
            offline_weight:  0.25,
            xp_per_level:    1_000.0,
            bonus_per_level: 0.01,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EconomyConfig {
    pub base_rate:          f64,
    pub base_click_power:   f64,
    /// Rate bonus per wisdom point (0.05 = +5%).
    pub wisdom_rate_bonus:  f64,
    /// Click power bonus per wisdom point.
    pub wisdom_click_bonus: f64,
    /// Prestige gain = floor(sqrt(currency / prestige_divisor)).
    pub prestige_divisor:   f64,
    pub boost:              BoostConfig,
    pub progression:        ProgressionConfig,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            base_rate:          0.2,
            base_click_power:   1.0,
            wisdom_rate_bonus:  0.05,
            wisdom_click_bonus: 0.02,
            prestige_divisor:   500.0,
            boost:              BoostConfig::default(),
            progression:        ProgressionConfig::default(),
        }
    }
}

// ── Files ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
struct EconomyFile {
    storage_key: String,
    #[serde(default)]
    timing: TimingConfig,
    #[serde(default)]
    economy: EconomyConfig,
}

#[derive(Debug, Clone, Deserialize)]
struct UpgradeCatalogFile {
    upgrades: Vec<UpgradeDef>,
}

#[derive(Debug, Clone, Deserialize)]
struct AchievementCatalogFile {
    achievements: Vec<AchievementDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameConfig {
    pub storage_key:  String,
    pub timing:       TimingConfig,
    pub economy:      EconomyConfig,
    pub upgrades:     Vec<UpgradeDef>,
    pub achievements: Vec<AchievementDef>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::study_wizard()
    }
}

impl GameConfig {
    /// Load from the data/ directory.
    /// In tests, use GameConfig::study_wizard().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let economy_path = format!("{data_dir}/economy.json");
        let economy_content = std::fs::read_to_string(&economy_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {economy_path}: {e}"))?;
        let economy_file: EconomyFile = serde_json::from_str(&economy_content)?;

        let upgrades_path = format!("{data_dir}/catalog/upgrades.json");
        let upgrades_content = std::fs::read_to_string(&upgrades_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {upgrades_path}: {e}"))?;
        let upgrades_file: UpgradeCatalogFile = serde_json::from_str(&upgrades_content)?;

        let achievements_path = format!("{data_dir}/catalog/achievements.json");
        let achievements_content = std::fs::read_to_string(&achievements_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {achievements_path}: {e}"))?;
        let achievements_file: AchievementCatalogFile =
            serde_json::from_str(&achievements_content)?;

        let config = Self {
            storage_key:  economy_file.storage_key,
            timing:       economy_file.timing,
            economy:      economy_file.economy,
            upgrades:     upgrades_file.upgrades,
            achievements: achievements_file.achievements,
        };
        config.validate()?;
        log::debug!(
            "Loaded config from {data_dir}: {} upgrades, {} achievements",
            config.upgrades.len(),
            config.achievements.len()
        );
        Ok(config)
    }

    /// Reject catalogs the engine cannot run sensibly.
    pub fn validate(&self) -> GameResult<()> {
        let invalid = |reason: String| Err(GameError::InvalidConfig { reason });

        if self.storage_key.is_empty() {
            return invalid("storage_key is empty".into());
        }
        if self.timing.tick_interval_ms <= 0 || self.timing.autosave_interval_ms <= 0 {
            return invalid("tick and autosave intervals must be positive".into());
        }
        if self.timing.offline_cap_ms < 0 {
            return invalid("offline_cap_ms must not be negative".into());
        }
        let e = &self.economy;
        if e.base_rate < 0.0 || e.base_click_power < 0.0 {
            return invalid("base rate and click power must not be negative".into());
        }
        if e.wisdom_rate_bonus < 0.0 || e.wisdom_click_bonus < 0.0 || e.boost.multiplier < 0.0 {
            return invalid("multipliers must not be negative".into());
        }
        if e.prestige_divisor <= 0.0 || e.progression.xp_per_level <= 0.0 {
            return invalid("prestige_divisor and xp_per_level must be positive".into());
        }

        let mut seen = HashSet::new();
        for u in &self.upgrades {
            if u.id.is_empty() || !seen.insert(u.id.as_str()) {
                return invalid(format!("upgrade id '{}' is empty or duplicated", u.id));
            }
            if u.growth <= 1.0 {
                return invalid(format!("upgrade '{}' growth must be > 1", u.id));
            }
            if u.base_cost < 0.0 {
                return invalid(format!("upgrade '{}' has a negative base cost", u.id));
            }
            let negative = match u.effect {
                Effect::IncreaseRate { per_level } | Effect::IncreaseClickPower { per_level } => {
                    per_level < 0.0
                }
                Effect::IncreaseScore { amount } | Effect::GrantResource { amount, .. } => {
                    amount < 0.0
                }
            };
            if negative {
                return invalid(format!("upgrade '{}' has a negative effect", u.id));
            }
        }

        let mut seen = HashSet::new();
        for a in &self.achievements {
            if a.id.is_empty() || !seen.insert(a.id.as_str()) {
                return invalid(format!("achievement id '{}' is empty or duplicated", a.id));
            }
            if a.rate_multiplier <= 0.0 {
                return invalid(format!("achievement '{}' multiplier must be positive", a.id));
            }
        }
        Ok(())
    }

    pub fn upgrade(&self, id: &str) -> Option<&UpgradeDef> {
        self.upgrades.iter().find(|u| u.id == id)
    }

    pub fn upgrades_of(&self, kind: UpgradeKind) -> impl Iterator<Item = &UpgradeDef> {
        self.upgrades.iter().filter(move |u| u.kind == kind)
    }

    /// The built-in study-themed catalog. Mirrors data/.
    pub fn study_wizard() -> Self {
        use Effect::*;
        use UpgradeKind::*;

        let def = |id: &str, name: &str, description: &str, kind, base_cost, effect| UpgradeDef {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            kind,
            base_cost,
            growth: cost::DEFAULT_GROWTH,
            currency: ResourceKind::Currency,
            effect,
        };
        let relic = |id: &str, name: &str, description: &str, base_cost, growth, effect| UpgradeDef {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            kind: Relic,
            base_cost,
            growth,
            currency: ResourceKind::Wisdom,
            effect,
        };
        let rate = |per_level| IncreaseRate { per_level };
        let click = |per_level| IncreaseClickPower { per_level };

        let upgrades = vec![
            // Producers
            def("apprentice", "Apprentice Scholar", "A young mage learning the ways", Producer, 50.0, rate(0.5)),
            def("scholar", "Castle Scholar", "Dedicated to ancient texts", Producer, 300.0, rate(2.5)),
            def("mage", "Tower Mage", "Channels arcane energies", Producer, 1_500.0, rate(12.0)),
            def("archmage", "Archmage", "Master of mystical arts", Producer, 8_000.0, rate(60.0)),
            def("time_lord", "Time Lord", "Bends time itself to study", Producer, 40_000.0, rate(300.0)),
            // Passive
            def("candlelight", "Candlelight", "Cozy illumination", Passive, 15.0, rate(0.2)),
            def("scrolls", "Ancient Scrolls", "Whispers of knowledge", Passive, 60.0, rate(0.5)),
            def("desk", "Reading Desk", "Study sanctuary", Passive, 180.0, rate(1.2)),
            def("gallery", "Upper Gallery", "More library space", Passive, 480.0, rate(2.8)),
            def("window", "Astral Window", "Starlight flows in", Passive, 1_300.0, rate(6.5)),
            def("quill_passive", "Enchanted Quill", "Writes on its own", Passive, 3_500.0, rate(15.0)),
            def("spell", "Time Spell", "Dilates time", Passive, 9_000.0, rate(35.0)),
            def("tome", "Ancient Tome", "Self-writing grimoire", Passive, 25_000.0, rate(80.0)),
            // Click
            def("quill", "Basic Quill", "Better writing tool", Click, 10.0, click(1.0)),
            def("silver", "Silver Ink", "Magical fluid", Click, 100.0, click(3.0)),
            def("pen", "Magic Pen", "Enchanted implement", Click, 800.0, click(8.0)),
            def("staff", "Wizard Staff", "Pure magical power", Click, 5_000.0, click(20.0)),
            // Relics
            relic("eternal_inkwell", "Eternal Inkwell", "Never runs dry", 2.0, 2.0, rate(5.0)),
            relic("memory_crystal", "Memory Crystal", "Holds a lifetime of study", 3.0, 2.2, IncreaseScore { amount: 2_500.0 }),
            relic("patron_grant", "Patron's Grant", "A purse from the Archive", 2.0, 1.8, GrantResource { resource: ResourceKind::Currency, amount: 1_000.0 }),
        ];

        let ach = |id: &str, name: &str, condition, rate_multiplier| AchievementDef {
            id: id.into(),
            name: name.into(),
            condition,
            rate_multiplier,
        };
        let earned = |amount| AchievementCondition::LifetimeEarned { resource: ResourceKind::Currency, amount };

        let achievements = vec![
            ach("first_drop", "First Drop", earned(100.0), 1.02),
            ach("ink_stained", "Ink-Stained", earned(10_000.0), 1.05),
            ach("endless_library", "Endless Library", earned(1_000_000.0), 1.10),
            ach("full_faculty", "Full Faculty", AchievementCondition::ProducersOwned { count: 10 }, 1.05),
            ach("diligent_hand", "Diligent Hand", AchievementCondition::Clicks { count: 500 }, 1.03),
            ach("archive_restored", "Archive Restored", AchievementCondition::Prestiges { count: 1 }, 1.10),
        ];

        Self {
            storage_key: "StudyWizardRPG_v1".into(),
            timing: TimingConfig::default(),
            economy: EconomyConfig::default(),
            upgrades,
            achievements,
        }
    }
}
