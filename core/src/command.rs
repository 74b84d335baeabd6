use crate::{state::TimeOfDay, types::CatalogId};
use serde::{Deserialize, Serialize};

/// All player-issued commands.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum PlayerCommand {
    // ── Economy ───────────────────────────────────
    Click,
    Purchase { upgrade_id: CatalogId },
    StartBoost,
    Prestige,

    // ── Settings ──────────────────────────────────
    SetSound { enabled: bool },
    SetParticles { enabled: bool },
    SetTimeOfDay { time_of_day: TimeOfDay },
}
