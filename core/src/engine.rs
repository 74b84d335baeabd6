//! The idle engine. Owns the state container and drives it.
//!
//! TICK ORDER (fixed, documented, never reordered):
//!   1. Accrual        (rate × wall-clock Δt, boost countdown)
//!   2. Achievements   (re-evaluated against the new totals)
//!   3. Autosave       (only when the autosave timer is due)
//!
//! RULES:
//!   - All mutation happens inside start(), tick(), apply() and save_now().
//!   - Every player action is followed by an immediate save.
//!   - No failure inside the loop is fatal: save errors become SaveFailed
//!     events, load errors become defaults.
//!   - Time only comes from the injected Clock.

use crate::{
    accrual::accrue,
    achievement::evaluate_achievements,
    actions,
    clock::Clock,
    command::PlayerCommand,
    config::GameConfig,
    effect::EffectOutcome,
    error::GameResult,
    event::GameEvent,
    persistence::{self, LoadSource, SaveStorage},
    purchase::{self, PurchaseOutcome, ShopEntry},
    rate,
    scheduler::Scheduler,
    state::GameState,
    types::MS_PER_SEC,
};

pub struct IdleEngine<C: Clock, S: SaveStorage> {
    config:    GameConfig,
    state:     GameState,
    clock:     C,
    storage:   S,
    scheduler: Scheduler,
    started:   bool,
}

impl<C: Clock, S: SaveStorage> IdleEngine<C, S> {
    pub fn new(config: GameConfig, clock: C, storage: S) -> Self {
        let scheduler = Scheduler::new(&config.timing);
        Self {
            config,
            state: GameState::default(),
            clock,
            storage,
            scheduler,
            started: false,
        }
    }

    /// Load the saved game, replay offline time and arm the timers.
    /// Calling it again is a no-op.
    pub fn start(&mut self) -> Vec<GameEvent> {
        if self.started {
            return vec![];
        }
        self.started = true;

        let now = self.clock.now_ms();
        let outcome = persistence::load(&self.storage, &self.config, now);
        self.state = outcome.state;

        let mut events = Vec::new();
        match outcome.source {
            LoadSource::Fresh => events.push(GameEvent::Loaded { restored: false }),
            LoadSource::Restored => events.push(GameEvent::Loaded { restored: true }),
            LoadSource::Recovered { reason } => {
                events.push(GameEvent::StateRecovered { reason });
                events.push(GameEvent::Loaded { restored: false });
            }
        }
        if let Some(report) = outcome.offline {
            events.push(GameEvent::OfflineProgress {
                elapsed_ms: report.elapsed_ms,
                capped:     report.capped,
                gained:     report.gained,
            });
        }
        self.push_achievements(&mut events);
        self.scheduler.arm(now);
        events
    }

    /// Poll the timers and run whatever is due. Hosts call this from their
    /// run loop at any cadence.
    pub fn pump(&mut self) -> Vec<GameEvent> {
        let mut events = self.start();
        let due = self.scheduler.poll(self.clock.now_ms());
        if let Some(elapsed_ms) = due.tick_elapsed_ms {
            events.extend(self.tick(elapsed_ms as f64 / MS_PER_SEC));
        }
        if due.autosave {
            events.push(self.persist());
        }
        events
    }

    /// Advance the game by `dt_secs` of passive time. Does not save.
    pub fn tick(&mut self, dt_secs: f64) -> Vec<GameEvent> {
        let report = accrue(&mut self.state, &self.config, dt_secs);
        let mut events = Vec::new();
        if report.dt_secs > 0.0 {
            log::trace!(
                "tick dt={:.3}s rate={:.3} gained={:.3}",
                report.dt_secs,
                report.rate,
                report.gained
            );
            events.push(GameEvent::Accrued {
                dt_secs: report.dt_secs,
                rate:    report.rate,
                gained:  report.gained,
            });
        }
        if report.boost_expired {
            events.push(GameEvent::BoostExpired);
        }
        self.push_achievements(&mut events);
        events
    }

    /// Execute a player command and save immediately.
    pub fn apply(&mut self, command: PlayerCommand) -> Vec<GameEvent> {
        let mut events = self.start();
        let changed = match command {
            PlayerCommand::Click => {
                let gained = actions::click(&mut self.state, &self.config);
                events.push(GameEvent::Clicked { gained });
                true
            }
            PlayerCommand::Purchase { upgrade_id } => {
                self.apply_purchase(upgrade_id, &mut events)
            }
            PlayerCommand::StartBoost => {
                let started = actions::start_boost(&mut self.state, &self.config);
                if started {
                    events.push(GameEvent::BoostStarted {
                        duration_secs: self.state.boost.remaining_secs,
                    });
                }
                started
            }
            PlayerCommand::Prestige => match actions::prestige(&mut self.state, &self.config) {
                Some(wisdom_gained) => {
                    events.push(GameEvent::Prestiged {
                        wisdom_gained,
                        prestige_count: self.state.prestige_count,
                    });
                    true
                }
                None => false,
            },
            PlayerCommand::SetSound { enabled } => {
                self.state.settings.sound = enabled;
                events.push(GameEvent::SettingsChanged);
                true
            }
            PlayerCommand::SetParticles { enabled } => {
                self.state.settings.particles = enabled;
                events.push(GameEvent::SettingsChanged);
                true
            }
            PlayerCommand::SetTimeOfDay { time_of_day } => {
                self.state.settings.time_of_day = time_of_day;
                events.push(GameEvent::SettingsChanged);
                true
            }
        };

        if changed {
            self.push_achievements(&mut events);
            events.push(self.persist());
        }
        events
    }

    fn apply_purchase(&mut self, upgrade_id: String, events: &mut Vec<GameEvent>) -> bool {
        match purchase::purchase(&mut self.state, &self.config, &upgrade_id) {
            PurchaseOutcome::Purchased { cost, level, effect } => {
                events.push(GameEvent::Purchased { upgrade_id, level, cost });
                if let EffectOutcome::Granted { resource, amount } = effect {
                    events.push(GameEvent::Granted { resource, amount });
                }
                true
            }
            PurchaseOutcome::InsufficientFunds { cost, available } => {
                events.push(GameEvent::PurchaseRejected {
                    upgrade_id,
                    reason: format!("needs {cost}, has {available:.2}"),
                });
                false
            }
            PurchaseOutcome::UnknownUpgrade => {
                log::warn!("Unknown upgrade: {upgrade_id}");
                events.push(GameEvent::PurchaseRejected {
                    upgrade_id,
                    reason: "unknown upgrade".into(),
                });
                false
            }
        }
    }

    /// Save now, surfacing the error to the caller.
    pub fn save_now(&mut self) -> GameResult<()> {
        let now = self.clock.now_ms();
        persistence::save(&mut self.state, &mut self.storage, &self.config.storage_key, now)
    }

    /// Best-effort final save. Failures are logged and swallowed.
    pub fn shutdown(&mut self) {
        if !self.started {
            return;
        }
        if let Err(e) = self.save_now() {
            log::warn!("Final save failed: {e}");
        }
    }

    fn persist(&mut self) -> GameEvent {
        match self.save_now() {
            Ok(()) => GameEvent::Saved { at: self.state.last_saved.unwrap_or_default() },
            Err(e) => {
                log::warn!("Save skipped: {e}");
                GameEvent::SaveFailed { reason: e.to_string() }
            }
        }
    }

    fn push_achievements(&mut self, events: &mut Vec<GameEvent>) {
        for achievement_id in evaluate_achievements(&mut self.state, &self.config) {
            events.push(GameEvent::AchievementUnlocked { achievement_id });
        }
    }

    // ── Read-only views ────────────────────────────────────────

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Hand the storage back, e.g. to reopen the same slot later.
    pub fn into_storage(self) -> S {
        self.storage
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn rate(&self) -> f64 {
        rate::current_rate(&self.state, &self.config)
    }

    pub fn click_power(&self) -> f64 {
        rate::click_power(&self.state, &self.config)
    }

    pub fn prestige_preview(&self) -> u64 {
        actions::prestige_preview(&self.state, &self.config)
    }

    pub fn shop(&self) -> Vec<ShopEntry> {
        purchase::shop(&self.state, &self.config)
    }
}
