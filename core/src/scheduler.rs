//! Fixed-interval timers for the logic tick and autosave.
//!
//! The scheduler does not sleep. The host calls `poll(now)` as often as it
//! likes; each timer fires at most once per poll, and the tick reports the
//! full wall-clock span since the previous tick so a late or throttled
//! host loses no income.

use crate::{config::TimingConfig, types::EpochMillis};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Due {
    /// Milliseconds since the previous tick, if a tick is due.
    pub tick_elapsed_ms: Option<EpochMillis>,
    pub autosave:        bool,
}

#[derive(Debug, Clone)]
pub struct Scheduler {
    tick_interval_ms:     EpochMillis,
    autosave_interval_ms: EpochMillis,
    last_tick:            Option<EpochMillis>,
    last_save:            Option<EpochMillis>,
}

impl Scheduler {
    pub fn new(timing: &TimingConfig) -> Self {
        Self {
            tick_interval_ms:     timing.tick_interval_ms.max(1),
            autosave_interval_ms: timing.autosave_interval_ms.max(1),
            last_tick:            None,
            last_save:            None,
        }
    }

    /// Start both timers at `now`.
    pub fn arm(&mut self, now: EpochMillis) {
        self.last_tick = Some(now);
        self.last_save = Some(now);
    }

    pub fn is_armed(&self) -> bool {
        self.last_tick.is_some()
    }

    pub fn poll(&mut self, now: EpochMillis) -> Due {
        let (Some(last_tick), Some(last_save)) = (self.last_tick, self.last_save) else {
            self.arm(now);
            return Due::default();
        };

        let mut due = Due::default();

        let since_tick = now - last_tick;
        if since_tick < 0 {
            // Clock went backwards; restart the interval instead of paying out.
            self.last_tick = Some(now);
        } else if since_tick >= self.tick_interval_ms {
            due.tick_elapsed_ms = Some(since_tick);
            self.last_tick = Some(now);
        }

        let since_save = now - last_save;
        if since_save < 0 {
            self.last_save = Some(now);
        } else if since_save >= self.autosave_interval_ms {
            due.autosave = true;
            self.last_save = Some(now);
        }

        due
    }
}
