//! Wall-clock sources. The engine never reads the system time directly;
//! it asks a `Clock`, so tests can move time by hand.

use crate::types::EpochMillis;
use std::sync::{
    atomic::{AtomicI64, Ordering},
    Arc,
};

pub trait Clock {
    /// Current time in epoch milliseconds.
    fn now_ms(&self) -> EpochMillis;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> EpochMillis {
        chrono::Utc::now().timestamp_millis()
    }
}

/// A clock that only moves when told to. Clones share the same time, so a
/// test can keep a handle while the engine owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicI64>,
}

impl ManualClock {
    pub fn new(start: EpochMillis) -> Self {
        Self { now: Arc::new(AtomicI64::new(start)) }
    }

    /// Start at the current system time.
    pub fn starting_now() -> Self {
        Self::new(SystemClock.now_ms())
    }

    pub fn advance(&self, ms: EpochMillis) -> EpochMillis {
        self.now.fetch_add(ms, Ordering::SeqCst) + ms
    }

    pub fn set(&self, ms: EpochMillis) {
        self.now.store(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> EpochMillis {
        self.now.load(Ordering::SeqCst)
    }
}
