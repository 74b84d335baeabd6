//! idle-core: idle resource accrual, purchase economics and offline
//! catch-up for incremental games.
//!
//! Leaves first: cost → rate → accrual → persistence, with the engine on
//! top owning the state and the clock.

pub mod accrual;
pub mod achievement;
pub mod actions;
pub mod clock;
pub mod command;
pub mod config;
pub mod cost;
pub mod effect;
pub mod engine;
pub mod error;
pub mod event;
pub mod persistence;
pub mod purchase;
pub mod rate;
pub mod scheduler;
pub mod snapshot;
pub mod state;
pub mod store;
pub mod types;
