//! Shared primitive types used across the whole engine.

/// Wall-clock time in milliseconds since the Unix epoch.
pub type EpochMillis = i64;

/// Stable identifier of a catalog entry (upgrade or achievement).
pub type CatalogId = String;

pub const MS_PER_SEC: f64 = 1000.0;
