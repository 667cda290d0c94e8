//! Checker tuning knobs.

use serde::{Deserialize, Serialize};

/// Samples older than this are pruned after every fetch.
pub const DEFAULT_METRICS_TTL_SECS: i64 = 3 * 60 * 60;
/// Width of the `[from, until]` window fetched per check.
pub const DEFAULT_FETCH_WINDOW_SECS: i64 = 10 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckerConfig {
    pub metrics_ttl_secs: i64,
    pub fetch_window_secs: i64,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            metrics_ttl_secs: DEFAULT_METRICS_TTL_SECS,
            fetch_window_secs: DEFAULT_FETCH_WINDOW_SECS,
        }
    }
}
