//! trigwatch-checker: per-trigger check cycle.
//! Fetches every target through a `MetricSource`, prunes stale samples, and
//! turns the result into comparison groups using trigwatch-core. Fetch
//! failures and "nothing to evaluate" both map to NODATA check data.

pub mod checker;
pub mod config;
pub mod error;
pub mod prune;
pub mod state;
pub mod store;

pub use checker::{PreparedMetrics, TriggerChecker};
pub use config::{CheckerConfig, DEFAULT_FETCH_WINDOW_SECS, DEFAULT_METRICS_TTL_SECS};
pub use error::CheckError;
pub use prune::{InlinePruner, MetricsPruner, PruneRequest};
pub use state::carry_forward;
pub use store::{InMemoryStore, MetricsStore, StoreError};
