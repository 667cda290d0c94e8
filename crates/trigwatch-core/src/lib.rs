//! trigwatch-core: series types and the trigger metric reconciliation engine.
//! Turns per-target fetch results into per-metric comparison groups,
//! reconciled against the previous check. Pure: no IO, no async.

pub mod fetched;
pub mod name_set;
pub mod series;
pub mod trigger_metrics;
pub mod types;

pub use fetched::{FetchedMetrics, PatternMetricSet};
pub use name_set::MetricNameSet;
pub use series::{DEFAULT_STEP, RawSeries};
pub use trigger_metrics::{MetricGroup, TargetMetricSet, TriggerMetricSet, TriggerMetricsToCheck};
pub use types::{
    CheckData, CoreError, MetricState, TargetId, Trigger, TriggerState, WILDCARD_CHARS, is_wildcard,
};
