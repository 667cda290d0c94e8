//! One trigger's check cycle: fetch every target, prune stale samples,
//! then reconcile the fetched series into comparison groups.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use trigwatch_core::{
    CheckData, FetchedMetrics, MetricGroup, TargetId, TargetMetricSet, Trigger, TriggerMetricSet,
    TriggerMetricsToCheck, TriggerState,
};
use trigwatch_source::MetricSource;

use crate::config::CheckerConfig;
use crate::error::CheckError;
use crate::prune::{MetricsPruner, PruneRequest};

/// Output of a successful cycle, ready for threshold evaluation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PreparedMetrics {
    /// Metric name → target → series.
    pub to_check: TriggerMetricsToCheck,
    /// Targets that resolved to a single metric.
    pub alone: MetricGroup,
    /// Metric names a target returned more than once; the first series won.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub duplicates: BTreeMap<TargetId, Vec<String>>,
}

pub struct TriggerChecker {
    trigger: Trigger,
    last_check: CheckData,
    until: i64,
    config: CheckerConfig,
    source: Arc<dyn MetricSource>,
    pruner: Arc<dyn MetricsPruner>,
}

impl TriggerChecker {
    pub fn new(
        trigger: Trigger,
        until: i64,
        source: Arc<dyn MetricSource>,
        pruner: Arc<dyn MetricsPruner>,
    ) -> Self {
        Self {
            trigger,
            last_check: CheckData::default(),
            until,
            config: CheckerConfig::default(),
            source,
            pruner,
        }
    }

    #[must_use]
    pub fn with_last_check(mut self, last_check: CheckData) -> Self {
        self.last_check = last_check;
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: CheckerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    pub fn last_check(&self) -> &CheckData {
        &self.last_check
    }

    pub fn from(&self) -> i64 {
        self.until - self.config.fetch_window_secs
    }

    pub fn until(&self) -> i64 {
        self.until
    }

    // ─── Fetch ────────────────────────────────────────────────────

    /// Fetches every target in order, returning the series per target and
    /// the metric names they resolved to.
    ///
    /// Fails on the first target whose fetch errors or returns no series.
    /// A target whose names could not be resolved still contributes its
    /// series but no names.
    pub fn fetch(&self) -> Result<(FetchedMetrics, Vec<String>), CheckError> {
        let is_simple = self.trigger.is_simple();
        let from = self.from();
        let mut fetched = FetchedMetrics::new();
        let mut metric_names = Vec::new();

        for (target, expression) in self.trigger.target_ids() {
            let (metrics, names) = self
                .source
                .fetch(expression, from, self.until, is_simple)
                .map_err(|source| CheckError::Fetch { target, source })?
                .into_parts();

            if metrics.is_empty() {
                return Err(CheckError::TargetHasNoMetrics(target));
            }

            match names {
                Ok(names) => metric_names.extend(names),
                Err(e) => tracing::debug!(
                    "trigger {}: metric names of {target} unavailable: {e}",
                    self.trigger.id
                ),
            }

            tracing::debug!(
                "trigger {}: fetched {} series for {target}",
                self.trigger.id,
                metrics.len()
            );
            fetched.add_metrics(target, metrics);
        }

        Ok((fetched, metric_names))
    }

    /// Fetches, schedules pruning of the resolved metrics, and rejects a
    /// trigger whose very first fetch matched nothing real.
    pub fn fetch_trigger_metrics(&self) -> Result<FetchedMetrics, CheckError> {
        let (fetched, metric_names) = self.fetch()?;
        self.cleanup_metrics_values(metric_names);

        if self.last_check.metrics.is_empty() && fetched.has_only_wildcards() {
            return Err(CheckError::TriggerHasOnlyWildcards);
        }
        Ok(fetched)
    }

    fn cleanup_metrics_values(&self, metrics: Vec<String>) {
        if metrics.is_empty() {
            return;
        }
        self.pruner.schedule(PruneRequest {
            metrics,
            older_than: self.until - self.config.metrics_ttl_secs,
        });
    }

    // ─── Prepare ──────────────────────────────────────────────────

    /// Reconciles fetched series with the previous check and reshapes them
    /// into comparison groups.
    pub fn prepare_metrics(&self, fetched: &FetchedMetrics) -> PreparedMetrics {
        let mut duplicates = BTreeMap::new();
        let mut metrics = TriggerMetricSet::new();

        for (target, series) in fetched.iter() {
            let (unique, repeated) = series.clean_wildcards().deduplicate();
            if !repeated.is_empty() {
                tracing::warn!(
                    "trigger {}: {target} returned duplicate metrics: {}",
                    self.trigger.id,
                    repeated.join(", ")
                );
                duplicates.insert(target, repeated);
            }
            metrics.insert(target, TargetMetricSet::from(&unique));
        }

        let populated = metrics.populate(&self.last_check, self.from(), self.until);
        let (rest, alone) = populated.filter_alone_metrics();
        let to_check = rest.convert_for_check();

        tracing::debug!(
            "trigger {}: {} metric groups, {} alone targets",
            self.trigger.id,
            to_check.len(),
            alone.len()
        );

        PreparedMetrics {
            to_check,
            alone,
            duplicates,
        }
    }

    /// Runs a full cycle.
    pub fn check(&self) -> Result<PreparedMetrics, CheckError> {
        let fetched = self.fetch_trigger_metrics()?;
        Ok(self.prepare_metrics(&fetched))
    }

    /// Check data to persist when a cycle failed: the previous metrics are
    /// kept and the trigger moves to NODATA with the error as its message.
    pub fn handle_fetch_error(&self, err: &CheckError, now: i64) -> CheckData {
        CheckData {
            state: TriggerState::Nodata,
            message: Some(err.to_string()),
            timestamp: now,
            ..self.last_check.clone()
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────
