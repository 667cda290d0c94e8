//! Metric and check-state storage.
//!
//! `MetricsStore` is the narrow surface a check cycle needs: prune old
//! samples, read the update counters used for self-monitoring, and keep the
//! last check of each trigger. `InMemoryStore` backs local runs and tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;
use trigwatch_core::CheckData;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub trait MetricsStore: Send + Sync {
    /// Drops every sample of `metrics` with a timestamp at or before `older_than`.
    fn remove_metrics_values(&self, metrics: &[String], older_than: i64)
    -> Result<(), StoreError>;

    fn get_metrics_updates_count(&self) -> Result<i64, StoreError>;

    fn get_checks_updates_count(&self) -> Result<i64, StoreError>;

    fn get_trigger_last_check(&self, trigger_id: &str) -> Result<Option<CheckData>, StoreError>;

    fn set_trigger_last_check(&self, trigger_id: &str, check: &CheckData)
    -> Result<(), StoreError>;
}

impl<T: MetricsStore + ?Sized> MetricsStore for &T {
    fn remove_metrics_values(
        &self,
        metrics: &[String],
        older_than: i64,
    ) -> Result<(), StoreError> {
        (**self).remove_metrics_values(metrics, older_than)
    }

    fn get_metrics_updates_count(&self) -> Result<i64, StoreError> {
        (**self).get_metrics_updates_count()
    }

    fn get_checks_updates_count(&self) -> Result<i64, StoreError> {
        (**self).get_checks_updates_count()
    }

    fn get_trigger_last_check(&self, trigger_id: &str) -> Result<Option<CheckData>, StoreError> {
        (**self).get_trigger_last_check(trigger_id)
    }

    fn set_trigger_last_check(
        &self,
        trigger_id: &str,
        check: &CheckData,
    ) -> Result<(), StoreError> {
        (**self).set_trigger_last_check(trigger_id, check)
    }
}

impl<T: MetricsStore + ?Sized> MetricsStore for Arc<T> {
    fn remove_metrics_values(
        &self,
        metrics: &[String],
        older_than: i64,
    ) -> Result<(), StoreError> {
        (**self).remove_metrics_values(metrics, older_than)
    }

    fn get_metrics_updates_count(&self) -> Result<i64, StoreError> {
        (**self).get_metrics_updates_count()
    }

    fn get_checks_updates_count(&self) -> Result<i64, StoreError> {
        (**self).get_checks_updates_count()
    }

    fn get_trigger_last_check(&self, trigger_id: &str) -> Result<Option<CheckData>, StoreError> {
        (**self).get_trigger_last_check(trigger_id)
    }

    fn set_trigger_last_check(
        &self,
        trigger_id: &str,
        check: &CheckData,
    ) -> Result<(), StoreError> {
        (**self).set_trigger_last_check(trigger_id, check)
    }
}

// ─── In-memory ────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct Inner {
    /// metric name → timestamp → value
    values: BTreeMap<String, BTreeMap<i64, f64>>,
    metrics_updates: i64,
    checks_updates: i64,
    last_checks: HashMap<String, CheckData>,
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: Mutex<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // A panic mid-update leaves plain maps behind, still usable.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records samples for one metric; a repeated timestamp overwrites.
    pub fn save_metric_values(&self, metric: &str, samples: &[(i64, f64)]) {
        let mut inner = self.lock();
        inner
            .values
            .entry(metric.to_string())
            .or_default()
            .extend(samples.iter().copied());
        inner.metrics_updates += samples.len() as i64;
    }

    /// Stored samples of `metric` in timestamp order.
    pub fn metric_values(&self, metric: &str) -> Vec<(i64, f64)> {
        self.lock()
            .values
            .get(metric)
            .map(|samples| samples.iter().map(|(ts, v)| (*ts, *v)).collect())
            .unwrap_or_default()
    }

    pub fn metric_names(&self) -> Vec<String> {
        self.lock().values.keys().cloned().collect()
    }
}

impl MetricsStore for InMemoryStore {
    fn remove_metrics_values(
        &self,
        metrics: &[String],
        older_than: i64,
    ) -> Result<(), StoreError> {
        let mut inner = self.lock();
        for metric in metrics {
            let Some(samples) = inner.values.get_mut(metric) else {
                continue;
            };
            *samples = samples.split_off(&older_than.saturating_add(1));
            if samples.is_empty() {
                inner.values.remove(metric);
            }
        }
        Ok(())
    }

    fn get_metrics_updates_count(&self) -> Result<i64, StoreError> {
        Ok(self.lock().metrics_updates)
    }

    fn get_checks_updates_count(&self) -> Result<i64, StoreError> {
        Ok(self.lock().checks_updates)
    }

    fn get_trigger_last_check(&self, trigger_id: &str) -> Result<Option<CheckData>, StoreError> {
        Ok(self.lock().last_checks.get(trigger_id).cloned())
    }

    fn set_trigger_last_check(
        &self,
        trigger_id: &str,
        check: &CheckData,
    ) -> Result<(), StoreError> {
        let mut inner = self.lock();
        inner
            .last_checks
            .insert(trigger_id.to_string(), check.clone());
        inner.checks_updates += 1;
        Ok(())
    }
}

// ─── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use trigwatch_core::TriggerState;

    #[test]
    fn prune_is_inclusive_of_cutoff() {
        let store = InMemoryStore::new();
        store.save_metric_values("a", &[(0, 1.0), (60, 2.0), (120, 3.0)]);
        store.save_metric_values("b", &[(0, 9.0)]);

        store
            .remove_metrics_values(&["a".to_string(), "b".to_string()], 60)
            .expect("prune");

        assert_eq!(store.metric_values("a"), vec![(120, 3.0)]);
        assert!(store.metric_values("b").is_empty());
        assert_eq!(store.metric_names(), vec!["a".to_string()]);
    }

    #[test]
    fn prune_ignores_unknown_metrics() {
        let store = InMemoryStore::new();
        store
            .remove_metrics_values(&["nope".to_string()], 100)
            .expect("prune");
        assert!(store.metric_names().is_empty());
    }

    #[test]
    fn counters_track_writes() {
        let store = InMemoryStore::new();
        store.save_metric_values("a", &[(0, 1.0), (60, 2.0)]);
        assert_eq!(store.get_metrics_updates_count().expect("count"), 2);
        assert_eq!(store.get_checks_updates_count().expect("count"), 0);

        let check = CheckData {
            state: TriggerState::Warn,
            timestamp: 60,
            ..CheckData::default()
        };
        store.set_trigger_last_check("trigger-1", &check).expect("set");
        assert_eq!(store.get_checks_updates_count().expect("count"), 1);
        assert_eq!(
            store.get_trigger_last_check("trigger-1").expect("get"),
            Some(check)
        );
        assert_eq!(store.get_trigger_last_check("other").expect("get"), None);
    }

    #[test]
    fn shared_store_through_arc() {
        let store: Arc<dyn MetricsStore> = Arc::new(InMemoryStore::new());
        store
            .set_trigger_last_check("t", &CheckData::default())
            .expect("set");
        assert_eq!(store.get_checks_updates_count().expect("count"), 1);
    }
}
