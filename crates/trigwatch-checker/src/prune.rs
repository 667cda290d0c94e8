//! Cleanup of stale samples after a fetch.
//!
//! The checker only describes what to prune; a `MetricsPruner` decides when.
//! Pruning failures are logged and never reach the check cycle.

use std::sync::Arc;

use crate::store::MetricsStore;

/// Samples of `metrics` at or before `older_than` are no longer needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PruneRequest {
    pub metrics: Vec<String>,
    pub older_than: i64,
}

impl PruneRequest {
    /// Runs the request against `store`, logging a failure.
    pub fn apply(&self, store: &impl MetricsStore) {
        if let Err(e) = store.remove_metrics_values(&self.metrics, self.older_than) {
            tracing::warn!(
                "failed to remove values of {} metrics: {e}",
                self.metrics.len()
            );
        }
    }
}

pub trait MetricsPruner: Send + Sync {
    fn schedule(&self, request: PruneRequest);
}

impl<T: MetricsPruner + ?Sized> MetricsPruner for Arc<T> {
    fn schedule(&self, request: PruneRequest) {
        (**self).schedule(request);
    }
}

/// Prunes synchronously on the calling thread.
#[derive(Debug)]
pub struct InlinePruner<S> {
    store: S,
}

impl<S: MetricsStore> InlinePruner<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S: MetricsStore> MetricsPruner for InlinePruner<S> {
    fn schedule(&self, request: PruneRequest) {
        request.apply(&self.store);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{InMemoryStore, StoreError};
    use trigwatch_core::CheckData;

    struct BrokenStore;

    impl MetricsStore for BrokenStore {
        fn remove_metrics_values(&self, _: &[String], _: i64) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("connection refused".into()))
        }
        fn get_metrics_updates_count(&self) -> Result<i64, StoreError> {
            Ok(0)
        }
        fn get_checks_updates_count(&self) -> Result<i64, StoreError> {
            Ok(0)
        }
        fn get_trigger_last_check(&self, _: &str) -> Result<Option<CheckData>, StoreError> {
            Ok(None)
        }
        fn set_trigger_last_check(&self, _: &str, _: &CheckData) -> Result<(), StoreError> {
            Ok(())
        }
    }

    #[test]
    fn inline_pruner_removes_old_samples() {
        let store = Arc::new(InMemoryStore::new());
        store.save_metric_values("a.b", &[(10, 1.0), (100, 2.0)]);

        let pruner = InlinePruner::new(Arc::clone(&store));
        pruner.schedule(PruneRequest {
            metrics: vec!["a.b".to_string()],
            older_than: 50,
        });

        assert_eq!(store.metric_values("a.b"), vec![(100, 2.0)]);
    }

    #[test]
    fn failure_is_swallowed() {
        let pruner = InlinePruner::new(BrokenStore);
        pruner.schedule(PruneRequest {
            metrics: vec!["a.b".to_string()],
            older_than: 50,
        });
    }
}
