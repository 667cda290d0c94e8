//! MetricSource trait and FetchResult.
//! Mock-injectable boundary between the checker and wherever series live.

use std::sync::Arc;

use trigwatch_core::PatternMetricSet;

use crate::error::SourceError;

/// Series fetched for one target expression, plus the concrete metric names
/// the expression resolved to.
///
/// Name resolution can fail on its own without invalidating the series.
#[derive(Debug)]
pub struct FetchResult {
    metrics: PatternMetricSet,
    pattern_metrics: Result<Vec<String>, SourceError>,
}

impl FetchResult {
    pub fn new(metrics: PatternMetricSet, pattern_metrics: Vec<String>) -> Self {
        Self {
            metrics,
            pattern_metrics: Ok(pattern_metrics),
        }
    }

    /// Series were fetched but the matched metric names are unknown.
    pub fn with_pattern_error(metrics: PatternMetricSet, error: SourceError) -> Self {
        Self {
            metrics,
            pattern_metrics: Err(error),
        }
    }

    pub fn metrics_data(&self) -> &PatternMetricSet {
        &self.metrics
    }

    pub fn pattern_metrics(&self) -> Result<&[String], &SourceError> {
        self.pattern_metrics.as_deref()
    }

    pub fn into_parts(self) -> (PatternMetricSet, Result<Vec<String>, SourceError>) {
        (self.metrics, self.pattern_metrics)
    }
}

/// Fetches series for a target expression over `[from, until]`.
///
/// Simple triggers may receive the still-open bucket at `until`.
pub trait MetricSource: Send + Sync {
    fn fetch(
        &self,
        target: &str,
        from: i64,
        until: i64,
        is_simple_trigger: bool,
    ) -> Result<FetchResult, SourceError>;
}

impl<T: MetricSource + ?Sized> MetricSource for &T {
    fn fetch(
        &self,
        target: &str,
        from: i64,
        until: i64,
        is_simple_trigger: bool,
    ) -> Result<FetchResult, SourceError> {
        (**self).fetch(target, from, until, is_simple_trigger)
    }
}

impl<T: MetricSource + ?Sized> MetricSource for Arc<T> {
    fn fetch(
        &self,
        target: &str,
        from: i64,
        until: i64,
        is_simple_trigger: bool,
    ) -> Result<FetchResult, SourceError> {
        (**self).fetch(target, from, until, is_simple_trigger)
    }
}
