//! Next-cycle history from a successful check.

use std::collections::BTreeMap;

use trigwatch_core::{CheckData, MetricGroup, MetricState};

use crate::checker::PreparedMetrics;

/// Builds the check data the next cycle reconciles against.
///
/// Alone targets are recorded in the relation and their series are merged
/// into every metric group, as they are when thresholds are evaluated. Each
/// metric keeps the last finite value per target. A target with only gaps
/// this cycle, such as a placeholder standing in for a vanished metric,
/// keeps the value recorded in `last`, so the metric survives until its
/// history runs out. Metric and trigger states are carried over from `last`.
pub fn carry_forward(last: &CheckData, prepared: &PreparedMetrics, until: i64) -> CheckData {
    let mut groups: Vec<(String, MetricGroup)> = prepared
        .to_check
        .iter()
        .map(|(name, group)| (name.to_string(), group.merge(&prepared.alone)))
        .collect();

    if groups.is_empty() {
        if let Some(name) = prepared.alone.metric_name() {
            groups.push((name.to_string(), prepared.alone.clone()));
        }
    }

    let metrics: BTreeMap<String, MetricState> = groups
        .into_iter()
        .map(|(name, group)| {
            let previous = last.metrics.get(&name);
            let state = previous.map(|p| p.state).unwrap_or_default();
            let values = group
                .iter()
                .filter_map(|(target, series)| {
                    series
                        .last_value()
                        .or_else(|| previous.and_then(|p| p.values.get(&target).copied()))
                        .map(|v| (target, v))
                })
                .collect();
            (
                name,
                MetricState {
                    state,
                    timestamp: until,
                    values,
                },
            )
        })
        .collect();

    CheckData {
        metrics,
        metrics_to_target_relation: prepared.alone.relations(),
        state: last.state,
        message: None,
        timestamp: until,
    }
}
