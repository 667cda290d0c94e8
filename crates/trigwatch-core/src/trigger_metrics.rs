//! Reconciliation of fetched series against the previous check, and the
//! reshape into per-metric comparison groups.
//!
//! Every stage takes `&self` and returns a new value, so the pipeline
//! `populate → filter_alone_metrics → convert_for_check` can be exercised
//! stage by stage.
//!
//! Representative choices are explicit: the step for a synthesized series is
//! sampled from the sibling with the smallest name, and the common metric set
//! comes from the lowest-indexed target holding more than one metric.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::fetched::PatternMetricSet;
use crate::name_set::MetricNameSet;
use crate::series::{DEFAULT_STEP, RawSeries};
use crate::types::{CheckData, TargetId};

// ─── Target ───────────────────────────────────────────────────────

/// One target's series keyed by metric name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TargetMetricSet(BTreeMap<String, RawSeries>);

impl TargetMetricSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&RawSeries> {
        self.0.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawSeries)> {
        self.0.iter().map(|(name, series)| (name.as_str(), series))
    }

    pub fn names(&self) -> MetricNameSet {
        self.0.keys().map(String::as_str).collect()
    }

    /// The only series of a target that resolved to exactly one metric.
    pub fn sole_metric(&self) -> Option<&RawSeries> {
        if self.0.len() == 1 {
            self.0.values().next()
        } else {
            None
        }
    }

    /// Step for synthesized series: the smallest-named sibling's step, or
    /// [`DEFAULT_STEP`] when there is no sibling or its step is zero.
    pub fn step_hint(&self) -> i64 {
        self.0
            .values()
            .next()
            .map(|series| series.step_time)
            .filter(|step| *step != 0)
            .unwrap_or(DEFAULT_STEP)
    }

    /// Returns a set holding exactly `required`: existing series are kept,
    /// missing ones become placeholders on `[from, to]`.
    #[must_use]
    pub fn populate(&self, required: &MetricNameSet, from: i64, to: i64) -> Self {
        let step = self.step_hint();
        Self(
            required
                .iter()
                .map(|name| {
                    let series = self
                        .0
                        .get(name)
                        .cloned()
                        .unwrap_or_else(|| RawSeries::placeholder(name, step, from, to));
                    (name.to_owned(), series)
                })
                .collect(),
        )
    }
}

/// Later series win when names repeat; deduplicate upstream to keep the first.
impl From<&PatternMetricSet> for TargetMetricSet {
    fn from(source: &PatternMetricSet) -> Self {
        source.iter().cloned().collect()
    }
}

impl FromIterator<RawSeries> for TargetMetricSet {
    fn from_iter<I: IntoIterator<Item = RawSeries>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|series| (series.name.clone(), series))
                .collect(),
        )
    }
}

// ─── Trigger ──────────────────────────────────────────────────────

/// All targets of a trigger for one check cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TriggerMetricSet(BTreeMap<TargetId, TargetMetricSet>);

impl TriggerMetricSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, target: TargetId, metrics: TargetMetricSet) {
        self.0.insert(target, metrics);
    }

    pub fn get(&self, target: TargetId) -> Option<&TargetMetricSet> {
        self.0.get(&target)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TargetId, &TargetMetricSet)> {
        self.0.iter().map(|(target, metrics)| (*target, metrics))
    }

    /// Completes every target with the metric names it must carry given the
    /// previous check and its peer targets.
    ///
    /// 1. Targets recorded as alone last cycle require exactly their recorded
    ///    metric; those metric names are skipped below.
    /// 2. Every other target requires each metric it reported a value for
    ///    last cycle.
    /// 3. Every target requires what it just fetched.
    /// 4. Multi-metric targets require what their multi-metric peers fetched
    ///    (see [`Self::diff`]).
    ///
    /// Targets only known from history start empty and end up holding
    /// placeholders.
    #[must_use]
    pub fn populate(&self, last_check: &CheckData, from: i64, to: i64) -> Self {
        let relation = &last_check.metrics_to_target_relation;
        let mut required: BTreeMap<TargetId, MetricNameSet> = BTreeMap::new();
        let mut previously_alone = MetricNameSet::new();

        for (target, metric_name) in relation {
            required.insert(*target, std::iter::once(metric_name.as_str()).collect());
            previously_alone.insert(metric_name.as_str());
        }

        for (metric_name, metric_state) in &last_check.metrics {
            if previously_alone.contains(metric_name) {
                continue;
            }
            for target in metric_state.values.keys() {
                if relation.contains_key(target) {
                    continue;
                }
                required
                    .entry(*target)
                    .or_default()
                    .insert(metric_name.as_str());
            }
        }

        for (target, metrics) in &self.0 {
            required
                .entry(*target)
                .or_default()
                .extend(metrics.0.keys().map(String::as_str));
        }

        for (target, missing) in self.diff() {
            let names = required.entry(target).or_default();
            *names = names.union(&missing);
        }

        Self(
            required
                .into_iter()
                .map(|(target, names)| {
                    let populated = match self.0.get(&target) {
                        Some(metrics) => metrics.populate(&names, from, to),
                        None => TargetMetricSet::new().populate(&names, from, to),
                    };
                    (target, populated)
                })
                .collect(),
        )
    }

    /// Names each multi-metric target lacks compared with the union of all
    /// multi-metric targets. Single-metric targets neither contribute to the
    /// union nor appear in the result; targets lacking nothing are omitted.
    pub fn diff(&self) -> BTreeMap<TargetId, MetricNameSet> {
        let multi: Vec<(TargetId, MetricNameSet)> = self
            .0
            .iter()
            .filter(|(_, metrics)| metrics.len() != 1)
            .map(|(target, metrics)| (*target, metrics.names()))
            .collect();

        let full = multi
            .iter()
            .fold(MetricNameSet::new(), |acc, (_, names)| acc.union(names));

        multi
            .into_iter()
            .filter_map(|(target, names)| {
                let missing = full.difference(&names);
                (!missing.is_empty()).then_some((target, missing))
            })
            .collect()
    }

    /// Splits off targets holding exactly one series. Those are compared as a
    /// standalone series per target rather than grouped by metric name.
    #[must_use]
    pub fn filter_alone_metrics(&self) -> (Self, MetricGroup) {
        let mut rest = BTreeMap::new();
        let mut alone = BTreeMap::new();

        for (target, metrics) in &self.0 {
            match metrics.sole_metric() {
                Some(series) => {
                    alone.insert(*target, series.clone());
                }
                None => {
                    rest.insert(*target, metrics.clone());
                }
            }
        }
        (Self(rest), MetricGroup(alone))
    }

    /// Reshapes `target → metric → series` into `metric → target → series`.
    ///
    /// Single-metric targets are broadcast into every group. Without any
    /// multi-metric target there is nothing to group and the result is
    /// empty; a lone single-metric target is handled as an alone metric.
    pub fn convert_for_check(&self) -> TriggerMetricsToCheck {
        let Some(common) = self.common_metrics() else {
            return TriggerMetricsToCheck::default();
        };

        let mut groups: BTreeMap<String, MetricGroup> = BTreeMap::new();
        for (target, metrics) in &self.0 {
            let sole = metrics.sole_metric();
            for metric_name in common.iter() {
                // A multi-metric target lacking a common name stays out of that group.
                let Some(series) = sole.or_else(|| metrics.get(metric_name)) else {
                    continue;
                };
                groups
                    .entry(metric_name.to_owned())
                    .or_default()
                    .0
                    .insert(*target, series.clone());
            }
        }
        TriggerMetricsToCheck(groups)
    }

    /// Names of the lowest-indexed target holding more than one metric.
    fn common_metrics(&self) -> Option<MetricNameSet> {
        self.0
            .values()
            .find(|metrics| metrics.len() > 1)
            .map(TargetMetricSet::names)
    }
}

impl FromIterator<(TargetId, TargetMetricSet)> for TriggerMetricSet {
    fn from_iter<I: IntoIterator<Item = (TargetId, TargetMetricSet)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ─── Groups ───────────────────────────────────────────────────────

/// One comparison unit: the series every target contributes for one metric.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MetricGroup(BTreeMap<TargetId, RawSeries>);

impl MetricGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, target: TargetId, series: RawSeries) {
        self.0.insert(target, series);
    }

    pub fn get(&self, target: TargetId) -> Option<&RawSeries> {
        self.0.get(&target)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TargetId, &RawSeries)> {
        self.0.iter().map(|(target, series)| (*target, series))
    }

    /// Smallest series name in the group. Only meaningful when all targets
    /// carry the same metric name.
    pub fn metric_name(&self) -> Option<&str> {
        self.0.values().map(|series| series.name.as_str()).min()
    }

    /// Target → metric name, as persisted in the alone-metrics relation.
    pub fn relations(&self) -> BTreeMap<TargetId, String> {
        self.0
            .iter()
            .map(|(target, series)| (*target, series.name.clone()))
            .collect()
    }

    /// Union of both groups; `other` wins on shared targets.
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        let mut merged = self.0.clone();
        merged.extend(other.0.iter().map(|(target, series)| (*target, series.clone())));
        Self(merged)
    }
}

impl FromIterator<(TargetId, RawSeries)> for MetricGroup {
    fn from_iter<I: IntoIterator<Item = (TargetId, RawSeries)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Groups handed to the threshold evaluator, keyed by metric name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TriggerMetricsToCheck(BTreeMap<String, MetricGroup>);

impl TriggerMetricsToCheck {
    pub fn get(&self, metric_name: &str) -> Option<&MetricGroup> {
        self.0.get(metric_name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetricGroup)> {
        self.0.iter().map(|(name, group)| (name.as_str(), group))
    }
}

impl FromIterator<(String, MetricGroup)> for TriggerMetricsToCheck {
    fn from_iter<I: IntoIterator<Item = (String, MetricGroup)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ─── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MetricState;

    const FROM: i64 = 17;
    const TO: i64 = 67;

    fn t(index: u32) -> TargetId {
        TargetId::new(index).expect("non-zero index")
    }

    fn series(name: &str) -> RawSeries {
        RawSeries::new(name, FROM, TO, 60, vec![0.0])
    }

    fn target_set(names: &[&str]) -> TargetMetricSet {
        names.iter().map(|name| series(name)).collect()
    }

    fn trigger_set(targets: &[(u32, &[&str])]) -> TriggerMetricSet {
        targets
            .iter()
            .map(|(index, names)| (t(*index), target_set(names)))
            .collect()
    }

    fn name_set(names: &[&str]) -> MetricNameSet {
        names.iter().copied().collect()
    }

    fn history(metrics: &[(&str, &[u32])], relation: &[(u32, &str)]) -> CheckData {
        CheckData {
            metrics: metrics
                .iter()
                .map(|(name, targets)| {
                    let state = MetricState {
                        values: targets.iter().map(|index| (t(*index), 0.0)).collect(),
                        ..MetricState::default()
                    };
                    ((*name).to_string(), state)
                })
                .collect(),
            metrics_to_target_relation: relation
                .iter()
                .map(|(index, name)| (t(*index), (*name).to_string()))
                .collect(),
            ..CheckData::default()
        }
    }

    fn names_of(metrics: &TargetMetricSet) -> Vec<&str> {
        metrics.iter().map(|(name, _)| name).collect()
    }

    fn assert_placeholder(metrics: &TargetMetricSet, name: &str, step: i64) {
        let series = metrics.get(name).expect("metric present");
        assert!(series.is_placeholder, "{name} should be a placeholder");
        assert_eq!(
            (series.start_time, series.stop_time, series.step_time),
            (FROM, TO, step)
        );
        assert_eq!(series.values.len(), 1);
        assert!(series.values[0].is_nan());
    }

    // -- TargetMetricSet --

    #[test]
    fn target_set_from_pattern_last_wins() {
        let pattern = PatternMetricSet::new(vec![
            RawSeries::new("metric.test.1", 0, 60, 60, vec![1.0]),
            RawSeries::new("metric.test.2", 0, 60, 60, vec![2.0]),
            RawSeries::new("metric.test.1", 0, 60, 60, vec![3.0]),
        ]);
        let metrics = TargetMetricSet::from(&pattern);
        assert_eq!(metrics.len(), 2);
        assert_eq!(metrics.get("metric.test.1").map(|s| s.values[0]), Some(3.0));
    }

    #[test]
    fn target_populate_without_missing_metrics() {
        let metrics = target_set(&["metric.test.1", "metric.test.2"]);
        let populated = metrics.populate(&name_set(&["metric.test.1", "metric.test.2"]), FROM, TO);
        assert_eq!(populated, metrics);
    }

    #[test]
    fn target_populate_preserves_existing_and_synthesizes_missing() {
        let a = RawSeries::new("A", 0, 120, 30, vec![1.0, 2.0, 3.0, 4.0]);
        let b = RawSeries::new("B", 0, 120, 30, vec![5.0, f64::NAN, 7.0, 8.0]);
        let metrics: TargetMetricSet = vec![a.clone(), b.clone()].into_iter().collect();

        let populated = metrics.populate(&name_set(&["A", "B", "C"]), FROM, TO);

        assert_eq!(names_of(&populated), vec!["A", "B", "C"]);
        assert_eq!(populated.get("A"), Some(&a));
        assert_eq!(populated.get("B"), Some(&b));
        assert_placeholder(&populated, "C", 30);
    }

    #[test]
    fn target_populate_drops_names_not_required() {
        let metrics = target_set(&["A", "B"]);
        let populated = metrics.populate(&name_set(&["A"]), FROM, TO);
        assert_eq!(names_of(&populated), vec!["A"]);
    }

    #[test]
    fn target_populate_falls_back_to_default_step() {
        let empty = TargetMetricSet::new().populate(&name_set(&["A"]), FROM, TO);
        assert_placeholder(&empty, "A", DEFAULT_STEP);

        let zero_step: TargetMetricSet = std::iter::once(RawSeries::new("A", 0, 0, 0, vec![]))
            .collect();
        let populated = zero_step.populate(&name_set(&["A", "B"]), FROM, TO);
        assert_placeholder(&populated, "B", DEFAULT_STEP);
    }

    #[test]
    fn step_hint_samples_smallest_name() {
        let metrics: TargetMetricSet = vec![
            RawSeries::new("b", 0, 60, 10, vec![]),
            RawSeries::new("a", 0, 60, 20, vec![]),
        ]
        .into_iter()
        .collect();
        assert_eq!(metrics.step_hint(), 20);
    }

    // -- TriggerMetricSet::populate --

    #[test]
    fn populate_without_missing_metrics() {
        let m = trigger_set(&[(1, &["metric.test.1", "metric.test.2"])]);
        let last = history(&[("metric.test.1", &[1]), ("metric.test.2", &[1])], &[]);
        assert_eq!(m.populate(&last, FROM, TO), m);
    }

    #[test]
    fn populate_restores_missing_alone_metric() {
        let m = trigger_set(&[(1, &["metric.test.1", "metric.test.2"])]);
        let last = history(
            &[("metric.test.1", &[1, 2]), ("metric.test.2", &[1, 2])],
            &[(2, "metric.test.3")],
        );

        let populated = m.populate(&last, FROM, TO);

        assert_eq!(populated.len(), 2);
        assert_eq!(populated.get(t(1)), m.get(t(1)));
        let t2 = populated.get(t(2)).expect("t2 restored");
        assert_eq!(names_of(t2), vec!["metric.test.3"]);
        assert_placeholder(t2, "metric.test.3", DEFAULT_STEP);
    }

    #[test]
    fn populate_restores_metrics_from_history() {
        let m = trigger_set(&[(1, &["metric.test.1"])]);
        let last = history(&[("metric.test.1", &[1]), ("metric.test.2", &[1])], &[]);

        let populated = m.populate(&last, FROM, TO);

        let t1 = populated.get(t(1)).expect("t1");
        assert_eq!(names_of(t1), vec!["metric.test.1", "metric.test.2"]);
        assert!(!t1.get("metric.test.1").expect("fetched").is_placeholder);
        assert_placeholder(t1, "metric.test.2", 60);
    }

    #[test]
    fn populate_keeps_alone_target_untouched_by_history() {
        let m = trigger_set(&[(1, &["metric.test.1"]), (2, &["metric.test.3"])]);
        let last = history(
            &[("metric.test.1", &[1, 2]), ("metric.test.2", &[1, 2])],
            &[(2, "metric.test.3")],
        );

        let populated = m.populate(&last, FROM, TO);

        let t1 = populated.get(t(1)).expect("t1");
        assert_eq!(names_of(t1), vec!["metric.test.1", "metric.test.2"]);
        assert_placeholder(t1, "metric.test.2", 60);
        assert_eq!(populated.get(t(2)), m.get(t(2)));
    }

    #[test]
    fn populate_fills_gaps_from_peer_targets() {
        let m = trigger_set(&[
            (1, &["metric.test.1", "metric.test.2", "metric.test.3"]),
            (2, &["metric.test.4"]),
            (3, &["metric.test.1", "metric.test.2"]),
        ]);
        let last = history(
            &[
                ("metric.test.1", &[1, 2, 3]),
                ("metric.test.2", &[1, 2, 3]),
                ("metric.test.3", &[1, 2, 3]),
                ("metric.test.4", &[1, 2, 3]),
            ],
            &[(2, "metric.test.4")],
        );

        let populated = m.populate(&last, FROM, TO);

        assert_eq!(populated.get(t(1)), m.get(t(1)));
        assert_eq!(populated.get(t(2)), m.get(t(2)));
        let t3 = populated.get(t(3)).expect("t3");
        assert_eq!(
            names_of(t3),
            vec!["metric.test.1", "metric.test.2", "metric.test.3"]
        );
        assert_placeholder(t3, "metric.test.3", 60);
    }

    #[test]
    fn populate_fills_gaps_without_history() {
        let m = trigger_set(&[(1, &["A", "B", "C"]), (3, &["A", "B"])]);
        let populated = m.populate(&CheckData::default(), FROM, TO);
        let t3 = populated.get(t(3)).expect("t3");
        assert_eq!(names_of(t3), vec!["A", "B", "C"]);
        assert_placeholder(t3, "C", 60);
    }

    #[test]
    fn populate_leaves_input_untouched() {
        let m = trigger_set(&[(1, &["A", "B"]), (2, &["A", "B", "C"])]);
        let before = m.clone();
        let _ = m.populate(&CheckData::default(), FROM, TO);
        assert_eq!(m, before);
    }

    // -- diff --

    #[test]
    fn diff_all_targets_share_metrics() {
        let m = trigger_set(&[
            (1, &["metric.test.1", "metric.test.2", "metric.test.3"]),
            (2, &["metric.test.1", "metric.test.2", "metric.test.3"]),
        ]);
        assert!(m.diff().is_empty());
    }

    #[test]
    fn diff_reports_missing_metric() {
        let m = trigger_set(&[
            (1, &["metric.test.1", "metric.test.2", "metric.test.3"]),
            (2, &["metric.test.1", "metric.test.2"]),
        ]);
        let diff = m.diff();
        assert_eq!(diff.len(), 1);
        assert_eq!(diff[&t(2)], name_set(&["metric.test.3"]));
    }

    #[test]
    fn diff_ignores_single_metric_targets() {
        let m = trigger_set(&[(1, &["A", "B", "C"]), (2, &["A"])]);
        assert!(m.diff().is_empty());

        let m = trigger_set(&[(1, &["A", "B"]), (2, &["Z"]), (3, &["A"])]);
        assert!(m.diff().is_empty(), "Z must not leak into the reference set");
    }

    #[test]
    fn diff_of_empty_set_is_empty() {
        assert!(TriggerMetricSet::new().diff().is_empty());
    }

    // -- filter_alone_metrics --

    #[test]
    fn filter_alone_metrics_without_alone_targets() {
        let m = trigger_set(&[(1, &["metric.test.1", "metric.test.2"])]);
        let (rest, alone) = m.filter_alone_metrics();
        assert_eq!(rest, m);
        assert!(alone.is_empty());
    }

    #[test]
    fn filter_alone_metrics_splits_single_metric_targets() {
        let m = trigger_set(&[
            (1, &["metric.test.1", "metric.test.2"]),
            (2, &["metric.test.3"]),
        ]);
        let (rest, alone) = m.filter_alone_metrics();
        assert_eq!(rest, trigger_set(&[(1, &["metric.test.1", "metric.test.2"])]));
        let expected: MetricGroup = std::iter::once((t(2), series("metric.test.3"))).collect();
        assert_eq!(alone, expected);
    }

    // -- convert_for_check --

    #[test]
    fn convert_empty_origin() {
        assert!(TriggerMetricSet::new().convert_for_check().is_empty());
    }

    #[test]
    fn convert_single_target_single_metric_is_empty() {
        let m = trigger_set(&[(1, &["metric.test.1"])]);
        assert!(m.convert_for_check().is_empty());
    }

    #[test]
    fn convert_single_metric_targets_only_is_empty() {
        let m = trigger_set(&[(1, &["A"]), (2, &["B"])]);
        assert!(m.convert_for_check().is_empty());
    }

    #[test]
    fn convert_single_multi_metric_target() {
        let m = trigger_set(&[(1, &["metric.test.1", "metric.test.2"])]);
        let converted = m.convert_for_check();
        assert_eq!(converted.len(), 2);
        for name in ["metric.test.1", "metric.test.2"] {
            let group = converted.get(name).expect("group");
            assert_eq!(group.len(), 1);
            assert_eq!(group.get(t(1)), Some(&series(name)));
        }
    }

    #[test]
    fn convert_broadcasts_single_metric_target() {
        let series1 = RawSeries::new("A", 0, 60, 60, vec![1.0]);
        let series2 = RawSeries::new("B", 0, 60, 60, vec![2.0]);
        let series3 = RawSeries::new("C", 0, 60, 60, vec![3.0]);
        let t1_metrics: TargetMetricSet = vec![series1.clone(), series2.clone()].into_iter().collect();
        let t2_metrics: TargetMetricSet = std::iter::once(series3.clone()).collect();
        let m: TriggerMetricSet = vec![(t(1), t1_metrics), (t(2), t2_metrics)].into_iter().collect();

        let converted = m.convert_for_check();

        let group_a: MetricGroup = vec![(t(1), series1), (t(2), series3.clone())].into_iter().collect();
        let group_b: MetricGroup = vec![(t(1), series2), (t(2), series3)].into_iter().collect();
        let expected: TriggerMetricsToCheck =
            vec![("A".to_string(), group_a), ("B".to_string(), group_b)].into_iter().collect();
        assert_eq!(converted, expected);
    }

    #[test]
    fn convert_omits_target_lacking_a_common_metric() {
        let m = trigger_set(&[(1, &["A", "B", "C"]), (2, &["A", "B"])]);
        let converted = m.convert_for_check();
        assert_eq!(converted.get("C").map(MetricGroup::len), Some(1));
        assert_eq!(converted.get("A").map(MetricGroup::len), Some(2));
    }

    // -- MetricGroup --

    #[test]
    fn metric_name_is_smallest_series_name() {
        assert_eq!(MetricGroup::new().metric_name(), None);

        let same: MetricGroup = vec![(t(1), series("metric.test.1")), (t(2), series("metric.test.1"))]
            .into_iter()
            .collect();
        assert_eq!(same.metric_name(), Some("metric.test.1"));

        let mixed: MetricGroup = vec![(t(1), series("metric.test.2")), (t(2), series("metric.test.1"))]
            .into_iter()
            .collect();
        assert_eq!(mixed.metric_name(), Some("metric.test.1"));
    }

    #[test]
    fn relations_map_targets_to_names() {
        assert!(MetricGroup::new().relations().is_empty());

        let group: MetricGroup = vec![(t(1), series("metric.test.1")), (t(2), series("metric.test.2"))]
            .into_iter()
            .collect();
        let relations = group.relations();
        assert_eq!(relations[&t(1)], "metric.test.1");
        assert_eq!(relations[&t(2)], "metric.test.2");
    }

    #[test]
    fn merge_prefers_other() {
        let empty = MetricGroup::new();
        let one: MetricGroup = std::iter::once((t(1), series("metric.test.1"))).collect();
        let other: MetricGroup = std::iter::once((t(1), series("metric.test.2"))).collect();

        assert!(empty.merge(&empty).is_empty());
        assert_eq!(empty.merge(&one), one);
        assert_eq!(one.merge(&empty), one);
        assert_eq!(one.merge(&other), other);
    }
}
