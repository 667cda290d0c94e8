//! Series as fetched, before any reconciliation.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::series::RawSeries;
use crate::types::TargetId;

/// Series returned for one target expression, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PatternMetricSet(Vec<RawSeries>);

impl PatternMetricSet {
    pub fn new(series: Vec<RawSeries>) -> Self {
        Self(series)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RawSeries> {
        self.0.iter()
    }

    /// Copy of the set without placeholder series.
    #[must_use]
    pub fn clean_wildcards(&self) -> Self {
        Self(
            self.0
                .iter()
                .filter(|series| !series.is_placeholder)
                .cloned()
                .collect(),
        )
    }

    /// Keeps the first series of every name. Every later series with an
    /// already seen name is reported, in encounter order.
    #[must_use]
    pub fn deduplicate(&self) -> (Self, Vec<String>) {
        let mut seen: HashSet<&str> = HashSet::with_capacity(self.0.len());
        let mut kept = Vec::with_capacity(self.0.len());
        let mut duplicates = Vec::new();

        for series in &self.0 {
            if seen.insert(series.name.as_str()) {
                kept.push(series.clone());
            } else {
                duplicates.push(series.name.clone());
            }
        }
        (Self(kept), duplicates)
    }

    /// True when no real series exists. An empty set has only wildcards.
    pub fn has_only_wildcards(&self) -> bool {
        self.0.iter().all(|series| series.is_placeholder)
    }
}

impl From<Vec<RawSeries>> for PatternMetricSet {
    fn from(series: Vec<RawSeries>) -> Self {
        Self(series)
    }
}

impl FromIterator<RawSeries> for PatternMetricSet {
    fn from_iter<I: IntoIterator<Item = RawSeries>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a PatternMetricSet {
    type Item = &'a RawSeries;
    type IntoIter = std::slice::Iter<'a, RawSeries>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Everything fetched for a trigger in one cycle, keyed by target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FetchedMetrics(BTreeMap<TargetId, PatternMetricSet>);

impl FetchedMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_metrics(&mut self, target: TargetId, metrics: PatternMetricSet) {
        self.0.insert(target, metrics);
    }

    pub fn get(&self, target: TargetId) -> Option<&PatternMetricSet> {
        self.0.get(&target)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TargetId, &PatternMetricSet)> {
        self.0.iter().map(|(target, metrics)| (*target, metrics))
    }

    /// True when every target fetched only placeholders (or nothing at all).
    pub fn has_only_wildcards(&self) -> bool {
        self.0.values().all(PatternMetricSet::has_only_wildcards)
    }
}
