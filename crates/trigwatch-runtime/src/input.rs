//! JSON input files.

use std::path::Path;

use anyhow::Context;
use serde::de::DeserializeOwned;
use trigwatch_checker::InMemoryStore;
use trigwatch_source::FixtureSource;

pub fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

/// Records every fixture sample in the store, so pruning has the same
/// samples to work on as the source serves.
pub fn record_fixture_samples(store: &InMemoryStore, source: &FixtureSource) {
    for series in source.series() {
        store.save_metric_values(&series.target, &series.samples());
    }
    tracing::debug!("recorded samples of {} fixture series", source.len());
}
