//! `trigwatch check`: one cycle for one trigger.

use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use trigwatch_checker::{CheckerConfig, InMemoryStore, InlinePruner, TriggerChecker};
use trigwatch_core::{CheckData, Trigger};
use trigwatch_source::FixtureSource;

use crate::cli::CheckOpts;
use crate::input::{read_json, record_fixture_samples};
use crate::report::{CheckReport, run_check};

pub fn cmd_check(opts: &CheckOpts, config: CheckerConfig) -> anyhow::Result<CheckReport> {
    let trigger: Trigger = read_json(&opts.trigger)?;
    let source = FixtureSource::from_path(&opts.fixtures)
        .with_context(|| format!("failed to load {}", opts.fixtures.display()))?;
    let last_check: CheckData = match &opts.last_check {
        Some(path) => read_json(path)?,
        None => CheckData::default(),
    };

    let now = Utc::now().timestamp();
    let until = opts.until.unwrap_or(now);
    tracing::debug!(
        "checking {} against {} series",
        trigger.id,
        source.len()
    );

    let store = Arc::new(InMemoryStore::new());
    record_fixture_samples(&store, &source);

    let checker = TriggerChecker::new(
        trigger,
        until,
        Arc::new(source),
        Arc::new(InlinePruner::new(store)),
    )
    .with_config(config)
    .with_last_check(last_check);

    Ok(run_check(&checker, now))
}
