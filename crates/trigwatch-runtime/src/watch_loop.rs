//! Watch loop: checks every trigger once per tick until shutdown.
//! Each trigger's history lives in the in-memory store between ticks.

use std::sync::Arc;

use chrono::Utc;
use tokio::task::JoinSet;
use tokio::time::{Duration, interval};

use trigwatch_checker::{
    CheckerConfig, InMemoryStore, MetricsPruner, MetricsStore, TriggerChecker,
};
use trigwatch_core::Trigger;
use trigwatch_source::{FixtureSource, MetricSource};

use crate::cli::WatchOpts;
use crate::input::{read_json, record_fixture_samples};
use crate::pruner::ChannelPruner;
use crate::report::{CheckReport, Outcome, run_check};

/// What a tick runs against.
#[derive(Clone)]
struct WatchContext {
    triggers: Arc<Vec<Trigger>>,
    source: Arc<dyn MetricSource>,
    pruner: Arc<dyn MetricsPruner>,
    store: Arc<InMemoryStore>,
    config: CheckerConfig,
}

#[derive(Debug, Default, PartialEq, Eq)]
struct TickSummary {
    prepared: usize,
    failed: usize,
    errors: usize,
}

/// Run the watch loop, waiting for ctrl-c or SIGTERM.
pub async fn run_watch(opts: WatchOpts, config: CheckerConfig) -> anyhow::Result<()> {
    let triggers: Vec<Trigger> = read_json(&opts.triggers)?;
    let source = FixtureSource::from_path(&opts.fixtures)?;
    tracing::info!(
        "watching {} triggers over {} series every {}s",
        triggers.len(),
        source.len(),
        opts.interval_secs
    );

    let store = Arc::new(InMemoryStore::new());
    record_fixture_samples(&store, &source);
    let (pruner, pruner_handle) = ChannelPruner::spawn(Arc::clone(&store));
    let ctx = WatchContext {
        triggers: Arc::new(triggers),
        source: Arc::new(source),
        pruner: Arc::new(pruner),
        store,
        config,
    };

    let interval_secs = opts.interval_secs.max(1);
    let mut watch_handle = tokio::spawn(async move {
        run_watch_loop(ctx, interval_secs).await;
    });

    let shutdown = async {
        let ctrl_c = tokio::signal::ctrl_c();

        #[cfg(unix)]
        {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut sigterm) => tokio::select! {
                    _ = ctrl_c => tracing::info!("received ctrl-c, shutting down"),
                    _ = sigterm.recv() => tracing::info!("received SIGTERM, shutting down"),
                },
                Err(e) => {
                    tracing::warn!("failed to register SIGTERM handler: {e}");
                    ctrl_c.await.ok();
                    tracing::info!("received ctrl-c, shutting down");
                }
            }
        }

        #[cfg(not(unix))]
        {
            ctrl_c.await.ok();
            tracing::info!("received ctrl-c, shutting down");
        }
    };

    tokio::select! {
        () = shutdown => {}
        _ = &mut watch_handle => {
            tracing::warn!("watch loop exited unexpectedly");
        }
    }

    // The loop owns the last pruner handle; the pruning task drains and exits.
    watch_handle.abort();
    if tokio::time::timeout(Duration::from_secs(5), pruner_handle)
        .await
        .is_err()
    {
        tracing::warn!("pruner did not stop in time");
    }
    tracing::info!("watch stopped");
    Ok(())
}

async fn run_watch_loop(ctx: WatchContext, interval_secs: u64) {
    let mut ticker = interval(Duration::from_secs(interval_secs));

    loop {
        ticker.tick().await;

        let summary = watch_tick(&ctx, Utc::now().timestamp()).await;
        tracing::info!(
            "watch tick: {} prepared, {} failed, {} errors",
            summary.prepared,
            summary.failed,
            summary.errors
        );
    }
}

/// Checks every trigger concurrently against the same `until`.
async fn watch_tick(ctx: &WatchContext, until: i64) -> TickSummary {
    let mut tasks = JoinSet::new();
    for trigger in ctx.triggers.iter().cloned() {
        let ctx = ctx.clone();
        tasks.spawn_blocking(move || check_trigger(&ctx, trigger, until));
    }

    let mut summary = TickSummary::default();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(Ok(report)) => match &report.outcome {
                Outcome::Prepared { metrics } => {
                    summary.prepared += 1;
                    tracing::debug!(
                        "trigger {}: {} metric groups",
                        report.trigger_id,
                        metrics.to_check.len()
                    );
                }
                Outcome::Failed { error } => {
                    summary.failed += 1;
                    tracing::warn!(
                        "trigger {} is {}: {error}",
                        report.trigger_id,
                        report.check_data.state
                    );
                }
            },
            Ok(Err(e)) => {
                summary.errors += 1;
                tracing::warn!("check failed: {e:#}");
            }
            Err(e) => {
                summary.errors += 1;
                tracing::warn!("check task failed: {e}");
            }
        }
    }
    summary
}

fn check_trigger(ctx: &WatchContext, trigger: Trigger, until: i64) -> anyhow::Result<CheckReport> {
    let last_check = ctx
        .store
        .get_trigger_last_check(&trigger.id)?
        .unwrap_or_default();

    let checker = TriggerChecker::new(
        trigger,
        until,
        Arc::clone(&ctx.source),
        Arc::clone(&ctx.pruner),
    )
    .with_config(ctx.config)
    .with_last_check(last_check);

    let report = run_check(&checker, until);
    ctx.store
        .set_trigger_last_check(&report.trigger_id, &report.check_data)?;
    Ok(report)
}
