//! Background pruning: the check path only enqueues requests.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use trigwatch_checker::{MetricsPruner, MetricsStore, PruneRequest};

pub struct ChannelPruner {
    tx: mpsc::UnboundedSender<PruneRequest>,
}

impl ChannelPruner {
    /// Starts the pruning task. It runs until every `ChannelPruner` clone
    /// is dropped.
    pub fn spawn<S: MetricsStore + 'static>(store: S) -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::unbounded_channel::<PruneRequest>();
        let handle = tokio::spawn(async move {
            while let Some(request) = rx.recv().await {
                request.apply(&store);
            }
            tracing::debug!("pruner stopped");
        });
        (Self { tx }, handle)
    }
}

impl MetricsPruner for ChannelPruner {
    fn schedule(&self, request: PruneRequest) {
        if let Err(e) = self.tx.send(request) {
            tracing::warn!(
                "pruner stopped, dropping request for {} metrics",
                e.0.metrics.len()
            );
        }
    }
}
