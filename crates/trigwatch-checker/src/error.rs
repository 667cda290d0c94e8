//! Errors surfaced by a check cycle.

use thiserror::Error;
use trigwatch_core::TargetId;
use trigwatch_source::SourceError;

#[derive(Debug, Error)]
pub enum CheckError {
    #[error("failed to fetch target {target}: {source}")]
    Fetch {
        target: TargetId,
        #[source]
        source: SourceError,
    },

    #[error("target {0} has no metrics")]
    TargetHasNoMetrics(TargetId),

    #[error("trigger never received metrics")]
    TriggerHasOnlyWildcards,
}
