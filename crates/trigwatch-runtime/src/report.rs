//! Outcome of one check cycle, as printed by `check` and stored by `watch`.

use serde::Serialize;
use trigwatch_checker::{PreparedMetrics, TriggerChecker, carry_forward};
use trigwatch_core::CheckData;

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Prepared { metrics: PreparedMetrics },
    Failed { error: String },
}

#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub trigger_id: String,
    pub from: i64,
    pub until: i64,
    pub outcome: Outcome,
    /// History for the next cycle.
    pub check_data: CheckData,
}

/// Runs one cycle. Failures become NODATA check data stamped with `now`.
pub fn run_check(checker: &TriggerChecker, now: i64) -> CheckReport {
    let (outcome, check_data) = match checker.check() {
        Ok(metrics) => {
            let check_data = carry_forward(checker.last_check(), &metrics, checker.until());
            (Outcome::Prepared { metrics }, check_data)
        }
        Err(e) => {
            let check_data = checker.handle_fetch_error(&e, now);
            (Outcome::Failed { error: e.to_string() }, check_data)
        }
    };

    CheckReport {
        trigger_id: checker.trigger().id.clone(),
        from: checker.from(),
        until: checker.until(),
        outcome,
        check_data,
    }
}
