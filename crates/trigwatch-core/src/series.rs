//! Raw time series as returned by a metric source.

use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;

/// Step used for synthesized series when no sibling step is available (seconds).
pub const DEFAULT_STEP: i64 = 60;

/// One named time series on a fixed `[start_time, stop_time)` grid.
///
/// Values are shared, so cloning a series (as the reshaping stages do)
/// never copies samples. Gaps are `NaN`; in JSON they are `null`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSeries {
    pub name: String,
    pub start_time: i64,
    pub stop_time: i64,
    pub step_time: i64,
    #[serde(deserialize_with = "values_from_nullable")]
    pub values: Arc<[f64]>,
    /// Synthetic no-data series standing in for an expected metric.
    #[serde(default)]
    pub is_placeholder: bool,
}

impl RawSeries {
    pub fn new(
        name: impl Into<String>,
        start_time: i64,
        stop_time: i64,
        step_time: i64,
        values: Vec<f64>,
    ) -> Self {
        Self {
            name: name.into(),
            start_time,
            stop_time,
            step_time,
            values: values.into(),
            is_placeholder: false,
        }
    }

    /// A placeholder carries a single `NaN` sample covering `[from, to]`.
    pub fn placeholder(name: impl Into<String>, step_time: i64, from: i64, to: i64) -> Self {
        Self {
            name: name.into(),
            start_time: from,
            stop_time: to,
            step_time,
            values: Arc::from([f64::NAN]),
            is_placeholder: true,
        }
    }

    /// Last non-`NaN` sample, if any.
    #[must_use]
    pub fn last_value(&self) -> Option<f64> {
        self.values.iter().rev().copied().find(|v| !v.is_nan())
    }
}

/// Series compare bitwise on their samples so that `NaN` gaps are equal to
/// themselves.
impl PartialEq for RawSeries {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.start_time == other.start_time
            && self.stop_time == other.stop_time
            && self.step_time == other.step_time
            && self.is_placeholder == other.is_placeholder
            && self.values.len() == other.values.len()
            && self
                .values
                .iter()
                .zip(other.values.iter())
                .all(|(a, b)| a.to_bits() == b.to_bits())
    }
}

impl Eq for RawSeries {}

fn values_from_nullable<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Arc<[f64]>, D::Error> {
    let raw: Vec<Option<f64>> = Vec::deserialize(deserializer)?;
    Ok(raw.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
}
