//! File-backed metric source.
//!
//! Reads series in the Graphite render JSON shape
//! (`[{"target": "...", "step": 60, "datapoints": [[value, ts], ...]}]`) and
//! serves them as if they were a live store: target expressions are glob
//! patterns over dot-separated metric names, and samples are laid onto the
//! requested time grid.

use std::collections::BTreeMap;
use std::path::Path;

use glob::{MatchOptions, Pattern};
use serde::{Deserialize, Serialize};
use tracing::debug;
use trigwatch_core::{DEFAULT_STEP, PatternMetricSet, RawSeries, is_wildcard};

use crate::error::SourceError;
use crate::source::{FetchResult, MetricSource};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

fn default_step() -> i64 {
    DEFAULT_STEP
}

/// One stored series: `datapoints` are `[value, timestamp]` pairs, `null`
/// values are gaps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureSeries {
    pub target: String,
    #[serde(default = "default_step")]
    pub step: i64,
    #[serde(default)]
    pub datapoints: Vec<(Option<f64>, i64)>,
}

impl FixtureSeries {
    /// Non-null samples as `(timestamp, value)` pairs.
    pub fn samples(&self) -> Vec<(i64, f64)> {
        self.datapoints
            .iter()
            .filter_map(|(value, ts)| value.map(|v| (*ts, v)))
            .collect()
    }

    /// Lays samples onto the step grid covering `[from, until)`. With
    /// `include_open_bucket` the bucket containing `until` is included too.
    fn to_series(&self, from: i64, until: i64, include_open_bucket: bool) -> RawSeries {
        let step = if self.step > 0 { self.step } else { DEFAULT_STEP };
        let start = from - from.rem_euclid(step);
        let mut stop = until - until.rem_euclid(step);
        if include_open_bucket {
            stop += step;
        }
        let stop = stop.max(start);

        let buckets: BTreeMap<i64, f64> = self
            .datapoints
            .iter()
            .map(|(value, ts)| (ts - ts.rem_euclid(step), value.unwrap_or(f64::NAN)))
            .collect();

        let values = (start..stop)
            .step_by(step.unsigned_abs() as usize)
            .map(|slot| buckets.get(&slot).copied().unwrap_or(f64::NAN))
            .collect();

        RawSeries::new(self.target.clone(), start, stop, step, values)
    }
}

/// Metric source over an in-memory list of series, usually loaded from a file.
#[derive(Debug, Clone, Default)]
pub struct FixtureSource {
    series: Vec<FixtureSeries>,
}

impl FixtureSource {
    pub fn new(series: Vec<FixtureSeries>) -> Self {
        Self { series }
    }

    pub fn from_json(raw: &str) -> Result<Self, SourceError> {
        Ok(Self::new(serde_json::from_str(raw)?))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn series(&self) -> &[FixtureSeries] {
        &self.series
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// Graphite wildcards never cross a `.`; glob wildcards never cross a `/`.
fn as_path(name: &str) -> String {
    name.replace('.', "/")
}

/// Expands Graphite `{a,b}` alternation, which glob patterns lack.
/// Alternatives may nest. An unbalanced `{` is left as is.
fn expand_braces(expression: &str) -> Vec<String> {
    let Some(open) = expression.find('{') else {
        return vec![expression.to_string()];
    };

    let mut depth = 0usize;
    let mut close = None;
    let mut splits = Vec::new();
    for (offset, c) in expression[open..].char_indices() {
        let at = open + offset;
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    close = Some(at);
                    break;
                }
            }
            ',' if depth == 1 => splits.push(at),
            _ => {}
        }
    }
    let Some(close) = close else {
        return vec![expression.to_string()];
    };

    let head = &expression[..open];
    let tail = &expression[close + 1..];
    let mut bounds = Vec::with_capacity(splits.len() + 2);
    bounds.push(open);
    bounds.extend(splits);
    bounds.push(close);

    bounds
        .windows(2)
        .flat_map(|pair| {
            let alternative = &expression[pair[0] + 1..pair[1]];
            expand_braces(&format!("{head}{alternative}{tail}"))
        })
        .collect()
}

fn compile(target: &str) -> Result<Vec<Pattern>, SourceError> {
    expand_braces(target)
        .iter()
        .map(|expanded| {
            Pattern::new(&as_path(expanded)).map_err(|e| SourceError::InvalidTarget {
                target: target.to_string(),
                detail: e.to_string(),
            })
        })
        .collect()
}

impl MetricSource for FixtureSource {
    fn fetch(
        &self,
        target: &str,
        from: i64,
        until: i64,
        is_simple_trigger: bool,
    ) -> Result<FetchResult, SourceError> {
        let patterns = compile(target)?;

        let matched: Vec<&FixtureSeries> = self
            .series
            .iter()
            .filter(|series| {
                let path = as_path(&series.target);
                patterns
                    .iter()
                    .any(|pattern| pattern.matches_with(&path, MATCH_OPTIONS))
            })
            .collect();

        debug!("fixture fetch {target}: {} series matched", matched.len());

        if matched.is_empty() {
            // A wildcard that matched nothing still answers with a
            // placeholder; a literal name that matched nothing answers with
            // nothing at all.
            let metrics = if is_wildcard(target) {
                PatternMetricSet::new(vec![RawSeries::placeholder(
                    target,
                    DEFAULT_STEP,
                    from,
                    until,
                )])
            } else {
                PatternMetricSet::default()
            };
            return Ok(FetchResult::new(metrics, Vec::new()));
        }

        let metrics = matched
            .iter()
            .map(|series| series.to_series(from, until, is_simple_trigger))
            .collect();
        let names = matched.iter().map(|series| series.target.clone()).collect();
        Ok(FetchResult::new(metrics, names))
    }
}
