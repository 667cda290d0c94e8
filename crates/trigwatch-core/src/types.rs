use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// ─── Target Identity ──────────────────────────────────────────────

/// Prefix used by the persisted form of a target identifier (`"t1"`, `"t2"`, …).
const TARGET_PREFIX: char = 't';

/// 1-based position of a target inside a trigger's configured target list.
///
/// Persisted and displayed as `"t{index}"`, ordered numerically so that
/// `t2 < t10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(u32);

impl TargetId {
    /// Build an id from a 1-based index. Returns `None` for zero.
    #[must_use]
    pub fn new(index: u32) -> Option<Self> {
        (index > 0).then_some(Self(index))
    }

    /// Build an id from a 0-based position in the configured target list.
    /// Returns `None` when the position has no `u32` index.
    #[must_use]
    pub fn from_position(position: usize) -> Option<Self> {
        u32::try_from(position)
            .ok()
            .and_then(|index| index.checked_add(1))
            .map(Self)
    }

    #[must_use]
    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{TARGET_PREFIX}{}", self.0)
    }
}

impl FromStr for TargetId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix(TARGET_PREFIX)
            .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|digits| digits.parse::<u32>().ok())
            .and_then(Self::new)
            .ok_or_else(|| CoreError::InvalidTargetId(s.to_string()))
    }
}

impl Serialize for TargetId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TargetId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// ─── Trigger ──────────────────────────────────────────────────────

/// Characters that turn a metric expression into a wildcard expression:
/// glob wildcards, character classes and `{a,b}` alternation.
pub const WILDCARD_CHARS: &[char] = &['*', '?', '[', '{'];

/// True when `expression` can resolve to more than one metric name.
pub fn is_wildcard(expression: &str) -> bool {
    expression.contains(WILDCARD_CHARS)
}

/// A configured trigger: an ordered list of target expressions plus the
/// metric patterns those expressions reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trigger {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub targets: Vec<String>,
    #[serde(default)]
    pub patterns: Vec<String>,
}

impl Trigger {
    /// A simple trigger has exactly one target and no wildcard patterns, so
    /// it can only ever resolve to a single concrete series.
    #[must_use]
    pub fn is_simple(&self) -> bool {
        if self.targets.len() != 1 {
            return false;
        }
        !self
            .patterns
            .iter()
            .any(|pattern| is_wildcard(pattern))
    }

    /// Configured targets paired with their ids, in configured order. Stops
    /// at the first position without an id.
    pub fn target_ids(&self) -> impl Iterator<Item = (TargetId, &str)> {
        self.targets
            .iter()
            .enumerate()
            .map_while(|(position, target)| {
                TargetId::from_position(position).map(|id| (id, target.as_str()))
            })
    }
}

// ─── Check State ──────────────────────────────────────────────────

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TriggerState {
    #[default]
    Ok,
    Warn,
    Error,
    Nodata,
    Exception,
}

impl TriggerState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
            Self::Nodata => "NODATA",
            Self::Exception => "EXCEPTION",
        }
    }
}

impl fmt::Display for TriggerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Last known state of one metric, with the per-target values it was
/// evaluated against.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricState {
    #[serde(default)]
    pub state: TriggerState,
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default)]
    pub values: BTreeMap<TargetId, f64>,
}

/// Trigger evaluation state persisted by the previous check cycle.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckData {
    #[serde(default)]
    pub metrics: BTreeMap<String, MetricState>,
    /// Targets that resolved to exactly one metric, with that metric's name.
    #[serde(default)]
    pub metrics_to_target_relation: BTreeMap<TargetId, String>,
    #[serde(default)]
    pub state: TriggerState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub timestamp: i64,
}

// ─── Error ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error("invalid target id: {0:?}")]
    InvalidTargetId(String),
}

// ─── Tests ────────────────────────────────────────────────────────
