//! trigwatch-source: metric source IO boundary.
//! Defines the `MetricSource` trait the checker fetches through, and a
//! file-backed implementation for local runs and tests.

pub mod error;
pub mod fixture;
pub mod source;

pub use error::SourceError;
pub use fixture::{FixtureSeries, FixtureSource};
pub use source::{FetchResult, MetricSource};
