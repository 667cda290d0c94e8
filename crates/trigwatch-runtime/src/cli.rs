//! CLI definition using clap derive.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use trigwatch_checker::{CheckerConfig, DEFAULT_FETCH_WINDOW_SECS, DEFAULT_METRICS_TTL_SECS};

#[derive(Parser)]
#[command(name = "trigwatch", about = "trigger metric fetch and alignment")]
pub struct Cli {
    /// Samples older than this many seconds are pruned after each fetch
    #[arg(
        long,
        global = true,
        env = "TRIGWATCH_METRICS_TTL_SECS",
        default_value_t = DEFAULT_METRICS_TTL_SECS
    )]
    pub metrics_ttl_secs: i64,

    /// Seconds of history fetched per check
    #[arg(
        long,
        global = true,
        env = "TRIGWATCH_FETCH_WINDOW_SECS",
        default_value_t = DEFAULT_FETCH_WINDOW_SECS
    )]
    pub fetch_window_secs: i64,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn checker_config(&self) -> CheckerConfig {
        CheckerConfig {
            metrics_ttl_secs: self.metrics_ttl_secs,
            fetch_window_secs: self.fetch_window_secs,
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Run one check cycle and print the report (JSON)
    Check(CheckOpts),
    /// Check every trigger on an interval until interrupted
    Watch(WatchOpts),
}

#[derive(clap::Args)]
pub struct CheckOpts {
    /// Trigger definition (JSON)
    #[arg(long)]
    pub trigger: PathBuf,

    /// Series fixtures (Graphite render JSON)
    #[arg(long)]
    pub fixtures: PathBuf,

    /// Check data from the previous cycle (JSON)
    #[arg(long)]
    pub last_check: Option<PathBuf>,

    /// End of the fetch window, unix seconds (default: now)
    #[arg(long)]
    pub until: Option<i64>,
}

#[derive(clap::Args)]
pub struct WatchOpts {
    /// Trigger definitions (JSON array)
    #[arg(long)]
    pub triggers: PathBuf,

    /// Series fixtures (Graphite render JSON)
    #[arg(long)]
    pub fixtures: PathBuf,

    /// Seconds between check cycles
    #[arg(long, default_value = "60")]
    pub interval_secs: u64,
}
