//! trigwatch: trigger metric fetch and alignment runner.
//! `check` runs one cycle for one trigger and prints the result; `watch`
//! keeps checking a set of triggers until interrupted.

use clap::Parser;

mod cli;
mod cmd_check;
mod input;
mod pruner;
mod report;
mod watch_loop;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    let filter = std::env::var("TRIGWATCH_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "info".to_string());
    // stdout carries reports
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    let config = args.checker_config();

    match args.command {
        cli::Command::Check(opts) => {
            let report = cmd_check::cmd_check(&opts, config)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        cli::Command::Watch(opts) => {
            tracing::info!("trigwatch watch starting");
            watch_loop::run_watch(opts, config).await?;
        }
    }

    Ok(())
}
