//! # Ferrous Watchlist
//!
//! Command-line front end over the cached aggregation layer.

mod bootstrap;
mod commands;
mod di;

use bootstrap::{init_database, init_logging, load_config, log_config};
use clap::Parser;
use commands::Command;
use di::{Services, UseCases};
use ferrous_watchlist_domain::CliOverrides;
use ferrous_watchlist_jobs::{CacheSweepJob, JobRunner};
use tokio_util::sync::CancellationToken;
use tracing::info;

#[derive(Parser)]
#[command(name = "ferrous-watchlist")]
#[command(version)]
#[command(about = "Watchlist aggregates with a TTL response cache")]
struct Cli {
    /// Path to configuration file
    #[arg(short = 'c', long)]
    config: Option<String>,

    /// SQLite database path
    #[arg(long)]
    database: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let overrides = CliOverrides {
        database_path: cli.database.clone(),
        log_level: cli.log_level.clone(),
    };

    let config = load_config(cli.config.as_deref(), overrides)?;
    init_logging(&config.logging);
    log_config(cli.config.as_deref(), &config);

    let pool = init_database(&config.database).await?;
    let services = Services::new(pool.clone(), &config);
    let use_cases = UseCases::new(pool.clone(), &services);

    let shutdown = CancellationToken::new();
    JobRunner::new()
        .with_cache_sweep(
            CacheSweepJob::new(services.cache.clone())
                .with_interval(config.cache.sweep_interval_secs)
                .with_cancellation(shutdown.clone()),
        )
        .start()
        .await;

    let result = commands::run(
        cli.command,
        &services,
        &use_cases,
        config.pagination.page_size,
    )
    .await;

    let stats = services.aggregates.stats();
    info!(
        entries = stats.entries,
        hits = stats.hits,
        misses = stats.misses,
        evictions = stats.evictions,
        hit_rate = stats.hit_rate,
        "Cache statistics"
    );

    shutdown.cancel();
    pool.close().await;

    result
}
