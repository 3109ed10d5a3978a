use ferrous_watchlist_domain::{CliOverrides, Config};
use tracing::info;

pub fn load_config(
    config_path: Option<&str>,
    cli_overrides: CliOverrides,
) -> anyhow::Result<Config> {
    let config = Config::load(config_path, cli_overrides)?;
    config.validate()?;
    Ok(config)
}

/// Called once the subscriber is installed.
pub fn log_config(config_path: Option<&str>, config: &Config) {
    info!(
        config_file = config_path.unwrap_or("default"),
        database = %config.database.path,
        cache_entries = config.cache.max_entries,
        cache_bytes = config.cache.max_cost_bytes,
        page_size = config.pagination.page_size,
        "Configuration loaded"
    );
}
