//! Logger setup
//!
//! The core logs through the `log` facade. Hosts that do not install their
//! own logger can call [`init_logger`] once at startup.

use log::LevelFilter;

use crate::config::RegistryConfig;
use crate::error::{to_config_error, Result};

/// Install `env_logger` at `level`
///
/// `RUST_LOG`, when set, overrides `level`. Calling this again after a
/// logger is installed is a no-op.
pub fn init_logger(level: &str) -> Result<()> {
    let filter: LevelFilter = level.parse().map_err(to_config_error)?;
    install(filter);
    Ok(())
}

/// Install `env_logger` at the level configured in `config`
///
/// Debug mode raises the level to at least `debug`.
pub fn init_from_config(config: &RegistryConfig) -> Result<()> {
    install(config.log_filter()?);
    Ok(())
}

fn install(filter: LevelFilter) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(filter);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    if builder.try_init().is_err() {
        log::debug!("logger already initialized");
    }
}
