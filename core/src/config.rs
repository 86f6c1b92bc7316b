//! Configuration for the registry core
//!
//! Host-side settings that are not part of replicated state: the
//! governance identity allowed to manage TLDs and parameters, query limits
//! and logging. On-chain parameters live in [`Params`](crate::models::Params).

use serde::{Deserialize, Serialize};

use crate::error::{RegistryError, Result};
use crate::models::AccountId;
use crate::pagination::DEFAULT_MAX_PAGE_SIZE;

/// Module name whose account is the default governance authority
pub const DEFAULT_AUTHORITY_MODULE: &str = "gov";

/// Registry configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Identity allowed to create and update TLDs and parameters
    pub authority: AccountId,

    /// Largest page returned by listing queries
    pub max_page_size: u64,

    /// Log level
    pub log_level: String,

    /// Debug mode; logs at no less than `debug` whatever `log_level` says
    pub debug_mode: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        RegistryConfig {
            authority: AccountId::module(DEFAULT_AUTHORITY_MODULE),
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
            log_level: "info".to_string(),
            debug_mode: false,
        }
    }
}

impl RegistryConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Default configuration governed by `authority`
    pub fn with_authority(authority: AccountId) -> Self {
        RegistryConfig {
            authority,
            ..Self::default()
        }
    }

    /// Check the settings
    pub fn validate(&self) -> Result<()> {
        if self.max_page_size == 0 {
            return Err(RegistryError::ConfigError(
                "max_page_size must be greater than 0".to_string(),
            ));
        }
        self.log_filter()?;
        Ok(())
    }

    /// Effective log level: `log_level`, raised to `debug` in debug mode
    pub fn log_filter(&self) -> Result<log::LevelFilter> {
        let filter: log::LevelFilter = self.log_level.parse().map_err(|_| {
            RegistryError::ConfigError(format!("unknown log level {:?}", self.log_level))
        })?;
        if self.debug_mode {
            return Ok(filter.max(log::LevelFilter::Debug));
        }
        Ok(filter)
    }

    /// Load configuration from a JSON file
    pub fn from_file(path: &str) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let config: RegistryConfig = serde_json::from_reader(file)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn to_file(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Create a development configuration
    pub fn development() -> Self {
        let mut config = Self::default();
        config.debug_mode = true;
        config.log_level = "debug".to_string();
        config
    }

    /// Create a production configuration
    pub fn production() -> Self {
        let mut config = Self::default();
        config.debug_mode = false;
        config.log_level = "info".to_string();
        config
    }

    /// Create a testing configuration
    pub fn testing() -> Self {
        let mut config = Self::default();
        config.debug_mode = true;
        config.log_level = "debug".to_string();
        config.max_page_size = 5;
        config
    }
}
