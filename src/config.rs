//! Configuration management for the alert console

use crate::dashboard::rollup::FlagRule;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Default location of the optional config file
pub const DEFAULT_CONFIG_PATH: &str = "config/console.toml";

/// Prefix of environment overrides, e.g. `ALERT_CONSOLE__API__BASE_URL`
pub const ENV_PREFIX: &str = "ALERT_CONSOLE";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub list: ListConfig,
    pub dashboard: DashboardConfig,
    pub degraded: DegradedConfig,
    pub logging: LoggingConfig,
}

/// Alert API connection settings
#[derive(Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to
    pub base_url: String,
    /// Sent as the `subscription-key` query parameter
    pub api_key: String,
    /// Overall request timeout; unset means the transport default
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let api_key = if self.api_key.is_empty() {
            "<empty>"
        } else {
            "<redacted>"
        };
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &api_key)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

/// Alert list settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListConfig {
    /// Rows per page when the list is first opened
    pub page_size: u32,
}

/// Dashboard settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Number of recent open alerts shown
    pub recent_limit: u32,
    /// Page size of the alert sample the customer rollup is built from
    pub rollup_sample: u32,
    /// Customers kept in the rollup
    pub max_customers: usize,
    /// How a customer's flagged state is derived from its alerts
    #[serde(default)]
    pub flag_rule: FlagRule,
}

/// Read-failure behavior
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DegradedConfig {
    /// Substitute placeholder data when a read fails
    #[serde(default)]
    pub placeholders: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

impl AppConfig {
    /// Load configuration from the default file and the environment
    pub fn load() -> Result<Self> {
        Self::load_from_path(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration layered as defaults, then `path` (if present), then environment
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load_layered(path.as_ref(), env_overrides())
    }

    fn load_layered(path: &Path, env: Environment) -> Result<Self> {
        let defaults =
            Config::try_from(&AppConfig::default()).context("Failed to encode default configuration")?;

        let config = Config::builder()
            .add_source(defaults)
            .add_source(File::from(path).required(false))
            .add_source(env)
            .build()
            .context("Failed to build configuration")?;

        let config: AppConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the state machines cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            anyhow::bail!("api.base_url must not be empty");
        }
        if self.list.page_size == 0 {
            anyhow::bail!("list.page_size must be at least 1");
        }
        if self.dashboard.recent_limit == 0 || self.dashboard.rollup_sample == 0 {
            anyhow::bail!("dashboard limits must be at least 1");
        }
        Ok(())
    }
}

/// `ALERT_CONSOLE__LIST__PAGE_SIZE` sets `list.page_size`
fn env_overrides() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: "http://localhost:8080/v1".to_string(),
                api_key: String::new(),
                timeout_ms: None,
            },
            list: ListConfig { page_size: 20 },
            dashboard: DashboardConfig {
                recent_limit: 10,
                rollup_sample: 20,
                max_customers: 10,
                flag_rule: FlagRule::AnyActive,
            },
            degraded: DegradedConfig { placeholders: false },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        }
    }
}
