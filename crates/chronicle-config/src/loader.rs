//! Configuration loading utilities

use crate::schema::Config;
use crate::validator::ConfigError;
use chronicle_common::{ClockZone, Result as ChronicleResult};
use std::env;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "CHRONICLE_CONFIG_PATH";

/// Configuration loader for the application
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML file with environment variable overrides
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let mut config = Self::parse(&content)?;

        Self::apply_env_overrides(&mut config)?;
        config.validate()?;

        info!(path = %path.as_ref().display(), "Loaded configuration");
        Ok(config)
    }

    /// Parse YAML text without applying overrides or validation
    pub fn parse(content: &str) -> Result<Config, ConfigError> {
        // An empty document means "all defaults"
        if content.trim().is_empty() {
            return Ok(Config::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load configuration from environment variables and files
    pub fn load() -> ChronicleResult<Config> {
        let config = if let Ok(config_path) = env::var(CONFIG_PATH_ENV) {
            Self::load_config(&config_path)?
        } else if Path::new("chronicle.yaml").exists() {
            Self::load_config("chronicle.yaml")?
        } else if Path::new("chronicle.yml").exists() {
            Self::load_config("chronicle.yml")?
        } else {
            debug!("No configuration file found, using defaults");
            let mut config = Config::default();
            Self::apply_env_overrides(&mut config)?;
            config.validate()?;
            config
        };

        Ok(config)
    }

    /// Apply environment variable overrides to configuration
    pub fn apply_env_overrides(config: &mut Config) -> Result<(), ConfigError> {
        Self::apply_overrides_from(config, |var| env::var(var).ok())
    }

    /// Apply `CHRONICLE_*` overrides read through `lookup` instead of the process environment
    pub fn apply_overrides_from<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("CHRONICLE_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Some(zone) = lookup("CHRONICLE_TIMEZONE") {
            config.engine.timezone = parse_env("CHRONICLE_TIMEZONE", &zone, ClockZone::from_str)?;
        }

        if let Some(bind) = lookup("CHRONICLE_PROXY_BIND") {
            config.proxy.bind_address = bind;
        }

        if let Some(template) = lookup("CHRONICLE_PROXY_UPSTREAM") {
            config.proxy.upstream_url_template = template;
        }

        if let Some(timeout) = lookup("CHRONICLE_PROXY_TIMEOUT") {
            config.proxy.timeout_seconds = parse_env("CHRONICLE_PROXY_TIMEOUT", &timeout, str::parse)?;
        }

        if let Some(max_bytes) = lookup("CHRONICLE_PROXY_MAX_BYTES") {
            config.proxy.max_response_bytes =
                parse_env("CHRONICLE_PROXY_MAX_BYTES", &max_bytes, str::parse)?;
        }

        debug!("Applied configuration overrides");
        Ok(())
    }
}

fn parse_env<T, E, F>(var: &str, raw: &str, parse: F) -> Result<T, ConfigError>
where
    F: FnOnce(&str) -> Result<T, E>,
    E: std::error::Error + Send + Sync + 'static,
{
    parse(raw.trim()).map_err(|e| ConfigError::EnvParse {
        var: var.to_string(),
        source: Box::new(e),
    })
}
