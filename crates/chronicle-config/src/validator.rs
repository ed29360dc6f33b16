//! Runtime validation of a loaded configuration.

use crate::schema::{Config, ProxyConfig, SourceMapping};
use chronicle_common::{ChronicleError, SourceDomain, TimeBracket};
use thiserror::Error;
use tracing::debug;

/// Configuration loading and validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {source}")]
    EnvParse {
        /// Variable name
        var: String,
        /// Parse failure
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// One or more validation rules failed
    #[error("Configuration validation failed: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

impl From<ConfigError> for ChronicleError {
    fn from(err: ConfigError) -> Self {
        Self::config_with_source(err.to_string(), err)
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Checks every section and reports all problems at once.
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let mut problems = Vec::new();

        if config.engine.default_top_n == 0 {
            problems.push("engine.default_top_n must be greater than 0".to_string());
        }
        if config.engine.podcast_top_n == 0 {
            problems.push("engine.podcast_top_n must be greater than 0".to_string());
        }

        problems.extend(Self::check_brackets(&config.heatmap.brackets));

        for domain in SourceDomain::ALL {
            problems.extend(Self::check_mapping(domain, config.sources.mapping(domain)));
        }

        problems.extend(Self::check_proxy(&config.proxy));

        if problems.is_empty() {
            debug!("Configuration passed validation");
            Ok(())
        } else {
            Err(ConfigError::Invalid(problems))
        }
    }

    /// Brackets must cover hours 0-23 with no gaps and no overlaps.
    pub fn check_brackets(brackets: &[TimeBracket]) -> Vec<String> {
        let mut problems = Vec::new();

        if brackets.is_empty() {
            problems.push("heatmap.brackets must not be empty".to_string());
            return problems;
        }

        for bracket in brackets {
            if bracket.start_hour > bracket.end_hour || bracket.end_hour > 23 {
                problems.push(format!(
                    "heatmap bracket '{}' has invalid hours {}-{}",
                    bracket.label, bracket.start_hour, bracket.end_hour
                ));
            }
        }
        if !problems.is_empty() {
            return problems;
        }

        for hour in 0..24 {
            match brackets.iter().filter(|b| b.contains(hour)).count() {
                0 => problems.push(format!("hour {hour} is not covered by any heatmap bracket")),
                1 => {}
                n => problems.push(format!("hour {hour} is covered by {n} heatmap brackets")),
            }
        }

        problems
    }

    fn check_mapping(domain: SourceDomain, mapping: &SourceMapping) -> Vec<String> {
        let mut problems = Vec::new();
        if mapping.creator.trim().is_empty() {
            problems.push(format!("sources.{domain}.creator must name a field"));
        }
        if mapping.timestamp.trim().is_empty() {
            problems.push(format!("sources.{domain}.timestamp must name a field"));
        }
        problems
    }

    fn check_proxy(proxy: &ProxyConfig) -> Vec<String> {
        let mut problems = Vec::new();

        if proxy.timeout_seconds == 0 {
            problems.push("proxy.timeout_seconds must be greater than 0".to_string());
        }
        if proxy.max_response_bytes == 0 {
            problems.push("proxy.max_response_bytes must be greater than 0".to_string());
        }
        if proxy.bind_address.parse::<std::net::SocketAddr>().is_err() {
            problems.push(format!(
                "proxy.bind_address '{}' is not a socket address",
                proxy.bind_address
            ));
        }

        if proxy.upstream_url_template.contains("{id}") {
            let sample = proxy.upstream_url_template.replace("{id}", "sample");
            match url::Url::parse(&sample) {
                Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
                Ok(parsed) => problems.push(format!(
                    "proxy.upstream_url_template uses unsupported scheme '{}'",
                    parsed.scheme()
                )),
                Err(e) => problems.push(format!("proxy.upstream_url_template is not a URL: {e}")),
            }
        } else {
            problems.push("proxy.upstream_url_template must contain an {id} placeholder".to_string());
        }

        problems
    }
}
