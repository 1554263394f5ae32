use figment::providers::{Env, Format, Yaml};
use figment::Figment;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::logging::LoggingConfig;
use super::telemetry::TelemetryConfig;

/// Environment variable pointing at an alternative settings file.
pub const CONFIG_PATH_VAR: &str = "DEAL_PROXY_CONFIG";
/// Settings file read when `DEAL_PROXY_CONFIG` is unset. Missing is fine.
pub const DEFAULT_CONFIG_PATH: &str = "./config.yaml";
/// Prefix for environment overrides, e.g. `PIPEDRIVE_API_TOKEN`.
pub const ENV_PREFIX: &str = "PIPEDRIVE_";

/// Main config: upstream endpoint and credential, plus server settings.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct Config {
    /// Base URL of the upstream deals resource, e.g. `https://acme.pipedrive.com/api/v1/deals`.
    #[serde(default)]
    pub api_url: String,
    /// Static credential appended to every upstream call as `api_token`.
    #[serde(default)]
    pub api_token: String,
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// Upper bound for a single upstream round trip. Unset means no timeout.
    #[serde(default)]
    pub upstream_timeout_in_ms: Option<u64>,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Missing {0} environment variable")]
    Missing(&'static str),
    #[error("Invalid logging.level '{0}'. Valid values: trace, debug, info, warn, error")]
    InvalidLogLevel(String),
    #[error("{0}")]
    Extract(String),
}

fn default_bind_address() -> String {
    "0.0.0.0:8080".to_string()
}

impl Config {
    /// Settings file first, then `PIPEDRIVE_*` environment variables on top.
    ///
    /// Only the YAML settings file and the process environment are consulted; a `.env`
    /// file in the working directory is not loaded.
    pub fn figment() -> Figment {
        let path =
            std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Figment::new()
            .merge(Yaml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Extracts and validates a config from any figment.
    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Config = figment
            .extract()
            .map_err(|e| ConfigError::Extract(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_token.trim().is_empty() {
            return Err(ConfigError::Missing("PIPEDRIVE_API_TOKEN"));
        }
        if self.api_url.trim().is_empty() {
            return Err(ConfigError::Missing("PIPEDRIVE_API_URL"));
        }
        match self.logging.level.trim().to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            _ => Err(ConfigError::InvalidLogLevel(self.logging.level.clone())),
        }
    }
}

/// Load config from the settings file and environment, exiting the process on failure.
pub fn load_config() -> Config {
    match Config::from_figment(Config::figment()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            std::process::exit(1);
        }
    }
}

/// Print the JSON schema for the configuration to stdout.
pub fn print_schema() {
    let schema = schema_for!(Config);
    match serde_json::to_string_pretty(&schema) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("Error rendering schema: {}", e),
    }
}
