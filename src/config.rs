//! Configuration management for apiguide
//!
//! Settings are loaded from environment variables with defaults, then overridden by
//! command-line flags and validated before a run starts.
//!
//! # Environment Variables
//!
//! - `APIGUIDE_OPENAPI_URL`: remote description URL - default: "http://localhost:8000/openapi.json"
//! - `APIGUIDE_FETCH_TIMEOUT`: remote fetch timeout in seconds - default: "5"
//! - `APIGUIDE_INTROSPECT_TIMEOUT`: exporter build and run timeout in seconds, each - default: "60"
//! - `APIGUIDE_PROBE_TIMEOUT`: per-probe timeout in seconds - default: "3"
//! - `APIGUIDE_MAX_PROBES`: sample validation candidate cap - default: "3"
//! - `APIGUIDE_MAX_SCHEMA_DEPTH`: example synthesis nesting bound - default: "32"
//! - `APIGUIDE_LOG_LEVEL`: logging level - default: "info"
//! - `APIGUIDE_LOG_JSON`: JSON log output (true|false) - default: "false"
//!
//! # Example
//!
//! ```no_run
//! use apiguide::GuideConfig;
//!
//! let mut config = GuideConfig::default();
//! config.openapi_url = "http://127.0.0.1:9000/openapi.json".to_string();
//! config.validate().expect("Invalid configuration");
//! ```

use serde::Serialize;
use std::env;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_OPENAPI_URL: &str = "http://localhost:8000/openapi.json";
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 5;
const DEFAULT_INTROSPECT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 3;
const DEFAULT_MAX_PROBES: usize = 3;
const DEFAULT_MAX_SCHEMA_DEPTH: usize = 32;
const DEFAULT_LOG_LEVEL: &str = "info";

const MAX_TIMEOUT_SECS: u64 = 600;
const MAX_PROBES_LIMIT: usize = 20;
const MAX_SCHEMA_DEPTH_LIMIT: usize = 256;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    /// Failed to parse configuration value
    #[error("Failed to parse {field}: {error}")]
    ParseError { field: String, error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuideConfig {
    /// Where the remote strategy fetches the description
    pub openapi_url: String,

    pub fetch_timeout_secs: u64,

    /// Bound on building an exporter binary, and separately on running it
    pub introspect_timeout_secs: u64,

    pub probe_timeout_secs: u64,

    pub max_probes: usize,

    pub max_schema_depth: usize,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,

    pub log_json: bool,
}

impl Default for GuideConfig {
    /// Loads `APIGUIDE_*` variables, falling back to defaults for anything unset or unparsable
    fn default() -> Self {
        let openapi_url =
            env::var("APIGUIDE_OPENAPI_URL").unwrap_or_else(|_| DEFAULT_OPENAPI_URL.to_string());

        let fetch_timeout_secs = env_parsed("APIGUIDE_FETCH_TIMEOUT", DEFAULT_FETCH_TIMEOUT_SECS);
        let introspect_timeout_secs =
            env_parsed("APIGUIDE_INTROSPECT_TIMEOUT", DEFAULT_INTROSPECT_TIMEOUT_SECS);
        let probe_timeout_secs = env_parsed("APIGUIDE_PROBE_TIMEOUT", DEFAULT_PROBE_TIMEOUT_SECS);
        let max_probes = env_parsed("APIGUIDE_MAX_PROBES", DEFAULT_MAX_PROBES);
        let max_schema_depth = env_parsed("APIGUIDE_MAX_SCHEMA_DEPTH", DEFAULT_MAX_SCHEMA_DEPTH);

        let log_level = env::var("APIGUIDE_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();
        let log_json = env_parsed("APIGUIDE_LOG_JSON", false);

        Self {
            openapi_url,
            fetch_timeout_secs,
            introspect_timeout_secs,
            probe_timeout_secs,
            max_probes,
            max_schema_depth,
            log_level,
            log_json,
        }
    }
}

fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

impl GuideConfig {
    /// Strict variant of [`Default`]: a set but unparsable variable is an error
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self::default();
        for key in [
            "APIGUIDE_FETCH_TIMEOUT",
            "APIGUIDE_INTROSPECT_TIMEOUT",
            "APIGUIDE_PROBE_TIMEOUT",
            "APIGUIDE_MAX_PROBES",
            "APIGUIDE_MAX_SCHEMA_DEPTH",
        ] {
            if let Ok(value) = env::var(key) {
                value
                    .trim()
                    .parse::<u64>()
                    .map_err(|e| ConfigError::ParseError {
                        field: key.to_string(),
                        error: e.to_string(),
                    })?;
            }
        }
        if let Ok(value) = env::var("APIGUIDE_LOG_JSON") {
            value
                .trim()
                .parse::<bool>()
                .map_err(|e| ConfigError::ParseError {
                    field: "APIGUIDE_LOG_JSON".to_string(),
                    error: e.to_string(),
                })?;
        }
        Ok(config)
    }

    /// Checks numeric ranges, the URL scheme and the log level
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_timeout("Fetch timeout", self.fetch_timeout_secs)?;
        check_timeout("Introspection timeout", self.introspect_timeout_secs)?;
        check_timeout("Probe timeout", self.probe_timeout_secs)?;

        if self.max_probes == 0 || self.max_probes > MAX_PROBES_LIMIT {
            return Err(ConfigError::ValidationFailed(format!(
                "Max probes must be between 1 and {}",
                MAX_PROBES_LIMIT
            )));
        }

        if self.max_schema_depth == 0 || self.max_schema_depth > MAX_SCHEMA_DEPTH_LIMIT {
            return Err(ConfigError::ValidationFailed(format!(
                "Max schema depth must be between 1 and {}",
                MAX_SCHEMA_DEPTH_LIMIT
            )));
        }

        if !(self.openapi_url.starts_with("http://") || self.openapi_url.starts_with("https://"))
        {
            return Err(ConfigError::ValidationFailed(format!(
                "OpenAPI URL must start with http:// or https://, got {}",
                self.openapi_url
            )));
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        Ok(())
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn introspect_timeout(&self) -> Duration {
        Duration::from_secs(self.introspect_timeout_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }
}

fn check_timeout(name: &str, secs: u64) -> Result<(), ConfigError> {
    if secs == 0 {
        return Err(ConfigError::ValidationFailed(format!(
            "{} must be at least 1 second",
            name
        )));
    }
    if secs > MAX_TIMEOUT_SECS {
        return Err(ConfigError::ValidationFailed(format!(
            "{} cannot exceed 10 minutes",
            name
        )));
    }
    Ok(())
}

impl fmt::Display for GuideConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Apiguide Configuration:")?;
        writeln!(f, "  OpenAPI URL: {}", self.openapi_url)?;
        writeln!(f, "  Fetch Timeout: {}s", self.fetch_timeout_secs)?;
        writeln!(f, "  Introspection Timeout: {}s", self.introspect_timeout_secs)?;
        writeln!(f, "  Probe Timeout: {}s", self.probe_timeout_secs)?;
        writeln!(f, "  Max Probes: {}", self.max_probes)?;
        writeln!(f, "  Max Schema Depth: {}", self.max_schema_depth)?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        writeln!(f, "  Log JSON: {}", self.log_json)?;
        Ok(())
    }
}
