//! Structured logging setup for apiguide
//!
//! Logs go to stderr so stdout stays reserved for the run report. `RUST_LOG` wins when set;
//! otherwise the crate level comes from [`LoggingConfig`] and noisy HTTP crates are held at
//! `warn`. Initialization happens at most once per process.
//!
//! # Example
//!
//! ```no_run
//! use apiguide::util::{init_logging, LoggingConfig};
//! use apiguide::GuideConfig;
//!
//! // With environment: APIGUIDE_LOG_LEVEL=debug
//! let config = GuideConfig::from_env().expect("Invalid configuration");
//! init_logging(LoggingConfig::from(&config));
//!
//! tracing::info!(strategy = "remote", "Resolved API description");
//! ```

use std::env;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::GuideConfig;

static INIT: Once = Once::new();

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Minimum log level to display
    pub level: Level,

    /// Use JSON output format
    pub use_json: bool,

    /// Include the module target (e.g., apiguide::acquire) in logs
    pub include_target: bool,

    /// Include file and line number information
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            use_json: false,
            include_target: true,
            include_location: false,
        }
    }
}

impl LoggingConfig {
    pub fn with_level(level: Level) -> Self {
        Self {
            level,
            ..Default::default()
        }
    }

}

impl From<&GuideConfig> for LoggingConfig {
    fn from(config: &GuideConfig) -> Self {
        Self {
            use_json: config.log_json,
            ..Self::with_level(parse_level(&config.log_level))
        }
    }
}

/// Parses a log level, case-insensitively; anything unknown becomes `INFO`
///
/// ```
/// use apiguide::util::logging::parse_level;
/// use tracing::Level;
///
/// assert_eq!(parse_level("debug"), Level::DEBUG);
/// assert_eq!(parse_level("INFO"), Level::INFO);
/// assert_eq!(parse_level("invalid"), Level::INFO);
/// ```
pub fn parse_level(level_str: &str) -> Level {
    match level_str.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            eprintln!(
                "Invalid log level '{}', defaulting to INFO. Valid levels: trace, debug, info, warn, error",
                level_str
            );
            Level::INFO
        }
    }
}

fn build_filter(level: Level) -> EnvFilter {
    if env::var("RUST_LOG").is_ok() {
        return EnvFilter::from_default_env();
    }

    let directives = [
        format!("apiguide={}", level),
        "h2=warn".to_string(),
        "hyper=warn".to_string(),
        "reqwest=warn".to_string(),
    ];
    directives
        .iter()
        .filter_map(|d| d.parse().ok())
        .fold(EnvFilter::default(), |filter, directive| {
            filter.add_directive(directive)
        })
}

/// Installs the global subscriber; later calls are ignored
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = build_filter(config.level);

        if config.use_json {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(std::io::stderr)
                        .with_target(config.include_target)
                        .with_file(config.include_location)
                        .with_line_number(config.include_location),
                )
                .init();
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(config.include_target)
                        .with_file(config.include_location)
                        .with_line_number(config.include_location),
                )
                .init();
        }
    });
}
