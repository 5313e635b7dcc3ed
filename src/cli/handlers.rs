//! Subcommand handlers; each returns the process exit code

use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, error, info};

use super::commands::{CliArgs, Commands, ExampleArgs, GenerateArgs};
use super::output::{OutputFormat, OutputFormatter};
use crate::config::{ConfigError, GuideConfig};
use crate::description::TypeDescription;
use crate::pipeline::{PipelineError, PipelineOrchestrator, RunOptions};
use crate::progress::LoggingHandler;
use crate::synth::ExampleSynthesizer;
use crate::transport::ReqwestTransport;

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
/// No strategy produced a description
pub const EXIT_NO_SOURCE: i32 = 2;

/// Environment settings with command-line overrides applied, validated
pub fn load_config(args: &CliArgs) -> Result<GuideConfig, ConfigError> {
    let mut config = GuideConfig::from_env()?;

    if let Some(level) = args.log_level_override() {
        config.log_level = level.to_lowercase();
    }
    if let Commands::Generate(generate) = &args.command {
        if let Some(url) = &generate.openapi_url {
            config.openapi_url = url.clone();
        }
    }

    config.validate()?;
    Ok(config)
}

pub fn handle_generate(args: &GenerateArgs, config: &GuideConfig) -> i32 {
    info!("Starting API guide generation");

    let project_root = match &args.project_root {
        Some(path) => path.clone(),
        None => match env::current_dir() {
            Ok(dir) => dir,
            Err(e) => {
                error!("Failed to get current directory: {}", e);
                return EXIT_FAILURE;
            }
        },
    };

    if !project_root.is_dir() {
        error!(
            "Project root is not a directory: {}",
            project_root.display()
        );
        return EXIT_FAILURE;
    }

    let project_root: PathBuf = match project_root.canonicalize() {
        Ok(path) => path,
        Err(e) => {
            error!("Failed to canonicalize project root: {}", e);
            return EXIT_FAILURE;
        }
    };
    debug!("Project root: {}", project_root.display());

    if let Some(url) = &args.openapi_url {
        debug!("Remote description URL overridden to: {}", url);
    }
    debug!("{}", config);

    let orchestrator = match PipelineOrchestrator::for_project(
        &project_root,
        config,
        Arc::new(ReqwestTransport::new()),
    ) {
        Ok(orchestrator) => orchestrator.with_progress_handler(Box::new(LoggingHandler)),
        Err(e) => {
            error!("Failed to set up pipeline: {:#}", e);
            return EXIT_FAILURE;
        }
    };

    let options = RunOptions {
        preferred: args.prefer.into(),
        validation: args.validate.into(),
        allow_destructive: args.allow_destructive,
    };

    let report = match orchestrator.execute(&project_root.display().to_string(), options) {
        Ok(report) => report,
        Err(e @ PipelineError::Acquisition(_)) => {
            error!("{}", e);
            return EXIT_NO_SOURCE;
        }
        Err(e) => {
            error!("{}", e);
            return EXIT_FAILURE;
        }
    };

    let formatter = OutputFormatter::new(args.format.into());
    match formatter.format_report(&report) {
        Ok(output) => {
            println!("{}", output);
            EXIT_SUCCESS
        }
        Err(e) => {
            error!("Failed to format report: {:#}", e);
            EXIT_FAILURE
        }
    }
}

pub fn handle_example(args: &ExampleArgs, config: &GuideConfig) -> i32 {
    let contents = match fs::read_to_string(&args.schema_file) {
        Ok(contents) => contents,
        Err(e) => {
            error!(
                "Failed to read schema file {}: {}",
                args.schema_file.display(),
                e
            );
            return EXIT_FAILURE;
        }
    };

    let schema: TypeDescription = match serde_json::from_str(&contents) {
        Ok(schema) => schema,
        Err(e) => {
            error!("Schema file is not valid JSON: {}", e);
            return EXIT_FAILURE;
        }
    };

    let example = ExampleSynthesizer::with_max_depth(config.max_schema_depth).synthesize(&schema);

    match OutputFormatter::new(OutputFormat::Human).format_example(&example) {
        Ok(output) => {
            println!("{}", output);
            EXIT_SUCCESS
        }
        Err(e) => {
            error!("Failed to format example: {:#}", e);
            EXIT_FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use serial_test::serial;
    use std::env;

    struct EnvGuard {
        key: &'static str,
        old_value: Option<String>,
    }

    impl EnvGuard {
        fn set(key: &'static str, value: &str) -> Self {
            let old_value = env::var(key).ok();
            env::set_var(key, value);
            Self { key, old_value }
        }

        fn unset(key: &'static str) -> Self {
            let old_value = env::var(key).ok();
            env::remove_var(key);
            Self { key, old_value }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.old_value {
                Some(v) => env::set_var(self.key, v),
                None => env::remove_var(self.key),
            }
        }
    }

    #[test]
    #[serial]
    fn test_log_level_flag_overrides_invalid_environment() {
        let _level = EnvGuard::set("APIGUIDE_LOG_LEVEL", "verbose");
        let _url = EnvGuard::unset("APIGUIDE_OPENAPI_URL");

        let args = CliArgs::parse_from(["apiguide", "--log-level", "DEBUG", "generate"]);
        let config = load_config(&args).unwrap();
        assert_eq!(config.log_level, "debug");

        let args = CliArgs::parse_from(["apiguide", "generate"]);
        assert!(load_config(&args).is_err());
    }

    #[test]
    #[serial]
    fn test_environment_logging_settings_are_loaded() {
        let _level = EnvGuard::set("APIGUIDE_LOG_LEVEL", "warn");
        let _json = EnvGuard::set("APIGUIDE_LOG_JSON", "true");
        let _url = EnvGuard::unset("APIGUIDE_OPENAPI_URL");

        let config = load_config(&CliArgs::parse_from(["apiguide", "generate"])).unwrap();
        assert_eq!(config.log_level, "warn");
        assert!(config.log_json);

        let config = load_config(&CliArgs::parse_from(["apiguide", "-q", "generate"])).unwrap();
        assert_eq!(config.log_level, "error");
    }

    #[test]
    #[serial]
    fn test_openapi_url_flag_is_validated() {
        let _url = EnvGuard::set("APIGUIDE_OPENAPI_URL", "http://env.test/openapi.json");
        let _level = EnvGuard::unset("APIGUIDE_LOG_LEVEL");

        let args = CliArgs::parse_from([
            "apiguide",
            "generate",
            "--openapi-url",
            "http://flag.test/openapi.json",
        ]);
        assert_eq!(
            load_config(&args).unwrap().openapi_url,
            "http://flag.test/openapi.json"
        );

        let args = CliArgs::parse_from(["apiguide", "generate", "--openapi-url", "flag.test"]);
        assert!(load_config(&args).is_err());
    }
}
