use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::acquire::StrategyKind;
use crate::pipeline::ValidationMode;

/// API documentation generator
#[derive(Parser, Debug)]
#[command(
    name = "apiguide",
    about = "Generate an API guide, code samples, a schema catalog and a Postman collection",
    version,
    author,
    long_about = "apiguide resolves a service's API description (from the running service, \
                  from an exporter binary in the project, or by scanning route registrations \
                  in the source tree) and renders documentation artifacts from it."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

impl CliArgs {
    /// Level requested on the command line; `--log-level` wins over `-v` and `-q`
    pub fn log_level_override(&self) -> Option<&str> {
        match &self.log_level {
            Some(level) => Some(level.as_str()),
            None if self.verbose => Some("debug"),
            None if self.quiet => Some("error"),
            None => None,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Generate documentation artifacts for a project",
        long_about = "Resolves the API description and writes API_GUIDE.md plus the docs/ \
                      directory (snapshot, schemas, examples, Postman collection, endpoint \
                      index and run report) under the project root.\n\n\
                      Examples:\n  \
                      apiguide generate\n  \
                      apiguide generate /path/to/service --prefer heuristic\n  \
                      apiguide generate --openapi-url http://localhost:9000/openapi.json --validate sample"
    )]
    Generate(GenerateArgs),

    #[command(
        about = "Print the synthesized example for a JSON schema file",
        long_about = "Reads a single schema node from a JSON file and prints the example value \
                      the generator would use for it.\n\n\
                      Examples:\n  \
                      apiguide example docs/schemas/Item.json"
    )]
    Example(ExampleArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct GenerateArgs {
    #[arg(
        value_name = "PATH",
        help = "Project root (defaults to current directory)"
    )]
    pub project_root: Option<PathBuf>,

    #[arg(
        long,
        value_enum,
        default_value = "remote",
        help = "Strategy tried first when resolving the API description"
    )]
    pub prefer: PreferArg,

    #[arg(
        long,
        value_enum,
        default_value = "none",
        help = "Probe a few read-only endpoints after generation"
    )]
    pub validate: ValidateArg,

    #[arg(long, help = "Record that mutating requests were permitted")]
    pub allow_destructive: bool,

    #[arg(
        long,
        value_name = "URL",
        help = "Remote description URL (overrides APIGUIDE_OPENAPI_URL)"
    )]
    pub openapi_url: Option<String>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Run report format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct ExampleArgs {
    #[arg(value_name = "SCHEMA_FILE", help = "JSON file holding one schema node")]
    pub schema_file: PathBuf,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferArg {
    #[value(alias = "live")]
    Remote,
    #[value(alias = "import")]
    Introspection,
    #[value(alias = "static")]
    Heuristic,
}

impl From<PreferArg> for StrategyKind {
    fn from(arg: PreferArg) -> Self {
        match arg {
            PreferArg::Remote => StrategyKind::Remote,
            PreferArg::Introspection => StrategyKind::Introspection,
            PreferArg::Heuristic => StrategyKind::Static,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidateArg {
    None,
    Sample,
}

impl From<ValidateArg> for ValidationMode {
    fn from(arg: ValidateArg) -> Self {
        match arg {
            ValidateArg::None => ValidationMode::None,
            ValidateArg::Sample => ValidationMode::Sample,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use yare::parameterized;

    #[test]
    fn test_cli_args_verify() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn test_default_generate_args() {
        let args = CliArgs::parse_from(["apiguide", "generate"]);
        match args.command {
            Commands::Generate(generate) => {
                assert!(generate.project_root.is_none());
                assert_eq!(generate.prefer, PreferArg::Remote);
                assert_eq!(generate.validate, ValidateArg::None);
                assert!(!generate.allow_destructive);
                assert!(generate.openapi_url.is_none());
                assert_eq!(generate.format, OutputFormatArg::Human);
            }
            _ => panic!("Expected Generate command"),
        }
    }

    #[test]
    fn test_generate_with_all_options() {
        let args = CliArgs::parse_from([
            "apiguide",
            "generate",
            "/srv/app",
            "--prefer",
            "introspection",
            "--validate",
            "sample",
            "--allow-destructive",
            "--openapi-url",
            "http://127.0.0.1:9000/openapi.json",
            "--format",
            "json",
        ]);
        match args.command {
            Commands::Generate(generate) => {
                assert_eq!(generate.project_root, Some(PathBuf::from("/srv/app")));
                assert_eq!(generate.prefer, PreferArg::Introspection);
                assert_eq!(generate.validate, ValidateArg::Sample);
                assert!(generate.allow_destructive);
                assert_eq!(
                    generate.openapi_url.as_deref(),
                    Some("http://127.0.0.1:9000/openapi.json")
                );
                assert_eq!(generate.format, OutputFormatArg::Json);
            }
            _ => panic!("Expected Generate command"),
        }
    }

    #[parameterized(
        remote = { "remote", StrategyKind::Remote },
        live = { "live", StrategyKind::Remote },
        introspection = { "introspection", StrategyKind::Introspection },
        import = { "import", StrategyKind::Introspection },
        heuristic = { "heuristic", StrategyKind::Static },
        static_alias = { "static", StrategyKind::Static },
    )]
    fn test_prefer_selector(value: &str, expected: StrategyKind) {
        let args = CliArgs::parse_from(["apiguide", "generate", "--prefer", value]);
        match args.command {
            Commands::Generate(generate) => {
                assert_eq!(StrategyKind::from(generate.prefer), expected)
            }
            _ => panic!("Expected Generate command"),
        }
    }

    #[test]
    fn test_invalid_prefer_rejected() {
        assert!(CliArgs::try_parse_from(["apiguide", "generate", "--prefer", "magic"]).is_err());
    }

    #[test]
    fn test_example_command() {
        let args = CliArgs::parse_from(["apiguide", "-v", "example", "schema.json"]);
        assert!(args.verbose);
        match args.command {
            Commands::Example(example) => {
                assert_eq!(example.schema_file, PathBuf::from("schema.json"))
            }
            _ => panic!("Expected Example command"),
        }
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(CliArgs::try_parse_from(["apiguide", "-q", "-v", "generate"]).is_err());
    }

    #[parameterized(
        none = { &["apiguide", "generate"], None },
        verbose = { &["apiguide", "-v", "generate"], Some("debug") },
        quiet = { &["apiguide", "generate", "-q"], Some("error") },
        explicit = { &["apiguide", "--log-level", "TRACE", "generate"], Some("TRACE") },
        explicit_beats_verbose = { &["apiguide", "-v", "--log-level", "warn", "generate"], Some("warn") },
    )]
    fn test_log_level_override(argv: &[&str], expected: Option<&str>) {
        let args = CliArgs::parse_from(argv);
        assert_eq!(args.log_level_override(), expected);
    }
}
