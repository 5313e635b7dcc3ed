use apiguide::cli::commands::{CliArgs, Commands};
use apiguide::cli::handlers::{handle_example, handle_generate, load_config, EXIT_FAILURE};
use apiguide::util::{init_logging, LoggingConfig};
use apiguide::VERSION;

use clap::Parser;
use tracing::{debug, error};

fn main() {
    let args = CliArgs::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            init_logging(LoggingConfig::default());
            error!("Configuration error: {}", e);
            eprintln!("\nPlease check your environment variables and command-line arguments.");
            std::process::exit(EXIT_FAILURE);
        }
    };
    init_logging(LoggingConfig::from(&config));

    debug!("apiguide v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Commands::Generate(generate_args) => handle_generate(generate_args, &config),
        Commands::Example(example_args) => handle_example(example_args, &config),
    };

    std::process::exit(exit_code);
}
