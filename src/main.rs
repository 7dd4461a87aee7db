//! Attach agent CLI entry point.

use clap::Parser;

use attach_agent::cli::commands::{self, load_config};
use attach_agent::cli::{handle_error, Cli, Commands};
use attach_agent::infrastructure::logging::{LogConfig, LoggerImpl};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    let logger = load_config(config_path)
        .and_then(|config| LoggerImpl::init(&LogConfig::from(&config.logging)));
    let _logger = match logger {
        Ok(logger) => logger,
        Err(err) => handle_error(err, cli.json),
    };

    let result = match cli.command {
        Commands::AttachInfo(args) => {
            commands::attach_info::execute(args, config_path, cli.json).await
        }
        Commands::Scan(args) => commands::scan::execute(args, config_path, cli.json).await,
    };

    if let Err(err) = result {
        handle_error(err, cli.json);
    }
}
