use clap::Parser;
use reflection_quiz::app::{handle_fatal_error, init_logging, AppConfig};
use reflection_quiz::cli::{execute_command, Cli};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let app_config = match AppConfig::new(cli.verbose) {
        Ok(config) => config,
        Err(e) => handle_fatal_error(e, cli.verbose),
    };
    init_logging(&app_config);

    if let Err(e) = execute_command(cli.command, cli.config.as_deref(), &app_config).await {
        handle_fatal_error(e, cli.verbose);
    }
}
