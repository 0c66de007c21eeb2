use clap::Parser;
use securedata::cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

/// Environment variable controlling log verbosity (e.g. `debug`).
const LOG_ENV: &str = "SECUREDATA_LOG";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Store { no_save } => securedata::cli::commands::store::execute(&cli, no_save),
        Commands::Retrieve { ref record } => {
            securedata::cli::commands::retrieve::execute(&cli, record)
        }
        Commands::Stats => securedata::cli::commands::stats::execute(&cli),
        Commands::Session => securedata::cli::commands::session::execute(&cli),
    };

    if let Err(e) = result {
        securedata::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
