// ABOUTME: Entry point for the hostkeys binary
// ABOUTME: Builds config and logging from the command line, runs once, maps errors to exit codes

use clap::Parser;
use hostkeys::cli::Cli;
use hostkeys::{Config, HttpFetcher, RunError, EXIT_FAILURE};
use std::io::Write;
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match cli.into_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    let _log = match hostkeys_log::init(&config.log) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: failed to set up logging: {e}");
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    match execute(&config).await {
        Ok(output) => {
            if let Err(e) = std::io::stdout().write_all(output.as_bytes()) {
                tracing::error!(error = %e, "Failed to write output");
                return ExitCode::from(EXIT_FAILURE);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Run failed");
            eprintln!("Error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

async fn execute(config: &Config) -> Result<String, RunError> {
    let passphrase = if config.prompt_password {
        hostkeys::prompt_passphrase()?
    } else {
        String::new()
    };

    let fetcher = HttpFetcher::new()?;
    let generator = config.backend.generator();

    hostkeys::run(config, &passphrase, &fetcher, generator.as_ref()).await
}
