//! Blip CLI - Reproducible multi-machine Docker workspaces

use std::process::ExitCode;

use blip_cli::app::AppContext;
use blip_cli::cli::Cli;
use blip_cli::logging;
use blip_cli::output::json;
use clap::Parser;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let flags = cli.flags();
    logging::init(flags.verbose, !flags.no_color);

    let result = match AppContext::new(&flags) {
        Ok(app) => cli.run(&app).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            if flags.json {
                match json::format_error(&format!("{e:#}"), json::error_code(&e)) {
                    Ok(text) => println!("{text}"),
                    Err(_) => eprintln!("Error: {e:#}"),
                }
            } else {
                eprintln!("Error: {e:#}");
            }
            ExitCode::FAILURE
        }
    }
}
