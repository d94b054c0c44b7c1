//! svcman - install and run local services from an artifact repository

use clap::Parser;

use svcman_cli::app::init_tracing;
use svcman_cli::cli::Cli;
use svcman_cli::output::json;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let json_mode = cli.json;

    if let Err(e) = cli.run().await {
        if json_mode {
            match json::format_error(&format!("{e:#}"), json::error_code(&e)) {
                Ok(out) => println!("{out}"),
                Err(_) => eprintln!("Error: {e:#}"),
            }
        } else {
            eprintln!("Error: {e:#}");
        }
        std::process::exit(1);
    }
}
