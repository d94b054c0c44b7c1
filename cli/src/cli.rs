//! CLI argument parsing with clap derive

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags};
use crate::commands;

/// Install and run local services from an artifact repository
#[derive(Parser)]
#[command(
    name = "svcman",
    version,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output (NO_COLOR is honoured as well)
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file (default: ~/.svcman/config.yaml)
    #[arg(long, global = true, env = "SVCMAN_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Install (if needed) and start a service
    Start(commands::start::StartArgs),

    /// Show install and run status
    Status(commands::status::StatusArgs),

    /// List registered services
    Services,

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or the command fails.
    pub async fn run(self) -> Result<()> {
        let Cli {
            json,
            quiet,
            no_color,
            verbose: _,
            config,
            command,
        } = self;

        if let Command::Version = command {
            commands::version::run(json);
            return Ok(());
        }

        let app = AppContext::new(&AppFlags {
            no_color,
            quiet,
            json,
            config,
        })?;
        match command {
            Command::Start(args) => commands::start::run(&args, &app).await,
            Command::Status(args) => commands::status::run(&args, &app).await,
            Command::Services => commands::services::run(&app),
            Command::Version => Ok(()),
        }
    }
}
