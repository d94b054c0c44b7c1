//! `svcman status` — show what is installed and what was last launched.

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::output::json;

/// Arguments for the status command.
#[derive(Args, Debug, Default)]
pub struct StatusArgs {
    /// Limit to one service
    pub service: Option<String>,
}

/// Run `svcman status`.
///
/// # Errors
///
/// Returns an error if the service is unknown or a ledger file is unreadable.
pub async fn run(args: &StatusArgs, app: &AppContext) -> Result<()> {
    let statuses = app.manager.service_status(args.service.as_deref()).await?;
    if app.is_json() {
        json::print(&statuses)
    } else {
        if statuses.is_empty() {
            app.output.info("No services registered.");
        }
        app.human().render_status(&statuses);
        Ok(())
    }
}
