//! `svcman start` — install the service if needed, then launch it.

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::domain::StartError;
use crate::domain::config::{RunOptions, parse_extra_args};
use crate::output::json;
use crate::output::progress::spawn_progress_ui;
use crate::output::ChannelReporter;

/// Arguments for the start command.
#[derive(Args, Debug, Default)]
pub struct StartArgs {
    /// Service id, as listed by `svcman services`
    pub service: String,

    /// Version to install instead of the latest release
    #[arg(short = 'r', long = "release", value_name = "VERSION")]
    pub version: Option<String>,

    /// Never contact the repository; use the current install
    #[arg(long)]
    pub offline: bool,

    /// Reinstall even if the current install is usable
    #[arg(long)]
    pub clean: bool,

    /// Port to run on instead of the service default
    #[arg(long)]
    pub port: Option<u16>,

    /// Extra arguments per service as JSON, e.g. '{"AUTH":["-Dkey=value"]}'
    #[arg(long, value_name = "JSON")]
    pub append_args: Option<String>,
}

impl StartArgs {
    /// Per-invocation options for the start sequence.
    ///
    /// # Errors
    ///
    /// Returns an error if `--append-args` is not a JSON object of string arrays.
    pub fn run_options(&self) -> Result<RunOptions> {
        let extra_args = match &self.append_args {
            Some(raw) => parse_extra_args(raw)?,
            None => Default::default(),
        };
        Ok(RunOptions {
            offline: self.offline,
            clean: self.clean,
            port: self.port,
            extra_args,
        })
    }
}

/// Run `svcman start`.
///
/// A service that is already running is reported and is not an error.
///
/// # Errors
///
/// Returns an error if version resolution, install, or launch fails.
pub async fn run(args: &StartArgs, app: &AppContext) -> Result<()> {
    let opts = args.run_options()?;

    let (reporter, rx) = ChannelReporter::channel();
    let ui = spawn_progress_ui(rx, app.output.progress_mode(app.is_json()));
    let result = app
        .manager
        .start_service(&args.service, args.version.as_deref(), &opts, &reporter)
        .await;
    drop(reporter);
    if let Err(e) = ui.await {
        tracing::debug!(error = %e, "progress renderer stopped abnormally");
    }

    match result {
        Ok(state) => {
            if app.is_json() {
                json::print(&state)?;
            } else {
                app.human().render_started(&state);
            }
            Ok(())
        }
        Err(e) => match e.downcast_ref::<StartError>() {
            Some(StartError::AlreadyRunning(id)) => {
                if app.is_json() {
                    json::print(&serde_json::json!({
                        "service": id,
                        "status": "already_running",
                    }))?;
                } else {
                    app.output.info(&format!("{id} is already running."));
                }
                Ok(())
            }
            _ => Err(e),
        },
    }
}
