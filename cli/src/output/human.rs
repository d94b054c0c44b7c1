//! Human-readable terminal renderer.

use owo_colors::OwoColorize as _;

use crate::application::services::service_status::ServiceStatus;
use crate::domain::launch::{LOG_DIRNAME, STDOUT_LOG_FILENAME};
use crate::domain::{RuntimeStateRecord, ServiceRegistry};
use crate::output::OutputContext;

/// Renders domain types as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the outcome of a successful start.
    pub fn render_started(&self, state: &RuntimeStateRecord) {
        let version = display_version(&state.version);
        self.ctx
            .success(&format!("{} {version} started", state.service));
        self.ctx.kv("PID:    ", &state.pid.to_string());
        self.ctx.kv("Port:   ", &state.port.to_string());
        self.ctx.kv("Path:   ", &state.path.display().to_string());
        self.ctx.kv(
            "Logs:   ",
            &state
                .path
                .join(LOG_DIRNAME)
                .join(STDOUT_LOG_FILENAME)
                .display()
                .to_string(),
        );
    }

    /// Render the registered services.
    pub fn render_services(&self, registry: &ServiceRegistry) {
        if registry.is_empty() {
            self.ctx
                .info("No services registered. Add some to services.yaml.");
            return;
        }
        if self.ctx.quiet {
            return;
        }
        println!(
            "  {}",
            format!("{:<20} {:>6}  {}", "SERVICE", "PORT", "ARTIFACT").style(self.ctx.styles.header)
        );
        for service in registry.iter() {
            println!(
                "  {:<20} {:>6}  {}:{}",
                service.id, service.default_port, service.binary.group_id, service.binary.artifact
            );
        }
    }

    /// Render service status rows.
    pub fn render_status(&self, statuses: &[ServiceStatus]) {
        if self.ctx.quiet {
            return;
        }
        for status in statuses {
            println!();
            self.ctx.header(&status.id);
            match &status.installed {
                Some(rec) => {
                    self.ctx.kv(
                        "Installed:",
                        &format!(
                            "{} ({})",
                            display_version(&rec.version),
                            rec.created.format("%Y-%m-%d %H:%M:%S UTC")
                        ),
                    );
                    self.ctx.kv("Path:     ", &rec.path.display().to_string());
                }
                None => self.ctx.kv("Installed:", "no"),
            }
            if let Some(run) = &status.last_run {
                self.ctx.kv(
                    "Last run: ",
                    &format!(
                        "pid {} on port {} ({})",
                        run.pid,
                        run.port,
                        run.started.format("%Y-%m-%d %H:%M:%S UTC")
                    ),
                );
            }
            if status.healthy {
                self.ctx.success("Healthy");
            } else {
                self.ctx.warn("Not responding");
            }
        }
    }
}

/// Offline starts without a requested version record an empty version.
fn display_version(version: &str) -> &str {
    if version.is_empty() { "(unknown version)" } else { version }
}
