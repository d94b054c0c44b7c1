//! `svcman services` — list the registry.

use anyhow::Result;

use crate::app::AppContext;
use crate::output::json;

/// Run `svcman services`.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn run(app: &AppContext) -> Result<()> {
    let registry = app.manager.registry();
    if app.is_json() {
        let services: Vec<_> = registry.iter().collect();
        json::print(&services)
    } else {
        app.human().render_services(registry);
        Ok(())
    }
}
