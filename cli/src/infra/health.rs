//! Health infrastructure — implements `HealthProbe` using `spawn_blocking`.

use std::time::Duration;

use crate::application::ports::HealthProbe;

/// Path every managed service answers on when it is up.
pub const PING_PATH: &str = "/ping/ping";

/// Per-probe timeout. A service that cannot answer within this is treated as down.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Production implementation that performs a real HTTP probe on localhost.
#[derive(Debug, Clone)]
pub struct HttpHealthProbe {
    host: String,
}

impl Default for HttpHealthProbe {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
        }
    }
}

impl HttpHealthProbe {
    /// Probe services on `host` instead of `localhost`.
    #[must_use]
    pub fn with_host(host: impl Into<String>) -> Self {
        Self { host: host.into() }
    }

    /// Probe URL for a port.
    #[must_use]
    pub fn ping_url(&self, port: u16) -> String {
        format!("http://{}:{port}{PING_PATH}", self.host)
    }
}

impl HealthProbe for HttpHealthProbe {
    async fn is_healthy(&self, port: u16) -> bool {
        let url = self.ping_url(port);
        let result = tokio::task::spawn_blocking(move || {
            // ureq reports non-2xx statuses as errors, so Ok means healthy.
            ureq::get(&url).timeout(PROBE_TIMEOUT).call().is_ok()
        })
        .await;
        match result {
            Ok(healthy) => healthy,
            Err(e) => {
                tracing::warn!(port, error = %e, "health probe task panicked");
                false
            }
        }
    }
}
