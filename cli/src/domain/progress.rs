//! Progress notifications emitted during a start sequence.

/// State label: install directory prepared, download about to begin.
pub const STATE_INIT: &str = "Init";
/// State label: artifact bytes arriving.
pub const STATE_DOWNLOADING: &str = "Downloading";
/// State label: archive being unpacked.
pub const STATE_UNPACKING: &str = "Unpacking";
/// State label: a new install is about to replace the current one.
pub const STATE_INSTALLING: &str = "Installing...";
/// State label: the process is about to be spawned.
pub const STATE_STARTING: &str = "Starting...";
/// Terminal state label: the service answered its health probe.
pub const STATE_ALREADY_RUNNING: &str = "Already running";
/// Terminal state label: the start attempt failed.
pub const STATE_FAILED: &str = "Failed";
/// Terminal state label: the process was spawned and its state persisted.
pub const STATE_STARTED: &str = "Started";

/// One notification for the progress stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    pub service: String,
    /// Percent complete, 0–100, when meaningful.
    pub percent: Option<u8>,
    pub state: String,
}

impl ProgressEvent {
    #[must_use]
    pub fn new(service: &str, percent: Option<u8>, state: &str) -> Self {
        Self {
            service: service.to_string(),
            percent: percent.map(|p| p.min(100)),
            state: state.to_string(),
        }
    }

    /// True for events that end a start sequence.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.state.as_str(),
            STATE_ALREADY_RUNNING | STATE_FAILED | STATE_STARTED
        )
    }
}

/// Percentage of `done` over `total`, clamped to 100. `None` when the total
/// is unknown or zero.
#[must_use]
pub fn percent_of(done: u64, total: Option<u64>) -> Option<u8> {
    let total = total.filter(|t| *t > 0)?;
    let pct = done.saturating_mul(100) / total;
    Some(u8::try_from(pct.min(100)).unwrap_or(100))
}
