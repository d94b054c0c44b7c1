//! Progress indicators using indicatif, fed by the progress channel.

#![allow(clippy::expect_used)] // Templates are compile-time constants

use std::collections::HashMap;
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;

use crate::domain::ProgressEvent;
use crate::domain::progress::{STATE_ALREADY_RUNNING, STATE_FAILED};

/// How the consumer task renders events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressMode {
    /// One live bar per service (TTY).
    Bars,
    /// One line per state change (pipes, CI logs).
    Lines,
    /// Drain and discard (`--quiet`, `--json`).
    Silent,
}

/// Create a percentage bar for one service.
///
/// # Panics
///
/// Panics if the progress bar template string is invalid (it is a compile-time constant and will not panic).
#[must_use]
pub fn bar(service: &str) -> ProgressBar {
    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  {prefix:<12} {bar:30.cyan/dim} {pos:>3}%  {msg}")
            .expect("valid template")
            .progress_chars("━━─"),
    );
    pb.set_prefix(service.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// Finish a progress bar with a success message.
pub fn finish_success(pb: &ProgressBar, msg: &str) {
    pb.finish_with_message(format!("✓ {msg}"));
}

/// Finish a progress bar with an error message.
pub fn finish_error(pb: &ProgressBar, msg: &str) {
    pb.abandon_with_message(format!("✗ {msg}"));
}

/// One-line rendering of an event, used in [`ProgressMode::Lines`].
#[must_use]
pub fn format_line(event: &ProgressEvent) -> String {
    match event.percent {
        Some(pct) => format!("{}: {} ({pct}%)", event.service, event.state),
        None => format!("{}: {}", event.service, event.state),
    }
}

/// Spawn the single consumer of the progress channel. The task ends when
/// every sender has been dropped.
#[must_use]
pub fn spawn_progress_ui(
    mut rx: UnboundedReceiver<ProgressEvent>,
    mode: ProgressMode,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let multi = MultiProgress::new();
        let mut bars: HashMap<String, ProgressBar> = HashMap::new();
        let mut last_state: HashMap<String, String> = HashMap::new();

        while let Some(event) = rx.recv().await {
            match mode {
                ProgressMode::Silent => {}
                ProgressMode::Lines => {
                    let changed = last_state.get(&event.service) != Some(&event.state);
                    if changed {
                        eprintln!("  → {}", format_line(&event));
                        last_state.insert(event.service.clone(), event.state.clone());
                    }
                }
                ProgressMode::Bars => {
                    let pb = bars
                        .entry(event.service.clone())
                        .or_insert_with(|| multi.add(bar(&event.service)));
                    if let Some(pct) = event.percent {
                        pb.set_position(u64::from(pct));
                    }
                    if !event.is_terminal() {
                        pb.set_message(event.state.clone());
                    } else if event.state == STATE_FAILED {
                        finish_error(pb, &event.state);
                    } else if event.state == STATE_ALREADY_RUNNING {
                        pb.finish_with_message(format!("ℹ {}", event.state));
                    } else {
                        finish_success(pb, &event.state);
                    }
                }
            }
        }

        for pb in bars.values().filter(|pb| !pb.is_finished()) {
            pb.abandon();
        }
    })
}
