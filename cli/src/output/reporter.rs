//! `ChannelReporter` — presentation-side implementation of `ProgressReporter`.
//!
//! Application services push events into an unbounded channel and never wait
//! on the terminal. A single consumer task (see [`crate::output::progress`])
//! drains the channel and renders.

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use crate::application::ports::ProgressReporter;
use crate::domain::ProgressEvent;

/// Progress reporter backed by an unbounded mpsc sender.
#[derive(Clone)]
pub struct ChannelReporter {
    tx: UnboundedSender<ProgressEvent>,
}

impl ChannelReporter {
    /// Create a reporter and the receiver its events arrive on.
    #[must_use]
    pub fn channel() -> (Self, UnboundedReceiver<ProgressEvent>) {
        let (tx, rx) = unbounded_channel();
        (Self { tx }, rx)
    }
}

impl ProgressReporter for ChannelReporter {
    fn report(&self, event: ProgressEvent) {
        tracing::trace!(service = %event.service, state = %event.state, percent = ?event.percent, "progress");
        // A closed receiver means nobody is rendering; dropping the event is fine.
        let _ = self.tx.send(event);
    }
}
