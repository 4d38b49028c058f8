//! Notification publisher adapter.
//!
//! Implements [`NotifyPort`].  No cloud transport is linked into this
//! firmware, so publications are written to the serial log where a
//! bridge process (or a human) picks them up.  Delivery is fire-and-forget
//! either way.

use log::info;

use crate::app::ports::NotifyPort;

/// Publishes notifications as numbered log records, so a bridge reading
/// the log can spot dropped lines.
#[derive(Debug, Default)]
pub struct LogPublisher {
    seq: u32,
}

impl LogPublisher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NotifyPort for LogPublisher {
    fn publish(&mut self, name: &str, message: &str) {
        self.seq = self.seq.wrapping_add(1);
        info!("PUBLISH #{} | {} | {}", self.seq, name, message);
    }
}
