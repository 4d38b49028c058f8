//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { low, high } => {
                info!("START | limits={}..{}\u{00b0}F", low, high);
            }
            AppEvent::LeakChanged { leaking } => {
                if *leaking {
                    warn!("LEAK | detected");
                } else {
                    info!("LEAK | cleared");
                }
            }
            AppEvent::Muted => {
                info!("MUTE | buzzer silenced");
            }
            AppEvent::ClimateSample {
                temperature_f,
                humidity_pct,
            } => {
                info!(
                    "CLIMATE | T={:.2}\u{00b0}F | RH={:.2}%",
                    temperature_f, humidity_pct
                );
            }
            AppEvent::AcquisitionFailed(e) => {
                warn!("CLIMATE | read failed: {} (code {})", e, e.code());
            }
            AppEvent::AlarmSent(kind) => {
                info!("ALARM | {} -> {}", kind, kind.event_name());
            }
            AppEvent::LimitsUpdated { low, high } => {
                info!("LIMITS | {}..{}\u{00b0}F", low, high);
            }
            AppEvent::LimitsRejected(e) => {
                warn!("LIMITS | rejected: {}", e);
            }
            AppEvent::DisplayModeChanged(mode) => {
                info!("DIAL | showing {}", mode);
            }
        }
    }
}
