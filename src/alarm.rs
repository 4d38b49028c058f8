//! Alarm notification arming and holdoff.
//!
//! The control loop reports a condition every time it sees it, as often as
//! it likes.  Each [`AlarmNotifier`] decides whether that report becomes a
//! real publication:
//!
//! ```text
//!            try_send (armed or holdoff elapsed)
//!   Armed ───────────────────────────────────────▶ Disarmed{last_sent_at}
//!     ▲                                                 │
//!     └──────────────────── rearm() ────────────────────┘
//! ```
//!
//! A persistent condition therefore notifies at most once per holdoff
//! period, while a condition that clears (the owner calls `rearm()`) and
//! comes back notifies again immediately.

use core::fmt::Write;

use heapless::String;
use log::{debug, info};

use crate::app::ports::NotifyPort;
use crate::config::SystemConfig;
use crate::timing::{TimeTick, elapsed};

/// Capacity of a formatted alarm message.
pub const PAYLOAD_CAP: usize = 64;

/// Formatted alarm message.
pub type Payload = String<PAYLOAD_CAP>;

const TEST_MESSAGE: &str = "This is a test of the WLD alarm system";

/// The independently throttled alarm types, plus the field-test channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmKind {
    LowTemperature,
    HighTemperature,
    WaterLeak,
    /// Diagnostic publication; only ever sent through `test_send`.
    Test,
}

impl AlarmKind {
    /// Event name the cloud webhook subscribes to.
    pub const fn event_name(self) -> &'static str {
        match self {
            Self::LowTemperature => "WLDAlarmLowTemp",
            Self::HighTemperature => "WLDAlarmHighTemp",
            Self::WaterLeak => "WLDAlarmWaterLeak",
            Self::Test => "WLDAlarmTest",
        }
    }
}

impl core::fmt::Display for AlarmKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::LowTemperature => write!(f, "low temperature"),
            Self::HighTemperature => write!(f, "high temperature"),
            Self::WaterLeak => write!(f, "water leak"),
            Self::Test => write!(f, "test"),
        }
    }
}

/// Build the human-readable message for an alarm.
///
/// Temperature alarms carry the triggering reading with two decimals.
pub fn alarm_message(kind: AlarmKind, temperature_f: f32) -> Payload {
    let mut msg = Payload::new();
    // The longest prefix plus a two-decimal f32 stays under PAYLOAD_CAP.
    let _ = match kind {
        AlarmKind::LowTemperature => write!(
            msg,
            "Low temperature detected. Temperature = {:.2}",
            temperature_f
        ),
        AlarmKind::HighTemperature => write!(
            msg,
            "High temperature detected. Temperature = {:.2}",
            temperature_f
        ),
        AlarmKind::WaterLeak => msg.write_str("Water leak Detected"),
        AlarmKind::Test => msg.write_str(TEST_MESSAGE),
    };
    msg
}

// ───────────────────────────────────────────────────────────────
// AlarmNotifier
// ───────────────────────────────────────────────────────────────

/// Arm/holdoff state for one alarm kind.
#[derive(Debug, Clone)]
pub struct AlarmNotifier {
    kind: AlarmKind,
    holdoff_ms: u32,
    armed: bool,
    last_sent_at: TimeTick,
}

impl AlarmNotifier {
    /// A fresh notifier is armed, so the first occurrence always notifies.
    pub const fn new(kind: AlarmKind, holdoff_ms: u32) -> Self {
        Self {
            kind,
            holdoff_ms,
            armed: true,
            last_sent_at: 0,
        }
    }

    /// Publish `payload` if armed or if the holdoff has run out.
    ///
    /// Returns `true` when a publication actually happened.
    pub fn try_send(
        &mut self,
        now: TimeTick,
        payload: &str,
        publisher: &mut impl NotifyPort,
    ) -> bool {
        if !self.armed && elapsed(now, self.last_sent_at) < self.holdoff_ms {
            debug!("{} alarm held off", self.kind);
            return false;
        }

        publisher.publish(self.kind.event_name(), payload);
        info!("{} alarm published", self.kind);
        self.armed = false;
        self.last_sent_at = now;
        true
    }

    /// The condition has cleared; let the next occurrence notify at once.
    pub fn rearm(&mut self) {
        self.armed = true;
    }

    /// Publish unconditionally under this kind's event name, leaving the
    /// arm/holdoff state untouched.
    pub fn test_send(&self, payload: &str, publisher: &mut impl NotifyPort) {
        publisher.publish(self.kind.event_name(), payload);
    }

    pub fn kind(&self) -> AlarmKind {
        self.kind
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn last_sent_at(&self) -> TimeTick {
        self.last_sent_at
    }

    pub fn set_holdoff(&mut self, holdoff_ms: u32) {
        self.holdoff_ms = holdoff_ms;
    }
}

// ───────────────────────────────────────────────────────────────
// AlarmProcessor
// ───────────────────────────────────────────────────────────────

/// The three notifiers the control loop owns, plus the field-test path.
#[derive(Debug, Clone)]
pub struct AlarmProcessor {
    pub low_temp: AlarmNotifier,
    pub high_temp: AlarmNotifier,
    pub leak: AlarmNotifier,
    test: AlarmNotifier,
}

impl AlarmProcessor {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            low_temp: AlarmNotifier::new(AlarmKind::LowTemperature, config.low_temp_holdoff_ms),
            high_temp: AlarmNotifier::new(AlarmKind::HighTemperature, config.high_temp_holdoff_ms),
            leak: AlarmNotifier::new(AlarmKind::WaterLeak, config.leak_holdoff_ms),
            test: AlarmNotifier::new(AlarmKind::Test, 0),
        }
    }

    /// Apply new holdoff periods without disturbing arm state.
    pub fn reconfigure(&mut self, config: &SystemConfig) {
        self.low_temp.set_holdoff(config.low_temp_holdoff_ms);
        self.high_temp.set_holdoff(config.high_temp_holdoff_ms);
        self.leak.set_holdoff(config.leak_holdoff_ms);
    }

    pub fn notifier_mut(&mut self, kind: AlarmKind) -> &mut AlarmNotifier {
        match kind {
            AlarmKind::LowTemperature => &mut self.low_temp,
            AlarmKind::HighTemperature => &mut self.high_temp,
            AlarmKind::WaterLeak => &mut self.leak,
            AlarmKind::Test => &mut self.test,
        }
    }

    /// Report an active condition of `kind`; formats and throttles.
    pub fn report(
        &mut self,
        kind: AlarmKind,
        now: TimeTick,
        temperature_f: f32,
        publisher: &mut impl NotifyPort,
    ) -> bool {
        let msg = alarm_message(kind, temperature_f);
        self.notifier_mut(kind).try_send(now, &msg, publisher)
    }

    /// Verify the publication path end to end.
    pub fn send_test(&self, publisher: &mut impl NotifyPort) {
        self.test.test_send(&alarm_message(AlarmKind::Test, 0.0), publisher);
        info!("test alarm published");
    }
}
