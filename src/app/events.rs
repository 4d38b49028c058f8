//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them: log to serial, forward upstream or
//! count them in a test.

use crate::alarm::AlarmKind;
use crate::drivers::meter::DisplayMode;
use crate::error::{LimitsError, SensorError};

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The service has started with these alarm limits (°F).
    Started { low: i16, high: i16 },

    /// The integrated water-leak decision flipped.
    LeakChanged { leaking: bool },

    /// The operator silenced the audible alarm.
    Muted,

    /// A good climate sample arrived (smoothed values).
    ClimateSample { temperature_f: f32, humidity_pct: f32 },

    /// A climate acquisition finished with an error.
    AcquisitionFailed(SensorError),

    /// A notification actually left the device.
    AlarmSent(AlarmKind),

    /// New alarm limits were accepted.
    LimitsUpdated { low: i16, high: i16 },

    /// A remote limits string was rejected; old limits remain.
    LimitsRejected(LimitsError),

    /// The dial switched between temperature and humidity.
    DisplayModeChanged(DisplayMode),
}
