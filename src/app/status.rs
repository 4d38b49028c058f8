//! Read-only device status variables exposed to the remote side.
//!
//! | Variable              | Example                                  |
//! |-----------------------|------------------------------------------|
//! | Info                  | `Firmware Version 2.1.0. Last reset at: …`|
//! | Temperature           | `71.84`                                  |
//! | Humidity              | `42.10`                                  |
//! | Alarms                | `0,1,0` (low temp, high temp, leak)      |
//! | Low Temp Alarm Limit  | `40`                                     |
//! | High Temp Alarm Limit | `105`                                    |
//!
//! Values are pre-rendered strings so a transport can hand them out
//! without touching the control loop's state.

use core::fmt::Write;

use heapless::String;

use crate::limits::AlarmLimits;

/// Current alarm flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlarmFlags {
    pub low_temp: bool,
    pub high_temp: bool,
    pub leak: bool,
}

#[derive(Debug, Clone, Default)]
pub struct DeviceStatus {
    info: String<96>,
    temperature: String<16>,
    humidity: String<16>,
    alarms: String<8>,
    low_limit: String<8>,
    high_limit: String<8>,
    flags: AlarmFlags,
}

impl DeviceStatus {
    pub fn new(firmware_version: &str, reset_stamp: &str, limits: &AlarmLimits) -> Self {
        let mut status = Self::default();
        let _ = write!(
            status.info,
            "Firmware Version {}. Last reset at: {}",
            firmware_version, reset_stamp
        );
        status.set_alarms(AlarmFlags::default());
        status.set_limits(limits);
        status
    }

    pub fn set_climate(&mut self, temperature_f: f32, humidity_pct: f32) {
        self.temperature.clear();
        self.humidity.clear();
        let _ = write!(self.temperature, "{:.2}", temperature_f);
        let _ = write!(self.humidity, "{:.2}", humidity_pct);
    }

    pub fn set_alarms(&mut self, flags: AlarmFlags) {
        self.flags = flags;
        self.alarms.clear();
        let _ = write!(
            self.alarms,
            "{},{},{}",
            u8::from(flags.low_temp),
            u8::from(flags.high_temp),
            u8::from(flags.leak)
        );
    }

    pub fn set_limits(&mut self, limits: &AlarmLimits) {
        self.low_limit.clear();
        self.high_limit.clear();
        let _ = write!(self.low_limit, "{}", limits.low);
        let _ = write!(self.high_limit, "{}", limits.high);
    }

    pub fn flags(&self) -> AlarmFlags {
        self.flags
    }

    pub fn info(&self) -> &str {
        &self.info
    }

    pub fn temperature(&self) -> &str {
        &self.temperature
    }

    pub fn humidity(&self) -> &str {
        &self.humidity
    }

    pub fn alarms(&self) -> &str {
        &self.alarms
    }

    pub fn low_limit(&self) -> &str {
        &self.low_limit
    }

    pub fn high_limit(&self) -> &str {
        &self.high_limit
    }
}
