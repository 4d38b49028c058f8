//! ESP32 time adapter.
//!
//! Provides the millisecond tick the control loop runs on, plus the
//! wall-clock stamp shown in the device info string.
//!
//! - **`target_os = "espidf"`**: wraps `esp_timer_get_time()` from the
//!   ESP-IDF high-resolution timer (microsecond precision, monotonic).
//! - **`not(target_os = "espidf")`**: uses `std::time::Instant` for
//!   host-side testing and simulation.

use core::fmt::Write;

use heapless::String;

use crate::timing::TimeTick;

/// Capacity of a rendered reset stamp.
pub const STAMP_CAP: usize = 32;

/// Time adapter for the ESP32-S3 platform.
pub struct Esp32TimeAdapter {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl Default for Esp32TimeAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl Esp32TimeAdapter {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }

    /// Microseconds since boot (monotonic).
    #[cfg(target_os = "espidf")]
    pub fn uptime_us(&self) -> u64 {
        (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64
    }

    /// Microseconds since boot (monotonic).
    #[cfg(not(target_os = "espidf"))]
    pub fn uptime_us(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }

    /// Control-loop tick.  Truncates to 32 bits, so it wraps after ~49.7
    /// days; all consumers compare through [`crate::timing::elapsed`].
    pub fn now_ms(&self) -> TimeTick {
        (self.uptime_us() / 1000) as TimeTick
    }

    /// Wall-clock time as `YYYY-MM-DD HH:MM:SS`, or the uptime in seconds
    /// when the clock has not been synced yet.
    pub fn reset_stamp(&self) -> String<STAMP_CAP> {
        let mut out = String::new();
        match self.wall_clock() {
            Some((y, mo, d, h, mi, s)) => {
                let _ = write!(out, "{:04}-{:02}-{:02} {:02}:{:02}:{:02}", y, mo, d, h, mi, s);
            }
            None => {
                let _ = write!(out, "uptime {} s", self.uptime_us() / 1_000_000);
            }
        }
        out
    }

    #[cfg(target_os = "espidf")]
    fn wall_clock(&self) -> Option<(i32, i32, i32, i32, i32, i32)> {
        use core::ptr;
        let mut tv = esp_idf_svc::sys::timeval {
            tv_sec: 0,
            tv_usec: 0,
        };
        if unsafe { esp_idf_svc::sys::gettimeofday(&mut tv, ptr::null_mut()) } != 0 {
            return None;
        }
        // Anything before 2020-01-01 means SNTP has not run yet.
        const EPOCH_2020: i64 = 1_577_836_800;
        if (tv.tv_sec as i64) < EPOCH_2020 {
            return None;
        }
        let secs = tv.tv_sec as esp_idf_svc::sys::time_t;
        let mut tm: esp_idf_svc::sys::tm = unsafe { core::mem::zeroed() };
        if unsafe { esp_idf_svc::sys::localtime_r(&secs, &mut tm) }.is_null() {
            return None;
        }
        Some((
            tm.tm_year + 1900,
            tm.tm_mon + 1,
            tm.tm_mday,
            tm.tm_hour,
            tm.tm_min,
            tm.tm_sec,
        ))
    }

    /// Simulation has no synced wall clock.
    #[cfg(not(target_os = "espidf"))]
    fn wall_clock(&self) -> Option<(i32, i32, i32, i32, i32, i32)> {
        None
    }
}
