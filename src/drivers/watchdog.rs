//! Task Watchdog Timer (TWDT) driver.
//!
//! The detector runs unattended for months.  If the control loop ever
//! stalls (stuck peripheral, runaway ISR) the TWDT resets the board so
//! leak monitoring resumes without anyone touching it.
//!
//! The main loop calls [`Watchdog::feed`] once per tick.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use log::info;
#[cfg(target_os = "espidf")]
use log::warn;

/// Loop stall that triggers a reset (ms).  The loop ticks every few ms, so
/// this only fires on a genuine hang.
pub const WATCHDOG_TIMEOUT_MS: u32 = 5_000;

pub struct Watchdog {
    subscribed: bool,
}

impl Default for Watchdog {
    fn default() -> Self {
        Self::new()
    }
}

impl Watchdog {
    /// Configure the TWDT and subscribe the calling task.
    #[cfg(target_os = "espidf")]
    pub fn new() -> Self {
        let cfg = esp_task_wdt_config_t {
            timeout_ms: WATCHDOG_TIMEOUT_MS,
            idle_core_mask: 0,
            trigger_panic: true,
        };
        // SAFETY: called once from main before the control loop starts.
        let ret = unsafe { esp_task_wdt_reconfigure(&cfg) };
        if ret != ESP_OK {
            warn!("watchdog: reconfigure returned {} (may already be configured)", ret);
        }

        // SAFETY: a null handle subscribes the current task.
        let ret = unsafe { esp_task_wdt_add(core::ptr::null_mut()) };
        let subscribed = ret == ESP_OK;
        if subscribed {
            info!("watchdog: armed ({} ms, panic on trigger)", WATCHDOG_TIMEOUT_MS);
        } else {
            warn!("watchdog: subscribe failed ({})", ret);
        }
        Self { subscribed }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new() -> Self {
        info!("watchdog(sim): no-op");
        Self { subscribed: false }
    }

    /// Feed the watchdog.
    pub fn feed(&self) {
        #[cfg(target_os = "espidf")]
        if self.subscribed {
            // SAFETY: the task was subscribed in `new()`.
            unsafe {
                esp_task_wdt_reset();
            }
        }
    }

    pub fn is_armed(&self) -> bool {
        self.subscribed
    }
}
