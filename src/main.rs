//! Leak Detector Firmware: Main Entry Point
//!
//! Hexagonal architecture with a single cooperative control loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter      LogEventSink   NvsAdapter   LogPublisher │
//! │  (Water+Climate+      (EventSink)    (Config+     (NotifyPort) │
//! │   Operator+Actuator)                  Storage)                 │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  Leak integrator · Alarm notifiers · Climate filter    │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  COMMAND_CHANNEL (remote calls) · Task watchdog                │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::time::Duration;

use anyhow::Result;
use log::{error, info, warn};

use leakdetector::adapters::hardware::HardwareAdapter;
use leakdetector::adapters::log_sink::LogEventSink;
use leakdetector::adapters::nvs::NvsAdapter;
use leakdetector::adapters::publisher::LogPublisher;
use leakdetector::adapters::time::Esp32TimeAdapter;
use leakdetector::app::commands::COMMAND_CHANNEL;
use leakdetector::app::ports::ConfigPort;
use leakdetector::app::service::AppService;
use leakdetector::config::SystemConfig;
use leakdetector::drivers::{hw_init, watchdog::Watchdog};
use leakdetector::limits::AlarmLimits;
use leakdetector::sensors::dht::DhtModel;

/// Sensor fitted to this board revision.
const DHT_MODEL: DhtModel = DhtModel::Dht22;

/// Idle time between loop iterations; far below the 20 ms water interval.
const LOOP_SLEEP_MS: u64 = 2;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  LeakDetector v{}                 ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Initialise hardware peripherals ────────────────────
    if let Err(e) = hw_init::init_peripherals() {
        // Without GPIO/ADC there is nothing to monitor; the watchdog is
        // not armed yet, so restart explicitly.
        error!("HAL init failed: {}, restarting", e);
        std::thread::sleep(Duration::from_secs(1));
        unsafe { esp_idf_svc::sys::esp_restart() };
    }
    if let Err(e) = hw_init::init_isr_service() {
        error!("ISR service init failed: {}, climate readings unavailable", e);
    }
    let watchdog = Watchdog::new();
    let time = Esp32TimeAdapter::new();

    // ── 3. Load config and alarm limits ───────────────────────
    let mut nvs = NvsAdapter::new().map_err(|e| anyhow::anyhow!("NVS init failed: {}", e))?;
    let config = match nvs.load() {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!("NVS config load failed ({}), using defaults", e);
            SystemConfig::default()
        }
    };
    let limits = AlarmLimits::load(&nvs);

    // ── 4. Construct adapters and app service ─────────────────
    let mut hw = HardwareAdapter::new(DHT_MODEL);
    let mut log_sink = LogEventSink::new();
    let mut publisher = LogPublisher::new();

    let mut app = AppService::new(config, limits);
    app.set_reset_stamp(&time.reset_stamp());
    info!("{}", app.status().info());
    app.start(&mut log_sink);

    info!("System ready. Entering control loop.");

    // ── 5. Control loop ───────────────────────────────────────
    loop {
        while let Ok(cmd) = COMMAND_CHANNEL.try_receive() {
            if let Err(e) = app.handle_command(cmd, &mut nvs, &mut publisher, &mut log_sink) {
                warn!("command failed: {}", e);
            }
        }

        app.tick(time.now_ms(), &mut hw, &mut publisher, &mut log_sink);

        watchdog.feed();
        std::thread::sleep(Duration::from_millis(LOOP_SLEEP_MS));
    }
}
