//! Application service: the hexagonal core.
//!
//! [`AppService`] owns every control-loop state machine: the leak
//! integrator, the debounced mute button, the interval gates, the climate
//! filter, the alarm notifiers and the output patterns.  It exposes a
//! clean, hardware-agnostic API.  All I/O flows through port traits
//! injected at call sites, making the entire service testable with mock
//! adapters.
//!
//! ```text
//!  WaterSensorPort ───▶ ┌─────────────────────────┐ ──▶ ActuatorPort
//!  ClimateSensorPort ─▶ │        AppService       │ ──▶ NotifyPort
//!  OperatorInputPort ─▶ │ integrator · notifiers  │ ──▶ EventSink
//!                       └─────────────────────────┘
//! ```
//!
//! ## Tick order
//!
//! 1. display toggle → redraw dial on change
//! 2. poll climate acquisition → smooth, dial, temperature alarms
//! 3. start the next acquisition when idle and due
//! 4. water gate → integrate probes → leak alarm / rearm, clear mute
//! 5. mute button
//! 6. indicator and buzzer patterns

use log::{debug, info, warn};

use crate::alarm::{AlarmKind, AlarmProcessor};
use crate::config::{SystemConfig, validate_config};
use crate::drivers::blinker::Blinker;
use crate::drivers::button::DebouncedButton;
use crate::drivers::meter::Meter;
use crate::error::Result;
use crate::limits::{AlarmLimits, parse_limits};
use crate::sensors::climate::{ClimateFilter, ClimateReading};
use crate::sensors::water_level::LeakIntegrator;
use crate::timing::{IntervalGate, TimeTick};

use super::commands::AppCommand;
use super::events::AppEvent;
use super::ports::{
    ActuatorPort, ClimateSensorPort, ConfigPort, EventSink, NotifyPort, OperatorInputPort,
    StoragePort, WaterSensorPort,
};
use super::status::{AlarmFlags, DeviceStatus};

/// Everything the control loop reads from and writes to, in one bound.
///
/// A single adapter usually owns all of the board's pins, so taking one
/// `&mut` avoids splitting it into several simultaneous borrows.
pub trait DevicePorts:
    WaterSensorPort + ClimateSensorPort + OperatorInputPort + ActuatorPort
{
}

impl<T> DevicePorts for T where
    T: WaterSensorPort + ClimateSensorPort + OperatorInputPort + ActuatorPort
{
}

/// Both persistent stores; on the device one NVS adapter backs them.
pub trait PersistencePorts: StoragePort + ConfigPort {}

impl<T> PersistencePorts for T where T: StoragePort + ConfigPort {}

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

pub struct AppService {
    config: SystemConfig,
    limits: AlarmLimits,
    alarms: AlarmProcessor,
    integrator: LeakIntegrator,
    button: DebouncedButton,
    indicator: Blinker,
    buzzer: Blinker,
    meter: Meter,
    climate: ClimateFilter,
    water_gate: IntervalGate,
    sample_gate: IntervalGate,
    status: DeviceStatus,
    leak: bool,
    muted: bool,
    acquiring: bool,
    activity_led: bool,
}

impl AppService {
    /// Construct the service from configuration and the persisted limits.
    pub fn new(config: SystemConfig, limits: AlarmLimits) -> Self {
        Self {
            alarms: AlarmProcessor::new(&config),
            integrator: LeakIntegrator::new(config.leak_alarm_limit),
            button: DebouncedButton::new(config.debounce_ms),
            indicator: Blinker::indicator(config.indicator_flash_ms),
            buzzer: Blinker::buzzer(config.buzzer_pulse_ms),
            meter: Meter::new(&config),
            climate: ClimateFilter::new(config.smoothing_weight),
            water_gate: IntervalGate::new(),
            sample_gate: IntervalGate::new(),
            status: DeviceStatus::new(env!("CARGO_PKG_VERSION"), "boot", &limits),
            leak: false,
            muted: false,
            acquiring: false,
            activity_led: false,
            config,
            limits,
        }
    }

    /// Replace the boot stamp shown in the info variable.
    pub fn set_reset_stamp(&mut self, stamp: &str) {
        self.status = {
            let mut s = DeviceStatus::new(env!("CARGO_PKG_VERSION"), stamp, &self.limits);
            s.set_alarms(self.status.flags());
            if let Some(r) = self.climate.reading() {
                s.set_climate(r.temperature_f, r.humidity_pct);
            }
            s
        };
    }

    // ── Lifecycle ─────────────────────────────────────────────

    pub fn start(&mut self, sink: &mut impl EventSink) {
        sink.emit(&AppEvent::Started {
            low: self.limits.low,
            high: self.limits.high,
        });
        info!(
            "AppService started (limits {}..{} F)",
            self.limits.low, self.limits.high
        );
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one full control cycle.  Never blocks.
    pub fn tick(
        &mut self,
        now: TimeTick,
        hw: &mut impl DevicePorts,
        publisher: &mut impl NotifyPort,
        sink: &mut impl EventSink,
    ) {
        // 1. Dial mode
        let mode = hw.display_mode();
        if self.meter.select(mode) {
            let r = self.climate.reading().unwrap_or_default();
            hw.set_needle(self.meter.command(r.temperature_f, r.humidity_pct));
            sink.emit(&AppEvent::DisplayModeChanged(mode));
        }

        // 2. Climate acquisition in flight
        if self.acquiring && !hw.acquiring(now) {
            self.acquiring = false;
            match hw.result() {
                Ok(()) => {
                    let (t, h) = (hw.fahrenheit(), hw.humidity());
                    self.process_climate(now, t, h, hw, publisher, sink);
                }
                Err(e) => {
                    warn!("climate acquisition failed: {} (code {})", e, e.code());
                    sink.emit(&AppEvent::AcquisitionFailed(e));
                }
            }
        }

        // 3. Next acquisition
        if !self.acquiring
            && self
                .sample_gate
                .fired(now, self.config.climate_sample_interval_ms)
        {
            hw.begin_acquisition(now);
            self.acquiring = true;
            self.activity_led = !self.activity_led;
            hw.set_activity_led(self.activity_led);
        }

        // 4. Water probes
        if self
            .water_gate
            .fired(now, self.config.water_sample_interval_ms)
        {
            self.process_water(now, hw, publisher, sink);
        }

        // 5. Mute button
        if self.button.update(hw.mute_button_down(), now) {
            self.muted = true;
            info!("alarm muted");
            sink.emit(&AppEvent::Muted);
        }

        // 6. Outputs
        hw.set_indicator(self.indicator.update(self.leak, now));
        hw.set_buzzer(self.buzzer.update(self.leak && !self.muted, now));
    }

    fn process_climate(
        &mut self,
        now: TimeTick,
        temperature_f: f32,
        humidity_pct: f32,
        hw: &mut impl ActuatorPort,
        publisher: &mut impl NotifyPort,
        sink: &mut impl EventSink,
    ) {
        let ClimateReading {
            temperature_f: t,
            humidity_pct: h,
        } = self.climate.update(temperature_f, humidity_pct);

        hw.set_needle(self.meter.command(t, h));
        self.status.set_climate(t, h);
        sink.emit(&AppEvent::ClimateSample {
            temperature_f: t,
            humidity_pct: h,
        });

        let low = self.limits.is_low(t);
        let high = self.limits.is_high(t);
        if low {
            self.report(AlarmKind::LowTemperature, now, t, publisher, sink);
            self.alarms.high_temp.rearm();
        } else if high {
            self.report(AlarmKind::HighTemperature, now, t, publisher, sink);
            self.alarms.low_temp.rearm();
        } else {
            self.alarms.low_temp.rearm();
            self.alarms.high_temp.rearm();
        }

        self.status.set_alarms(AlarmFlags {
            low_temp: low,
            high_temp: high,
            ..self.status.flags()
        });
    }

    fn process_water(
        &mut self,
        now: TimeTick,
        hw: &mut impl WaterSensorPort,
        publisher: &mut impl NotifyPort,
        sink: &mut impl EventSink,
    ) {
        let (raw_a, raw_b) = hw.read_water_raw();
        let a_v = self.config.adc_to_volts(raw_a);
        let b_v = self.config.adc_to_volts(raw_b);
        let leak = self
            .integrator
            .update(a_v, b_v, self.config.water_threshold_v);

        if leak {
            self.report(AlarmKind::WaterLeak, now, 0.0, publisher, sink);
        } else {
            self.alarms.leak.rearm();
            self.muted = false;
        }

        if leak != self.leak {
            self.leak = leak;
            if leak {
                warn!("water leak detected (A={:.2} V, B={:.2} V)", a_v, b_v);
            } else {
                info!("water leak cleared");
            }
            sink.emit(&AppEvent::LeakChanged { leaking: leak });
            self.status.set_alarms(AlarmFlags {
                leak,
                ..self.status.flags()
            });
        }
    }

    fn report(
        &mut self,
        kind: AlarmKind,
        now: TimeTick,
        temperature_f: f32,
        publisher: &mut impl NotifyPort,
        sink: &mut impl EventSink,
    ) {
        if self.alarms.report(kind, now, temperature_f, publisher) {
            sink.emit(&AppEvent::AlarmSent(kind));
        }
    }

    // ── Command handling ──────────────────────────────────────

    /// Process a remote command.
    ///
    /// A rejected command leaves all state untouched.  New limits and
    /// configuration take effect immediately even if persisting them fails.
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        storage: &mut impl PersistencePorts,
        publisher: &mut impl NotifyPort,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        match cmd {
            AppCommand::SetAlarmLimits(raw) => {
                let limits = match parse_limits(&raw) {
                    Ok(l) => l,
                    Err(e) => {
                        warn!("alarm limits \"{}\" rejected: {}", raw, e);
                        sink.emit(&AppEvent::LimitsRejected(e));
                        return Err(e.into());
                    }
                };
                self.limits = limits;
                self.status.set_limits(&limits);
                info!("alarm limits set to {}..{} F", limits.low, limits.high);
                sink.emit(&AppEvent::LimitsUpdated {
                    low: limits.low,
                    high: limits.high,
                });
                limits.save(storage)?;
                Ok(())
            }
            AppCommand::SendTestAlarm => {
                self.alarms.send_test(publisher);
                Ok(())
            }
            AppCommand::UpdateConfig(config) => {
                if let Err(e) = validate_config(&config) {
                    warn!("configuration update rejected: {:?}", e);
                    return Err(e.into());
                }
                self.apply_config(config);
                storage.save(&self.config)?;
                Ok(())
            }
        }
    }

    fn apply_config(&mut self, config: SystemConfig) {
        self.alarms.reconfigure(&config);
        self.integrator.set_limit(config.leak_alarm_limit);
        self.button.set_debounce(config.debounce_ms);
        self.indicator.set_half_period(config.indicator_flash_ms);
        self.buzzer.set_half_period(config.buzzer_pulse_ms);
        self.climate.set_weight(config.smoothing_weight);
        self.meter = {
            let mut m = Meter::new(&config);
            if let Some(mode) = self.meter.mode() {
                m.select(mode);
            }
            m
        };
        debug!("configuration applied: {:?}", config);
        self.config = config;
        info!("configuration updated at runtime");
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn status(&self) -> &DeviceStatus {
        &self.status
    }

    pub fn limits(&self) -> AlarmLimits {
        self.limits
    }

    pub fn is_leaking(&self) -> bool {
        self.leak
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Smoothed climate, `None` before the first good sample.
    pub fn climate(&self) -> Option<ClimateReading> {
        self.climate.reading()
    }

    pub fn alarms(&self) -> &AlarmProcessor {
        &self.alarms
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }
}
