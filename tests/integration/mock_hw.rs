//! Mock adapters for integration tests.
//!
//! [`MockHardware`] implements every device port and records what the
//! service commanded, so tests can assert on the full output history
//! without touching real GPIO/ADC/LEDC registers.

use std::cell::RefCell;
use std::collections::HashMap;
use std::convert::Infallible;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

use leakdetector::app::events::AppEvent;
use leakdetector::app::ports::{
    ActuatorPort, ClimateSensorPort, ConfigError, ConfigPort, EventSink, NotifyPort,
    OperatorInputPort, StorageError, StoragePort, WaterSensorPort,
};
use leakdetector::config::{SystemConfig, validate_config};
use leakdetector::drivers::meter::DisplayMode;
use leakdetector::error::SensorError;
use leakdetector::timing::TimeTick;

/// Raw ADC counts for 0.6 V and 0.1 V at 12 bits / 3.3 V.
pub const WET_RAW: u16 = 745;
pub const DRY_RAW: u16 = 124;

// ── MockPin ───────────────────────────────────────────────────

/// A digital line whose level the test sets directly.
#[derive(Debug, Clone, Copy)]
pub struct MockPin {
    pub high: bool,
}

impl MockPin {
    pub fn new(high: bool) -> Self {
        Self { high }
    }
}

impl ErrorType for MockPin {
    type Error = Infallible;
}

impl InputPin for MockPin {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(self.high)
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(!self.high)
    }
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.high = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.high = true;
        Ok(())
    }
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    /// Raw counts returned for probe A and probe B.
    pub water: (u16, u16),
    /// Mute button input, pulled up (low = pressed).
    pub button: MockPin,
    /// Display toggle input (low = temperature).
    pub toggle: MockPin,
    /// Outcome of the next acquisitions: result, °F, %RH.
    pub climate: (Result<(), SensorError>, f32, f32),
    /// Ticks an acquisition stays in flight before completing.
    pub acquisition_ticks: u32,

    pub indicator: MockPin,
    pub buzzer: MockPin,
    pub activity_led: MockPin,
    pub needle: Vec<u8>,
    pub acquisitions: u32,

    in_flight: Option<u32>,
    last: (Result<(), SensorError>, f32, f32),
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            water: (0, 0),
            button: MockPin::new(true),
            toggle: MockPin::new(false),
            climate: (Ok(()), 70.0, 45.0),
            acquisition_ticks: 0,
            indicator: MockPin::new(false),
            buzzer: MockPin::new(false),
            activity_led: MockPin::new(false),
            needle: Vec::new(),
            acquisitions: 0,
            in_flight: None,
            last: (Err(SensorError::NotStarted), 0.0, 0.0),
        }
    }

    pub fn wet(&mut self) {
        self.water = (WET_RAW, DRY_RAW);
    }

    pub fn dry(&mut self) {
        self.water = (DRY_RAW, DRY_RAW);
    }

    pub fn press(&mut self) {
        self.button.high = false;
    }

    pub fn release(&mut self) {
        self.button.high = true;
    }

    pub fn last_needle(&self) -> Option<u8> {
        self.needle.last().copied()
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl WaterSensorPort for MockHardware {
    fn read_water_raw(&mut self) -> (u16, u16) {
        self.water
    }
}

impl ClimateSensorPort for MockHardware {
    fn begin_acquisition(&mut self, _now: TimeTick) {
        self.acquisitions += 1;
        self.in_flight = Some(self.acquisition_ticks);
    }

    fn acquiring(&mut self, _now: TimeTick) -> bool {
        match self.in_flight {
            Some(0) => {
                self.in_flight = None;
                self.last = self.climate;
                false
            }
            Some(n) => {
                self.in_flight = Some(n - 1);
                true
            }
            None => false,
        }
    }

    fn result(&self) -> Result<(), SensorError> {
        self.last.0
    }

    fn fahrenheit(&self) -> f32 {
        self.last.1
    }

    fn humidity(&self) -> f32 {
        self.last.2
    }
}

impl OperatorInputPort for MockHardware {
    fn mute_button_down(&mut self) -> bool {
        self.button.is_low().unwrap_or(false)
    }

    fn display_mode(&mut self) -> DisplayMode {
        if self.toggle.is_low().unwrap_or(false) {
            DisplayMode::Temperature
        } else {
            DisplayMode::Humidity
        }
    }
}

fn drive(pin: &mut MockPin, on: bool) {
    let _ = if on { pin.set_high() } else { pin.set_low() };
}

impl ActuatorPort for MockHardware {
    fn set_indicator(&mut self, on: bool) {
        drive(&mut self.indicator, on);
    }

    fn set_buzzer(&mut self, on: bool) {
        drive(&mut self.buzzer, on);
    }

    fn set_activity_led(&mut self, on: bool) {
        drive(&mut self.activity_led, on);
    }

    fn set_needle(&mut self, command: u8) {
        self.needle.push(command);
    }
}

// ── MockPublisher ─────────────────────────────────────────────

#[derive(Default)]
pub struct MockPublisher {
    pub sent: Vec<(String, String)>,
}

#[allow(dead_code)]
impl MockPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, name: &str) -> usize {
        self.sent.iter().filter(|(n, _)| n == name).count()
    }
}

impl NotifyPort for MockPublisher {
    fn publish(&mut self, name: &str, message: &str) {
        self.sent.push((name.to_owned(), message.to_owned()));
    }
}

// ── MockStore ─────────────────────────────────────────────────

/// EEPROM-style byte store plus config slot, with injectable write failure.
#[derive(Default)]
pub struct MockStore {
    pub cells: HashMap<u16, Vec<u8>>,
    pub config: RefCell<Option<SystemConfig>>,
    pub fail_writes: bool,
}

#[allow(dead_code)]
impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StoragePort for MockStore {
    fn read(&self, addr: u16, buf: &mut [u8]) -> Result<usize, StorageError> {
        let data = self.cells.get(&addr).ok_or(StorageError::NotFound)?;
        let n = data.len().min(buf.len());
        buf[..n].copy_from_slice(&data[..n]);
        Ok(n)
    }

    fn write(&mut self, addr: u16, data: &[u8]) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::IoError);
        }
        self.cells.insert(addr, data.to_vec());
        Ok(())
    }
}

impl ConfigPort for MockStore {
    fn load(&self) -> Result<SystemConfig, ConfigError> {
        Ok(self.config.borrow().clone().unwrap_or_default())
    }

    fn save(&self, config: &SystemConfig) -> Result<(), ConfigError> {
        validate_config(config)?;
        if self.fail_writes {
            return Err(ConfigError::IoError);
        }
        *self.config.borrow_mut() = Some(config.clone());
        Ok(())
    }
}

// ── EventLog ──────────────────────────────────────────────────

/// Collects events for assertions.
#[derive(Default)]
pub struct EventLog {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for EventLog {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
